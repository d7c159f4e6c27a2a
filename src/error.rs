use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Population(#[from] PopulationError),
}

/// Errors raised when constructing the security universe.
#[derive(Debug, Error, PartialEq)]
pub enum SecurityError {
    #[error("Security '{name}' must have positive shares outstanding")]
    NoSharesOutstanding { name: String },
}

/// Errors raised by the population lifecycle.
///
/// Economically invalid trades are not errors: an unaffordable buy or an
/// uncovered sell is rejected silently. Only programmer-level misuse of the
/// population machinery surfaces here.
#[derive(Debug, Error, PartialEq)]
pub enum PopulationError {
    #[error("Cannot reproduce a population of {size}: at least 2 investors are required")]
    TooSmallForReproduction { size: usize },
}
