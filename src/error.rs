use thiserror::Error;

pub type ForcePlotResult<T> = Result<T, ForcePlotError>;

#[derive(Debug, Error)]
pub enum ForcePlotError {
    #[error("invalid force plot input: {0}")]
    Parse(#[from] json5::Error),

    #[error("feature `{key}` has a non-finite effect ({effect})")]
    NonFiniteEffect { key: String, effect: f64 },

    #[error("base value must be finite, got {0}")]
    NonFiniteBaseValue(f64),

    #[error("label margin must be a finite, non-negative number, got {0}")]
    InvalidLabelMargin(f64),
}
