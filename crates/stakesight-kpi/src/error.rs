use stakesight_types::ConstantsError;

#[derive(Debug, thiserror::Error)]
pub enum KpiError {
    #[error("Invalid constants: {0}")]
    InvalidConstants(#[from] ConstantsError),
    #[error("Calculation error: {0}")]
    CalculationError(String),
}
