use stakesight_kpi::KpiError;
use stakesight_types::ConstantsError;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid constants: {0}")]
    InvalidConstants(#[from] ConstantsError),
    #[error(transparent)]
    Kpi(#[from] KpiError),
}
