use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("unknown satellite: {0}")]
    UnknownSatellite(String),
    #[error("propagation error for {satellite}: {message}")]
    Propagation { satellite: String, message: String },
    #[error("scan exceeded its time budget after {samples} samples")]
    ScanTimeout { samples: usize },
}

impl PredictError {
    pub fn propagation(satellite: &str, err: impl ToString) -> Self {
        PredictError::Propagation {
            satellite: satellite.to_string(),
            message: err.to_string(),
        }
    }
}
