use thiserror::Error;

/// What can go wrong while processing one template. Task errors are logged at
/// the runner boundary and never abort sibling tasks.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("overpass query failed: {0}")]
    Query(#[source] Box<ureq::Error>),
    #[error("overpass response is not a feature collection: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("feature {0} has no tags object under properties")]
    MalformedFeature(usize),
}

impl From<ureq::Error> for TaskError {
    fn from(e: ureq::Error) -> Self {
        // ureq::Error is large, keep it off the happy path
        Self::Query(Box::new(e))
    }
}
