//! Error kinds at the crate boundary.

/// Anything that makes one fetch unusable. Never escapes `FeedClient::fetch`; callers see an empty list.
#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected feed shape: {0}")]
    Schema(String),
}

/// Why a single feature was rejected. The rest of the batch is kept.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("feature has no usable id")]
    MissingId,

    #[error("feature {id} has no event time")]
    MissingTime { id: String },

    #[error("feature {id} has fewer than 3 coordinates")]
    MissingCoordinates { id: String },

    #[error("feature {id} has a non-finite coordinate")]
    NonFiniteCoordinate { id: String },

    #[error("malformed feature: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("cache value could not be (de)serialized: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
