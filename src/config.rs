use std::time::Duration;

/// Census boundary API used when no override is supplied.
/// `GET {base}/geo/1.0/boundary-set/{geography-type}/{geo-id}`
pub const DEFAULT_BOUNDARY_BASE_URL: &str = "http://census.ire.org";

/// Uploads above this size are rejected before any processing starts.
pub const MAX_UPLOAD_BYTES: u64 = 12 * 1024 * 1024;

/// Connection settings for the remote boundary-lookup service.
#[derive(Debug, Clone)]
pub struct BoundaryServiceConfig {
    pub base_url: String,
    /// Per-request wall clock budget. A hung lookup fails the row rather
    /// than blocking the whole pipeline.
    pub timeout: Duration,
}

impl Default for BoundaryServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BOUNDARY_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Settings threaded through one ingestion run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub boundary: BoundaryServiceConfig,
    pub max_upload_bytes: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            boundary: BoundaryServiceConfig::default(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}
