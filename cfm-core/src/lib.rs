mod error;

pub use error::ClientError;

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";
pub const DEFAULT_INPUT_FILE: &str = "example_input.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "test_results.xlsx";
pub const DEFAULT_PROB_THRESH: &str = "0.001";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

// Routes exposed by the prediction service, relative to the base URL.
pub const BATCH_PATH: &str = "predict/batch";
pub const PREDICT_PATH: &str = "predict";
pub const HEALTH_PATH: &str = "healthz";

/// Multipart field carrying the uploaded molecule list.
pub const FILE_FIELD: &str = "file";
pub const FILE_CONTENT_TYPE: &str = "text/plain";
pub const PROB_THRESH_PARAM: &str = "prob_thresh";

/// Where and how to reach the prediction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    /// Probe `/healthz` before uploading.
    pub check_health: bool,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            check_health: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_health_check(mut self, check_health: bool) -> Self {
        self.check_health = check_health;
        self
    }

    /// Resolves a service route against the base URL, keeping any path prefix
    /// the base URL carries (`http://host/cfm` + `healthz` -> `http://host/cfm/healthz`).
    pub fn endpoint(&self, route: &str) -> Result<Url, url::ParseError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        base.join(route.trim_start_matches('/'))
    }
}

/// One batch upload: what to send and where to put the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub prob_thresh: String,
}

impl BatchRequest {
    pub fn new(
        input_file: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
        prob_thresh: impl Into<String>,
    ) -> Self {
        Self {
            input_file: input_file.into(),
            output_file: output_file.into(),
            prob_thresh: prob_thresh.into(),
        }
    }
}

impl Default for BatchRequest {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_PROB_THRESH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSuccess {
    pub output_file: PathBuf,
    pub bytes_written: u64,
    /// Hex encoded SHA-256 of the saved response body.
    pub sha256: String,
    /// Filename the service proposed via `Content-Disposition`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_filename: Option<String>,
}

impl BatchSuccess {
    pub fn size_kb(&self) -> f64 {
        self.bytes_written as f64 / 1024.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> ClientConfig {
        ClientConfig::new(Url::parse(base).unwrap())
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let config = config(DEFAULT_BASE_URL);
        assert_eq!(
            config.endpoint(BATCH_PATH).unwrap().as_str(),
            "http://localhost:5001/predict/batch"
        );
        assert_eq!(
            config.endpoint(HEALTH_PATH).unwrap().as_str(),
            "http://localhost:5001/healthz"
        );
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let with_slash = config("http://cfm.internal:8080/api/");
        let without_slash = config("http://cfm.internal:8080/api");
        for config in [with_slash, without_slash] {
            assert_eq!(
                config.endpoint("/predict/batch").unwrap().as_str(),
                "http://cfm.internal:8080/api/predict/batch"
            );
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = config(DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(!config.check_health);

        let tuned = config
            .with_timeout(Duration::from_millis(250))
            .with_health_check(true);
        assert_eq!(tuned.timeout, Duration::from_millis(250));
        assert!(tuned.check_health);
    }

    #[test]
    fn test_batch_request_defaults() {
        let request = BatchRequest::default();
        assert_eq!(request.input_file, PathBuf::from("example_input.txt"));
        assert_eq!(request.output_file, PathBuf::from("test_results.xlsx"));
        assert_eq!(request.prob_thresh, "0.001");
    }

    #[test]
    fn test_success_serialization() {
        let success = BatchSuccess {
            output_file: PathBuf::from("out.xlsx"),
            bytes_written: 2048,
            sha256: "ab".repeat(32),
            suggested_filename: None,
        };
        assert_eq!(success.size_kb(), 2.0);

        let value = serde_json::to_value(&success).unwrap();
        assert_eq!(value["bytes_written"], 2048);
        assert_eq!(value["output_file"], "out.xlsx");
        assert!(value.get("suggested_filename").is_none());
    }
}
