use crate::storage;
use cfm_core::{
    BatchRequest, BatchSuccess, ClientConfig, ClientError, BATCH_PATH, FILE_CONTENT_TYPE,
    FILE_FIELD, HEALTH_PATH, PREDICT_PATH, PROB_THRESH_PARAM,
};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, warn};

/// Thin client for the CFM-ID prediction service.
///
/// Every call is a single attempt bounded by the configured timeout. Transport
/// failures are sorted into [`ClientError`] categories; nothing is retried.
pub struct BatchClient {
    http: Client,
    config: ClientConfig,
}

impl BatchClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ClientError::UnexpectedError(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Uploads `request.input_file` to `/predict/batch` and saves the response body.
    ///
    /// The input file is checked and read before any connection is made. The
    /// output file is only touched once a complete 200 response has arrived.
    pub async fn run(&self, request: &BatchRequest) -> Result<BatchSuccess, ClientError> {
        storage::ensure_input(&request.input_file).await?;
        let (data, file_name) = storage::read_input(&request.input_file).await?;
        debug!(file = %file_name, bytes = data.len(), "read batch input");

        if self.config.check_health {
            self.health().await?;
        }

        let url = self.config.endpoint(BATCH_PATH)?;

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(FILE_CONTENT_TYPE)
            .map_err(|e| self.classify(e))?;
        let form = Form::new().part(FILE_FIELD, part);

        info!(%url, prob_thresh = %request.prob_thresh, "uploading batch");
        let response = self
            .http
            .post(url)
            .query(&[(PROB_THRESH_PARAM, request.prob_thresh.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if response.status() != StatusCode::OK {
            return Err(http_error(response).await);
        }

        let suggested_filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_filename);

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        let (bytes_written, sha256) = storage::write_output(&request.output_file, &body).await?;
        info!(
            output = %request.output_file.display(),
            bytes = bytes_written,
            "batch results saved"
        );

        Ok(BatchSuccess {
            output_file: request.output_file.clone(),
            bytes_written,
            sha256,
            suggested_filename,
        })
    }

    /// `GET /healthz`; anything but 200 counts as unhealthy.
    pub async fn health(&self) -> Result<(), ClientError> {
        let url = self.config.endpoint(HEALTH_PATH)?;
        debug!(%url, "probing service health");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(http_error(response).await)
        }
    }

    /// Predicts the spectrum of a single molecule via `POST /predict`.
    /// Returns the service's plain text output unchanged.
    pub async fn predict_smiles(
        &self,
        smiles: &str,
        prob_thresh: &str,
    ) -> Result<String, ClientError> {
        let url = self.config.endpoint(PREDICT_PATH)?;
        info!(%url, smiles, prob_thresh, "requesting single prediction");

        let response = self
            .http
            .post(url)
            .form(&[("smiles", smiles), (PROB_THRESH_PARAM, prob_thresh)])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if response.status() != StatusCode::OK {
            return Err(http_error(response).await);
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout {
                after: self.config.timeout,
            }
        } else if err.is_connect() {
            ClientError::ConnectionFailed {
                base_url: self.config.base_url.to_string(),
                message: err.to_string(),
            }
        } else {
            ClientError::UnexpectedError(err.to_string())
        }
    }
}

async fn http_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(status, "could not read error body: {}", e);
            String::new()
        }
    };
    ClientError::HttpError { status, body }
}

/// Extracts `name` from `attachment; filename=name` (quoted or not).
fn attachment_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
