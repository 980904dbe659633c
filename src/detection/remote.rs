use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{LandmarkSet, SignLabel};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/predict";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Any way a remote prediction can fail. All of them mean "no opinion".
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("prediction request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("prediction service returned status {0}")]
    Status(u16),
    #[error("malformed prediction payload: {0}")]
    MalformedPayload(String),
    #[error("prediction names no known sign: {0:?}")]
    UnrecognizedLabel(String),
    #[error("no async runtime available for remote inference")]
    NoRuntime,
}

/// External model-serving endpoint that turns a hand pose into label text.
pub trait PredictionClient: Send + Sync + 'static {
    /// Start one prediction request. The returned future owns everything it
    /// needs so it can be spawned and outlive the caller.
    fn predict(
        &self,
        landmarks: &LandmarkSet,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send + 'static;
}

#[derive(Serialize)]
struct PredictRequest {
    landmarks: Vec<f64>,
}

#[derive(Deserialize)]
struct PredictResponse {
    prediction: String,
}

/// JSON-over-HTTP prediction client.
///
/// Request body: `{"landmarks": [63 numbers]}`.
/// Success body: `{"prediction": "<label>"}`.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpPredictionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for HttpPredictionClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl PredictionClient for HttpPredictionClient {
    fn predict(
        &self,
        landmarks: &LandmarkSet,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send + 'static {
        let request = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&PredictRequest {
                landmarks: landmarks.flatten(),
            });

        async move {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(RemoteError::Status(status.as_u16()));
            }
            let body = response.text().await?;
            let parsed: PredictResponse = serde_json::from_str(&body)
                .map_err(|e| RemoteError::MalformedPayload(e.to_string()))?;
            Ok(parsed.prediction)
        }
    }
}

/// Map the service's label text onto a known sign.
///
/// Only the six known labels are accepted. A well-formed answer naming any
/// other class is reported as `UnrecognizedLabel` and treated like every
/// other remote failure: no opinion, so the display is cleared rather than
/// showing text the rest of the system cannot capture or compare.
pub fn parse_prediction(text: &str) -> Result<SignLabel, RemoteError> {
    text.parse()
        .map_err(|_| RemoteError::UnrecognizedLabel(text.to_string()))
}

/// One-off remote classification: `None` means the service has no opinion.
pub async fn infer<C: PredictionClient>(client: &C, landmarks: &LandmarkSet) -> Option<SignLabel> {
    match client.predict(landmarks).await.and_then(|text| parse_prediction(&text)) {
        Ok(label) => Some(label),
        Err(e) => {
            tracing::warn!("Remote inference gave no opinion: {}", e);
            None
        }
    }
}
