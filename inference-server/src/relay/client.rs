//! Predict API Client

use std::time::Duration;

use fallwatch_core::Reading;
use serde::Deserialize;

use super::{RelayError, StepOutcome};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictReply {
    pub prediction: u8,
    pub label: String,
    pub prob_fall: Option<f64>,
}

pub struct PredictClient {
    url: String,
    http_client: reqwest::Client,
}

impl PredictClient {
    pub fn new(url: &str) -> Result<Self, RelayError> {
        let http_client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            url: url.to_string(),
            http_client,
        })
    }

    /// POST one reading; a non-200 answer is reported, not raised
    pub async fn predict(&self, reading: &Reading) -> Result<StepOutcome, RelayError> {
        let response = self.http_client.post(&self.url).json(reading).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::OK {
            let reply: PredictReply = response.json().await?;
            Ok(StepOutcome::Forwarded(reply))
        } else {
            let body = response.text().await?;
            Ok(StepOutcome::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
