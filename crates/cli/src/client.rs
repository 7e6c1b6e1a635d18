//! API client for communicating with the prediction service

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// API client for the prediction service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Request a prediction for one individual
    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictionReport> {
        self.post("predict", request).await
    }

    /// Fetch service health
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get("healthz").await
    }

    /// Fetch service readiness
    pub async fn readiness(&self) -> Result<ReadinessStatus> {
        self.get("readyz").await
    }
}

// API request/response types

/// Attributes submitted for a prediction, as their survey labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub country: String,
    pub year: i64,
    pub location_type: String,
    pub cellphone_access: String,
    pub household_size: i64,
    pub age_of_respondent: i64,
    pub gender_of_respondent: String,
    pub relationship_with_head: String,
    pub marital_status: String,
    pub education_level: String,
    pub job_type: String,
}

/// Prediction returned by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub label: String,
    pub label_text: String,
    pub probability_no_account: f32,
    pub probability_has_account: f32,
    pub percent_no_account: String,
    pub percent_has_account: String,
    pub generated_at: i64,
}

/// Component health as reported by /healthz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

/// Service health as reported by /healthz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub components: HashMap<String, ComponentInfo>,
}

/// Service readiness as reported by /readyz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessStatus {
    pub ready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> PredictRequest {
        PredictRequest {
            country: "Kenya".to_string(),
            year: 2017,
            location_type: "Urban".to_string(),
            cellphone_access: "Yes".to_string(),
            household_size: 4,
            age_of_respondent: 28,
            gender_of_respondent: "Male".to_string(),
            relationship_with_head: "Head of Household".to_string(),
            marital_status: "Single/Never Married".to_string(),
            education_level: "Secondary education".to_string(),
            job_type: "Formally employed Private".to_string(),
        }
    }

    #[tokio::test]
    async fn test_predict_posts_form_and_parses_report() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "label": "has_account",
                    "label_text": "has a bank account",
                    "probability_no_account": 0.1384,
                    "probability_has_account": 0.8616,
                    "percent_no_account": "13.84%",
                    "percent_has_account": "86.16%",
                    "generated_at": 1722902400
                }"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let report = client.predict(&sample_request()).await.unwrap();

        assert_eq!(report.label, "has_account");
        assert_eq!(report.percent_has_account, "86.16%");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_validation_error_surfaces_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/predict")
            .with_status(422)
            .with_body(r#"{"error":"validation_failed","attribute":"country"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.predict(&sample_request()).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("422"));
        assert!(message.contains("country"));
    }

    #[tokio::test]
    async fn test_health_parses_components() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/healthz")
            .with_status(200)
            .with_body(
                r#"{
                    "status": "healthy",
                    "components": {
                        "model": {"status": "healthy", "last_check_timestamp": 1722902400}
                    }
                }"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let health = client.health().await.unwrap();

        assert_eq!(health.status, "healthy");
        assert_eq!(health.components["model"].status, "healthy");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
