//! HTTP transport over `reqwest`

use futures::StreamExt;

use crate::error::{OptimizerError, Result};
use crate::types::events::OptimizeRequest;
use crate::types::model_status::ModelStatusReport;
use crate::types::options::ClientOptions;

use super::{ByteStream, Transport};

/// Transport that talks to the service over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    optimize_url: String,
    status_url: String,
}

impl HttpTransport {
    /// Create a transport from client options
    ///
    /// # Errors
    /// Returns `OptimizerError::InvalidConfig` if the options are invalid, or
    /// `OptimizerError::Http` if the HTTP client cannot be built
    pub fn new(options: &ClientOptions) -> Result<Self> {
        options.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            optimize_url: options.optimize_url(),
            status_url: options.status_url(),
        })
    }

    /// URL the optimize request is posted to
    #[must_use]
    pub fn optimize_url(&self) -> &str {
        &self.optimize_url
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(OptimizerError::http_status(status.as_u16(), body))
    }
}

impl Transport for HttpTransport {
    async fn open_stream(&self, request: &OptimizeRequest) -> Result<ByteStream> {
        log::debug!("POST {}", self.optimize_url);
        let response = self
            .client
            .post(&self.optimize_url)
            .json(request)
            .send()
            .await
            .map_err(|e| OptimizerError::transport(format!("request failed: {e}")))?;
        let response = Self::check_status(response).await?;

        let stream = async_stream::stream! {
            let mut body = response.bytes_stream();
            while let Some(chunk) = body.next().await {
                yield chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| OptimizerError::transport(format!("body read failed: {e}")));
            }
        };
        Ok(Box::pin(stream))
    }

    async fn fetch_status(&self) -> Result<ModelStatusReport> {
        log::debug!("GET {}", self.status_url);
        let response = self.client.get(&self.status_url).send().await?;
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice::<ModelStatusReport>(&body)?)
    }
}
