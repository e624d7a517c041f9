//! AiClient trait implementation for OpenAiClient.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{AiClient, AiError, AiResponse, Message};

use super::client::{map_transport_error, ChatResponse, OpenAiClient};

#[async_trait]
impl AiClient for OpenAiClient {
    async fn send_message(&self, messages: &[Message]) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(messages);

        debug!(model = %self.config.model, messages = messages.len(), "chat completion request");

        let response = self
            .http
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("chat completion rate limited");
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let cause = OpenAiClient::describe_error_body(&text);
            return Err(AiError::ApiError(format!("HTTP {status}: {cause}")));
        }

        let json: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        let reply = self.parse_response(json)?;
        debug!(
            input_tokens = reply.usage.input_tokens,
            output_tokens = reply.usage.output_tokens,
            "chat completion finished"
        );
        Ok(reply)
    }
}
