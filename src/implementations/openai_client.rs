use async_trait::async_trait;
use futures::{ Stream, StreamExt };
use log::{ debug, info, warn };
use serde::{ Deserialize, Serialize };
use serde_json::Value;
use std::time::Duration;

use crate::errors::ClientError;
use crate::implementations::config::GeneratorConfig;
use crate::models::stage::Stage;
use crate::traits::model_client::{ GenerationRequest, ModelClient };
use crate::traits::progress::ProgressSink;

/// OpenAI chat-completions request types
#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

/// One line of a server-sent-event body
#[derive(Debug, PartialEq)]
pub(crate) enum SseLine {
    /// Content delta
    Chunk(String),
    /// `data: [DONE]`
    Done,
    /// Comments, blank lines, role-only deltas
    Skip,
}

/// Decode a single line of a streamed chat-completions body.
pub(crate) fn parse_sse_line(line: &str) -> Result<SseLine, ClientError> {
    let line = line.trim_end_matches('\r');
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(SseLine::Skip);
    };
    let data = data.trim();

    if data == "[DONE]" {
        return Ok(SseLine::Done);
    }
    if data.is_empty() {
        return Ok(SseLine::Skip);
    }

    let event: Value = serde_json
        ::from_str(data)
        .map_err(|e| ClientError::MalformedResponse(format!("invalid stream event: {}", e)))?;

    if let Some(error) = event.get("error") {
        let message = error["message"].as_str().map(str::to_string).unwrap_or_else(|| error.to_string());
        return Err(ClientError::MalformedResponse(format!("error event in stream: {}", message)));
    }

    match event["choices"][0]["delta"]["content"].as_str() {
        Some(text) if !text.is_empty() => Ok(SseLine::Chunk(text.to_string())),
        _ => Ok(SseLine::Skip),
    }
}

/// Pull `choices[0].message.content` out of a non-streamed response body.
pub(crate) fn extract_message_content(body: &str) -> Result<String, ClientError> {
    let response: Value = serde_json
        ::from_str(body)
        .map_err(|e| ClientError::MalformedResponse(format!("invalid JSON response: {}", e)))?;

    let choices = response["choices"]
        .as_array()
        .ok_or_else(|| ClientError::MalformedResponse("missing choices array".to_string()))?;

    if choices.is_empty() {
        return Err(ClientError::EmptyResponse);
    }

    choices[0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| ClientError::MalformedResponse("missing message content".to_string()))
}

/// Model client for OpenAI-compatible chat-completions endpoints
#[derive(Clone)]
pub struct OpenAiClient {
    http_client: reqwest::Client,
    endpoint: String,
    stream: bool,
}

impl OpenAiClient {
    pub fn new(config: &GeneratorConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: config.api_endpoint.clone(),
            stream: config.stream,
        })
    }

    async fn send(&self, request: &GenerationRequest) -> Result<reqwest::Response, ClientError> {
        let body = ChatRequest {
            model: request.model.as_str(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            temperature: request.temperature,
            stream: self.stream,
        };

        debug!("Sending {} stage request to {}", request.stage, self.endpoint);
        debug!("Model: {}, temperature: {}", request.model, request.temperature);
        debug!("Prompt length: {} characters", request.prompt.len());

        let response = self.http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .bearer_auth(&request.api_key)
            .json(&body)
            .send().await
            .map_err(|e| {
                let error_msg = format!("Network error when calling the model API: {}", e);
                warn!("{}", error_msg);
                if e.is_timeout() {
                    warn!("Request timed out");
                }
                if e.is_connect() {
                    warn!("Connection error - check network connectivity");
                }
                ClientError::Network(error_msg)
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text().await
                .unwrap_or_else(|_| "Failed to get error message".to_string());

            warn!("API error: HTTP {} - {}", status, error_text);
            return Err(ClientError::Http {
                status,
                message: error_text,
            });
        }

        Ok(response)
    }
}

/// Assemble a streamed chat-completions body.
///
/// Each content delta is forwarded to `progress` as it arrives, but the text is returned only
/// once `[DONE]` is seen or the body ends. Lines are split at the byte level so a multi-byte
/// character cut across two chunks is decoded whole.
pub(crate) async fn collect_stream<S, B, E>(
    body: S,
    stage: Stage,
    progress: &dyn ProgressSink
) -> Result<String, ClientError>
    where S: Stream<Item = Result<B, E>>, B: AsRef<[u8]>, E: std::fmt::Display
{
    let mut body = Box::pin(body);
    let mut pending: Vec<u8> = Vec::new();
    let mut content = String::new();

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| ClientError::Network(format!("stream interrupted: {}", e)))?;
        pending.extend_from_slice(chunk.as_ref());

        while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
            let line_bytes: Vec<u8> = pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line_bytes[..line_bytes.len() - 1]).into_owned();

            match parse_sse_line(&line)? {
                SseLine::Chunk(text) => {
                    progress.token(stage, &text);
                    content.push_str(&text);
                }
                SseLine::Done => {
                    return Ok(content);
                }
                SseLine::Skip => {}
            }
        }
    }

    // Body ended without a trailing newline
    if !pending.is_empty() {
        match parse_sse_line(&String::from_utf8_lossy(&pending))? {
            SseLine::Chunk(text) => {
                progress.token(stage, &text);
                content.push_str(&text);
            }
            SseLine::Done | SseLine::Skip => {}
        }
    }

    Ok(content)
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
        progress: &dyn ProgressSink
    ) -> Result<String, ClientError> {
        if request.api_key.trim().is_empty() {
            return Err(ClientError::MissingApiKey("empty credential".to_string()));
        }

        let response = self.send(request).await?;

        let content = if self.stream {
            collect_stream(response.bytes_stream(), request.stage, progress).await?
        } else {
            let text = response
                .text().await
                .map_err(|e| ClientError::Network(format!("Failed to read response: {}", e)))?;
            let content = extract_message_content(&text)?;
            progress.token(request.stage, &content);
            content
        };

        info!("Received {} characters for the {} stage", content.len(), request.stage);
        Ok(content)
    }
}
