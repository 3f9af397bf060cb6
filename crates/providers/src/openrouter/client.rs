use std::time::Duration;

use crate::openrouter::config::OpenRouterConfig;
use healthai_core::llm::{self, ChatError, ChatRequest, ModelClient};
use reqwest::{header, Client, StatusCode};
use tracing::{debug, error, info};

/// Chat-completion client for OpenRouter. One POST per call, no retries.
#[derive(Clone)]
pub struct OpenRouterClient {
    http: Client,
    cfg: OpenRouterConfig,
}

impl OpenRouterClient {
    pub fn new(cfg: OpenRouterConfig) -> Result<Self, ChatError> {
        let mut auth =
            header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_key.expose()))
                .map_err(|e| ChatError::Config(format!("credential: {}", e)))?;
        auth.set_sensitive(true);
        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let mut builder = Client::builder()
            .default_headers(headers)
            .use_rustls_tls()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(2)
            .timeout(cfg.timeout);
        if let Some(p) = &cfg.proxy {
            let proxy = reqwest::Proxy::all(p)
                .map_err(|e| ChatError::Config(format!("proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| ChatError::Config(e.to_string()))?;
        Ok(Self { http, cfg })
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.cfg
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        )
    }
}

impl ModelClient for OpenRouterClient {
    fn model(&self) -> &str {
        &self.cfg.model
    }

    async fn send_chat(&self, req: &ChatRequest) -> Result<String, ChatError> {
        let url = self.endpoint();
        let prompt_len: usize = req.messages.iter().map(|m| m.content.len()).sum();
        info!(target: "providers::openrouter", "chat request model={} url={} prompt_len={}", req.model, url, prompt_len);
        let resp = self
            .http
            .post(url)
            .json(req)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        let status = resp.status();
        let body = resp.text().await.map_err(map_reqwest_err)?;
        if status != StatusCode::OK {
            error!(target: "providers::openrouter", "chat non-200 status={} body_len={}", status, body.len());
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        let text = llm::reply_text(&body).map_err(|e| {
            error!(target: "providers::openrouter", "chat reply unusable: {}", e);
            e
        })?;
        debug!(target: "providers::openrouter", "chat reply len={}", text.len());
        Ok(text)
    }
}

fn map_reqwest_err(e: reqwest::Error) -> ChatError {
    error!(target: "providers::openrouter", "transport failure: {}", e);
    if e.is_timeout() {
        ChatError::Timeout(e.to_string())
    } else {
        ChatError::Transport(e.to_string())
    }
}
