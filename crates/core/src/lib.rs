pub mod analytics;
pub mod prompts;

pub mod llm {
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    /// Fixed system instruction sent ahead of every prompt.
    pub const PERSONA: &str = "You are a helpful, medically accurate AI health assistant.";

    #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        System,
        User,
    }

    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
    pub struct Message {
        pub role: Role,
        pub content: String,
    }

    impl Message {
        pub fn system<S: Into<String>>(s: S) -> Self {
            Self {
                role: Role::System,
                content: s.into(),
            }
        }
        pub fn user<S: Into<String>>(s: S) -> Self {
            Self {
                role: Role::User,
                content: s.into(),
            }
        }
    }

    /// Body of a single chat-completion call. Serializes to
    /// `{"model": .., "messages": [..]}` and nothing else.
    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
    pub struct ChatRequest {
        pub model: String,
        pub messages: Vec<Message>,
    }

    impl ChatRequest {
        /// One persona message followed by one user message; no history.
        pub fn with_persona(model: &str, prompt: &str) -> Self {
            Self {
                model: model.to_string(),
                messages: vec![Message::system(PERSONA), Message::user(prompt)],
            }
        }
    }

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum ChatError {
        #[error("Error {status}: {body}")]
        Upstream { status: u16, body: String },
        #[error("network: {0}")]
        Transport(String),
        #[error("timeout: {0}")]
        Timeout(String),
        #[error("malformed response: {0}")]
        Malformed(String),
        #[error("config: {0}")]
        Config(String),
    }

    /// Pulls `choices[0].message.content` out of a successful response body.
    pub fn reply_text(body: &str) -> Result<String, ChatError> {
        let v: serde_json::Value =
            serde_json::from_str(body).map_err(|e| ChatError::Malformed(e.to_string()))?;
        let choice = v["choices"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| ChatError::Malformed("no choices in response".into()))?;
        choice["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ChatError::Malformed("choices[0].message.content missing".into()))
    }

    #[allow(async_fn_in_trait)]
    pub trait ModelClient: Send + Sync {
        /// Model identifier placed in every request.
        fn model(&self) -> &str;

        async fn send_chat(&self, req: &ChatRequest) -> Result<String, ChatError>;

        async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
            let req = ChatRequest::with_persona(self.model(), prompt);
            self.send_chat(&req).await
        }
    }

}
