use crate::emote::ProviderKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmoteError {
    #[error("network error talking to {provider}: {source}")]
    Network {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider}: {resource} not found")]
    NotFound {
        provider: ProviderKind,
        resource: String,
    },

    #[error("{provider} returned an unexpected response shape: {message}")]
    Shape {
        provider: ProviderKind,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl EmoteError {
    /// True for the benign 404 case: the channel simply has no presence on
    /// the provider.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EmoteError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, EmoteError>;
