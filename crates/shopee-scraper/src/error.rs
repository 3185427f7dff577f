use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid target origin \"{origin}\": {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("invalid proxy URL: {reason}")]
    InvalidProxy { reason: String },

    #[error("Failed to scrape product after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}
