use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("could not connect to {url}")]
    Connect { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid site URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("too little text content ({chars} chars) from {url}")]
    InsufficientContent { chars: usize, url: String },
}

impl ScraperError {
    /// Classifies a transport error from `reqwest` into timeout / connect /
    /// status / generic buckets.
    pub(crate) fn from_transport(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            return ScraperError::Timeout {
                url: url.to_owned(),
            };
        }
        if err.is_connect() {
            return ScraperError::Connect {
                url: url.to_owned(),
            };
        }
        if let Some(status) = err.status() {
            return ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            };
        }
        ScraperError::Http(err)
    }

    /// Message shown to the person running the onboarding flow.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ScraperError::Timeout { .. } => {
                "Website took too long to respond. Please try again.".to_string()
            }
            ScraperError::Connect { .. } => {
                "Could not connect to website. Please check the URL.".to_string()
            }
            ScraperError::UnexpectedStatus { status, .. } => {
                format!("Website returned error {status}. Please verify the URL.")
            }
            ScraperError::InsufficientContent { .. } => {
                "Website had very little text content. Try a different page or enter copy manually."
                    .to_string()
            }
            ScraperError::Http(_) | ScraperError::InvalidUrl { .. } => {
                "Could not fetch website. Please check the URL and try again.".to_string()
            }
        }
    }
}
