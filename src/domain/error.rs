use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("{what} not found: {path}")]
    NotFound { what: &'static str, path: String },

    #[error("Menu scrape failed: {0}")]
    ScrapeFailure(String),

    #[error("Nutrition endpoint rejected the request with status {status}")]
    UpstreamRejected { status: u16 },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MenuError {
    pub fn not_found(what: &'static str, segments: &[&str]) -> Self {
        MenuError::NotFound {
            what,
            path: segments.join(" > "),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MenuError::NotFound { .. })
    }
}
