use crate::constants::{BASE_URL, BASE_URL_ENV};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// REST endpoint root, without trailing slash (e.g `https://fapi.binance.com`)
    pub base_url: String,
    /// Milliseconds the request stays valid after its timestamp. The exchange
    /// default applies when unset.
    pub recv_window: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            recv_window: None,
        }
    }
}

impl Config {
    /// Default config, with the base URL taken from `FUTURES_API_URL` when set.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_base_url(&url),
            _ => Self::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = Some(recv_window);
        self
    }
}
