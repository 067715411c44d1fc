use std::time::Duration;

pub const DEEZER_BASE_URL: &str = "https://api.deezer.com";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const REQUEST_TIMEOUT_SECONDS: u64 = 15;
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base address of the upstream catalog API, no trailing slash required.
    pub api_base_url: String,
    pub bind_address: String,
    pub port: u16,
    /// Result limit passed through on search and top-track calls.
    pub search_limit: u32,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEEZER_BASE_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            search_limit: DEFAULT_SEARCH_LIMIT,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECONDS),
        }
    }
}

impl AppConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
