use crate::similarity::Threshold;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub similarity_threshold: Threshold,
    /// Base URL of the upstream shop source. `None` disables remote fetches.
    pub source_url: Option<String>,
    pub source_token: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("similarity_threshold", &self.similarity_threshold)
            .field("source_url", &self.source_url)
            .field(
                "source_token",
                &self.source_token.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
