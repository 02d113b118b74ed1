/// Runtime constants of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix of all API paths. Empty means the origin serving the app.
    pub api_base_url: String,
    /// Delay in milliseconds before leaving the first access confirmation.
    pub redirect_delay_ms: u32,
    /// Number of executions shown on the home page.
    pub recent_executions: usize,
    /// Interval of the workout stopwatch in milliseconds.
    pub tick_interval_ms: u32,
}

impl Config {
    #[must_use]
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim().trim_end_matches('/').to_string(),
            redirect_delay_ms: 2000,
            recent_executions: 3,
            tick_interval_ms: 1000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(option_env!("EFFORT_API_URL").unwrap_or_default())
    }
}
