/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Default page size for catalog listings (default: `20`).
    pub movies_per_page: u32,
    /// Wall-clock limit for one admin script run (default: `3600`).
    pub script_timeout_secs: u64,
    /// Working directory for admin scripts (default: the server's own).
    pub scripts_workdir: Option<String>,
    /// Interpreter used for the registered Python jobs (default: `python`).
    pub python_bin: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5001`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MOVIES_PER_PAGE`      | `20`                       |
    /// | `SCRIPT_TIMEOUT_SECS`  | `3600`                     |
    /// | `SCRIPTS_WORKDIR`      | unset                      |
    /// | `PYTHON_BIN`           | `python`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let movies_per_page: u32 = std::env::var("MOVIES_PER_PAGE")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("MOVIES_PER_PAGE must be a valid u32");

        let script_timeout_secs: u64 = std::env::var("SCRIPT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SCRIPT_TIMEOUT_SECS must be a valid u64");

        let scripts_workdir = std::env::var("SCRIPTS_WORKDIR")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let python_bin = std::env::var("PYTHON_BIN").unwrap_or_else(|_| "python".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            movies_per_page,
            script_timeout_secs,
            scripts_workdir,
            python_bin,
        }
    }
}
