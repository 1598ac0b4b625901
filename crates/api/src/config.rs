use chrono::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Postgres connection string.
    pub database_url: String,
    /// Symmetric key for the token codec. Must be exactly 32 bytes;
    /// enforced when the codec is constructed, not here.
    pub token_symmetric_key: String,
    /// Access token lifetime.
    pub access_token_duration: Duration,
    /// Refresh token lifetime; also the session lifetime.
    pub refresh_token_duration: Duration,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Required | Default                 |
    /// |--------------------------------|----------|-------------------------|
    /// | `DATABASE_URL`                 | **yes**  | --                      |
    /// | `TOKEN_SYMMETRIC_KEY`          | **yes**  | --                      |
    /// | `HOST`                         | no       | `0.0.0.0`               |
    /// | `PORT`                         | no       | `8080`                  |
    /// | `ACCESS_TOKEN_DURATION_MINS`   | no       | `15`                    |
    /// | `REFRESH_TOKEN_DURATION_HOURS` | no       | `24`                    |
    /// | `CORS_ORIGINS`                 | no       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`         | no       | `30`                    |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or a numeric one is
    /// malformed. Startup misconfiguration should fail fast.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let token_symmetric_key =
            std::env::var("TOKEN_SYMMETRIC_KEY").expect("TOKEN_SYMMETRIC_KEY must be set");

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let access_mins: i64 = std::env::var("ACCESS_TOKEN_DURATION_MINS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("ACCESS_TOKEN_DURATION_MINS must be a valid i64");

        let refresh_hours: i64 = std::env::var("REFRESH_TOKEN_DURATION_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .expect("REFRESH_TOKEN_DURATION_HOURS must be a valid i64");

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

        Self {
            host,
            port,
            database_url,
            token_symmetric_key,
            access_token_duration: Duration::minutes(access_mins),
            refresh_token_duration: Duration::hours(refresh_hours),
            cors_origins,
            request_timeout_secs,
        }
    }
}
