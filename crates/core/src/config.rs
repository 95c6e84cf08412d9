use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub aws: AwsConfig,
    pub queue: QueueConfig,
    /// Tracing filter directive, e.g. "info" or "funnel_server=debug".
    pub log_level: String,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            auth: AuthConfig::from_env(),
            aws: AwsConfig::from_env(),
            queue: QueueConfig::from_env(),
            log_level: env_or("LOG_LEVEL", "info"),
        }
    }

    /// True when a durable queue is fully configured (region and URL both
    /// present). Decides the sink variant exactly once, at startup.
    pub fn queue_configured(&self) -> bool {
        self.aws.region.is_some() && self.queue.queue_url.is_some()
    }

    /// Print a redacted summary for startup logs. Key values never appear,
    /// only the count.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  server: {}:{}", self.server.host, self.server.port);
        tracing::info!("  auth:   {} API key(s)", self.auth.api_keys.len());
        match &self.queue.queue_url {
            Some(url) if self.queue_configured() => {
                tracing::info!(
                    "  queue:  sqs ({}, region {})",
                    url,
                    self.aws.region.as_deref().unwrap_or("")
                );
            }
            _ => tracing::info!("  queue:  log fallback (no queue configured)"),
        }
        tracing::info!("  log:    level={}", self.log_level);
        if self.auth.api_keys.is_empty() {
            tracing::warn!("No API keys configured, every ingest request will be rejected");
        }
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_u16("PORT", 3000),
        }
    }
}

// ── Authentication ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Valid API keys, from the comma-separated `API_KEYS` variable.
    pub api_keys: Vec<String>,
}

impl AuthConfig {
    fn from_env() -> Self {
        Self {
            api_keys: parse_api_keys(&env_or("API_KEYS", "")),
        }
    }
}

fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

// ── AWS ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

impl AwsConfig {
    fn from_env() -> Self {
        Self {
            region: env_opt("AWS_REGION"),
            access_key_id: env_opt("AWS_ACCESS_KEY_ID"),
            secret_access_key: env_opt("AWS_SECRET_ACCESS_KEY"),
            session_token: env_opt("AWS_SESSION_TOKEN"),
        }
    }
}

// ── Queue ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    pub queue_url: Option<String>,
    /// Explicit endpoint override for local development (LocalStack etc.).
    pub endpoint_url: Option<String>,
    /// Upper bound on a single dispatch, in seconds.
    pub dispatch_timeout_secs: u64,
}

impl QueueConfig {
    fn from_env() -> Self {
        Self {
            queue_url: env_opt("SQS_QUEUE_URL"),
            endpoint_url: env_opt("SQS_ENDPOINT_URL"),
            dispatch_timeout_secs: env_u64("QUEUE_DISPATCH_TIMEOUT_SECS", 10),
        }
    }
}
