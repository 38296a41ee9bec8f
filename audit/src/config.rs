use anyhow::anyhow;
use std::env;

/// Retention window applied when no `AUDIT_LOG_MAX_AGE_DAYS` is configured.
pub const DEFAULT_MAX_LOG_AGE_DAYS: i64 = 90;

#[derive(Debug, Clone)]
pub struct Config {
    /// Entries older than this many days are eligible for removal by cleanup.
    pub max_log_age_days: i64,
    /// When false, `record_event` drops entries without touching the store.
    pub recording_enabled: bool,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let max_log_age_days = match env::var("AUDIT_LOG_MAX_AGE_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid AUDIT_LOG_MAX_AGE_DAYS value: {}", raw))?,
            Err(_) => DEFAULT_MAX_LOG_AGE_DAYS,
        };
        if max_log_age_days < 1 {
            return Err(anyhow!(
                "AUDIT_LOG_MAX_AGE_DAYS must be at least 1, got {}",
                max_log_age_days
            ));
        }

        let recording_enabled = match env::var("AUDIT_LOG_RECORDING_ENABLED") {
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow!("Invalid AUDIT_LOG_RECORDING_ENABLED value: {}", raw))?,
            Err(_) => true,
        };

        Ok(Config {
            max_log_age_days,
            recording_enabled,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_log_age_days: DEFAULT_MAX_LOG_AGE_DAYS,
            recording_enabled: true,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
