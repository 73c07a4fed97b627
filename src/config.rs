use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::india::SOURCE_URL;
use crate::time::parse_tz;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Source
    pub source_url: String,
    pub http_timeout_secs: u64,

    // Runtime
    pub dry_run: bool,
    pub tz: String,

    // Persistence
    pub output_dir: String,
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_flag(key: &str, default: bool) -> bool {
    let Some(raw) = env_var(key) else {
        return default;
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => true,
        "0" | "false" | "no" | "n" | "off" => false,
        _ => {
            warn!(key, value = %raw, default, "config.unrecognised_flag");
            default
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    let Some(raw) = env_var(key) else {
        return default;
    };
    raw.parse().unwrap_or_else(|_| {
        warn!(key, value = %raw, "config.unparseable_value");
        default
    })
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let source_url = std::env::var("VAX_SOURCE_URL").unwrap_or_else(|_| SOURCE_URL.to_string());
        let http_timeout_secs = env_parse::<u64>("VAX_HTTP_TIMEOUT_SECS", 30);
        if http_timeout_secs == 0 {
            return Err(anyhow!("VAX_HTTP_TIMEOUT_SECS must be positive"));
        }

        let dry_run = env_flag("DRY_RUN", false);
        let tz = std::env::var("VAX_TZ").unwrap_or_else(|_| "Asia/Kolkata".to_string());
        parse_tz(&tz)?;

        let output_dir = std::env::var("VAX_OUTPUT_DIR").unwrap_or_else(|_| "./output".to_string());

        Ok(Self {
            source_url,
            http_timeout_secs,
            dry_run,
            tz,
            output_dir,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_flag_accepts_common_spellings() {
        std::env::set_var("VAX_TEST_FLAG_ON", " Yes ");
        std::env::set_var("VAX_TEST_FLAG_OFF", "off");
        std::env::set_var("VAX_TEST_FLAG_JUNK", "maybe");
        std::env::set_var("VAX_TEST_FLAG_BLANK", "  ");
        assert!(env_flag("VAX_TEST_FLAG_ON", false));
        assert!(!env_flag("VAX_TEST_FLAG_OFF", true));
        assert!(env_flag("VAX_TEST_FLAG_JUNK", true));
        assert!(!env_flag("VAX_TEST_FLAG_BLANK", false));
        assert!(!env_flag("VAX_TEST_FLAG_UNSET", false));
    }

    #[test]
    fn env_parse_falls_back_on_garbage() {
        std::env::set_var("VAX_TEST_NUM", "abc");
        assert_eq!(env_parse::<u64>("VAX_TEST_NUM", 7), 7);
        std::env::set_var("VAX_TEST_NUM2", " 12 ");
        assert_eq!(env_parse::<u64>("VAX_TEST_NUM2", 7), 12);
        assert_eq!(env_parse::<u64>("VAX_TEST_NUM_UNSET", 7), 7);
    }
}
