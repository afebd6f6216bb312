use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the shareit module (`modules.shareit` in the app config)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShareItConfig {
    /// Seconds an approved booking must be over before it shows as the item's last booking.
    #[serde(default)]
    pub last_booking_grace_secs: u64,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

impl Default for ShareItConfig {
    fn default() -> Self {
        Self {
            last_booking_grace_secs: 0,
            max_name_length: default_max_name_length(),
            max_text_length: default_max_text_length(),
        }
    }
}

fn default_max_name_length() -> usize {
    255
}

fn default_max_text_length() -> usize {
    2000
}

impl From<&ShareItConfig> for ServiceConfig {
    fn from(cfg: &ShareItConfig) -> Self {
        Self {
            last_booking_grace: Duration::seconds(
                cfg.last_booking_grace_secs.min(u64::from(u32::MAX)) as i64,
            ),
            max_name_length: cfg.max_name_length,
            max_text_length: cfg.max_text_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: ShareItConfig =
            serde_json::from_value(serde_json::json!({ "last_booking_grace_secs": 30 })).unwrap();
        assert_eq!(cfg.last_booking_grace_secs, 30);
        assert_eq!(cfg.max_name_length, 255);
        assert_eq!(cfg.max_text_length, 2000);

        let svc = ServiceConfig::from(&cfg);
        assert_eq!(svc.last_booking_grace, Duration::seconds(30));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<ShareItConfig, _> =
            serde_json::from_value(serde_json::json!({ "grace": 1 }));
        assert!(res.is_err());
    }
}
