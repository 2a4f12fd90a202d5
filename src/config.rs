use std::env;

use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub business: BusinessConfig,
}

/// Knobs for booking, payment and notification behaviour.
#[derive(Debug, Clone)]
pub struct BusinessConfig {
    /// Offset of the business' local time from UTC, in minutes.
    pub utc_offset_minutes: i32,
    pub booking_horizon_days: i64,
    pub payment_success_rate: f64,
    pub payment_delay_ms: u64,
    pub admin_email: String,
}

pub const DEFAULT_BOOKING_HORIZON_DAYS: i64 = 90;
/// Upper bound for `BOOKING_HORIZON_DAYS`, about ten years.
pub const MAX_BOOKING_HORIZON_DAYS: i64 = 3650;
pub const DEFAULT_PAYMENT_DELAY_MS: u64 = 500;
/// Upper bound for `PAYMENT_DELAY_MS`.
pub const MAX_PAYMENT_DELAY_MS: u64 = 30_000;

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            booking_horizon_days: DEFAULT_BOOKING_HORIZON_DAYS,
            payment_success_rate: 0.9,
            payment_delay_ms: DEFAULT_PAYMENT_DELAY_MS,
            admin_email: "admin@localhost".to_string(),
        }
    }
}

impl BusinessConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; unset or out-of-range values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let defaults = Self::default();
        Self {
            utc_offset_minutes: parse("BUSINESS_UTC_OFFSET_MINUTES")
                .and_then(|v| v.parse::<i32>().ok())
                .filter(|m| m.abs() < 24 * 60)
                .unwrap_or(defaults.utc_offset_minutes),
            booking_horizon_days: parse("BOOKING_HORIZON_DAYS")
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|d| (1..=MAX_BOOKING_HORIZON_DAYS).contains(d))
                .unwrap_or(defaults.booking_horizon_days),
            payment_success_rate: parse("PAYMENT_SUCCESS_RATE")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|r| (0.0..=1.0).contains(r))
                .unwrap_or(defaults.payment_success_rate),
            payment_delay_ms: parse("PAYMENT_DELAY_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|ms| *ms <= MAX_PAYMENT_DELAY_MS)
                .unwrap_or(defaults.payment_delay_ms),
            admin_email: parse("ADMIN_EMAIL")
                .filter(|e| !e.is_empty())
                .unwrap_or(defaults.admin_email),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }

    /// Wall-clock time at the business.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset()).naive_local()
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            port,
            database_url,
            host,
            business: BusinessConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> BusinessConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BusinessConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn unset_values_use_the_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.payment_delay_ms, DEFAULT_PAYMENT_DELAY_MS);
        assert_eq!(config.payment_delay_ms, BusinessConfig::default().payment_delay_ms);
        assert_eq!(config.booking_horizon_days, DEFAULT_BOOKING_HORIZON_DAYS);
        assert_eq!(config.admin_email, "admin@localhost");
    }

    #[test]
    fn oversized_horizon_falls_back_to_default() {
        let huge = from_pairs(&[("BOOKING_HORIZON_DAYS", "9223372036854775807")]);
        assert_eq!(huge.booking_horizon_days, DEFAULT_BOOKING_HORIZON_DAYS);

        let negative = from_pairs(&[("BOOKING_HORIZON_DAYS", "-5")]);
        assert_eq!(negative.booking_horizon_days, DEFAULT_BOOKING_HORIZON_DAYS);

        let max = from_pairs(&[("BOOKING_HORIZON_DAYS", "3650")]);
        assert_eq!(max.booking_horizon_days, MAX_BOOKING_HORIZON_DAYS);
    }

    #[test]
    fn explicit_values_are_parsed() {
        let config = from_pairs(&[
            ("PAYMENT_DELAY_MS", " 0 "),
            ("PAYMENT_SUCCESS_RATE", "1.5"),
            ("BUSINESS_UTC_OFFSET_MINUTES", "120"),
        ]);
        assert_eq!(config.payment_delay_ms, 0);
        assert_eq!(config.payment_success_rate, 0.9);
        assert_eq!(config.offset().local_minus_utc(), 7200);
    }
}
