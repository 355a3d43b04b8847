use anyhow::{anyhow, Context};
use chrono::NaiveTime;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SCORE_TIME: &str = "02:00";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub score_time: NaiveTime,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads configuration through `get` so tests never touch the process
    /// environment.
    pub fn from_env_with<F>(mut get: F) -> anyhow::Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL")
            .ok_or_else(|| anyhow!("DATABASE_URL must be set to a Postgres instance"))?;

        let max_connections = match get("WASTE_TRACKER_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid WASTE_TRACKER_MAX_CONNECTIONS: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let raw_time = get("WASTE_TRACKER_SCORE_TIME").unwrap_or_else(|| DEFAULT_SCORE_TIME.into());
        let score_time = NaiveTime::parse_from_str(&raw_time, "%H:%M")
            .with_context(|| format!("invalid WASTE_TRACKER_SCORE_TIME: {raw_time}"))?;

        let log_filter = get("WASTE_TRACKER_LOG")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or_else(|| "info".into());

        Ok(Self {
            database_url,
            max_connections,
            score_time,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_url_is_an_error() {
        let res = Config::from_env_with(|_| None);
        assert!(res.is_err());
    }

    #[test]
    fn defaults_apply() {
        let cfg = Config::from_env_with(|k| match k {
            "DATABASE_URL" => Some("postgres://localhost/waste".into()),
            _ => None,
        })
        .expect("cfg");
        assert_eq!(cfg.max_connections, 5);
        assert_eq!(cfg.score_time, NaiveTime::from_hms_opt(2, 0, 0).unwrap());
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn reads_overrides() {
        let cfg = Config::from_env_with(|k| match k {
            "DATABASE_URL" => Some("postgres://db/waste".into()),
            "WASTE_TRACKER_MAX_CONNECTIONS" => Some("12".into()),
            "WASTE_TRACKER_SCORE_TIME" => Some("23:30".into()),
            "RUST_LOG" => Some("debug".into()),
            _ => None,
        })
        .expect("cfg");
        assert_eq!(cfg.max_connections, 12);
        assert_eq!(cfg.score_time, NaiveTime::from_hms_opt(23, 30, 0).unwrap());
        assert_eq!(cfg.log_filter, "debug");
    }

    #[test]
    fn rejects_bad_time() {
        let res = Config::from_env_with(|k| match k {
            "DATABASE_URL" => Some("postgres://db/waste".into()),
            "WASTE_TRACKER_SCORE_TIME" => Some("2am".into()),
            _ => None,
        });
        assert!(res.is_err());
    }
}
