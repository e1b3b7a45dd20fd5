use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use redflag_core::{CatalogConfig, VerdictRule};

/// Moderator keys that MUST NOT be used.
const PLACEHOLDER_KEYS: &[&str] = &["change-me", "dev-moderator-key"];

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub moderator_key: String,
    pub catalog: CatalogConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let moderator_key = var("REDFLAG_MODERATOR_KEY").unwrap_or_default();
        if moderator_key.is_empty() || PLACEHOLDER_KEYS.contains(&moderator_key.as_str()) {
            bail!("REDFLAG_MODERATOR_KEY is unset or still a placeholder; set it in your .env file");
        }

        let host = var("REDFLAG_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("REDFLAG_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("REDFLAG_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .context("REDFLAG_HOST must be an IP address")?;

        let db_path = var("REDFLAG_DB_PATH").unwrap_or_else(|| "redflag.db".into()).into();

        let defaults = CatalogConfig::default();
        let ranking_window = match var("REDFLAG_RANKING_WINDOW") {
            Some(v) => v.parse().context("REDFLAG_RANKING_WINDOW must be a positive integer")?,
            None => defaults.ranking_window,
        };
        if ranking_window == 0 {
            bail!("REDFLAG_RANKING_WINDOW must be greater than zero");
        }
        let verdict_rule = match var("REDFLAG_VERDICT_RULE") {
            Some(v) => v.parse::<VerdictRule>().map_err(anyhow::Error::msg)?,
            None => defaults.verdict_rule,
        };
        let oversample_factor = match var("REDFLAG_OVERSAMPLE") {
            Some(v) => v.parse().context("REDFLAG_OVERSAMPLE must be a positive integer")?,
            None => defaults.oversample_factor,
        };

        Ok(Self {
            addr,
            db_path,
            moderator_key,
            catalog: CatalogConfig {
                ranking_window,
                verdict_rule,
                oversample_factor,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = Config::from_lookup(lookup(&[("REDFLAG_MODERATOR_KEY", "s3cret")])).unwrap();
        assert_eq!(cfg.addr.port(), 3000);
        assert_eq!(cfg.db_path, PathBuf::from("redflag.db"));
        assert_eq!(cfg.catalog, CatalogConfig::default());
    }

    #[test]
    fn placeholder_key_is_rejected() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("REDFLAG_MODERATOR_KEY", "change-me")])).is_err());
    }

    #[test]
    fn overrides_parse() {
        let cfg = Config::from_lookup(lookup(&[
            ("REDFLAG_MODERATOR_KEY", "s3cret"),
            ("REDFLAG_HOST", "127.0.0.1"),
            ("REDFLAG_PORT", "8080"),
            ("REDFLAG_RANKING_WINDOW", "250"),
            ("REDFLAG_VERDICT_RULE", "majority"),
            ("REDFLAG_OVERSAMPLE", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.catalog.ranking_window, 250);
        assert_eq!(cfg.catalog.verdict_rule, VerdictRule::StrictMajority);
        assert_eq!(cfg.catalog.oversample_factor, 5);

        assert!(Config::from_lookup(lookup(&[("REDFLAG_MODERATOR_KEY", "k"), ("REDFLAG_PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("REDFLAG_MODERATOR_KEY", "k"), ("REDFLAG_RANKING_WINDOW", "0")])).is_err());
    }
}
