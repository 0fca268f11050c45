//! Server Configuration
//!
//! Read once from the environment at startup; every knob has a default so a
//! bare `bhajanmala-server` starts a working local instance.

use std::env;
use std::path::PathBuf;

/// Runtime configuration, read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port to bind (`BHAJANMALA_PORT`, default 3001)
    pub port: u16,

    /// Embedded database directory (`BHAJANMALA_DB`, default
    /// `./data/bhajanmala.db`)
    pub db_path: PathBuf,

    /// Featured bhajan IDs for the home page, comma-separated in
    /// `BHAJANMALA_FEATURED`, pick order preserved
    pub featured_ids: Vec<String>,

    /// Allowed CORS origin (`CORS_ALLOW_ORIGIN`); unset means allow any
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = env::var("BHAJANMALA_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(3001);

        let db_path = env::var("BHAJANMALA_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/bhajanmala.db"));

        let featured_ids = env::var("BHAJANMALA_FEATURED")
            .map(|raw| parse_featured(&raw))
            .unwrap_or_default();

        let cors_origin = env::var("CORS_ALLOW_ORIGIN").ok();

        Self {
            port,
            db_path,
            featured_ids,
            cors_origin,
        }
    }
}

fn parse_featured(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn featured_parsing_trims_and_drops_empty_entries() {
        assert_eq!(parse_featured(" id-1 , ,id-2,"), vec!["id-1", "id-2"]);
        assert!(parse_featured("").is_empty());
    }
}
