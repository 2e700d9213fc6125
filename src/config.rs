//! Runtime configuration loaded from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::Result;

use crate::db::Database;

pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration.
///
/// Every field has an environment variable; command line flags in `main`
/// override whatever the environment provided.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address to bind (from MODEL_COMMENTS_HOST)
    pub host: IpAddr,
    /// Port to bind (from MODEL_COMMENTS_PORT)
    pub port: u16,
    /// SQLite file (from MODEL_COMMENTS_DB). `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,
    /// Allowed CORS origins (from MODEL_COMMENTS_CORS_ORIGINS, comma-separated).
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("MODEL_COMMENTS_HOST")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        let port = lookup("MODEL_COMMENTS_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_path = lookup("MODEL_COMMENTS_DB")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let cors_origins = lookup("MODEL_COMMENTS_CORS_ORIGINS").map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Self {
            host,
            port,
            database_path,
            cors_origins,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Open and migrate the configured database.
    pub fn open_database(&self) -> Result<Database> {
        let db = match &self.database_path {
            Some(path) => Database::open(path.clone())?,
            None => Database::open_default()?,
        };
        db.migrate()?;
        Ok(db)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            database_path: None,
            cors_origins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]);
        assert_eq!(config.addr(), "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert!(config.database_path.is_none());
        assert!(config.cors_origins.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = config_from(&[
            ("MODEL_COMMENTS_HOST", "0.0.0.0"),
            ("MODEL_COMMENTS_PORT", "8080"),
            ("MODEL_COMMENTS_DB", "/tmp/comments.db"),
            ("MODEL_COMMENTS_CORS_ORIGINS", "https://a.example, https://b.example,"),
        ]);

        assert_eq!(config.addr(), "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/comments.db")));
        assert_eq!(
            config.cors_origins,
            Some(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    fn ignores_unparseable_port() {
        let config = config_from(&[("MODEL_COMMENTS_PORT", "not-a-port")]);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn open_database_uses_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            database_path: Some(dir.path().join("nested").join("store.db")),
            ..ServerConfig::default()
        };

        let db = config.open_database().unwrap();
        assert!(db.list_models().unwrap().is_empty());
        assert!(dir.path().join("nested").join("store.db").exists());
    }
}
