//! Centralized configuration (environment variables + defaults).

use anyhow::{anyhow, Context};
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_API_BASE_PATH: &str = "/apis";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_LOG_FILTER: &str = "info,order_catalogue=debug";

/// Which document store backs the collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!(
                "STORE_BACKEND must be `postgres` or `memory` (got `{}`)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `Postgres`.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Prefix under which the resource routers are mounted. Empty means the root.
    pub api_base_path: String,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number (got `{}`)", v))?,
            None => DEFAULT_PORT,
        };

        let store_backend = match lookup("STORE_BACKEND") {
            Some(v) => v.parse::<StoreBackend>()?,
            None => StoreBackend::Postgres,
        };

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(anyhow!(
                "DATABASE_URL must be set when STORE_BACKEND=postgres"
            ));
        }

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS must be a valid u32 (got `{}`)", v))?
                .max(1),
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let api_base_path = normalize_base_path(
            &lookup("API_BASE_PATH").unwrap_or_else(|| DEFAULT_API_BASE_PATH.to_string()),
        );

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port,
            store_backend,
            database_url,
            db_max_connections,
            api_base_path,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))
    }
}

/// `"apis/"` -> `"/apis"`, `"/"` -> `""`.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_for_memory_backend() {
        let config = Config::from_lookup(lookup_from(&[("STORE_BACKEND", "memory")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.api_base_path, "/apis");
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
        assert!(config.database_url.is_none());
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/catalogue"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/catalogue");
        assert_eq!(config.db_max_connections, 1);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn rejects_bad_port_and_backend() {
        assert!(Config::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("PORT", "seventy")
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup_from(&[("STORE_BACKEND", "mongo")])).is_err());
    }

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(normalize_base_path("apis/"), "/apis");
        assert_eq!(normalize_base_path("/v1/catalogue/"), "/v1/catalogue");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("  "), "");
    }
}
