use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

// Service configuration sourced from environment variables, optionally
// overridden by a YAML file named in LOCALEHUB_CONFIG.
#[derive(Debug, Clone)]
pub struct LocaleHubConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Deserialize)]
struct LocaleHubConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<String>,
    postgres: Option<PostgresConfig>,
}

impl LocaleHubConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("LOCALEHUB_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse LOCALEHUB_BIND")?;
        let metrics_bind = std::env::var("LOCALEHUB_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9090".to_string())
            .parse()
            .with_context(|| "parse LOCALEHUB_METRICS_BIND")?;
        let storage = parse_storage(
            &std::env::var("LOCALEHUB_STORAGE").unwrap_or_else(|_| "memory".to_string()),
        )?;
        let postgres = match std::env::var("LOCALEHUB_PG_URL") {
            Ok(url) => Some(PostgresConfig {
                url,
                max_connections: std::env::var("LOCALEHUB_PG_MAX_CONNECTIONS")
                    .ok()
                    .map(|value| value.parse().with_context(|| "parse LOCALEHUB_PG_MAX_CONNECTIONS"))
                    .transpose()?
                    .unwrap_or_else(default_max_connections),
                acquire_timeout_ms: std::env::var("LOCALEHUB_PG_ACQUIRE_TIMEOUT_MS")
                    .ok()
                    .map(|value| {
                        value
                            .parse()
                            .with_context(|| "parse LOCALEHUB_PG_ACQUIRE_TIMEOUT_MS")
                    })
                    .transpose()?
                    .unwrap_or_else(default_acquire_timeout_ms),
            }),
            Err(_) => None,
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            storage,
            postgres,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("LOCALEHUB_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read LOCALEHUB_CONFIG: {path}"))?;
            let override_cfg: LocaleHubConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse localehub config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.storage {
                config.storage = parse_storage(&value)?;
            }
            if let Some(value) = override_cfg.postgres {
                config.postgres = Some(value);
            }
        }
        Ok(config)
    }
}

fn parse_storage(value: &str) -> Result<StorageBackend> {
    match value {
        "memory" => Ok(StorageBackend::Memory),
        "postgres" => Ok(StorageBackend::Postgres),
        other => anyhow::bail!("unknown storage backend: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for key in [
            "LOCALEHUB_BIND",
            "LOCALEHUB_METRICS_BIND",
            "LOCALEHUB_STORAGE",
            "LOCALEHUB_PG_URL",
            "LOCALEHUB_PG_MAX_CONNECTIONS",
            "LOCALEHUB_PG_ACQUIRE_TIMEOUT_MS",
            "LOCALEHUB_CONFIG",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_to_memory_backend() {
        clear_env();
        let config = LocaleHubConfig::from_env().expect("config");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(config.postgres.is_none());
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.metrics_bind.port(), 9090);
    }

    #[test]
    #[serial]
    fn env_selects_postgres_with_pool_settings() {
        clear_env();
        std::env::set_var("LOCALEHUB_STORAGE", "postgres");
        std::env::set_var("LOCALEHUB_PG_URL", "postgres://localhost/localehub");
        std::env::set_var("LOCALEHUB_PG_MAX_CONNECTIONS", "3");
        let config = LocaleHubConfig::from_env().expect("config");
        assert_eq!(config.storage, StorageBackend::Postgres);
        let pg = config.postgres.expect("postgres config");
        assert_eq!(pg.max_connections, 3);
        assert_eq!(pg.acquire_timeout_ms, 5_000);
        clear_env();
    }

    #[test]
    #[serial]
    fn unknown_storage_is_rejected() {
        clear_env();
        std::env::set_var("LOCALEHUB_STORAGE", "sqlite");
        let err = LocaleHubConfig::from_env().expect_err("unknown backend");
        assert!(err.to_string().contains("unknown storage backend"));
        clear_env();
    }

    #[test]
    #[serial]
    fn yaml_overrides_env() {
        clear_env();
        let mut file = tempfile_in_target();
        writeln!(file.1, "bind_addr: \"127.0.0.1:9999\"\nstorage: postgres").expect("write yaml");
        writeln!(file.1, "postgres:\n  url: postgres://localhost/x").expect("write yaml");
        std::env::set_var("LOCALEHUB_CONFIG", &file.0);
        let config = LocaleHubConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.bind_addr.port(), 9999);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert!(config.postgres.is_some());
        clear_env();
        let _ = std::fs::remove_file(&file.0);
    }

    fn tempfile_in_target() -> (String, std::fs::File) {
        let path = std::env::temp_dir().join(format!("localehub-config-{}.yaml", std::process::id()));
        let file = std::fs::File::create(&path).expect("create temp config");
        (path.to_string_lossy().into_owned(), file)
    }
}
