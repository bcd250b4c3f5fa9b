use std::time::Duration;

use serde::Deserialize;

use crate::router_client::SrmClientConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub router: RouterConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Size of the runtime's worker pool serving scrapes.
    pub worker_threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 9922,
            worker_threads: 4,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub host: String,
    pub port: u16,
    pub https: bool,
    pub username: String,
    pub password: String,
    pub verify_tls: bool,
    pub request_timeout_secs: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.1".into(),
            port: 8001,
            https: true,
            username: "admin".into(),
            password: String::new(),
            verify_tls: true,
            request_timeout_secs: 10,
        }
    }
}

impl std::fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("https", &self.https)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl RouterConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn client_config(&self) -> SrmClientConfig {
        SrmClientConfig {
            host: self.host.clone(),
            port: self.port,
            https: self.https,
            username: self.username.clone(),
            password: self.password.clone(),
            verify_tls: self.verify_tls,
            timeout: self.request_timeout(),
        }
    }
}

/// Upper bound on `cache.ttl_secs` (ten years).
pub const MAX_CACHE_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Minimum seconds between router polls; 0 polls on every scrape.
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Only a case-insensitive "true" is true.
pub fn parse_bool(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("true")
}

impl AppConfig {
    /// Reads `CONFIG_FILE` (default `config.toml`; defaults if absent), then applies
    /// environment overrides, then validates.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path, "config file not found, using defaults");
                String::new()
            }
            Err(e) => return Err(anyhow::anyhow!("reading {}: {}", path, e)),
        };
        let mut config: AppConfig = toml::from_str(&s)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies the exporter's environment variables through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(v) = lookup("SRM_HOST") {
            self.router.host = v;
        }
        if let Some(v) = lookup("SRM_PORT") {
            self.router.port = v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("SRM_PORT {:?}: {}", v, e))?;
        }
        if let Some(v) = lookup("USE_HTTPS") {
            self.router.https = parse_bool(&v);
        }
        if let Some(v) = lookup("SRM_USERNAME") {
            self.router.username = v;
        }
        if let Some(v) = lookup("SRM_PASSWORD") {
            self.router.password = v;
        }
        if let Some(v) = lookup("DISABLE_HTTPS_VERIFY") {
            self.router.verify_tls = !parse_bool(&v);
        }
        if let Some(v) = lookup("EXPORTER_CACHE_FOR") {
            self.cache.ttl_secs = v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("EXPORTER_CACHE_FOR {:?}: {}", v, e))?;
        }
        if let Some(v) = lookup("EXPORTER_PORT") {
            self.server.port = v
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("EXPORTER_PORT {:?}: {}", v, e))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.server.worker_threads > 0,
            "server.worker_threads must be > 0, got {}",
            self.server.worker_threads
        );
        anyhow::ensure!(!self.router.host.is_empty(), "router.host must be non-empty");
        anyhow::ensure!(
            self.router.port > 0,
            "router.port must be between 1 and 65535, got {}",
            self.router.port
        );
        anyhow::ensure!(
            !self.router.username.is_empty(),
            "router.username must be non-empty"
        );
        anyhow::ensure!(
            !self.router.password.is_empty(),
            "router.password must be non-empty (set it in the config file or SRM_PASSWORD)"
        );
        anyhow::ensure!(
            self.router.request_timeout_secs > 0,
            "router.request_timeout_secs must be > 0, got {}",
            self.router.request_timeout_secs
        );
        anyhow::ensure!(
            self.cache.ttl_secs <= MAX_CACHE_TTL_SECS,
            "cache.ttl_secs must be <= {} (ten years), got {}",
            MAX_CACHE_TTL_SECS,
            self.cache.ttl_secs
        );
        Ok(())
    }
}
