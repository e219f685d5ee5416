use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub lookup: LookupConfig,
    pub intake: IntakeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = LookupConfig::default();
        let lookup = LookupConfig {
            base_url: env::var("LOOKUP_BASE_URL").unwrap_or(defaults.base_url),
            connect_timeout: Duration::from_millis(numeric_var(
                "LOOKUP_CONNECT_TIMEOUT_MS",
                defaults.connect_timeout.as_millis() as u64,
            )?),
            request_timeout: Duration::from_millis(numeric_var(
                "LOOKUP_REQUEST_TIMEOUT_MS",
                defaults.request_timeout.as_millis() as u64,
            )?),
            max_attempts: numeric_var("LOOKUP_MAX_ATTEMPTS", defaults.max_attempts)?,
            backoff: Duration::from_millis(numeric_var(
                "LOOKUP_BACKOFF_MS",
                defaults.backoff.as_millis() as u64,
            )?),
            cache_ttl: Duration::from_secs(numeric_var(
                "LOOKUP_CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )?),
            cache_capacity: numeric_var("LOOKUP_CACHE_CAPACITY", defaults.cache_capacity)?,
        };

        let intake = IntakeConfig {
            minimum_age_years: numeric_var(
                "INTAKE_MINIMUM_AGE_YEARS",
                IntakeConfig::default().minimum_age_years,
            )?,
            secure_cookies: environment.is_production(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            lookup,
            intake,
        })
    }
}

fn numeric_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { variable: name }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Upstream address provider, retry, and cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub backoff: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://viacep.com.br/ws/".to_string(),
            connect_timeout: Duration::from_millis(2000),
            request_timeout: Duration::from_millis(2500),
            max_attempts: 3,
            backoff: Duration::from_millis(150),
            cache_ttl: Duration::from_secs(180),
            cache_capacity: 10_000,
        }
    }
}

/// Candidate form rules that vary per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    pub minimum_age_years: u32,
    pub secure_cookies: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            minimum_age_years: 14,
            secure_cookies: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable } => {
                write!(f, "{variable} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
