use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use blablabook_core::AppError;
use blablabook_domain::RoleName;
use ipnet::IpNet;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Shortest accepted session signing secret, in bytes.
pub const SESSION_SECRET_MIN_BYTES: usize = 64;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_API_HOST: &str = "127.0.0.1";
const DEFAULT_API_PORT: u16 = 3000;
const DEFAULT_SESSION_IDLE_MINUTES: i64 = 30;
const DEFAULT_USER_ROLE: &str = "user";

/// Subcommand selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCommand {
    Serve,
    Migrate,
    Seed,
}

impl FromStr for ApiCommand {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "serve" => Ok(Self::Serve),
            "migrate" => Ok(Self::Migrate),
            "seed" => Ok(Self::Seed),
            other => Err(AppError::Validation(format!(
                "unknown command '{other}', expected 'serve', 'migrate' or 'seed'"
            ))),
        }
    }
}

/// Backend holding server-side session records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStoreKind {
    Redis,
    Postgres,
}

impl FromStr for SessionStoreKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "postgres" => Ok(Self::Postgres),
            other => Err(AppError::Validation(format!(
                "SESSION_STORE must be either 'redis' or 'postgres', got '{other}'"
            ))),
        }
    }
}

/// Account created by the seed command.
#[derive(Debug, Clone)]
pub struct SeedAdminConfig {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub command: ApiCommand,
    pub database_url: String,
    pub session_secret: String,
    pub session_store: SessionStoreKind,
    pub redis_url: Option<String>,
    pub cookie_secure: bool,
    pub session_idle_minutes: i64,
    pub frontend_url: String,
    /// Peers whose `X-Forwarded-For` header is believed.
    pub trusted_proxies: Vec<IpNet>,
    pub api_host: String,
    pub api_port: u16,
    pub default_user_role: Option<RoleName>,
    pub seed_admin: Option<SeedAdminConfig>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let command = env::args()
            .nth(1)
            .map(|value| ApiCommand::from_str(value.as_str()))
            .transpose()?
            .unwrap_or(ApiCommand::Serve);

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let session_secret = required_env("SESSION_SECRET")?;
        if session_secret.len() < SESSION_SECRET_MIN_BYTES {
            return Err(AppError::Validation(format!(
                "SESSION_SECRET must be at least {SESSION_SECRET_MIN_BYTES} bytes"
            )));
        }

        let session_store = optional_env("SESSION_STORE")
            .map(|value| SessionStoreKind::from_str(value.as_str()))
            .transpose()?
            .unwrap_or(SessionStoreKind::Redis);
        let redis_url = optional_env("REDIS_URL");
        if session_store == SessionStoreKind::Redis && redis_url.is_none() {
            return Err(AppError::Validation(
                "REDIS_URL is required when SESSION_STORE=redis".to_owned(),
            ));
        }

        let cookie_secure = optional_env("SESSION_COOKIE_SECURE")
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));
        let session_idle_minutes = optional_env("SESSION_IDLE_MINUTES")
            .map(|value| {
                value
                    .parse::<i64>()
                    .ok()
                    .filter(|minutes| *minutes > 0)
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "SESSION_IDLE_MINUTES must be a positive integer, got '{value}'"
                        ))
                    })
            })
            .transpose()?
            .unwrap_or(DEFAULT_SESSION_IDLE_MINUTES);

        let frontend_url =
            optional_env("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_owned());
        validate_frontend_url(&frontend_url)?;
        let trusted_proxies = optional_env("TRUSTED_PROXIES")
            .map(|value| parse_trusted_proxies(&value))
            .transpose()?
            .unwrap_or_default();
        let api_host = optional_env("API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_owned());
        let api_port = optional_env("API_PORT")
            .map(|value| {
                value
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))
            })
            .transpose()?
            .unwrap_or(DEFAULT_API_PORT);

        let default_user_role = match env::var("DEFAULT_USER_ROLE") {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(RoleName::new(value)?),
            Err(_) => Some(RoleName::new(DEFAULT_USER_ROLE)?),
        };

        let seed_admin = match (
            optional_env("SEED_ADMIN_EMAIL"),
            optional_env("SEED_ADMIN_USERNAME"),
            optional_env("SEED_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(username), Some(password)) => Some(SeedAdminConfig {
                email,
                username,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            command,
            database_url,
            session_secret,
            session_store,
            redis_url,
            cookie_secure,
            session_idle_minutes,
            frontend_url,
            trusted_proxies,
            api_host,
            api_port,
            default_user_role,
            seed_admin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }

    pub fn requires_redis(&self) -> bool {
        self.session_store == SessionStoreKind::Redis
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn validate_frontend_url(value: &str) -> Result<(), AppError> {
    let url = Url::parse(value).map_err(|error| {
        AppError::Validation(format!("invalid FRONTEND_URL '{value}': {error}"))
    })?;
    if !url.origin().is_tuple() {
        return Err(AppError::Validation(format!(
            "FRONTEND_URL '{value}' has no http(s) origin"
        )));
    }

    Ok(())
}

/// Comma-separated CIDR ranges or bare addresses.
fn parse_trusted_proxies(value: &str) -> Result<Vec<IpNet>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<IpNet>()
                .or_else(|_| entry.parse::<IpAddr>().map(IpNet::from))
                .map_err(|error| {
                    AppError::Validation(format!(
                        "invalid TRUSTED_PROXIES entry '{entry}': {error}"
                    ))
                })
        })
        .collect()
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
