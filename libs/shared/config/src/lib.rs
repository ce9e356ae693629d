use std::env;
use std::net::SocketAddr;

use serde::Serialize;
use tracing::warn;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_FRONTEND_PORT: u16 = 3000;
/// India Standard Time, the clinic's home timezone.
const DEFAULT_CLINIC_UTC_OFFSET_MINUTES: i32 = 330;

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub supabase_url: String,
    #[serde(skip_serializing)]
    pub supabase_service_key: String,
    #[serde(skip_serializing)]
    pub supabase_jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub require_admin_auth: bool,
    pub clinic_utc_offset_minutes: i32,
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment.eq_ignore_ascii_case("production");

        let frontend_port = first_int_env(&["FRONTEND_PORT"]).unwrap_or(DEFAULT_FRONTEND_PORT);

        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, admin tokens cannot be validated");
                    String::new()
                }),
            host: env::var("HOST").unwrap_or_else(|_| {
                if is_production { "0.0.0.0".to_string() } else { "127.0.0.1".to_string() }
            }),
            port: first_int_env(&["BACKEND_PORT", "PORT"]).unwrap_or_else(|| {
                warn!("BACKEND_PORT/PORT not set, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            cors_origins: match env::var("CORS_ORIGINS") {
                Ok(raw) => parse_origins(&raw),
                Err(_) => default_origins(frontend_port),
            },
            require_admin_auth: env::var("ADMIN_AUTH_REQUIRED")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            clinic_utc_offset_minutes: env::var("CLINIC_UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|v| v.trim().parse::<i32>().ok())
                .filter(|minutes| minutes.abs() < 24 * 60)
                .unwrap_or(DEFAULT_CLINIC_UTC_OFFSET_MINUTES),
            environment,
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing database environment variables");
        }
        if !config.require_admin_auth {
            warn!("ADMIN_AUTH_REQUIRED is off: admin routes are open");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Returns the first variable in `names` that parses as a port number.
fn first_int_env(names: &[&str]) -> Option<u16> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find_map(|value| value.trim().parse::<u16>().ok())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}

fn default_origins(frontend_port: u16) -> Vec<String> {
    vec![
        format!("http://localhost:{}", frontend_port),
        format!("http://127.0.0.1:{}", frontend_port),
    ]
}

fn parse_bool(raw: &str) -> bool {
    !matches!(raw.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no" | "off")
}
