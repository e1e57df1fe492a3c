use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub tls: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub request_timeout_secs: u64,
    pub otp_ttl_minutes: i64,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Builds a postgres URL from the individual `DB_*` variables.
fn database_url_from_parts() -> String {
    let host = env_or("DB_HOST", "localhost");
    let port = env_or("DB_PORT", "5432");
    let user = env_or("DB_USER", "postgres");
    let password = env_or("DB_PASSWORD", "");
    let name = env_or("DB_NAME", "porthub_db");
    if password.is_empty() {
        format!("postgres://{user}@{host}:{port}/{name}")
    } else {
        format!("postgres://{user}:{password}@{host}:{port}/{name}")
    }
}

/// `DATABASE_URL` if set, otherwise assembled from `DB_*`.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| database_url_from_parts())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = database_url();

        // PORT takes precedence so the service runs unchanged on PaaS hosts.
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or_else(|| env_parse("APP_PORT", 8080));

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            issuer: env_or("JWT_ISSUER", "porthub"),
            audience: env_or("JWT_AUDIENCE", "porthub-users"),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60 * 24),
        };

        let smtp = SmtpConfig {
            host: env_or("SMTP_HOST", "localhost"),
            port: env_parse("SMTP_PORT", 587),
            username: std::env::var("SMTP_USERNAME").ok().filter(|v| !v.is_empty()),
            password: std::env::var("SMTP_PASSWORD").ok().filter(|v| !v.is_empty()),
            from: env_or("SMTP_FROM", "PortHub <no-reply@porthub.local>"),
            tls: env_parse("SMTP_TLS", true),
        };

        Ok(Self {
            database_url,
            host: env_or("APP_HOST", "0.0.0.0"),
            port,
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:3000"),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 15),
            otp_ttl_minutes: env_parse("OTP_TTL_MINUTES", 5),
            jwt,
            smtp,
        })
    }
}
