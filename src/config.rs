use anyhow::Context;
use serde::Deserialize;

/// Ten years.
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

impl JwtConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&self.ttl_minutes) {
            anyhow::bail!(
                "SESSION_TTL_MINUTES must be between 1 and {}, got {}",
                MAX_SESSION_TTL_MINUTES,
                self.ttl_minutes
            );
        }
        Ok(())
    }
}

/// Argon2 cost parameters, fixed per deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        // argon2 crate defaults (19 MiB, 2 passes, 1 lane)
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    pub secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub cookie: CookieConfig,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "recipebox".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "recipebox-users".into()),
            // long-lived by default: 30 days
            ttl_minutes: env_parse("SESSION_TTL_MINUTES", 60 * 24 * 30),
        };
        jwt.validate()?;
        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: env_parse("ARGON2_MEMORY_KIB", defaults.memory_kib),
            iterations: env_parse("ARGON2_ITERATIONS", defaults.iterations),
            parallelism: env_parse("ARGON2_PARALLELISM", defaults.parallelism),
        };
        let cookie = CookieConfig {
            secure: env_parse("COOKIE_SECURE", false),
        };
        Ok(Self {
            database_url,
            jwt,
            password,
            cookie,
        })
    }
}
