use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: String,
    pub jwt_secret: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub request_body_limit_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let addr = std::env::var("MOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let jwt_secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "portal-mock-secret-for-local-testing-only".to_string());

        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let access_ttl_seconds = parse_i64_env("ACCESS_TTL_SECONDS", 900)?;
        let refresh_ttl_seconds = parse_i64_env("REFRESH_TTL_SECONDS", 7 * 24 * 60 * 60)?;
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let request_body_limit_bytes =
            parse_usize_env("REQUEST_BODY_LIMIT_BYTES", 4 * 1024 * 1024)?;

        Ok(Self {
            addr,
            jwt_secret,
            access_ttl_seconds,
            refresh_ttl_seconds,
            cors_origins,
            log_level,
            request_body_limit_bytes,
        })
    }

    /// Settings suitable for in-process integration tests: ephemeral
    /// port, permissive CORS, short access tokens.
    pub fn for_tests() -> Self {
        Self {
            addr: "127.0.0.1:0".to_string(),
            jwt_secret: "portal-mock-secret-for-local-testing-only".to_string(),
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 7 * 24 * 60 * 60,
            cors_origins: vec!["*".to_string()],
            log_level: "warn".to_string(),
            request_body_limit_bytes: 4 * 1024 * 1024,
        }
    }
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_i64_env(key: &str, default: i64) -> Result<i64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<i64>()
        .with_context(|| format!("Failed to parse {key}, expecting integer"))?;

    if value <= 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
