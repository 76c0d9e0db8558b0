use anyhow::{Result, anyhow};
use axum::http::HeaderValue;

/// Where employee records live for this process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Database,
    Memory,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreKind,
    pub seed_on_start: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store = match lookup("EMPLOYEE_STORE")
            .map(|raw| raw.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") | Some("database") | Some("db") => StoreKind::Database,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(anyhow!(
                    "EMPLOYEE_STORE must be `database` or `memory`, got `{other}`"
                ));
            }
        };

        let seed_on_start = lookup("SEED_ON_START")
            .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();
        for origin in &cors_allowed_origins {
            HeaderValue::from_str(origin)
                .map_err(|_| anyhow!("invalid origin in CORS_ALLOWED_ORIGINS: {origin}"))?;
        }

        Ok(Self {
            store,
            seed_on_start,
            cors_allowed_origins,
        })
    }
}
