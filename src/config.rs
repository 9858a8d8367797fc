use std::env;
use std::net::SocketAddr;

use actix_web::http::Uri;
use tracing::warn;

use crate::ai::gemini::{self, ApiKey};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Process settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub model: String,
    pub gemini_url: String,
    pub allowed_origins: Vec<String>,
    pub api_key: Option<ApiKey>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            model: gemini::DEFAULT_MODEL.to_string(),
            gemini_url: gemini::DEFAULT_BASE_URL.to_string(),
            allowed_origins: vec![],
            api_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(bind) = lookup("FARMING_ASSISTANT_BIND") {
            match bind.parse() {
                Ok(addr) => config.bind = addr,
                Err(_) => warn!("Ignoring invalid FARMING_ASSISTANT_BIND [{bind}]"),
            }
        }

        if let Some(model) = lookup("FARMING_ASSISTANT_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }

        if let Some(url) = lookup("FARMING_ASSISTANT_GEMINI_URL").filter(|u| !u.trim().is_empty())
        {
            config.gemini_url = url.trim().to_string();
        }

        if let Some(origins) = lookup("FARMING_ASSISTANT_ALLOWED_ORIGINS") {
            config.allowed_origins = parse_origins(&origins);
        }

        // The key can also be entered at runtime, so a missing one is fine.
        config.api_key = match lookup("GEMINI_API_KEY") {
            Some(raw) => match ApiKey::parse(&raw) {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!("Ignoring GEMINI_API_KEY: {e}");
                    None
                }
            },
            None => None,
        };

        config
    }
}

// An empty list means any origin may call in, so `*` maps to that.
fn parse_origins(raw: &str) -> Vec<String> {
    let mut origins = vec![];
    for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        if origin == "*" {
            warn!("FARMING_ASSISTANT_ALLOWED_ORIGINS contains *, allowing any origin");
            return vec![];
        }

        match origin.parse::<Uri>() {
            Ok(uri) if uri.scheme().is_some() && uri.host().is_some() => {
                origins.push(origin.to_string())
            }
            _ => warn!("Ignoring invalid origin [{origin}] in FARMING_ASSISTANT_ALLOWED_ORIGINS"),
        }
    }

    origins
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
