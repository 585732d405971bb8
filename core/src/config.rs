// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use crate::error::ConfigError;
use crate::session::Session;

pub const BACKEND_URL: &str = "POSADA_BACKEND_URL";
pub const ACCESS_TOKEN: &str = "POSADA_ACCESS_TOKEN";
pub const SESSION_COOKIE: &str = "POSADA_SESSION_COOKIE";
pub const REQUEST_TIMEOUT: &str = "POSADA_REQUEST_TIMEOUT_SECS";
pub const PAGE_SIZE: &str = "POSADA_PAGE_SIZE";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub session: Session,
    pub request_timeout: Duration,
    /// Upper bound of rows displayed per list page, the backend decides when unset
    pub page_size: Option<usize>,
}

impl Config {
    /// Loads the configuration from the environment (and the .env file if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let backend_url = get(BACKEND_URL).ok_or(ConfigError::Missing(BACKEND_URL))?;
        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: BACKEND_URL,
                value: backend_url,
            });
        }

        let session = match (get(ACCESS_TOKEN), get(SESSION_COOKIE)) {
            (Some(token), _) => Session::new(token),
            (None, Some(cookie)) => Session::from_cookie_header(&cookie),
            (None, None) => Session::anonymous(),
        };

        let request_timeout = match get(REQUEST_TIMEOUT) {
            Some(value) => Duration::from_secs(parse_positive(REQUEST_TIMEOUT, &value)?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let page_size = get(PAGE_SIZE)
            .map(|value| parse_positive(PAGE_SIZE, &value).map(|n| n as usize))
            .transpose()?;

        Ok(Self {
            backend_url: backend_url.trim().trim_end_matches('/').to_string(),
            session,
            request_timeout,
            page_size,
        })
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
