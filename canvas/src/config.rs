//! Where the game server lives and how to address one game on it.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::storage::Identity;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("base url must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

/// Server host and whether to use TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub secure: bool,
    /// `host[:port]`, no scheme, no trailing slash.
    pub host: String,
}

impl Endpoint {
    /// From the page location. Accepts `location.protocol` with or without the colon.
    #[must_use]
    pub fn from_location(protocol: &str, host: &str) -> Self {
        let secure = protocol.trim_end_matches(':').eq_ignore_ascii_case("https");
        Self { secure, host: host.to_owned() }
    }

    /// From an `http://` or `https://` base URL.
    ///
    /// # Errors
    ///
    /// Any other scheme.
    pub fn from_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let (secure, rest) = if let Some(rest) = base_url.strip_prefix("http://") {
            (false, rest)
        } else if let Some(rest) = base_url.strip_prefix("https://") {
            (true, rest)
        } else {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_owned()));
        };
        let host = rest.trim_end_matches('/');
        if host.is_empty() {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_owned()));
        }
        Ok(Self { secure, host: host.to_owned() })
    }

    #[must_use]
    pub fn ws_scheme(&self) -> &'static str {
        if self.secure { "wss" } else { "ws" }
    }

    #[must_use]
    pub fn http_base(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}", self.host)
    }

    /// Websocket URL for joining `game_id` as `identity`.
    #[must_use]
    pub fn game_url(&self, game_id: &str, identity: &Identity) -> String {
        let mut url = format!(
            "{}://{}/ws/game/{}?name={}",
            self.ws_scheme(),
            self.host,
            urlencoding::encode(game_id),
            urlencoding::encode(&identity.name)
        );
        if let Some(id) = identity.id {
            url.push_str(&format!("&id={id}"));
        }
        if let Some(token) = &identity.token {
            url.push_str("&token=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }
}
