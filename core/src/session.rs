// SPDX-License-Identifier: GPL-3.0-only

/// Name of the cookie holding the bearer token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticated session, injected into the [`ApiClient`](crate::client::ApiClient)
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = self.access_token.as_ref().map(|_| "<redacted>");
        f.debug_struct("Session")
            .field("access_token", &token)
            .finish()
    }
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        let access_token = access_token.into();
        let access_token = access_token.trim();
        Self {
            access_token: (!access_token.is_empty()).then(|| access_token.to_string()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Builds the session from a raw `Cookie` header value (`a=1; access_token=...`)
    pub fn from_cookie_header(header: &str) -> Self {
        let access_token = header
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| name.trim() == ACCESS_TOKEN_COOKIE)
            .map(|(_, value)| value.trim().trim_matches('"'))
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Self { access_token }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_from_cookie_header() {
        let session = Session::from_cookie_header("theme=dark; access_token=abc.def; lang=vi");
        assert_eq!(session.access_token(), Some("abc.def"));
    }

    #[test]
    fn missing_or_empty_cookie_is_anonymous() {
        assert!(!Session::from_cookie_header("theme=dark").is_authenticated());
        assert!(!Session::from_cookie_header("access_token=").is_authenticated());
        assert!(!Session::new("   ").is_authenticated());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let session = Session::new("secret");
        assert!(!format!("{session:?}").contains("secret"));
    }
}
