//! IBD sign-in credentials and the session capability.

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Proof of a successful sign-in. Research fetches take it explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    /// `Cookie` request header value built from the sign-in response.
    pub cookie: String,
}

impl Session {
    /// Joins the `name=value` part of each `Set-Cookie` header.
    pub fn from_set_cookies<'a>(
        username: &str,
        set_cookies: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let cookie = set_cookies
            .into_iter()
            .filter_map(|header| header.split(';').next())
            .map(str::trim)
            .filter(|pair| pair.contains('='))
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            username: username.to_string(),
            cookie,
        }
    }

    pub fn has_cookies(&self) -> bool {
        !self.cookie.is_empty()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("cookies", &self.cookie.split("; ").filter(|c| !c.is_empty()).count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookies_joined_without_attributes() {
        let session = Session::from_set_cookies(
            "me@example.com",
            [
                "ASP.NET_SessionId=abc123; path=/; HttpOnly",
                ".ASPXAUTH=tok; expires=Fri, 01 Jan 2100 00:00:00 GMT; path=/",
                "garbage",
            ],
        );
        assert_eq!(session.cookie, "ASP.NET_SessionId=abc123; .ASPXAUTH=tok");
        assert!(session.has_cookies());
    }

    #[test]
    fn no_cookies() {
        let session = Session::from_set_cookies("me", std::iter::empty());
        assert!(!session.has_cookies());
    }

    #[test]
    fn debug_hides_secrets() {
        let creds = Credentials {
            username: "me".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", creds).contains("hunter2"));

        let session = Session::from_set_cookies("me", ["a=secret"]);
        assert!(!format!("{:?}", session).contains("secret"));
    }
}
