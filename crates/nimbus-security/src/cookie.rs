//! Cookie directives handed back to the request layer.
//!
//! The server never enforces anything declared here; `max_age_seconds` is a
//! hint the browser may or may not honor.

pub use nimbus_shared::config::SameSite;
use nimbus_shared::config::SessionSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDirective {
    pub name: String,
    pub value: String,
    pub path: String,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age_seconds: i64,
}

impl CookieDirective {
    /// Directive that hands `token` to the client.
    pub fn session(token: String, settings: &SessionSettings) -> Self {
        Self {
            name: settings.cookie_name.clone(),
            value: token,
            path: "/".to_string(),
            http_only: true,
            secure: settings.secure,
            same_site: settings.same_site,
            max_age_seconds: settings.max_age_seconds,
        }
    }

    /// Directive that tells the client to drop the session cookie.
    pub fn clear(settings: &SessionSettings) -> Self {
        Self {
            value: String::new(),
            max_age_seconds: 0,
            ..Self::session(String::new(), settings)
        }
    }

    pub fn is_clearing(&self) -> bool {
        self.max_age_seconds == 0
    }

    /// Renders the `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Path={}; Max-Age={}",
            self.name, self.value, self.path, self.max_age_seconds
        );
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if self.secure {
            header.push_str("; Secure");
        }
        header.push_str("; SameSite=");
        header.push_str(self.same_site.as_str());
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_directive_defaults() {
        let directive = CookieDirective::session("abc123".to_string(), &SessionSettings::default());
        assert_eq!(directive.name, "session");
        assert_eq!(directive.value, "abc123");
        assert!(directive.http_only);
        assert!(!directive.secure);
        assert_eq!(directive.same_site, SameSite::Lax);
        assert_eq!(directive.max_age_seconds, 604_800);
        assert_eq!(
            directive.to_header_value(),
            "session=abc123; Path=/; Max-Age=604800; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn test_clear_directive() {
        let directive = CookieDirective::clear(&SessionSettings::default());
        assert!(directive.is_clearing());
        assert_eq!(directive.value, "");
        assert_eq!(
            directive.to_header_value(),
            "session=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn test_secure_flag_rendered_when_configured() {
        let settings = SessionSettings { secure: true, ..SessionSettings::default() };
        let header = CookieDirective::session("t".to_string(), &settings).to_header_value();
        assert!(header.contains("; Secure"));
    }

    #[test]
    fn test_same_site_follows_settings() {
        let settings = SessionSettings {
            secure: true,
            same_site: SameSite::Strict,
            ..SessionSettings::default()
        };
        let header = CookieDirective::session("t".to_string(), &settings).to_header_value();
        assert!(header.ends_with("; Secure; SameSite=Strict"));

        let cleared = CookieDirective::clear(&settings);
        assert_eq!(cleared.same_site, SameSite::Strict);
    }
}
