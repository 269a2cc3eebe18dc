//! HTTP basic authentication.

use crate::config::AuthConfig;
use base64::Engine as _;

/// Build a `Basic` authorization header value, if credentials are configured.
#[must_use]
pub fn authorization_header(auth: Option<&AuthConfig>) -> Option<String> {
    let auth = auth?;
    let encoded = base64::engine::general_purpose::STANDARD
        .encode(format!("{}:{}", auth.username, auth.password));
    Some(format!("Basic {encoded}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_header() {
        let auth = AuthConfig::new("Aladdin", "open sesame");
        assert_eq!(
            authorization_header(Some(&auth)).as_deref(),
            Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")
        );
    }

    #[test]
    fn test_no_credentials() {
        assert!(authorization_header(None).is_none());
    }
}
