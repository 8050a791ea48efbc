//! `Set-Cookie` construction.

use chrono::{DateTime, Duration, Utc};
use cookie::time::OffsetDateTime;
use cookie::{Cookie, SameSite as CookieSameSite};

use super::config::{SameSite, SessionConfig};

/// Attributes for an outgoing cookie.
#[derive(Debug, Clone, Default)]
pub struct CookieOptions {
    pub path: Option<String>,
    pub domain: Option<String>,
    /// Converted to an absolute `Expires` when the cookie is built.
    pub max_age: Option<Duration>,
    pub expires: Option<DateTime<Utc>>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl CookieOptions {
    /// Options for a freshly issued session cookie.
    pub fn session(config: &SessionConfig) -> Self {
        Self {
            path: Some(config.cookie_path.clone()),
            domain: config.cookie_domain.clone(),
            max_age: Some(config.session_lifetime),
            expires: None,
            secure: config.cookie_secure,
            http_only: config.cookie_http_only,
            same_site: Some(config.cookie_same_site),
        }
    }

    /// `max_age` wins over `expires` when both are set.
    fn expiry(&self) -> Option<DateTime<Utc>> {
        match self.max_age {
            Some(max_age) => Some(Utc::now() + max_age),
            None => self.expires,
        }
    }
}

/// Builds a cookie carrying an already encoded value.
pub fn build_cookie(name: &str, value: String, options: &CookieOptions) -> Cookie<'static> {
    let mut builder = Cookie::build((name.to_owned(), value))
        .secure(options.secure)
        .http_only(options.http_only);

    if let Some(ref path) = options.path {
        builder = builder.path(path.clone());
    }
    if let Some(ref domain) = options.domain {
        builder = builder.domain(domain.clone());
    }
    if let Some(same_site) = options.same_site {
        builder = builder.same_site(to_cookie_same_site(same_site));
    }
    if let Some(expires) = options.expiry().and_then(to_offset_date_time) {
        builder = builder.expires(expires);
    }

    builder.build()
}

/// Builds an empty cookie that expired at the Unix epoch.
///
/// The output does not depend on the current time, so clearing the same
/// cookie twice yields identical headers.
pub fn build_removal_cookie(name: &str, path: &str) -> Cookie<'static> {
    Cookie::build((name.to_owned(), String::new()))
        .path(path.to_owned())
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

fn to_cookie_same_site(same_site: SameSite) -> CookieSameSite {
    match same_site {
        SameSite::None => CookieSameSite::None,
        SameSite::Lax => CookieSameSite::Lax,
        SameSite::Strict => CookieSameSite::Strict,
    }
}

fn to_offset_date_time(at: DateTime<Utc>) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(at.timestamp()).ok()
}
