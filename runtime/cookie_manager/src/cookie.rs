use std::fmt::{self, Write as _};

use jiff::Timestamp;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::errors::ValidationError;
use crate::expiry::{Expiry, format_cookie_date, normalize_expiry};
use crate::same_site::SameSite;

/// How far in the past the `expires` attribute of a clearing cookie is set, in seconds.
///
/// One year and one second.
const CLEARING_OFFSET: i64 = 31_536_001;

/// Everything but the unreserved characters of RFC 3986.
const VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Characters that can't appear in the name of a raw cookie.
const RAW_NAME_FORBIDDEN: &[char] = &[
    '/', '[', ']', '=', ',', ';', ' ', '\t', '\r', '\n', '\x0B', '\x0C',
];

#[derive(Debug, Clone, PartialEq, Eq)]
/// The attributes of a [`Cookie`], everything but its name and value.
///
/// The defaults match the ones used by [`Cookie::new`]:
/// a session cookie, scoped to `/`, `HttpOnly`, percent-encoded,
/// without a `Domain` nor a `SameSite` attribute.
///
/// ```rust
/// use cookie_manager::{Cookie, CookieAttributes, SameSite};
///
/// let attributes = CookieAttributes::default()
///     .set_expire("+1 day")
///     .set_path("/admin")
///     .set_secure(true)
///     .set_same_site(SameSite::Strict);
/// let cookie = Cookie::with_attributes("id", "42", attributes).unwrap();
/// assert_eq!(cookie.path(), "/admin");
/// ```
pub struct CookieAttributes {
    /// When the cookie expires. See [`normalize_expiry`](crate::normalize_expiry).
    pub expire: Expiry,
    /// The `Path` attribute. An empty path is replaced by `/`.
    pub path: String,
    /// The `Domain` attribute.
    pub domain: Option<String>,
    /// The `Secure` attribute.
    pub secure: bool,
    /// The `HttpOnly` attribute.
    pub http_only: bool,
    /// If `true`, the name and the value are emitted without any encoding.
    pub raw: bool,
    /// The `SameSite` attribute.
    pub same_site: Option<SameSite>,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            expire: Expiry::Session,
            path: "/".into(),
            domain: None,
            secure: false,
            http_only: true,
            raw: false,
            same_site: None,
        }
    }
}

impl CookieAttributes {
    /// Set the expiration time.
    pub fn set_expire<E: Into<Expiry>>(mut self, expire: E) -> Self {
        self.expire = expire.into();
        self
    }

    /// Set the `Path` attribute.
    pub fn set_path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }

    /// Set the `Domain` attribute.
    pub fn set_domain<D: Into<String>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the `Secure` attribute.
    pub fn set_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the `HttpOnly` attribute.
    pub fn set_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Opt in (or out) of emitting the name and value verbatim.
    pub fn set_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Set the `SameSite` attribute.
    pub fn set_same_site<S: Into<Option<SameSite>>>(mut self, same_site: S) -> Self {
        self.same_site = same_site.into();
        self
    }

    /// Set the `SameSite` attribute from its textual form, ignoring case.
    ///
    /// It fails if `same_site` is not one of `lax`, `strict` or `none`.
    pub fn set_same_site_str(self, same_site: &str) -> Result<Self, ValidationError> {
        let same_site = SameSite::parse(same_site)?;
        Ok(self.set_same_site(same_site))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A cookie to be sent to the client via the `Set-Cookie` header.
///
/// A `Cookie` is validated when it's built and it can't be changed afterwards.
/// Its [`Display`](fmt::Display) implementation renders the `Set-Cookie` header value.
///
/// ```rust
/// use cookie_manager::Cookie;
///
/// let cookie = Cookie::new("flavour", "chocolate chip").unwrap();
/// assert_eq!(cookie.to_string(), "flavour=chocolate%20chip; path=/; httponly");
/// ```
///
/// # Clearing cookies
///
/// A cookie with an empty value instructs the client to delete the cookie
/// with the same name: it is rendered with the `deleted` placeholder value
/// and an expiration date in the past, regardless of its own expiration time.
pub struct Cookie {
    name: String,
    value: String,
    expire: i64,
    path: String,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
    raw: bool,
    same_site: Option<SameSite>,
}

impl Cookie {
    /// Build a cookie using the default [`CookieAttributes`].
    pub fn new<N, V>(name: N, value: V) -> Result<Self, ValidationError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self::with_attributes(name, value, CookieAttributes::default())
    }

    /// Build a cookie with the given attributes.
    ///
    /// Relative expiration times are resolved against the current time.
    ///
    /// # Errors
    ///
    /// It fails if:
    ///
    /// - the name is empty;
    /// - the cookie is raw and its name contains one of `/[]=,;`, a space, a tab,
    ///   a carriage return, a line feed, a vertical tab or a form feed;
    /// - the expiration time can't be understood.
    pub fn with_attributes<N, V>(
        name: N,
        value: V,
        attributes: CookieAttributes,
    ) -> Result<Self, ValidationError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self::with_attributes_at(name, value, attributes, Timestamp::now())
    }

    /// Same as [`Cookie::with_attributes`], but relative expiration times are
    /// resolved against `now`.
    pub fn with_attributes_at<N, V>(
        name: N,
        value: V,
        attributes: CookieAttributes,
        now: Timestamp,
    ) -> Result<Self, ValidationError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let CookieAttributes {
            expire,
            path,
            domain,
            secure,
            http_only,
            raw,
            same_site,
        } = attributes;

        // Non-raw names are escaped when rendered, so they're not inspected further.
        if raw && name.contains(RAW_NAME_FORBIDDEN) {
            return Err(ValidationError::InvalidName { name });
        }
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let expire = normalize_expiry(&expire, now)?;
        let path = if path.is_empty() { "/".into() } else { path };

        tracing::trace!(cookie.name = %name, cookie.expire = expire, "Built a new cookie");
        Ok(Self {
            name,
            value: value.into(),
            expire,
            path,
            domain,
            secure,
            http_only,
            raw,
            same_site,
        })
    }

    /// The name of the cookie.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value of the cookie.
    ///
    /// An empty value marks a cookie that clears its namesake on the client.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The expiration time, as a Unix timestamp in seconds.
    ///
    /// It is `0` for session cookies.
    pub fn expire(&self) -> i64 {
        self.expire
    }

    /// The number of seconds until the cookie expires.
    ///
    /// It is `0` for session cookies and for cookies that have already expired.
    pub fn max_age(&self) -> i64 {
        self.max_age_at(Timestamp::now())
    }

    /// Same as [`Cookie::max_age`], computed against `now`.
    pub fn max_age_at(&self, now: Timestamp) -> i64 {
        self.expire.saturating_sub(now.as_second()).max(0)
    }

    /// `true` if the cookie has an expiration time and it is in the past.
    ///
    /// Session cookies are never cleared.
    pub fn is_cleared(&self) -> bool {
        self.is_cleared_at(Timestamp::now())
    }

    /// Same as [`Cookie::is_cleared`], computed against `now`.
    pub fn is_cleared_at(&self, now: Timestamp) -> bool {
        self.expire != 0 && self.expire < now.as_second()
    }

    /// The `Path` attribute. It is never empty.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The `Domain` attribute, if set.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// `true` if the cookie is only sent over secure connections.
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// `true` if the cookie is hidden from client-side scripts.
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// `true` if the name and value are emitted without any encoding.
    pub fn raw(&self) -> bool {
        self.raw
    }

    /// The `SameSite` attribute, if set.
    pub fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }

    /// Render the `Set-Cookie` header value for this cookie,
    /// computing `expires` and `Max-Age` against `now`.
    pub fn render_at(&self, now: Timestamp) -> String {
        let mut out = String::new();
        if self.raw {
            out.push_str(&self.name);
        } else {
            escape_name(&self.name, &mut out);
        }
        out.push('=');

        // `write!` on a `String` can't fail.
        if self.value.is_empty() {
            let expires = format_cookie_date(now.as_second() - CLEARING_OFFSET);
            let _ = write!(out, "deleted; expires={expires}; Max-Age=0");
        } else {
            if self.raw {
                out.push_str(&self.value);
            } else {
                let _ = write!(out, "{}", utf8_percent_encode(&self.value, VALUE_ENCODE_SET));
            }
            if self.expire != 0 {
                let _ = write!(
                    out,
                    "; expires={}; Max-Age={}",
                    format_cookie_date(self.expire),
                    self.max_age_at(now)
                );
            }
        }

        let _ = write!(out, "; path={}", self.path);
        if let Some(domain) = self.domain.as_deref().filter(|d| !d.is_empty()) {
            let _ = write!(out, "; domain={domain}");
        }
        if self.secure {
            out.push_str("; secure");
        }
        if self.http_only {
            out.push_str("; httponly");
        }
        if let Some(same_site) = self.same_site {
            let _ = write!(out, "; samesite={same_site}");
        }
        out
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_at(Timestamp::now()))
    }
}

/// Percent-encode the characters that would break the `name=value` pair.
fn escape_name(name: &str, out: &mut String) {
    for c in name.chars() {
        match c {
            '=' => out.push_str("%3D"),
            ',' => out.push_str("%2C"),
            ';' => out.push_str("%3B"),
            ' ' => out.push_str("%20"),
            '\t' => out.push_str("%09"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            '\x0B' => out.push_str("%0B"),
            '\x0C' => out.push_str("%0C"),
            c => out.push(c),
        }
    }
}
