use indexmap::IndexMap;
use jiff::Timestamp;

use crate::config::CookieConfig;
use crate::cookie::{Cookie, CookieAttributes};
use crate::errors::ValidationError;
use crate::expiry::{Expiry, normalize_expiry};
use crate::same_site::SameSite;

/// The expiration time used by [`CookieManager::forever`].
const FOREVER: &str = "+1 year";
/// The expiration time used by [`CookieManager::forget`].
const FORGET: &str = "-1 hour";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Per-call attributes for the cookies built by a [`CookieManager`].
///
/// Every field left to `None` falls back to the manager's default.
///
/// ```rust
/// use cookie_manager::{CookieManager, CookieOverrides};
///
/// let manager = CookieManager::default();
/// let overrides = CookieOverrides::new().set_path("/admin").set_secure(true);
/// let cookie = manager.create("id", "42", overrides).unwrap();
/// assert_eq!(cookie.path(), "/admin");
/// assert!(cookie.secure());
/// // Not overridden, taken from the manager.
/// assert!(cookie.http_only());
/// ```
pub struct CookieOverrides {
    /// When the cookie expires.
    pub expire: Option<Expiry>,
    /// The `Path` attribute.
    pub path: Option<String>,
    /// The `Domain` attribute.
    pub domain: Option<String>,
    /// The `Secure` attribute.
    pub secure: Option<bool>,
    /// The `HttpOnly` attribute.
    pub http_only: Option<bool>,
    /// Whether the name and value are emitted verbatim.
    pub raw: Option<bool>,
    /// The `SameSite` attribute.
    pub same_site: Option<SameSite>,
}

impl CookieOverrides {
    /// Use the manager's defaults for every attribute.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the expiration time.
    pub fn set_expire<E: Into<Expiry>>(mut self, expire: E) -> Self {
        self.expire = Some(expire.into());
        self
    }

    /// Override the `Path` attribute.
    pub fn set_path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Override the `Domain` attribute.
    pub fn set_domain<D: Into<String>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Override the `Secure` attribute.
    pub fn set_secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Override the `HttpOnly` attribute.
    pub fn set_http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    /// Override whether the name and value are emitted verbatim.
    pub fn set_raw(mut self, raw: bool) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Override the `SameSite` attribute.
    pub fn set_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Override the `SameSite` attribute with a case-insensitive `lax`, `strict` or `none`.
    pub fn set_same_site_str(self, same_site: &str) -> Result<Self, ValidationError> {
        let same_site = SameSite::parse(same_site)?;
        Ok(self.set_same_site(same_site))
    }
}

#[derive(Debug, Clone)]
/// Builds cookies on top of a set of default attributes and keeps track of the
/// cookies that should be sent with the response.
///
/// The defaults are usually shared across the application, while the queue
/// is scoped to a single request: build one manager per request, or clone
/// a pre-configured one.
///
/// # Queueing cookies
///
/// Queued cookies are keyed by name: queueing a cookie replaces any queued
/// cookie with the same name, regardless of its other attributes.
///
/// ```rust
/// use cookie_manager::{CookieManager, CookieOverrides};
///
/// let mut manager = CookieManager::default();
/// let cookie = manager.create("flavour", "chocolate", CookieOverrides::new()).unwrap();
/// manager.add_to_queue(cookie);
/// let cookie = manager.create("flavour", "vanilla", CookieOverrides::new()).unwrap();
/// manager.add_to_queue(cookie);
///
/// assert_eq!(manager.all_queued().len(), 1);
/// assert_eq!(manager.get_queued("flavour").unwrap().value(), "vanilla");
/// ```
pub struct CookieManager {
    defaults: Defaults,
    queued: IndexMap<String, Cookie>,
}

/// [`CookieConfig`], after validation.
#[derive(Debug, Clone)]
struct Defaults {
    expire: i64,
    path: String,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
    raw: bool,
    same_site: Option<SameSite>,
}

impl Default for CookieManager {
    fn default() -> Self {
        let CookieConfig {
            expire: _,
            path,
            domain,
            secure,
            http_only,
            raw,
            same_site,
        } = CookieConfig::default();
        Self {
            defaults: Defaults {
                expire: 0,
                path,
                domain,
                secure,
                http_only,
                raw,
                same_site,
            },
            queued: IndexMap::new(),
        }
    }
}

impl CookieManager {
    /// Create a new manager with the given defaults and an empty queue.
    ///
    /// # Errors
    ///
    /// It fails if the default expiration time can't be understood.
    pub fn new(config: CookieConfig) -> Result<Self, ValidationError> {
        Self::new_at(config, Timestamp::now())
    }

    /// Same as [`CookieManager::new`], but a relative default expiration time
    /// is resolved against `now`.
    pub fn new_at(config: CookieConfig, now: Timestamp) -> Result<Self, ValidationError> {
        let CookieConfig {
            expire,
            path,
            domain,
            secure,
            http_only,
            raw,
            same_site,
        } = config;
        let expire = normalize_expiry(&expire, now)?;
        let path = if path.is_empty() { "/".into() } else { path };
        Ok(Self {
            defaults: Defaults {
                expire,
                path,
                domain,
                secure,
                http_only,
                raw,
                same_site,
            },
            queued: IndexMap::new(),
        })
    }

    /// Build a new cookie, using the manager's defaults for every attribute
    /// that isn't set in `overrides`.
    ///
    /// The cookie is **not** queued.
    pub fn create<N, V>(
        &self,
        name: N,
        value: V,
        overrides: CookieOverrides,
    ) -> Result<Cookie, ValidationError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.create_at(name, value, overrides, Timestamp::now())
    }

    /// Same as [`CookieManager::create`], resolving relative expiration times against `now`.
    pub fn create_at<N, V>(
        &self,
        name: N,
        value: V,
        overrides: CookieOverrides,
        now: Timestamp,
    ) -> Result<Cookie, ValidationError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        let CookieOverrides {
            expire,
            path,
            domain,
            secure,
            http_only,
            raw,
            same_site,
        } = overrides;
        let defaults = &self.defaults;
        let attributes = CookieAttributes {
            expire: expire.unwrap_or(Expiry::Unix(defaults.expire)),
            path: path.unwrap_or_else(|| defaults.path.clone()),
            domain: domain.or_else(|| defaults.domain.clone()),
            secure: secure.unwrap_or(defaults.secure),
            http_only: http_only.unwrap_or(defaults.http_only),
            raw: raw.unwrap_or(defaults.raw),
            same_site: same_site.or(defaults.same_site),
        };
        Cookie::with_attributes_at(name, value, attributes, now)
    }

    /// Build a cookie that expires one year from now.
    ///
    /// The year is added in UTC with calendar arithmetic, so February 29th
    /// plus one year is February 28th of the following year.
    /// Any expiration time set in `overrides` is ignored.
    pub fn forever<N, V>(
        &self,
        name: N,
        value: V,
        overrides: CookieOverrides,
    ) -> Result<Cookie, ValidationError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.forever_at(name, value, overrides, Timestamp::now())
    }

    /// Same as [`CookieManager::forever`], one year from `now`.
    pub fn forever_at<N, V>(
        &self,
        name: N,
        value: V,
        overrides: CookieOverrides,
        now: Timestamp,
    ) -> Result<Cookie, ValidationError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.create_at(name, value, overrides.set_expire(FOREVER), now)
    }

    /// Build a cookie that clears the cookie named `name` on the client.
    ///
    /// Its value is empty and it expired one hour ago.
    pub fn forget<N>(
        &self,
        name: N,
        path: Option<String>,
        domain: Option<String>,
    ) -> Result<Cookie, ValidationError>
    where
        N: Into<String>,
    {
        self.forget_at(name, path, domain, Timestamp::now())
    }

    /// Same as [`CookieManager::forget`], one hour before `now`.
    pub fn forget_at<N>(
        &self,
        name: N,
        path: Option<String>,
        domain: Option<String>,
        now: Timestamp,
    ) -> Result<Cookie, ValidationError>
    where
        N: Into<String>,
    {
        let overrides = CookieOverrides {
            expire: Some(FORGET.into()),
            path,
            domain,
            ..Default::default()
        };
        self.create_at(name, "", overrides, now)
    }

    /// The queued cookie named `name`, if there is one.
    pub fn get_queued(&self, name: &str) -> Option<&Cookie> {
        self.queued.get(name)
    }

    /// The queued cookie named `name`, or `default` if there is none.
    pub fn get_queued_or<'a>(&'a self, name: &str, default: &'a Cookie) -> &'a Cookie {
        self.get_queued(name).unwrap_or(default)
    }

    /// All queued cookies, keyed by name, in the order they were first queued.
    pub fn all_queued(&self) -> &IndexMap<String, Cookie> {
        &self.queued
    }

    /// `true` if a cookie named `name` is queued.
    pub fn has_queued(&self, name: &str) -> bool {
        self.get_queued(name).is_some()
    }

    /// Queue `cookie` to be sent with the response.
    ///
    /// If a cookie with the same name is already queued, it's replaced
    /// (keeping its position in the queue) and returned.
    pub fn add_to_queue(&mut self, cookie: Cookie) -> Option<Cookie> {
        let replaced = self.queued.insert(cookie.name().to_owned(), cookie);
        if let Some(replaced) = &replaced {
            tracing::debug!(
                cookie.name = %replaced.name(),
                "Replaced a queued cookie with the same name."
            );
        }
        replaced
    }

    /// Remove the cookie named `name` from the queue, returning it.
    ///
    /// Nothing happens if there is no such cookie.
    pub fn remove_from_queue(&mut self, name: &str) -> Option<Cookie> {
        let removed = self.queued.shift_remove(name);
        if removed.is_none() {
            tracing::trace!(cookie.name = %name, "There was no queued cookie to remove. This is a no-op.");
        }
        removed
    }

    /// The `Set-Cookie` header values for the queued cookies, in queue order.
    pub fn queued_header_values(&self) -> impl Iterator<Item = String> + '_ {
        self.queued.values().map(|cookie| cookie.to_string())
    }

    /// Empty the queue, yielding the queued cookies in queue order.
    pub fn drain_queued(&mut self) -> impl Iterator<Item = Cookie> + '_ {
        self.queued.drain(..).map(|(_, cookie)| cookie)
    }
}
