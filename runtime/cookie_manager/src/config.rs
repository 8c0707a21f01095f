use crate::expiry::Expiry;
use crate::same_site::SameSite;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// The default attributes applied by a [`CookieManager`] to the cookies it builds.
///
/// Every field can be omitted when deserializing, falling back to its default value.
///
/// [`CookieManager`]: crate::CookieManager
pub struct CookieConfig {
    /// When cookies expire.
    ///
    /// Relative expressions (e.g. `+1 day`) are resolved once, when the
    /// [`CookieManager`](crate::CookieManager) is built.
    ///
    /// By default, cookies are session cookies.
    #[serde(default)]
    pub expire: Expiry,
    /// Set the `Path` attribute.
    ///
    /// By default, the attribute is set to `/`. An empty path is replaced by `/`.
    #[serde(default = "default_cookie_path")]
    pub path: String,
    /// Set the `Domain` attribute.
    ///
    /// By default, the attribute is not set.
    #[serde(default)]
    pub domain: Option<String>,
    /// Set the `Secure` attribute.
    ///
    /// If the cookie is marked as `Secure`, it will only be transmitted when the connection is secure (e.g. over HTTPS).
    ///
    /// Default is `false`.
    #[serde(default)]
    pub secure: bool,
    /// Set the `HttpOnly` attribute.
    ///
    /// If the cookie is marked as `HttpOnly`, it will not be visible to JavaScript
    /// snippets running in the browser.
    ///
    /// Default is `true`.
    #[serde(default = "default_cookie_http_only")]
    pub http_only: bool,
    /// Emit cookie names and values verbatim, without percent-encoding.
    ///
    /// Default is `false`.
    #[serde(default)]
    pub raw: bool,
    /// Set the [`SameSite`] attribute.
    ///
    /// By default, the attribute is set to [`SameSite::Lax`].
    #[serde(default = "default_cookie_same_site")]
    pub same_site: Option<SameSite>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            expire: Expiry::Session,
            path: default_cookie_path(),
            domain: None,
            secure: false,
            http_only: default_cookie_http_only(),
            raw: false,
            same_site: default_cookie_same_site(),
        }
    }
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_cookie_http_only() -> bool {
    true
}

fn default_cookie_same_site() -> Option<SameSite> {
    Some(SameSite::Lax)
}
