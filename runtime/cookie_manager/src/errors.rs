//! Errors that can occur when building cookies or configuring a [`CookieManager`].
//!
//! [`CookieManager`]: crate::CookieManager

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error type returned when a cookie (or the defaults of a [`CookieManager`])
/// can't be validated.
///
/// Validation is eager: a [`Cookie`] either comes out of its constructor fully
/// valid or it isn't built at all.
///
/// [`CookieManager`]: crate::CookieManager
/// [`Cookie`]: crate::Cookie
pub enum ValidationError {
    /// The cookie name is empty.
    #[error("Cookie name cannot be empty.")]
    EmptyName,
    /// A raw cookie name contains characters that can't be emitted verbatim
    /// in a `Set-Cookie` header.
    #[error("Cookie name \"{name}\" contains invalid characters.")]
    InvalidName {
        /// The offending cookie name.
        name: String,
    },
    /// The expiration time is neither a number nor a date expression we know how to parse.
    #[error("Cookie expiration time \"{input}\" is not valid.")]
    InvalidExpiry {
        /// The expiration input, as it was provided.
        input: String,
        /// The error returned by the last parser we tried, if any.
        #[source]
        source: Option<jiff::Error>,
    },
    /// The `SameSite` value is not one of `lax`, `strict` or `none`.
    #[error(
        "Cookie sameSite parameter \"{value}\" is not valid. Must be \"lax\", \"strict\" or \"none\"."
    )]
    InvalidSameSite {
        /// The offending value, lower-cased.
        value: String,
    },
}
