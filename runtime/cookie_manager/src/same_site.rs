use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// The `SameSite` attribute of a cookie.
///
/// It restricts when the cookie is sent along with cross-site requests.
/// A cookie without a `SameSite` attribute is represented as `Option::<SameSite>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SameSite {
    /// The cookie is sent on same-site requests and on top-level cross-site navigations.
    Lax,
    /// The cookie is only sent on same-site requests.
    Strict,
    /// The cookie is sent on both same-site and cross-site requests.
    None,
}

impl SameSite {
    /// Parse a `SameSite` value, ignoring ASCII case.
    ///
    /// ```rust
    /// use cookie_manager::SameSite;
    ///
    /// assert_eq!(SameSite::parse("LAX").unwrap(), SameSite::Lax);
    /// assert_eq!(SameSite::parse("strict").unwrap(), SameSite::Strict);
    /// assert!(SameSite::parse("sometimes").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.eq_ignore_ascii_case("lax") {
            Ok(Self::Lax)
        } else if value.eq_ignore_ascii_case("strict") {
            Ok(Self::Strict)
        } else if value.eq_ignore_ascii_case("none") {
            Ok(Self::None)
        } else {
            Err(ValidationError::InvalidSameSite {
                value: value.to_ascii_lowercase(),
            })
        }
    }

    /// The value used for this restriction in a `Set-Cookie` header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lax => "lax",
            Self::Strict => "strict",
            Self::None => "none",
        }
    }
}

impl FromStr for SameSite {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for SameSite {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for SameSite {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SameSiteVisitor;

        impl serde::de::Visitor<'_> for SameSiteVisitor {
            type Value = SameSite;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("one of `lax`, `strict` or `none`")
            }

            fn visit_str<E>(self, value: &str) -> Result<SameSite, E>
            where
                E: serde::de::Error,
            {
                SameSite::parse(value)
                    .map_err(|_| E::unknown_variant(value, &["lax", "strict", "none"]))
            }
        }

        deserializer.deserialize_str(SameSiteVisitor)
    }
}
