//! Normalization of cookie expiration times.
//!
//! Every expiration input ends up as a Unix timestamp (in seconds), with `0`
//! reserved for session cookies. See [`normalize_expiry`] for the accepted inputs.
use std::fmt;

use jiff::civil::{Date, DateTime};
use jiff::fmt::friendly::SpanParser;
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};

use crate::errors::ValidationError;

/// The format used for dates in `Set-Cookie` headers, e.g. `Wed, 21-Nov-2018 20:48:57 GMT`.
pub(crate) const COOKIE_DATE_FORMAT: &str = "%a, %d-%b-%Y %H:%M:%S GMT";

static SPAN_PARSER: SpanParser = SpanParser::new();

/// When a cookie should expire, as provided by the caller.
///
/// It is turned into a Unix timestamp by [`normalize_expiry`].
///
/// ```rust
/// use cookie_manager::Expiry;
///
/// let session = Expiry::Session;
/// let absolute = Expiry::from(1_542_833_337);
/// let relative = Expiry::from("+1 day");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Expiry {
    /// No expiration time: the client drops the cookie when its session ends.
    #[default]
    Session,
    /// A Unix timestamp, in seconds.
    ///
    /// Zero or negative values are equivalent to [`Expiry::Session`].
    /// Timestamps beyond the last date `jiff` can represent are kept as they are,
    /// but their `expires` attribute is rendered as that last date.
    Unix(i64),
    /// An absolute point in time.
    At(Timestamp),
    /// A textual date, either absolute (`2018-11-21T20:48:57Z`) or
    /// relative to the current time (`+1 year`, `-1 hour`, `now`).
    Expression(String),
}

impl From<i64> for Expiry {
    fn from(value: i64) -> Self {
        Self::Unix(value)
    }
}

impl From<i32> for Expiry {
    fn from(value: i32) -> Self {
        Self::Unix(value.into())
    }
}

impl From<u32> for Expiry {
    fn from(value: u32) -> Self {
        Self::Unix(value.into())
    }
}

impl From<&str> for Expiry {
    fn from(value: &str) -> Self {
        Self::Expression(value.to_owned())
    }
}

impl From<String> for Expiry {
    fn from(value: String) -> Self {
        Self::Expression(value)
    }
}

impl From<Timestamp> for Expiry {
    fn from(value: Timestamp) -> Self {
        Self::At(value)
    }
}

impl From<Zoned> for Expiry {
    fn from(value: Zoned) -> Self {
        Self::At(value.timestamp())
    }
}

impl From<&Zoned> for Expiry {
    fn from(value: &Zoned) -> Self {
        Self::At(value.timestamp())
    }
}

/// Turn an [`Expiry`] into a Unix timestamp (in seconds).
///
/// - [`Expiry::Session`] is `0`.
/// - [`Expiry::Unix`] and [`Expiry::At`] are taken as they are.
/// - [`Expiry::Expression`] is parsed, in order, as:
///   - a number, interpreted as a Unix timestamp (fractional seconds are truncated);
///   - one of the keywords `now`, `today`, `midnight`, `tomorrow` or `yesterday`
///     (all but `now` resolve to the start of the relevant UTC day);
///   - a signed span, e.g. `+1 year`, `-1 hour`, `2 days`, `3 weeks ago`.
///     Calendar units are added with calendar arithmetic in UTC;
///   - an absolute date, in one of RFC 3339, RFC 2822, the cookie date format
///     (`Wed, 21-Nov-2018 20:48:57 GMT`), a civil date-time or a civil date.
///     Civil dates are interpreted in UTC.
///
/// Relative expressions are evaluated against `now`.
/// Results before the Unix epoch are clamped to `0`.
pub fn normalize_expiry(expiry: &Expiry, now: Timestamp) -> Result<i64, ValidationError> {
    let seconds = match expiry {
        Expiry::Session => 0,
        Expiry::Unix(seconds) => *seconds,
        Expiry::At(timestamp) => timestamp.as_second(),
        Expiry::Expression(expression) => parse_expression(expression, now)?,
    };
    Ok(seconds.max(0))
}

/// Numbers with a fractional part or an exponent (`1.5`, `1e3`) are truncated toward zero.
fn parse_decimal(expression: &str) -> Option<i64> {
    let value = expression.parse::<f64>().ok()?.trunc();
    // `i64::MAX as f64` rounds up to 2^63, which is out of range.
    (value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64)
        .then_some(value as i64)
}

fn parse_expression(input: &str, now: Timestamp) -> Result<i64, ValidationError> {
    let invalid = |source: Option<jiff::Error>| ValidationError::InvalidExpiry {
        input: input.to_owned(),
        source,
    };
    let expression = input.trim();
    if expression.is_empty() {
        return Err(invalid(None));
    }
    if let Ok(seconds) = expression.parse::<i64>() {
        return Ok(seconds);
    }
    if let Some(seconds) = parse_decimal(expression) {
        return Ok(seconds);
    }

    let today = now.to_zoned(TimeZone::UTC);
    let keyword = match expression.to_ascii_lowercase().as_str() {
        "now" => Some(Ok(today.clone())),
        "today" | "midnight" => Some(today.start_of_day()),
        "tomorrow" => Some(today.tomorrow().and_then(|z| z.start_of_day())),
        "yesterday" => Some(today.yesterday().and_then(|z| z.start_of_day())),
        _ => None,
    };
    if let Some(resolved) = keyword {
        return resolved
            .map(|z| z.timestamp().as_second())
            .map_err(|e| invalid(Some(e)));
    }

    match SPAN_PARSER.parse_span(expression) {
        Ok(span) => {
            return today
                .checked_add(span)
                .map(|z| z.timestamp().as_second())
                .map_err(|e| invalid(Some(e)));
        }
        Err(e) => tracing::trace!(error = %e, "`{expression}` is not a relative expiration time"),
    }

    parse_absolute(expression)
        .map(|t| t.as_second())
        .map_err(|e| invalid(Some(e)))
}

fn parse_absolute(expression: &str) -> Result<Timestamp, jiff::Error> {
    if let Ok(timestamp) = expression.parse::<Timestamp>() {
        return Ok(timestamp);
    }
    if let Ok(zoned) = jiff::fmt::rfc2822::parse(expression) {
        return Ok(zoned.timestamp());
    }
    if let Ok(timestamp) = jiff::fmt::strtime::parse(COOKIE_DATE_FORMAT, expression)
        .and_then(|broken_down| broken_down.to_datetime())
        .and_then(|datetime| datetime.to_zoned(TimeZone::UTC))
        .map(|zoned| zoned.timestamp())
    {
        return Ok(timestamp);
    }
    if let Ok(datetime) = expression.parse::<DateTime>() {
        return datetime.to_zoned(TimeZone::UTC).map(|z| z.timestamp());
    }
    expression
        .parse::<Date>()?
        .to_zoned(TimeZone::UTC)
        .map(|z| z.timestamp())
}

/// Render a Unix timestamp using the cookie date format.
pub(crate) fn format_cookie_date(seconds: i64) -> String {
    let timestamp = Timestamp::from_second(seconds).unwrap_or(if seconds < 0 {
        Timestamp::MIN
    } else {
        Timestamp::MAX
    });
    timestamp.strftime(COOKIE_DATE_FORMAT).to_string()
}

impl serde::Serialize for Expiry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Expiry::Session => serializer.serialize_i64(0),
            Expiry::Unix(seconds) => serializer.serialize_i64(*seconds),
            Expiry::At(timestamp) => serializer.serialize_i64(timestamp.as_second()),
            Expiry::Expression(expression) => serializer.serialize_str(expression),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Expiry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ExpiryVisitor;

        impl serde::de::Visitor<'_> for ExpiryVisitor {
            type Value = Expiry;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a Unix timestamp or a date expression")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Expiry, E>
            where
                E: serde::de::Error,
            {
                Ok(Expiry::Unix(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Expiry, E>
            where
                E: serde::de::Error,
            {
                i64::try_from(value)
                    .map(Expiry::Unix)
                    .map_err(|_| E::invalid_value(serde::de::Unexpected::Unsigned(value), &self))
            }

            fn visit_str<E>(self, value: &str) -> Result<Expiry, E>
            where
                E: serde::de::Error,
            {
                Ok(Expiry::Expression(value.to_owned()))
            }

            fn visit_unit<E>(self) -> Result<Expiry, E>
            where
                E: serde::de::Error,
            {
                Ok(Expiry::Session)
            }
        }

        deserializer.deserialize_any(ExpiryVisitor)
    }
}
