/*!
Build, validate and queue HTTP cookies.

# Overview

This crate takes care of the server side of the `Set-Cookie` header:

- [`Cookie`] is a validated, immutable cookie that knows how to render itself
  as a `Set-Cookie` header value (via its [`Display`](std::fmt::Display) implementation).
- [`CookieManager`] builds cookies on top of a set of default attributes ([`CookieConfig`])
  and keeps a queue of the cookies that should be attached to the outgoing response.

Writing the queued cookies into the response, as well as parsing the `Cookie` header
of incoming requests, is left to the HTTP layer.

# Quickstart

```rust
use cookie_manager::{CookieConfig, CookieManager, CookieOverrides, SameSite};

let mut config = CookieConfig::default();
config.secure = true;
config.same_site = Some(SameSite::Strict);
let mut manager = CookieManager::new(config).unwrap();

// A cookie that uses the manager's defaults...
let cookie = manager.create("theme", "dark", CookieOverrides::new()).unwrap();
assert_eq!(cookie.to_string(), "theme=dark; path=/; secure; httponly; samesite=strict");
manager.add_to_queue(cookie);

// ...one that expires in a year...
let cookie = manager.forever("locale", "en", CookieOverrides::new()).unwrap();
manager.add_to_queue(cookie);

// ...and one that tells the client to drop its `session` cookie.
let cookie = manager.forget("session", None, None).unwrap();
assert!(cookie.is_cleared());
manager.add_to_queue(cookie);

// One `Set-Cookie` header per queued cookie.
assert_eq!(manager.queued_header_values().count(), 3);
```

# Expiration times

Expiration times are stored as Unix timestamps, with `0` meaning "session cookie".
They can be provided as timestamps, as [`jiff::Timestamp`]s or as date expressions,
either absolute or relative to the current time (e.g. `+1 day`).
Check out [`normalize_expiry`] for the details.
*/
mod config;
mod cookie;
pub mod errors;
mod expiry;
mod manager;
mod same_site;

pub use config::CookieConfig;
pub use cookie::{Cookie, CookieAttributes};
pub use errors::ValidationError;
pub use expiry::{Expiry, normalize_expiry};
pub use manager::{CookieManager, CookieOverrides};
pub use same_site::SameSite;
