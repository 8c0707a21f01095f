//! Verify that defaults are applied, and overridden, as expected.
use cookie_manager::{
    Cookie, CookieConfig, CookieManager, CookieOverrides, Expiry, SameSite, ValidationError,
};
use googletest::{
    expect_that,
    prelude::{eq, none, some},
};

use crate::{NOW, now};

fn custom_config() -> CookieConfig {
    let mut config = CookieConfig::default();
    config.expire = Expiry::from("+1 day");
    config.path = "/foo".into();
    config.domain = Some("example.com".into());
    config.secure = true;
    config.http_only = false;
    config.raw = true;
    config.same_site = Some(SameSite::Strict);
    config
}

#[googletest::test]
fn configured_defaults_are_applied_by_create() {
    let manager = CookieManager::new_at(custom_config(), now()).unwrap();
    let cookie = manager
        .create_at("foo", "bar", CookieOverrides::new(), now())
        .unwrap();

    expect_that!(cookie.expire(), eq(NOW + 86_400));
    expect_that!(cookie.max_age_at(now()), eq(86_400_i64));
    expect_that!(cookie.is_cleared_at(now()), eq(false));
    expect_that!(cookie.path(), eq("/foo"));
    expect_that!(cookie.domain(), some(eq("example.com")));
    expect_that!(cookie.secure(), eq(true));
    expect_that!(cookie.http_only(), eq(false));
    expect_that!(cookie.raw(), eq(true));
    expect_that!(cookie.same_site(), some(eq(SameSite::Strict)));
}

#[googletest::test]
fn configured_defaults_are_applied_by_forever() {
    let manager = CookieManager::new_at(custom_config(), now()).unwrap();
    let cookie = manager
        .forever_at("foo", "bar", CookieOverrides::new(), now())
        .unwrap();

    // 2019 is not a leap year.
    expect_that!(cookie.expire(), eq(NOW + 365 * 86_400));
    expect_that!(cookie.max_age_at(now()), eq(365 * 86_400_i64));
    expect_that!(cookie.is_cleared_at(now()), eq(false));
    expect_that!(cookie.path(), eq("/foo"));
    expect_that!(cookie.domain(), some(eq("example.com")));
    expect_that!(cookie.secure(), eq(true));
    expect_that!(cookie.http_only(), eq(false));
    expect_that!(cookie.same_site(), some(eq(SameSite::Strict)));
}

#[googletest::test]
fn configured_defaults_are_applied_by_forget() {
    let manager = CookieManager::new_at(custom_config(), now()).unwrap();
    let cookie = manager.forget_at("foo", None, None, now()).unwrap();

    expect_that!(cookie.value(), eq(""));
    expect_that!(cookie.expire(), eq(NOW - 3600));
    expect_that!(cookie.max_age_at(now()), eq(0_i64));
    expect_that!(cookie.is_cleared_at(now()), eq(true));
    expect_that!(cookie.path(), eq("/foo"));
    expect_that!(cookie.domain(), some(eq("example.com")));
    expect_that!(cookie.secure(), eq(true));
    expect_that!(cookie.http_only(), eq(false));
    expect_that!(cookie.same_site(), some(eq(SameSite::Strict)));
}

#[googletest::test]
fn create_with_default_manager() {
    let cookie = CookieManager::default()
        .create("foo", "bar", CookieOverrides::new())
        .unwrap();

    expect_that!(cookie.to_string(), eq("foo=bar; path=/; httponly; samesite=lax"));
    expect_that!(cookie.name(), eq("foo"));
    expect_that!(cookie.value(), eq("bar"));
    expect_that!(cookie.expire(), eq(0_i64));
    expect_that!(cookie.max_age(), eq(0_i64));
    expect_that!(cookie.is_cleared(), eq(false));
    expect_that!(cookie.path(), eq("/"));
    expect_that!(cookie.domain(), none());
    expect_that!(cookie.secure(), eq(false));
    expect_that!(cookie.http_only(), eq(true));
    expect_that!(cookie.same_site(), some(eq(SameSite::Lax)));
}

#[test]
fn default_manager_matches_default_config() {
    let from_config = CookieManager::new(CookieConfig::default()).unwrap();
    let default = CookieManager::default();
    let overrides = CookieOverrides::new();
    assert_eq!(
        from_config.create("foo", "bar", overrides.clone()).unwrap(),
        default.create("foo", "bar", overrides).unwrap()
    );
}

#[test]
fn forever_renders_a_one_year_expiry() {
    let cookie = CookieManager::default()
        .forever_at("foo", "bar", CookieOverrides::new(), now())
        .unwrap();
    assert_eq!(
        cookie.render_at(now()),
        "foo=bar; expires=Thu, 21-Nov-2019 20:48:57 GMT; Max-Age=31536000; path=/; httponly; samesite=lax"
    );
}

#[test]
fn forever_from_a_leap_day_lands_on_february_28th() {
    let leap_day: jiff::Timestamp = "2024-02-29T12:00:00Z".parse().unwrap();
    let cookie = CookieManager::default()
        .forever_at("foo", "bar", CookieOverrides::new(), leap_day)
        .unwrap();
    let expected: jiff::Timestamp = "2025-02-28T12:00:00Z".parse().unwrap();
    assert_eq!(cookie.expire(), expected.as_second());
}

#[test]
fn forget_produces_a_clearing_cookie() {
    let manager = CookieManager::default();
    let cookie = manager.forget("foo", None, None).unwrap();
    assert!(cookie.is_cleared());
    assert!(cookie.to_string().starts_with("foo=deleted; expires="));

    let cookie = manager.forget_at("foo", None, None, now()).unwrap();
    assert_eq!(cookie.expire(), NOW - 3600);
    assert_eq!(
        cookie.render_at(now()),
        "foo=deleted; expires=Tue, 21-Nov-2017 20:48:56 GMT; Max-Age=0; path=/; httponly; samesite=lax"
    );
}

#[test]
fn forget_can_target_a_path_and_domain() {
    let cookie = CookieManager::default()
        .forget("foo", Some("/admin".into()), Some("example.com".into()))
        .unwrap();
    assert_eq!(cookie.path(), "/admin");
    assert_eq!(cookie.domain(), Some("example.com"));
}

#[test]
fn overrides_take_precedence_over_defaults() {
    let manager = CookieManager::new_at(custom_config(), now()).unwrap();
    let overrides = CookieOverrides::new()
        .set_expire(Expiry::Session)
        .set_path("/bar")
        .set_domain("rust-lang.org")
        .set_secure(false)
        .set_http_only(true)
        .set_raw(false)
        .set_same_site(SameSite::None);
    let cookie = manager.create_at("foo", "bar", overrides, now()).unwrap();
    assert_eq!(
        cookie.render_at(now()),
        "foo=bar; path=/bar; domain=rust-lang.org; httponly; samesite=none"
    );
}

#[test]
fn same_site_overrides_can_be_parsed_from_strings() {
    let overrides = CookieOverrides::new().set_same_site_str("STRICT").unwrap();
    let cookie = CookieManager::default()
        .create("foo", "bar", overrides)
        .unwrap();
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));

    let err = CookieOverrides::new()
        .set_same_site_str("invalid")
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidSameSite { .. }));
}

#[test]
fn invalid_default_expiry_is_rejected() {
    let mut config = CookieConfig::default();
    config.expire = "never".into();
    let err = CookieManager::new(config).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidExpiry { .. }));
}

#[test]
fn invalid_default_same_site_is_rejected() {
    let err = serde_json::from_str::<CookieConfig>(r#"{ "same_site": "invalid" }"#).unwrap_err();
    assert!(err.to_string().contains("unknown variant `invalid`"));
}

#[test]
fn empty_default_path_is_replaced_by_root() {
    let mut config = CookieConfig::default();
    config.path = String::new();
    let manager = CookieManager::new(config).unwrap();
    let cookie = manager.create("foo", "bar", CookieOverrides::new()).unwrap();
    assert_eq!(cookie.path(), "/");
}

#[test]
fn manager_can_be_configured_from_a_file() {
    let config: CookieConfig = serde_json::from_str(
        r#"{ "expire": 0, "path": "/app", "secure": true, "same_site": null }"#,
    )
    .unwrap();
    let manager = CookieManager::new(config).unwrap();
    let cookie: Cookie = manager.create("foo", "bar", CookieOverrides::new()).unwrap();
    assert_eq!(cookie.to_string(), "foo=bar; path=/app; secure; httponly");
}

#[test]
fn invalid_names_are_rejected_by_the_manager() {
    let manager = CookieManager::default();
    let err = manager
        .create("", "bar", CookieOverrides::new())
        .unwrap_err();
    assert!(matches!(err, ValidationError::EmptyName));

    let err = manager
        .create(",foo", "bar", CookieOverrides::new().set_raw(true))
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidName { .. }));
}
