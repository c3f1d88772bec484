//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the build-time content hash of a static asset.
///
/// Known assets are `css`, `blog_js` and `checkout_js`; anything else yields
/// an empty string (and so the unhashed file name).
///
/// Usage in templates: `<link href="/static/css/derived/main.{{ "css"|asset_hash }}.css">`
#[askama::filter_fn]
pub fn asset_hash(asset: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(hash_for(&asset.to_string()))
}

/// Formats an estimated read time in minutes.
///
/// Usage in templates: `{{ post.estimate_read_time|read_time }}`
#[askama::filter_fn]
pub fn read_time(minutes: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("{minutes} min read"))
}

fn hash_for(asset: &str) -> &'static str {
    match asset {
        "css" => env!("CSS_HASH"),
        "blog_js" => env!("BLOG_JS_HASH"),
        "checkout_js" => env!("CHECKOUT_JS_HASH"),
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_asset_has_no_hash() {
        assert_eq!(hash_for("fonts"), "");
    }

    #[test]
    fn test_known_asset_hashes_are_short_hex() {
        for asset in ["css", "blog_js", "checkout_js"] {
            let hash = hash_for(asset);
            assert!(
                hash.is_empty() || (hash.len() == 8 && hash.bytes().all(|b| b.is_ascii_hexdigit())),
                "{asset}: {hash}"
            );
        }
    }
}
