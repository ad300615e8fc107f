//! Request locale resolution.
//!
//! An explicit `lang` cookie wins; otherwise the best supported match
//! from `Accept-Language`; otherwise Italian.

use axum::http::{header, HeaderMap};
use vetrina_core::Locale;

/// Resolve the locale for a request from its headers.
pub fn resolve_locale(headers: &HeaderMap) -> Locale {
    cookie_locale(headers)
        .or_else(|| accept_language_locale(headers))
        .unwrap_or_default()
}

fn cookie_locale(headers: &HeaderMap) -> Option<Locale> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name.trim() == "lang" {
            value.trim().to_lowercase().parse().ok()
        } else {
            None
        }
    })
}

fn accept_language_locale(headers: &HeaderMap) -> Option<Locale> {
    let raw = headers.get(header::ACCEPT_LANGUAGE)?.to_str().ok()?;
    let mut best: Option<(f32, Locale)> = None;

    for entry in raw.split(',') {
        let mut parts = entry.trim().split(';');
        let tag = match parts.next() {
            Some(tag) if !tag.trim().is_empty() => tag.trim(),
            _ => continue,
        };
        let primary = tag.split('-').next().unwrap_or(tag).to_lowercase();
        let Ok(locale) = primary.parse::<Locale>() else {
            continue;
        };
        let quality = parts
            .find_map(|p| p.trim().strip_prefix("q="))
            .and_then(|q| q.parse::<f32>().ok())
            .unwrap_or(1.0);
        // ties keep the earlier entry
        if best.map_or(true, |(q, _)| quality > q) {
            best = Some((quality, locale));
        }
    }
    best.map(|(_, locale)| locale)
}
