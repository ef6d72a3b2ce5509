//! `Accept-Language` negotiation for the UI language of new accounts.

use axum::{
    extract::FromRequestParts,
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use std::convert::Infallible;

use crate::models::InterfaceLanguage;

/// Primary subtags the console ships translations for, in preference order
const OFFERED: [&str; 2] = ["zh", "en"];

/// Interface language negotiated from the request's `Accept-Language`.
/// Falls back to `en-US`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferredLanguage(pub InterfaceLanguage);

impl<S> FromRequestParts<S> for PreferredLanguage
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());

        Ok(Self(negotiate(header)))
    }
}

/// Pick the best offered language for an `Accept-Language` value.
///
/// Ranges are tried by descending quality, keeping header order on ties.
/// `q=0` ranges are ignored, `*` takes the first offer, and a range matches
/// an offer when its primary subtag does (so `zh-CN` picks `zh`).
pub fn negotiate(header: Option<&str>) -> InterfaceLanguage {
    let Some(header) = header else {
        return InterfaceLanguage::EnUs;
    };

    let mut ranges: Vec<(&str, f32)> = header.split(',').filter_map(parse_range).collect();
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

    let best = ranges.iter().find_map(|(tag, _)| {
        if *tag == "*" {
            return OFFERED.first().copied();
        }
        let primary = tag.split('-').next().unwrap_or(tag);
        OFFERED
            .iter()
            .copied()
            .find(|offer| offer.eq_ignore_ascii_case(primary))
    });

    match best {
        Some("zh") => InterfaceLanguage::ZhHans,
        _ => InterfaceLanguage::EnUs,
    }
}

fn parse_range(item: &str) -> Option<(&str, f32)> {
    let mut parts = item.split(';');
    let tag = parts.next()?.trim();
    if tag.is_empty() {
        return None;
    }

    let mut quality = 1.0;
    for param in parts {
        if let Some(q) = param.trim().strip_prefix("q=") {
            quality = q.trim().parse::<f32>().ok()?.clamp(0.0, 1.0);
        }
    }

    (quality > 0.0).then_some((tag, quality))
}
