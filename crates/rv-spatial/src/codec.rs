//! Route token codec.
//!
//! A route is persisted as one opaque, printable string stored next to the
//! rover's other fields.  The host persistence format is line/text based and
//! treats `//` as a comment marker, so a token must never contain `/`.
//!
//! # Formats
//!
//! | Format           | Shape                                   | Detected by            |
//! |------------------|-----------------------------------------|------------------------|
//! | `Compact` (v2)   | `v2.` + base64(lz4(plaintext)), `/`→`_` | `v2.` prefix           |
//! | `LegacyPlain`    | `lat:lon;lat:lon;…`                     | contains `;`           |
//! | `LegacyLzString` | LZString `compressToBase64(plaintext)`  | decodes and holds `:`  |
//!
//! Only `Compact` is written.  Coordinates are printed with Rust's shortest
//! round-trip float formatting, so `decode(encode(p)) == p` exactly.
//!
//! All formats are read in travel order (start first).  No format is
//! reversed on decode.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::warn;

use rv_core::GeoPoint;

use crate::{CodecError, CodecResult};

/// Version tag of the current format.
const COMPACT_TAG: &str = "v2.";

/// Which encoding a token uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenFormat {
    Empty,
    Compact,
    LegacyPlain,
    LegacyLzString,
}

/// Classify `token` without fully decoding it.  Untagged tokens without `;`
/// are assumed to be LZString; [`decode`] confirms.
pub fn format_of(token: &str) -> TokenFormat {
    let token = token.trim();
    if token.is_empty() {
        TokenFormat::Empty
    } else if token.starts_with(COMPACT_TAG) {
        TokenFormat::Compact
    } else if token.contains(';') {
        TokenFormat::LegacyPlain
    } else {
        TokenFormat::LegacyLzString
    }
}

/// Serialise `waypoints` into a compact token.  An empty slice encodes to
/// the empty string.
pub fn encode(waypoints: &[GeoPoint]) -> String {
    if waypoints.is_empty() {
        return String::new();
    }
    let packed = lz4_flex::compress_prepend_size(to_plaintext(waypoints).as_bytes());
    let mut token = String::with_capacity(COMPACT_TAG.len() + packed.len() * 4 / 3 + 4);
    token.push_str(COMPACT_TAG);
    token.push_str(&STANDARD.encode(packed).replace('/', "_"));
    token
}

/// Parse a token in any supported format.  Empty input yields an empty route.
pub fn decode(token: &str) -> CodecResult<Vec<GeoPoint>> {
    let token = token.trim();
    match format_of(token) {
        TokenFormat::Empty => Ok(Vec::new()),
        TokenFormat::Compact => {
            let body = token[COMPACT_TAG.len()..].replace('_', "/");
            let packed = STANDARD.decode(body)?;
            let plain = String::from_utf8(lz4_flex::decompress_size_prepended(&packed)?)?;
            parse_plaintext(&plain)
        }
        TokenFormat::LegacyPlain => parse_plaintext(token),
        TokenFormat::LegacyLzString => {
            let plain = lz_str::decompress_from_base64(token)
                .and_then(|wide| String::from_utf16(&wide).ok())
                .filter(|s| s.contains(':'))
                .ok_or(CodecError::UnknownFormat)?;
            parse_plaintext(&plain)
        }
    }
}

/// [`decode`], recovering any failure as an empty route.
///
/// Callers that fall back to direct great-circle travel on an empty route
/// use this; the failure is logged.
pub fn decode_or_empty(token: &str) -> Vec<GeoPoint> {
    decode(token).unwrap_or_else(|e| {
        warn!(error = %e, token_len = token.len(), "discarding undecodable route token");
        Vec::new()
    })
}

/// Re-encode a token of any format in the current format.
pub fn upgrade(token: &str) -> CodecResult<String> {
    decode(token).map(|w| encode(&w))
}

fn to_plaintext(waypoints: &[GeoPoint]) -> String {
    let mut out = String::with_capacity(waypoints.len() * 40);
    for p in waypoints {
        out.push_str(&p.lat.to_string());
        out.push(':');
        out.push_str(&p.lon.to_string());
        out.push(';');
    }
    out
}

fn parse_plaintext(plain: &str) -> CodecResult<Vec<GeoPoint>> {
    plain
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|wp| {
            let (lat, lon) = wp
                .split_once(':')
                .ok_or_else(|| CodecError::Waypoint(wp.to_string()))?;
            let lat: f64 = lat.trim().parse().map_err(|_| CodecError::Waypoint(wp.to_string()))?;
            let lon: f64 = lon.trim().parse().map_err(|_| CodecError::Waypoint(wp.to_string()))?;
            let point = GeoPoint::new(lat, lon);
            if point.is_valid() {
                Ok(point)
            } else {
                Err(CodecError::Waypoint(wp.to_string()))
            }
        })
        .collect()
}
