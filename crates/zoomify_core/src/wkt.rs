//! Well-known-text codec for exported polygons.
//!
//! Exports look like `SRID=4326;POLYGON((x0 y0, x1 y1, ..., x0 y0))` with
//! coordinates normalized to `[0, 1]`. Only a single exterior ring is
//! supported.

use std::fmt::Write;

use crate::constants::EXPORT_SRID;
use crate::error::ViewerError;
use crate::geometry::Point;

/// Write a ring as an SRID-prefixed WKT polygon, closing it explicitly.
pub fn format_polygon(ring: &[Point]) -> Result<String, ViewerError> {
    let first = ring.first().ok_or(ViewerError::EmptyPolygon)?;

    let mut out = format!("SRID={};POLYGON((", EXPORT_SRID);
    for p in ring.iter().chain(std::iter::once(first)) {
        if !out.ends_with('(') {
            out.push_str(", ");
        }
        // Writing to a String cannot fail
        let _ = write!(out, "{} {}", format_coord(p.x), format_coord(p.y));
    }
    out.push_str("))");
    Ok(out)
}

/// Shortest round-trip decimal, with negative zero folded into zero.
fn format_coord(value: f64) -> String {
    format!("{}", value + 0.0)
}

/// Parse a single-ring WKT polygon, with or without an SRID prefix.
///
/// The repeated closing point is dropped, so the result matches how
/// polygons are stored.
pub fn parse_polygon(text: &str) -> Result<Vec<Point>, ViewerError> {
    let mut body = text.trim();

    if let Some((prefix, rest)) = body.split_once(';') {
        let srid = prefix
            .trim()
            .strip_prefix("SRID=")
            .ok_or_else(|| ViewerError::malformed_wkt(format!("unexpected prefix '{}'", prefix)))?;
        srid.trim()
            .parse::<u32>()
            .map_err(|_| ViewerError::malformed_wkt(format!("invalid SRID '{}'", srid)))?;
        body = rest.trim();
    }

    let keyword_len = "POLYGON".len();
    let rings = match (body.get(..keyword_len), body.get(keyword_len..)) {
        (Some(keyword), Some(rest)) if keyword.eq_ignore_ascii_case("POLYGON") => rest.trim(),
        _ => return Err(ViewerError::malformed_wkt("expected POLYGON")),
    };
    let inner = rings
        .strip_prefix("((")
        .and_then(|s| s.strip_suffix("))"))
        .ok_or_else(|| ViewerError::malformed_wkt("expected ((...)) ring"))?;

    if inner.contains('(') || inner.contains(')') {
        return Err(ViewerError::malformed_wkt("interior rings are not supported"));
    }

    let mut points = inner
        .split(',')
        .map(parse_pair)
        .collect::<Result<Vec<_>, _>>()?;

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    Ok(points)
}

fn parse_pair(pair: &str) -> Result<Point, ViewerError> {
    let mut parts = pair.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ViewerError::malformed_wkt(format!("expected 'x y', got '{}'", pair.trim())));
    };
    let parse = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ViewerError::malformed_wkt(format!("invalid number '{}'", s)))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}
