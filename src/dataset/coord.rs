use serde::Serialize;

/// A valid map point: both coordinates present
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Convert a locale-formatted decimal ("-6,914744") into a float.
///
/// Empty, non-numeric and non-finite input yields `None`.
pub fn parse_coord(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_latitude(raw: &str) -> Option<f64> {
    parse_coord(raw).filter(|v| (-90.0..=90.0).contains(v))
}

pub fn parse_longitude(raw: &str) -> Option<f64> {
    parse_coord(raw).filter(|v| (-180.0..=180.0).contains(v))
}

impl GeoPoint {
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        Some(Self { lat: lat?, lon: lon? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_decimal() {
        assert_eq!(parse_coord("-6,914744"), Some(-6.914744));
        assert_eq!(parse_coord("107,609810"), Some(107.60981));
        assert_eq!(parse_coord(" 107.5 "), Some(107.5));
    }

    #[test]
    fn test_invalid_is_absent() {
        for raw in ["", "   ", "abc", "-6,9,1", "NaN", "inf", "Lintang"] {
            assert_eq!(parse_coord(raw), None, "{:?} should be absent", raw);
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(parse_latitude("-91"), None);
        assert_eq!(parse_latitude("-6,9"), Some(-6.9));
        assert_eq!(parse_longitude("190"), None);
        assert_eq!(parse_longitude("107,6"), Some(107.6));
    }

    #[test]
    fn test_point_needs_both() {
        assert!(GeoPoint::from_parts(Some(-6.9), None).is_none());
        assert!(GeoPoint::from_parts(None, Some(107.6)).is_none());
        assert_eq!(
            GeoPoint::from_parts(Some(-6.9), Some(107.6)),
            Some(GeoPoint { lat: -6.9, lon: 107.6 })
        );
    }
}
