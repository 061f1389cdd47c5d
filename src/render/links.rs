/// Shown instead of a link when a coordinate is missing
pub const NO_LINK: &str = "-";

/// Google Maps query for a "lat,lon" pair
pub fn map_link(lat: Option<f64>, lon: Option<f64>) -> String {
    match (lat, lon) {
        (Some(lat), Some(lon)) => format!("https://www.google.com/maps?q={},{}", lat, lon),
        _ => NO_LINK.to_string(),
    }
}
