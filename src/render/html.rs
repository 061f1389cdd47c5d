//! Standalone Leaflet page with clustered, colored circle markers

use anyhow::{Context, Result};
use serde::Serialize;

use super::links::map_link;
use crate::dataset::{GeoPoint, School};

/// Default view: Bandung
pub const MAP_CENTER: GeoPoint = GeoPoint {
    lat: -6.914744,
    lon: 107.609810,
};
pub const MAP_ZOOM: u8 = 11;

#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub color: &'static str,
    pub popup: String,
}

/// Minimal HTML escaping for text placed inside popups
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl MapMarker {
    pub fn new(school: &School, point: GeoPoint) -> Self {
        let link = map_link(Some(point.lat), Some(point.lon));
        let popup = format!(
            "<b>{}</b><br>{}<br>{}<br><a href='{}' target='_blank'>Maps</a>",
            escape_html(&school.name),
            escape_html(school.form.label()),
            escape_html(&school.subdistrict),
            escape_html(&link),
        );
        Self {
            lat: point.lat,
            lon: point.lon,
            color: school.form.color().css_name(),
            popup,
        }
    }
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
<style>
  html, body { margin: 0; height: 100%; font-family: sans-serif; }
  #header { padding: 8px 12px; }
  #map { position: absolute; top: 56px; bottom: 0; left: 0; right: 0; }
</style>
</head>
<body>
<div id="header"><b>{{TITLE}}</b> &middot; points shown: {{COUNT}}</div>
<div id="map"></div>
<script>
  var map = L.map('map').setView([{{LAT}}, {{LON}}], {{ZOOM}});
  L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
    maxZoom: 19,
    attribution: '&copy; OpenStreetMap contributors'
  }).addTo(map);
  var cluster = L.markerClusterGroup();
  var markers = {{MARKERS}};
  markers.forEach(function (m) {
    L.circleMarker([m.lat, m.lon], {
      radius: 4, color: m.color, fill: true, fillOpacity: 0.7
    }).bindPopup(m.popup).addTo(cluster);
  });
  cluster.addTo(map);
</script>
</body>
</html>
"#;

pub fn render_map_html(title: &str, markers: &[MapMarker]) -> Result<String> {
    // `</` inside a script block would end it early
    let json = serde_json::to_string(markers)
        .context("Failed to serialize markers")?
        .replace("</", "<\\/");

    Ok(TEMPLATE
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{COUNT}}", &markers.len().to_string())
        .replace("{{LAT}}", &MAP_CENTER.lat.to_string())
        .replace("{{LON}}", &MAP_CENTER.lon.to_string())
        .replace("{{ZOOM}}", &MAP_ZOOM.to_string())
        .replace("{{MARKERS}}", &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EducationForm;

    fn school(name: &str, form: &str) -> School {
        School {
            subdistrict: "Kec. Soreang".to_string(),
            npsn: "1".to_string(),
            name: name.to_string(),
            form: EducationForm::parse(form),
            latitude: Some(-7.03),
            longitude: Some(107.52),
            ..School::default()
        }
    }

    #[test]
    fn test_marker_popup() {
        let s = school("SD <Harapan>", "SD");
        let marker = MapMarker::new(&s, s.location().unwrap());
        assert_eq!(marker.color, "blue");
        assert!(marker.popup.starts_with("<b>SD &lt;Harapan&gt;</b><br>SD<br>Kec. Soreang<br>"));
        assert!(marker.popup.contains("https://www.google.com/maps?q=-7.03,107.52"));
    }

    #[test]
    fn test_unknown_form_is_gray() {
        let s = school("SLB Negeri", "SLB");
        assert_eq!(MapMarker::new(&s, s.location().unwrap()).color, "gray");
    }

    #[test]
    fn test_page() {
        let s = school("MTs Al-Ikhlas", "MTS");
        let markers = vec![MapMarker::new(&s, s.location().unwrap())];
        let html = render_map_html("Kabupaten Bandung", &markers).unwrap();

        assert!(html.contains("setView([-6.914744, 107.60981], 11)"));
        assert!(html.contains("points shown: 1"));
        assert!(html.contains("\"color\":\"red\""));
        assert!(html.contains("<b>MTs Al-Ikhlas<\\/b>"));
    }
}
