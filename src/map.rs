//! Map composition.
//!
//! Assembles the base tile layers, the earthquake overlay, the layer-toggle
//! control, and the color legend into one self-contained Leaflet HTML page.
//! `MapView` is an owned value; there is no global map instance.

use std::fmt::Write as _;

use crate::encode::{self, LEGEND_LEVELS, MagColor};
use crate::marker::{self, Marker};

/// Initial map center (contiguous US).
pub const MAP_CENTER: (f64, f64) = (37.09, -95.71);

/// Initial zoom level.
pub const MAP_ZOOM: u8 = 4;

/// Maximum tile zoom for both base layers.
const MAX_TILE_ZOOM: u8 = 18;

/// Classic Mapbox v4 tile URL template. `{id}` and `{accessToken}` are
/// substituted client-side by Leaflet from the layer options.
const TILE_URL_TEMPLATE: &str =
    "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";

/// Attribution line shared by both base layers.
const TILE_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>, Imagery © <a href=\"https://www.mapbox.com/\">Mapbox</a>";

/// A selectable base tile style.
#[derive(Debug, Clone, Copy)]
pub struct BaseLayer {
    /// Display name in the layer control
    pub name: &'static str,
    /// Provider style identifier
    pub style_id: &'static str,
}

/// The two base layers, mutually exclusive in the layer control. The first
/// one is shown on load.
pub const BASE_LAYERS: [BaseLayer; 2] = [
    BaseLayer {
        name: "Street Map",
        style_id: "mapbox.streets",
    },
    BaseLayer {
        name: "Dark Map",
        style_id: "mapbox.dark",
    },
];

/// Display name of the earthquake overlay in the layer control.
const OVERLAY_NAME: &str = "Earthquakes";

/// One row of the magnitude legend.
#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub color: MagColor,
    pub label: String,
}

/// Build the legend rows from the shared color table, ascending.
///
/// The topmost bucket has no upper bound and renders as "5+".
#[must_use]
pub fn legend_entries() -> Vec<LegendEntry> {
    LEGEND_LEVELS
        .iter()
        .enumerate()
        .map(|(i, &level)| {
            let label = match LEGEND_LEVELS.get(i + 1) {
                Some(next) => format!("{}&ndash;{}", marker::fmt_num(level), marker::fmt_num(*next)),
                None => format!("{}+", marker::fmt_num(level)),
            };
            LegendEntry {
                color: encode::color(level),
                label,
            }
        })
        .collect()
}

/// The composed interactive map: base layers, earthquake overlay, layer
/// control, and legend. Created once per feed fetch; rendering is pure.
#[derive(Debug, Clone)]
pub struct MapView {
    markers: Vec<Marker>,
    access_token: String,
    title: String,
}

impl MapView {
    /// Compose a map view from a marker overlay and a tile-provider token.
    #[must_use]
    pub fn compose(markers: Vec<Marker>, access_token: &str, title: &str) -> Self {
        Self {
            markers,
            access_token: access_token.to_string(),
            title: title.to_string(),
        }
    }

    /// Number of markers in the overlay.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Render the full HTML page.
    #[must_use]
    pub fn render_html(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <style>
        html, body, #map {{ height: 100%; width: 100%; margin: 0; padding: 0; }}
        .legend {{
            background: white;
            padding: 6px 8px;
            font: 14px/18px Arial, Helvetica, sans-serif;
            border-radius: 5px;
            box-shadow: 0 0 15px rgba(0, 0, 0, 0.2);
            line-height: 18px;
            color: #555;
        }}
        .legend i {{
            width: 18px;
            height: 18px;
            float: left;
            margin-right: 8px;
            opacity: 0.8;
        }}
    </style>
</head>
<body>
    <div id="map"></div>
    <script>
var quakes = [
{markers_js}];

var earthquakes = L.layerGroup(quakes.map(function (q) {{
    return L.circleMarker([q.lat, q.lon], {{
        radius: q.radius,
        fillColor: q.color,
        color: "{stroke_color}",
        weight: {stroke_weight},
        opacity: {stroke_opacity},
        fillOpacity: {fill_opacity}
    }}).bindPopup(q.popup);
}}));

var streetmap = L.tileLayer("{tile_url}", {{
    attribution: "{attribution}",
    maxZoom: {max_zoom},
    id: "{street_id}",
    accessToken: "{token}"
}});

var darkmap = L.tileLayer("{tile_url}", {{
    attribution: "{attribution}",
    maxZoom: {max_zoom},
    id: "{dark_id}",
    accessToken: "{token}"
}});

var map = L.map("map", {{
    center: [{center_lat}, {center_lon}],
    zoom: {zoom},
    layers: [streetmap, earthquakes]
}});

L.control.layers(
    {{ "{street_name}": streetmap, "{dark_name}": darkmap }},
    {{ "{overlay_name}": earthquakes }},
    {{ collapsed: false }}
).addTo(map);

var legend = L.control({{ position: "bottomright" }});

legend.onAdd = function () {{
    var div = L.DomUtil.create("div", "info legend");
    div.innerHTML = "{legend_html}";
    return div;
}};

legend.addTo(map);
    </script>
</body>
</html>
"#,
            title = html_escape(&self.title),
            markers_js = self.markers_js(),
            stroke_color = marker::STROKE_COLOR,
            stroke_weight = marker::STROKE_WEIGHT,
            stroke_opacity = marker::STROKE_OPACITY,
            fill_opacity = marker::FILL_OPACITY,
            tile_url = TILE_URL_TEMPLATE,
            attribution = js_str(TILE_ATTRIBUTION),
            max_zoom = MAX_TILE_ZOOM,
            street_id = BASE_LAYERS[0].style_id,
            dark_id = BASE_LAYERS[1].style_id,
            token = js_str(&self.access_token),
            center_lat = MAP_CENTER.0,
            center_lon = MAP_CENTER.1,
            zoom = MAP_ZOOM,
            street_name = BASE_LAYERS[0].name,
            dark_name = BASE_LAYERS[1].name,
            overlay_name = OVERLAY_NAME,
            legend_html = js_str(&legend_html()),
        )
    }

    /// Emit the marker overlay as a JS array literal, one object per marker.
    fn markers_js(&self) -> String {
        let mut out = String::new();
        for m in &self.markers {
            let _ = writeln!(
                out,
                r#"    {{ lat: {}, lon: {}, radius: {}, color: "{}", popup: "{}" }},"#,
                m.lat,
                m.lon,
                marker::fmt_num(m.radius),
                m.fill_color.as_str(),
                js_str(&m.popup_html),
            );
        }
        out
    }
}

/// Render the legend rows as one HTML fragment, a colored swatch per bucket.
fn legend_html() -> String {
    let mut out = String::new();
    for entry in legend_entries() {
        let _ = write!(
            out,
            r#"<i style="background: {}"></i> {}<br>"#,
            entry.color.as_str(),
            entry.label
        );
    }
    out
}

/// Minimal escaping for text placed in HTML element content.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;")
}

/// Escape a string for embedding in a double-quoted JS string literal.
///
/// `<` is escaped so popup HTML cannot terminate the surrounding script
/// element; it decodes back to `<` at JS parse time, so Leaflet still
/// receives real HTML.
fn js_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\u003c"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_marker(mag: f64, lat: f64, lon: f64, place: &str) -> Marker {
        Marker {
            lat,
            lon,
            radius: encode::radius(mag),
            fill_color: encode::color(mag),
            popup_html: format!(
                "<h3>Magnitude  {}</h3><hr><p>Earthquake Location:  {place}</p>",
                marker::fmt_num(mag)
            ),
        }
    }

    #[test]
    fn test_legend_has_six_ascending_entries() {
        let entries = legend_entries();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].label, "0&ndash;1");
        assert_eq!(entries[4].label, "4&ndash;5");
        assert_eq!(entries[5].label, "5+");
    }

    #[test]
    fn test_legend_colors_track_encoder() {
        let entries = legend_entries();
        for (entry, &level) in entries.iter().zip(LEGEND_LEVELS.iter()) {
            assert_eq!(entry.color, encode::color(level));
        }
        assert_eq!(entries[0].color, MagColor::LightBlue);
        assert_eq!(entries[5].color, MagColor::DarkPurple);
    }

    #[test]
    fn test_render_composes_layers_and_controls() {
        let view = MapView::compose(vec![test_marker(2.5, 10.0, 20.0, "x")], "tok123", "Quakes");
        let html = view.render_html();

        assert!(html.contains(r#""Street Map": streetmap"#));
        assert!(html.contains(r#""Dark Map": darkmap"#));
        assert!(html.contains(r#""Earthquakes": earthquakes"#));
        assert!(html.contains("collapsed: false"));
        assert!(html.contains("center: [37.09, -95.71]"));
        assert!(html.contains("zoom: 4"));
        assert!(html.contains(r#"position: "bottomright""#));
        assert!(html.contains(r#"id: "mapbox.streets""#));
        assert!(html.contains(r#"id: "mapbox.dark""#));
        assert!(html.contains(r#"accessToken: "tok123""#));
    }

    #[test]
    fn test_render_emits_one_object_per_marker() {
        let markers = vec![
            test_marker(1.0, 0.0, 0.0, "a"),
            test_marker(2.0, 1.0, 1.0, "b"),
            test_marker(3.0, 2.0, 2.0, "c"),
        ];
        let view = MapView::compose(markers, "tok", "t");
        assert_eq!(view.marker_count(), 3);

        let html = view.render_html();
        assert_eq!(html.matches("{ lat:").count(), 3);
    }

    #[test]
    fn test_render_single_event_end_to_end() {
        let view = MapView::compose(vec![test_marker(4.2, 1.0, 2.0, "10km N of X")], "tok", "t");
        let html = view.render_html();

        assert!(html.contains("{ lat: 1, lon: 2,"));
        assert!(html.contains("radius: 25.2"));
        assert!(html.contains(r#"color: "darkblue""#));
        assert!(html.contains("Magnitude  4.2"));
        assert!(html.contains("10km N of X"));
    }

    #[test]
    fn test_fixed_stroke_style_is_emitted() {
        let view = MapView::compose(vec![test_marker(1.5, 0.0, 0.0, "y")], "tok", "t");
        let html = view.render_html();

        assert!(html.contains(r#"color: "pink""#));
        assert!(html.contains("weight: 0.5"));
        assert!(html.contains("opacity: 0.5"));
        assert!(html.contains("fillOpacity: 0.8"));
    }

    #[test]
    fn test_popup_markup_is_script_safe() {
        let view = MapView::compose(
            vec![test_marker(3.3, 0.0, 0.0, r#"near "</script>" ridge"#)],
            "tok",
            "t",
        );
        let html = view.render_html();

        // The close tag from the place text must not survive unescaped inside
        // the marker array.
        assert!(!html.contains(r#""</script>" ridge"#));
        assert!(html.contains(&js_str(r#"near "</script>" ridge"#)));
    }

    #[test]
    fn test_legend_html_fragment() {
        let fragment = legend_html();
        assert_eq!(fragment.matches("<i style=").count(), 6);
        assert!(fragment.contains("background: lightblue"));
        assert!(fragment.contains("background: darkpurple"));
        assert!(fragment.ends_with("5+<br>"));
    }
}
