//! Map capability handed to the UI shell, and its Leaflet implementation.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use shared::{Coordinate, Point, Session, Spot};
use wasm_bindgen::prelude::{JsValue, wasm_bindgen};

#[wasm_bindgen(module = "/leaflet_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map(element_id: &str);
    #[wasm_bindgen(js_name = setEndpoints)]
    fn set_endpoints_js(start: JsValue, end: JsValue);
    #[wasm_bindgen(js_name = setRoute)]
    fn set_route_js(coords: JsValue);
    #[wasm_bindgen(js_name = showSpots)]
    fn show_spots_js(markers: JsValue);
    #[wasm_bindgen(js_name = openSpotPopup)]
    fn open_spot_popup_js(id: &str) -> bool;
    #[wasm_bindgen(js_name = clearMap)]
    fn clear_map_js();
}

/// What the UI shell may ask of the map. The map keeps the user's pan and
/// zoom across every call except [`MapSurface::open_popup`], which recenters.
pub trait MapSurface {
    fn set_endpoints(&self, start: Option<&Point>, end: Option<&Point>);
    fn set_route(&self, route: Option<(Coordinate, Coordinate)>);
    fn show_spots(&self, spots: &[Spot]);
    fn open_popup(&self, spot_id: &str);
    fn clear(&self);
}

pub struct LeafletMap;

impl LeafletMap {
    pub fn mount(element_id: &str) -> Self {
        init_map(element_id);
        LeafletMap
    }
}

impl MapSurface for LeafletMap {
    fn set_endpoints(&self, start: Option<&Point>, end: Option<&Point>) {
        let encode = |point: Option<&Point>| {
            point
                .and_then(|point| to_value(point).ok())
                .unwrap_or(JsValue::NULL)
        };
        set_endpoints_js(encode(start), encode(end));
    }

    fn set_route(&self, route: Option<(Coordinate, Coordinate)>) {
        let path: Vec<Coordinate> = route.map(|(a, b)| vec![a, b]).unwrap_or_default();
        if let Ok(value) = to_value(&path) {
            set_route_js(value);
        }
    }

    fn show_spots(&self, spots: &[Spot]) {
        let markers: Vec<MarkerPayload> = spots
            .iter()
            .enumerate()
            .map(|(idx, spot)| MarkerPayload::new(idx + 1, spot))
            .collect();
        if let Ok(value) = to_value(&markers) {
            show_spots_js(value);
        }
    }

    fn open_popup(&self, spot_id: &str) {
        if !open_spot_popup_js(spot_id) {
            web_sys::console::debug_1(&format!("[frontend] no marker for spot {spot_id}").into());
        }
    }

    fn clear(&self) {
        clear_map_js();
    }
}

/// Pushes the parts of `next` that differ from `previous` to the map.
pub fn sync_map(previous: &Session, next: &Session, map: &impl MapSurface) {
    let endpoints_changed = previous.start != next.start || previous.end != next.end;
    if next.start.is_none() && next.end.is_none() && next.results.is_empty() {
        if endpoints_changed || !previous.results.is_empty() {
            map.clear();
        }
        return;
    }
    if endpoints_changed {
        map.set_endpoints(next.start.as_ref(), next.end.as_ref());
        map.set_route(next.route());
    }
    if previous.results != next.results {
        map.show_spots(&next.results);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerPayload {
    pub id: String,
    pub number: usize,
    pub lat: f64,
    pub lon: f64,
    pub popup_html: String,
}

impl MarkerPayload {
    pub fn new(number: usize, spot: &Spot) -> Self {
        Self {
            id: spot.id.clone(),
            number,
            lat: spot.lat,
            lon: spot.lon,
            popup_html: popup_html(spot),
        }
    }
}

pub fn search_url(spot: &Spot) -> String {
    format!(
        "https://www.google.com/search?q={}",
        utf8_percent_encode(&spot.name, NON_ALPHANUMERIC)
    )
}

pub fn popup_html(spot: &Spot) -> String {
    let mut html = format!("<div class=\"spot-popup\"><strong>{}</strong>", escape(&spot.name));
    if let Some(stars) = spot.rating {
        html.push_str(&format!("<div class=\"stars\">{}</div>", stars.glyphs()));
    }
    html.push_str(&format!(
        "<div class=\"category\">{} <small>{}</small></div>",
        spot.category.label(),
        escape(&spot.raw_category)
    ));
    let rows = [
        ("Address", spot.address.as_deref()),
        ("Hours", spot.opening_hours.as_deref()),
        ("Cuisine", spot.cuisine.as_deref()),
        ("Tel", spot.phone.as_deref()),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            html.push_str(&format!("<div>{label}: {}</div>", escape(value)));
        }
    }
    if let Some(website) = &spot.website {
        html.push_str(&format!(
            "<div><a href=\"{0}\" target=\"_blank\" rel=\"noopener\">{0}</a></div>",
            escape(website)
        ));
    }
    if let Some(km) = spot.distance_from_route_km {
        html.push_str(&format!("<div>{km:.2} km off the route</div>"));
    }
    if let Some(trace) = &spot.score_trace {
        html.push_str(&format!(
            "<small class=\"trace\">{}</small>",
            escape(&trace.summary())
        ));
    }
    html.push_str(&format!(
        "<a class=\"search\" href=\"{}\" target=\"_blank\" rel=\"noopener\">Search the web</a></div>",
        search_url(spot)
    ));
    html
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
