//! Mapping of Overpass JSON elements into [`Spot`]s.

use std::collections::HashMap;

use serde::Deserialize;
use shared::{Category, ChainTable, Spot};

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

const CATEGORY_KEYS: [&str; 4] = ["amenity", "shop", "tourism", "leisure"];
const ADDRESS_KEYS: [&str; 6] = [
    "addr:province",
    "addr:city",
    "addr:suburb",
    "addr:quarter",
    "addr:neighbourhood",
    "addr:street",
];

pub fn parse_response(body: &str, chains: &ChainTable) -> Result<Vec<Spot>, serde_json::Error> {
    let response: OverpassResponse = serde_json::from_str(body)?;
    Ok(to_spots(response, chains))
}

/// Drops unnamed or unlocated elements and maps the rest.
pub fn to_spots(response: OverpassResponse, chains: &ChainTable) -> Vec<Spot> {
    response
        .elements
        .into_iter()
        .filter_map(|element| to_spot(element, chains))
        .collect()
}

fn to_spot(element: OverpassElement, chains: &ChainTable) -> Option<Spot> {
    let (lat, lon) = match (element.lat, element.lon, &element.center) {
        (Some(lat), Some(lon), _) => (lat, lon),
        (_, _, Some(center)) => (center.lat, center.lon),
        _ => return None,
    };
    let tags = element.tags;
    let name = tag(&tags, "name")?;

    let brand = tag(&tags, "brand");
    let operator = tag(&tags, "operator");
    let phone = tag(&tags, "phone").or_else(|| tag(&tags, "contact:phone"));
    let website = tag(&tags, "website").or_else(|| tag(&tags, "contact:website"));
    let opening_hours = tag(&tags, "opening_hours");
    let cuisine = tag(&tags, "cuisine");
    let address = build_address(&tags);

    let is_major_chain = chains.is_major_chain(&name, brand.as_deref());
    let is_chain = chains.is_chain(&name, brand.as_deref(), operator.as_deref());

    let mut description = Vec::new();
    if let Some(cuisine) = &cuisine {
        description.push(format!("Cuisine: {cuisine}"));
    }
    if let Some(hours) = &opening_hours {
        description.push(format!("Hours: {hours}"));
    }
    if let Some(address) = &address {
        description.push(format!("Address: {address}"));
    }
    if let Some(phone) = &phone {
        description.push(format!("Tel: {phone}"));
    }
    if let Some(website) = &website {
        description.push(format!("Web: {website}"));
    }

    Some(Spot {
        id: format!("{}/{}", element.element_type, element.id),
        lat,
        lon,
        raw_category: raw_category(&tags),
        category: normalize_category(&tags),
        address,
        phone,
        website,
        opening_hours,
        cuisine,
        brand,
        description: description.join(" / "),
        is_chain,
        is_major_chain,
        rating: None,
        distance_from_route_km: None,
        score_trace: None,
        name,
    })
}

fn tag(tags: &HashMap<String, String>, key: &str) -> Option<String> {
    tags.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// First category-bearing tag as `key=value`.
pub fn raw_category(tags: &HashMap<String, String>) -> String {
    CATEGORY_KEYS
        .iter()
        .find_map(|key| tags.get(*key).map(|value| format!("{key}={value}")))
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn normalize_category(tags: &HashMap<String, String>) -> Category {
    let amenity = tags.get("amenity").map(String::as_str);
    let tourism = tags.get("tourism").map(String::as_str);
    match (amenity, tourism) {
        (Some("restaurant" | "fast_food"), _) => Category::Restaurant,
        (Some("cafe"), _) => Category::Cafe,
        (_, Some("attraction" | "museum")) => Category::TouristAttraction,
        (Some("fuel"), _) => Category::GasStation,
        _ if tags.contains_key("shop") => Category::Shop,
        _ => Category::All,
    }
}

fn build_address(tags: &HashMap<String, String>) -> Option<String> {
    if let Some(full) = tag(tags, "addr:full") {
        return Some(full);
    }
    let mut parts: Vec<String> = ADDRESS_KEYS.iter().filter_map(|key| tag(tags, key)).collect();
    if let Some(number) = tag(tags, "addr:housenumber") {
        parts.push(number);
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn category_priority() {
        assert_eq!(
            normalize_category(&tags(&[("amenity", "fast_food")])),
            Category::Restaurant
        );
        assert_eq!(
            normalize_category(&tags(&[("amenity", "cafe"), ("shop", "coffee")])),
            Category::Cafe
        );
        assert_eq!(
            normalize_category(&tags(&[("tourism", "museum"), ("amenity", "fuel")])),
            Category::TouristAttraction
        );
        assert_eq!(
            normalize_category(&tags(&[("amenity", "fuel"), ("shop", "convenience")])),
            Category::GasStation
        );
        assert_eq!(
            normalize_category(&tags(&[("shop", "books")])),
            Category::Shop
        );
        assert_eq!(
            normalize_category(&tags(&[("amenity", "bench")])),
            Category::All
        );
    }

    #[test]
    fn raw_category_uses_first_known_key() {
        assert_eq!(
            raw_category(&tags(&[("shop", "books"), ("amenity", "cafe")])),
            "amenity=cafe"
        );
        assert_eq!(raw_category(&tags(&[("leisure", "park")])), "leisure=park");
        assert_eq!(raw_category(&tags(&[])), "unknown");
    }

    #[test]
    fn elements_without_name_or_position_are_dropped() {
        let body = serde_json::json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 35.0, "lon": 139.0, "tags": {"amenity": "cafe"}},
                {"type": "node", "id": 2, "lat": 35.0, "lon": 139.0, "tags": {"name": "  "}},
                {"type": "node", "id": 3, "tags": {"name": "Nowhere"}},
                {"type": "way", "id": 4, "center": {"lat": 35.1, "lon": 139.1}, "tags": {"name": "Hall", "tourism": "museum"}},
                {"type": "node", "id": 5, "lat": 35.2, "lon": 139.2}
            ]
        })
        .to_string();

        let spots = parse_response(&body, &ChainTable::default()).unwrap();
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].id, "way/4");
        assert_eq!(spots[0].lat, 35.1);
        assert_eq!(spots[0].category, Category::TouristAttraction);
    }

    #[test]
    fn metadata_and_description_are_collected() {
        let body = serde_json::json!({
            "elements": [{
                "type": "node",
                "id": 42,
                "lat": 35.66,
                "lon": 139.70,
                "tags": {
                    "name": "Fuglen",
                    "amenity": "cafe",
                    "cuisine": "coffee_shop",
                    "opening_hours": "Mo-Su 08:00-22:00",
                    "contact:phone": "+81 3-3481-0884",
                    "addr:city": "Shibuya",
                    "addr:housenumber": "1-16-11"
                }
            }]
        })
        .to_string();

        let spot = parse_response(&body, &ChainTable::default()).unwrap().remove(0);
        assert_eq!(spot.id, "node/42");
        assert_eq!(spot.raw_category, "amenity=cafe");
        assert_eq!(spot.phone.as_deref(), Some("+81 3-3481-0884"));
        assert_eq!(spot.address.as_deref(), Some("Shibuya 1-16-11"));
        assert!(spot.website.is_none());
        assert!(!spot.is_chain);
        assert_eq!(
            spot.description,
            "Cuisine: coffee_shop / Hours: Mo-Su 08:00-22:00 / Address: Shibuya 1-16-11 / Tel: +81 3-3481-0884"
        );
    }

    #[test]
    fn chain_flags_come_from_table_and_brand() {
        let body = serde_json::json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 35.0, "lon": 139.0,
                 "tags": {"name": "Starbucks Shinjuku", "amenity": "cafe"}},
                {"type": "node", "id": 2, "lat": 35.0, "lon": 139.0,
                 "tags": {"name": "Bean Stand", "amenity": "cafe", "brand": "Bean Stand"}}
            ]
        })
        .to_string();

        let spots = parse_response(&body, &ChainTable::default()).unwrap();
        assert!(spots[0].is_major_chain && spots[0].is_chain);
        assert!(spots[1].is_chain && !spots[1].is_major_chain);
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_response("<html>busy</html>", &ChainTable::default()).is_err());
    }
}
