//! Overpass QL query construction.

use shared::{BoundingBox, Category};

/// `["key"="value"]`, or `["key"]` when any value is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagFilter {
    pub key: &'static str,
    pub value: Option<&'static str>,
}

impl TagFilter {
    const fn eq(key: &'static str, value: &'static str) -> Self {
        Self {
            key,
            value: Some(value),
        }
    }

    const fn present(key: &'static str) -> Self {
        Self { key, value: None }
    }

    fn selector(&self) -> String {
        match self.value {
            Some(value) => format!("[\"{}\"=\"{}\"]", self.key, value),
            None => format!("[\"{}\"]", self.key),
        }
    }
}

const RESTAURANT: &[TagFilter] = &[
    TagFilter::eq("amenity", "restaurant"),
    TagFilter::eq("amenity", "fast_food"),
];
const CAFE: &[TagFilter] = &[TagFilter::eq("amenity", "cafe")];
const TOURIST_ATTRACTION: &[TagFilter] = &[
    TagFilter::eq("tourism", "attraction"),
    TagFilter::eq("tourism", "museum"),
];
const GAS_STATION: &[TagFilter] = &[TagFilter::eq("amenity", "fuel")];
const SHOP: &[TagFilter] = &[TagFilter::present("shop")];

pub fn tag_filters(category: Category) -> Vec<TagFilter> {
    match category {
        Category::Restaurant => RESTAURANT.to_vec(),
        Category::Cafe => CAFE.to_vec(),
        Category::TouristAttraction => TOURIST_ATTRACTION.to_vec(),
        Category::GasStation => GAS_STATION.to_vec(),
        Category::Shop => SHOP.to_vec(),
        Category::All => [RESTAURANT, CAFE, TOURIST_ATTRACTION, GAS_STATION, SHOP].concat(),
    }
}

/// Builds the query body: a union of node selectors scoped to `bbox`,
/// returning geometry.
pub fn build_query(bbox: &BoundingBox, category: Category, timeout_secs: u32) -> String {
    let area = format!(
        "({:.6},{:.6},{:.6},{:.6})",
        bbox.south, bbox.west, bbox.north, bbox.east
    );
    let mut query = format!("[out:json][timeout:{timeout_secs}];\n(\n");
    for filter in tag_filters(category) {
        query.push_str(&format!("  node{}{area};\n", filter.selector()));
    }
    query.push_str(");\nout geom;\n");
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Coordinate;

    fn bbox() -> BoundingBox {
        BoundingBox {
            south: 35.1,
            west: 139.2,
            north: 35.3,
            east: 139.4,
        }
    }

    #[test]
    fn cafe_query_selects_only_cafes() {
        let query = build_query(&bbox(), Category::Cafe, 25);
        assert_eq!(
            query,
            "[out:json][timeout:25];\n(\n  node[\"amenity\"=\"cafe\"](35.100000,139.200000,35.300000,139.400000);\n);\nout geom;\n"
        );
    }

    #[test]
    fn shop_filter_matches_any_value() {
        let query = build_query(&bbox(), Category::Shop, 25);
        assert!(query.contains("node[\"shop\"](35.100000"));
        assert!(!query.contains("amenity"));
    }

    #[test]
    fn all_unions_every_filter() {
        let filters = tag_filters(Category::All);
        assert_eq!(filters.len(), 7);
        for category in [
            Category::Restaurant,
            Category::Cafe,
            Category::TouristAttraction,
            Category::GasStation,
            Category::Shop,
        ] {
            for filter in tag_filters(category) {
                assert!(filters.contains(&filter), "{category} filter missing");
            }
        }
        let query = build_query(&bbox(), Category::All, 25);
        assert_eq!(query.matches("  node[").count(), 7);
    }

    #[test]
    fn bounding_box_order_is_south_west_north_east() {
        let bbox = BoundingBox::around(Coordinate::new(0.0, 0.0), 1_110.0);
        let query = build_query(&bbox, Category::GasStation, 10);
        assert!(query.contains("[timeout:10]"));
        assert!(query.contains("(-0.010000,-0.010000,0.010000,0.010000)"));
    }

    #[test]
    fn each_selector_sits_on_its_own_line() {
        let query = build_query(&bbox(), Category::Restaurant, 25);
        let selectors: Vec<&str> = query.lines().filter(|line| line.starts_with("  node")).collect();
        assert_eq!(
            selectors,
            [
                "  node[\"amenity\"=\"restaurant\"](35.100000,139.200000,35.300000,139.400000);",
                "  node[\"amenity\"=\"fast_food\"](35.100000,139.200000,35.300000,139.400000);",
            ]
        );
    }
}
