use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scoring::{ScoreCard, ScoreTrace};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn interpolate(self, other: Self, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// A start or end point picked on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            name: None,
        }
    }

    pub fn named(lat: f64, lon: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            name: Some(name.into()),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

impl From<Coordinate> for Point {
    fn from(coord: Coordinate) -> Self {
        Self::new(coord.lat, coord.lon)
    }
}

/// Search filter and normalized spot category. `All` doubles as "other" for
/// spots that match none of the specific kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Restaurant,
    Cafe,
    TouristAttraction,
    GasStation,
    Shop,
    #[default]
    All,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::All,
        Category::Restaurant,
        Category::Cafe,
        Category::TouristAttraction,
        Category::GasStation,
        Category::Shop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Cafe => "cafe",
            Category::TouristAttraction => "tourist_attraction",
            Category::GasStation => "gas_station",
            Category::Shop => "shop",
            Category::All => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Restaurant => "Restaurant",
            Category::Cafe => "Cafe",
            Category::TouristAttraction => "Sightseeing",
            Category::GasStation => "Gas station",
            Category::Shop => "Shop",
            Category::All => "Anything",
        }
    }

    /// Parses the snake_case identifier; unknown values fall back to `All`.
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .unwrap_or(Category::All)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Stars {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Stars {
    pub fn from_score(score: i32) -> Self {
        if score >= 70 {
            Stars::Three
        } else if score >= 30 {
            Stars::Two
        } else {
            Stars::One
        }
    }

    pub fn count(self) -> u8 {
        self as u8
    }

    pub fn glyphs(self) -> String {
        let filled = usize::from(self.count());
        format!("{}{}", "★".repeat(filled), "☆".repeat(3 - filled))
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.count()
    }
}

impl TryFrom<u8> for Stars {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Stars::One),
            2 => Ok(Stars::Two),
            3 => Ok(Stars::Three),
            other => Err(format!("star rating out of range: {other}")),
        }
    }
}

/// A candidate point of interest returned by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub raw_category: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_chain: bool,
    #[serde(default)]
    pub is_major_chain: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Stars>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_route_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_trace: Option<ScoreTrace>,
}

impl Spot {
    /// Bare spot with only the identifying fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, coord: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat: coord.lat,
            lon: coord.lon,
            raw_category: "unknown".to_string(),
            category: Category::All,
            address: None,
            phone: None,
            website: None,
            opening_hours: None,
            cuisine: None,
            brand: None,
            description: String::new(),
            is_chain: false,
            is_major_chain: false,
            rating: None,
            distance_from_route_km: None,
            score_trace: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }

    pub fn with_rating(mut self, card: ScoreCard) -> Self {
        self.rating = Some(card.stars);
        self.distance_from_route_km = Some(card.distance_from_route_km);
        self.score_trace = Some(card.trace);
        self
    }
}
