use serde::{Deserialize, Serialize};

use crate::geo::{haversine_km, is_behind_route, point_to_line_km};
use crate::models::{Coordinate, Spot, Stars};

const BASE_SCORE: i32 = 100;
const FAR_FROM_ROUTE_KM: f64 = 2.5;
const OFF_ROUTE_KM: f64 = 1.8;
const NEAR_START_KM: f64 = 0.3;

/// One rule that cost a spot points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Penalty {
    BehindRoute,
    FarFromRoute,
    OffRoute,
    ChainStore,
    NearStart,
    NoOpeningHours,
    NoPhone,
    NoWebsite,
}

impl Penalty {
    pub fn points(self) -> i32 {
        match self {
            Penalty::BehindRoute => 40,
            Penalty::FarFromRoute => 30,
            Penalty::OffRoute => 20,
            Penalty::ChainStore => 20,
            Penalty::NearStart => 25,
            Penalty::NoOpeningHours | Penalty::NoPhone | Penalty::NoWebsite => 10,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Penalty::BehindRoute => "behind the route",
            Penalty::FarFromRoute => "more than 2.5 km off the route",
            Penalty::OffRoute => "more than 1.8 km off the route",
            Penalty::ChainStore => "chain store",
            Penalty::NearStart => "right next to the start",
            Penalty::NoOpeningHours => "no opening hours",
            Penalty::NoPhone => "no phone",
            Penalty::NoWebsite => "no website",
        }
    }
}

/// Debug record of how a rating was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTrace {
    pub penalties: Vec<Penalty>,
    pub score: i32,
    pub major_chain: bool,
}

impl ScoreTrace {
    pub fn summary(&self) -> String {
        if self.major_chain {
            return "major chain".to_string();
        }
        let mut parts: Vec<String> = self
            .penalties
            .iter()
            .map(|penalty| format!("-{} {}", penalty.points(), penalty.describe()))
            .collect();
        parts.push(format!("= {}", self.score));
        parts.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub score: i32,
    pub stars: Stars,
    pub distance_from_route_km: f64,
    pub trace: ScoreTrace,
}

/// Rates a spot against the straight route from `start` to `end`.
///
/// The rating is for display only; roll selection ignores it.
pub fn score_spot(spot: &Spot, start: Coordinate, end: Coordinate) -> ScoreCard {
    let position = spot.coordinate();
    let distance_from_route_km = point_to_line_km(position, start, end);

    let mut penalties = Vec::new();
    if is_behind_route(position, start, end) {
        penalties.push(Penalty::BehindRoute);
    }
    if distance_from_route_km > FAR_FROM_ROUTE_KM {
        penalties.push(Penalty::FarFromRoute);
    } else if distance_from_route_km > OFF_ROUTE_KM {
        penalties.push(Penalty::OffRoute);
    }
    if spot.is_chain {
        penalties.push(Penalty::ChainStore);
    }
    if haversine_km(position, start) <= NEAR_START_KM {
        penalties.push(Penalty::NearStart);
    }
    if is_blank(&spot.opening_hours) {
        penalties.push(Penalty::NoOpeningHours);
    }
    if is_blank(&spot.phone) {
        penalties.push(Penalty::NoPhone);
    }
    if is_blank(&spot.website) {
        penalties.push(Penalty::NoWebsite);
    }

    let score = BASE_SCORE - penalties.iter().map(|p| p.points()).sum::<i32>();
    let stars = if spot.is_major_chain {
        Stars::One
    } else {
        Stars::from_score(score)
    };

    ScoreCard {
        score,
        stars,
        distance_from_route_km,
        trace: ScoreTrace {
            penalties,
            score,
            major_chain: spot.is_major_chain,
        },
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(|value| value.trim().is_empty())
}
