pub mod chains;
pub mod geo;
pub mod models;
pub mod scoring;
pub mod select;
pub mod session;

pub use chains::ChainTable;
pub use geo::{BoundingBox, haversine_km, interpolate_points, search_radius_m};
pub use models::{Category, Coordinate, Point, Spot, Stars};
pub use scoring::{ScoreCard, ScoreTrace, score_spot};
pub use session::{Action, Effect, Notice, RollOutcome, RollRequest, RollStats, Session, reduce};
