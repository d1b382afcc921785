pub mod client;
pub mod config;
pub mod error;
pub mod parse;
pub mod query;
pub mod roll;

pub use client::OverpassClient;
pub use config::OverpassConfig;
pub use error::{RollError, SpotError};
pub use roll::{SpotSource, roll};
