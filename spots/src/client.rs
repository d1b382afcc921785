use reqwest::header::CONTENT_TYPE;
use shared::{BoundingBox, Category, Coordinate, Spot};

use crate::config::OverpassConfig;
use crate::error::SpotError;
use crate::parse::parse_response;
use crate::query::build_query;
use crate::roll::SpotSource;

const ERROR_BODY_SNIPPET: usize = 200;

/// HTTP client for the Overpass interpreter endpoint.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    config: OverpassConfig,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, SpotError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, SpotError> {
        Self::new(OverpassConfig::with_endpoint(endpoint))
    }

    /// Fetches named spots of `category` inside the box of `radius_m`
    /// around `center`.
    pub async fn fetch_spots(
        &self,
        center: Coordinate,
        radius_m: u32,
        category: Category,
    ) -> Result<Vec<Spot>, SpotError> {
        let bbox = BoundingBox::around(center, f64::from(radius_m));
        let query = build_query(&bbox, category, self.config.timeout_secs);
        tracing::debug!(
            "overpass query category={category} radius={radius_m}m center=({:.5},{:.5})",
            center.lat,
            center.lon
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SpotError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_SNIPPET).collect(),
            });
        }

        let spots = parse_response(&body, &self.config.chains)?;
        tracing::debug!("overpass returned {} named spots", spots.len());
        Ok(spots)
    }
}

impl SpotSource for OverpassClient {
    async fn fetch_spots(
        &self,
        center: Coordinate,
        radius_m: u32,
        category: Category,
    ) -> Result<Vec<Spot>, SpotError> {
        OverpassClient::fetch_spots(self, center, radius_m, category).await
    }
}
