//! One "gacha roll": sample the route, query around the samples, pick a few.

use rand::Rng;
use shared::geo::interpolate_points;
use shared::select::{dedupe_by_id, pick_random};
use shared::{Category, Coordinate, RollOutcome, RollRequest, Spot, score_spot};

use crate::error::{RollError, SpotError};

/// Evenly spaced points laid along the route.
pub const SAMPLE_POINTS: usize = 5;
/// Samples actually queried per roll.
pub const QUERIED_POINTS: usize = 3;
/// Spots surfaced per roll.
pub const PICKED_SPOTS: usize = 3;

/// Anything that can list spots around a point.
#[allow(async_fn_in_trait)]
pub trait SpotSource {
    async fn fetch_spots(
        &self,
        center: Coordinate,
        radius_m: u32,
        category: Category,
    ) -> Result<Vec<Spot>, SpotError>;
}

/// Runs one roll. Failed sample points are logged and skipped; the roll only
/// fails when its inputs are unusable. `on_progress(done, total)` fires after
/// every sample point.
pub async fn roll<S, R, P>(
    source: &S,
    request: &RollRequest,
    rng: &mut R,
    mut on_progress: P,
) -> Result<RollOutcome, RollError>
where
    S: SpotSource + ?Sized,
    R: Rng + ?Sized,
    P: FnMut(usize, usize),
{
    let start = request.start.coordinate();
    let end = request.end.coordinate();
    if !start.is_finite() || !end.is_finite() {
        return Err(RollError::InvalidRoute);
    }
    if request.radius_m == 0 {
        return Err(RollError::InvalidRadius);
    }

    let samples = interpolate_points(start, end, SAMPLE_POINTS);
    let selected = pick_random(&samples, QUERIED_POINTS, rng);
    tracing::info!(
        "roll #{} category={} radius={}m querying {} of {} sample points",
        request.ticket,
        request.category,
        request.radius_m,
        selected.len(),
        samples.len()
    );

    let mut candidates = Vec::new();
    let mut points_failed = 0;
    for (idx, point) in selected.iter().enumerate() {
        match source
            .fetch_spots(*point, request.radius_m, request.category)
            .await
        {
            Ok(spots) => {
                tracing::debug!(
                    "sample ({:.5},{:.5}) yielded {} spots",
                    point.lat,
                    point.lon,
                    spots.len()
                );
                candidates.extend(spots);
            }
            Err(err) => {
                points_failed += 1;
                tracing::warn!(
                    "skipping sample ({:.5},{:.5}): {err}",
                    point.lat,
                    point.lon
                );
            }
        }
        on_progress(idx + 1, selected.len());
    }

    let total_candidates = candidates.len();
    let rated: Vec<Spot> = dedupe_by_id(candidates)
        .into_iter()
        .map(|spot| {
            let card = score_spot(&spot, start, end);
            spot.with_rating(card)
        })
        .collect();
    let spots = pick_random(&rated, PICKED_SPOTS, rng);

    tracing::info!(
        "roll #{} picked {} of {} unique candidates ({} failed points)",
        request.ticket,
        spots.len(),
        rated.len(),
        points_failed
    );

    Ok(RollOutcome {
        spots,
        points_queried: selected.len(),
        points_failed,
        candidates: total_candidates,
    })
}
