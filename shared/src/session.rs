//! Application state for one browser session and the pure reducer driving it.
//!
//! The UI dispatches [`Action`]s and re-renders from the returned
//! [`Session`]. Side effects are described by [`Effect`] and executed by the
//! caller; their completion comes back as another action tagged with the
//! ticket it was issued for, so a slow roll can never overwrite a newer one.

use serde::{Deserialize, Serialize};

use crate::geo::{haversine_km, search_radius_m};
use crate::models::{Category, Coordinate, Point, Spot};
use crate::select::merge_into_history;

/// Everything a roll needs, captured when it was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollRequest {
    pub ticket: u64,
    pub start: Point,
    pub end: Point,
    pub category: Category,
    pub radius_m: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub spots: Vec<Spot>,
    pub points_queried: usize,
    pub points_failed: usize,
    pub candidates: usize,
}

impl RollOutcome {
    pub fn stats(&self) -> RollStats {
        RollStats {
            points_queried: self.points_queried,
            points_failed: self.points_failed,
            candidates: self.candidates,
        }
    }
}

/// Counters of the last committed roll, shown next to its results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollStats {
    pub points_queried: usize,
    pub points_failed: usize,
    pub candidates: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollProgress {
    pub done: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notice {
    NeedPoints,
    NothingFound,
    RetryLater(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    MapClicked(Coordinate),
    SetCategory(Category),
    RollRequested,
    RollProgress {
        ticket: u64,
        done: usize,
        total: usize,
    },
    RollFinished {
        ticket: u64,
        result: Result<RollOutcome, String>,
        elapsed_ms: f64,
    },
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Roll(RollRequest),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub start: Option<Point>,
    pub end: Option<Point>,
    pub category: Category,
    pub radius_m: Option<u32>,
    pub results: Vec<Spot>,
    pub history: Vec<Spot>,
    pub loading: bool,
    pub progress: Option<RollProgress>,
    pub last_roll_ms: Option<f64>,
    pub last_stats: Option<RollStats>,
    pub notice: Option<Notice>,
    ticket: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> Option<(Coordinate, Coordinate)> {
        Some((self.start.as_ref()?.coordinate(), self.end.as_ref()?.coordinate()))
    }

    pub fn route_distance_km(&self) -> Option<f64> {
        self.route().map(|(start, end)| haversine_km(start, end))
    }
}

pub fn reduce(mut state: Session, action: Action) -> (Session, Option<Effect>) {
    match action {
        Action::MapClicked(coord) => {
            if state.start.is_none() {
                state.start = Some(Point::named(coord.lat, coord.lon, "Start"));
                state.notice = None;
            } else if state.end.is_none() {
                let end = Point::named(coord.lat, coord.lon, "Goal");
                if let Some(start) = &state.start {
                    let distance_km = haversine_km(start.coordinate(), end.coordinate());
                    state.radius_m = Some(search_radius_m(distance_km));
                }
                state.end = Some(end);
                state.notice = None;
            }
        }
        Action::SetCategory(category) => state.category = category,
        Action::RollRequested => {
            let (Some(start), Some(end), Some(radius_m)) =
                (state.start.clone(), state.end.clone(), state.radius_m)
            else {
                state.notice = Some(Notice::NeedPoints);
                return (state, None);
            };
            state.ticket += 1;
            state.loading = true;
            state.progress = None;
            state.results.clear();
            state.notice = None;
            let request = RollRequest {
                ticket: state.ticket,
                start,
                end,
                category: state.category,
                radius_m,
            };
            return (state, Some(Effect::Roll(request)));
        }
        Action::RollProgress {
            ticket,
            done,
            total,
        } => {
            if ticket == state.ticket && state.loading {
                state.progress = Some(RollProgress { done, total });
            }
        }
        Action::RollFinished {
            ticket,
            result,
            elapsed_ms,
        } => {
            if ticket != state.ticket || !state.loading {
                return (state, None);
            }
            state.loading = false;
            state.progress = None;
            state.last_roll_ms = Some(elapsed_ms);
            state.last_stats = result.as_ref().ok().map(RollOutcome::stats);
            match result {
                Ok(outcome) if outcome.spots.is_empty() => {
                    state.results.clear();
                    state.notice = Some(Notice::NothingFound);
                }
                Ok(outcome) => {
                    merge_into_history(&mut state.history, &outcome.spots);
                    state.results = outcome.spots;
                }
                Err(message) => {
                    state.results.clear();
                    state.notice = Some(Notice::RetryLater(message));
                }
            }
        }
        Action::Reset => {
            let ticket = state.ticket;
            state = Session {
                ticket,
                ..Session::default()
            };
        }
    }
    (state, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHINJUKU: Coordinate = Coordinate {
        lat: 35.6896,
        lon: 139.6917,
    };
    const SHIBUYA: Coordinate = Coordinate {
        lat: 35.6580,
        lon: 139.7016,
    };

    fn apply(state: Session, actions: impl IntoIterator<Item = Action>) -> Session {
        actions
            .into_iter()
            .fold(state, |state, action| reduce(state, action).0)
    }

    fn with_route() -> Session {
        apply(
            Session::new(),
            [Action::MapClicked(SHINJUKU), Action::MapClicked(SHIBUYA)],
        )
    }

    fn request_roll(state: Session) -> (Session, RollRequest) {
        match reduce(state, Action::RollRequested) {
            (state, Some(Effect::Roll(request))) => (state, request),
            other => panic!("expected a roll effect, got {other:?}"),
        }
    }

    fn outcome(ids: &[&str]) -> RollOutcome {
        RollOutcome {
            spots: ids
                .iter()
                .map(|id| Spot::new(*id, *id, SHINJUKU))
                .collect(),
            points_queried: 3,
            ..RollOutcome::default()
        }
    }

    #[test]
    fn clicks_set_start_then_end_then_nothing() {
        let state = apply(
            Session::new(),
            [
                Action::MapClicked(SHINJUKU),
                Action::MapClicked(SHIBUYA),
                Action::MapClicked(Coordinate::new(0.0, 0.0)),
            ],
        );
        assert_eq!(state.start.as_ref().map(Point::coordinate), Some(SHINJUKU));
        assert_eq!(state.end.as_ref().map(Point::coordinate), Some(SHIBUYA));
        assert_eq!(state.radius_m, Some(3_000));
    }

    #[test]
    fn roll_without_points_raises_notice() {
        let (state, effect) = reduce(
            apply(Session::new(), [Action::MapClicked(SHINJUKU)]),
            Action::RollRequested,
        );
        assert!(effect.is_none());
        assert_eq!(state.notice, Some(Notice::NeedPoints));
        assert!(!state.loading);
    }

    #[test]
    fn roll_request_captures_session_inputs() {
        let state = apply(with_route(), [Action::SetCategory(Category::Cafe)]);
        let (state, request) = request_roll(state);
        assert!(state.loading);
        assert_eq!(request.ticket, 1);
        assert_eq!(request.category, Category::Cafe);
        assert_eq!(request.radius_m, 3_000);
        assert_eq!(request.start.coordinate(), SHINJUKU);
    }

    #[test]
    fn finished_roll_replaces_results_and_merges_history() {
        let (state, first) = request_roll(with_route());
        let state = apply(
            state,
            [Action::RollFinished {
                ticket: first.ticket,
                result: Ok(outcome(&["node/1", "node/2"])),
                elapsed_ms: 812.0,
            }],
        );
        let (state, second) = request_roll(state);
        assert!(state.results.is_empty(), "results cleared when a roll starts");

        let state = apply(
            state,
            [Action::RollFinished {
                ticket: second.ticket,
                result: Ok(outcome(&["node/2", "node/3"])),
                elapsed_ms: 400.0,
            }],
        );
        assert!(!state.loading);
        assert_eq!(state.results.len(), 2);
        let history: Vec<&str> = state.history.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(history, ["node/1", "node/2", "node/3"]);
        assert_eq!(state.last_roll_ms, Some(400.0));
    }

    #[test]
    fn stale_roll_is_ignored() {
        let (state, first) = request_roll(with_route());
        let (state, second) = request_roll(state);
        let state = apply(
            state,
            [
                Action::RollProgress {
                    ticket: first.ticket,
                    done: 1,
                    total: 3,
                },
                Action::RollFinished {
                    ticket: first.ticket,
                    result: Ok(outcome(&["node/old"])),
                    elapsed_ms: 1.0,
                },
            ],
        );
        assert!(state.loading);
        assert!(state.results.is_empty());
        assert!(state.progress.is_none());

        let state = apply(
            state,
            [Action::RollFinished {
                ticket: second.ticket,
                result: Ok(outcome(&["node/new"])),
                elapsed_ms: 1.0,
            }],
        );
        assert_eq!(state.results[0].id, "node/new");
        assert!(state.history.iter().all(|spot| spot.id != "node/old"));
    }

    #[test]
    fn empty_roll_reports_nothing_found() {
        let (state, request) = request_roll(with_route());
        let state = apply(
            state,
            [Action::RollFinished {
                ticket: request.ticket,
                result: Ok(RollOutcome::default()),
                elapsed_ms: 10.0,
            }],
        );
        assert_eq!(state.notice, Some(Notice::NothingFound));
        assert!(!state.loading);
        assert!(state.history.is_empty());
    }

    #[test]
    fn finished_roll_keeps_its_counters() {
        let (state, request) = request_roll(with_route());
        let mut partial = outcome(&["node/1"]);
        partial.points_failed = 1;
        partial.candidates = 5;
        let state = apply(
            state,
            [Action::RollFinished {
                ticket: request.ticket,
                result: Ok(partial),
                elapsed_ms: 10.0,
            }],
        );
        assert_eq!(
            state.last_stats,
            Some(RollStats {
                points_queried: 3,
                points_failed: 1,
                candidates: 5,
            })
        );

        let (state, request) = request_roll(state);
        let state = apply(
            state,
            [Action::RollFinished {
                ticket: request.ticket,
                result: Err("timeout".into()),
                elapsed_ms: 10.0,
            }],
        );
        assert_eq!(state.last_stats, None);
    }

    #[test]
    fn failed_roll_clears_loading_and_asks_for_retry() {
        let (state, request) = request_roll(with_route());
        let state = apply(
            state,
            [Action::RollFinished {
                ticket: request.ticket,
                result: Err("boom".into()),
                elapsed_ms: 10.0,
            }],
        );
        assert!(!state.loading);
        assert_eq!(state.notice, Some(Notice::RetryLater("boom".into())));
    }

    #[test]
    fn reset_discards_in_flight_roll() {
        let (state, request) = request_roll(with_route());
        let state = apply(state, [Action::Reset]);
        assert!(state.start.is_none());
        assert!(!state.loading);

        let state = apply(
            state,
            [Action::RollFinished {
                ticket: request.ticket,
                result: Ok(outcome(&["node/1"])),
                elapsed_ms: 1.0,
            }],
        );
        assert!(state.results.is_empty());
        assert!(state.history.is_empty());

        let (_, next) = request_roll(apply(
            state,
            [Action::MapClicked(SHINJUKU), Action::MapClicked(SHIBUYA)],
        ));
        assert!(next.ticket > request.ticket);
    }
}
