pub mod logging;
pub mod map;

use seed::{prelude::*, virtual_dom::AtValue, *};
use serde::Deserialize;
use shared::session::RollProgress;
use shared::{
    Action, Category, Coordinate, Effect, Notice, RollOutcome, RollRequest, RollStats, Session, Spot,
    reduce,
};
use spots::{OverpassClient, OverpassConfig, roll};
use wasm_bindgen::{JsCast, JsValue, prelude::wasm_bindgen};

use crate::map::{LeafletMap, MapSurface, sync_map};

const MAP_ELEMENT_ID: &str = "map";

pub struct Model {
    session: Session,
    map: LeafletMap,
    client: Option<OverpassClient>,
}

pub enum Msg {
    Session(Action),
    CategoryChanged(String),
    FocusSpot(String),
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("map-click"), |event| {
        let Ok(event) = event.dyn_into::<web_sys::CustomEvent>() else {
            web_sys::console::error_1(&"[frontend] map-click is not a CustomEvent".into());
            return None;
        };
        let payload: MapClickPayload = match serde_wasm_bindgen::from_value(event.detail()) {
            Ok(payload) => payload,
            Err(err) => {
                web_sys::console::error_1(
                    &format!("[frontend] ignoring malformed map click: {err}").into(),
                );
                return None;
            }
        };
        let Some(coordinate) = payload.coordinate() else {
            web_sys::console::error_1(
                &format!(
                    "[frontend] ignoring map click off the globe lat={} lon={}",
                    payload.lat, payload.lon
                )
                .into(),
            );
            return None;
        };
        web_sys::console::debug_1(
            &format!(
                "[frontend] map click lat={:.5} lon={:.5}",
                coordinate.lat, coordinate.lon
            )
            .into(),
        );
        Some(Msg::Session(Action::MapClicked(coordinate)))
    }));

    let config = OverpassConfig::default();
    web_sys::console::debug_1(&format!("[frontend] overpass endpoint {}", config.endpoint).into());
    let client = match OverpassClient::new(config) {
        Ok(client) => Some(client),
        Err(err) => {
            web_sys::console::error_1(&format!("[frontend] cannot build HTTP client: {err}").into());
            None
        }
    };

    Model {
        session: Session::new(),
        map: LeafletMap::mount(MAP_ELEMENT_ID),
        client,
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::Session(action) => dispatch(action, model, orders),
        Msg::CategoryChanged(value) => {
            dispatch(Action::SetCategory(Category::parse(&value)), model, orders)
        }
        Msg::FocusSpot(id) => model.map.open_popup(&id),
    }
}

fn dispatch(action: Action, model: &mut Model, orders: &mut impl Orders<Msg>) {
    let previous = std::mem::take(&mut model.session);
    let (next, effect) = reduce(previous.clone(), action);
    sync_map(&previous, &next, &model.map);
    model.session = next;

    if let Some(Effect::Roll(request)) = effect {
        match model.client.clone() {
            Some(client) => start_roll(client, request, orders),
            None => {
                orders.send_msg(Msg::Session(Action::RollFinished {
                    ticket: request.ticket,
                    result: Err("HTTP client unavailable".to_string()),
                    elapsed_ms: 0.0,
                }));
            }
        }
    }
}

fn start_roll(client: OverpassClient, request: RollRequest, orders: &mut impl Orders<Msg>) {
    let sender = orders.msg_sender();
    web_sys::console::debug_1(
        &format!(
            "[frontend] roll #{} category={} radius={}m",
            request.ticket, request.category, request.radius_m
        )
        .into(),
    );
    orders.perform_cmd(async move {
        let started = js_sys::Date::now();
        let ticket = request.ticket;
        let mut rng = rand::thread_rng();
        let result = roll(&client, &request, &mut rng, |done, total| {
            sender(Some(Msg::Session(Action::RollProgress {
                ticket,
                done,
                total,
            })));
        })
        .await
        .inspect(|outcome| {
            let report = JsValue::from(roll_report(ticket, outcome));
            if outcome.points_failed > 0 {
                web_sys::console::warn_1(&report);
            } else {
                web_sys::console::debug_1(&report);
            }
        })
        .map_err(|err| {
            web_sys::console::error_1(&format!("[frontend] roll #{ticket} failed: {err}").into());
            err.to_string()
        });

        Msg::Session(Action::RollFinished {
            ticket,
            result,
            elapsed_ms: js_sys::Date::now() - started,
        })
    });
}

pub fn view(model: &Model) -> Node<Msg> {
    let header = h1!["Detour Gacha"];
    div![
        C!["app-container"],
        header,
        view_controls(&model.session),
        view_status(&model.session),
        view_spot_list("This roll", &model.session.results, true),
        view_spot_list("History", &model.session.history, false),
    ]
}

fn view_controls(session: &Session) -> Node<Msg> {
    let point_label = |label: &str, point: Option<&shared::Point>| {
        div![
            C!["point"],
            span![C!["label"], label],
            strong![point
                .map(|p| format!("{:.5} / {:.5}", p.lat, p.lon))
                .unwrap_or_else(|| "click the map".to_string())],
        ]
    };

    form![
        C!["controls"],
        fieldset![
            legend!["Route"],
            point_label("Start", session.start.as_ref()),
            point_label("Goal", session.end.as_ref()),
        ],
        fieldset![
            legend!["Looking for"],
            select![
                Category::ALL.iter().map(|category| {
                    option![
                        attrs! {
                            At::Value => category.as_str(),
                            At::Selected => bool_attr(*category == session.category),
                        },
                        category.label(),
                    ]
                }),
                input_ev(Ev::Change, Msg::CategoryChanged),
            ],
        ],
        button![
            if session.loading {
                "Rolling…"
            } else {
                "Roll"
            },
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::Session(Action::RollRequested)
            }),
            attrs! { At::Disabled => bool_attr(session.loading) },
            C!["roll-btn"],
        ],
        button![
            "Reset",
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::Session(Action::Reset)
            }),
            C!["reset-btn"],
        ],
    ]
}

fn view_status(session: &Session) -> Node<Msg> {
    let card = |label: &str, content: String| {
        div![
            C!["metadata-card"],
            span![C!["label"], label],
            strong![content],
        ]
    };

    div![
        C!["status"],
        div![
            C!["metadata-grid"],
            session
                .route_distance_km()
                .map(|km| card("Distance", format!("{km:.2} km")))
                .unwrap_or_else(|| empty![]),
            session
                .radius_m
                .map(|radius| card("Search radius", format!("{radius} m")))
                .unwrap_or_else(|| empty![]),
            session
                .last_roll_ms
                .map(|ms| card("Last roll", format!("{:.1} s", ms / 1000.0)))
                .unwrap_or_else(|| empty![]),
            session
                .last_stats
                .map(|stats| card("Candidates", stats_text(stats)))
                .unwrap_or_else(|| empty![]),
        ],
        if session.loading {
            p![C!["progress"], progress_text(session.progress)]
        } else {
            empty![]
        },
        if let Some(notice) = &session.notice {
            p![C!["notice"], notice_text(notice)]
        } else {
            empty![]
        },
    ]
}

fn view_spot_list(title: &str, spots: &[Spot], numbered: bool) -> Node<Msg> {
    if spots.is_empty() {
        return empty![];
    }
    let items = spots.iter().enumerate().map(|(idx, spot)| {
        let id = spot.id.clone();
        li![
            C!["spot"],
            if numbered {
                span![C!["marker-number"], (idx + 1).to_string()]
            } else {
                empty![]
            },
            strong![&spot.name],
            span![
                C!["stars"],
                spot.rating.map(|stars| stars.glyphs()).unwrap_or_default()
            ],
            small![spot.category.label()],
            if spot.description.is_empty() {
                empty![]
            } else {
                p![C!["description"], &spot.description]
            },
            ev(Ev::Click, move |_| Msg::FocusSpot(id)),
        ]
    });

    div![C!["spot-list"], h2![title], ul![items]]
}

pub fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::NeedPoints => "Click the map twice to set a start and a goal first.".to_string(),
        Notice::NothingFound => "Nothing turned up around this route. Try another category.".to_string(),
        Notice::RetryLater(_) => "Something went wrong. Please try again in a moment.".to_string(),
    }
}

pub fn progress_text(progress: Option<RollProgress>) -> String {
    match progress {
        Some(RollProgress { done, total }) => format!("Searching… {done}/{total}"),
        None => "Searching…".to_string(),
    }
}

pub fn stats_text(stats: RollStats) -> String {
    let answered = stats.points_queried.saturating_sub(stats.points_failed);
    format!(
        "{} from {answered}/{} points",
        stats.candidates, stats.points_queried
    )
}

pub fn roll_report(ticket: u64, outcome: &RollOutcome) -> String {
    format!(
        "[frontend] roll #{ticket} picked {} of {} candidates, {}/{} points failed",
        outcome.spots.len(),
        outcome.candidates,
        outcome.points_failed,
        outcome.points_queried
    )
}

#[wasm_bindgen(start)]
pub fn start() {
    logging::init();
    App::start("app", init, update, view);
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

#[derive(Deserialize)]
struct MapClickPayload {
    lat: f64,
    lon: f64,
}

impl MapClickPayload {
    fn coordinate(&self) -> Option<Coordinate> {
        let coordinate = Coordinate::new(self.lat, self.lon);
        let on_globe = coordinate.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon);
        on_globe.then_some(coordinate)
    }
}
