//! Sends `tracing` events from the app and the `spots` crate to the browser
//! console, one console call per formatted event.

use std::borrow::Cow;
use std::io::{self, Write};

use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use wasm_bindgen::JsValue;

const DEFAULT_FILTER: &str = "info,spots=debug";

/// Compile-time override, e.g. `FRONTEND_LOG=spots=trace trunk build`.
fn log_directives() -> Option<&'static str> {
    option_env!("FRONTEND_LOG")
}

pub fn init() {
    let result = tracing_subscriber::registry()
        .with(log_filter(log_directives()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(ConsoleWriter)
                .without_time()
                .with_ansi(false),
        )
        .try_init();
    if let Err(err) = result {
        web_sys::console::warn_1(&format!("[frontend] console logging unavailable: {err}").into());
    }
}

/// Parses `directives`, falling back to the default filter when they are
/// missing or malformed.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleLine::new(*meta.level())
    }
}

/// Buffers one formatted event and hands it to the console on drop.
pub struct ConsoleLine {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleLine {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::new(),
        }
    }
}

impl Write for ConsoleLine {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        let Some(line) = line_text(&self.buf) else {
            return;
        };
        let message = JsValue::from_str(&line);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&message),
            Level::WARN => web_sys::console::warn_1(&message),
            Level::INFO => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
    }
}

fn line_text(buf: &[u8]) -> Option<Cow<'_, str>> {
    let text = String::from_utf8_lossy(buf);
    if text.trim().is_empty() {
        return None;
    }
    Some(match text {
        Cow::Borrowed(text) => Cow::Borrowed(text.trim_end()),
        Cow::Owned(text) => Cow::Owned(text.trim_end().to_string()),
    })
}
