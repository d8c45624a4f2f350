// Centralized logging setup for tracing with runtime log level, file logging, and structured output
use std::env;
use std::fs;
use thiserror::Error;
use tracing_subscriber::{
    fmt,
    EnvFilter,
    layer::{SubscriberExt, Layer, Context},
    util::{SubscriberInitExt, TryInitError}
};
use tracing::{Id, Subscriber, span, field::Field, field::Visit, debug};
use std::time::{Instant, Duration};
use std::sync::OnceLock; // For global file guard

static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to prepare log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

pub fn init_logging(bin_name: String) -> Result<(), LoggingError> {
    // Load log levels for console and file from env
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());

    // Load file log flag from env
    let log_to_file = env::var("LOG_TO_FILE").unwrap_or_else(|_| "false".to_string()) == "true";

    // Filter globally to "warn", filter our own crate to the levels from .env
    let env_filter_console = EnvFilter::try_new(
        format!("warn,growth_model={},server={},baseline_report={}", console_log_level, console_log_level, console_log_level)
    ).unwrap_or_else(|_| EnvFilter::new("growth_model=info"));

    let env_filter_file = EnvFilter::try_new(
        format!("warn,growth_model={},server={},baseline_report={}", file_log_level, file_log_level, file_log_level)
    ).unwrap_or_else(|_| EnvFilter::new("growth_model=info"));

    // Console layer: always enabled, pretty human-readable logs
    let console_layer = fmt::Layer::new()
        .pretty()
        .with_filter(env_filter_console);

    let timing_layer = SpanTimingLayer;

    if log_to_file {
        // One file per process start: logs/<bin>_<timestamp>.log
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let log_dir = std::path::Path::new("logs");
        fs::create_dir_all(log_dir)?;
        let log_file_name = format!("{}_{}.log", bin_name, timestamp);

        let file_appender = tracing_appender::rolling::never(log_dir, log_file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        FILE_GUARD.set(guard).ok(); // Store the guard globally

        // File layer: structured JSON logs with UTC timestamps
        let file_layer = fmt::Layer::new()
            .json()
            .with_writer(non_blocking)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(env_filter_file);

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .with(timing_layer)
            .try_init()?;
    } else {
        // If not logging to file, just use console layer with timing
        tracing_subscriber::registry()
            .with(console_layer)
            .with(timing_layer)
            .try_init()?;
    }

    Ok(())
}

/// Logs busy/idle/total time when a span opened with `on_close = true` closes
struct SpanTimingLayer;

/// Per-span timing state kept in the span's extensions
struct SpanTiming {
    opened: Instant,
    last_transition: Instant,
    busy: Duration,
    idle: Duration,
}

struct OnCloseVisitor<'a> {
    on_close: &'a mut bool,
}

impl Visit for OnCloseVisitor<'_> {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "on_close" {
            *self.on_close = value;
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
}

impl<S> Layer<S> for SpanTimingLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut on_close = false;
        attrs.record(&mut OnCloseVisitor { on_close: &mut on_close });
        if on_close {
            let now = Instant::now();
            span.extensions_mut().insert(SpanTiming {
                opened: now,
                last_transition: now,
                busy: Duration::ZERO,
                idle: Duration::ZERO,
            });
        }
    }

    fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        if let Some(timing) = span.extensions_mut().get_mut::<SpanTiming>() {
            // time since the last exit (or open) was spent waiting
            timing.idle += timing.last_transition.elapsed();
            timing.last_transition = Instant::now();
        }
    }

    fn on_exit(&self, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        if let Some(timing) = span.extensions_mut().get_mut::<SpanTiming>() {
            timing.busy += timing.last_transition.elapsed();
            timing.last_transition = Instant::now();
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else { return };
        let timing = span.extensions_mut().remove::<SpanTiming>();
        if let Some(timing) = timing {
            debug!(
                span = span.name(),
                busy_time = ?timing.busy,
                idle_time = ?timing.idle,
                total_time = ?timing.opened.elapsed(),
                "span closed"
            );
        }
    }
}
