use std::fmt::{self, Write as _};

use colored::*;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "RECONR_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Sends log lines through the progress bar layer so they never tear a
/// running spinner.
pub fn init_logging() -> anyhow::Result<()> {
    let indicatif_layer = IndicatifLayer::new();
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(ReconrFormatter)
                .with_writer(indicatif_layer.get_stdout_writer()),
        )
        .with(indicatif_layer)
        .try_init()?;
    Ok(())
}

#[derive(Default)]
struct EventFields {
    message: String,
    raw_msg: Option<String>,
    success: bool,
    extra: String,
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "raw_msg" => self.raw_msg = Some(value.to_string()),
            "message" => self.message = value.to_string(),
            name => {
                let _ = write!(self.extra, " {name}={value}");
            }
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "success" => self.success = value,
            name => {
                let _ = write!(self.extra, " {name}={value}");
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => {
                let _ = write!(self.message, "{value:?}");
            }
            name => {
                let _ = write!(self.extra, " {name}={value:?}");
            }
        }
    }
}

pub struct ReconrFormatter;

impl ReconrFormatter {
    fn glyph(level: &Level, success: bool) -> ColoredString {
        match *level {
            Level::TRACE => "[ ]".dimmed(),
            Level::DEBUG => "[?]".blue(),
            Level::INFO if success => "[+]".green().bold(),
            Level::INFO => "[~]".cyan(),
            Level::WARN => "[*]".yellow().bold(),
            Level::ERROR => "[-]".red().bold(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for ReconrFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = EventFields::default();
        event.record(&mut fields);

        if let Some(raw) = fields.raw_msg {
            return writeln!(writer, "{raw}");
        }

        let glyph = Self::glyph(event.metadata().level(), fields.success);
        write!(writer, "{glyph} {}", fields.message)?;
        if !fields.extra.is_empty() {
            write!(writer, "{}", fields.extra.dimmed())?;
        }
        writeln!(writer)
    }
}
