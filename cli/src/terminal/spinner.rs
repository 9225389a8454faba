//! Stage spinners drawn by the `tracing-indicatif` layer.
//!
//! A spinner lives exactly as long as its span, so dropping the span (or
//! leaving an instrumented future) clears it from the terminal.

use std::sync::atomic::{AtomicUsize, Ordering};

use colored::*;
use indicatif::ProgressStyle;
use reconr_common::network::probe::{ProbeResult, TraceResult};
use reconr_common::probing::ProgressObserver;
use reconr_core::observer::LogObserver;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::colors;

const TICKS: &[&str] = &[
    "▁▁▁▁▁", "▁▂▂▂▁", "▁▄▂▄▁", "▂▄▆▄▂", "▄▆█▆▄", "▂▄▆▄▂", "▁▄▂▄▁", "▁▂▂▂▁",
];

fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

/// Span with an attached spinner showing `msg`.
pub fn stage_span(msg: &str) -> Span {
    let span = info_span!("stage", indicatif.pb_show = true);
    span.pb_set_style(&style());
    span.pb_set_message(&msg.color(colors::TEXT_DEFAULT).to_string());
    span
}

/// Keeps the spinner text in step with pipeline progress.
///
/// With `quiet == 0` each probe and trace is also logged.
pub struct SpinnerObserver {
    span: Span,
    candidates: usize,
    probed: AtomicUsize,
    reachable: AtomicUsize,
    traced: AtomicUsize,
    verbose: bool,
}

impl SpinnerObserver {
    pub fn new(span: Span, candidates: usize, quiet: u8) -> Self {
        Self {
            span,
            candidates,
            probed: AtomicUsize::new(0),
            reachable: AtomicUsize::new(0),
            traced: AtomicUsize::new(0),
            verbose: quiet == 0,
        }
    }
}

impl ProgressObserver for SpinnerObserver {
    fn on_probe(&self, result: &ProbeResult) {
        if self.verbose {
            LogObserver.on_probe(result);
        }
        let probed = self.probed.fetch_add(1, Ordering::Relaxed) + 1;
        if result.is_reachable() {
            self.reachable.fetch_add(1, Ordering::Relaxed);
        }
        let reachable = self.reachable.load(Ordering::Relaxed);
        self.span.pb_set_message(&format!(
            "Probed {probed}/{} candidates, {} reachable...",
            self.candidates,
            reachable.to_string().green().bold()
        ));
    }

    fn on_trace(&self, result: &TraceResult) {
        if self.verbose {
            LogObserver.on_trace(result);
        }
        let traced = self.traced.fetch_add(1, Ordering::Relaxed) + 1;
        let reachable = self.reachable.load(Ordering::Relaxed);
        self.span.pb_set_message(&format!(
            "Traced {}/{reachable} paths...",
            traced.to_string().green().bold()
        ));
    }
}
