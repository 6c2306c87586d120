//! Console output for solver progress.
//!
//! Provides a `tracing` layer that prints the solver's structured events
//! as one readable line each. Enabled with the `console` feature.

use std::io::{self, Write};
use std::sync::OnceLock;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_FILTER: &str = "stepwise_solver=info";

/// Installs the console layer as the global subscriber.
///
/// Only the first call has effect. `RUST_LOG` overrides the default
/// `stepwise_solver=info` filter; set it to `stepwise_solver=debug` to see
/// every step.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // Another global subscriber may already be installed.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats solver events.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("stepwise") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        if let Some(line) = format_solver_event(&visitor) {
            let _ = writeln!(io::stdout().lock(), "{}", line);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    phase: Option<String>,
    phase_index: Option<u64>,
    duration_ms: Option<u64>,
    steps: Option<u64>,
    step: Option<u64>,
    speed: Option<u64>,
    score: Option<String>,
    seed: Option<u64>,
    error: Option<String>,
    terminated_early: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        let s = s.trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "message" => self.message = Some(s),
            "phase" => self.phase = Some(s),
            "score" => self.score = Some(s),
            "error" => self.error = Some(s),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "phase" => self.phase = Some(value.to_string()),
            "score" => self.score = Some(value.to_string()),
            "error" => self.error = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "phase_index" => self.phase_index = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "steps" => self.steps = Some(value),
            "step" => self.step = Some(value),
            "speed" => self.speed = Some(value),
            "seed" => self.seed = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if let Ok(value) = u64::try_from(value) {
            self.record_u64(field, value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "terminated_early" {
            self.terminated_early = Some(value);
        }
    }
}

fn format_solver_event(v: &EventVisitor) -> Option<String> {
    let score = v.score.as_deref().unwrap_or("N/A");
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let line = match v.event.as_deref()? {
        "solve_start" => format!(
            "[Solver] Solving started: seed ({}), starting score ({})",
            v.seed.unwrap_or(0),
            score
        ),
        "phase_start" => format!(
            "[{}] phase ({}) started: score ({})",
            phase,
            v.phase_index.unwrap_or(0),
            score
        ),
        "phase_end" => {
            let mut line = format!(
                "[{}] phase ({}) ended: time spent ({}), score ({}), step total ({})",
                phase,
                v.phase_index.unwrap_or(0),
                format_duration_ms(v.duration_ms.unwrap_or(0)),
                score,
                v.steps.unwrap_or(0)
            );
            if let Some(speed) = v.speed {
                line.push_str(&format!(", move evaluation speed ({}/sec)", speed));
            }
            line
        }
        "phase_error" | "solve_error" => format!(
            "[{}] failed after {} steps: {}",
            v.phase.as_deref().unwrap_or("Solver"),
            v.steps.unwrap_or(0),
            v.error.as_deref().unwrap_or("unknown error")
        ),
        "no_doable_move" => format!(
            "[{}] step {}: {}",
            phase,
            v.step.unwrap_or(0),
            v.message.as_deref().unwrap_or("no doable move")
        ),
        "step" => format!("    -> Step {:>7} | {}", v.step.unwrap_or(0), score),
        "solve_end" => {
            let ending = if v.terminated_early == Some(true) {
                "terminated early"
            } else {
                "ended"
            };
            format!(
                "[Solver] Solving {}: time spent ({}), best score ({}), step total ({})",
                ending,
                format_duration_ms(v.duration_ms.unwrap_or(0)),
                score,
                v.steps.unwrap_or(0)
            )
        }
        _ => return None,
    };
    Some(line)
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
