//! Headless session command.
//!
//! Runs a session in the foreground, printing each phase as a line instead
//! of drawing the orb.

use std::io::{self, IsTerminal, Write};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use colored::Colorize;
use serde::Serialize;

use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::SessionConfig;
use crate::error::BreatheError;
use crate::output::format_phase_line;
use crate::sequencer::{
    format_countdown, CueEmitter, PhaseView, Presenter, Sequencer, Silent, TechniqueSummary,
    TerminalBell,
};
use crate::technique::Catalog;

/// One line of `--output json` run output.
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum RunEvent<'a> {
    Selected(&'a TechniqueSummary),
    Cycles { cycles: u32, duration: &'a str },
    Started,
    Phase(&'a PhaseView),
    Idle,
    Summary(&'a RunSummary),
}

/// Presenter that prints phases as lines.
pub struct LinePresenter<W: Write> {
    out: W,
    format: OutputFormat,
    live_countdown: bool,
    countdown_open: bool,
    phases: usize,
}

impl<W: Write> LinePresenter<W> {
    /// Create a presenter. `live_countdown` rewrites the remaining time in
    /// place and only makes sense on a terminal.
    pub const fn new(out: W, format: OutputFormat, live_countdown: bool) -> Self {
        Self {
            out,
            format,
            live_countdown,
            countdown_open: false,
            phases: 0,
        }
    }

    /// Number of phases shown so far.
    #[must_use]
    pub const fn phases(&self) -> usize {
        self.phases
    }

    /// The underlying writer.
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    fn close_countdown(&mut self) {
        if self.countdown_open {
            self.countdown_open = false;
            self.line(String::new());
        }
    }

    fn line(&mut self, text: String) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "Failed to write session output");
        }
    }

    fn event(&mut self, event: &RunEvent<'_>) {
        match serde_json::to_string(event) {
            Ok(json) => self.line(json),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize session event"),
        }
    }
}

impl<W: Write> Presenter for LinePresenter<W> {
    fn technique_selected(&mut self, summary: &TechniqueSummary) {
        match self.format {
            OutputFormat::Json => self.event(&RunEvent::Selected(summary)),
            OutputFormat::Pretty => self.line(format!(
                "{} · {} · {}",
                summary.name.bold(),
                summary.ratio_text(),
                summary.duration_text()
            )),
        }
    }

    fn duration_changed(&mut self, cycles: u32, duration: &str) {
        match self.format {
            OutputFormat::Json => self.event(&RunEvent::Cycles { cycles, duration }),
            OutputFormat::Pretty => {
                self.line(format!("{cycles} cycles · Duration {duration}").dimmed().to_string());
            }
        }
    }

    fn session_started(&mut self) {
        if self.format == OutputFormat::Json {
            self.event(&RunEvent::Started);
        }
    }

    fn phase_started(&mut self, view: &PhaseView) {
        self.phases += 1;
        self.close_countdown();
        match self.format {
            OutputFormat::Json => self.event(&RunEvent::Phase(view)),
            OutputFormat::Pretty => {
                let line = format_phase_line(
                    &view.label,
                    view.phase,
                    view.transition.as_secs_f64(),
                    &view.cycle_text(),
                );
                self.line(line);
            }
        }
    }

    fn countdown(&mut self, remaining: Duration) {
        if !self.live_countdown || self.format == OutputFormat::Json {
            return;
        }
        self.countdown_open = true;
        let text = format!("\r  {}", format_countdown(remaining));
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write countdown");
        }
    }

    fn idle(&mut self) {
        self.close_countdown();
        if self.format == OutputFormat::Json {
            self.event(&RunEvent::Idle);
        }
    }
}

/// Result of a headless session.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Technique id.
    pub technique: String,
    /// Technique name.
    pub name: String,
    /// Cycles run.
    pub cycles: u32,
    /// Phases shown.
    pub phases: usize,
    /// Planned duration as `MM:SS`.
    pub duration: String,
    /// When the session started.
    pub started_at: DateTime<Local>,
    /// When the session ended.
    pub finished_at: DateTime<Local>,
}

/// Sleep until each deadline and poll until the session returns to idle.
pub fn drive<P: Presenter, C: CueEmitter>(sequencer: &mut Sequencer<P, C>) {
    while let Some(deadline) = sequencer.next_deadline() {
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        sequencer.poll(Instant::now());
    }
}

/// Execute run command
///
/// # Errors
///
/// Returns `BreatheError::NotFound` for an unknown technique id.
pub fn run(
    catalog: Catalog,
    config: &SessionConfig,
    args: RunArgs,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    let stdout = io::stdout();
    let live = stdout.is_terminal() && format == OutputFormat::Pretty;
    let sound = config.sound && !args.mute;

    // JSON lines on stdout must stay parseable, so the bell moves to stderr
    let cue: Box<dyn CueEmitter> = match (sound, format) {
        (false, _) => Box::new(Silent),
        (true, OutputFormat::Pretty) => Box::new(TerminalBell::stdout()),
        (true, OutputFormat::Json) => Box::new(TerminalBell::new(io::stderr())),
    };

    let presenter = LinePresenter::new(stdout, format, live);
    let mut sequencer = Sequencer::new(catalog, presenter, cue)
        .with_countdown_interval(config.countdown_interval())
        .with_sound(sound);

    let summary = run_session(&mut sequencer, config, args)?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string(&RunEvent::Summary(&summary))?),
        OutputFormat::Pretty => Ok(format!(
            "{} {}: {} cycles, {} phases in {}",
            "✓".green(),
            summary.name.bold(),
            summary.cycles,
            summary.phases,
            summary.duration
        )),
    }
}

fn run_session<W: Write, C: CueEmitter>(
    sequencer: &mut Sequencer<LinePresenter<W>, C>,
    config: &SessionConfig,
    args: RunArgs,
) -> Result<RunSummary, BreatheError> {
    let id = args
        .technique
        .or_else(|| config.default_technique.clone())
        .or_else(|| sequencer.catalog().first().map(|t| t.id.clone()))
        .ok_or(BreatheError::EmptyCatalog)?;

    sequencer.select(&id)?;
    if let Some(cycles) = args.cycles {
        sequencer.set_cycles(cycles);
    }

    let summary = sequencer
        .summary()
        .ok_or_else(|| BreatheError::NotFound(id.clone()))?;

    let started_at = Local::now();
    sequencer.start(Instant::now());
    drive(sequencer);

    Ok(RunSummary {
        technique: summary.id,
        name: summary.name,
        cycles: summary.cycles,
        phases: sequencer.presenter().phases(),
        duration: summary.duration,
        started_at,
        finished_at: Local::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::technique::{Phase, Step, Technique};

    fn quick_catalog() -> Catalog {
        Catalog::new(vec![Technique {
            id: "quick".to_string(),
            name: "Quick".to_string(),
            ratio: "1-1".to_string(),
            cycles: 2,
            description: String::new(),
            steps: vec![Step::new(Phase::Inhale, 0.02), Step::new(Phase::HoldAfter, 0.01)],
        }])
        .unwrap()
    }

    fn sequencer(format: OutputFormat) -> Sequencer<LinePresenter<Vec<u8>>, Silent> {
        Sequencer::new(
            quick_catalog(),
            LinePresenter::new(Vec::new(), format, false),
            Silent,
        )
    }

    fn output(seq: &Sequencer<LinePresenter<Vec<u8>>, Silent>) -> String {
        String::from_utf8(seq.presenter().get_ref().clone()).unwrap()
    }

    #[test]
    fn test_run_session_pretty() {
        colored::control::set_override(false);
        let mut seq = sequencer(OutputFormat::Pretty);
        let summary = run_session(&mut seq, &SessionConfig::default(), RunArgs::default()).unwrap();

        assert_eq!(summary.technique, "quick");
        assert_eq!(summary.cycles, 2);
        assert_eq!(summary.phases, 4);
        assert!(summary.finished_at >= summary.started_at);
        assert!(!seq.is_running());

        let text = output(&seq);
        assert!(text.contains("Quick · Ratio 1-1 · Duration 00:00"));
        assert_eq!(text.matches("Hold after").count(), 2);
        assert!(text.contains("Cycle 2 / 2"));
    }

    #[test]
    fn test_run_session_json_events() {
        let mut seq = sequencer(OutputFormat::Json);
        let args = RunArgs {
            cycles: Some(1),
            ..RunArgs::default()
        };
        let summary = run_session(&mut seq, &SessionConfig::default(), args).unwrap();
        assert_eq!(summary.phases, 2);

        let events: Vec<serde_json::Value> = output(&seq)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let kinds: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
        assert_eq!(
            kinds,
            vec!["idle", "selected", "cycles", "started", "phase", "phase", "idle"]
        );
        assert_eq!(events[4]["label"], "Inhale");
        assert_eq!(events[5]["phase"], "hold_after");
    }

    #[test]
    fn test_summary_event_is_one_line() {
        let mut seq = sequencer(OutputFormat::Json);
        let summary = run_session(&mut seq, &SessionConfig::default(), RunArgs::default()).unwrap();

        let line = serde_json::to_string(&RunEvent::Summary(&summary)).unwrap();
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["event"], "summary");
        assert_eq!(value["technique"], "quick");
        assert_eq!(value["phases"], 4);
    }

    #[test]
    fn test_run_session_unknown_technique() {
        let mut seq = sequencer(OutputFormat::Pretty);
        let args = RunArgs {
            technique: Some("nope".to_string()),
            ..RunArgs::default()
        };
        let err = run_session(&mut seq, &SessionConfig::default(), args).unwrap_err();
        assert!(matches!(err, BreatheError::NotFound(_)));
    }

    #[test]
    fn test_run_session_uses_configured_default() {
        let mut seq = sequencer(OutputFormat::Json);
        let config = SessionConfig {
            default_technique: Some("missing".to_string()),
            ..SessionConfig::default()
        };
        assert!(run_session(&mut seq, &config, RunArgs::default()).is_err());
    }
}
