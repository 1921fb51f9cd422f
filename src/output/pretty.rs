use colored::Colorize;

use crate::output::DurationReport;
use crate::sequencer::OrbStyle;
use crate::technique::{format_duration, Catalog, Phase, Technique};

/// Colour a phase label the way the orb is tinted for it.
fn phase_colored(label: &str, phase: Phase) -> colored::ColoredString {
    match phase {
        Phase::Inhale => label.green(),
        Phase::Hold => label.yellow(),
        Phase::Exhale => label.cyan(),
        Phase::HoldAfter => label.magenta(),
    }
}

/// Format the technique list as a pretty table
pub fn format_techniques_pretty(catalog: &Catalog) -> String {
    let mut output = format!("Techniques ({} available)\n", catalog.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for technique in catalog.iter() {
        let duration = format_duration(technique.total_seconds(technique.cycles));
        output.push_str(&format!(
            "{:<18} {}  {}  {}\n",
            technique.id.bold(),
            technique.name,
            format!("Ratio {}", technique.ratio).dimmed(),
            format!("{} cycles · {duration}", technique.cycles).yellow()
        ));
    }

    output
}

/// Format a single technique with its steps
pub fn format_technique_pretty(technique: &Technique) -> String {
    let mut lines = vec![
        format!("{} ({})", technique.name.bold(), technique.id.dimmed()),
        "─".repeat(40),
    ];

    if !technique.description.is_empty() {
        lines.push(technique.description.clone());
        lines.push(String::new());
    }

    lines.push(format!("Ratio:    {}", technique.ratio));
    lines.push(format!("Cycles:   {}", technique.cycles));
    lines.push(format!(
        "Duration: {}",
        format_duration(technique.total_seconds(technique.cycles))
    ));
    lines.push(String::new());
    lines.push("Steps:".to_string());

    for (i, step) in technique.steps.iter().enumerate() {
        let style = OrbStyle::for_phase(step.phase);
        lines.push(format!(
            "  {}. {:<12} {:>5.1}s  {}",
            i + 1,
            phase_colored(&step.phase.label(), step.phase),
            step.seconds,
            format!("scale {:.2} glow {:.2}", style.scale, style.glow).dimmed()
        ));
    }

    lines.join("\n")
}

/// Format a duration report
pub fn format_duration_pretty(report: &DurationReport) -> String {
    let cycles = if report.cycles == 1 { "cycle" } else { "cycles" };
    format!(
        "{}: {} {cycles} · Duration {}",
        report.name.bold(),
        report.cycles,
        report.duration.green()
    )
}

/// Format a phase line for headless runs.
pub fn format_phase_line(label: &str, phase: Phase, seconds: f64, cycle_text: &str) -> String {
    format!(
        "{:<12} {:>5.1}s  {}",
        phase_colored(label, phase).bold(),
        seconds,
        cycle_text.dimmed()
    )
}
