//! UI rendering for the TUI.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::sequencer::{OrbStyle, Rgb};
use crate::tui::app::App;
use crate::tui::event::HELP;

/// Orb radius at scale 1.0, in canvas units (the canvas is 2 units tall).
const BASE_RADIUS: f64 = 0.55;

/// Rings drawn to fill the orb.
const FILL_RINGS: u32 = 12;

const TEXT: Color = Color::Rgb(0x3a, 0x1f, 0x12);

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    // Create layout: header, orb, labels, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Orb
            Constraint::Length(4), // Labels
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_orb(frame, app, chunks[1]);
    render_labels(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

/// Render the technique header.
fn render_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let palette = app.screen().gradient.palette();
    let sound = if app.sequencer.sound_enabled() { "on" } else { "off" };

    let line = app.screen().summary.as_ref().map_or_else(
        || Line::from("No technique available"),
        |summary| {
            Line::from(vec![
                Span::styled(
                    format!(" {} ", summary.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {} ", summary.ratio_text())),
                Span::raw(format!(" Cycles {} ", summary.cycles)),
                Span::raw(format!(" {} ", summary.duration_text())),
                Span::styled(format!(" Sound {sound} "), Style::default().add_modifier(Modifier::DIM)),
            ])
        },
    );

    let header = Paragraph::new(line)
        .style(Style::default().fg(TEXT).bg(color(palette[0])))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color(palette[2]))),
        );

    frame.render_widget(header, area);
}

/// Render the orb on the gradient background.
fn render_orb(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let palette = app.screen().gradient.palette();
    let style: OrbStyle = app.screen().orb.style_at(Instant::now());

    let radius = BASE_RADIUS * style.scale;
    let core = color(palette[2].mix(palette[1], 1.0 - style.glow));
    let halo = color(palette[1]);
    let halo_radius = radius * 0.3f64.mul_add(style.glow, 1.0);

    // Terminal cells are roughly twice as tall as wide
    let aspect = if area.height == 0 {
        1.0
    } else {
        f64::from(area.width) / (f64::from(area.height) * 2.0)
    };

    let canvas = Canvas::default()
        .background_color(color(palette[0]))
        .marker(Marker::Braille)
        .x_bounds([-aspect, aspect])
        .y_bounds([-1.0, 1.0])
        .paint(move |ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: halo_radius,
                color: halo,
            });
            for ring in 1..=FILL_RINGS {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: radius * f64::from(ring) / f64::from(FILL_RINGS),
                    color: core,
                });
            }
        });

    frame.render_widget(canvas, area);
}

/// Render phase label, countdown and cycle progress.
fn render_labels(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let screen = app.screen();
    let palette = screen.gradient.palette();

    let lines = vec![
        Line::from(Span::styled(
            screen.phase_label.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(screen.countdown.clone()),
        Line::from(Span::styled(
            screen.cycle.clone(),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let labels = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT).bg(color(palette[1])));

    frame.render_widget(labels, area);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status_text = app.status.as_deref().unwrap_or(HELP);
    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}
