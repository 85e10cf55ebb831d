//! TUI rendering: orchestrates all panes.

pub mod form;
pub mod persona;

use chrono::Local;
use persona_core::{completion::CompletionClient, source::ContentSource};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Gauge, Paragraph},
};

use crate::app::{App, Focus};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S, C>(f: &mut Frame, app: &mut App<S, C>)
where
  S: ContentSource + 'static,
  C: CompletionClient + 'static,
{
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // progress
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0]);
  draw_body(f, rows[1], app);
  draw_progress(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " 🎭 Reddit User Persona Generator",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::DarkGray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body<S, C>(f: &mut Frame, area: Rect, app: &mut App<S, C>)
where
  S: ContentSource + 'static,
  C: CompletionClient + 'static,
{
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
    .split(area);

  form::draw(f, cols[0], app);
  persona::draw(f, cols[1], app);
}

// ─── Progress ─────────────────────────────────────────────────────────────────

fn draw_progress<S, C>(f: &mut Frame, area: Rect, app: &App<S, C>)
where
  S: ContentSource + 'static,
  C: CompletionClient + 'static,
{
  let color = if app.error.is_some() { Color::Red } else { Color::Green };
  let gauge = Gauge::default()
    .gauge_style(Style::default().fg(color).bg(Color::Black))
    .percent(app.progress)
    .label(app.stage_label.clone());
  f.render_widget(gauge, area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S, C>(f: &mut Frame, area: Rect, app: &App<S, C>)
where
  S: ContentSource + 'static,
  C: CompletionClient + 'static,
{
  let (mode_label, hints) = match app.focus {
    Focus::Url => ("URL", "Type a profile URL  Tab next  Enter generate  Esc quit"),
    Focus::Limit => ("LIMIT", "←→ adjust  Tab next  Enter generate  Esc quit"),
    Focus::Model => ("MODEL", "←→ choose  Tab next  Enter generate  Esc quit"),
    Focus::Persona => ("PERSONA", "↑↓/jk scroll  PgUp/PgDn page  g/G top/end  Esc quit"),
  };
  let mode_label = if app.running { "RUNNING" } else { mode_label };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {hints}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span])).style(Style::default().bg(Color::Black)),
    area,
  );
}
