//! Input form and run statistics: left column.

use persona_core::{completion::CompletionClient, source::ContentSource};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, Focus};

/// Render the form and statistics into `area`.
pub fn draw<S, C>(f: &mut Frame, area: Rect, app: &App<S, C>)
where
  S: ContentSource + 'static,
  C: CompletionClient + 'static,
{
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(8), Constraint::Min(0)])
    .split(area);

  draw_inputs(f, rows[0], app);
  draw_stats(f, rows[1], app);
}

fn label_style(focused: bool) -> Style {
  if focused {
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::DarkGray)
  }
}

fn draw_inputs<S, C>(f: &mut Frame, area: Rect, app: &App<S, C>)
where
  S: ContentSource + 'static,
  C: CompletionClient + 'static,
{
  let block = Block::default()
    .title(" 📋 User Input ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let url_text = if app.url.is_empty() && app.focus != Focus::Url {
    Span::styled("https://www.reddit.com/user/username/", Style::default().fg(Color::DarkGray))
  } else if app.focus == Focus::Url {
    Span::raw(format!("{}_", app.url))
  } else {
    Span::raw(app.url.clone())
  };

  let lines = vec![
    Line::from(Span::styled("Reddit Profile URL", label_style(app.focus == Focus::Url))),
    Line::from(url_text),
    Line::from(""),
    Line::from(vec![
      Span::styled(format!("{:<15}", "Content Limit"), label_style(app.focus == Focus::Limit)),
      Span::raw(format!("◀ {} ▶", app.limit)),
    ]),
    Line::from(vec![
      Span::styled(format!("{:<15}", "Groq Model"), label_style(app.focus == Focus::Model)),
      Span::raw(format!("◀ {} ▶", app.model)),
      Span::styled(format!("  {}", app.model.description()), Style::default().fg(Color::DarkGray)),
    ]),
  ];

  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_stats<S, C>(f: &mut Frame, area: Rect, app: &App<S, C>)
where
  S: ContentSource + 'static,
  C: CompletionClient + 'static,
{
  let block = Block::default()
    .title(" 📊 Analysis Statistics ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(report) = &app.report else {
    f.render_widget(
      Paragraph::new("No persona generated yet.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let stat = |label: &str, value: String| {
    Line::from(vec![
      Span::styled(
        format!("{label:<20}"),
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      ),
      Span::raw(value),
    ])
  };

  let lines = vec![
    stat("User", format!("u/{}", report.username)),
    stat("Posts Analyzed", report.total_posts.to_string()),
    stat("Comments Analyzed", report.total_comments.to_string()),
    stat("Total Content", (report.total_posts + report.total_comments).to_string()),
    Line::from(""),
    stat("Saved to", report.path.display().to_string()),
  ];
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
