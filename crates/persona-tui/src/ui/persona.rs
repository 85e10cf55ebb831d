//! Persona pane: right panel.

use persona_core::{completion::CompletionClient, source::ContentSource};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, Focus};

const HOW_TO: [&str; 6] = [
  "How to use:",
  "  1. Enter a Reddit profile URL",
  "  2. Select model and content limit (Tab, ←→)",
  "  3. Press Enter to generate the persona",
  "",
  "The persona is saved to <output>/<username>_persona.txt.",
];

/// Render the persona, the last error, or usage help into `area`.
pub fn draw<S, C>(f: &mut Frame, area: Rect, app: &mut App<S, C>)
where
  S: ContentSource + 'static,
  C: CompletionClient + 'static,
{
  let border = if app.focus == Focus::Persona { Color::Cyan } else { Color::DarkGray };
  let block = Block::default()
    .title(" 📄 Generated Persona ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if let Some(error) = &app.error {
    let mut lines = vec![Line::from(Span::styled(
      format!("❌ {error}"),
      Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))];
    if let Some(hint) = app.hint {
      lines.push(Line::from(""));
      lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::Yellow))));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    return;
  }

  match &app.report {
    Some(report) => {
      let para = Paragraph::new(report.document.text.clone()).wrap(Wrap { trim: false });
      let rows = para.line_count(inner.width);
      let max_scroll = rows.saturating_sub(usize::from(inner.height));
      app.fit_persona(u16::try_from(max_scroll).unwrap_or(u16::MAX));
      f.render_widget(para.scroll((app.persona_scroll, 0)), inner);
    }
    None => {
      let lines: Vec<Line> = HOW_TO
        .iter()
        .map(|l| Line::from(Span::styled(*l, Style::default().fg(Color::DarkGray))))
        .collect();
      f.render_widget(Paragraph::new(lines), inner);
    }
  }
}
