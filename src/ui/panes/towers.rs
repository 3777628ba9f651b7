//! Peg pane rendering

use super::border_style;
use crate::towers::Towers;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render each peg as a row of disks, bottom disk first
pub fn render_towers_pane(
    frame: &mut Frame,
    area: Rect,
    towers: Result<&Towers, String>,
    is_focused: bool,
) {
    let block = Block::default()
        .title(" Pegs ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let towers = match towers {
        Ok(towers) => towers,
        Err(message) => {
            let paragraph = Paragraph::new(message)
                .block(block)
                .style(Style::default().fg(DEFAULT_THEME.error));
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let mut lines = Vec::new();
    for (i, (peg, disks)) in towers.pegs().iter().enumerate() {
        let role = ["source", "temp", "target"][i];
        let mut spans = vec![
            Span::styled(
                format!("{:>6} ", role),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::styled(format!("{:>3} ┤", peg), Style::default().fg(DEFAULT_THEME.number)),
        ];
        for disk in disks {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                "█".repeat(*disk as usize),
                Style::default().fg(DEFAULT_THEME.disk),
            ));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if towers.is_solved() {
        lines.push(Line::from(Span::styled(
            "  solved",
            Style::default().fg(DEFAULT_THEME.success),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
