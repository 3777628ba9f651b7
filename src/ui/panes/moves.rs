//! Move output pane rendering

use super::{border_style, visible_range};
use crate::snapshot::MoveLine;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the emitted moves pane
pub fn render_moves_pane(
    frame: &mut Frame,
    area: Rect,
    moves: &[MoveLine],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(format!(" Moves ({}) ", moves.len()))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if moves.is_empty() {
        let paragraph = Paragraph::new("(no moves yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let number_width = moves.len().to_string().len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders
    let (skip, take) = visible_range(scroll_offset, moves.len(), visible_height);

    let items: Vec<ListItem> = moves
        .iter()
        .enumerate()
        .skip(skip)
        .take(take)
        .map(|(i, line)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>width$} ", i + 1, width = number_width),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(line.mv.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
                Span::styled(
                    format!("  @ step {}", line.step),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
