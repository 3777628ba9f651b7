//! Frame chain pane rendering
//!
//! Each live frame is shown root first:
//! - Header with depth, storage location and a marker on the active frame
//! - Disk count and the three peg parameters
//! - Continuation tag and the caller link

use super::{border_style, visible_range};
use crate::memory::frame::FrameView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

fn frame_items(view: &FrameView, is_active: bool) -> Vec<ListItem<'static>> {
    let name_style = if is_active {
        Style::default()
            .fg(DEFAULT_THEME.function)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.muted_function)
    };
    let label = Style::default().fg(DEFAULT_THEME.comment);
    let number = Style::default().fg(DEFAULT_THEME.number);

    let header = Line::from(vec![
        Span::styled(
            if is_active { "▸ " } else { "  " },
            Style::default().fg(DEFAULT_THEME.secondary),
        ),
        Span::styled(format!("Frame {} ", view.depth), label),
        Span::styled("│ ", label),
        Span::styled(format!("hanoi({})", view.frame.disk_count), name_style),
        Span::styled(format!("  @ {}", view.location), label),
    ]);

    let pegs = Line::from(vec![
        Span::styled("    source ", label),
        Span::styled(view.frame.source.to_string(), number),
        Span::styled("  temp ", label),
        Span::styled(view.frame.temp.to_string(), number),
        Span::styled("  target ", label),
        Span::styled(view.frame.target.to_string(), number),
    ]);

    let caller = view
        .caller
        .map_or_else(|| "none".to_string(), |loc| loc.to_string());
    let link = Line::from(vec![
        Span::styled("    ↪ resume ", label),
        Span::styled(
            view.frame.continuation.label(),
            Style::default().fg(DEFAULT_THEME.type_name),
        ),
        Span::styled(format!("  caller {}", caller), label),
    ]);

    vec![ListItem::new(header), ListItem::new(pegs), ListItem::new(link)]
}

/// Render the frame chain pane
pub fn render_frames_pane(
    frame: &mut Frame,
    area: Rect,
    frames: &[FrameView],
    capacity: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = match capacity {
        Some(capacity) => format!(" Frames {}/{} ", frames.len(), capacity),
        None => format!(" Frames {} ", frames.len()),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let mut all_items = Vec::new();
    if frames.is_empty() {
        all_items.push(ListItem::new("(empty)").style(Style::default().fg(DEFAULT_THEME.comment)));
    } else {
        let top = frames.len() - 1;
        for (i, view) in frames.iter().enumerate() {
            all_items.extend(frame_items(view, i == top));
        }
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let (skip, take) = visible_range(scroll_offset, all_items.len(), visible_height);
    let visible: Vec<ListItem> = all_items.into_iter().skip(skip).take(take).collect();

    frame.render_widget(List::new(visible).block(block), area);
}
