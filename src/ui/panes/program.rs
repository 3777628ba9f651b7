//! Program pane rendering
//!
//! Shows the machine as a straight-line program of labeled states, the way a
//! hand-compiled listing would read, with an arrow on the state the next step
//! executes.

use super::border_style;
use crate::machine::engine::State;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// One line of listing per state
pub fn listing(state: State) -> &'static str {
    match state {
        State::Apply => "if frame.disks != 1 goto not-one",
        State::LeafMove => "emit frame.source -> frame.target; goto return",
        State::Recurse1 => "call (n-1, source, target, temp) resume move-one",
        State::AfterFirstRecursion => "call (1, source, temp, target) resume move-n-minus-1",
        State::AfterMiddleMove => "call (n-1, temp, source, target) resume after-second",
        State::AfterSecondRecursion => "goto return",
        State::Return => "pop frame; goto caller's continuation",
        State::Halted => "end",
    }
}

/// Render the program listing pane
pub fn render_program_pane(
    frame: &mut Frame,
    area: Rect,
    current: Option<(State, usize)>,
    is_focused: bool,
) {
    let title = match current {
        Some((_, step)) => format!(" Program (step {}) ", step),
        None => " Program ".to_string(),
    };
    let current = current.map(|(state, _)| state);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let label_width = State::ALL
        .iter()
        .map(|s| s.label().len())
        .max()
        .unwrap_or(0)
        + 1;

    let lines: Vec<Line> = State::ALL
        .iter()
        .map(|&state| {
            let is_current = current == Some(state);
            let marker = if is_current { "▶ " } else { "  " };
            let bg = if is_current {
                DEFAULT_THEME.current_line_bg
            } else {
                ratatui::style::Color::Reset
            };
            let label_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.function)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.keyword)
            };

            Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.secondary).bg(bg)),
                Span::styled(
                    format!("{:<width$}", format!("{}:", state.label()), width = label_width),
                    label_style,
                ),
                Span::styled(
                    format!(" {}", listing(state)),
                    Style::default().fg(DEFAULT_THEME.fg).bg(bg),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
