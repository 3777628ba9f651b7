//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`program`]: The machine's labeled states, current state highlighted
//! - [`frames`]: Live frame chain with fields, locations and caller links
//! - [`towers`]: The three pegs after the moves emitted so far
//! - [`moves`]: Emitted moves in order
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each pane module exports a `render_*` function taking the frame, its area,
//! the data to show, whether it has focus, and its scroll offset where it
//! scrolls.

pub mod frames;
pub mod moves;
pub mod program;
pub mod status;
pub mod towers;

pub use frames::render_frames_pane;
pub use moves::render_moves_pane;
pub use program::render_program_pane;
pub use status::render_status_bar;
pub use towers::render_towers_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp `offset` so the last page stays full; returns the visible range
fn visible_range(offset: &mut usize, total_items: usize, visible_height: usize) -> (usize, usize) {
    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }
    (*offset, visible_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_range_clamps_to_last_page() {
        let mut offset = usize::MAX;
        assert_eq!(visible_range(&mut offset, 10, 4), (6, 4));
        let mut offset = 3;
        assert_eq!(visible_range(&mut offset, 2, 4), (0, 4));
    }
}
