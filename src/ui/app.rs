//! Main TUI application state and logic

use crate::machine::timeline::Timeline;
use crate::towers::Towers;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Program,
    Frames,
    Towers,
    Moves,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: program -> moves -> frames -> towers)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Moves,
            FocusedPane::Moves => FocusedPane::Frames,
            FocusedPane::Frames => FocusedPane::Towers,
            FocusedPane::Towers => FocusedPane::Program,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Towers,
            FocusedPane::Moves => FocusedPane::Program,
            FocusedPane::Frames => FocusedPane::Moves,
            FocusedPane::Towers => FocusedPane::Frames,
        }
    }
}

/// The main application state
pub struct App {
    /// The recorded run being navigated
    pub timeline: Timeline,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub frames_scroll: usize,
    pub moves_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Delay between steps in play mode
    pub play_interval: Duration,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app over a recorded timeline
    pub fn new(timeline: Timeline) -> Self {
        let status_message = match timeline.error() {
            Some(e) => format!("Run stopped early: {}", e),
            None => String::from("Ready!"),
        };
        App {
            timeline,
            focused_pane: FocusedPane::Program,
            frames_scroll: usize::MAX,
            moves_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            play_interval: Duration::from_millis(250),
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= self.play_interval {
                if self.timeline.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.follow_output();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Program | Pegs | Moves
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Min(0),
            ])
            .split(columns[0]);

        let snapshot = self.timeline.current();
        let moves = self.timeline.moves_so_far();

        super::panes::render_program_pane(
            frame,
            left_rows[0],
            snapshot.map(|s| (s.state, s.step)),
            self.focused_pane == FocusedPane::Program,
        );

        let towers = Towers::replay(self.timeline.root_disks(), self.timeline.pegs(), &moves)
            .map_err(|e| e.to_string());
        super::panes::render_towers_pane(
            frame,
            left_rows[1],
            towers.as_ref().map_err(|e| e.clone()),
            self.focused_pane == FocusedPane::Towers,
        );

        super::panes::render_moves_pane(
            frame,
            left_rows[2],
            self.timeline.move_lines_so_far(),
            self.focused_pane == FocusedPane::Moves,
            &mut self.moves_scroll,
        );

        super::panes::render_frames_pane(
            frame,
            columns[1],
            snapshot.map(|s| s.frames.as_slice()).unwrap_or_default(),
            self.timeline.capacity(),
            self.focused_pane == FocusedPane::Frames,
            &mut self.frames_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.timeline.position(),
            self.timeline.len(),
            self.timeline.storage_name(),
            (self.timeline.memory_usage(), self.timeline.memory_limit()),
            self.timeline.error().is_some(),
            self.is_playing,
        );
    }

    /// Keep the newest move and the active frame in view
    fn follow_output(&mut self) {
        self.moves_scroll = usize::MAX;
        self.frames_scroll = usize::MAX;
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let mut stepped = 0;
                for _ in 0..n {
                    if self.timeline.step_forward().is_err() {
                        break;
                    }
                    stepped += 1;
                }
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.follow_output();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Frames => {
                    self.frames_scroll = self.frames_scroll.saturating_sub(1);
                }
                FocusedPane::Moves => {
                    self.moves_scroll = self.moves_scroll.saturating_sub(1);
                }
                FocusedPane::Program | FocusedPane::Towers => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Frames => {
                    self.frames_scroll = self.frames_scroll.saturating_add(1);
                }
                FocusedPane::Moves => {
                    self.moves_scroll = self.moves_scroll.saturating_add(1);
                }
                FocusedPane::Program | FocusedPane::Towers => {}
            },
            KeyCode::Char('+') => {
                self.play_interval = self
                    .play_interval
                    .saturating_sub(Duration::from_millis(50))
                    .max(Duration::from_millis(50));
                self.status_message = format!("Play interval {} ms", self.play_interval.as_millis());
            }
            KeyCode::Char('-') => {
                self.play_interval = (self.play_interval + Duration::from_millis(50))
                    .min(Duration::from_secs(2));
                self.status_message = format!("Play interval {} ms", self.play_interval.as_millis());
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(self.play_interval)
                            .unwrap_or_else(Instant::now);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                match self.timeline.jump_to_end() {
                    Ok(()) => {
                        self.status_message = match self.timeline.error() {
                            Some(e) => format!("Run stopped early: {}", e),
                            None => "Jumped to end".to_string(),
                        }
                    }
                    Err(e) => self.status_message = e.to_string(),
                }
                self.follow_output();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                match self.timeline.rewind_to_start() {
                    Ok(()) => self.status_message = "Jumped to start".to_string(),
                    Err(e) => self.status_message = e.to_string(),
                }
                self.follow_output();
            }
            _ => {}
        }
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        match self.timeline.step_forward() {
            Ok(()) => {
                self.status_message = match self.timeline.current().and_then(|s| s.last_move) {
                    Some(mv) => format!("Stepped forward: {}", mv),
                    None => "Stepped forward".to_string(),
                };
                self.follow_output();
            }
            Err(e) => {
                self.status_message = match self.timeline.error() {
                    Some(run_error) => format!("Run stopped early: {}", run_error),
                    None => format!("Cannot step forward: {}", e),
                };
            }
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        match self.timeline.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.follow_output();
            }
            Err(e) => {
                self.status_message = format!("Cannot step backward: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::stack::FramePool;

    fn app() -> App {
        let timeline = Timeline::record(FramePool::new(), 2, 1, 2, 3, 1 << 20).unwrap();
        App::new(timeline)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::from(code));
    }

    #[test]
    fn test_focus_cycles_both_ways() {
        let mut pane = FocusedPane::Program;
        for _ in 0..4 {
            pane = pane.next();
        }
        assert_eq!(pane, FocusedPane::Program);
        assert_eq!(FocusedPane::Program.next().prev(), FocusedPane::Program);
    }

    #[test]
    fn test_keys_navigate_timeline() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.timeline.position(), 1);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.timeline.position(), 4);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.timeline.position(), 3);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.timeline.position(), app.timeline.len() - 1);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.timeline.position(), 0);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_rewind_on_empty_history_reports_failure() {
        // A one-byte limit rejects even the initial snapshot
        let timeline = Timeline::record(FramePool::new(), 2, 1, 2, 3, 1).unwrap();
        assert!(timeline.is_empty());
        let mut app = App::new(timeline);
        press(&mut app, KeyCode::Backspace);
        assert!(app.status_message.contains("No snapshots available"));
        assert_ne!(app.status_message, "Jumped to start");
    }
}
