use std::{
    io::{self, Write},
    thread,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use glam::IVec2;

use engine::{
    direction::Direction,
    scheduler::{RunConfig, StepScheduler},
};

use crate::ui::{MazeView, Scene};

const MIN_SIZE: i32 = 1;
const MAX_WIDTH: i32 = 58;
const MAX_HEIGHT: i32 = 28;
const DELAY_STEP_MS: u64 = 10;
const MAX_DELAY_MS: u64 = 2000;
const LOOP_SLEEP: Duration = Duration::from_millis(4);

// The configuration surface: the terminal stand-in for size and delay
// sliders. Edits apply at the next regenerate.
struct Settings {
    width: i32,
    height: i32,
    step_delay_ms: u64,
}

impl Settings {
    fn new() -> Self {
        Self {
            width: 15,
            height: 10,
            step_delay_ms: 40,
        }
    }

    // Starts the walk from the grid's center, clamped into bounds.
    fn run_config(&self) -> RunConfig {
        let start = IVec2::new(self.width / 2, self.height / 2).clamp(
            IVec2::ZERO,
            IVec2::new(self.width - 1, self.height - 1),
        );

        RunConfig {
            width: self.width,
            height: self.height,
            start,
            step_delay: Duration::from_millis(self.step_delay_ms),
        }
    }
}

enum KeyOutcome {
    Handled,
    Ignored,
    Quit,
}

pub fn run<W: Write>(mut view: MazeView<W>) -> io::Result<()> {
    let mut settings = Settings::new();
    let mut scheduler = StepScheduler::new();
    let mut markers: Option<(IVec2, IVec2)> = None;
    let mut last_move: Option<Direction> = None;
    let mut note = String::new();

    regenerate(
        &mut scheduler,
        &settings,
        &mut markers,
        &mut last_move,
        &mut note,
    );

    let mut last_drawn = String::new();
    let mut dirty = true;

    loop {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                match handle_key(
                    key,
                    &mut settings,
                    &mut scheduler,
                    &mut markers,
                    &mut last_move,
                    &mut note,
                ) {
                    KeyOutcome::Quit => return Ok(()),
                    KeyOutcome::Handled => dirty = true,
                    KeyOutcome::Ignored => {}
                }
            }
        }

        if let Some(step) = scheduler.tick(Instant::now()) {
            markers = Some((step.cursor_to, step.cursor_from));
            last_move = Some(step.broken_wall.1);
            dirty = true;
        }

        let status = status_line(&settings, &scheduler, last_move, &note);
        if dirty || status != last_drawn {
            view.draw(&Scene {
                grid: scheduler.grid(),
                markers,
                status: status.clone(),
            })?;
            last_drawn = status;
            dirty = false;
        }

        thread::sleep(LOOP_SLEEP);
    }
}

fn handle_key(
    key: KeyEvent,
    settings: &mut Settings,
    scheduler: &mut StepScheduler,
    markers: &mut Option<(IVec2, IVec2)>,
    last_move: &mut Option<Direction>,
    note: &mut String,
) -> KeyOutcome {
    if key.modifiers == KeyModifiers::CONTROL {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => KeyOutcome::Quit,
            _ => KeyOutcome::Ignored,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyOutcome::Quit,
        KeyCode::Char('r') => {
            regenerate(scheduler, settings, markers, last_move, note);
            KeyOutcome::Handled
        }
        KeyCode::Char('c') => {
            scheduler.cancel();
            note.clear();
            note.push_str("cancelled");
            KeyOutcome::Handled
        }
        KeyCode::Left => {
            settings.width = (settings.width - 1).max(MIN_SIZE);
            KeyOutcome::Handled
        }
        KeyCode::Right => {
            settings.width = (settings.width + 1).min(MAX_WIDTH);
            KeyOutcome::Handled
        }
        KeyCode::Down => {
            settings.height = (settings.height - 1).max(MIN_SIZE);
            KeyOutcome::Handled
        }
        KeyCode::Up => {
            settings.height = (settings.height + 1).min(MAX_HEIGHT);
            KeyOutcome::Handled
        }
        KeyCode::Char('-') => {
            settings.step_delay_ms = settings.step_delay_ms.saturating_sub(DELAY_STEP_MS);
            KeyOutcome::Handled
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            settings.step_delay_ms = (settings.step_delay_ms + DELAY_STEP_MS).min(MAX_DELAY_MS);
            KeyOutcome::Handled
        }
        _ => KeyOutcome::Ignored,
    }
}

fn regenerate(
    scheduler: &mut StepScheduler,
    settings: &Settings,
    markers: &mut Option<(IVec2, IVec2)>,
    last_move: &mut Option<Direction>,
    note: &mut String,
) {
    let config = settings.run_config();

    match scheduler.start(&config, Instant::now()) {
        Ok(()) => {
            *markers = Some((config.start, config.start));
            *last_move = None;
            note.clear();
        }
        Err(e) => {
            note.clear();
            note.push_str(&e.to_string());
        }
    }
}

fn status_line(
    settings: &Settings,
    scheduler: &StepScheduler,
    last_move: Option<Direction>,
    note: &str,
) -> String {
    let state = if scheduler.is_running() {
        "carving"
    } else if scheduler.is_complete() {
        "complete"
    } else {
        "idle"
    };

    let mut line = format!(
        "grid {}x{} | step {} ms | {}",
        settings.width, settings.height, settings.step_delay_ms, state
    );

    if let Some(direction) = last_move {
        line.push_str(&format!(" | last {}", direction));
    }

    if !note.is_empty() {
        line.push_str(&format!(" | {}", note));
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_config_starts_at_the_clamped_center() {
        let settings = Settings {
            width: 1,
            height: 1,
            step_delay_ms: 0,
        };

        let config = settings.run_config();

        assert_eq!(config.start, IVec2::ZERO);
        assert_eq!(config.step_delay, Duration::ZERO);
    }

    #[test]
    fn settings_edits_are_clamped() {
        let mut settings = Settings {
            width: MIN_SIZE,
            height: MAX_HEIGHT,
            step_delay_ms: 0,
        };
        let mut scheduler = StepScheduler::new();
        let mut markers = None;
        let mut last_move = None;
        let mut note = String::new();

        for key in [KeyCode::Left, KeyCode::Up, KeyCode::Char('-')] {
            handle_key(
                KeyEvent::new(key, KeyModifiers::NONE),
                &mut settings,
                &mut scheduler,
                &mut markers,
                &mut last_move,
                &mut note,
            );
        }

        assert_eq!(settings.width, MIN_SIZE);
        assert_eq!(settings.height, MAX_HEIGHT);
        assert_eq!(settings.step_delay_ms, 0);
    }

    #[test]
    fn regenerate_places_both_markers_on_the_start_cell() {
        let settings = Settings::new();
        let mut scheduler = StepScheduler::new();
        let mut markers = None;
        let mut last_move = Some(Direction::Up);
        let mut note = String::from("stale");

        regenerate(
            &mut scheduler,
            &settings,
            &mut markers,
            &mut last_move,
            &mut note,
        );

        let start = settings.run_config().start;
        assert_eq!(markers, Some((start, start)));
        assert_eq!(last_move, None);
        assert!(note.is_empty());
        assert!(scheduler.is_running());
    }

    #[test]
    fn status_line_reports_state_and_last_move() {
        let settings = Settings::new();
        let mut scheduler = StepScheduler::new();

        let idle = status_line(&settings, &scheduler, None, "");
        assert!(idle.ends_with("idle"));

        scheduler
            .start(&settings.run_config(), Instant::now())
            .unwrap();
        let carving = status_line(&settings, &scheduler, Some(Direction::Right), "");
        assert!(carving.contains("carving"));
        assert!(carving.contains("last Right"));
    }
}
