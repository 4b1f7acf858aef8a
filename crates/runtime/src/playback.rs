use std::time::Duration;

use foundation::{Time, TimeSpan};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::event_bus::{Event, EventBus};
use crate::interval::IntervalTimer;

/// What happens when the cursor reaches the end of the window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    #[default]
    StopAtEnd,
    LoopAtEnd,
}

impl PlaybackMode {
    pub fn toggled(self) -> Self {
        match self {
            PlaybackMode::StopAtEnd => PlaybackMode::LoopAtEnd,
            PlaybackMode::LoopAtEnd => PlaybackMode::StopAtEnd,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunState {
    Paused,
    Playing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Wall-clock period between ticks.
    pub tick_interval_ms: u64,
    /// Virtual time added to the cursor per tick.
    pub tick_step_ms: i64,
    pub default_mode: PlaybackMode,
    /// Start playing as soon as a dataset is assigned.
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 20,
            tick_step_ms: 100,
            default_mode: PlaybackMode::StopAtEnd,
            autoplay: true,
        }
    }
}

/// Snapshot of the scheduler once bounds are known.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub cursor: Time,
    pub min: Time,
    pub max: Time,
    pub mode: PlaybackMode,
    pub run_state: RunState,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CursorSource {
    Load,
    Tick,
    Scrub,
}

/// Notifications for the host. Every event carries the dataset generation it
/// was produced under; events from an older generation must be ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Loaded {
        generation: u64,
        bounds: TimeSpan,
    },
    CursorChanged {
        generation: u64,
        cursor: Time,
        source: CursorSource,
    },
    RunStateChanged {
        generation: u64,
        run_state: RunState,
    },
    ModeChanged {
        generation: u64,
        mode: PlaybackMode,
    },
}

impl PlaybackEvent {
    pub fn generation(&self) -> u64 {
        match *self {
            PlaybackEvent::Loaded { generation, .. }
            | PlaybackEvent::CursorChanged { generation, .. }
            | PlaybackEvent::RunStateChanged { generation, .. }
            | PlaybackEvent::ModeChanged { generation, .. } => generation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// No dataset bounds have been assigned yet.
    NotLoaded,
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackError::NotLoaded => write!(f, "no dataset loaded; playback bounds are undefined"),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// Virtual time cursor advanced on a fixed wall-clock tick.
///
/// The scheduler owns the cursor; only `tick` and `scrub` move it. `pause` is
/// the cancellation primitive and may be called any number of times.
#[derive(Debug)]
pub struct PlaybackScheduler {
    config: PlaybackConfig,
    step_ms: i64,
    timer: IntervalTimer,
    bounds: Option<TimeSpan>,
    cursor: Time,
    mode: PlaybackMode,
    run_state: RunState,
    generation: u64,
    bus: EventBus<PlaybackEvent>,
}

impl Default for PlaybackScheduler {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl PlaybackScheduler {
    pub fn new(config: PlaybackConfig) -> Self {
        let step_ms = config.tick_step_ms.max(1);
        let timer = IntervalTimer::new(Duration::from_millis(config.tick_interval_ms));
        let mode = config.default_mode;
        Self {
            config,
            step_ms,
            timer,
            bounds: None,
            cursor: Time(0),
            mode,
            run_state: RunState::Paused,
            generation: 0,
            bus: EventBus::new(),
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bounds(&self) -> Option<TimeSpan> {
        self.bounds
    }

    pub fn cursor(&self) -> Option<Time> {
        self.bounds.map(|_| self.cursor)
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_playing(&self) -> bool {
        self.run_state == RunState::Playing
    }

    pub fn state(&self) -> Option<PlaybackState> {
        self.bounds.map(|b| PlaybackState {
            cursor: self.cursor,
            min: b.start,
            max: b.end,
            mode: self.mode,
            run_state: self.run_state,
        })
    }

    /// Assigns new bounds: pauses, resets the cursor to `min`, restores the
    /// configured mode and starts a new generation.
    pub fn load(&mut self, bounds: TimeSpan) {
        let bounds = TimeSpan::new(bounds.start.min(bounds.end), bounds.start.max(bounds.end));
        self.generation = self.generation.wrapping_add(1);
        self.timer.stop();
        self.run_state = RunState::Paused;
        self.mode = self.config.default_mode;
        self.bounds = Some(bounds);
        self.cursor = bounds.start;
        info!(
            generation = self.generation,
            min = bounds.start.millis(),
            max = bounds.end.millis(),
            "playback bounds assigned"
        );
        self.bus.emit(PlaybackEvent::Loaded {
            generation: self.generation,
            bounds,
        });
        self.emit_cursor(CursorSource::Load);
    }

    /// Drops the bounds; subsequent `play`/`scrub` fail until the next load.
    pub fn unload(&mut self) {
        self.pause();
        self.generation = self.generation.wrapping_add(1);
        self.bounds = None;
    }

    pub fn play(&mut self) -> Result<(), PlaybackError> {
        if self.bounds.is_none() {
            return Err(PlaybackError::NotLoaded);
        }
        if self.run_state == RunState::Playing {
            return Ok(());
        }
        self.timer.start();
        self.set_run_state(RunState::Playing);
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.run_state == RunState::Paused {
            return;
        }
        self.timer.stop();
        self.set_run_state(RunState::Paused);
    }

    /// Flips the end-of-window behavior; takes effect at the next boundary.
    pub fn toggle_loop(&mut self) -> PlaybackMode {
        self.mode = self.mode.toggled();
        debug!(mode = ?self.mode, "playback mode toggled");
        self.bus.emit(PlaybackEvent::ModeChanged {
            generation: self.generation,
            mode: self.mode,
        });
        self.mode
    }

    /// Moves the cursor to `target` clamped into the bounds. Run state is
    /// left unchanged.
    pub fn scrub(&mut self, target: Time) -> Result<Time, PlaybackError> {
        let bounds = self.bounds.ok_or(PlaybackError::NotLoaded)?;
        self.cursor = target.clamp_to(bounds);
        self.emit_cursor(CursorSource::Scrub);
        Ok(self.cursor)
    }

    /// Runs one tick. Ignored (returns `None`) unless playing.
    pub fn tick(&mut self) -> Option<Time> {
        let bounds = self.bounds?;
        if self.run_state != RunState::Playing {
            return None;
        }
        let next = self.cursor.saturating_add_ms(self.step_ms);
        let mut reached_end = false;
        self.cursor = if next >= bounds.end {
            match self.mode {
                PlaybackMode::LoopAtEnd => bounds.start,
                PlaybackMode::StopAtEnd => {
                    reached_end = true;
                    bounds.end
                }
            }
        } else {
            next
        };
        self.emit_cursor(CursorSource::Tick);
        if reached_end {
            self.pause();
        }
        Some(self.cursor)
    }

    /// Feeds wall-clock time and runs every tick that came due. Returns the
    /// number of ticks run; stops early once playback pauses at the end.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let due = self.timer.advance(elapsed);
        let mut ran = 0u32;
        for _ in 0..due {
            if self.tick().is_none() {
                break;
            }
            ran += 1;
        }
        ran
    }

    pub fn drain_events(&mut self) -> Vec<Event<PlaybackEvent>> {
        self.bus.drain()
    }

    fn set_run_state(&mut self, run_state: RunState) {
        self.run_state = run_state;
        info!(generation = self.generation, ?run_state, "playback run state changed");
        self.bus.emit(PlaybackEvent::RunStateChanged {
            generation: self.generation,
            run_state,
        });
    }

    fn emit_cursor(&mut self, source: CursorSource) {
        self.bus.emit(PlaybackEvent::CursorChanged {
            generation: self.generation,
            cursor: self.cursor,
            source,
        });
    }
}
