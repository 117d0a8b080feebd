//! Timed playback state machine.
//!
//! The engine owns the unit sequence, the reading position and at most one pending
//! timer. Every operation that moves the position or stops playback cancels that timer
//! first, so two advancement chains can never overlap.

use log::debug;

use crate::{
    content::{Marker, UnitSequence},
    input::{InputEvent, InputProvider},
    render::{DisplaySink, Progress, UnitView},
    settings::{ParagraphMode, PersistedSettings, SettingsSink, WPM_STEP, clamp_wpm},
    timer::{Scheduler, TimerHandle},
};

/// Dwell time for a paragraph break in [`ParagraphMode::Delay`].
pub const PARAGRAPH_DELAY_MS: u32 = 1_000;
/// Units jumped by the skip controls.
pub const SKIP_UNITS: isize = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaybackState {
    /// Positioned on a unit, not playing.
    Idle,
    /// Playing, with exactly one continuation pending.
    Running,
    /// Position is past the last unit.
    Finished,
    /// Torn down; every operation is ignored.
    Closed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoTimer,
    TimerFired,
}

pub struct PlaybackEngine<S, D, P>
where
    S: Scheduler,
    D: DisplaySink,
    P: SettingsSink,
{
    units: UnitSequence,
    scheduler: S,
    display: D,
    settings_sink: P,
    settings: PersistedSettings,
    current_index: usize,
    playing: bool,
    pending_timer: Option<TimerHandle>,
    progress: Progress,
    saved_index: Option<usize>,
    closed: bool,
    words_since_drain: u32,
}

include!("runtime.rs");
include!("controls.rs");

impl<S, D, P> Drop for PlaybackEngine<S, D, P>
where
    S: Scheduler,
    D: DisplaySink,
    P: SettingsSink,
{
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
