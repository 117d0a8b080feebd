//! Reading settings and the persistence seams around them.

use core::{fmt, str::FromStr};

pub const MIN_WPM: u16 = 100;
pub const MAX_WPM: u16 = 1_000;
pub const DEFAULT_WPM: u16 = 300;
/// Increment used by the faster/slower controls.
pub const WPM_STEP: u16 = 25;

/// What playback does when it reaches a paragraph break.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ParagraphMode {
    /// Show the break and stop.
    #[default]
    Pause,
    /// Show the break for a fixed second, then continue.
    Delay,
    /// Skip the break without showing it.
    Continue,
}

impl ParagraphMode {
    pub const ALL: [ParagraphMode; 3] = [Self::Pause, Self::Delay, Self::Continue];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Delay => "delay",
            Self::Continue => "none",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pause => "Pause",
            Self::Delay => "Delay (1s)",
            Self::Continue => "Continue",
        }
    }

    /// Next mode in selector order, wrapping around.
    pub const fn next(self) -> Self {
        match self {
            Self::Pause => Self::Delay,
            Self::Delay => Self::Continue,
            Self::Continue => Self::Pause,
        }
    }
}

impl fmt::Display for ParagraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseParagraphModeError;

impl fmt::Display for ParseParagraphModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of: pause, delay, none")
    }
}

impl core::error::Error for ParseParagraphModeError {}

impl FromStr for ParagraphMode {
    type Err = ParseParagraphModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("pause") {
            Ok(Self::Pause)
        } else if value.eq_ignore_ascii_case("delay") {
            Ok(Self::Delay)
        } else if value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("continue") {
            Ok(Self::Continue)
        } else {
            Err(ParseParagraphModeError)
        }
    }
}

/// Clamps any requested speed into the supported range.
pub fn clamp_wpm(wpm: i32) -> u16 {
    wpm.clamp(MIN_WPM as i32, MAX_WPM as i32) as u16
}

/// User-tunable settings that should survive restarts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PersistedSettings {
    pub wpm: u16,
    pub paragraph_mode: ParagraphMode,
}

impl PersistedSettings {
    pub fn new(wpm: u16, paragraph_mode: ParagraphMode) -> Self {
        Self {
            wpm: clamp_wpm(wpm as i32),
            paragraph_mode,
        }
    }
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self::new(DEFAULT_WPM, ParagraphMode::default())
    }
}

/// Write-through target for settings changes. Fire-and-forget: playback never waits on
/// or inspects the outcome.
pub trait SettingsSink {
    fn settings_changed(&mut self, settings: &PersistedSettings);
}

/// Sink for sessions that keep settings in memory only.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardSettings;

impl SettingsSink for DiscardSettings {
    fn settings_changed(&mut self, _settings: &PersistedSettings) {}
}

impl<T: SettingsSink + ?Sized> SettingsSink for &mut T {
    fn settings_changed(&mut self, settings: &PersistedSettings) {
        (**self).settings_changed(settings);
    }
}

/// Abstract settings persistence backend.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error>;
    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error>;
}
