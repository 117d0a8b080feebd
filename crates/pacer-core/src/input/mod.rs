//! Input abstraction layer.

pub mod mock;

/// Logical control-surface actions consumed by the playback engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    TogglePlay,
    Restart,
    /// Step back one unit.
    StepBack,
    /// Step forward one unit.
    StepForward,
    /// Jump back ten units.
    SkipBack,
    /// Jump forward ten units.
    SkipForward,
    Faster,
    Slower,
    CycleParagraphMode,
    /// Leave to inspect a code block or image in the source, or come back from it.
    ToggleContentView,
    Close,
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error>;
}
