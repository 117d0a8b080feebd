//! Timer facility used to pace playback.

use alloc::vec::Vec;

/// Identifies one armed timer. Ids are never reused by a scheduler.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// One-shot timers driven by a host clock.
pub trait Scheduler {
    /// Arms a timer that becomes due `delay_ms` after the scheduler's current time.
    fn schedule(&mut self, delay_ms: u32) -> TimerHandle;

    /// Disarms `handle`. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Advances the clock to `now_ms` and disarms and returns the earliest due timer.
    fn take_due(&mut self, now_ms: u64) -> Option<TimerHandle>;
}

/// Deadline list polled from a cooperative tick loop.
#[derive(Debug, Default)]
pub struct DeadlineScheduler {
    now_ms: u64,
    next_id: u64,
    armed: Vec<(TimerHandle, u64)>,
}

impl DeadlineScheduler {
    pub const fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            armed: Vec::new(),
        }
    }

    /// Moves the clock forward without firing anything. Time never runs backwards.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// Deadline of the earliest armed timer.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.armed.iter().map(|(_, due)| *due).min()
    }
}

impl Scheduler for DeadlineScheduler {
    fn schedule(&mut self, delay_ms: u32) -> TimerHandle {
        let handle = TimerHandle(self.next_id.max(1));
        self.next_id = handle.0 + 1;
        self.armed.push((handle, self.now_ms + delay_ms as u64));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.armed.retain(|(armed, _)| *armed != handle);
    }

    fn take_due(&mut self, now_ms: u64) -> Option<TimerHandle> {
        self.set_now(now_ms);
        let (position, _) = self
            .armed
            .iter()
            .enumerate()
            .filter(|(_, (_, due))| *due <= self.now_ms)
            .min_by_key(|(_, (_, due))| *due)?;
        Some(self.armed.remove(position).0)
    }
}

impl<T: Scheduler + ?Sized> Scheduler for &mut T {
    fn schedule(&mut self, delay_ms: u32) -> TimerHandle {
        (**self).schedule(delay_ms)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        (**self).cancel(handle);
    }

    fn take_due(&mut self, now_ms: u64) -> Option<TimerHandle> {
        (**self).take_due(now_ms)
    }
}
