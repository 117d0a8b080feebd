/// Dwell time for a word at `wpm`.
///
/// Sentence ends get double time, clause ends one and a half, and words longer than
/// eight characters a fifth more.
pub fn word_delay_ms(word: &str, wpm: u16) -> u32 {
    let wpm = wpm.max(1) as u32;
    let (numerator, denominator) = match word.chars().last() {
        Some('.' | '!' | '?') => (2, 1),
        Some(',' | ';' | ':') => (3, 2),
        _ if word.chars().count() > 8 => (6, 5),
        _ => (1, 1),
    };

    (60_000 * numerator) / (wpm * denominator)
}

impl<S, D, P> PlaybackEngine<S, D, P>
where
    S: Scheduler,
    D: DisplaySink,
    P: SettingsSink,
{
    /// Builds an idle engine positioned on the first unit, which is displayed right away.
    pub fn new(
        units: UnitSequence,
        settings: PersistedSettings,
        scheduler: S,
        display: D,
        settings_sink: P,
    ) -> Self {
        let total = units.word_count();
        let mut engine = Self {
            units,
            scheduler,
            display,
            settings_sink,
            settings: PersistedSettings::new(settings.wpm, settings.paragraph_mode),
            current_index: 0,
            playing: false,
            pending_timer: None,
            progress: Progress::new(0, total),
            saved_index: None,
            closed: false,
            words_since_drain: 0,
        };

        debug!(
            "playback: created units={} words={} wpm={} paragraph_mode={}",
            engine.units.len(),
            total,
            engine.settings.wpm,
            engine.settings.paragraph_mode
        );
        if !engine.units.is_empty() {
            engine.show(0);
        }
        engine
    }

    /// Timer entry point. Fires for anything but the current pending handle are stale
    /// and dropped.
    pub fn on_timer(&mut self, handle: TimerHandle) {
        if self.closed || self.pending_timer != Some(handle) {
            debug!("playback: ignoring stale timer id={}", handle.id());
            return;
        }

        self.pending_timer = None;
        self.step();
    }

    /// Polls the scheduler at `now_ms` and runs a continuation if one is due.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        match self.scheduler.take_due(now_ms) {
            Some(handle) => {
                self.on_timer(handle);
                TickResult::TimerFired
            }
            None => TickResult::NoTimer,
        }
    }

    /// Runs one visible display step from the current position. Paragraph breaks in
    /// [`ParagraphMode::Continue`] are skipped within the same step.
    fn step(&mut self) {
        loop {
            if !self.playing {
                return;
            }

            let Some(unit) = self.units.get(self.current_index) else {
                self.finish();
                return;
            };

            let next_delay = match unit.marker() {
                Some(marker) if marker.forces_pause() => None,
                Some(Marker::ParagraphBreak) => match self.settings.paragraph_mode {
                    ParagraphMode::Pause => None,
                    ParagraphMode::Delay => Some(PARAGRAPH_DELAY_MS),
                    ParagraphMode::Continue => {
                        self.current_index += 1;
                        continue;
                    }
                },
                _ => {
                    let word = unit.as_word().unwrap_or_default();
                    Some(word_delay_ms(word, self.settings.wpm))
                }
            };

            let shown = self.current_index;
            self.show(shown);
            self.current_index = shown + 1;

            match next_delay {
                None => {
                    debug!("playback: forced pause at index={}", shown);
                    self.stop();
                }
                Some(_) if self.current_index >= self.units.len() => self.finish(),
                Some(delay_ms) => {
                    self.pending_timer = Some(self.scheduler.schedule(delay_ms));
                }
            }
            return;
        }
    }

    /// Emits the display event for `index` and records progress.
    fn show(&mut self, index: usize) {
        let Some(unit) = self.units.get(index) else {
            return;
        };

        self.current_index = index;
        self.progress = Progress::new(self.units.words_through(index), self.units.word_count());
        let view = UnitView::of(unit, self.progress);
        if view.is_word() && self.playing {
            self.words_since_drain = self.words_since_drain.saturating_add(1);
        }
        self.display.show(view);
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.pending_timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            self.playing = playing;
            self.display.playing_changed(playing);
        }
    }

    fn stop(&mut self) {
        self.cancel_timer();
        self.set_playing(false);
    }

    fn finish(&mut self) {
        self.stop();
        self.current_index = self.units.len();
        debug!("playback: finished words={}", self.units.word_count());
    }

    fn notify_settings(&mut self) {
        self.settings_sink.settings_changed(&self.settings);
    }
}
