impl<S, D, P> PlaybackEngine<S, D, P>
where
    S: Scheduler,
    D: DisplaySink,
    P: SettingsSink,
{
    /// Starts playback from the current position. No-op while running, once finished,
    /// or with nothing to play.
    pub fn play(&mut self) {
        if self.closed || self.playing || self.current_index >= self.units.len() {
            return;
        }

        debug!("playback: play from index={}", self.current_index);
        self.cancel_timer();
        self.set_playing(true);
        self.step();
    }

    /// Cancels the pending continuation and stops. Idempotent.
    pub fn pause(&mut self) {
        if self.closed {
            return;
        }
        self.stop();
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.resume_or_restart_from_end();
        }
    }

    /// Plays, rewinding to the first unit first when playback already reached the end.
    pub fn resume_or_restart_from_end(&mut self) {
        if self.closed {
            return;
        }
        if self.current_index >= self.units.len() {
            self.current_index = 0;
        }
        self.play();
    }

    /// Pauses and shows the first unit without playing.
    pub fn restart(&mut self) {
        if self.closed {
            return;
        }
        self.stop();
        self.current_index = 0;
        self.show(0);
    }

    /// Pauses and shows the unit `delta` positions away, clamped to the sequence.
    pub fn seek_relative(&mut self, delta: isize) {
        if self.closed {
            return;
        }
        self.stop();
        if self.units.is_empty() {
            return;
        }

        let last = self.units.len() - 1;
        let target = self.current_index.saturating_add_signed(delta).min(last);
        debug!(
            "playback: seek from={} delta={} to={}",
            self.current_index, delta, target
        );
        self.show(target);
    }

    /// Sets the speed, clamped to the supported range. A continuation that is already
    /// pending keeps its wait; the next one uses the new speed. Returns whether the
    /// speed changed.
    pub fn set_speed(&mut self, wpm: i32) -> bool {
        if self.closed {
            return false;
        }

        let wpm = clamp_wpm(wpm);
        if wpm == self.settings.wpm {
            return false;
        }
        self.settings.wpm = wpm;
        debug!("playback: wpm={}", wpm);
        self.notify_settings();
        true
    }

    /// Moves the speed by `steps` increments of [`WPM_STEP`].
    pub fn adjust_speed(&mut self, steps: i32) -> bool {
        let delta = steps.saturating_mul(WPM_STEP as i32);
        let target = (self.settings.wpm as i32).saturating_add(delta);
        self.set_speed(target)
    }

    /// Applies from the next paragraph break on. Returns whether the mode changed.
    pub fn set_paragraph_mode(&mut self, mode: ParagraphMode) -> bool {
        if self.closed || mode == self.settings.paragraph_mode {
            return false;
        }
        self.settings.paragraph_mode = mode;
        debug!("playback: paragraph_mode={}", mode);
        self.notify_settings();
        true
    }

    pub fn cycle_paragraph_mode(&mut self) -> bool {
        self.set_paragraph_mode(self.settings.paragraph_mode.next())
    }

    /// Pauses and remembers the position while the reader looks at the source content
    /// behind a code or image marker.
    pub fn view_content(&mut self) {
        if self.closed {
            return;
        }
        self.stop();
        self.saved_index = Some(self.current_index);
    }

    /// Comes back from [`Self::view_content`] and shows the remembered position again.
    /// Does nothing when no position was saved.
    pub fn return_from_content(&mut self) {
        if self.closed {
            return;
        }
        let Some(index) = self.saved_index.take() else {
            return;
        };
        self.stop();
        if index < self.units.len() {
            self.show(index);
        } else {
            self.current_index = self.units.len();
        }
    }

    pub fn is_viewing_content(&self) -> bool {
        self.saved_index.is_some()
    }

    /// Tears the session down. Later calls and late timer fires are ignored.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.stop();
        self.saved_index = None;
        self.closed = true;
        debug!("playback: closed at index={}", self.current_index);
    }

    pub fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::TogglePlay => self.toggle(),
            InputEvent::Restart => self.restart(),
            InputEvent::StepBack => self.seek_relative(-1),
            InputEvent::StepForward => self.seek_relative(1),
            InputEvent::SkipBack => self.seek_relative(-SKIP_UNITS),
            InputEvent::SkipForward => self.seek_relative(SKIP_UNITS),
            InputEvent::Faster => {
                let _ = self.adjust_speed(1);
            }
            InputEvent::Slower => {
                let _ = self.adjust_speed(-1);
            }
            InputEvent::CycleParagraphMode => {
                let _ = self.cycle_paragraph_mode();
            }
            InputEvent::ToggleContentView => {
                if self.is_viewing_content() {
                    self.return_from_content();
                } else {
                    self.view_content();
                }
            }
            InputEvent::Close => self.close(),
        }
    }

    /// Drains `input` and applies every event. Returns how many were applied.
    pub fn process_inputs<IN: InputProvider>(&mut self, input: &mut IN) -> Result<usize, IN::Error> {
        let mut applied = 0usize;
        while let Some(event) = input.poll_event()? {
            self.apply_input(event);
            applied += 1;
        }
        Ok(applied)
    }

    pub fn state(&self) -> PlaybackState {
        if self.closed {
            PlaybackState::Closed
        } else if self.playing {
            PlaybackState::Running
        } else if self.current_index >= self.units.len() {
            PlaybackState::Finished
        } else {
            PlaybackState::Idle
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn has_pending_timer(&self) -> bool {
        self.pending_timer.is_some()
    }

    pub fn settings(&self) -> PersistedSettings {
        self.settings
    }

    /// Progress as of the last displayed unit.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn units(&self) -> &UnitSequence {
        &self.units
    }

    /// Words shown by playback since the previous call.
    pub fn drain_word_updates(&mut self) -> u32 {
        core::mem::take(&mut self.words_since_drain)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn settings_sink(&self) -> &P {
        &self.settings_sink
    }

    pub fn settings_sink_mut(&mut self) -> &mut P {
        &mut self.settings_sink
    }
}
