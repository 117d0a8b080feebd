use std::io::{self, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use pacer_core::{
    render::{DisplaySink, Progress, UnitView},
    settings::PersistedSettings,
};

use super::ORP_ANCHOR_PERCENT;

const HELP_LINE: &str =
    "space play/pause  \u{2190}/\u{2192} step  b/f skip  \u{2191}/\u{2193} speed  r restart  m mode  v content  q quit";

/// Raw mode plus alternate screen for as long as the guard lives.
pub(super) struct TerminalGuard;

impl TerminalGuard {
    pub(super) fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Owned copy of the last view the engine pushed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) enum Frame {
    Blank,
    Word {
        before: String,
        focus: String,
        after: String,
    },
    ParagraphBreak,
    CodeBlock,
    ImageBlock,
}

impl Frame {
    fn marker_label(&self) -> Option<&'static str> {
        match self {
            Self::ParagraphBreak => Some("\u{00b6} New Section"),
            Self::CodeBlock => Some("Code Block"),
            Self::ImageBlock => Some("Image"),
            Self::Blank | Self::Word { .. } => None,
        }
    }
}

/// Collects engine output and redraws the terminal only when something changed.
pub(super) struct TerminalDisplay {
    frame: Frame,
    progress: Progress,
    playing: bool,
    dirty: bool,
}

impl TerminalDisplay {
    pub(super) fn new(total_words: usize) -> Self {
        Self {
            frame: Frame::Blank,
            progress: Progress::new(0, total_words),
            playing: false,
            dirty: true,
        }
    }

    pub(super) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(super) fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }

    pub(super) fn draw<W: Write>(
        &self,
        out: &mut W,
        settings: PersistedSettings,
        viewing_content: bool,
    ) -> io::Result<()> {
        let (width, height) = terminal::size().unwrap_or((80, 24));
        let middle = height / 2;

        queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        queue!(
            out,
            Print(status_line(self.progress, settings, self.playing)),
            cursor::MoveTo(0, middle.saturating_sub(1)),
        )?;

        if viewing_content {
            let notice = "Viewing content. Press v or Enter to return.";
            let column = centered_column(width, notice.chars().count());
            queue!(out, cursor::MoveTo(column, middle), Print(notice))?;
        } else if let Some(label) = self.frame.marker_label() {
            let column = centered_column(width, label.chars().count());
            queue!(
                out,
                cursor::MoveTo(column, middle),
                SetAttribute(Attribute::Dim),
                Print(label),
                SetAttribute(Attribute::Reset),
            )?;
        } else if let Frame::Word {
            before,
            focus,
            after,
        } = &self.frame
        {
            let anchor = anchor_column(width, ORP_ANCHOR_PERCENT);
            let column = word_column(anchor, before.chars().count());
            queue!(
                out,
                cursor::MoveTo(anchor, middle.saturating_sub(1)),
                Print("\u{2502}"),
                cursor::MoveTo(column, middle),
                Print(before),
                SetForegroundColor(Color::Red),
                SetAttribute(Attribute::Bold),
                Print(focus),
                SetAttribute(Attribute::Reset),
                ResetColor,
                Print(after),
                cursor::MoveTo(anchor, middle.saturating_add(1)),
                Print("\u{2502}"),
            )?;
        }

        queue!(
            out,
            cursor::MoveTo(0, height.saturating_sub(1)),
            SetAttribute(Attribute::Dim),
            Print(HELP_LINE),
            SetAttribute(Attribute::Reset),
        )?;
        out.flush()
    }
}

impl DisplaySink for TerminalDisplay {
    fn show(&mut self, view: UnitView<'_>) {
        self.frame = match view {
            UnitView::Word {
                before,
                focus,
                after,
                progress,
            } => {
                self.progress = progress;
                Frame::Word {
                    before: before.to_owned(),
                    focus: focus.to_owned(),
                    after: after.to_owned(),
                }
            }
            UnitView::ParagraphBreak => Frame::ParagraphBreak,
            UnitView::CodeBlock => Frame::CodeBlock,
            UnitView::ImageBlock => Frame::ImageBlock,
        };
        self.dirty = true;
    }

    fn playing_changed(&mut self, playing: bool) {
        self.playing = playing;
        self.dirty = true;
    }
}

pub(super) fn status_line(progress: Progress, settings: PersistedSettings, playing: bool) -> String {
    format!(
        "{} / {} ({}%)  {} WPM  paragraphs: {}  {}",
        progress.count,
        progress.total,
        progress.percent(),
        settings.wpm,
        settings.paragraph_mode.label(),
        if playing { "playing" } else { "paused" },
    )
}

/// Column the focus letter is pinned to.
pub(super) fn anchor_column(width: u16, anchor_percent: usize) -> u16 {
    let anchor = (width as usize * anchor_percent.min(100)) / 100;
    anchor.min(width.saturating_sub(1) as usize) as u16
}

/// First column of a word whose focus letter follows `before_chars` characters.
pub(super) fn word_column(anchor: u16, before_chars: usize) -> u16 {
    anchor.saturating_sub(before_chars.min(u16::MAX as usize) as u16)
}

fn centered_column(width: u16, text_chars: usize) -> u16 {
    let text = text_chars.min(u16::MAX as usize) as u16;
    width.saturating_sub(text) / 2
}
