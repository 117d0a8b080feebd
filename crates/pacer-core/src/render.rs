//! View models handed to the rendering consumer.

use crate::{
    content::{Marker, Unit},
    focus::split_at_focus,
};

/// Words shown so far against the total word count. Markers never count.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Progress {
    pub count: usize,
    pub total: usize,
}

impl Progress {
    pub const fn new(count: usize, total: usize) -> Self {
        Self { count, total }
    }

    /// 0..=100, rounded down.
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.count.min(self.total) * 100) / self.total) as u8
    }

    pub fn fraction(self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.count.min(self.total) as f32 / self.total as f32
    }
}

/// One display step.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnitView<'a> {
    Word {
        before: &'a str,
        focus: &'a str,
        after: &'a str,
        progress: Progress,
    },
    ParagraphBreak,
    CodeBlock,
    ImageBlock,
}

impl<'a> UnitView<'a> {
    pub fn of(unit: &'a Unit, progress: Progress) -> Self {
        match unit {
            Unit::Word(text) => {
                let (before, focus, after) = split_at_focus(text);
                Self::Word {
                    before,
                    focus,
                    after,
                    progress,
                }
            }
            Unit::Marker(Marker::ParagraphBreak) => Self::ParagraphBreak,
            Unit::Marker(Marker::CodeBlock) => Self::CodeBlock,
            Unit::Marker(Marker::ImageBlock) => Self::ImageBlock,
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Self::Word { .. })
    }
}

/// Consumer of playback output.
pub trait DisplaySink {
    fn show(&mut self, view: UnitView<'_>);

    fn playing_changed(&mut self, _playing: bool) {}
}

impl<T: DisplaySink + ?Sized> DisplaySink for &mut T {
    fn show(&mut self, view: UnitView<'_>) {
        (**self).show(view);
    }

    fn playing_changed(&mut self, playing: bool) {
        (**self).playing_changed(playing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn percent_handles_empty_and_full() {
        assert_eq!(Progress::new(0, 0).percent(), 0);
        assert_eq!(Progress::new(1, 3).percent(), 33);
        assert_eq!(Progress::new(3, 3).percent(), 100);
        assert_eq!(Progress::new(1, 4).fraction(), 0.25);
    }

    #[test]
    fn word_view_splits_on_focus() {
        let unit = Unit::Word("reading".to_string());
        assert_eq!(
            UnitView::of(&unit, Progress::new(2, 5)),
            UnitView::Word {
                before: "re",
                focus: "a",
                after: "ding",
                progress: Progress::new(2, 5),
            }
        );
    }

    #[test]
    fn marker_views_carry_no_text() {
        let unit = Unit::Marker(Marker::CodeBlock);
        let view = UnitView::of(&unit, Progress::default());
        assert_eq!(view, UnitView::CodeBlock);
        assert!(!view.is_word());
    }
}
