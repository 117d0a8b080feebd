use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use pacer_core::{
    content::{UnitSequence, flatten_markup, tokenize},
    playback::{PlaybackEngine, PlaybackState},
    settings::{ParagraphMode, PersistedSettings, SettingsStore},
    timer::DeadlineScheduler,
};

use keys::KeyInput;
use settings_file::TomlSettingsStore;
use settings_sync::SettingsSyncState;
use terminal::{TerminalDisplay, TerminalGuard};

#[path = "main/keys.rs"]
mod keys;
#[path = "main/settings_file.rs"]
mod settings_file;
#[path = "main/settings_sync.rs"]
mod settings_sync;
#[path = "main/terminal.rs"]
mod terminal;

const ORP_ANCHOR_PERCENT: usize = 42;
const SETTINGS_SAVE_DEBOUNCE_MS: u64 = 1_500;
const INPUT_POLL_MAX_MS: u64 = 25;
const WPM_REPORT_INTERVAL_MS: u64 = 5_000;
const MARKUP_EXTENSIONS: [&str; 3] = ["html", "htm", "xhtml"];
const BYTE_ORDER_MARK: char = '\u{FEFF}';

type Engine = PlaybackEngine<DeadlineScheduler, TerminalDisplay, SettingsSyncState>;

/// Speed-read a text file one word at a time.
#[derive(Debug, Parser)]
#[command(name = "pacer", version)]
struct Cli {
    /// Text file to read, or `-` for stdin.
    file: PathBuf,

    /// Reading speed in words per minute (clamped to 100..=1000).
    #[arg(long, env = "PACER_WPM")]
    wpm: Option<u16>,

    /// What to do at paragraph breaks: pause, delay or none.
    #[arg(long, env = "PACER_PARAGRAPH_MODE")]
    paragraph_mode: Option<ParagraphMode>,

    /// Settings file [default: ~/.config/pacer/settings.toml].
    #[arg(long, env = "PACER_SETTINGS")]
    settings: Option<PathBuf>,

    /// Treat the input as HTML regardless of its extension.
    #[arg(long)]
    html: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let units = load_units(&cli.file, cli.html)?;

    let mut store = cli
        .settings
        .clone()
        .or_else(TomlSettingsStore::default_path)
        .map(TomlSettingsStore::new);
    if let Some(store) = store.as_ref() {
        info!("settings: using {}", store.path().display());
    }
    let stored = match store.as_mut().map(|store| store.load()) {
        Some(Ok(stored)) => stored,
        Some(Err(err)) => {
            warn!("{err}; using defaults");
            None
        }
        None => None,
    };
    let settings = resolve_settings(stored, cli.wpm, cli.paragraph_mode);
    info!(
        "pacer: units={} words={} wpm={} paragraph_mode={}",
        units.len(),
        units.word_count(),
        settings.wpm,
        settings.paragraph_mode
    );

    run(units, settings, store.as_mut())
}

fn load_units(path: &Path, force_markup: bool) -> Result<UnitSequence> {
    let text = read_source(path)?;
    let text = if force_markup || is_markup_path(path) {
        flatten_markup(&text)
    } else {
        text
    };

    Ok(tokenize(&text).require_words()?)
}

fn read_source(path: &Path) -> Result<String> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        text
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };

    Ok(strip_bom(text))
}

fn strip_bom(mut text: String) -> String {
    if text.starts_with(BYTE_ORDER_MARK) {
        text.replace_range(..BYTE_ORDER_MARK.len_utf8(), "");
    }
    text
}

fn is_markup_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKUP_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Flags win over the stored file, which wins over defaults.
fn resolve_settings(
    stored: Option<PersistedSettings>,
    wpm: Option<u16>,
    paragraph_mode: Option<ParagraphMode>,
) -> PersistedSettings {
    let base = stored.unwrap_or_default();
    PersistedSettings::new(
        wpm.unwrap_or(base.wpm),
        paragraph_mode.unwrap_or(base.paragraph_mode),
    )
}

fn run(
    units: UnitSequence,
    settings: PersistedSettings,
    mut store: Option<&mut TomlSettingsStore>,
) -> Result<()> {
    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;

    let _guard = TerminalGuard::enter().context("failed to prepare terminal")?;

    let total_words = units.word_count();
    let mut engine: Engine = PlaybackEngine::new(
        units,
        settings,
        DeadlineScheduler::new(),
        TerminalDisplay::new(total_words),
        SettingsSyncState::new(settings),
    );

    let result = drive(&mut engine, store.as_deref_mut(), &now_ms);
    finish_session(engine.settings_sink_mut(), store, now_ms(), result)
}

fn drive(
    engine: &mut Engine,
    mut store: Option<&mut TomlSettingsStore>,
    now_ms: &impl Fn() -> u64,
) -> Result<()> {
    let mut stdout = io::stdout();
    let mut input = KeyInput::default();

    let mut report_words = 0u64;
    let mut report_start = now_ms();

    loop {
        let now = now_ms();
        engine.tick(now);
        engine.settings_sink_mut().observe_clock(now);

        let applied = engine
            .process_inputs(&mut input)
            .context("failed to read terminal input")?;
        if engine.state() == PlaybackState::Closed {
            return Ok(());
        }
        if applied > 0 || input.take_resized() {
            engine.display_mut().mark_dirty();
        }

        if engine.display_mut().take_dirty() {
            let settings = engine.settings();
            let viewing_content = engine.is_viewing_content();
            engine
                .display()
                .draw(&mut stdout, settings, viewing_content)
                .context("failed to draw")?;
        }

        engine
            .settings_sink_mut()
            .flush_if_due(store.as_deref_mut(), now);

        report_words = report_words.saturating_add(engine.drain_word_updates() as u64);
        let elapsed_ms = now.saturating_sub(report_start);
        if elapsed_ms >= WPM_REPORT_INTERVAL_MS {
            if report_words > 0 {
                let wpm_x100 = report_words * 6_000_000 / elapsed_ms.max(1);
                info!(
                    "effective_wpm={}.{:02} words={} elapsed_ms={}",
                    wpm_x100 / 100,
                    wpm_x100 % 100,
                    report_words,
                    elapsed_ms
                );
            }
            report_words = 0;
            report_start = now;
        }

        keys::wait_for_input(poll_wait(engine, now_ms()))
            .context("failed to read terminal input")?;
    }
}

/// Writes any pending settings change whether the session ended cleanly or not, then
/// hands back the session result.
fn finish_session<S>(
    sync: &mut SettingsSyncState,
    store: Option<&mut S>,
    now_ms: u64,
    result: Result<()>,
) -> Result<()>
where
    S: SettingsStore,
    S::Error: core::fmt::Display,
{
    if sync.has_pending() {
        sync.flush(store, now_ms);
    }
    result
}

/// How long the loop may block on input before the next timer is due.
fn poll_wait(engine: &Engine, now: u64) -> Duration {
    let until_due = engine
        .scheduler()
        .next_due_ms()
        .map_or(INPUT_POLL_MAX_MS, |due| due.saturating_sub(now));
    Duration::from_millis(until_due.min(INPUT_POLL_MAX_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacer_core::settings::{DEFAULT_WPM, MAX_WPM};

    #[derive(Default)]
    struct MemoryStore {
        saved: Vec<PersistedSettings>,
    }

    impl SettingsStore for MemoryStore {
        type Error = &'static str;

        fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
            Ok(self.saved.last().copied())
        }

        fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
            self.saved.push(*settings);
            Ok(())
        }
    }

    #[test]
    fn pending_settings_are_saved_when_the_session_fails() {
        let start = PersistedSettings::new(300, ParagraphMode::Pause);
        let changed = PersistedSettings::new(350, ParagraphMode::Pause);
        let mut sync = SettingsSyncState::new(start);
        sync.track_current(changed, 0);
        let mut store = MemoryStore::default();

        let result = finish_session(
            &mut sync,
            Some(&mut store),
            10,
            Err(anyhow::anyhow!("terminal went away")),
        );

        assert_eq!(result.unwrap_err().to_string(), "terminal went away");
        assert_eq!(store.saved, vec![changed]);
        assert!(!sync.has_pending());
    }

    #[test]
    fn leading_byte_order_mark_is_dropped() {
        assert_eq!(strip_bom("\u{FEFF}Hello world".to_string()), "Hello world");
        assert_eq!(strip_bom("Hello\u{FEFF}".to_string()), "Hello\u{FEFF}");

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bom.txt");
        fs::write(&path, "\u{FEFF}Reading fast").unwrap();
        let units = load_units(&path, false).unwrap();
        assert_eq!(units.get(0).and_then(|unit| unit.as_word()), Some("Reading"));
    }

    #[test]
    fn flags_override_stored_settings() {
        let stored = PersistedSettings::new(450, ParagraphMode::Delay);

        assert_eq!(resolve_settings(Some(stored), None, None), stored);
        assert_eq!(
            resolve_settings(Some(stored), Some(600), None),
            PersistedSettings::new(600, ParagraphMode::Delay)
        );
        assert_eq!(
            resolve_settings(Some(stored), None, Some(ParagraphMode::Continue)),
            PersistedSettings::new(450, ParagraphMode::Continue)
        );
    }

    #[test]
    fn missing_settings_use_defaults_and_clamp_flags() {
        assert_eq!(
            resolve_settings(None, None, None),
            PersistedSettings::new(DEFAULT_WPM, ParagraphMode::Pause)
        );
        assert_eq!(resolve_settings(None, Some(9_000), None).wpm, MAX_WPM);
    }

    #[test]
    fn markup_is_detected_by_extension() {
        assert!(is_markup_path(Path::new("chapter.html")));
        assert!(is_markup_path(Path::new("chapter.XHTML")));
        assert!(is_markup_path(Path::new("dir/index.htm")));
        assert!(!is_markup_path(Path::new("notes.txt")));
        assert!(!is_markup_path(Path::new("-")));
    }

    #[test]
    fn cli_accepts_paragraph_mode_names() {
        let cli = Cli::try_parse_from(["pacer", "--paragraph-mode", "none", "book.txt"]).unwrap();
        assert_eq!(cli.paragraph_mode, Some(ParagraphMode::Continue));
        assert_eq!(cli.file, PathBuf::from("book.txt"));

        assert!(Cli::try_parse_from(["pacer", "--paragraph-mode", "fast", "book.txt"]).is_err());
    }

    #[test]
    fn empty_input_reports_no_readable_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("blank.txt");
        fs::write(&path, "  \n\n\t ").unwrap();

        let err = load_units(&path, false).unwrap_err();
        assert_eq!(err.to_string(), "No readable text found.");
    }

    #[test]
    fn html_input_is_flattened_before_tokenizing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "<p>Hello&nbsp;there</p><pre>let x = 1;</pre>").unwrap();

        let units = load_units(&path, false).unwrap();
        assert_eq!(units.word_count(), 2);
        assert!(units.iter().any(|unit| unit.is_marker()));
    }
}
