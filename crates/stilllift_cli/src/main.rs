use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use stilllift_core::{
    context_glyph, embedded, mood_glyph, pick, ContentLibrary, Context, Mood, PresentationMetadata,
    SelectedMessage, StillLiftConfig,
};
use stilllift_reveal::{RevealDriver, RevealPhase, RevealTiming};
use stilllift_session::{JsonFileStore, KeyValueStore, Preferences, SessionState, Step};
use stilllift_voice::{FsAssetPlayer, NarrationOutcome, NarrationRequest, Narrator, NarratorSettings};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod console;

use console::ConsoleSpeech;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "STILLLIFT_CONFIG", default_value = "stilllift.toml")]
    config: PathBuf,

    /// Session store file (overrides config)
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick a message for a mood and context and remember it
    Pick {
        #[arg(long)]
        mood: Mood,
        #[arg(long)]
        context: Context,
        /// Play the reveal in the terminal
        #[arg(long)]
        animate: bool,
        /// Print the selection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Deal distinct messages to choose from
    Cards {
        #[arg(long)]
        mood: Mood,
        #[arg(long)]
        context: Context,
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
    /// Narrate a message, or the current selection when none is given
    Narrate {
        message: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, requires = "context")]
        mood: Option<Mood>,
        #[arg(long, requires = "mood")]
        context: Option<Context>,
        /// 1-based audio index within the mood/context bucket
        #[arg(long)]
        index: Option<u32>,
        /// Do not fall back to audio index 1
        #[arg(long)]
        exact: bool,
        /// Narrate as the landing-screen ambient audio
        #[arg(long)]
        homepage: bool,
    },
    /// Show preferences, or flip one
    Prefs {
        #[arg(value_enum)]
        toggle: Option<PrefKey>,
    },
    /// Show where the current session stands
    Session,
    /// Forget mood, context and selection
    StartOver,
    /// Check a content library file (the built-in one by default)
    Validate { path: Option<PathBuf> },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PrefKey {
    Theme,
    ReadAloud,
    Screenless,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = StillLiftConfig::load_or_default(&args.config);

    let store_path = args.store.clone().unwrap_or_else(|| config.session.store_path.clone());
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(&store_path));

    let loaded;
    let library: &ContentLibrary = match &config.content.library_path {
        Some(path) => {
            loaded = ContentLibrary::load(path)
                .with_context(|| format!("Failed to load content library {}", path.display()))?;
            &loaded
        }
        None => embedded(),
    };

    match args.command {
        Command::Pick {
            mood,
            context,
            animate,
            json,
        } => {
            let session = SessionState::new(store.clone());
            let prefs = Preferences::load(store.clone());

            let Some(selected) = pick(library, mood, context) else {
                bail!("No messages for {} / {}", mood, context);
            };
            session.set_mood(mood)?;
            session.set_context(context)?;
            session.select_message(&selected)?;

            let meta = selected.derive_presentation();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "selection": selected,
                        "presentation": meta,
                    }))?
                );
            } else if prefs.screenless() {
                info!("Screenless mode: message text hidden");
            } else if animate {
                play_reveal(&meta, &selected).await;
            } else {
                print_selection(&selected, &meta);
            }

            if prefs.audio_enabled() || prefs.screenless() {
                narrate(&config, NarrationRequest::for_selection(&selected).exact_index()).await;
            }
        }
        Command::Cards {
            mood,
            context,
            count,
        } => {
            let dealt = library.random_messages(mood, context, count);
            if dealt.is_empty() {
                bail!("No messages for {} / {}", mood, context);
            }
            println!("{} {}  {} / {}", mood_glyph(mood), context_glyph(context), mood, context);
            for (i, card) in dealt.iter().enumerate() {
                println!("  [{}] {:<13} {}", i + 1, card.action_type.label(), card.message);
            }
        }
        Command::Narrate {
            message,
            title,
            mood,
            context,
            index,
            exact,
            homepage,
        } => {
            let mut request = match message {
                Some(text) if homepage => NarrationRequest::homepage(text),
                Some(text) => NarrationRequest::new(text),
                None => {
                    let Some(selected) = SessionState::new(store.clone()).selected_message() else {
                        bail!("Nothing selected yet; pass a message or run `pick` first");
                    };
                    NarrationRequest::for_selection(&selected).exact_index()
                }
            };
            if let Some(title) = title {
                request = request.with_title(title);
            }
            if let (Some(mood), Some(context)) = (mood, context) {
                request = request.with_mood_context(mood, context);
            }
            if let Some(index) = index {
                request = request.with_audio_index(index);
            }
            if exact {
                request = request.exact_index();
            }
            narrate(&config, request).await;
        }
        Command::Prefs { toggle } => {
            let mut prefs = Preferences::load(store.clone());
            match toggle {
                Some(PrefKey::Theme) => {
                    prefs.toggle_theme();
                }
                Some(PrefKey::ReadAloud) => {
                    prefs.toggle_read_aloud();
                }
                Some(PrefKey::Screenless) => {
                    prefs.toggle_screenless();
                }
                None => {}
            }
            println!("theme:      {}", prefs.theme_marker().as_str());
            println!("read aloud: {}", on_off(prefs.audio_enabled()));
            println!("screen:     {}", prefs.screen_marker().as_str());
        }
        Command::Session => {
            let session = SessionState::new(store.clone());
            let step = session.next_step();
            println!("next: {}", step_name(step));
            if let Some(mood) = session.current_mood() {
                println!("mood:    {} {}", mood_glyph(mood), mood);
            }
            if let Some(context) = session.current_context() {
                println!("context: {} {}", context_glyph(context), context);
            }
            if let Some(selected) = session.selected_message() {
                println!("message: {}", selected.message);
            }
        }
        Command::StartOver => {
            SessionState::new(store.clone()).start_over()?;
            println!("Session cleared");
        }
        Command::Validate { path } => {
            let owned;
            let target = match &path {
                Some(path) => {
                    owned = ContentLibrary::load(path)
                        .with_context(|| format!("Failed to load content library {}", path.display()))?;
                    &owned
                }
                None => library,
            };
            let report = target.validate();
            println!("{} messages", target.len());
            for error in &report.errors {
                println!("  - {}", error);
            }
            if !report.is_valid() {
                bail!("Content library has {} problem(s)", report.errors.len());
            }
            println!("Content library is valid");
        }
    }

    Ok(())
}

async fn narrate(config: &StillLiftConfig, request: NarrationRequest) {
    let player = Arc::new(FsAssetPlayer::new(&config.audio.asset_root));
    let narrator = Narrator::with_settings(
        player.clone(),
        Arc::new(ConsoleSpeech::default()),
        NarratorSettings::from(&config.audio),
    );

    match narrator.narrate(request).await {
        NarrationOutcome::Played { source, attempts } => {
            println!("▶ {} (candidate {})", player.resolve(&source).display(), attempts);
        }
        NarrationOutcome::Spoken { .. } => {}
        NarrationOutcome::Superseded => {}
        NarrationOutcome::Unavailable => println!("(narration unavailable)"),
    }
}

fn print_selection(selected: &SelectedMessage, meta: &PresentationMetadata) {
    if let (Some(mood), Some(context)) = (selected.mood, selected.context) {
        println!("{} {}  {} / {}", mood_glyph(mood), context_glyph(context), mood, context);
    }
    if let Some(action) = selected.action_type {
        println!("[{}] {}", action.label(), meta.accent_color.hex());
    }
    println!("{}", selected.message);
}

/// Print the reveal phase by phase; the message appears once revealed.
async fn play_reveal(meta: &PresentationMetadata, selected: &SelectedMessage) {
    let driver = RevealDriver::spawn(RevealTiming::for_metadata(meta));
    let mut phases = driver.subscribe();
    println!("{} ({})", meta.reveal_type, meta.animation_speed.as_str());
    if driver.timing().auto_trigger.is_none() {
        driver.trigger();
    }

    // The watch channel may skip straight from Revealing to Locked.
    let mut shown = false;
    while phases.changed().await.is_ok() {
        let phase = *phases.borrow_and_update();
        if phase == RevealPhase::Revealing {
            println!("  …");
        }
        if phase.message_visible() && !shown {
            print_selection(selected, meta);
            shown = true;
        }
        if phase == RevealPhase::Locked {
            break;
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

fn step_name(step: Step) -> &'static str {
    match step {
        Step::ChooseMood => "choose a mood",
        Step::ChooseContext => "choose a context",
        Step::ChooseMessage => "choose a message",
        Step::ShowMessage => "show message",
    }
}
