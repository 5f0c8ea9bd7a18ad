//! The narrator owns the single active narration.
//!
//! Every narration goes through [`Narrator::narrate`], which stops whatever
//! is playing (including externally registered audio), walks the candidate
//! list in order and falls back to speech synthesis when nothing plays.
//! Nothing here ever surfaces an error to the caller; the outcome says what
//! happened.

use crate::candidates::{candidate_sources, suggested_slug, AssetLayout};
use crate::player::{AudioPlayer, PlaybackHandle};
use crate::request::{AudioIntent, NarrationRequest};
use crate::speech::{choose_voice, SpeechErrorKind, SpeechSynthesizer, Utterance, UtteranceId};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use stilllift_core::AudioConfig;
use tokio::time::Instant;

/// Defaults applied to every narration.
#[derive(Debug, Clone)]
pub struct NarratorSettings {
    pub layout: AssetLayout,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub voice_hints: Vec<String>,
    /// Speech errors within this long after an intentional stop are expected noise.
    pub suppress_window: Duration,
}

impl Default for NarratorSettings {
    fn default() -> Self {
        Self::from(&AudioConfig::default())
    }
}

impl From<&AudioConfig> for NarratorSettings {
    fn from(config: &AudioConfig) -> Self {
        Self {
            layout: AssetLayout::from(config),
            rate: config.rate,
            pitch: config.pitch,
            volume: config.volume,
            voice_hints: config.voice_hints.clone(),
            suppress_window: Duration::from_millis(config.suppress_window_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NarrationOutcome {
    /// A pre-rendered file started; `attempts` counts candidates tried, this one included.
    Played { source: String, attempts: usize },
    /// Speech synthesis took over.
    Spoken {
        id: UtteranceId,
        text: String,
        voice: Option<String>,
    },
    /// A newer narration started before this one could.
    Superseded,
    /// Nothing could be played or spoken.
    Unavailable,
}

/// What is currently narrating, for observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveNarration {
    Audio { source: String, intent: AudioIntent },
    Speech { id: UtteranceId, intent: AudioIntent },
}

/// How a reported speech error was treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Suppressed,
    Genuine,
}

enum Active {
    Audio {
        handle: Box<dyn PlaybackHandle>,
        intent: AudioIntent,
    },
    Speech {
        id: UtteranceId,
        intent: AudioIntent,
    },
}

impl Active {
    fn intent(&self) -> AudioIntent {
        match self {
            Active::Audio { intent, .. } | Active::Speech { intent, .. } => *intent,
        }
    }
}

#[derive(Default)]
struct NarrationState {
    active: Option<Active>,
    suppress_until: Option<Instant>,
}

type StopHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct StopRegistry {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(u64, StopHandler)>>,
}

impl StopRegistry {
    fn snapshot(&self) -> Vec<StopHandler> {
        lock(&self.handlers).iter().map(|(_, h)| h.clone()).collect()
    }

    fn remove(&self, id: u64) {
        lock(&self.handlers).retain(|(hid, _)| *hid != id);
    }
}

/// Keeps an external stop handler registered; dropping it unregisters.
#[must_use = "the handler is unregistered when the guard is dropped"]
pub struct StopHandlerGuard {
    id: u64,
    registry: Weak<StopRegistry>,
}

impl Drop for StopHandlerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

struct ResetOnDrop<'a>(&'a AtomicBool);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Narrator {
    player: Arc<dyn AudioPlayer>,
    speech: Arc<dyn SpeechSynthesizer>,
    settings: NarratorSettings,
    state: Mutex<NarrationState>,
    stop_handlers: Arc<StopRegistry>,
    stopping: AtomicBool,
    /// Bumped by every `narrate` call; a narration whose generation is stale lost the race.
    generation: AtomicU64,
    next_utterance: AtomicU64,
}

impl Narrator {
    pub fn new(player: Arc<dyn AudioPlayer>, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self::with_settings(player, speech, NarratorSettings::default())
    }

    pub fn with_settings(
        player: Arc<dyn AudioPlayer>,
        speech: Arc<dyn SpeechSynthesizer>,
        settings: NarratorSettings,
    ) -> Self {
        Self {
            player,
            speech,
            settings,
            state: Mutex::new(NarrationState::default()),
            stop_handlers: Arc::new(StopRegistry::default()),
            stopping: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            next_utterance: AtomicU64::new(1),
        }
    }

    pub fn settings(&self) -> &NarratorSettings {
        &self.settings
    }

    /// File stem a pre-rendered recording of this text should use.
    pub fn suggested_slug(&self, title: Option<&str>, message: &str) -> String {
        suggested_slug(title, message, self.settings.layout.slug_max_len)
    }

    /// Register a callback run before any narration starts, so unrelated
    /// audio (an ambient loop, say) can release the speakers.
    pub fn register_stop_handler<F>(&self, handler: F) -> StopHandlerGuard
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.stop_handlers.next_id.fetch_add(1, Ordering::SeqCst);
        lock(&self.stop_handlers.handlers).push((id, Arc::new(handler)));
        StopHandlerGuard {
            id,
            registry: Arc::downgrade(&self.stop_handlers),
        }
    }

    /// Narrate a message: first playable candidate wins, speech otherwise.
    pub async fn narrate(&self, request: NarrationRequest) -> NarrationOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let intent = request.resolved_intent();

        self.stop_all();

        let candidates = candidate_sources(&request, &self.settings.layout);
        tracing::debug!("Trying audio candidates: {:?}", candidates);

        for (attempt, src) in candidates.iter().enumerate() {
            if self.is_stale(generation) {
                return NarrationOutcome::Superseded;
            }

            match self.player.play(src).await {
                Ok(mut handle) => {
                    let mut state = lock(&self.state);
                    if self.is_stale(generation) {
                        drop(state);
                        handle.stop();
                        tracing::debug!("Narration superseded while starting {}", src);
                        return NarrationOutcome::Superseded;
                    }
                    if let Some(previous) = state.active.take() {
                        self.halt(previous, &mut state);
                    }
                    tracing::info!("Playing pre-generated file: {}", src);
                    state.active = Some(Active::Audio { handle, intent });
                    return NarrationOutcome::Played {
                        source: src.clone(),
                        attempts: attempt + 1,
                    };
                }
                Err(e) => {
                    tracing::debug!("Failed to play {}: {}", src, e);
                }
            }
        }

        if self.is_stale(generation) {
            return NarrationOutcome::Superseded;
        }

        tracing::warn!(
            "No matching audio file found for {:?}; falling back to speech synthesis",
            request.message
        );
        self.speak(&request, intent, generation)
    }

    fn speak(&self, request: &NarrationRequest, intent: AudioIntent, generation: u64) -> NarrationOutcome {
        if !self.speech.is_available() {
            tracing::warn!("Speech synthesis not available");
            return NarrationOutcome::Unavailable;
        }

        let hints = if request.voice.voice_hints.is_empty() {
            &self.settings.voice_hints
        } else {
            &request.voice.voice_hints
        };
        let voice = choose_voice(&self.speech.voices(), hints);
        let id = UtteranceId(self.next_utterance.fetch_add(1, Ordering::SeqCst));
        let text = request.speech_text();

        let utterance = Utterance {
            id,
            text: text.clone(),
            rate: request.voice.rate.unwrap_or(self.settings.rate),
            pitch: request.voice.pitch.unwrap_or(self.settings.pitch),
            volume: request.voice.volume.unwrap_or(self.settings.volume),
            voice: voice.clone(),
        };

        let mut state = lock(&self.state);
        if self.is_stale(generation) {
            return NarrationOutcome::Superseded;
        }
        if let Some(previous) = state.active.take() {
            self.halt(previous, &mut state);
        }

        self.speech.cancel();
        match self.speech.speak(utterance) {
            Ok(()) => {
                tracing::info!("Speaking via speech synthesis: {}", text);
                state.active = Some(Active::Speech { id, intent });
                NarrationOutcome::Spoken {
                    id,
                    text,
                    voice: voice.map(|v| v.name),
                }
            }
            Err(e) => {
                tracing::error!("Error in speech synthesis: {}", e);
                NarrationOutcome::Unavailable
            }
        }
    }

    /// Stop everything: external audio first, then our own file or utterance.
    pub fn stop_all(&self) {
        if self.stopping.swap(true, Ordering::SeqCst) {
            return;
        }
        let _reset = ResetOnDrop(&self.stopping);

        for handler in self.stop_handlers.snapshot() {
            if catch_unwind(AssertUnwindSafe(|| handler())).is_err() {
                tracing::warn!("External audio stop handler failed");
            }
        }

        let mut state = lock(&self.state);
        if let Some(active) = state.active.take() {
            self.halt(active, &mut state);
        }
    }

    /// Stop only if the active narration was started for `intent`.
    pub fn stop_by_intent(&self, intent: AudioIntent) {
        if self.active_intent() == Some(intent) {
            self.stop_all();
        }
    }

    fn halt(&self, active: Active, state: &mut NarrationState) {
        match active {
            Active::Audio { mut handle, .. } => {
                tracing::debug!("Stopping {}", handle.source());
                handle.stop();
            }
            Active::Speech { id, .. } => {
                tracing::debug!("Cancelling {}", id);
                self.speech.cancel();
                state.suppress_until = Some(Instant::now() + self.settings.suppress_window);
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    pub fn active(&self) -> Option<ActiveNarration> {
        lock(&self.state).active.as_ref().map(|active| match active {
            Active::Audio { handle, intent } => ActiveNarration::Audio {
                source: handle.source().to_string(),
                intent: *intent,
            },
            Active::Speech { id, intent } => ActiveNarration::Speech {
                id: *id,
                intent: *intent,
            },
        })
    }

    pub fn active_intent(&self) -> Option<AudioIntent> {
        lock(&self.state).active.as_ref().map(Active::intent)
    }

    /// The host reports that a file finished on its own.
    pub fn on_playback_ended(&self, source: &str) {
        let mut state = lock(&self.state);
        if matches!(&state.active, Some(Active::Audio { handle, .. }) if handle.source() == source) {
            state.active = None;
        }
    }

    /// The host reports that an utterance finished.
    pub fn on_speech_end(&self, id: UtteranceId) {
        let mut state = lock(&self.state);
        if matches!(&state.active, Some(Active::Speech { id: active, .. }) if *active == id) {
            state.active = None;
        }
    }

    /// The host reports a speech error for an utterance.
    ///
    /// Errors inside the post-stop window, and interruption/cancel/autoplay
    /// errors at any time, are logged as notices rather than failures.
    pub fn on_speech_error(&self, id: UtteranceId, kind: SpeechErrorKind) -> Severity {
        let mut state = lock(&self.state);
        let in_window = state
            .suppress_until
            .map(|until| Instant::now() < until)
            .unwrap_or(false);

        let severity = if in_window || kind.is_benign() {
            tracing::warn!("Speech notice (suppressed) for {}: {}", id, kind);
            Severity::Suppressed
        } else {
            tracing::error!("Speech error for {}: {}", id, kind);
            Severity::Genuine
        };

        if matches!(&state.active, Some(Active::Speech { id: active, .. }) if *active == id) {
            state.active = None;
        }
        severity
    }
}

impl Drop for Narrator {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        if let Some(Active::Audio { mut handle, .. }) = state.active.take() {
            handle.stop();
        }
    }
}
