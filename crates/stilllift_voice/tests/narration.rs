//! Integration tests for Narrator
//!
//! Mock player/speech engines record every call so the tests can check the
//! exact attempt order and what was stopped.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use stilllift_core::{Context, Mood};
use stilllift_voice::{
    ActiveNarration, AudioIntent, AudioPlayer, NarrationOutcome, NarrationRequest, Narrator,
    NarratorSettings, PlaybackError, PlaybackHandle, Severity, SpeechError, SpeechErrorKind,
    SpeechSynthesizer, Utterance, Voice,
};

#[derive(Default)]
struct MockPlayer {
    playable: HashSet<String>,
    delays: HashMap<String, Duration>,
    attempts: Mutex<Vec<String>>,
    started: Mutex<Vec<(String, Arc<AtomicBool>)>>,
}

impl MockPlayer {
    fn with_files(files: &[&str]) -> Self {
        Self {
            playable: files.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }

    fn delayed(mut self, src: &str, delay: Duration) -> Self {
        self.delays.insert(src.to_string(), delay);
        self
    }

    fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    fn was_stopped(&self, src: &str) -> bool {
        self.started
            .lock()
            .unwrap()
            .iter()
            .any(|(s, stopped)| s == src && stopped.load(Ordering::SeqCst))
    }
}

struct MockHandle {
    source: String,
    stopped: Arc<AtomicBool>,
}

impl PlaybackHandle for MockHandle {
    fn source(&self) -> &str {
        &self.source
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn is_finished(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioPlayer for MockPlayer {
    async fn play(&self, src: &str) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        self.attempts.lock().unwrap().push(src.to_string());
        if let Some(delay) = self.delays.get(src) {
            tokio::time::sleep(*delay).await;
        }
        if !self.playable.contains(src) {
            return Err(PlaybackError::NotFound(src.to_string()));
        }
        let stopped = Arc::new(AtomicBool::new(false));
        self.started
            .lock()
            .unwrap()
            .push((src.to_string(), stopped.clone()));
        Ok(Box::new(MockHandle {
            source: src.to_string(),
            stopped,
        }))
    }
}

#[derive(Default)]
struct MockSpeech {
    unavailable: bool,
    voices: Vec<Voice>,
    spoken: Mutex<Vec<Utterance>>,
    cancels: AtomicUsize,
}

impl SpeechSynthesizer for MockSpeech {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(utterance);
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

fn narrator(player: &Arc<MockPlayer>, speech: &Arc<MockSpeech>) -> Narrator {
    Narrator::new(player.clone(), speech.clone())
}

#[tokio::test]
async fn test_third_candidate_plays_after_two_failures() {
    let player = Arc::new(MockPlayer::with_files(&["/Audio/Mood_Good_Context_Still_Audio_1.ogg"]));
    let speech = Arc::new(MockSpeech::default());
    let narrator = narrator(&player, &speech);

    let request = NarrationRequest::new("Do a mindful body scan").with_mood_context(Mood::Good, Context::Safe);
    let outcome = narrator.narrate(request).await;

    assert_eq!(
        outcome,
        NarrationOutcome::Played {
            source: "/Audio/Mood_Good_Context_Still_Audio_1.ogg".to_string(),
            attempts: 3,
        }
    );
    assert_eq!(player.attempts().len(), 3);
    assert!(speech.spoken.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_exact_index_never_tries_index_one() {
    let player = Arc::new(MockPlayer::default());
    let speech = Arc::new(MockSpeech::default());
    let narrator = narrator(&player, &speech);

    let request = NarrationRequest::new("Take three slow breaths")
        .with_mood_context(Mood::Good, Context::Safe)
        .with_audio_index(2)
        .exact_index();
    let outcome = narrator.narrate(request).await;
    assert!(matches!(outcome, NarrationOutcome::Spoken { .. }));

    let structured: Vec<String> = player
        .attempts()
        .into_iter()
        .filter(|a| a.contains("Mood_"))
        .collect();
    assert_eq!(structured.len(), 4);
    assert!(structured
        .iter()
        .all(|a| a.starts_with("/Audio/Mood_Good_Context_Still_Audio_2.")));
}

#[tokio::test]
async fn test_second_narration_replaces_first() {
    let player = Arc::new(MockPlayer::with_files(&["/Audio/first.mp3", "/Audio/second.mp3"]));
    let speech = Arc::new(MockSpeech::default());
    let narrator = narrator(&player, &speech);

    narrator.narrate(NarrationRequest::new("First")).await;
    assert!(!player.was_stopped("/Audio/first.mp3"));

    narrator.narrate(NarrationRequest::new("Second")).await;
    assert!(player.was_stopped("/Audio/first.mp3"));
    assert!(!player.was_stopped("/Audio/second.mp3"));
    assert_eq!(
        narrator.active(),
        Some(ActiveNarration::Audio {
            source: "/Audio/second.mp3".to_string(),
            intent: AudioIntent::Task,
        })
    );
}

#[tokio::test]
async fn test_exhaustion_falls_back_to_speech() {
    let player = Arc::new(MockPlayer::default());
    let speech = Arc::new(MockSpeech {
        voices: vec![
            Voice::new("Alex", "en-US"),
            Voice::new("Samantha", "en-US"),
            Voice::new("Google UK English Female", "en-GB"),
        ],
        ..Default::default()
    });
    let settings = NarratorSettings {
        voice_hints: vec!["Google".to_string(), "Samantha".to_string()],
        ..Default::default()
    };
    let narrator = Narrator::with_settings(player.clone(), speech.clone(), settings);

    let outcome = narrator
        .narrate(NarrationRequest::new("Take a breath").with_title("Be Gentle"))
        .await;

    match outcome {
        NarrationOutcome::Spoken { text, voice, .. } => {
            assert_eq!(text, "Be Gentle. Take a breath");
            assert_eq!(voice.as_deref(), Some("Samantha"));
        }
        other => panic!("expected speech, got {:?}", other),
    }

    // two slugs, two dirs, four extensions
    assert_eq!(player.attempts().len(), 16);
    let spoken = speech.spoken.lock().unwrap();
    assert_eq!(spoken.len(), 1);
    assert!((spoken[0].rate - 0.95).abs() < f32::EPSILON);
    assert!((spoken[0].pitch - 1.0).abs() < f32::EPSILON);
    assert!((spoken[0].volume - 0.9).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_unavailable_speech_reports_unavailable() {
    let player = Arc::new(MockPlayer::default());
    let speech = Arc::new(MockSpeech {
        unavailable: true,
        ..Default::default()
    });
    let narrator = narrator(&player, &speech);

    let outcome = narrator.narrate(NarrationRequest::new("Rest")).await;
    assert_eq!(outcome, NarrationOutcome::Unavailable);
    assert!(narrator.active().is_none());
}

#[tokio::test]
async fn test_stop_handlers_run_until_guard_dropped() {
    let player = Arc::new(MockPlayer::with_files(&["/Audio/rest.mp3"]));
    let speech = Arc::new(MockSpeech::default());
    let narrator = narrator(&player, &speech);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let guard = narrator.register_stop_handler(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let _panicky = narrator.register_stop_handler(|| panic!("ambient player gone"));

    narrator.narrate(NarrationRequest::new("Rest")).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(narrator.active().is_some());

    drop(guard);
    narrator.stop_all();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(narrator.active().is_none());
    assert!(player.was_stopped("/Audio/rest.mp3"));
}

#[tokio::test(start_paused = true)]
async fn test_errors_suppressed_inside_stop_window() {
    let player = Arc::new(MockPlayer::default());
    let speech = Arc::new(MockSpeech::default());
    let narrator = narrator(&player, &speech);

    let id = match narrator.narrate(NarrationRequest::new("Rest")).await {
        NarrationOutcome::Spoken { id, .. } => id,
        other => panic!("expected speech, got {:?}", other),
    };
    let failure = SpeechErrorKind::from_code("synthesis-failed");

    // Nothing stopped yet, so a real failure is genuine.
    assert_eq!(narrator.on_speech_error(id, failure.clone()), Severity::Genuine);

    narrator.narrate(NarrationRequest::new("Again")).await;
    narrator.stop_all();
    assert_eq!(narrator.on_speech_error(id, failure.clone()), Severity::Suppressed);

    tokio::time::advance(Duration::from_millis(1001)).await;
    assert_eq!(narrator.on_speech_error(id, failure), Severity::Genuine);
    assert_eq!(
        narrator.on_speech_error(id, SpeechErrorKind::Interrupted),
        Severity::Suppressed
    );
}

#[tokio::test]
async fn test_speech_end_clears_only_matching_utterance() {
    let player = Arc::new(MockPlayer::default());
    let speech = Arc::new(MockSpeech::default());
    let narrator = narrator(&player, &speech);

    let first = match narrator.narrate(NarrationRequest::new("One")).await {
        NarrationOutcome::Spoken { id, .. } => id,
        other => panic!("expected speech, got {:?}", other),
    };
    let before = speech.cancels.load(Ordering::SeqCst);
    narrator.narrate(NarrationRequest::new("Two")).await;
    // One cancel to halt "One", one more before "Two" is queued.
    assert_eq!(speech.cancels.load(Ordering::SeqCst), before + 2);

    narrator.on_speech_end(first);
    assert!(matches!(narrator.active(), Some(ActiveNarration::Speech { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_audio_narration_cancels_active_speech() {
    let player = Arc::new(MockPlayer::with_files(&["/Audio/two.mp3"]));
    let speech = Arc::new(MockSpeech::default());
    let narrator = narrator(&player, &speech);

    let first = match narrator.narrate(NarrationRequest::new("One")).await {
        NarrationOutcome::Spoken { id, .. } => id,
        other => panic!("expected speech, got {:?}", other),
    };
    let before = speech.cancels.load(Ordering::SeqCst);

    let outcome = narrator.narrate(NarrationRequest::new("Two")).await;
    assert!(matches!(outcome, NarrationOutcome::Played { .. }));
    assert!(speech.cancels.load(Ordering::SeqCst) > before);

    // The cancelled utterance's late failure lands inside the stop window.
    assert_eq!(
        narrator.on_speech_error(first, SpeechErrorKind::from_code("synthesis-failed")),
        Severity::Suppressed
    );
    assert_eq!(
        narrator.active(),
        Some(ActiveNarration::Audio {
            source: "/Audio/two.mp3".to_string(),
            intent: AudioIntent::Task,
        })
    );
}

#[tokio::test]
async fn test_stop_by_intent_only_stops_matching() {
    let player = Arc::new(MockPlayer::with_files(&["/Audio/homepage audio.mp3"]));
    let speech = Arc::new(MockSpeech::default());
    let narrator = narrator(&player, &speech);

    narrator.narrate(NarrationRequest::homepage("Welcome")).await;
    assert_eq!(narrator.active_intent(), Some(AudioIntent::Homepage));

    narrator.stop_by_intent(AudioIntent::Task);
    assert_eq!(narrator.active_intent(), Some(AudioIntent::Homepage));

    narrator.stop_by_intent(AudioIntent::Homepage);
    assert_eq!(narrator.active_intent(), None);
    assert!(player.was_stopped("/Audio/homepage audio.mp3"));
}

#[tokio::test]
async fn test_playback_ended_clears_active() {
    let player = Arc::new(MockPlayer::with_files(&["/Audio/rest.mp3"]));
    let speech = Arc::new(MockSpeech::default());
    let narrator = narrator(&player, &speech);

    narrator.narrate(NarrationRequest::new("Rest")).await;
    narrator.on_playback_ended("/Audio/other.mp3");
    assert!(narrator.active().is_some());
    narrator.on_playback_ended("/Audio/rest.mp3");
    assert!(narrator.active().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_slow_start_is_superseded_by_newer_narration() {
    let player = Arc::new(
        MockPlayer::with_files(&["/Audio/slow.mp3", "/Audio/fast.mp3"])
            .delayed("/Audio/slow.mp3", Duration::from_millis(500)),
    );
    let speech = Arc::new(MockSpeech::default());
    let narrator = Arc::new(narrator(&player, &speech));

    let slow = {
        let narrator = narrator.clone();
        tokio::spawn(async move { narrator.narrate(NarrationRequest::new("Slow")).await })
    };
    while player.attempts().is_empty() {
        tokio::task::yield_now().await;
    }

    let fast = narrator.narrate(NarrationRequest::new("Fast")).await;
    assert!(matches!(fast, NarrationOutcome::Played { .. }));

    assert_eq!(slow.await.unwrap(), NarrationOutcome::Superseded);
    assert!(player.was_stopped("/Audio/slow.mp3"));
    assert!(!player.was_stopped("/Audio/fast.mp3"));
    assert_eq!(
        narrator.active(),
        Some(ActiveNarration::Audio {
            source: "/Audio/fast.mp3".to_string(),
            intent: AudioIntent::Task,
        })
    );
}

#[test]
fn test_suggested_slug_uses_configured_cap() {
    let player = Arc::new(MockPlayer::default());
    let speech = Arc::new(MockSpeech::default());
    let narrator = narrator(&player, &speech);
    assert_eq!(
        narrator.suggested_slug(Some("Be Gentle"), "Take a breath."),
        "be-gentle-take-a-breath"
    );
}
