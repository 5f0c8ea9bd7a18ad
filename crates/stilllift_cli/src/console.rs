//! Terminal stand-in for a speech engine: utterances are printed.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use stilllift_voice::{SpeechError, SpeechSynthesizer, Utterance, Voice};

#[derive(Default)]
pub struct ConsoleSpeech {
    speaking: AtomicBool,
}

impl SpeechSynthesizer for ConsoleSpeech {
    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("Console", "en-US")]
    }

    fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        self.speaking.store(true, Ordering::SeqCst);
        let mut out = io::stdout().lock();
        writeln!(out, "🔊 {}", utterance.text).map_err(|e| SpeechError::Engine(e.to_string()))?;
        tracing::debug!(
            "Spoke {} at rate {} pitch {} volume {}",
            utterance.id,
            utterance.rate,
            utterance.pitch,
            utterance.volume
        );
        self.speaking.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn cancel(&self) {
        if self.speaking.swap(false, Ordering::SeqCst) {
            tracing::debug!("Console speech cancelled");
        }
    }
}
