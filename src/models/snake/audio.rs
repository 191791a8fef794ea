//! Optional sound effects. The game plays the same with or without them.
use std::fmt::Debug;

use log::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundEffect {
    Eat,
    GameOver,
    Pause,
}

pub trait AudioSink: Debug {
    fn play(&mut self, effect: SoundEffect);
}

/// Sink used when no sound output is available. Warns once, then ignores everything.
#[derive(Debug, Default)]
pub struct SilentAudio {
    warned: bool,
}

impl SilentAudio {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_warned(&self) -> bool {
        self.warned
    }
}

impl AudioSink for SilentAudio {
    fn play(&mut self, effect: SoundEffect) {
        if !self.warned {
            warn!("Sound not available. Continuing without sound");
            self.warned = true;
        }
        debug!("Skipping sound effect {:?}", effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_audio_warns_once() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut audio = SilentAudio::new();
        assert!(!audio.has_warned());
        audio.play(SoundEffect::Eat);
        assert!(audio.has_warned());
        audio.play(SoundEffect::GameOver);
        audio.play(SoundEffect::Pause);
        assert!(audio.has_warned());
    }
}
