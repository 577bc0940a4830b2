use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use shared::protocol::ServerEvent;

use crate::{AudioPlayer, LiveHook};

/// Feedback clips shipped with the app shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundClip {
    Correct,
    Incorrect,
}

impl SoundClip {
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundClip::Correct => "/audios/correct.mp3",
            SoundClip::Incorrect => "/audios/incorrect.mp3",
        }
    }

    fn for_answer(is_correct: bool) -> Self {
        if is_correct {
            SoundClip::Correct
        } else {
            SoundClip::Incorrect
        }
    }
}

/// Plays answer feedback when the server reports an option selection.
pub struct SoundEffectHook {
    audio: Arc<dyn AudioPlayer>,
}

impl SoundEffectHook {
    pub fn new(audio: Arc<dyn AudioPlayer>) -> Self {
        Self { audio }
    }
}

#[async_trait]
impl LiveHook for SoundEffectHook {
    async fn on_server_event(&self, event: &ServerEvent) -> Result<()> {
        match event {
            ServerEvent::OptionSelected { is_correct } => {
                self.audio.play(SoundClip::for_answer(*is_correct));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/sound_tests.rs"]
mod tests;
