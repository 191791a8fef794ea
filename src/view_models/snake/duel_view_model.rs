use std::time::Instant;

use iced::keyboard::{key::Named, Key};
use log::{debug, warn};

use crate::{
    app::Message,
    models::snake::{
        audio::{AudioSink, SilentAudio, SoundEffect},
        config::GameConfig,
        snake_game::{Direction, SnakeError},
        snake_match::{InputEvent, MatchEvent, SnakeMatch},
    },
    view_model::ViewModel,
    views::snake::duel_screen::DuelMessage,
};

/// Time between frames (60 per second). Snakes move on their own slower timers.
pub const FRAME_MILLIS: u64 = 1000 / 60;

#[derive(Debug)]
pub struct DuelViewModel {
    snake_match: SnakeMatch,
    audio: Box<dyn AudioSink>,
}

impl DuelViewModel {
    /// Starts a new match. Sound is off until [`DuelViewModel::with_audio`] is used.
    ///
    /// # Errors
    ///
    /// Returns a [`SnakeError`] if `config` cannot be played.
    pub fn new(config: &GameConfig) -> Result<Self, SnakeError> {
        debug!("New DuelViewModel config: {:#?}", config);
        Ok(Self {
            snake_match: SnakeMatch::new(config, Instant::now())?,
            audio: Box::new(SilentAudio::new()),
        })
    }

    #[must_use]
    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = audio;
        self
    }

    /// Translates a key press into match input. Unknown keys are dropped.
    #[must_use]
    pub fn map_key(key: &Key) -> Option<InputEvent> {
        match key {
            Key::Named(code) => match code {
                Named::ArrowUp => Some(InputEvent::Direction(Direction::Up)),
                Named::ArrowDown => Some(InputEvent::Direction(Direction::Down)),
                Named::ArrowLeft => Some(InputEvent::Direction(Direction::Left)),
                Named::ArrowRight => Some(InputEvent::Direction(Direction::Right)),
                _ => None,
            },
            Key::Character(c) => match c.as_str() {
                "p" | "P" => Some(InputEvent::TogglePause),
                "r" | "R" => Some(InputEvent::Restart),
                "q" | "Q" => Some(InputEvent::QuitConfirm),
                _ => None,
            },
            Key::Unidentified => None,
        }
    }

    #[must_use]
    pub fn sound_for(event: MatchEvent) -> Option<SoundEffect> {
        match event {
            MatchEvent::FoodEaten(_) => Some(SoundEffect::Eat),
            MatchEvent::GameOver(_) => Some(SoundEffect::GameOver),
            MatchEvent::PauseToggled(_) => Some(SoundEffect::Pause),
            MatchEvent::Restarted | MatchEvent::QuitRequested => None,
        }
    }

    fn dispatch(&mut self, events: Vec<MatchEvent>) -> Option<Message> {
        let mut quit = false;
        for event in events {
            if let Some(effect) = Self::sound_for(event) {
                self.audio.play(effect);
            }
            quit |= event == MatchEvent::QuitRequested;
        }
        quit.then_some(Message::Quit)
    }

    #[must_use]
    pub fn get_match(&self) -> &SnakeMatch {
        &self.snake_match
    }

    #[must_use]
    pub fn get_time_between_frames(&self) -> u64 {
        FRAME_MILLIS
    }
}

impl ViewModel for DuelViewModel {
    fn update(&mut self, message: Message) -> Option<Message> {
        if let Message::Duel(duel_message) = message {
            match duel_message {
                DuelMessage::Key(key) => {
                    let event = Self::map_key(&key)?;
                    let events = self.snake_match.handle_input(event, Instant::now());
                    self.dispatch(events)
                }
                DuelMessage::Timer(now) => {
                    let events = self.snake_match.tick(now);
                    self.dispatch(events)
                }
                DuelMessage::WindowClosed => {
                    let events = self.snake_match.handle_input(InputEvent::Quit, Instant::now());
                    self.dispatch(events)
                }
            }
        } else {
            warn!("Non-duel message sent to DuelViewModel: {:#?}", message);
            None
        }
    }
}
