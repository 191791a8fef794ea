use iced::{
    widget::{container, text},
    Element, Length, Subscription, Task,
};
use log::{debug, error, info};

use crate::{
    models::snake::{config::GameConfig, snake_game::SnakeError},
    view::View,
    views::snake::duel_screen::{DuelMessage, DuelScreen},
};

pub struct State {
    screen: Screen,
}

#[derive(Debug)]
enum Screen {
    Duel(DuelScreen),
    /// The match could not be set up. Only shows the reason.
    Failed(SnakeError),
}

impl Screen {
    fn new_duel(config: &GameConfig) -> Self {
        match DuelScreen::new(config) {
            Ok(screen) => Screen::Duel(screen),
            Err(e) => {
                error!("Could not start the snake duel: {e}");
                Screen::Failed(e)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub enum Message {
    Duel(DuelMessage),
    Quit,
}

impl View for Screen {
    fn update(&mut self, message: Message) -> Option<Message> {
        match self {
            Screen::Duel(screen) => screen.update(message),
            Screen::Failed(_) => None,
        }
    }

    fn view(&self) -> Element<Message> {
        match self {
            Screen::Duel(screen) => screen.view(),
            Screen::Failed(e) => container(text(format!("Could not start the game: {e}")).size(28))
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(iced::alignment::Horizontal::Center)
                .align_y(iced::alignment::Vertical::Center)
                .into(),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        match self {
            Screen::Duel(screen) => screen.subscription(),
            Screen::Failed(_) => Subscription::none(),
        }
    }
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Screen::new_duel(&GameConfig::default()),
        }
    }

    pub fn update(state: &mut State, message: Message) -> Task<Message> {
        if let Some(next) = state.screen.update(message) {
            match next {
                Message::Quit => {
                    info!("Closing the game");
                    return iced::exit();
                }
                Message::Duel(m) => debug!("Unhandled duel message: {:#?}", m),
            }
        }
        Task::none()
    }

    #[must_use]
    pub fn view(state: &State) -> Element<Message> {
        state.screen.view()
    }

    #[must_use]
    pub fn subscription(state: &State) -> Subscription<Message> {
        state.screen.subscription()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
