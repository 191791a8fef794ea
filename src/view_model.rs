//! Glue between the snake models and the iced views.

use crate::app::Message;

/// Owns a model, turns view messages into model calls and reports back any
/// message the application itself has to act on.
pub trait ViewModel {
    fn update(&mut self, message: Message) -> Option<Message>;
}
