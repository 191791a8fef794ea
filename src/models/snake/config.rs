//! Tuning knobs for a single [`crate::models::snake::snake_game::SnakeGame`].
use std::time::Duration;

use super::snake_game::{Result, SnakeError};

/// Size of a block in pixels. Only used to derive the default board.
pub const BLOCK_SIZE: usize = 20;
/// Default board width in cells (700 pixel play area).
pub const DEFAULT_BOARD_WIDTH: usize = 700 / BLOCK_SIZE;
/// Default board height in cells (600 pixel play area).
pub const DEFAULT_BOARD_HEIGHT: usize = 600 / BLOCK_SIZE;
/// Smallest board allowed. Three cells leaves a non-empty interior for food.
pub const MIN_BOARD_SIZE: usize = 3;
/// Largest board allowed.
pub const MAX_BOARD_SIZE: usize = 100;

/// Time between moves at the start of a round.
pub const INITIAL_SPEED_MILLIS: u64 = 300;
/// Amount the move interval shrinks on every level up.
pub const SPEED_INCREMENT_MILLIS: u64 = 50;
/// Fastest the snake is ever allowed to move.
pub const MIN_SPEED_MILLIS: u64 = 100;
/// Speed up every this many points.
pub const LEVEL_UP_SCORE: u32 = 3;
/// How long the snake blinks after losing a segment.
pub const BLINK_DURATION_MILLIS: u64 = 500;
/// Visibility toggles this often while blinking.
pub const BLINK_INTERVAL_MILLIS: u64 = 100;
/// Minimum length before hitting a wall kills the snake.
pub const MIN_SNAKE_LENGTH: usize = 1;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub initial_speed: Duration,
    pub speed_increment: Duration,
    pub min_speed: Duration,
    pub level_up_score: u32,
    pub blink_duration: Duration,
    pub blink_interval: Duration,
    pub min_snake_length: usize,
}

impl GameConfig {
    /// Default tuning on a `width` x `height` board.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Checks that a game can actually be played with this configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`SnakeError`] describing the invalid field.
    pub fn validate(&self) -> Result<()> {
        let board = MIN_BOARD_SIZE..=MAX_BOARD_SIZE;
        if !board.contains(&self.width) || !board.contains(&self.height) {
            return Err(SnakeError::InvalidBoardSize);
        }
        if self.min_speed.is_zero() || self.initial_speed < self.min_speed {
            return Err(SnakeError::InvalidSpeed);
        }
        if self.level_up_score == 0 {
            return Err(SnakeError::InvalidLevelUpScore);
        }
        if self.min_snake_length == 0 {
            return Err(SnakeError::InvalidMinLength);
        }
        Ok(())
    }

    /// Display level for a score. Not part of the simulation state.
    #[must_use]
    pub fn level_for(&self, score: u32) -> u32 {
        score / self.level_up_score.max(1) + 1
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            initial_speed: Duration::from_millis(INITIAL_SPEED_MILLIS),
            speed_increment: Duration::from_millis(SPEED_INCREMENT_MILLIS),
            min_speed: Duration::from_millis(MIN_SPEED_MILLIS),
            level_up_score: LEVEL_UP_SCORE,
            blink_duration: Duration::from_millis(BLINK_DURATION_MILLIS),
            blink_interval: Duration::from_millis(BLINK_INTERVAL_MILLIS),
            min_snake_length: MIN_SNAKE_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.width, 35);
        assert_eq!(config.height, 30);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_board_size_limits() {
        assert_eq!(
            GameConfig::new(2, 10).validate(),
            Err(SnakeError::InvalidBoardSize)
        );
        assert_eq!(
            GameConfig::new(10, MAX_BOARD_SIZE + 1).validate(),
            Err(SnakeError::InvalidBoardSize)
        );
        assert_eq!(GameConfig::new(3, 3).validate(), Ok(()));
    }

    #[test]
    fn test_invalid_tuning() {
        let mut config = GameConfig::default();
        config.min_speed = Duration::ZERO;
        assert_eq!(config.validate(), Err(SnakeError::InvalidSpeed));

        let mut config = GameConfig::default();
        config.initial_speed = Duration::from_millis(50);
        assert_eq!(config.validate(), Err(SnakeError::InvalidSpeed));

        let mut config = GameConfig::default();
        config.level_up_score = 0;
        assert_eq!(config.validate(), Err(SnakeError::InvalidLevelUpScore));

        let mut config = GameConfig::default();
        config.min_snake_length = 0;
        assert_eq!(config.validate(), Err(SnakeError::InvalidMinLength));
    }

    #[test]
    fn test_level_for_score() {
        let config = GameConfig::default();
        assert_eq!(config.level_for(0), 1);
        assert_eq!(config.level_for(2), 1);
        assert_eq!(config.level_for(3), 2);
        assert_eq!(config.level_for(7), 3);
    }
}
