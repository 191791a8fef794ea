use super::{
    direction_tally::DirectionTally,
    snake_game::{Direction, SnakeGame},
};

/// Policy that steers a computer controlled [`SnakeGame`].
pub trait SnakeBot {
    /// Picks the direction for the next step of `game`, or `None` to keep going
    /// the current way. `tally` holds the opponent's move history.
    fn make_move(&mut self, game: &SnakeGame, tally: &DirectionTally) -> Option<Direction>;
}
