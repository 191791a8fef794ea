use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::models::snake::{
    direction_tally::DirectionTally,
    snake_bot::SnakeBot,
    snake_game::{Direction, SnakeGame},
};

/// Bot that wanders randomly but avoids walls and its own body, preferring
/// the directions the opponent uses least.
#[derive(Debug)]
pub struct AdaptiveBot<R: Rng = StdRng> {
    rng: R,
}

impl AdaptiveBot<StdRng> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for AdaptiveBot<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> AdaptiveBot<R> {
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Directions that keep the head on the board and off the body, in
    /// [`Direction::VARIANTS`] order.
    #[must_use]
    pub fn safe_directions(game: &SnakeGame) -> Vec<Direction> {
        let Some(head) = game.head() else {
            return Vec::new();
        };
        Direction::VARIANTS
            .iter()
            .copied()
            .filter(|d| {
                d.offset(head, game.width(), game.height())
                    .is_some_and(|next| !game.contains(next))
            })
            .collect()
    }

    /// Weight of a direction. The less the opponent uses it the heavier it is.
    #[must_use]
    pub fn weight(tally: &DirectionTally, direction: Direction) -> f64 {
        // counts are far below 2^52 so the conversion is exact
        #[allow(clippy::cast_precision_loss)]
        let count = tally.get(direction) as f64;
        1.0 / (count + 1.0)
    }

    fn pick_weighted(&mut self, candidates: &[Direction], tally: &DirectionTally) -> Direction {
        let total: f64 = candidates.iter().map(|d| Self::weight(tally, *d)).sum();
        let draw = self.rng.gen_range(0.0..total);
        Self::select(candidates, tally, draw)
    }

    /// Walks the cumulative weights of `candidates` until they reach `draw`.
    /// `candidates` must not be empty.
    fn select(candidates: &[Direction], tally: &DirectionTally, draw: f64) -> Direction {
        let mut upto = 0.0;
        for direction in candidates {
            upto += Self::weight(tally, *direction);
            if upto >= draw {
                return *direction;
            }
        }
        // rounding can leave the sum just under the draw
        candidates[candidates.len() - 1]
    }
}

impl<R: Rng> SnakeBot for AdaptiveBot<R> {
    fn make_move(&mut self, game: &SnakeGame, tally: &DirectionTally) -> Option<Direction> {
        if game.is_done() {
            return None;
        }
        let safe = Self::safe_directions(game);
        if safe.is_empty() {
            debug!("Bot has no safe direction. Keeping {}", game.direction());
            return None;
        }
        Some(self.pick_weighted(&safe, tally))
    }
}
