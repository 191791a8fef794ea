//! Counts how often the human player turns in each direction.
use super::snake_game::Direction;

/// Per-direction usage counts of the human player. Written by the human input
/// handling, read by the AI. Lives for the whole session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectionTally {
    counts: [u64; Direction::VARIANTS.len()],
}

impl DirectionTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, direction: Direction) {
        self.counts[direction.index()] += 1;
    }

    #[must_use]
    pub fn get(&self, direction: Direction) -> u64 {
        self.counts[direction.index()]
    }

    #[must_use]
    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Counts in [`Direction::VARIANTS`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, u64)> + '_ {
        Direction::VARIANTS
            .iter()
            .map(move |d| (*d, self.counts[d.index()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read() {
        let mut tally = DirectionTally::new();
        assert_eq!(tally.max(), 0);
        tally.record(Direction::Left);
        tally.record(Direction::Left);
        tally.record(Direction::Up);
        assert_eq!(tally.get(Direction::Left), 2);
        assert_eq!(tally.get(Direction::Up), 1);
        assert_eq!(tally.get(Direction::Right), 0);
        assert_eq!(tally.max(), 2);
        assert_eq!(tally.total(), 3);
        let order: Vec<_> = tally.iter().collect();
        assert_eq!(
            order,
            vec![
                (Direction::Up, 1),
                (Direction::Down, 0),
                (Direction::Left, 2),
                (Direction::Right, 0),
            ]
        );
    }
}
