//! A human snake and a bot snake racing on separate boards.
use std::time::Instant;

use log::{debug, info};

use super::{
    bots::adaptive_bot::AdaptiveBot,
    config::GameConfig,
    direction_tally::DirectionTally,
    snake_bot::SnakeBot,
    snake_game::{Direction, Result, SnakeGame, StepOutcome},
};

/// Which board something happened on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Human,
    Ai,
}

/// Best scores seen this session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HighScores {
    pub human: u32,
    pub ai: u32,
}

impl HighScores {
    pub fn update(&mut self, human_score: u32, ai_score: u32) {
        self.human = self.human.max(human_score);
        self.ai = self.ai.max(ai_score);
    }
}

/// Everything shown on the end of match screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSummary {
    pub loser: Side,
    pub human_score: u32,
    pub human_level: u32,
    pub ai_score: u32,
    pub ai_level: u32,
    pub high_scores: HighScores,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPhase {
    Running,
    Paused { since: Instant },
    AwaitingRestart(MatchSummary),
}

/// Input the match understands, already decoded from raw key presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed.
    Quit,
    Direction(Direction),
    TogglePause,
    Restart,
    /// Quit chosen on the end of match screen.
    QuitConfirm,
}

/// Things the presentation layer may want to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchEvent {
    FoodEaten(Side),
    GameOver(Side),
    PauseToggled(bool),
    Restarted,
    QuitRequested,
}

/// Owns both games plus everything that outlives a single round: the human's
/// direction tally and the high scores.
#[derive(Debug)]
pub struct SnakeMatch<B: SnakeBot = AdaptiveBot> {
    human: SnakeGame,
    ai: SnakeGame,
    bot: B,
    tally: DirectionTally,
    high_scores: HighScores,
    phase: MatchPhase,
    last_move_human: Instant,
    last_move_ai: Instant,
}

impl SnakeMatch<AdaptiveBot> {
    /// Starts a match with both boards using `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`super::snake_game::SnakeError`] if the configuration is invalid.
    pub fn new(config: &GameConfig, now: Instant) -> Result<Self> {
        Ok(Self::from_games(
            SnakeGame::new(config.clone())?,
            SnakeGame::new(config.clone())?,
            AdaptiveBot::new(),
            now,
        ))
    }

    /// Reproducible version of [`SnakeMatch::new`].
    ///
    /// # Errors
    ///
    /// Returns a [`super::snake_game::SnakeError`] if the configuration is invalid.
    pub fn with_seed(config: &GameConfig, seed: u64, now: Instant) -> Result<Self> {
        Ok(Self::from_games(
            SnakeGame::with_seed(config.clone(), seed)?,
            SnakeGame::with_seed(config.clone(), seed.wrapping_add(1))?,
            AdaptiveBot::with_seed(seed.wrapping_add(2)),
            now,
        ))
    }
}

impl<B: SnakeBot> SnakeMatch<B> {
    #[must_use]
    pub fn from_games(human: SnakeGame, ai: SnakeGame, bot: B, now: Instant) -> Self {
        Self {
            human,
            ai,
            bot,
            tally: DirectionTally::new(),
            high_scores: HighScores::default(),
            phase: MatchPhase::Running,
            last_move_human: now,
            last_move_ai: now,
        }
    }

    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> Vec<MatchEvent> {
        match (event, self.phase) {
            (InputEvent::Quit, _) | (InputEvent::QuitConfirm, MatchPhase::AwaitingRestart(_)) => {
                info!("Quit requested");
                vec![MatchEvent::QuitRequested]
            }
            (InputEvent::Direction(direction), MatchPhase::Running) => {
                if self.human.change_direction(direction) {
                    self.tally.record(direction);
                }
                Vec::new()
            }
            (InputEvent::TogglePause, MatchPhase::Running) => {
                debug!("Pausing");
                self.phase = MatchPhase::Paused { since: now };
                vec![MatchEvent::PauseToggled(true)]
            }
            (InputEvent::TogglePause, MatchPhase::Paused { since }) => {
                // paused time must not count towards the next move
                let frozen = now.saturating_duration_since(since);
                debug!("Unpausing after {:?}", frozen);
                self.last_move_human += frozen;
                self.last_move_ai += frozen;
                self.phase = MatchPhase::Running;
                vec![MatchEvent::PauseToggled(false)]
            }
            (InputEvent::Restart, MatchPhase::AwaitingRestart(_)) => {
                self.restart(now);
                vec![MatchEvent::Restarted]
            }
            _ => Vec::new(),
        }
    }

    /// Moves every snake whose move interval has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        if self.phase != MatchPhase::Running {
            return events;
        }

        if Self::is_due(&self.human, self.last_move_human, now) {
            let outcome = self.human.step(now);
            self.last_move_human = now;
            if self.apply_outcome(Side::Human, outcome, &mut events) {
                return events;
            }
        }

        if Self::is_due(&self.ai, self.last_move_ai, now) {
            if let Some(direction) = self.bot.make_move(&self.ai, &self.tally) {
                self.ai.change_direction(direction);
            }
            let outcome = self.ai.step(now);
            self.last_move_ai = now;
            self.apply_outcome(Side::Ai, outcome, &mut events);
        }
        events
    }

    fn is_due(game: &SnakeGame, last_move: Instant, now: Instant) -> bool {
        !game.is_done() && now.saturating_duration_since(last_move) >= game.speed()
    }

    /// Returns true if the round ended.
    fn apply_outcome(
        &mut self,
        side: Side,
        outcome: StepOutcome,
        events: &mut Vec<MatchEvent>,
    ) -> bool {
        if outcome.is_terminated() {
            events.push(MatchEvent::GameOver(side));
            self.finish_round(side);
            return true;
        }
        if outcome == StepOutcome::Ate {
            events.push(MatchEvent::FoodEaten(side));
        }
        false
    }

    fn finish_round(&mut self, loser: Side) {
        self.high_scores
            .update(self.human.score(), self.ai.score());
        let summary = MatchSummary {
            loser,
            human_score: self.human.score(),
            human_level: self.human.level(),
            ai_score: self.ai.score(),
            ai_level: self.ai.level(),
            high_scores: self.high_scores,
        };
        info!(
            "Game over. {:?} lost. Player {} | AI {}",
            loser, summary.human_score, summary.ai_score
        );
        self.phase = MatchPhase::AwaitingRestart(summary);
    }

    fn restart(&mut self, now: Instant) {
        debug!("Restarting match");
        self.human.reset();
        self.ai.reset();
        self.last_move_human = now;
        self.last_move_ai = now;
        self.phase = MatchPhase::Running;
    }

    #[must_use]
    pub fn human(&self) -> &SnakeGame {
        &self.human
    }

    #[must_use]
    pub fn ai(&self) -> &SnakeGame {
        &self.ai
    }

    #[must_use]
    pub fn tally(&self) -> &DirectionTally {
        &self.tally
    }

    #[must_use]
    pub fn high_scores(&self) -> HighScores {
        self.high_scores
    }

    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        matches!(self.phase, MatchPhase::Paused { .. })
    }

    #[must_use]
    pub fn summary(&self) -> Option<MatchSummary> {
        match self.phase {
            MatchPhase::AwaitingRestart(summary) => Some(summary),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::snake::snake_game::Cell;

    /// Always answers the same thing.
    #[derive(Debug)]
    struct FixedBot(Option<Direction>);

    impl SnakeBot for FixedBot {
        fn make_move(&mut self, _game: &SnakeGame, _tally: &DirectionTally) -> Option<Direction> {
            self.0
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn game(body: Vec<Cell>, direction: Direction, food: Option<Cell>) -> SnakeGame {
        SnakeGame::from_parts(GameConfig::new(20, 20), body, direction, food).unwrap()
    }

    fn straight_match(now: Instant) -> SnakeMatch<FixedBot> {
        SnakeMatch::from_games(
            game(vec![(5, 5)], Direction::Right, None),
            game(vec![(10, 10)], Direction::Right, None),
            FixedBot(None),
            now,
        )
    }

    #[test]
    fn test_moves_only_after_speed_elapsed() {
        let t0 = Instant::now();
        let mut m = straight_match(t0);
        assert!(m.tick(t0 + ms(100)).is_empty());
        assert_eq!(m.human().head(), Some((5, 5)));
        assert_eq!(m.ai().head(), Some((10, 10)));

        m.tick(t0 + ms(300));
        assert_eq!(m.human().head(), Some((6, 5)));
        assert_eq!(m.ai().head(), Some((11, 10)));

        m.tick(t0 + ms(500));
        assert_eq!(m.human().head(), Some((6, 5)));
        m.tick(t0 + ms(600));
        assert_eq!(m.human().head(), Some((7, 5)));
    }

    #[test]
    fn test_timers_are_independent() {
        let t0 = Instant::now();
        let mut fast = GameConfig::new(20, 20);
        fast.initial_speed = ms(200);
        let ai = SnakeGame::from_parts(fast, vec![(10, 10)], Direction::Right, None).unwrap();
        let mut m = SnakeMatch::from_games(
            game(vec![(5, 5)], Direction::Right, None),
            ai,
            FixedBot(None),
            t0,
        );

        m.tick(t0 + ms(200));
        assert_eq!(m.human().head(), Some((5, 5)));
        assert_eq!(m.ai().head(), Some((11, 10)));

        m.tick(t0 + ms(300));
        assert_eq!(m.human().head(), Some((6, 5)));
        assert_eq!(m.ai().head(), Some((11, 10)));

        m.tick(t0 + ms(400));
        assert_eq!(m.human().head(), Some((6, 5)));
        assert_eq!(m.ai().head(), Some((12, 10)));
    }

    #[test]
    fn test_pause_freezes_timers() {
        let t0 = Instant::now();
        let mut m = straight_match(t0);
        assert_eq!(
            m.handle_input(InputEvent::TogglePause, t0 + ms(100)),
            vec![MatchEvent::PauseToggled(true)]
        );
        assert!(m.is_paused());
        assert!(m.tick(t0 + ms(800)).is_empty());
        assert_eq!(m.human().head(), Some((5, 5)));

        assert_eq!(
            m.handle_input(InputEvent::TogglePause, t0 + ms(1100)),
            vec![MatchEvent::PauseToggled(false)]
        );
        // 100ms before the pause + 100ms after it
        m.tick(t0 + ms(1200));
        assert_eq!(m.human().head(), Some((5, 5)));
        m.tick(t0 + ms(1300));
        assert_eq!(m.human().head(), Some((6, 5)));
        assert_eq!(m.ai().head(), Some((11, 10)));
    }

    #[test]
    fn test_tally_counts_accepted_turns_only() {
        let t0 = Instant::now();
        let mut m = straight_match(t0);
        m.handle_input(InputEvent::Direction(Direction::Left), t0);
        assert_eq!(m.tally().get(Direction::Left), 0);
        assert_eq!(m.human().direction(), Direction::Right);

        m.handle_input(InputEvent::Direction(Direction::Up), t0);
        assert_eq!(m.tally().get(Direction::Up), 1);
        assert_eq!(m.human().direction(), Direction::Up);

        m.handle_input(InputEvent::TogglePause, t0);
        m.handle_input(InputEvent::Direction(Direction::Left), t0);
        assert_eq!(m.tally().get(Direction::Left), 0);
        assert_eq!(m.human().direction(), Direction::Up);
    }

    #[test]
    fn test_bot_steers_before_step() {
        let t0 = Instant::now();
        let mut m = SnakeMatch::from_games(
            game(vec![(5, 5)], Direction::Right, None),
            game(vec![(10, 10)], Direction::Right, None),
            FixedBot(Some(Direction::Down)),
            t0,
        );
        m.tick(t0 + ms(300));
        assert_eq!(m.ai().direction(), Direction::Down);
        assert_eq!(m.ai().head(), Some((10, 11)));
    }

    #[test]
    fn test_game_over_then_restart() {
        let _ = env_logger::builder().is_test(true).try_init();
        let t0 = Instant::now();
        let mut m = SnakeMatch::from_games(
            game(vec![(1, 5)], Direction::Left, Some((0, 5))),
            game(vec![(10, 10)], Direction::Right, None),
            FixedBot(None),
            t0,
        );
        m.handle_input(InputEvent::Direction(Direction::Up), t0);
        m.handle_input(InputEvent::Direction(Direction::Left), t0);
        assert_eq!(m.tally().total(), 2);

        assert_eq!(m.tick(t0 + ms(300)), vec![MatchEvent::FoodEaten(Side::Human)]);
        assert_eq!(m.human().score(), 1);
        // hits the wall and shrinks back to a single cell
        assert!(m.tick(t0 + ms(600)).is_empty());
        assert_eq!(m.human().len(), 1);
        assert_eq!(m.ai().head(), Some((12, 10)));

        assert_eq!(
            m.tick(t0 + ms(900)),
            vec![MatchEvent::GameOver(Side::Human)]
        );
        // the ai does not move on the frame the round ends
        assert_eq!(m.ai().head(), Some((12, 10)));
        let summary = m.summary().unwrap();
        assert_eq!(summary.loser, Side::Human);
        assert_eq!(summary.human_score, 1);
        assert_eq!(summary.human_level, 1);
        assert_eq!(summary.ai_score, 0);
        assert_eq!(summary.high_scores, HighScores { human: 1, ai: 0 });

        // frozen until a decision is made
        assert!(m.tick(t0 + ms(2000)).is_empty());
        assert!(m
            .handle_input(InputEvent::Direction(Direction::Down), t0 + ms(2000))
            .is_empty());
        assert!(m.handle_input(InputEvent::TogglePause, t0 + ms(2000)).is_empty());

        assert_eq!(
            m.handle_input(InputEvent::Restart, t0 + ms(2000)),
            vec![MatchEvent::Restarted]
        );
        assert_eq!(m.phase(), MatchPhase::Running);
        assert_eq!(m.human().head(), Some((10, 10)));
        assert_eq!(m.human().score(), 0);
        assert_eq!(m.ai().head(), Some((10, 10)));
        assert_eq!(m.tally().total(), 2);
        assert_eq!(m.high_scores(), HighScores { human: 1, ai: 0 });

        // timers restart from the restart time
        assert!(m.tick(t0 + ms(2100)).is_empty());
        assert_eq!(m.human().head(), Some((10, 10)));
    }

    #[test]
    fn test_quit_handling() {
        let t0 = Instant::now();
        let mut m = straight_match(t0);
        assert!(m.handle_input(InputEvent::QuitConfirm, t0).is_empty());
        assert!(m.handle_input(InputEvent::Restart, t0).is_empty());
        assert_eq!(
            m.handle_input(InputEvent::Quit, t0),
            vec![MatchEvent::QuitRequested]
        );

        let mut m = SnakeMatch::from_games(
            game(vec![(0, 5)], Direction::Left, None),
            game(vec![(10, 10)], Direction::Right, None),
            FixedBot(None),
            t0,
        );
        m.tick(t0 + ms(300));
        assert_eq!(
            m.handle_input(InputEvent::QuitConfirm, t0 + ms(400)),
            vec![MatchEvent::QuitRequested]
        );
    }

    #[test]
    fn test_high_scores_keep_best() {
        let mut scores = HighScores::default();
        scores.update(4, 2);
        scores.update(1, 6);
        assert_eq!(scores, HighScores { human: 4, ai: 6 });
    }

    #[test]
    fn test_seeded_match_runs() {
        let t0 = Instant::now();
        let mut m = SnakeMatch::with_seed(&GameConfig::default(), 17, t0).unwrap();
        let mut now = t0;
        for _ in 0..500 {
            now += ms(50);
            let events = m.tick(now);
            if events
                .iter()
                .any(|e| matches!(e, MatchEvent::GameOver(_)))
            {
                assert!(m.summary().is_some());
                m.handle_input(InputEvent::Restart, now);
            }
            for game in [m.human(), m.ai()] {
                let food = game.food().unwrap();
                assert!(!game.contains(food));
            }
        }
        assert!(SnakeMatch::new(&GameConfig::new(1, 1), t0).is_err());
    }
}
