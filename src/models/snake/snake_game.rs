use std::{
    collections::{HashSet, VecDeque},
    fmt,
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use super::config::GameConfig;

/// Random food placements tried before falling back to scanning for free cells.
pub const MAX_FOOD_SPAWN_ATTEMPTS: usize = 100;

/// Grid coordinate as `(x, y)`.
pub type Cell = (usize, usize);

pub type Result<T> = std::result::Result<T, SnakeError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnakeError {
    InvalidBoardSize,
    InvalidSpeed,
    InvalidLevelUpScore,
    InvalidMinLength,
    InvalidSnake,
    InvalidFood,
}

impl fmt::Display for SnakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnakeError::InvalidBoardSize => write!(f, "board size is out of range"),
            SnakeError::InvalidSpeed => write!(f, "speed settings are invalid"),
            SnakeError::InvalidLevelUpScore => write!(f, "level up score must be positive"),
            SnakeError::InvalidMinLength => write!(f, "minimum snake length must be positive"),
            SnakeError::InvalidSnake => {
                write!(f, "snake must be non-empty, in bounds and not overlap itself")
            }
            SnakeError::InvalidFood => write!(f, "food must be in bounds and off the snake"),
        }
    }
}

impl std::error::Error for SnakeError {}

/// Direction a snake can travel in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const VARIANTS: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// `(dx, dy)` of a single step. `y` grows downwards.
    #[must_use]
    pub fn value(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    #[must_use]
    pub fn get_opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Position in [`Direction::VARIANTS`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// The cell one step away from `cell`, or `None` if it would leave a
    /// `width` x `height` board.
    #[must_use]
    pub fn offset(self, cell: Cell, width: usize, height: usize) -> Option<Cell> {
        let (dx, dy) = self.value();
        let x = cell.0.checked_add_signed(isize::from(dx))?;
        let y = cell.1.checked_add_signed(isize::from(dy))?;
        (x < width && y < height).then_some((x, y))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
            Direction::Left => write!(f, "LEFT"),
            Direction::Right => write!(f, "RIGHT"),
        }
    }
}

/// What happened during a single [`SnakeGame::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved one cell without eating.
    Moved,
    /// Moved onto the food and grew.
    Ate,
    /// Hit the wall and lost the tail segment instead of dying.
    Shrunk,
    Terminated,
}

impl StepOutcome {
    #[must_use]
    pub fn is_terminated(self) -> bool {
        matches!(self, StepOutcome::Terminated)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Blink {
    started: Instant,
    until: Instant,
}

/// Model of a single snake on its own board.
#[derive(Clone, Debug)]
pub struct SnakeGame {
    config: GameConfig,
    snake: VecDeque<Cell>,
    food: Option<Cell>,
    direction: Direction,
    score: u32,
    speed: Duration,
    blink: Option<Blink>,
    done: bool,
    rng: StdRng,
}

impl SnakeGame {
    /// Creates a new game in its starting state.
    ///
    /// # Errors
    ///
    /// Returns a [`SnakeError`] if the configuration is invalid.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Same as [`SnakeGame::new`] but food placement is reproducible.
    ///
    /// # Errors
    ///
    /// Returns a [`SnakeError`] if the configuration is invalid.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let mut game = Self {
            speed: config.initial_speed,
            config,
            snake: VecDeque::new(),
            food: None,
            direction: Direction::Right,
            score: 0,
            blink: None,
            done: false,
            rng,
        };
        game.reset();
        Ok(game)
    }

    /// Builds a game mid-round with the given body (head first), heading and food.
    ///
    /// # Errors
    ///
    /// Returns [`SnakeError::InvalidSnake`] if the body is empty, leaves the board or
    /// overlaps itself, [`SnakeError::InvalidFood`] if the food is off the board or on
    /// the body, or any configuration error.
    pub fn from_parts(
        config: GameConfig,
        body: Vec<Cell>,
        direction: Direction,
        food: Option<Cell>,
    ) -> Result<Self> {
        config.validate()?;
        let in_bounds = |c: &Cell| c.0 < config.width && c.1 < config.height;
        let unique: HashSet<&Cell> = body.iter().collect();
        if body.is_empty() || unique.len() != body.len() || !body.iter().all(in_bounds) {
            return Err(SnakeError::InvalidSnake);
        }
        if let Some(f) = food {
            if !in_bounds(&f) || unique.contains(&f) {
                return Err(SnakeError::InvalidFood);
            }
        }
        Ok(Self {
            speed: config.initial_speed,
            config,
            snake: body.into(),
            food,
            direction,
            score: 0,
            blink: None,
            done: false,
            rng: StdRng::from_entropy(),
        })
    }

    /// Puts the snake back in the middle of the board with a fresh round.
    pub fn reset(&mut self) {
        self.snake.clear();
        self.snake
            .push_front((self.config.width / 2, self.config.height / 2));
        self.direction = Direction::Right;
        self.score = 0;
        self.speed = self.config.initial_speed;
        self.blink = None;
        self.done = false;
        self.spawn_food();
    }

    /// Advances the snake one cell in its current direction.
    ///
    /// Hitting the wall costs a tail segment instead of the game unless the
    /// snake is already at minimum length.
    pub fn step(&mut self, now: Instant) -> StepOutcome {
        if self.done {
            debug!("Tried to step a finished game");
            return StepOutcome::Terminated;
        }
        let Some(head) = self.head() else {
            warn!("Stepped a snake with no body. Ending game");
            self.done = true;
            return StepOutcome::Terminated;
        };

        let Some(new_head) = self
            .direction
            .offset(head, self.config.width, self.config.height)
        else {
            if self.snake.len() > self.config.min_snake_length {
                self.snake.pop_back();
                self.blink = Some(Blink {
                    started: now,
                    until: now + self.config.blink_duration,
                });
                debug!("Snake hit the wall. Shrunk to {}", self.snake.len());
                return StepOutcome::Shrunk;
            }
            info!("Snake hit the wall at minimum length. Game over");
            self.done = true;
            return StepOutcome::Terminated;
        };

        if self.contains(new_head) {
            info!("Snake ran into itself at {:?}. Game over", new_head);
            self.done = true;
            return StepOutcome::Terminated;
        }

        self.snake.push_front(new_head);
        if self.food == Some(new_head) {
            self.score += 1;
            self.spawn_food();
            self.check_level_up();
            StepOutcome::Ate
        } else {
            self.snake.pop_back();
            StepOutcome::Moved
        }
    }

    /// Turns the snake unless `requested` would reverse it onto itself.
    /// Returns whether the new direction was taken.
    pub fn change_direction(&mut self, requested: Direction) -> bool {
        if self.done || requested == self.direction.get_opposite() {
            return false;
        }
        self.direction = requested;
        true
    }

    fn check_level_up(&mut self) {
        if self.score > 0 && self.score % self.config.level_up_score == 0 {
            self.speed = self
                .speed
                .saturating_sub(self.config.speed_increment)
                .max(self.config.min_speed);
            debug!(
                "Level {} reached. Moving every {:?}",
                self.level(),
                self.speed
            );
        }
    }

    fn spawn_food(&mut self) {
        let (width, height) = (self.config.width, self.config.height);
        for _ in 0..MAX_FOOD_SPAWN_ATTEMPTS {
            let cell = (
                self.rng.gen_range(1..width - 1),
                self.rng.gen_range(1..height - 1),
            );
            if !self.contains(cell) {
                self.food = Some(cell);
                return;
            }
        }

        debug!("Random food placement failed {MAX_FOOD_SPAWN_ATTEMPTS} times. Scanning free cells");
        let mut avaliable = self.free_cells(1..height - 1, 1..width - 1);
        if avaliable.is_empty() {
            warn!("No free interior cells left. Placing food anywhere free");
            avaliable = self.free_cells(0..height, 0..width);
        }
        self.food = avaliable.choose(&mut self.rng).copied();
        if self.food.is_none() {
            warn!("No where left to place food");
        }
    }

    fn free_cells(
        &self,
        rows: std::ops::Range<usize>,
        cols: std::ops::Range<usize>,
    ) -> Vec<Cell> {
        rows.flat_map(|y| cols.clone().map(move |x| (x, y)))
            .filter(|cell| !self.contains(*cell))
            .collect()
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }

    /// Whether the shrink blink is still running at `now`.
    #[must_use]
    pub fn is_blinking(&self, now: Instant) -> bool {
        self.blink.is_some_and(|b| now < b.until)
    }

    /// Whether the body should be drawn at `now`. Alternates every blink
    /// interval while blinking, starting hidden.
    #[must_use]
    pub fn is_visible(&self, now: Instant) -> bool {
        match self.blink {
            Some(b) if now < b.until => {
                let interval = self.config.blink_interval.as_millis().max(1);
                (now.duration_since(b.started).as_millis() / interval) % 2 == 1
            }
            _ => true,
        }
    }

    #[must_use]
    pub fn head(&self) -> Option<Cell> {
        self.snake.front().copied()
    }

    #[must_use]
    pub fn snake(&self) -> &VecDeque<Cell> {
        &self.snake
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snake.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    #[must_use]
    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.config.level_for(self.score)
    }

    /// Time between moves.
    #[must_use]
    pub fn speed(&self) -> Duration {
        self.speed
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.config.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.config.height
    }
}
