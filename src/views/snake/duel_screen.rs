use std::{
    collections::HashSet,
    time::{Duration, Instant},
};

use iced::{
    alignment::{Horizontal, Vertical},
    keyboard::{self, Key},
    time,
    widget::{column, container, row, text, Column, Row},
    window,
    Border, Color, Element, Length, Subscription,
};

use crate::{
    app::Message,
    models::snake::{
        config::{BLOCK_SIZE, GameConfig},
        direction_tally::DirectionTally,
        snake_game::{Direction, SnakeError, SnakeGame},
        snake_match::MatchSummary,
    },
    view::View,
    view_model::ViewModel,
    view_models::snake::duel_view_model::DuelViewModel,
};

#[allow(clippy::cast_precision_loss)]
const CELL_SIZE: f32 = BLOCK_SIZE as f32;
const GRAPH_HEIGHT: f32 = 160.0;
const BAR_WIDTH: f32 = 200.0;

const WHITE: Color = Color::WHITE;
const BLACK: Color = Color {
    r: 18.0 / 255.0,
    g: 18.0 / 255.0,
    b: 18.0 / 255.0,
    a: 1.0,
};
const GREEN: Color = Color {
    r: 0.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};
const DARK_GREEN: Color = Color {
    r: 0.0,
    g: 155.0 / 255.0,
    b: 0.0,
    a: 1.0,
};
const RED: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};
const YELLOW: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};
const GRAY: Color = Color {
    r: 40.0 / 255.0,
    g: 40.0 / 255.0,
    b: 40.0 / 255.0,
    a: 1.0,
};
const BLUE: Color = Color {
    r: 0.0,
    g: 102.0 / 255.0,
    b: 204.0 / 255.0,
    a: 1.0,
};
const ORANGE: Color = Color {
    r: 1.0,
    g: 165.0 / 255.0,
    b: 0.0,
    a: 1.0,
};

#[derive(Clone, Debug)]
pub enum DuelMessage {
    Key(Key),
    Timer(Instant),
    WindowClosed,
}

#[derive(Debug)]
pub struct DuelScreen {
    view_model: DuelViewModel,
}

impl DuelScreen {
    /// # Errors
    ///
    /// Returns a [`SnakeError`] if `config` cannot be played.
    pub fn new(config: &GameConfig) -> Result<Self, SnakeError> {
        Ok(Self {
            view_model: DuelViewModel::new(config)?,
        })
    }

    fn make_cell<'a>(color: Color) -> Element<'a, Message> {
        container(text(" ").color(color)) // Empty text to preserve size
            .width(CELL_SIZE)
            .height(CELL_SIZE)
            .style(move |_: &_| container::Style {
                border: Border {
                    color: GRAY,
                    width: 1.0,
                    ..Default::default()
                },
                background: Some(color.into()),
                ..container::Style::default()
            })
            .into()
    }

    fn board<'a>(game: &SnakeGame, title: &'a str, title_color: Color) -> Element<'a, Message> {
        let now = Instant::now();
        let visible = game.is_visible(now);
        let head = game.head();
        let body: HashSet<_> = game.snake().iter().skip(1).copied().collect();

        let mut grid_view = Column::new();
        for y in 0..game.height() {
            let mut grid_row = Row::new();
            for x in 0..game.width() {
                let cell = (x, y);
                let color = if visible && head == Some(cell) {
                    DARK_GREEN
                } else if visible && body.contains(&cell) {
                    GREEN
                } else if game.food() == Some(cell) {
                    RED
                } else {
                    BLACK
                };
                grid_row = grid_row.push(Self::make_cell(color));
            }
            grid_view = grid_view.push(grid_row);
        }

        let outlined = container(grid_view).style(|_: &_| container::Style {
            border: Border {
                color: WHITE,
                width: 2.0,
                ..Default::default()
            },
            ..container::Style::default()
        });

        column![
            text(title).size(36).color(title_color),
            outlined,
            text(format!("Score: {}", game.score())).size(28).color(WHITE),
            text(format!("Level: {}", game.level())).size(28).color(WHITE),
        ]
        .spacing(10)
        .align_x(Horizontal::Center)
        .into()
    }

    fn bar_color(direction: Direction) -> Color {
        match direction {
            Direction::Up => BLUE,
            Direction::Down => RED,
            Direction::Left => GREEN,
            Direction::Right => YELLOW,
        }
    }

    /// Bar height for `count`, scaled so the largest count fills the graph.
    #[must_use]
    pub fn bar_height(count: u64, max: u64) -> f32 {
        if max == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = count as f32 / max as f32;
        ratio * GRAPH_HEIGHT
    }

    fn tally_graph<'a>(tally: &DirectionTally) -> Element<'a, Message> {
        let max = tally.max();
        let mut bars = Row::new().spacing(40).align_y(Vertical::Bottom);
        for (direction, count) in tally.iter() {
            let color = Self::bar_color(direction);
            let bar = container(text(""))
                .width(BAR_WIDTH)
                .height(Self::bar_height(count, max))
                .style(move |_: &_| container::Style {
                    background: Some(color.into()),
                    ..container::Style::default()
                });
            bars = bars.push(
                column![
                    text(count.to_string()).size(28).color(WHITE),
                    bar,
                    text(direction.to_string()).size(28).color(WHITE),
                ]
                .spacing(5)
                .align_x(Horizontal::Center),
            );
        }

        column![
            text("AI Learning from Player's Moves").size(36).color(ORANGE),
            container(bars)
                .height(GRAPH_HEIGHT + 80.0)
                .padding(20)
                .align_y(Vertical::Bottom)
                .style(|_: &_| container::Style {
                    border: Border {
                        color: WHITE,
                        width: 2.0,
                        ..Default::default()
                    },
                    ..container::Style::default()
                }),
        ]
        .spacing(10)
        .align_x(Horizontal::Center)
        .into()
    }

    fn summary_view<'a>(summary: &MatchSummary) -> Element<'a, Message> {
        column![
            text("Game Over").size(72).color(YELLOW),
            row![
                text(format!(
                    "Player Score: {} | Level: {}",
                    summary.human_score, summary.human_level
                ))
                .size(36)
                .color(WHITE),
                text(format!(
                    "AI Score: {} | Level: {}",
                    summary.ai_score, summary.ai_level
                ))
                .size(36)
                .color(WHITE),
            ]
            .spacing(200),
            text(format!(
                "High Scores - Player: {} | AI: {}",
                summary.high_scores.human, summary.high_scores.ai
            ))
            .size(36)
            .color(ORANGE),
            text("Press R to Restart or Q to Quit").size(28).color(WHITE),
        ]
        .spacing(40)
        .align_x(Horizontal::Center)
        .into()
    }
}

impl View for DuelScreen {
    fn update(&mut self, message: Message) -> Option<Message> {
        self.view_model.update(message)
    }

    fn view(&self) -> Element<Message> {
        let snake_match = self.view_model.get_match();
        let content: Element<Message> = if let Some(summary) = snake_match.summary() {
            Self::summary_view(&summary)
        } else {
            let mut layout = Column::new().spacing(20).align_x(Horizontal::Center);
            if snake_match.is_paused() {
                layout = layout.push(text("Paused").size(72).color(YELLOW));
            }
            layout
                .push(
                    row![
                        Self::board(snake_match.human(), "Player", BLUE),
                        Self::board(snake_match.ai(), "AI", RED),
                    ]
                    .spacing(100),
                )
                .push(Self::tally_graph(snake_match.tally()))
                .into()
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center)
            .style(|_: &_| container::Style {
                background: Some(BLACK.into()),
                ..container::Style::default()
            })
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let timer = time::every(Duration::from_millis(
            self.view_model.get_time_between_frames(),
        ))
        .map(DuelMessage::Timer)
        .map(Message::Duel);
        let keyboard =
            keyboard::on_key_press(|key, _| Some(Message::Duel(DuelMessage::Key(key))));
        let closed = window::close_events().map(|_| Message::Duel(DuelMessage::WindowClosed));
        Subscription::batch(vec![timer, keyboard, closed])
    }
}
