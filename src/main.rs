use log::{debug, error};
use snake_duel::app::State;

fn main() {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "snake_duel=debug");
    }
    env_logger::init();
    debug!("Debug on");
    let result = iced::application(
        "Snake Game: Player vs AI Competition",
        State::update,
        State::view,
    )
    .window_size(iced::Size::new(1600.0, 1000.0))
    .subscription(State::subscription)
    .run();
    if let Err(e) = result {
        error!("Snake duel exited with an error: {e}");
        std::process::exit(1);
    }
}
