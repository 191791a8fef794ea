pub mod audio;
pub mod bots;
pub mod config;
pub mod direction_tally;
pub mod snake_bot;
pub mod snake_game;
pub mod snake_match;
