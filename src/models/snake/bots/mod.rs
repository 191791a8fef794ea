pub mod adaptive_bot;
