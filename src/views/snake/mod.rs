pub mod duel_screen;
