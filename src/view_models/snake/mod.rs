pub mod duel_view_model;
