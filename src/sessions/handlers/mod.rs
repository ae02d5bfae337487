pub mod player_actions;
pub mod session;
pub mod ws;
