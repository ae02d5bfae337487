pub const DEFAULT_ROUNDS_PER_GAME: u64 = 15;
pub const ROUND_DURATION_SECS: u64 = 15;
pub const SESSION_ID_LENGTH: usize = 10;
