pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const MAX_POINTS: u64 = 1000;
pub const FULL_POINTS_DISTANCE_KM: f64 = 5.0;
pub const ZERO_POINTS_DISTANCE_KM: f64 = 100.0;
pub const REVEAL_ZOOM: u8 = 8;
