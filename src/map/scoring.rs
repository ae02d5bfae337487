use crate::map::consts::{FULL_POINTS_DISTANCE_KM, MAX_POINTS, ZERO_POINTS_DISTANCE_KM};

/// Points earned by a guess `distance_km` away from the target.
///
/// Flat `MAX_POINTS` up to 5 km, nothing from 100 km on, and a linear
/// falloff in between, rounded down.
pub fn points_for_distance(distance_km: f64) -> u64 {
    if distance_km.is_nan() {
        return 0;
    }
    if distance_km <= FULL_POINTS_DISTANCE_KM {
        return MAX_POINTS;
    }
    if distance_km >= ZERO_POINTS_DISTANCE_KM {
        return 0;
    }
    // Multiply before dividing so that e.g. 52.5 km lands exactly on 500.
    let penalty = (distance_km - FULL_POINTS_DISTANCE_KM) * MAX_POINTS as f64
        / (ZERO_POINTS_DISTANCE_KM - FULL_POINTS_DISTANCE_KM);
    (MAX_POINTS as f64 - penalty).floor().max(0.0) as u64
}
