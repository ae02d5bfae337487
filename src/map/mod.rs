use consts::EARTH_RADIUS_KM;
use models::LatLng;
use std::fmt;
use std::sync::Arc;

pub mod catalog;
pub mod consts;
pub mod display;
pub mod models;
pub mod scoring;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceOracleUnavailable;

impl fmt::Display for DistanceOracleUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("distance oracle is unavailable")
    }
}

impl std::error::Error for DistanceOracleUnavailable {}

pub trait DistanceOracle: Send + Sync {
    fn distance_km(&self, from: LatLng, to: LatLng) -> Result<f64, DistanceOracleUnavailable>;
}

pub type SharedOracle = Arc<dyn DistanceOracle>;

#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceOracle for Haversine {
    fn distance_km(&self, from: LatLng, to: LatLng) -> Result<f64, DistanceOracleUnavailable> {
        let phi_1 = from.lat.to_radians();
        let phi_2 = to.lat.to_radians();
        let delta_phi = (to.lat - from.lat).to_radians();
        let delta_lambda = (to.lng - from.lng).to_radians();
        let a = (delta_phi / 2.0).sin().powi(2)
            + phi_1.cos() * phi_2.cos() * (delta_lambda / 2.0).sin().powi(2);
        let c = 2.0 * (a.sqrt().atan2((1.0 - a).sqrt()));
        Ok(EARTH_RADIUS_KM * c)
    }
}
