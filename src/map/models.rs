use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

/// Regions a session can be restricted to. Catalog rows are tagged with the
/// short names (`WA-S`, `SA`, ...); `AllRegions` disables filtering.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[default]
    #[serde(rename = "All regions")]
    AllRegions,
    #[serde(rename = "WA-S")]
    WaSouth,
    #[serde(rename = "SA")]
    SouthAustralia,
    #[serde(rename = "VIC")]
    Victoria,
    #[serde(rename = "TAS")]
    Tasmania,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllRegions => "All regions",
            Self::WaSouth => "WA-S",
            Self::SouthAustralia => "SA",
            Self::Victoria => "VIC",
            Self::Tasmania => "TAS",
        }
    }

    pub fn default_view(&self) -> MapView {
        let (lat, lng, zoom) = match self {
            Self::AllRegions => (-25.2744, 133.7751, 4),
            Self::WaSouth => (-30.0, 120.5, 5),
            Self::SouthAustralia => (-31.0, 135.5, 5),
            Self::Victoria => (-37.0, 144.0, 6),
            Self::Tasmania => (-42.0, 146.0, 7),
        };
        MapView {
            center: LatLng { lat, lng },
            zoom,
        }
    }

    pub fn includes(&self, area: &str) -> bool {
        match self {
            Self::AllRegions => true,
            region => region.as_str() == area,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegion(pub String);

impl fmt::Display for UnknownRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown region `{}`", self.0)
    }
}

impl std::error::Error for UnknownRegion {}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "All regions" => Ok(Self::AllRegions),
            "WA-S" => Ok(Self::WaSouth),
            "SA" => Ok(Self::SouthAustralia),
            "VIC" => Ok(Self::Victoria),
            "TAS" => Ok(Self::Tasmania),
            other => Err(UnknownRegion(other.to_string())),
        }
    }
}
