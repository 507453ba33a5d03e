//! Coordinates, distance units and great-circle distance.
//!
//! Positions are WGS84 degrees stored as a [`geo::Coord`] with
//! `x = longitude` and `y = latitude`. Distances are computed with the
//! Haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].

use geo::Coord;
use thiserror::Error;

/// Mean Earth radius used for every distance computation, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres in one statute mile.
pub const KM_PER_MILE: f64 = 1.60934;

/// Errors returned by [`Coordinates::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was not finite or fell outside `[-90, 90]`.
    #[error("latitude {0} must be a finite number between -90 and 90")]
    Latitude(f64),
    /// Longitude was not finite or fell outside `[-180, 180]`.
    #[error("longitude {0} must be a finite number between -180 and 180")]
    Longitude(f64),
}

/// A validated latitude/longitude pair.
///
/// # Examples
/// ```
/// use frontier_core::Coordinates;
///
/// let n_djamena = Coordinates::new(12.1348, 15.0557)?;
/// assert_eq!(n_djamena.latitude(), 12.1348);
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// # Ok::<(), frontier_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LatLon", into = "LatLon")
)]
pub struct Coordinates {
    coord: Coord<f64>,
}

impl Coordinates {
    /// Validate and construct a coordinate pair from degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            coord: Coord {
                x: longitude,
                y: latitude,
            },
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.coord.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.coord.x
    }

    /// The position as a `geo` coordinate (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn as_coord(&self) -> Coord<f64> {
        self.coord
    }

    /// Great-circle distance to `other` in kilometres.
    #[must_use]
    pub fn haversine_km(&self, other: &Self) -> f64 {
        haversine(self.coord, other.coord)
    }
}

impl TryFrom<Coord<f64>> for Coordinates {
    type Error = CoordinateError;

    fn try_from(coord: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(coord.y, coord.x)
    }
}

/// Wire shape for [`Coordinates`].
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
struct LatLon {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<LatLon> for Coordinates {
    type Error = CoordinateError;

    fn try_from(raw: LatLon) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

#[cfg(feature = "serde")]
impl From<Coordinates> for LatLon {
    fn from(value: Coordinates) -> Self {
        Self {
            latitude: value.latitude(),
            longitude: value.longitude(),
        }
    }
}

/// Unit used for a search radius and for reported distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DistanceUnit {
    /// Kilometres.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "km"))]
    Kilometres,
    /// Statute miles.
    Miles,
}

impl DistanceUnit {
    /// Lower-case wire name (`"km"` or `"miles"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kilometres => "km",
            Self::Miles => "miles",
        }
    }

    /// Convert a value expressed in this unit to kilometres.
    #[must_use]
    pub fn to_km(self, value: f64) -> f64 {
        match self {
            Self::Kilometres => value,
            Self::Miles => value * KM_PER_MILE,
        }
    }

    /// Convert a kilometre value into this unit.
    #[must_use]
    pub fn from_km(self, km: f64) -> f64 {
        match self {
            Self::Kilometres => km,
            Self::Miles => km / KM_PER_MILE,
        }
    }
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "km" | "kms" | "kilometre" | "kilometres" | "kilometer" | "kilometers" => {
                Ok(Self::Kilometres)
            }
            "mi" | "mile" | "miles" => Ok(Self::Miles),
            _ => Err(format!("unknown distance unit '{s}'")),
        }
    }
}

/// Great-circle distance in kilometres between two points given in degrees.
///
/// The result is never negative and does not depend on argument order.
///
/// # Examples
/// ```
/// use frontier_core::distance_between;
///
/// let d = distance_between(51.5074, -0.1278, 48.8566, 2.3522);
/// assert!((d - 343.5).abs() < 1.0);
/// assert_eq!(distance_between(10.0, 20.0, 10.0, 20.0), 0.0);
/// ```
#[must_use]
pub fn distance_between(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine(Coord { x: lon1, y: lat1 }, Coord { x: lon2, y: lat2 })
}

fn haversine(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let half_dlat = (to.y - from.y).to_radians() / 2.0;
    let half_dlon = (to.x - from.x).to_radians() / 2.0;

    let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1] for antipodal points.
    let a = a.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}
