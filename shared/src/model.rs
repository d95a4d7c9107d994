use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{CoordinateError, GeocodeError, LocationError};
use crate::EARTH_RADIUS_M;

/// Raw coordinate as delivered by the shell. Not validated.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn validate(self) -> Result<ValidatedCoordinate, CoordinateError> {
        ValidatedCoordinate::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedCoordinate {
    lat: f64,
    lon: f64,
}

impl ValidatedCoordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        haversine_distance(self, other)
    }
}

/// Great-circle distance in meters.
#[must_use]
pub fn haversine_distance(p1: ValidatedCoordinate, p2: ValidatedCoordinate) -> f64 {
    const EPSILON: f64 = 1e-10;

    if (p1.lat - p2.lat).abs() < EPSILON && (p1.lon - p2.lon).abs() < EPSILON {
        return 0.0;
    }

    let lat1_rad = p1.lat.to_radians();
    let lat2_rad = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lon = (p2.lon - p1.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    let result = EARTH_RADIUS_M * 2.0 * a.sqrt().asin();

    if result.is_finite() {
        result
    } else {
        f64::MAX
    }
}

/// Explicit timestamp unit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimeMs(pub u64);

impl UnixTimeMs {
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1000)
    }

    /// Milliseconds from `earlier` to `self`, zero if `earlier` is later.
    #[must_use]
    pub const fn elapsed_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
#[must_use]
pub fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// One reading from the location source.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub coordinate: LatLon,
    /// Radius of uncertainty in meters. Negative means the reading is invalid.
    pub horizontal_accuracy_m: f64,
    pub timestamp: UnixTimeMs,
}

impl LocationSample {
    #[must_use]
    pub const fn new(lat: f64, lon: f64, horizontal_accuracy_m: f64, timestamp: UnixTimeMs) -> Self {
        Self {
            coordinate: LatLon::new(lat, lon),
            horizontal_accuracy_m,
            timestamp,
        }
    }
}

/// A reverse-geocoded place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street_number: Option<String>,
    pub street: Option<String>,
    pub locality: Option<String>,
    pub administrative_area: Option<String>,
    pub postal_code: Option<String>,
}

impl Address {
    /// House number and street.
    #[must_use]
    pub fn first_line(&self) -> String {
        join_present(&[&self.street_number, &self.street])
    }

    /// City, region and postal code.
    #[must_use]
    pub fn second_line(&self) -> String {
        join_present(&[&self.locality, &self.administrative_area, &self.postal_code])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.first_line(), self.second_line())
    }
}

fn join_present(parts: &[&Option<String>]) -> String {
    parts
        .iter()
        .filter_map(|p| p.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    #[default]
    NotDetermined,
    Granted,
    Denied,
    Restricted,
}

impl PermissionStatus {
    #[must_use]
    pub const fn is_denied(self) -> bool {
        matches!(self, Self::Denied | Self::Restricted)
    }

    #[must_use]
    pub const fn needs_request(self) -> bool {
        matches!(self, Self::NotDetermined)
    }
}

/// What the shell reports about location access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAuthorization {
    pub status: PermissionStatus,
    pub services_enabled: bool,
}

/// Handle for one subscription to location updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// Handle for one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    LocationServicesDenied,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub is_acquiring: bool,
    pub best_location: Option<LocationSample>,
    pub last_location_error: Option<LocationError>,

    pub is_geocoding: bool,
    pub address: Option<Address>,
    pub last_geocoding_error: Option<GeocodeError>,
    /// The final fix moved away from the one being geocoded; look it up once
    /// the in-flight request completes.
    pub geocode_final_fix: bool,

    pub services_enabled: bool,
    pub permission: PermissionStatus,
    pub alert: Option<Alert>,

    /// Bumped each time a session starts.
    pub session: u64,
    pub subscription: Option<SubscriptionId>,
    pub timer: Option<TimerId>,
    pub(crate) next_handle: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            is_acquiring: false,
            best_location: None,
            last_location_error: None,
            is_geocoding: false,
            address: None,
            last_geocoding_error: None,
            geocode_final_fix: false,
            // Assume available until the shell says otherwise.
            services_enabled: true,
            permission: PermissionStatus::NotDetermined,
            alert: None,
            session: 0,
            subscription: None,
            timer: None,
            next_handle: 0,
        }
    }
}

impl Model {
    #[must_use]
    pub const fn is_acquiring(&self) -> bool {
        self.is_acquiring
    }

    /// Clears everything a previous session left behind and opens the next
    /// session. An in-flight geocode request is left alone.
    pub fn reset_session(&mut self) {
        self.session = self.session.wrapping_add(1);
        self.best_location = None;
        self.last_location_error = None;
        self.address = None;
        self.last_geocoding_error = None;
        self.geocode_final_fix = false;
    }

    pub fn next_subscription_id(&mut self) -> SubscriptionId {
        SubscriptionId(self.bump_handle())
    }

    pub fn next_timer_id(&mut self) -> TimerId {
        TimerId(self.bump_handle())
    }

    fn bump_handle(&mut self) -> u64 {
        self.next_handle = self.next_handle.wrapping_add(1);
        self.next_handle
    }
}
