//! Shared core for the "current location" screen.
//!
//! The shell feeds location samples, failures and button taps in as
//! [`Event`]s; the core decides which fix to keep, when to stop listening,
//! and when to reverse geocode, then asks the shell to render the
//! [`ViewModel`].

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod acquisition;
pub mod app;
pub mod capabilities;
pub mod error;
pub mod event;
pub mod model;
pub mod view;

use std::time::Duration;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{CoordinateError, ErrorSeverity, GeocodeError, LocationError};
pub use event::Event;
pub use model::{Address, LocationSample, Model, UnixTimeMs};
pub use view::ViewModel;

/// Samples older than this when they arrive are cached readings.
pub const MAX_SAMPLE_AGE: Duration = Duration::from_secs(5);
/// A fix this accurate ends the session.
pub const TARGET_ACCURACY_M: f64 = 10.0;
/// Give up if no usable fix arrives within this window.
pub const ACQUISITION_TIMEOUT: Duration = Duration::from_secs(60);
/// Closer than this to the best fix counts as not having moved.
pub const STATIONARY_DISTANCE_M: f64 = 1.0;
/// How long a stationary device may fail to improve before the session is forced to stop.
pub const STALL_DURATION: Duration = Duration::from_secs(10);
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
