mod geocoder;
mod location;
mod timer;

pub use self::geocoder::{GeocodeOperation, GeocodeResult, Geocoder};
pub use self::location::{Location, LocationOperation};
pub use self::timer::{Timer, TimerOperation, TimerOutput};

// Crux's built-in Render capability covers view updates.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub location: Location<Event>,
    pub geocoder: Geocoder<Event>,
    pub timer: Timer<Event>,
    pub render: Render<Event>,
}
