use serde::{Deserialize, Serialize};

use crate::capabilities::{GeocodeResult, TimerOutput};
use crate::error::LocationError;
use crate::model::{
    LatLon, LocationAuthorization, LocationSample, SubscriptionId, TimerId, UnixTimeMs,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ViewLoaded,

    /// The "Get GPS" / "Stop" button. Runs the permission check first.
    GetLocationTapped,
    /// Starts a session without the permission check.
    StartRequested,
    StopRequested,
    AlertDismissed,

    ServicesAvailabilityChanged {
        enabled: bool,
    },

    /// A batch of readings for `subscription`; only the newest one counts.
    /// `received_at` is the shell's clock when the batch arrived.
    LocationsUpdated {
        subscription: SubscriptionId,
        locations: Vec<LocationSample>,
        received_at: UnixTimeMs,
    },
    LocationFailed {
        subscription: SubscriptionId,
        error: LocationError,
    },

    // Capability callbacks.
    #[serde(skip)]
    AuthorizationChecked(LocationAuthorization),
    #[serde(skip)]
    PermissionResponded(LocationAuthorization),
    /// `session` and `coordinate` identify what was looked up.
    #[serde(skip)]
    GeocodeCompleted {
        session: u64,
        coordinate: LatLon,
        result: GeocodeResult,
    },
    #[serde(skip)]
    TimerFinished {
        id: TimerId,
        output: TimerOutput,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ViewLoaded => "view_loaded",
            Self::GetLocationTapped => "get_location_tapped",
            Self::StartRequested => "start_requested",
            Self::StopRequested => "stop_requested",
            Self::AlertDismissed => "alert_dismissed",
            Self::ServicesAvailabilityChanged { .. } => "services_availability_changed",
            Self::LocationsUpdated { .. } => "locations_updated",
            Self::LocationFailed { .. } => "location_failed",
            Self::AuthorizationChecked(_) => "authorization_checked",
            Self::PermissionResponded(_) => "permission_responded",
            Self::GeocodeCompleted { .. } => "geocode_completed",
            Self::TimerFinished { .. } => "timer_finished",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::GetLocationTapped
                | Self::StartRequested
                | Self::StopRequested
                | Self::AlertDismissed
        )
    }
}
