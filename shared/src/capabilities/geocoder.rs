use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

use crate::error::GeocodeError;
use crate::model::{Address, LatLon};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GeocodeOperation {
    ReverseGeocode { coordinate: LatLon },
}

/// Candidate addresses, best match last.
pub type GeocodeResult = Result<Vec<Address>, GeocodeError>;

impl Operation for GeocodeOperation {
    type Output = GeocodeResult;
}

#[derive(Capability)]
pub struct Geocoder<Ev> {
    context: CapabilityContext<GeocodeOperation, Ev>,
}

impl<Ev> Geocoder<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<GeocodeOperation, Ev>) -> Self {
        Self { context }
    }

    /// There is no cancellation; the callback always runs once the shell answers.
    pub fn reverse_geocode<F>(&self, coordinate: LatLon, callback: F)
    where
        F: FnOnce(GeocodeResult) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(GeocodeOperation::ReverseGeocode { coordinate })
                .await;
            ctx.update_app(callback(result));
        });
    }
}
