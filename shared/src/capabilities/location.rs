use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

use crate::model::{LocationAuthorization, SubscriptionId};

/// Requests to the platform location manager.
///
/// Samples and failures for an active subscription are not responses to these
/// operations: the shell delivers them as `Event::LocationsUpdated` and
/// `Event::LocationFailed`, tagged with the subscription they belong to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LocationOperation {
    CheckAuthorization,
    RequestPermission,
    StartUpdates {
        subscription: SubscriptionId,
        desired_accuracy_m: f64,
    },
    StopUpdates {
        subscription: SubscriptionId,
    },
}

impl Operation for LocationOperation {
    type Output = LocationAuthorization;
}

#[derive(Capability)]
pub struct Location<Ev> {
    context: CapabilityContext<LocationOperation, Ev>,
}

impl<Ev> Location<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<LocationOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn check_authorization<F>(&self, callback: F)
    where
        F: FnOnce(LocationAuthorization) -> Ev + Send + 'static,
    {
        self.request(LocationOperation::CheckAuthorization, callback);
    }

    pub fn request_permission<F>(&self, callback: F)
    where
        F: FnOnce(LocationAuthorization) -> Ev + Send + 'static,
    {
        self.request(LocationOperation::RequestPermission, callback);
    }

    pub fn start_updates(&self, subscription: SubscriptionId, desired_accuracy_m: f64) {
        self.notify(LocationOperation::StartUpdates {
            subscription,
            desired_accuracy_m,
        });
    }

    pub fn stop_updates(&self, subscription: SubscriptionId) {
        self.notify(LocationOperation::StopUpdates { subscription });
    }

    fn request<F>(&self, operation: LocationOperation, callback: F)
    where
        F: FnOnce(LocationAuthorization) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let authorization = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(authorization));
        });
    }

    fn notify(&self, operation: LocationOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
