use tracing::{debug, info, warn};

use crate::acquisition::{evaluate_sample, SampleVerdict};
use crate::capabilities::{Capabilities, GeocodeResult, TimerOutput};
use crate::error::{GeocodeError, LocationError};
use crate::event::Event;
use crate::model::{
    Alert, LatLon, LocationAuthorization, LocationSample, Model, SubscriptionId, TimerId,
    UnixTimeMs,
};
use crate::view::{compute_display_state, ViewModel};
use crate::{ACQUISITION_TIMEOUT, TARGET_ACCURACY_M};

#[derive(Default)]
pub struct App;

impl App {
    /// Resets the screen and opens a new session. Any running session is
    /// closed first.
    fn start_acquisition(model: &mut Model, caps: &Capabilities) {
        Self::stop_acquisition(model, caps);
        model.reset_session();

        if !model.services_enabled {
            warn!("location services disabled, not starting acquisition");
            return;
        }

        let subscription = model.next_subscription_id();
        caps.location.start_updates(subscription, TARGET_ACCURACY_M);
        model.subscription = Some(subscription);
        model.is_acquiring = true;

        let timer = model.next_timer_id();
        caps.timer
            .schedule_once(timer, ACQUISITION_TIMEOUT, move |output| Event::TimerFinished {
                id: timer,
                output,
            });
        model.timer = Some(timer);

        info!(subscription = subscription.0, timer = timer.0, "acquisition started");
    }

    /// Releases the subscription and the timeout. A geocode request in
    /// flight is left to complete.
    fn stop_acquisition(model: &mut Model, caps: &Capabilities) {
        if !model.is_acquiring {
            return;
        }

        if let Some(subscription) = model.subscription.take() {
            caps.location.stop_updates(subscription);
        }
        if let Some(timer) = model.timer.take() {
            caps.timer.cancel(timer);
        }
        model.is_acquiring = false;

        info!(has_fix = model.best_location.is_some(), "acquisition stopped");
    }

    fn is_current(model: &Model, subscription: SubscriptionId) -> bool {
        model.is_acquiring && model.subscription == Some(subscription)
    }

    fn on_location_sample(
        model: &mut Model,
        caps: &Capabilities,
        sample: LocationSample,
        received_at: UnixTimeMs,
    ) {
        let verdict = evaluate_sample(model.best_location.as_ref(), &sample, received_at);

        match verdict {
            SampleVerdict::Rejected(reason) => {
                debug!(?reason, accuracy = sample.horizontal_accuracy_m, "sample rejected");
            }
            SampleVerdict::NotImproved => {
                debug!(accuracy = sample.horizontal_accuracy_m, "sample not better than best fix");
            }
            SampleVerdict::Stalled => {
                info!(
                    accuracy = sample.horizontal_accuracy_m,
                    "no improvement while stationary, forcing stop"
                );
                Self::stop_acquisition(model, caps);
                caps.render.render();
            }
            SampleVerdict::Accepted { reached_target, .. } => {
                model.last_location_error = None;
                model.best_location = Some(sample);
                info!(accuracy = sample.horizontal_accuracy_m, reached_target, "new best fix");

                if reached_target {
                    Self::stop_acquisition(model, caps);
                    if verdict.moved() && model.is_geocoding {
                        model.geocode_final_fix = true;
                    }
                }

                if !model.is_geocoding {
                    Self::begin_reverse_geocode(model, caps, &sample);
                }

                caps.render.render();
            }
        }
    }

    fn on_location_error(model: &mut Model, caps: &Capabilities, error: LocationError) {
        if error.is_transient() {
            debug!(code = error.code(), "transient location error ignored");
            return;
        }

        warn!(code = error.code(), %error, "location error ends acquisition");
        model.last_location_error = Some(error);
        Self::stop_acquisition(model, caps);
        caps.render.render();
    }

    fn on_timeout(model: &mut Model, caps: &Capabilities, id: TimerId, output: TimerOutput) {
        if output == TimerOutput::Cancelled || model.timer != Some(id) {
            debug!(timer = id.0, ?output, "timer no longer armed");
            return;
        }
        model.timer = None;

        if model.best_location.is_some() {
            debug!(timer = id.0, "timeout after a fix was accepted");
            return;
        }

        let seconds = ACQUISITION_TIMEOUT.as_secs();
        warn!(seconds, "no usable fix before timeout");
        Self::stop_acquisition(model, caps);
        model.last_location_error = Some(LocationError::TimedOut { seconds });
        caps.render.render();
    }

    fn begin_reverse_geocode(model: &mut Model, caps: &Capabilities, sample: &LocationSample) {
        model.is_geocoding = true;
        debug!(accuracy = sample.horizontal_accuracy_m, "reverse geocoding fix");
        let session = model.session;
        let coordinate = sample.coordinate;
        caps.geocoder.reverse_geocode(coordinate, move |result| {
            Event::GeocodeCompleted {
                session,
                coordinate,
                result,
            }
        });
    }

    /// Applies a finished lookup. A result from an earlier session only lands
    /// if it is for the current best fix; otherwise the best fix is looked up
    /// again.
    fn on_geocode_completed(
        model: &mut Model,
        caps: &Capabilities,
        session: u64,
        coordinate: LatLon,
        result: GeocodeResult,
    ) {
        model.is_geocoding = false;

        let relevant = session == model.session
            || model
                .best_location
                .is_some_and(|fix| fix.coordinate == coordinate);

        let lookup_best = if relevant {
            Self::apply_geocode_result(model, result);
            std::mem::take(&mut model.geocode_final_fix)
        } else {
            debug!(session, current = model.session, "dropping address from previous session");
            true
        };

        if lookup_best {
            if let Some(fix) = model.best_location {
                Self::begin_reverse_geocode(model, caps, &fix);
            }
        }

        caps.render.render();
    }

    fn apply_geocode_result(model: &mut Model, result: GeocodeResult) {
        match result {
            Ok(mut addresses) => match addresses.pop() {
                Some(address) => {
                    model.address = Some(address);
                    model.last_geocoding_error = None;
                }
                None => {
                    model.address = None;
                    model.last_geocoding_error = Some(GeocodeError::NoResults);
                }
            },
            Err(error) => {
                warn!(code = error.code(), %error, "reverse geocoding failed");
                model.address = None;
                model.last_geocoding_error = Some(error);
            }
        }
    }

    fn on_authorization(model: &mut Model, caps: &Capabilities, auth: LocationAuthorization) {
        model.permission = auth.status;
        model.services_enabled = auth.services_enabled;

        if auth.status.needs_request() {
            caps.location.request_permission(Event::PermissionResponded);
            return;
        }

        if auth.status.is_denied() {
            info!(status = ?auth.status, "location permission denied");
            model.alert = Some(Alert::LocationServicesDenied);
        } else if model.is_acquiring {
            Self::stop_acquisition(model, caps);
        } else {
            Self::start_acquisition(model, caps);
        }
        caps.render.render();
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(
            event = event.name(),
            user_initiated = event.is_user_initiated(),
            "update"
        );

        match event {
            Event::ViewLoaded => {
                caps.render.render();
            }

            Event::GetLocationTapped => {
                caps.location.check_authorization(Event::AuthorizationChecked);
            }

            Event::StartRequested => {
                Self::start_acquisition(model, caps);
                caps.render.render();
            }

            Event::StopRequested => {
                Self::stop_acquisition(model, caps);
                caps.render.render();
            }

            Event::AlertDismissed => {
                model.alert = None;
                caps.render.render();
            }

            Event::ServicesAvailabilityChanged { enabled } => {
                model.services_enabled = enabled;
                caps.render.render();
            }

            Event::LocationsUpdated {
                subscription,
                locations,
                received_at,
            } => {
                if !Self::is_current(model, subscription) {
                    debug!(subscription = subscription.0, "samples for inactive subscription");
                    return;
                }
                if let Some(sample) = locations.last().copied() {
                    Self::on_location_sample(model, caps, sample, received_at);
                }
            }

            Event::LocationFailed {
                subscription,
                error,
            } => {
                if !Self::is_current(model, subscription) {
                    debug!(subscription = subscription.0, "error for inactive subscription");
                    return;
                }
                Self::on_location_error(model, caps, error);
            }

            Event::AuthorizationChecked(auth) => {
                Self::on_authorization(model, caps, auth);
            }

            Event::PermissionResponded(auth) => {
                model.permission = auth.status;
                model.services_enabled = auth.services_enabled;
                info!(status = ?auth.status, "location permission answered");
                caps.render.render();
            }

            Event::GeocodeCompleted {
                session,
                coordinate,
                result,
            } => {
                Self::on_geocode_completed(model, caps, session, coordinate, result);
            }

            Event::TimerFinished { id, output } => {
                Self::on_timeout(model, caps, id, output);
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        compute_display_state(model)
    }
}
