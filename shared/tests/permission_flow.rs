use crux_core::testing::AppTester;
use crux_core::Request;

use current_location::capabilities::{LocationOperation, TimerOperation};
use current_location::model::{Alert, LocationAuthorization, PermissionStatus};
use current_location::view::{SERVICES_DISABLED, START_TITLE, STOP_TITLE, TAP_TO_START};
use current_location::{App, Effect, Event, Model};

fn location_request(effects: Vec<Effect>) -> Option<Request<LocationOperation>> {
    effects.into_iter().find_map(|e| match e {
        Effect::Location(req) => Some(req),
        _ => None,
    })
}

fn authorization(status: PermissionStatus) -> LocationAuthorization {
    LocationAuthorization {
        status,
        services_enabled: true,
    }
}

/// Taps the button and answers the authorization check.
fn tap(
    app: &AppTester<App, Effect>,
    model: &mut Model,
    answer: LocationAuthorization,
) -> Vec<Effect> {
    let update = app.update(Event::GetLocationTapped, model);
    let mut check = location_request(update.effects).expect("authorization check");
    assert_eq!(check.operation, LocationOperation::CheckAuthorization);

    let resolved = app.resolve(&mut check, answer).expect("resolve check");
    let mut effects = Vec::new();
    for event in resolved.events {
        effects.extend(app.update(event, model).effects);
    }
    effects
}

#[test]
fn undetermined_permission_is_requested_without_starting() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let effects = tap(&app, &mut model, authorization(PermissionStatus::NotDetermined));
    let mut request = location_request(effects).expect("permission request");
    assert_eq!(request.operation, LocationOperation::RequestPermission);

    let resolved = app
        .resolve(&mut request, authorization(PermissionStatus::Granted))
        .expect("resolve permission");
    for event in resolved.events {
        let _ = app.update(event, &mut model);
    }

    assert_eq!(model.permission, PermissionStatus::Granted);
    assert!(!model.is_acquiring());
    assert_eq!(app.view(&model).message, TAP_TO_START);
}

#[test]
fn denied_permission_shows_alert() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let effects = tap(&app, &mut model, authorization(PermissionStatus::Restricted));

    assert!(effects.iter().any(|e| matches!(e, Effect::Render(_))));
    assert!(!model.is_acquiring());
    assert_eq!(model.alert, Some(Alert::LocationServicesDenied));
    let view = app.view(&model);
    assert_eq!(view.alert.expect("alert").title, SERVICES_DISABLED);

    let _ = app.update(Event::AlertDismissed, &mut model);
    assert!(app.view(&model).alert.is_none());
    assert_eq!(app.view(&model).message, SERVICES_DISABLED);
}

#[test]
fn granted_permission_toggles_acquisition() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let effects = tap(&app, &mut model, authorization(PermissionStatus::Granted));
    assert!(model.is_acquiring());
    assert_eq!(app.view(&model).toggle_title, STOP_TITLE);
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::Location(req) if matches!(req.operation, LocationOperation::StartUpdates { .. })
    )));

    let effects = tap(&app, &mut model, authorization(PermissionStatus::Granted));
    assert!(!model.is_acquiring());
    assert_eq!(app.view(&model).toggle_title, START_TITLE);
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::Timer(req) if matches!(req.operation, TimerOperation::Cancel { .. })
    )));
}

#[test]
fn services_switched_off_blocks_start() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let _ = tap(
        &app,
        &mut model,
        LocationAuthorization {
            status: PermissionStatus::Granted,
            services_enabled: false,
        },
    );

    assert!(!model.is_acquiring());
    assert_eq!(app.view(&model).message, SERVICES_DISABLED);

    let _ = app.update(Event::ServicesAvailabilityChanged { enabled: true }, &mut model);
    assert_eq!(app.view(&model).message, TAP_TO_START);
}
