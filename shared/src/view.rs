use serde::{Deserialize, Serialize};

use crate::model::{Alert, Model};

pub const SEARCHING_FOR_ADDRESS: &str = "Searching for Address...";
pub const ADDRESS_ERROR: &str = "Error Finding Address";
pub const NO_ADDRESS_FOUND: &str = "No Address Found";
pub const SERVICES_DISABLED: &str = "Location Services Disabled";
pub const LOCATION_ERROR: &str = "Error getting location...";
pub const SEARCHING: &str = "Searching...";
pub const TAP_TO_START: &str = "Tap 'Get GPS Coordinates' to Start";
pub const START_TITLE: &str = "Get GPS";
pub const STOP_TITLE: &str = "Stop";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertView {
    pub title: String,
    pub message: String,
}

impl From<Alert> for AlertView {
    fn from(alert: Alert) -> Self {
        match alert {
            Alert::LocationServicesDenied => Self {
                title: SERVICES_DISABLED.into(),
                message: "Please enable location services for this app in Settings.".into(),
            },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub latitude: String,
    pub longitude: String,
    pub address: String,
    pub message: String,
    /// Whether tagging the current fix is possible.
    pub can_tag: bool,
    pub toggle_title: String,
    pub is_acquiring: bool,
    pub alert: Option<AlertView>,
}

#[must_use]
pub fn compute_display_state(model: &Model) -> ViewModel {
    let (latitude, longitude, address, message, can_tag) = match &model.best_location {
        Some(fix) => (
            format!("{:.8}", fix.coordinate.lat),
            format!("{:.8}", fix.coordinate.lon),
            address_text(model),
            String::new(),
            true,
        ),
        None => (
            String::new(),
            String::new(),
            String::new(),
            status_message(model).to_string(),
            false,
        ),
    };

    ViewModel {
        latitude,
        longitude,
        address,
        message,
        can_tag,
        toggle_title: (if model.is_acquiring { STOP_TITLE } else { START_TITLE }).to_string(),
        is_acquiring: model.is_acquiring,
        alert: model.alert.map(AlertView::from),
    }
}

fn address_text(model: &Model) -> String {
    if let Some(address) = &model.address {
        return address.to_string();
    }
    if model.is_geocoding {
        return SEARCHING_FOR_ADDRESS.to_string();
    }
    match &model.last_geocoding_error {
        Some(err) if err.is_failure() => ADDRESS_ERROR.to_string(),
        _ => NO_ADDRESS_FOUND.to_string(),
    }
}

fn status_message(model: &Model) -> &'static str {
    match &model.last_location_error {
        Some(err) if err.is_permission_denied() => SERVICES_DISABLED,
        Some(_) => LOCATION_ERROR,
        None if !model.services_enabled || model.permission.is_denied() => SERVICES_DISABLED,
        None if model.is_acquiring => SEARCHING,
        None => TAP_TO_START,
    }
}
