//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{AuthService, CarrierService};

#[derive(Clone)]
pub struct AppState {
    pub carrier_service: Arc<CarrierService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(carrier_service: Arc<CarrierService>, auth_service: Arc<AuthService>) -> Self {
        Self {
            carrier_service,
            auth_service,
        }
    }
}
