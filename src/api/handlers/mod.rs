//! HTTP request handlers for API endpoints.

pub mod carriers;
pub mod health;
pub mod rates;

pub use carriers::{
    create_carrier_handler, delete_carrier_handler, get_carrier_handler, list_carriers_handler,
    update_carrier_handler,
};
pub use health::health_handler;
pub use rates::{quote_rates_handler, rates_handler};
