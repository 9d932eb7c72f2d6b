//! Live production-line dashboard.
//!
//! A REST snapshot seeds the state, MQTT push notifications keep it current,
//! and the derived views are served over HTTP and drawn in the terminal.

pub mod api;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod http;
pub mod loader;
pub mod models;
pub mod production_date;
pub mod push;
pub mod reconcile;
pub mod render;
pub mod session;
pub mod state;
pub mod views;
