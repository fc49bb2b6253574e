//! spotbook: session-authenticated listings API plus the client-side
//! store and action creators that consume it.

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod spots;
pub mod state;
pub mod store;
