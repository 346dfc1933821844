//! Typed client for the Hammergen character generator REST API.

pub mod api;
pub mod config;
pub mod modifiers;
pub mod mutation;
