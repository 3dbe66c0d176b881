//! Core PerspectiQ library (backend API client, credentials, config, generation).

pub mod api;
pub mod auth;
pub mod config;
pub mod generation;
pub mod logging;
pub mod transcript;
