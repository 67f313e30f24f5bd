//! # NTP Core API Library
//!
//! This library provides the core functionality for the NTP Core API gateway,
//! including handlers, models, repositories, and server configuration.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod repositories;
pub mod server;
