//! # Data Models
//!
//! This module contains the data models used throughout the NTP Core API.
//! Users are the only typed documents; jobs and maintenance alerts are
//! passed through as opaque BSON documents.

pub mod user;

pub use user::User;
