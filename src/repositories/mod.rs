//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate MongoDB
//! operations for the logical stores. Handlers depend on the store traits so
//! tests can substitute in-memory fakes for the driver-backed repositories.

pub mod social_impact;
pub mod user;

pub use social_impact::{MongoSocialImpactRepository, SocialImpactStore};
pub use user::{MongoUserRepository, NewUser, UserStore};
