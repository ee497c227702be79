//! Business logic services.

pub mod auth_service;
pub mod lifecycle_service;
pub mod notify_service;
