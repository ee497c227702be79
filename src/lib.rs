//! PrintDesk - Backend Library
//!
//! Campus print-shop order management: students submit print files, staff
//! download and mark them for pickup, and a token notification tells the
//! student their print is ready.

#[macro_use]
mod macros;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
