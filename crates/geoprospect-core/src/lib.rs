//! GeoProspect Core - Domain models, geo primitives, boundary import, and configuration
//!
//! This crate contains the pure, synchronous part of the exploration pipeline:
//! coordinate and boundary math, CSV boundary import, chart export, and the
//! report data model that the analysis crate fills in.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod spatial;

pub use error::{GeoprospectError, ImportError, Result};
