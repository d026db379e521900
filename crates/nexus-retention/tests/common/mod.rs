//! Common test infrastructure for nexus-retention tests
//!
//! # Modules
//!
//! - `constants`: Repository names, credentials, task names
//! - `mock_server`: Wiremock setup helpers for the Nexus REST endpoints
//! - `fakes`: In-memory stand-ins for the un-tag tool

// Not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod fakes;
pub mod mock_server;

pub use constants::*;
pub use fakes::*;
pub use mock_server::*;
