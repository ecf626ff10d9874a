//! Common test utilities for consultant wallet integration tests.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
