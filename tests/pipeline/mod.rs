//! Service-level tests of the withdrawal pipeline.

pub mod concurrency_tests;
pub mod earnings_tests;
pub mod lifecycle_tests;
pub mod notification_tests;
pub mod payout_method_tests;
