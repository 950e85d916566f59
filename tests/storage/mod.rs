//! Shared storage integration tests.
//!
//! Tests the ProcessStore interface against all implementations.
//! Each implementation module imports these test functions and runs them.

pub mod process_store_tests;
