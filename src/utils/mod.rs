//! Utility functions shared by hosts and tests.

pub mod bootstrap;
