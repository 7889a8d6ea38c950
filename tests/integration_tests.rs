//! Integration tests entry point
//!
//! Cargo builds each top-level file in tests/ as its own binary; the modules
//! under integration/ are pulled in here so they share one.

mod integration;
