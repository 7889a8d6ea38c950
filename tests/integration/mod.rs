//! Integration tests for the chunk pre-generation scheduler

mod cancellation;
mod config_integration;
mod console_commands;
mod lifecycle;
mod test_utils;
