//! Property-based tests for region enumeration and batching

mod enumeration;
