//! Unit tests for name resolution.
//!
//! These tests cover the display/export naming rules and the cache
//! invalidation contract of `NameResolver`.

mod export_tests;
