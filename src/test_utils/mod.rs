//! Shared test support: host fakes, captured command output and status
//! assertions. Compiled into debug builds so integration tests can use it.

#[cfg(any(test, debug_assertions))]
pub mod mocks;

#[cfg(any(test, debug_assertions))]
pub mod fixtures;

#[cfg(any(test, debug_assertions))]
pub mod assertions;
