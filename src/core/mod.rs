//! Core decision logic
//!
//! Every stage here reads an already-detected profile or probe output and
//! reports through a `StatusSink`. Host access lives in `crate::probe`.

pub mod arch;
pub mod distro;
pub mod ipv6;
pub mod packages;
pub mod repos;
pub mod selinux;
pub mod validation;

#[cfg(test)]
mod validation_proptest;

#[cfg(test)]
mod ipv6_proptest;

#[cfg(test)]
mod arch_proptest;
