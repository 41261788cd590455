//! Mentorship-matching backend core.
//!
//! The crate owns the enrollment lifecycle and mentor-resolution subsystem:
//! students apply to mentors directly or to career programs, the mentor
//! resolver picks the accountable mentor for programs without an explicit
//! assignment, and the enrollment store enforces duplicate-application and
//! status-transition invariants. HTTP routing, credential handling, and file
//! storage are external collaborators reached through thin boundaries.

pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod mentorship;
pub mod seed;
pub mod storage;
pub mod telemetry;
