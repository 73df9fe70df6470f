#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Servo motion control (hardware-agnostic).
//!
//! This crate turns logical level commands (0..=100) into gradual servo moves.
//! All hardware interaction goes through `servo_traits::Servo`, reports leave
//! through `servo_traits::StateSink`, and every delay goes through
//! `servo_traits::Clock`.
//!
//! ## Architecture
//!
//! - **Mapping**: level → angle, integer truncating math (`mapping`)
//! - **Planning**: one-degree steps at a duration-derived rate (`motion`)
//! - **Control**: state, attach/detach lifecycle, reports (`MotionController`)
//! - **Commands**: parse-or-zero decoding of `"<prefix> <level>:<duration>"` (`command`)
//! - **Concurrency**: serialized moves on a background thread (`worker`)
//!
//! ## Blocking
//!
//! A motion cycle blocks the calling thread for its whole duration (one
//! `Clock::sleep` per degree). Use `worker::MotionWorker` to keep a caller
//! responsive while moves run one after another.

pub mod builder;
pub mod command;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod error;
pub mod hw_error;
pub mod mapping;
pub mod mocks;
pub mod motion;
pub mod report;
pub mod runner;
pub mod worker;

pub use builder::{ServoDriver, ServoDriverBuilder, build_controller};
pub use command::Command;
pub use config::{ActuatorCfg, DEFAULT_SETTLE, DEFAULT_STEP_CORRECTION, MotionCfg};
pub use controller::MotionController;
pub use error::{BuildError, ServoError};
pub use motion::MotionPlan;
pub use report::StateReport;
