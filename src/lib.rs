//! # Oven PID Simulation
//!
//! A discrete-time PID controller regulating a simulated oven. The controller
//! owns its oven and both advance in lock-step, one tick at a time, under the
//! control of an external driver (a test, a batch script or a timer loop).
//!
//! ## Components
//! - [`Plant`]: the oven, a fixed nonlinear update rule heated by a current
//!   and cooled towards room temperature
//! - [`Controller`]: PID law over the full recorded temperature history
//! - [`Session`]: run/pause/restart state and validated gain input for
//!   interactive front ends
//!
//! ## Example
//! ```
//! use oven_pid::Controller;
//!
//! let mut controller: Controller<f64> = Controller::new(25.0);
//! controller.set_gain_p(0.1);
//!
//! for _ in 0..50 {
//!     controller.tick();
//! }
//!
//! assert_eq!(controller.history().len(), 51);
//! ```
//!
//! The core never validates or clamps: any gains are accepted and a badly
//! tuned loop is free to diverge. Input checking lives in [`Session`].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use num_traits::Float;

pub mod controller;
pub mod plant;
pub mod session;

pub use controller::{Controller, ControllerBuilder, ControllerDiagnostics, Gains, TickOutput};
pub use plant::{Plant, PlantConfig};
pub use session::{GainTerm, Session, SessionError, SessionState, SLIDER_MAX};

/// Literal constant in the simulation's float type
pub(crate) fn constant<T: Float>(value: f64) -> T {
    T::from(value).unwrap()
}

/// Lossy view of a simulation value for logs and labels
pub(crate) fn to_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
