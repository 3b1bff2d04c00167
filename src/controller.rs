//! PID controller that owns its oven and records every temperature it sees.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use num_traits::Float;

use crate::plant::{Plant, PlantConfig};
use crate::{constant, to_f64};

/// Proportional, integral and derivative coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Gains<T: Float> {
    pub p: T,
    pub i: T,
    pub d: T,
}

impl<T: Float> Gains<T> {
    pub fn new(p: T, i: T, d: T) -> Self {
        Self { p, i, d }
    }
}

impl<T: Float> Default for Gains<T> {
    fn default() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }
}

/// Breakdown of a single controller tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct TickOutput<T: Float> {
    /// Heating current applied to the oven
    pub correction: T,
    /// Proportional term contribution
    pub p: T,
    /// Integral term contribution
    pub i: T,
    /// Derivative term contribution (zero on the first tick)
    pub d: T,
    /// Error against the last recorded temperature
    pub error: T,
    /// Oven temperature after the tick
    pub temperature: T,
}

/// Discrete PID controller driving its own [`Plant`]
///
/// The controller keeps the full temperature history. Construction already
/// advances the oven once, so `history()[0]` is the oven after one idle tick
/// rather than the raw room temperature.
///
/// With the `serde` feature the controller can be serialized for export, but
/// not deserialized: a controller only comes from its constructors, so the
/// history is never empty and the running integral always matches it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Controller<T: Float> {
    target: T,
    gains: Gains<T>,
    plant: Plant<T>,
    history: Vec<T>,
    /// Running sum of `target - e` over `history`
    error_sum: T,
}

impl<T: Float> Controller<T> {
    /// Create a controller for `target` driving a default oven
    pub fn new(target: T) -> Self {
        Self::with_plant(target, PlantConfig::default())
    }

    /// Create a controller for `target` driving an oven with the given constants
    pub fn with_plant(target: T, config: PlantConfig<T>) -> Self {
        let mut plant = Plant::new(config);
        let seed = plant.tick();

        tracing::debug!(
            "controller created: target={}, room={}, seed={}",
            to_f64(target),
            to_f64(config.room_temperature),
            to_f64(seed)
        );

        Self {
            target,
            gains: Gains::default(),
            plant,
            history: vec![seed],
            error_sum: target - seed,
        }
    }

    /// Set the proportional gain, returning the stored value
    pub fn set_gain_p(&mut self, p: T) -> T {
        self.gains.p = p;
        p
    }

    /// Set the integral gain, returning the stored value
    pub fn set_gain_i(&mut self, i: T) -> T {
        self.gains.i = i;
        i
    }

    /// Set the derivative gain, returning the stored value
    pub fn set_gain_d(&mut self, d: T) -> T {
        self.gains.d = d;
        d
    }

    /// Replace all three gains at once
    pub fn set_gains(&mut self, gains: Gains<T>) {
        self.gains = gains;
    }

    /// Compute and apply one correction, returning the heating current
    pub fn tick(&mut self) -> T {
        self.tick_detailed().correction
    }

    /// Same as [`tick`](Controller::tick), also reporting each PID term
    pub fn tick_detailed(&mut self) -> TickOutput<T> {
        let last = self.last_temperature();
        let error = self.target - last;

        let p = self.gains.p * error;
        let i = self.gains.i * self.error_sum;
        let mut correction = p + i;

        let d = match self.history.as_slice() {
            [.., previous, latest] => {
                let d = self.gains.d * (*latest - *previous);
                correction = correction + d;
                d
            }
            _ => T::zero(),
        };

        self.plant.set_control_input(correction);
        let temperature = self.plant.tick();
        self.record(temperature);

        tracing::trace!(
            "tick {}: correction={} (p={}, i={}, d={}), temperature={}",
            self.tick_count(),
            to_f64(correction),
            to_f64(p),
            to_f64(i),
            to_f64(d),
            to_f64(temperature)
        );

        TickOutput {
            correction,
            p,
            i,
            d,
            error,
            temperature,
        }
    }

    /// Tick `ticks` times and return the applied corrections in order
    pub fn run(&mut self, ticks: usize) -> Vec<T> {
        let mut corrections = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            corrections.push(self.tick());
        }
        corrections
    }

    fn record(&mut self, temperature: T) {
        if just_diverged(self.last_temperature(), temperature) {
            tracing::warn!(
                "oven temperature diverged to {} after {} ticks",
                to_f64(temperature),
                self.tick_count() + 1
            );
        }

        self.history.push(temperature);
        self.error_sum = self.error_sum + (self.target - temperature);
    }

    /// Fresh controller with the same target, oven constants and gains
    pub fn restart(&self) -> Self {
        let mut controller = Self::with_plant(self.target, *self.plant.config());
        controller.set_gains(self.gains);
        controller
    }

    /// Setpoint fixed at construction
    pub fn target(&self) -> T {
        self.target
    }

    /// Current gains
    pub fn gains(&self) -> Gains<T> {
        self.gains
    }

    /// Every recorded temperature, oldest first
    pub fn history(&self) -> &[T] {
        &self.history
    }

    /// The oven driven by this controller
    pub fn plant(&self) -> &Plant<T> {
        &self.plant
    }

    /// Current oven temperature
    pub fn temperature(&self) -> T {
        self.plant.temperature()
    }

    /// Heating current applied on the last tick
    pub fn control_input(&self) -> T {
        self.plant.control_input()
    }

    /// Number of controller-driven ticks so far
    pub fn tick_count(&self) -> usize {
        self.history.len() - 1
    }

    /// Sum of `target - e` over the history
    ///
    /// Kept incrementally, so it may differ from a fresh summation of
    /// [`history`](Controller::history) by floating-point rounding.
    pub fn integral_sum(&self) -> T {
        self.error_sum
    }

    fn last_temperature(&self) -> T {
        self.history[self.history.len() - 1]
    }

    pub fn diagnostics(&self) -> ControllerDiagnostics<T> {
        let max_error = self
            .history
            .iter()
            .map(|&e| (self.target - e).abs())
            .fold(T::zero(), T::max);

        ControllerDiagnostics {
            tick_count: self.tick_count(),
            target: self.target,
            last_temperature: self.last_temperature(),
            last_correction: self.control_input(),
            max_error,
            integral_sum: self.error_sum,
        }
    }
}

/// True when `latest` is the first non-finite sample after a finite one
fn just_diverged<T: Float>(previous: T, latest: T) -> bool {
    previous.is_finite() && !latest.is_finite()
}

impl<T: Float> Default for Controller<T> {
    fn default() -> Self {
        Self::new(constant(25.0))
    }
}

/// Summary of a controller run
#[derive(Debug, Clone, Copy)]
pub struct ControllerDiagnostics<T: Float> {
    /// Controller-driven ticks so far
    pub tick_count: usize,
    pub target: T,
    /// Most recent recorded temperature
    pub last_temperature: T,
    /// Heating current applied on the last tick
    pub last_correction: T,
    /// Largest |target - e| over the history
    pub max_error: T,
    /// Sum of `target - e` over the history
    pub integral_sum: T,
}

impl<T: Float + fmt::Display> fmt::Display for ControllerDiagnostics<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Controller Diagnostics:\n\
             Ticks: {}\n\
             Target: {:.3}\n\
             Last Temperature: {:.3}\n\
             Last Correction: {:.3}\n\
             Max Error: {:.3}\n\
             Integral Sum: {:.3}",
            self.tick_count,
            self.target,
            self.last_temperature,
            self.last_correction,
            self.max_error,
            self.integral_sum
        )
    }
}

// ============================================================================
// Builder
// ============================================================================

pub struct ControllerBuilder<T: Float> {
    target: T,
    gains: Gains<T>,
    plant: PlantConfig<T>,
}

impl<T: Float> ControllerBuilder<T> {
    pub fn new() -> Self {
        Self {
            target: constant(25.0),
            gains: Gains::default(),
            plant: PlantConfig::default(),
        }
    }

    pub fn target(mut self, target: T) -> Self {
        self.target = target;
        self
    }

    pub fn gains(mut self, p: T, i: T, d: T) -> Self {
        self.gains = Gains::new(p, i, d);
        self
    }

    pub fn plant(mut self, config: PlantConfig<T>) -> Self {
        self.plant = config;
        self
    }

    pub fn room_temperature(mut self, room_temperature: T) -> Self {
        self.plant.room_temperature = room_temperature;
        self
    }

    pub fn build(self) -> Controller<T> {
        let mut controller = Controller::with_plant(self.target, self.plant);
        controller.set_gains(self.gains);
        controller
    }
}

impl<T: Float> Default for ControllerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
