//! Thermal plant: an oven heated by a current and cooled by its surroundings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use num_traits::Float;

use crate::constant;

/// Physical constants of the simulated oven
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct PlantConfig<T: Float> {
    /// Ambient temperature the oven relaxes towards
    pub room_temperature: T,
    /// Temperature gained per unit of heating current per tick
    pub heating_coefficient: T,
    /// Factor applied to the squared differential from ambient
    pub loss_coefficient: T,
}

impl<T: Float> Default for PlantConfig<T> {
    fn default() -> Self {
        Self {
            room_temperature: constant(18.0),
            heating_coefficient: constant(0.5),
            loss_coefficient: constant(0.1),
        }
    }
}

impl<T: Float> PlantConfig<T> {
    /// Default oven placed in a room of the given temperature
    pub fn with_room_temperature(room_temperature: T) -> Self {
        Self {
            room_temperature,
            ..Self::default()
        }
    }
}

/// Simulated oven with a single nonlinear update rule
///
/// Each [`tick`](Plant::tick) applies
///
/// ```text
/// temperature += heating * current - loss * (temperature - room)^2
/// ```
///
/// The loss term is always subtracted, so an oven colder than the room keeps
/// cooling instead of warming back up.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Plant<T: Float> {
    config: PlantConfig<T>,
    temperature: T,
    control_input: T,
}

impl<T: Float> Plant<T> {
    /// Create an oven at room temperature with no heating current
    pub fn new(config: PlantConfig<T>) -> Self {
        Self {
            temperature: config.room_temperature,
            control_input: T::zero(),
            config,
        }
    }

    /// Replace the heating current, returning the stored value
    pub fn set_control_input(&mut self, value: T) -> T {
        self.control_input = value;
        self.control_input
    }

    /// Add to the heating current, returning the new total
    pub fn increase_control_input(&mut self, delta: T) -> T {
        self.control_input = self.control_input + delta;
        self.control_input
    }

    /// Advance the oven by one tick and return the new temperature
    pub fn tick(&mut self) -> T {
        let differential = self.temperature - self.config.room_temperature;
        let heating = self.config.heating_coefficient * self.control_input;
        let loss = self.config.loss_coefficient * differential * differential;

        self.temperature = self.temperature + (heating - loss);
        self.temperature
    }

    /// Current oven temperature
    pub fn temperature(&self) -> T {
        self.temperature
    }

    /// Last applied heating current
    pub fn control_input(&self) -> T {
        self.control_input
    }

    /// Ambient temperature fixed at construction
    pub fn room_temperature(&self) -> T {
        self.config.room_temperature
    }

    /// Constants of the update rule
    pub fn config(&self) -> &PlantConfig<T> {
        &self.config
    }
}

impl<T: Float> Default for Plant<T> {
    fn default() -> Self {
        Self::new(PlantConfig::default())
    }
}
