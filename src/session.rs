//! Headless driver for an interactive tuning front end.
//!
//! A [`Session`] holds the run/pause state a GUI would toggle, turns integer
//! slider positions into gains and checks input before it reaches the
//! [`Controller`]. The caller owns the timer and calls
//! [`on_timer`](Session::on_timer) on every timer event.

use alloc::format;
use alloc::string::String;
use core::fmt;
use num_traits::Float;
use thiserror::Error;

use crate::controller::Controller;
use crate::{constant, to_f64};

/// Highest position a gain slider can report
pub const SLIDER_MAX: i32 = 99;

/// One of the three PID terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GainTerm {
    Proportional,
    Integral,
    Derivative,
}

impl GainTerm {
    pub const ALL: [GainTerm; 3] = [
        GainTerm::Proportional,
        GainTerm::Integral,
        GainTerm::Derivative,
    ];

    /// Slider positions per unit of gain
    fn slider_divisor(self) -> f64 {
        match self {
            GainTerm::Proportional => 50.0,
            GainTerm::Integral | GainTerm::Derivative => 1000.0,
        }
    }
}

impl fmt::Display for GainTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            GainTerm::Proportional => "P",
            GainTerm::Integral => "I",
            GainTerm::Derivative => "D",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not started since creation or the last restart
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SessionError {
    #[error("{term} slider position {position} is outside 0..={max}")]
    SliderOutOfRange { term: GainTerm, position: i32, max: i32 },
    #[error("{term} gain must be finite, got {value}")]
    NonFiniteGain { term: GainTerm, value: f64 },
}

/// Interactive simulation driven by an external timer
#[derive(Debug, Clone)]
pub struct Session<T: Float> {
    controller: Controller<T>,
    state: SessionState,
}

impl<T: Float> Session<T> {
    pub fn new(controller: Controller<T>) -> Self {
        Self {
            controller,
            state: SessionState::Idle,
        }
    }

    /// Toggle between running and paused, returning the new state
    pub fn start_stop(&mut self) -> SessionState {
        self.state = match self.state {
            SessionState::Running => SessionState::Paused,
            SessionState::Idle | SessionState::Paused => SessionState::Running,
        };
        tracing::info!(
            "session {:?} at tick {}",
            self.state,
            self.controller.tick_count()
        );
        self.state
    }

    /// Tick the controller if running, returning the applied correction
    pub fn on_timer(&mut self) -> Option<T> {
        match self.state {
            SessionState::Running => Some(self.controller.tick()),
            SessionState::Idle | SessionState::Paused => None,
        }
    }

    /// Stop and replace the controller with a fresh one keeping its gains
    pub fn restart(&mut self) {
        tracing::info!(
            "session restarted after {} ticks",
            self.controller.tick_count()
        );
        self.controller = self.controller.restart();
        self.state = SessionState::Idle;
    }

    /// Set a gain from a slider position in `0..=SLIDER_MAX`
    pub fn set_slider(&mut self, term: GainTerm, position: i32) -> Result<T, SessionError> {
        if !(0..=SLIDER_MAX).contains(&position) {
            return Err(SessionError::SliderOutOfRange {
                term,
                position,
                max: SLIDER_MAX,
            });
        }

        let value = constant::<T>(f64::from(position)) / constant(term.slider_divisor());
        self.set_gain(term, value)
    }

    /// Set a gain directly; non-finite values are rejected
    pub fn set_gain(&mut self, term: GainTerm, value: T) -> Result<T, SessionError> {
        if !value.is_finite() {
            return Err(SessionError::NonFiniteGain {
                term,
                value: to_f64(value),
            });
        }

        Ok(match term {
            GainTerm::Proportional => self.controller.set_gain_p(value),
            GainTerm::Integral => self.controller.set_gain_i(value),
            GainTerm::Derivative => self.controller.set_gain_d(value),
        })
    }

    /// Current value of one gain
    pub fn gain(&self, term: GainTerm) -> T {
        let gains = self.controller.gains();
        match term {
            GainTerm::Proportional => gains.p,
            GainTerm::Integral => gains.i,
            GainTerm::Derivative => gains.d,
        }
    }

    /// Temperatures to plot, oldest first
    pub fn trace(&self) -> &[T] {
        self.controller.history()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn controller(&self) -> &Controller<T> {
        &self.controller
    }
}

impl<T: Float + fmt::Display> Session<T> {
    /// Text for a gain readout, e.g. `P = 0.1`
    pub fn label(&self, term: GainTerm) -> String {
        format!("{} = {}", term, self.gain(term))
    }
}

impl<T: Float> Default for Session<T> {
    fn default() -> Self {
        Self::new(Controller::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_idle_session_does_not_tick() {
        let mut session: Session<f64> = Session::default();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.on_timer(), None);
        assert_eq!(session.trace().len(), 1);
    }

    #[test]
    fn test_start_stop_cycle() {
        let mut session: Session<f64> = Session::default();
        session.set_slider(GainTerm::Proportional, 5).unwrap();

        assert_eq!(session.start_stop(), SessionState::Running);
        assert!(session.on_timer().is_some());
        assert!(session.on_timer().is_some());
        assert_eq!(session.start_stop(), SessionState::Paused);
        assert_eq!(session.on_timer(), None);
        assert_eq!(session.trace().len(), 3);

        assert_eq!(session.start_stop(), SessionState::Running);
        session.on_timer();
        assert_eq!(session.trace().len(), 4);
    }

    #[test]
    fn test_slider_mapping() {
        let mut session: Session<f64> = Session::default();
        assert_eq!(session.set_slider(GainTerm::Proportional, 5), Ok(0.1));
        assert_eq!(session.set_slider(GainTerm::Integral, 2), Ok(0.002));
        assert_eq!(session.set_slider(GainTerm::Derivative, 99), Ok(0.099));
        assert_eq!(session.controller().gains().p, 0.1);
        assert_eq!(session.label(GainTerm::Proportional), "P = 0.1");
        assert_eq!(session.label(GainTerm::Integral), "I = 0.002");
    }

    #[test]
    fn test_label_in_native_precision() {
        let mut session: Session<f32> = Session::default();
        session.set_slider(GainTerm::Proportional, 5).unwrap();
        session.set_slider(GainTerm::Derivative, 3).unwrap();
        assert_eq!(session.label(GainTerm::Proportional), "P = 0.1");
        assert_eq!(session.label(GainTerm::Integral), "I = 0");
        assert_eq!(session.label(GainTerm::Derivative), "D = 0.003");
    }

    #[test]
    fn test_slider_out_of_range() {
        let mut session: Session<f64> = Session::default();
        let err = session.set_slider(GainTerm::Derivative, 100).unwrap_err();
        assert_eq!(
            err,
            SessionError::SliderOutOfRange {
                term: GainTerm::Derivative,
                position: 100,
                max: SLIDER_MAX,
            }
        );
        assert_eq!(err.to_string(), "D slider position 100 is outside 0..=99");
        assert!(session.set_slider(GainTerm::Proportional, -1).is_err());
        assert_eq!(session.gain(GainTerm::Derivative), 0.0);
    }

    #[test]
    fn test_non_finite_gain_rejected() {
        let mut session: Session<f64> = Session::default();
        assert!(matches!(
            session.set_gain(GainTerm::Integral, f64::NAN),
            Err(SessionError::NonFiniteGain {
                term: GainTerm::Integral,
                ..
            })
        ));
        assert!(session.set_gain(GainTerm::Proportional, f64::INFINITY).is_err());
        // Any finite value is passed through, however large
        assert_eq!(session.set_gain(GainTerm::Proportional, -1e9), Ok(-1e9));
    }

    #[test]
    fn test_restart_keeps_gains() {
        let mut session: Session<f64> = Session::default();
        for term in GainTerm::ALL {
            session.set_slider(term, 10).unwrap();
        }
        session.start_stop();
        for _ in 0..15 {
            session.on_timer();
        }

        session.restart();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.trace(), &[18.0]);
        assert_eq!(session.gain(GainTerm::Proportional), 0.2);
        assert_eq!(session.gain(GainTerm::Integral), 0.01);
        assert_eq!(session.gain(GainTerm::Derivative), 0.01);
    }
}
