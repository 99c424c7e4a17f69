use crate::latch::EdgeLatch;
use cubefall_common::{Activation, OverflowPolicy};

/// Relative slack when comparing banked time against the step size. Frame
/// times measured in `f32` land a few ULPs under an `f64` step.
const STEP_TOLERANCE: f64 = 1e-6;

/// Fixed-timestep accumulator that decides, once per frame, whether the
/// simulation advances.
///
/// The accumulator is consumed at most once per call to [`FixedStep::advance`],
/// so a long frame never produces a burst of catch-up steps.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f64,
    accumulated: f64,
    activation: Activation,
    overflow: OverflowPolicy,
    press: EdgeLatch,
    steps_taken: u64,
}

impl FixedStep {
    pub fn new(step: f64, activation: Activation, overflow: OverflowPolicy) -> Self {
        Self {
            step,
            accumulated: 0.0,
            activation,
            overflow,
            press: EdgeLatch::new(),
            steps_taken: 0,
        }
    }

    pub fn step_size(&self) -> f64 {
        self.step
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Bank `dt` seconds of frame time and report whether one step is due.
    ///
    /// Negative or non-finite `dt` is treated as zero.
    pub fn advance(&mut self, dt: f64, step_held: bool) -> bool {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        match self.activation {
            Activation::Always => self.accumulated += dt,
            Activation::WhileHeld => {
                if step_held {
                    self.accumulated += dt;
                }
            }
            Activation::OnPress => {
                if self.press.update(step_held) {
                    self.steps_taken += 1;
                    return true;
                }
                return false;
            }
        }

        if self.accumulated < self.step * (1.0 - STEP_TOLERANCE) {
            return false;
        }

        self.accumulated = match self.overflow {
            OverflowPolicy::Reset => 0.0,
            OverflowPolicy::Carry => (self.accumulated - self.step).clamp(0.0, self.step),
        };
        self.steps_taken += 1;
        true
    }
}
