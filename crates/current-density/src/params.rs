//! Model constants for the slab current distribution

use serde::Serialize;
use crate::error::{FieldError, Result};

/// Default amplitude `A` of the current density
pub const DEFAULT_AMPLITUDE: f64 = 1.0;
/// Default decay rate `b` along x
pub const DEFAULT_DECAY: f64 = 0.3;
/// Default slab height `h`
pub const DEFAULT_HEIGHT: f64 = 1.0;

/// Validated constants of the closed-form model.
///
/// Fields are private so a constructed value always satisfies
/// `height > 0` with every constant finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldParameters {
    amplitude: f64,
    decay: f64,
    height: f64,
}

impl FieldParameters {
    pub fn new(amplitude: f64, decay: f64, height: f64) -> Result<Self> {
        if !amplitude.is_finite() {
            return Err(FieldError::InvalidParameters {
                reason: format!("amplitude must be finite, got {}", amplitude),
            });
        }
        if !decay.is_finite() {
            return Err(FieldError::InvalidParameters {
                reason: format!("decay must be finite, got {}", decay),
            });
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(FieldError::InvalidParameters {
                reason: format!("height must be finite and positive, got {}", height),
            });
        }

        Ok(Self { amplitude, decay, height })
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// `1 − exp(−b·x)`, the saturation profile shared by `J_x` and `K_x`
    #[inline]
    pub(crate) fn saturation(&self, x: f64) -> f64 {
        1.0 - (-self.decay * x).exp()
    }
}

impl Default for FieldParameters {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_AMPLITUDE,
            decay: DEFAULT_DECAY,
            height: DEFAULT_HEIGHT,
        }
    }
}
