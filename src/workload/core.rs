use crate::error::InputError;
use crate::time::Real;

use super::Scheduler;

/// A processing core: an identity, a speed, and the policy used to choose
/// among its resident components.
///
/// Cores are immutable after load; all mutable state lives on
/// [`Component`][super::Component].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Core {
    pub id: i64,
    pub speed_factor: Real,
    pub scheduler: Scheduler,
}

impl Core {
    /// Constructs a core, rejecting a non-positive speed factor.
    pub fn new(id: i64, speed_factor: Real, scheduler: Scheduler) -> Result<Self, InputError> {
        if speed_factor <= 0.0 {
            return Err(InputError::NonPositiveSpeedFactor { core_id: id, speed_factor });
        }
        Ok(Core { id, speed_factor, scheduler })
    }
}
