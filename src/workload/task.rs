use crate::error::InputError;
use crate::time::{Real, Time};

/// A periodic task with an implicit deadline (`deadline = period`).
///
/// After [`normalize_wcet`][super::normalize_wcet] has run, `wcet` has
/// already been divided by the parent core's `speed_factor`; nothing in
/// this module re-applies that scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub wcet: Real,
    pub period: Time,
    pub component_id: String,
    /// Required iff the parent component is RM-scheduled.
    pub priority: Option<i64>,
}

impl Task {
    /// Constructs a task, enforcing `0 < wcet <= period`.
    pub fn new(
        id: impl Into<String>,
        wcet: Real,
        period: Time,
        component_id: impl Into<String>,
        priority: Option<i64>,
    ) -> Result<Self, InputError> {
        let id = id.into();
        if period <= 0 {
            return Err(InputError::NonPositivePeriod { entity_id: id, period: period as Real });
        }
        if wcet <= 0.0 {
            return Err(InputError::NonPositiveQuantity { entity_id: id, field: "wcet", value: wcet });
        }
        if wcet > period as Real {
            return Err(InputError::WcetExceedsPeriod { task_id: id, wcet, period: period as Real });
        }
        Ok(Task { id, wcet, period, component_id: component_id.into(), priority })
    }

    /// The implicit deadline: equal to the period.
    pub fn deadline(&self) -> Time {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wcet_over_period() {
        assert!(Task::new("t", 11.0, 10, "c", None).is_err());
        assert!(Task::new("t", 10.0, 10, "c", None).is_ok());
    }

    #[test]
    fn rejects_non_positive_wcet() {
        assert!(Task::new("t", 0.0, 10, "c", None).is_err());
    }
}
