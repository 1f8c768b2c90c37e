/*! Per-task and per-component observations accumulated by the simulator,
and the aggregation rules that turn them into a report. */

use crate::time::Real;

/// The response-time series and deadline outcomes recorded for one task
/// across every simulated job of it, across every run.
#[derive(Debug, Clone)]
pub struct TaskObservations {
    pub task_id: String,
    pub component_id: String,
    response_times: Vec<Real>,
    deadline_met: Vec<bool>,
}

impl TaskObservations {
    pub fn new(task_id: impl Into<String>, component_id: impl Into<String>) -> Self {
        TaskObservations {
            task_id: task_id.into(),
            component_id: component_id.into(),
            response_times: Vec::new(),
            deadline_met: Vec::new(),
        }
    }

    /// Records a job that ran to completion.
    pub fn record_completion(&mut self, response_time: Real, deadline_met: bool) {
        self.response_times.push(response_time);
        self.deadline_met.push(deadline_met);
    }

    /// Records a deadline-miss event for a job discarded on re-release
    /// — no response time, since the job never completed.
    pub fn record_miss(&mut self) {
        self.deadline_met.push(false);
    }

    pub fn avg_response_time(&self) -> Real {
        if self.response_times.is_empty() {
            return 0.0;
        }
        self.response_times.iter().sum::<Real>() / self.response_times.len() as Real
    }

    pub fn max_response_time(&self) -> Real {
        self.response_times.iter().cloned().fold(0.0, Real::max)
    }

    /// `true` iff at least one job of this task ran to completion and
    /// every recorded job, completed or discarded, met its deadline. A
    /// task that never completed a single job is not schedulable, even if
    /// it was also never caught missing one.
    pub fn task_schedulable(&self) -> bool {
        !self.response_times.is_empty() && self.deadline_met.iter().all(|&met| met)
    }
}

/// One task's entry in the simulator report.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult {
    pub task_id: String,
    pub component_id: String,
    pub avg_response_time: Real,
    pub max_response_time: Real,
    pub task_schedulable: bool,
}

/// The full output of a simulation run: one [`TaskResult`] per task, plus
/// whether the run ended by natural quiescence or hit the hyperperiod cap
///.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub tasks: Vec<TaskResult>,
    pub completed_naturally: bool,
}

impl SimulationReport {
    pub fn task(&self, task_id: &str) -> Option<&TaskResult> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    /// `component_schedulable`: every task in `component_id` is
    /// individually schedulable. `None` if the component has no tasks in
    /// this report.
    pub fn component_schedulable(&self, component_id: &str) -> Option<bool> {
        let mut members = self.tasks.iter().filter(|t| t.component_id == component_id).peekable();
        members.peek()?;
        Some(members.all(|t| t.task_schedulable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_average_and_max_over_completions_only() {
        let mut obs = TaskObservations::new("t", "c");
        obs.record_completion(2.0, true);
        obs.record_completion(4.0, true);
        obs.record_miss();
        assert_eq!(obs.avg_response_time(), 3.0);
        assert_eq!(obs.max_response_time(), 4.0);
        assert!(!obs.task_schedulable());
    }

    #[test]
    fn component_schedulable_requires_every_member_task() {
        let report = SimulationReport {
            tasks: vec![
                TaskResult {
                    task_id: "t1".into(),
                    component_id: "c".into(),
                    avg_response_time: 2.0,
                    max_response_time: 2.0,
                    task_schedulable: true,
                },
                TaskResult {
                    task_id: "t2".into(),
                    component_id: "c".into(),
                    avg_response_time: 3.0,
                    max_response_time: 5.0,
                    task_schedulable: false,
                },
            ],
            completed_naturally: true,
        };
        assert_eq!(report.component_schedulable("c"), Some(false));
        assert_eq!(report.component_schedulable("missing"), None);
    }
}
