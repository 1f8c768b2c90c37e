use crate::time::{Real, Time};

/// A single job: one instance of a [`Task`][super::Task], released at a
/// point in time and tracked until it completes or is discarded as missed.
///
/// Jobs are owned exclusively by the simulator; the
/// analyzer never constructs one.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub task_id: String,
    /// The task's RM priority, if any; carried here so the component queue
    /// can order jobs without a back-reference to the task table.
    pub task_priority: Option<i64>,
    pub release_time: Time,
    pub absolute_deadline: Time,
    pub execution_time: Real,
    pub remaining_time: Real,
    pub start_time: Option<Time>,
}

impl Job {
    pub fn new(
        task_id: impl Into<String>,
        task_priority: Option<i64>,
        release_time: Time,
        period: Time,
        execution_time: Real,
    ) -> Self {
        let task_id = task_id.into();
        Job {
            id: format!("{task_id}@{release_time}"),
            task_id,
            task_priority,
            release_time,
            absolute_deadline: release_time + period,
            execution_time,
            remaining_time: execution_time,
            start_time: None,
        }
    }

    /// `true` once the job has consumed all of its sampled execution time.
    pub fn is_complete(&self) -> bool {
        self.remaining_time <= 0.0
    }

    /// The EDF sort key: `(absolute_deadline, task_priority_or_id)`, so that
    /// equal deadlines order deterministically.
    pub fn edf_key(&self) -> (Time, i64, &str) {
        (self.absolute_deadline, self.task_priority.unwrap_or(i64::MAX), self.task_id.as_str())
    }

    /// The RM sort key: `(task_priority, release_time)`.
    pub fn rm_key(&self, priority: i64) -> (i64, Time) {
        (priority, self.release_time)
    }
}
