use crate::error::InputError;
use crate::time::Real;

use super::{Job, Scheduler};

/// A component: a PRM budget `(Q, P)` bound to one core, plus the mutable
/// simulator state (`remaining_budget`, `jobs_queue`) that state belongs to.
///
/// The analyzer only ever reads the immutable fields; the simulator is the
/// sole owner of the mutable ones.
#[derive(Debug, Clone)]
pub struct Component {
    pub id: String,
    pub core_id: i64,
    pub scheduler: Scheduler,
    /// `Q`: the budget replenished every `period` time units.
    pub budget: Real,
    /// `P`: the replenishment period.
    pub period: Real,
    /// Required iff `scheduler` is [`Scheduler::Rm`].
    pub priority: Option<i64>,

    /// Simulator-owned: ticks of budget left in the current period.
    pub remaining_budget: Real,
    /// Simulator-owned: jobs waiting to run, kept in dispatch order.
    pub jobs_queue: Vec<Job>,
}

impl Component {
    /// Constructs a component, enforcing `0 < Q <= P` and the
    /// priority-iff-RM rule.
    pub fn new(
        id: impl Into<String>,
        core_id: i64,
        scheduler: Scheduler,
        budget: Real,
        period: Real,
        priority: Option<i64>,
    ) -> Result<Self, InputError> {
        let id = id.into();
        if period <= 0.0 {
            return Err(InputError::NonPositivePeriod { entity_id: id, period });
        }
        if budget <= 0.0 {
            return Err(InputError::NonPositiveQuantity {
                entity_id: id,
                field: "budget",
                value: budget,
            });
        }
        if budget > period {
            return Err(InputError::BudgetExceedsPeriod {
                component_id: id,
                budget,
                period,
            });
        }
        if scheduler.requires_priority() && priority.is_none() {
            return Err(InputError::MissingPriority { entity_id: id });
        }

        Ok(Component {
            id,
            core_id,
            scheduler,
            budget,
            period,
            priority,
            remaining_budget: budget,
            jobs_queue: Vec::new(),
        })
    }

    /// Replenishes the budget to `Q`, as happens at every multiple of `P`.
    pub fn replenish(&mut self) {
        self.remaining_budget = self.budget;
    }

    /// Inserts `job` into the queue in the component's dispatch order,
    /// first discarding any stale instance of the same task still queued
    /// (a deadline miss of the prior release).
    ///
    /// Returns the discarded job, if any, so the caller can record the
    /// deadline-miss event before the new job takes its place.
    pub fn enqueue(&mut self, job: Job) -> Option<Job> {
        let stale = self
            .jobs_queue
            .iter()
            .position(|queued| queued.task_id == job.task_id)
            .map(|idx| self.jobs_queue.remove(idx));

        let insert_at = match self.scheduler {
            Scheduler::Edf => self
                .jobs_queue
                .iter()
                .position(|queued| queued.edf_key() > job.edf_key())
                .unwrap_or(self.jobs_queue.len()),
            Scheduler::Rm => {
                let priority = job.task_priority.expect("RM job must carry a priority");
                self.jobs_queue
                    .iter()
                    .position(|queued| {
                        let queued_priority =
                            queued.task_priority.expect("RM job must carry a priority");
                        queued.rm_key(queued_priority) > job.rm_key(priority)
                    })
                    .unwrap_or(self.jobs_queue.len())
            }
        };
        self.jobs_queue.insert(insert_at, job);
        stale
    }

    /// The head of the queue: the job that would run next if this
    /// component is selected.
    pub fn head(&self) -> Option<&Job> {
        self.jobs_queue.first()
    }

    pub fn is_eligible(&self) -> bool {
        self.remaining_budget > 0.0 && !self.jobs_queue.is_empty()
    }
}
