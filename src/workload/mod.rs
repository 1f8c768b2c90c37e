/*! The workload model (**W**): typed records for cores, components, tasks,
and jobs, plus the validation and normalization that turns raw input
records into a [`Workload`] the analyzer and the simulator can share.

This module is pure data with invariants: cores own the identity
namespace, components reference cores by id, tasks reference components by
id, and jobs reference tasks — all cross-references are logical, never
cyclic. */

mod component;
mod core;
mod job;
mod scheduler;
mod task;

pub use component::Component;
pub use core::Core;
pub use job::Job;
pub use scheduler::Scheduler;
pub use task::Task;

use std::collections::{HashMap, HashSet};

use crate::error::InputError;

/// The validated, WCET-normalized workload shared by the analyzer and the
/// simulator.
///
/// Constructing one runs every cross-cutting check a single record type
/// cannot run on its own (unknown references, RM priority requirements,
/// duplicate priorities) and applies the WCET normalization exactly once,
/// so neither pipeline has to repeat it.
#[derive(Debug, Clone)]
pub struct Workload {
    pub cores: Vec<Core>,
    pub components: Vec<Component>,
    pub tasks: Vec<Task>,
}

impl Workload {
    pub fn new(
        cores: Vec<Core>,
        components: Vec<Component>,
        mut tasks: Vec<Task>,
    ) -> Result<Self, InputError> {
        let core_ids: HashSet<i64> = cores.iter().map(|c| c.id).collect();
        let component_by_id: HashMap<&str, &Component> =
            components.iter().map(|c| (c.id.as_str(), c)).collect();

        for component in &components {
            if !core_ids.contains(&component.core_id) {
                return Err(InputError::UnknownCore {
                    component_id: component.id.clone(),
                    core_id: component.core_id,
                });
            }
        }

        for task in &tasks {
            let Some(component) = component_by_id.get(task.component_id.as_str()) else {
                return Err(InputError::UnknownComponent {
                    task_id: task.id.clone(),
                    component_id: task.component_id.clone(),
                });
            };
            if component.scheduler.requires_priority() && task.priority.is_none() {
                return Err(InputError::MissingPriority { entity_id: task.id.clone() });
            }
        }

        for component in &components {
            if component.scheduler != Scheduler::Rm {
                continue;
            }
            let mut seen = HashSet::new();
            for task in tasks.iter().filter(|t| t.component_id == component.id) {
                let priority = task.priority.expect("checked above");
                if !seen.insert(priority) {
                    return Err(InputError::DuplicatePriority {
                        component_id: component.id.clone(),
                        priority,
                    });
                }
            }
        }

        normalize_wcet(&mut tasks, &components, &cores)?;

        Ok(Workload { cores, components, tasks })
    }

    /// The tasks belonging to `component_id`, grouped in the order the
    /// analyzer and simulator both expect: ascending priority (highest
    /// priority first) under RM, and a stable order by task id under EDF.
    pub fn ordered_tasks_of(&self, component_id: &str) -> Vec<&Task> {
        let mut tasks: Vec<&Task> =
            self.tasks.iter().filter(|t| t.component_id == component_id).collect();
        let component = self.components.iter().find(|c| c.id == component_id);
        match component.map(|c| c.scheduler) {
            Some(Scheduler::Rm) => tasks.sort_by_key(|t| t.priority.expect("validated at load")),
            _ => tasks.sort_by(|a, b| a.id.cmp(&b.id)),
        }
        tasks
    }

    pub fn components_of(&self, core_id: i64) -> Vec<&Component> {
        self.components.iter().filter(|c| c.core_id == core_id).collect()
    }

    pub fn component(&self, component_id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == component_id)
    }

    pub fn core(&self, core_id: i64) -> Option<&Core> {
        self.cores.iter().find(|c| c.id == core_id)
    }
}

/// Divides every task's WCET by its parent core's `speed_factor`:
/// `wcet <- wcet / speed_factor`.
fn normalize_wcet(
    tasks: &mut [Task],
    components: &[Component],
    cores: &[Core],
) -> Result<(), InputError> {
    for task in tasks.iter_mut() {
        let component = components
            .iter()
            .find(|c| c.id == task.component_id)
            .expect("unknown component already rejected above");
        let core = cores
            .iter()
            .find(|c| c.id == component.core_id)
            .expect("unknown core already rejected above");
        task.wcet /= core.speed_factor;
    }
    Ok(())
}
