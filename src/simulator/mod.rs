/*! The tick-driven simulator: releases jobs on task periods, replenishes
component budgets on component periods, dispatches one job per core per
tick, and records per-task response times and deadline outcomes.

Phases within a tick run in the strict order release, replenish, dispatch;
cores are dispatched in a fixed order but touch only their own components,
so the order between cores is immaterial to the result. */

mod result;
mod sampler;

pub use result::{SimulationReport, TaskObservations, TaskResult};
pub use sampler::ExecutionTimeSampler;

use std::collections::HashMap;

use crate::hyperperiod::{component_hyperperiod, lcm_all};
use crate::time::{is_multiple_of, Real, Time};
use crate::workload::{Component, Job, Scheduler, Workload};

/// Knobs that do not belong in the workload model itself: how long to run,
/// how pessimistic the execution-time sampler is, and its seed.
///
/// Constructed by the CLI from flags and passed in explicitly; no global
/// state is threaded implicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// How many full system hyperperiods to simulate. Each is a fresh run
    /// over the same workload; observations accumulate across all of them.
    /// Matches the reference prototype's hardcoded iteration count.
    pub hyperperiod_cap: u32,
    /// The sampler's lower bound as a fraction of `wcet`. `1.0` (the
    /// default) makes execution times deterministic, equal to `wcet`.
    pub lower_bound_fraction: Real,
    /// The execution-time sampler's RNG seed.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig { hyperperiod_cap: 10, lower_bound_fraction: 1.0, seed: 0 }
    }
}

/// Runs the simulator over `workload` under `config` and returns the
/// aggregated report.
///
/// `workload` is consumed: the simulator is the sole owner of job
/// lifetimes and of each component's `remaining_budget` / `jobs_queue`,
/// and mutates both freely while it runs.
pub fn run(mut workload: Workload, config: SimConfig) -> SimulationReport {
    let system_hyperperiod = compute_system_hyperperiod(&workload);
    let runs = config.hyperperiod_cap.max(1);

    let mut observations: HashMap<String, TaskObservations> = workload
        .tasks
        .iter()
        .map(|t| (t.id.clone(), TaskObservations::new(t.id.clone(), t.component_id.clone())))
        .collect();

    let mut sampler = ExecutionTimeSampler::new(config.seed);
    let mut completed_naturally = true;

    for _ in 0..runs {
        reset_component_state(&mut workload);
        let quiesced = run_one_hyperperiod(
            &mut workload,
            system_hyperperiod,
            &mut sampler,
            &config,
            &mut observations,
        );
        completed_naturally &= quiesced;
    }

    let mut tasks: Vec<TaskResult> = workload
        .tasks
        .iter()
        .map(|t| {
            let obs = &observations[&t.id];
            TaskResult {
                task_id: t.id.clone(),
                component_id: t.component_id.clone(),
                avg_response_time: obs.avg_response_time(),
                max_response_time: obs.max_response_time(),
                task_schedulable: obs.task_schedulable(),
            }
        })
        .collect();
    tasks.sort_by(|a, b| a.task_id.cmp(&b.task_id));

    SimulationReport { tasks, completed_naturally }
}

/// The LCM of every component's hyperperiod.
fn compute_system_hyperperiod(workload: &Workload) -> Time {
    let component_hyperperiods: Vec<Time> = workload
        .components
        .iter()
        .map(|c| {
            let periods: Vec<Time> =
                workload.tasks.iter().filter(|t| t.component_id == c.id).map(|t| t.period).collect();
            component_hyperperiod(&periods, c.period.round() as Time)
        })
        .collect();
    lcm_all(&component_hyperperiods)
}

fn reset_component_state(workload: &mut Workload) {
    for component in workload.components.iter_mut() {
        component.remaining_budget = component.budget;
        component.jobs_queue.clear();
    }
}

/// Ticks through `[0, length)`, running the three phases in order every
/// tick. Returns `true` if every component's queue was empty at the end
/// (the run quiesced naturally rather than being cut off by the cap).
fn run_one_hyperperiod(
    workload: &mut Workload,
    length: Time,
    sampler: &mut ExecutionTimeSampler,
    config: &SimConfig,
    observations: &mut HashMap<String, TaskObservations>,
) -> bool {
    for t in 0..length.max(1) {
        release_phase(workload, t, sampler, config, observations);
        replenish_phase(workload, t);
        dispatch_phase(workload, t, observations);
    }
    workload.components.iter().all(|c| c.jobs_queue.is_empty())
}

/// Phase 1: release a job for every task whose period divides `t`.
fn release_phase(
    workload: &mut Workload,
    t: Time,
    sampler: &mut ExecutionTimeSampler,
    config: &SimConfig,
    observations: &mut HashMap<String, TaskObservations>,
) {
    for i in 0..workload.tasks.len() {
        let (task_id, component_id, priority, period, wcet) = {
            let task = &workload.tasks[i];
            (task.id.clone(), task.component_id.clone(), task.priority, task.period, task.wcet)
        };
        if t % period != 0 {
            continue;
        }

        let execution_time = sampler.sample(wcet, config.lower_bound_fraction);
        let job = Job::new(&task_id, priority, t, period, execution_time);

        if let Some(component) = workload.components.iter_mut().find(|c| c.id == component_id) {
            if let Some(stale) = component.enqueue(job) {
                observations.get_mut(&stale.task_id).expect("every task has observations").record_miss();
            }
        }
    }
}

/// Phase 2: replenish every component whose period divides `t`.
fn replenish_phase(workload: &mut Workload, t: Time) {
    for component in workload.components.iter_mut() {
        if is_multiple_of(t, component.period) {
            component.replenish();
        }
    }
}

/// Phase 3: on each core, advance the selected component's head job by one
/// tick, charging the component's budget; record completion if the job's
/// remaining time reaches zero.
fn dispatch_phase(workload: &mut Workload, t: Time, observations: &mut HashMap<String, TaskObservations>) {
    let core_ids: Vec<i64> = workload.cores.iter().map(|c| c.id).collect();

    for core_id in core_ids {
        let scheduler = workload.cores.iter().find(|c| c.id == core_id).expect("core exists").scheduler;
        let Some(component_id) = select_component(workload, core_id, scheduler) else { continue };

        let component =
            workload.components.iter_mut().find(|c| c.id == component_id).expect("component exists");
        let finished = advance_head_job(component, t);

        if let Some(job) = finished {
            let response_time = (t + 1 - job.release_time) as Real;
            let deadline_met = t + 1 <= job.absolute_deadline;
            observations
                .get_mut(&job.task_id)
                .expect("every task has observations")
                .record_completion(response_time, deadline_met);
        }
    }
}

/// Selects the eligible component on `core_id` the core's policy would pick
/// next, or `None` if no component on it is eligible.
fn select_component(workload: &Workload, core_id: i64, scheduler: Scheduler) -> Option<String> {
    let eligible: Vec<&Component> =
        workload.components.iter().filter(|c| c.core_id == core_id && c.is_eligible()).collect();

    match scheduler {
        Scheduler::Edf => eligible
            .into_iter()
            .min_by_key(|c| {
                let head = c.head().expect("eligible implies non-empty queue");
                (head.absolute_deadline, c.id.clone())
            })
            .map(|c| c.id.clone()),
        Scheduler::Rm => eligible
            .into_iter()
            .min_by_key(|c| (c.priority.expect("RM component carries a priority"), c.id.clone()))
            .map(|c| c.id.clone()),
    }
}

/// Runs `component`'s head job for one tick and, if it finishes, pops and
/// returns it.
fn advance_head_job(component: &mut Component, t: Time) -> Option<Job> {
    {
        let job = component.jobs_queue.first_mut().expect("dispatch only called when eligible");
        job.remaining_time -= 1.0;
        if job.start_time.is_none() {
            job.start_time = Some(t);
        }
    }
    component.remaining_budget -= 1.0;

    if component.jobs_queue[0].is_complete() {
        Some(component.jobs_queue.remove(0))
    } else {
        None
    }
}
