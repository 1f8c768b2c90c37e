/*! The analyzer: a pure pipeline from a validated [`Workload`] to a
[`SystemVerdict`] — normalize (already done by [`Workload::new`]), group,
derive a BDR interface per component, test each component's demand against
its supply at its critical time points, then test the per-core hierarchy.

Analysis is total: every path through [`analyze`] produces a verdict, never
an error. The caller decides what to do with a negative one. */

mod verdict;

pub use verdict::{ComponentVerdict, CoreVerdict, SystemVerdict};

use crate::bdr::Bdr;
use crate::demand::{dbf_edf, dbf_rm};
use crate::hyperperiod::component_hyperperiod;
use crate::workload::{Component, Core, Scheduler, Task, Workload};

/// Runs the full pipeline over `workload` and returns the verdict for every
/// component, every core, and the system as a whole.
pub fn analyze(workload: &Workload) -> SystemVerdict {
    let components: Vec<ComponentVerdict> =
        workload.components.iter().map(|c| analyze_component(workload, c)).collect();

    let cores: Vec<CoreVerdict> =
        workload.cores.iter().map(|core| analyze_core(core, &components)).collect();

    let schedulable = cores.iter().all(|c| c.hierarchical_ok);

    SystemVerdict { schedulable, components, cores }
}

/// Step 3 of the pipeline: derive `component`'s BDR interface from its PRM
/// budget and test its task set's demand against that interface's supply.
fn analyze_component(workload: &Workload, component: &Component) -> ComponentVerdict {
    let tasks = workload.ordered_tasks_of(&component.id);

    // Q_c = 0 is rejected by `Component::new`, but the zero-budget guard is
    // kept here too: a BDR can still be handed to `analyze_component`
    // directly with an explicit (0, *) interface by a future caller, and
    // the guard's behavior (unschedulable, delta forced to 0, no test run)
    // is cheaper to keep correct than to re-derive later.
    if component.budget == 0.0 {
        return ComponentVerdict {
            component_id: component.id.clone(),
            core_id: component.core_id,
            scheduler: component.scheduler,
            alpha: 0.0,
            delta: 0.0,
            q_s: 0.0,
            p_s: 0.0,
            local_schedulable: tasks.is_empty(),
        };
    }

    let bdr = Bdr::from_prm(component.budget, component.period);
    let (q_s, p_s) = bdr.to_prm();

    let local_schedulable = if tasks.is_empty() {
        true
    } else {
        match component.scheduler {
            Scheduler::Edf => edf_schedulable(&tasks, &bdr, component.period),
            Scheduler::Rm => rm_schedulable(&tasks, &bdr),
        }
    };

    ComponentVerdict {
        component_id: component.id.clone(),
        core_id: component.core_id,
        scheduler: component.scheduler,
        alpha: bdr.rate,
        delta: bdr.delay,
        q_s,
        p_s,
        local_schedulable,
    }
}

/// The EDF local test: `dbf_edf(W, t) <= sbf(t)` at every multiple of every
/// task period up to the component's hyperperiod.
fn edf_schedulable(tasks: &[&Task], bdr: &Bdr, component_period: crate::time::Time) -> bool {
    let periods: Vec<crate::time::Time> = tasks.iter().map(|t| t.period).collect();
    let hyperperiod = component_hyperperiod(&periods, component_period);
    critical_points_up_to(tasks, hyperperiod).into_iter().all(|t| dbf_edf(tasks, t) <= bdr.sbf(t) + 1e-9)
}

/// The RM local test: for every task `i`, some critical point `t <= T_i`
/// with `dbf_rm(W, t, i) <= sbf(t)`.
///
/// `tasks` must already be in priority order, as [`Workload::ordered_tasks_of`]
/// guarantees for an RM component. The critical-point set used here is the
/// global multiples-of-periods set bounded by `max T_tau` rather than a
/// per-task set bounded by `T_i`; for implicit deadlines the two are
/// equivalent, and the global set is cheaper to compute once per component.
fn rm_schedulable(tasks: &[&Task], bdr: &Bdr) -> bool {
    let max_period = tasks.iter().map(|t| t.period).max().unwrap_or(0);
    let points = critical_points_up_to(tasks, max_period);

    tasks.iter().enumerate().all(|(i, task)| {
        points
            .iter()
            .filter(|&&t| t <= task.period)
            .any(|&t| dbf_rm(tasks, t, i) <= bdr.sbf(t) + 1e-9)
    })
}

/// The sorted, deduplicated set of every multiple of every task's period
/// that does not exceed `bound`.
fn critical_points_up_to(tasks: &[&Task], bound: crate::time::Time) -> Vec<crate::time::Time> {
    let mut points: Vec<crate::time::Time> = tasks
        .iter()
        .flat_map(|task| {
            std::iter::successors(Some(task.period), move |&k| Some(k + task.period))
                .take_while(move |&k| k <= bound)
        })
        .collect();
    points.sort_unstable();
    points.dedup();
    points
}

/// Step 4 of the pipeline: the compositional (Theorem 1) test for every
/// component resident on `core`, against the full, undelayed CPU.
fn analyze_core(core: &Core, components: &[ComponentVerdict]) -> CoreVerdict {
    let resident: Vec<&ComponentVerdict> =
        components.iter().filter(|c| c.core_id == core.id).collect();

    let children: Vec<Bdr> = resident.iter().map(|c| Bdr::new(c.alpha, c.delta)).collect();
    let parent = Bdr::full_cpu();
    let compositional_ok = Bdr::can_host(&parent, &children);
    let indiv_ok = resident.iter().all(|c| c.local_schedulable);

    CoreVerdict {
        core_id: core.id,
        indiv_ok,
        compositional_ok,
        hierarchical_ok: compositional_ok && indiv_ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::{Core as WorkloadCore, Scheduler, Task};
    use assert_approx_eq::assert_approx_eq;

    fn single_task_workload() -> Workload {
        // single task, single component, full core
        let cores = vec![WorkloadCore::new(0, 1.0, Scheduler::Edf).unwrap()];
        let components = vec![Component::new("c", 0, Scheduler::Edf, 5.0, 10.0, None).unwrap()];
        let tasks = vec![Task::new("t", 2.0, 10, "c", None).unwrap()];
        Workload::new(cores, components, tasks).unwrap()
    }

    #[test]
    fn single_task_component_is_schedulable() {
        let workload = single_task_workload();
        let verdict = analyze(&workload);
        let component = verdict.component("c").unwrap();
        assert_approx_eq!(component.alpha, 0.5);
        assert_approx_eq!(component.delta, 10.0);
        assert!(component.local_schedulable);
        assert!(verdict.schedulable);
    }

    #[test]
    fn rm_component_schedulable_with_two_priority_levels() {
        let cores = vec![WorkloadCore::new(0, 1.0, Scheduler::Rm).unwrap()];
        let components = vec![Component::new("c", 0, Scheduler::Rm, 9.0, 10.0, Some(1)).unwrap()];
        let tasks = vec![
            Task::new("tau1", 2.0, 5, "c", Some(1)).unwrap(),
            Task::new("tau2", 3.0, 10, "c", Some(2)).unwrap(),
        ];
        let workload = Workload::new(cores, components, tasks).unwrap();
        let verdict = analyze(&workload);
        assert!(verdict.component("c").unwrap().local_schedulable);
    }

    #[test]
    fn rm_component_fails_when_delay_outlasts_the_high_priority_period() {
        // A tight budget drives delta past tau1's own period, so tau1 never
        // sees positive supply before its deadline even though the
        // component's long-run rate would otherwise cover it.
        let cores = vec![WorkloadCore::new(0, 1.0, Scheduler::Rm).unwrap()];
        let components = vec![Component::new("c", 0, Scheduler::Rm, 6.0, 10.0, Some(1)).unwrap()];
        let tasks = vec![
            Task::new("tau1", 2.0, 5, "c", Some(1)).unwrap(),
            Task::new("tau2", 3.0, 10, "c", Some(2)).unwrap(),
        ];
        let workload = Workload::new(cores, components, tasks).unwrap();
        let verdict = analyze(&workload);
        assert!(!verdict.component("c").unwrap().local_schedulable);
    }

    #[test]
    fn overloaded_component_is_unschedulable() {
        // Q=3, P=10 hosting tasks with total utilization 0.6: infeasible
        let cores = vec![WorkloadCore::new(0, 1.0, Scheduler::Edf).unwrap()];
        let components = vec![Component::new("c", 0, Scheduler::Edf, 3.0, 10.0, None).unwrap()];
        let tasks = vec![
            Task::new("t1", 3.0, 10, "c", None).unwrap(),
            Task::new("t2", 3.0, 10, "c", None).unwrap(),
        ];
        let workload = Workload::new(cores, components, tasks).unwrap();
        let verdict = analyze(&workload);
        assert!(!verdict.component("c").unwrap().local_schedulable);
        assert!(!verdict.schedulable);
    }

    #[test]
    fn hierarchical_overload_fails_compositional_test() {
        // two components at alpha=0.6 sharing one core: rate sum exceeds 1
        let cores = vec![WorkloadCore::new(0, 1.0, Scheduler::Edf).unwrap()];
        let components = vec![
            Component::new("c1", 0, Scheduler::Edf, 6.0, 10.0, None).unwrap(),
            Component::new("c2", 0, Scheduler::Edf, 6.0, 10.0, None).unwrap(),
        ];
        let tasks = vec![
            Task::new("t1", 5.0, 10, "c1", None).unwrap(),
            Task::new("t2", 5.0, 10, "c2", None).unwrap(),
        ];
        let workload = Workload::new(cores, components, tasks).unwrap();
        let verdict = analyze(&workload);
        assert!(!verdict.core(0).unwrap().compositional_ok);
        assert!(!verdict.schedulable);
    }

    #[test]
    fn speed_factor_rescaling_is_reflected_in_alpha() {
        // speed=2 halves the effective wcet
        let cores = vec![WorkloadCore::new(0, 2.0, Scheduler::Edf).unwrap()];
        let components = vec![Component::new("c", 0, Scheduler::Edf, 2.0, 10.0, None).unwrap()];
        let tasks = vec![Task::new("t", 4.0, 10, "c", None).unwrap()];
        let workload = Workload::new(cores, components, tasks).unwrap();
        assert_approx_eq!(workload.tasks[0].wcet, 2.0);
        let verdict = analyze(&workload);
        assert!(verdict.component("c").unwrap().local_schedulable);
    }

    #[test]
    fn empty_task_set_is_trivially_schedulable() {
        let cores = vec![WorkloadCore::new(0, 1.0, Scheduler::Edf).unwrap()];
        let components = vec![Component::new("c", 0, Scheduler::Edf, 5.0, 10.0, None).unwrap()];
        let workload = Workload::new(cores, components, Vec::new()).unwrap();
        assert!(analyze(&workload).component("c").unwrap().local_schedulable);
    }
}
