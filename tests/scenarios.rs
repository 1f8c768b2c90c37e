//! End-to-end scenarios exercising the analyzer and the simulator together
//! over the same workload, the way a real input file would be consumed.

use hsf::analyzer;
use hsf::simulator::{self, SimConfig};
use hsf::workload::{Component, Core, Scheduler, Task, Workload};

fn deterministic_config() -> SimConfig {
    SimConfig { hyperperiod_cap: 3, lower_bound_fraction: 1.0, seed: 1 }
}

#[test]
fn single_task_single_component_full_core() {
    let cores = vec![Core::new(0, 1.0, Scheduler::Edf).unwrap()];
    let components = vec![Component::new("c", 0, Scheduler::Edf, 5.0, 10.0, None).unwrap()];
    let tasks = vec![Task::new("t", 2.0, 10, "c", None).unwrap()];
    let workload = Workload::new(cores, components, tasks).unwrap();

    let verdict = analyzer::analyze(&workload);
    let component = verdict.component("c").unwrap();
    assert_eq!(component.alpha, 0.5);
    assert_eq!(component.delta, 10.0);
    assert!(component.local_schedulable);
    assert!(verdict.schedulable);

    let report = simulator::run(workload, deterministic_config());
    let result = report.task("t").unwrap();
    assert_eq!(result.avg_response_time, 2.0);
    assert_eq!(result.max_response_time, 2.0);
    assert!(result.task_schedulable);
    assert_eq!(report.component_schedulable("c"), Some(true));
}

#[test]
fn rm_two_task_component() {
    let cores = vec![Core::new(0, 1.0, Scheduler::Rm).unwrap()];
    let components = vec![Component::new("c", 0, Scheduler::Rm, 9.0, 10.0, Some(1)).unwrap()];
    let tasks = vec![
        Task::new("tau1", 2.0, 5, "c", Some(1)).unwrap(),
        Task::new("tau2", 3.0, 10, "c", Some(2)).unwrap(),
    ];
    let workload = Workload::new(cores, components, tasks).unwrap();

    let verdict = analyzer::analyze(&workload);
    assert!(verdict.component("c").unwrap().local_schedulable);
    assert!(verdict.schedulable);

    let report = simulator::run(workload, deterministic_config());
    assert!(report.task("tau1").unwrap().task_schedulable);
    assert!(report.task("tau2").unwrap().task_schedulable);
}

#[test]
fn speed_factor_rescaling_feeds_both_pipelines() {
    let cores = vec![Core::new(0, 2.0, Scheduler::Edf).unwrap()];
    let components = vec![Component::new("c", 0, Scheduler::Edf, 4.0, 10.0, None).unwrap()];
    let tasks = vec![Task::new("t", 4.0, 10, "c", None).unwrap()];
    let workload = Workload::new(cores, components, tasks).unwrap();
    assert_eq!(workload.tasks[0].wcet, 2.0);

    let verdict = analyzer::analyze(&workload);
    assert!(verdict.component("c").unwrap().local_schedulable);

    let report = simulator::run(workload, deterministic_config());
    assert_eq!(report.task("t").unwrap().avg_response_time, 2.0);
}

#[test]
fn unschedulable_overload_is_caught_by_both_pipelines() {
    let cores = vec![Core::new(0, 1.0, Scheduler::Edf).unwrap()];
    let components = vec![Component::new("c", 0, Scheduler::Edf, 3.0, 10.0, None).unwrap()];
    let tasks = vec![
        Task::new("t1", 3.0, 10, "c", None).unwrap(),
        Task::new("t2", 3.0, 10, "c", None).unwrap(),
    ];
    let workload = Workload::new(cores, components, tasks).unwrap();

    let verdict = analyzer::analyze(&workload);
    assert!(!verdict.component("c").unwrap().local_schedulable);
    assert!(!verdict.schedulable);

    let report = simulator::run(workload, deterministic_config());
    assert_eq!(report.component_schedulable("c"), Some(false));
}

#[test]
fn hierarchical_infeasibility_despite_locally_schedulable_components() {
    let cores = vec![Core::new(0, 1.0, Scheduler::Edf).unwrap()];
    let components = vec![
        Component::new("c1", 0, Scheduler::Edf, 6.0, 10.0, None).unwrap(),
        Component::new("c2", 0, Scheduler::Edf, 6.0, 10.0, None).unwrap(),
    ];
    let tasks = vec![
        Task::new("t1", 5.0, 10, "c1", None).unwrap(),
        Task::new("t2", 5.0, 10, "c2", None).unwrap(),
    ];
    let workload = Workload::new(cores, components, tasks).unwrap();

    let verdict = analyzer::analyze(&workload);
    assert!(verdict.component("c1").unwrap().local_schedulable);
    assert!(verdict.component("c2").unwrap().local_schedulable);
    assert!(!verdict.core(0).unwrap().compositional_ok);
    assert!(!verdict.schedulable);
}

#[test]
fn half_half_boundary_relaxes_delay_at_the_root() {
    use hsf::bdr::Bdr;

    let parent = Bdr::full_cpu();
    let child = Bdr::new(0.5, 0.0);
    assert!(Bdr::can_host(&parent, &[child]));
}

#[test]
fn compositional_monotonicity_holds_across_the_pipeline() {
    let cores = vec![Core::new(0, 1.0, Scheduler::Edf).unwrap()];
    let weak_components =
        vec![Component::new("c", 0, Scheduler::Edf, 4.0, 10.0, None).unwrap()];
    let tasks = vec![Task::new("t", 3.0, 10, "c", None).unwrap()];
    let workload = Workload::new(cores, weak_components, tasks).unwrap();
    assert!(analyzer::analyze(&workload).schedulable);

    let cores = vec![Core::new(0, 1.0, Scheduler::Edf).unwrap()];
    let stronger_components =
        vec![Component::new("c", 0, Scheduler::Edf, 8.0, 10.0, None).unwrap()];
    let tasks = vec![Task::new("t", 3.0, 10, "c", None).unwrap()];
    let workload = Workload::new(cores, stronger_components, tasks).unwrap();
    assert!(analyzer::analyze(&workload).schedulable);
}
