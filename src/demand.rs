/*! The *demand bound function* (DBF) abstraction.

Three pure functions over a task set and an interval length, one per
scheduling regime. Per the "Polymorphism over demand" design note, these
are free functions parametrized by the task set and the regime, not a
trait hierarchy — there is exactly one shape of bound per scheduler, and
no client ever needs to substitute a different DBF implementation for the
same regime. */

use crate::time::{Real, Time};
use crate::workload::Task;

/// `dbf_EDF(W, t) = sum_{tau in W} floor(t / T_tau) * C_tau`, the demand
/// bound function for earliest-deadline-first scheduling of
/// implicit-deadline tasks.
///
/// Non-decreasing in `t`; `dbf_edf(W, 0) == 0`.
pub fn dbf_edf(tasks: &[&Task], t: Time) -> Real {
    if t <= 0 {
        return 0.0;
    }
    tasks
        .iter()
        .map(|task| ((t / task.period) as Real) * task.wcet)
        .sum()
}

/// `dbf_EDF(W, t) = sum_{tau in W} max(0, floor((t + T_tau - D_tau) / T_tau)) * C_tau`,
/// the explicit-deadline generalization of [`dbf_edf`].
///
/// With implicit deadlines (`D_tau = T_tau`) this coincides with
/// [`dbf_edf`]; it is kept separate because the two read differently at a
/// call site and because a future explicit-deadline extension should not
/// have to touch the implicit-deadline fast path.
pub fn dbf_edf_explicit(tasks: &[&Task], t: Time) -> Real {
    tasks
        .iter()
        .map(|task| {
            let deadline = task.deadline();
            let jobs = (t + task.period - deadline) as f64 / task.period as f64;
            let jobs = jobs.floor().max(0.0) as i64;
            jobs as Real * task.wcet
        })
        .sum()
}

/// `dbf_RM(W, t, i) = C_i + sum_{k: prio(k) > prio(i)} ceil(t / T_k) * C_k`,
/// the demand bound function for the task at index `i` under rate-monotonic
/// scheduling.
///
/// `tasks` must already be in priority order (lowest priority number =
/// highest priority, i.e. interference comes only from the tasks strictly
/// before index `i`). `dbf_rm(W, 0, i) == C_i`.
pub fn dbf_rm(tasks: &[&Task], t: Time, i: usize) -> Real {
    let mut demand = tasks[i].wcet;
    for higher in &tasks[..i] {
        let invocations = div_ceil(t, higher.period);
        demand += invocations as Real * higher.wcet;
    }
    demand
}

fn div_ceil(a: Time, b: Time) -> Time {
    if a <= 0 {
        0
    } else {
        (a + b - 1) / b
    }
}
