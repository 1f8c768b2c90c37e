/*! Typed records for the three input tables and the two output reports
, plus thin `csv`-backed read/write helpers.

This is the one module that touches delimited text; everything else in the
crate consumes and produces the typed [`Workload`], [`analyzer::SystemVerdict`],
and [`simulator::SimulationReport`] values this module translates to and
from rows. */

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzer::SystemVerdict;
use crate::error::InputError;
use crate::simulator::SimulationReport;
use crate::workload::{Component, Core, Scheduler, Task, Workload};

/// A row of the architecture table: `core_id, speed_factor, scheduler`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchitectureRow {
    pub core_id: i64,
    pub speed_factor: f64,
    pub scheduler: String,
}

/// A row of the budgets table: `component_id, scheduler, budget, period,
/// core_id, priority`.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetRow {
    pub component_id: String,
    pub scheduler: String,
    pub budget: f64,
    pub period: f64,
    pub core_id: i64,
    #[serde(default)]
    pub priority: Option<i64>,
}

/// A row of the tasks table: `task_name, wcet, period, component_id,
/// priority`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRow {
    pub task_name: String,
    pub wcet: f64,
    pub period: i64,
    pub component_id: String,
    #[serde(default)]
    pub priority: Option<i64>,
}

/// One row of the analyzer report: per-component verdict plus the
/// derived BDR/PRM values.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerReportRow {
    pub component_id: String,
    pub core_id: i64,
    pub scheduler: String,
    pub alpha: f64,
    pub delta: f64,
    pub q_s: f64,
    pub p_s: f64,
    pub local_schedulable: bool,
}

/// One row of the per-core section of the analyzer report.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerCoreRow {
    pub core_id: i64,
    pub indiv_ok: bool,
    pub compositional_ok: bool,
    pub hierarchical_ok: bool,
}

/// One row of the simulator report.
#[derive(Debug, Clone, Serialize)]
pub struct SimulatorReportRow {
    pub task_name: String,
    pub component_id: String,
    pub task_schedulable: u8,
    pub avg_response_time: f64,
    pub max_response_time: f64,
    pub component_schedulable: u8,
}

fn parse_scheduler(table: &'static str, row: usize, tag: &str) -> Result<Scheduler, InputError> {
    match tag.trim().to_uppercase().as_str() {
        "EDF" => Ok(Scheduler::Edf),
        "RM" => Ok(Scheduler::Rm),
        _ => Err(InputError::UnknownScheduler { table, row, tag: tag.to_string() }),
    }
}

/// Reads the architecture table at `path` and validates every core.
pub fn read_architecture(path: impl AsRef<Path>) -> Result<Vec<Core>, InputError> {
    let rows: Vec<ArchitectureRow> = read_rows("architecture", path)?;
    rows.into_iter()
        .enumerate()
        .map(|(row, r)| {
            let scheduler = parse_scheduler("architecture", row, &r.scheduler)?;
            Core::new(r.core_id, r.speed_factor, scheduler)
        })
        .collect()
}

/// Reads the budgets table at `path` and validates every component.
pub fn read_budgets(path: impl AsRef<Path>) -> Result<Vec<Component>, InputError> {
    let rows: Vec<BudgetRow> = read_rows("budgets", path)?;
    rows.into_iter()
        .enumerate()
        .map(|(row, r)| {
            let scheduler = parse_scheduler("budgets", row, &r.scheduler)?;
            Component::new(r.component_id, r.core_id, scheduler, r.budget, r.period, r.priority)
        })
        .collect()
}

/// Reads the tasks table at `path` and validates every task.
pub fn read_tasks(path: impl AsRef<Path>) -> Result<Vec<Task>, InputError> {
    let rows: Vec<TaskRow> = read_rows("tasks", path)?;
    rows.into_iter()
        .map(|r| Task::new(r.task_name, r.wcet, r.period, r.component_id, r.priority))
        .collect()
}

/// Reads and builds the full, cross-validated [`Workload`] from the three
/// input files.
pub fn read_workload(
    architecture_path: impl AsRef<Path>,
    budgets_path: impl AsRef<Path>,
    tasks_path: impl AsRef<Path>,
) -> Result<Workload, InputError> {
    let cores = read_architecture(architecture_path)?;
    let components = read_budgets(budgets_path)?;
    let tasks = read_tasks(tasks_path)?;
    Workload::new(cores, components, tasks)
}

fn read_rows<T: for<'de> Deserialize<'de>>(
    table: &'static str,
    path: impl AsRef<Path>,
) -> Result<Vec<T>, InputError> {
    let mut reader = csv::Reader::from_path(path.as_ref())
        .map_err(|_| InputError::MissingColumn { table, row: 0, column: "<file>" })?;

    reader
        .deserialize()
        .enumerate()
        .map(|(row, record)| {
            record.map_err(|e| missing_or_unparsable(table, row, &e))
        })
        .collect()
}

fn missing_or_unparsable(table: &'static str, row: usize, err: &csv::Error) -> InputError {
    InputError::Unparsable {
        table,
        row,
        column: "<row>",
        value: err.to_string(),
        expected: "a well-formed row",
    }
}

/// Flattens a [`SystemVerdict`] into the two report row kinds.
pub fn analyzer_rows(verdict: &SystemVerdict) -> (Vec<AnalyzerReportRow>, Vec<AnalyzerCoreRow>) {
    let components = verdict
        .components
        .iter()
        .map(|c| AnalyzerReportRow {
            component_id: c.component_id.clone(),
            core_id: c.core_id,
            scheduler: match c.scheduler {
                Scheduler::Edf => "EDF".to_string(),
                Scheduler::Rm => "RM".to_string(),
            },
            alpha: c.alpha,
            delta: c.delta,
            q_s: c.q_s,
            p_s: c.p_s,
            local_schedulable: c.local_schedulable,
        })
        .collect();

    let cores = verdict
        .cores
        .iter()
        .map(|c| AnalyzerCoreRow {
            core_id: c.core_id,
            indiv_ok: c.indiv_ok,
            compositional_ok: c.compositional_ok,
            hierarchical_ok: c.hierarchical_ok,
        })
        .collect();

    (components, cores)
}

/// Flattens a [`SimulationReport`] into the output rows, joining in each
/// task's component-level schedulability.
pub fn simulator_rows(report: &SimulationReport) -> Vec<SimulatorReportRow> {
    report
        .tasks
        .iter()
        .map(|t| {
            let component_schedulable =
                report.component_schedulable(&t.component_id).unwrap_or(false);
            SimulatorReportRow {
                task_name: t.task_id.clone(),
                component_id: t.component_id.clone(),
                task_schedulable: t.task_schedulable as u8,
                avg_response_time: t.avg_response_time,
                max_response_time: t.max_response_time,
                component_schedulable: component_schedulable as u8,
            }
        })
        .collect()
}

/// Writes `rows` to `path` as a delimited file with a header row.
pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<(), InputError> {
    let mut writer = csv::Writer::from_path(path.as_ref())
        .map_err(|_| InputError::MissingColumn { table: "output", row: 0, column: "<file>" })?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| missing_or_unparsable("output", 0, &e))?;
    }
    writer.flush().map_err(|_| InputError::MissingColumn { table: "output", row: 0, column: "<flush>" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_scheduler_tags_case_insensitively() {
        assert_eq!(parse_scheduler("t", 0, "edf").unwrap(), Scheduler::Edf);
        assert_eq!(parse_scheduler("t", 0, "RM").unwrap(), Scheduler::Rm);
    }

    #[test]
    fn rejects_unknown_scheduler_tag() {
        assert!(parse_scheduler("t", 0, "fifo").is_err());
    }
}
