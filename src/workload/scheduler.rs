/// A scheduling policy, shared by cores, components, and the tasks within a
/// component.
///
/// Dispatch on this tag is a two-arm branch wherever it matters (core
/// selection, component-local selection, the demand-bound test); there is no
/// virtual dispatch, per the "Polymorphism over scheduler" design note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheduler {
    /// Earliest Deadline First: dynamic priority by absolute deadline.
    Edf,
    /// Rate Monotonic: static priority by a declared priority number
    /// (smaller means higher priority).
    Rm,
}

impl Scheduler {
    /// `true` for [`Scheduler::Rm`], where every scheduled entity must
    /// declare a priority.
    pub fn requires_priority(self) -> bool {
        matches!(self, Scheduler::Rm)
    }
}
