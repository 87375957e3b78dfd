use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence number handed to one export action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExportTicket(u64);

impl ExportTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Latest-request-wins guard: only the most recently issued ticket may apply its result.
#[derive(Debug, Default)]
pub struct ExportGuard {
    latest: AtomicU64,
}

impl ExportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket that supersedes every earlier one.
    pub fn begin(&self) -> ExportTicket {
        ExportTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: ExportTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/guard.rs"]
mod tests;
