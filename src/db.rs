pub mod dashboard_repo;
pub use dashboard_repo::{DashboardRepository, LedgerStore};

#[cfg(test)]
pub mod memory_ledger;
#[cfg(test)]
pub use memory_ledger::MemoryLedger;
