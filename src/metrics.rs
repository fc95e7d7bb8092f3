//! Process resource metrics for the stats endpoint

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Source of process-level resource figures
pub trait ProcessMetrics: Send + Sync {
    /// Resident memory of the current process in MiB
    fn memory_mib(&self) -> Option<f64>;
}

/// Reads the current process's memory through `sysinfo`
#[derive(Debug, Default)]
pub struct SysinfoMetrics;

impl SysinfoMetrics {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessMetrics for SysinfoMetrics {
    fn memory_mib(&self) -> Option<f64> {
        let pid = sysinfo::get_current_pid().ok()?;
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        system
            .process(pid)
            .map(|process| process.memory() as f64 / BYTES_PER_MIB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sysinfo_reports_nonzero_memory_for_self() {
        if let Some(mib) = SysinfoMetrics::new().memory_mib() {
            assert!(mib > 0.0);
        }
    }
}
