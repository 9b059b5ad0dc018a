//! Default process metrics, collected at render time.
//!
//! Uptime and start time come from the app state; resident memory is read
//! from `/proc/self/status` on Linux and omitted elsewhere.

use std::fmt::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use pulsecheck_core::error::Result;

/// Point-in-time runtime readings for the current process.
pub struct ProcessStats {
    pub uptime_seconds: f64,
    pub start_time_seconds: f64,
    pub resident_memory_bytes: Option<u64>,
}

impl ProcessStats {
    /// Collect current readings. `started_at` is the wall-clock instant the
    /// process came up.
    pub fn collect(uptime_seconds: f64, started_at: SystemTime) -> Result<Self> {
        let start_time_seconds = started_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Ok(Self {
            uptime_seconds,
            start_time_seconds,
            resident_memory_bytes: resident_memory_bytes()?,
        })
    }
}

#[cfg(target_os = "linux")]
fn resident_memory_bytes() -> Result<Option<u64>> {
    use pulsecheck_core::error::PulseCheckError;

    let status = std::fs::read_to_string("/proc/self/status")
        .map_err(|e| PulseCheckError::Internal(format!("read /proc/self/status failed: {e}")))?;
    let rss = parse_vm_rss(&status)
        .ok_or_else(|| PulseCheckError::Internal("no VmRSS line in /proc/self/status".into()))?;
    Ok(Some(rss))
}

/// Extract `VmRSS:` from `/proc/self/status` content. Reported in kB, so no
/// dependency on the kernel page size.
#[cfg(target_os = "linux")]
fn parse_vm_rss(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

#[cfg(not(target_os = "linux"))]
fn resident_memory_bytes() -> Result<Option<u64>> {
    Ok(None)
}

/// Append the process metric lines to an exposition snapshot.
pub fn render_into(out: &mut String, stats: &ProcessStats) {
    let _ = writeln!(out, "# HELP process_uptime_seconds Process uptime in seconds");
    let _ = writeln!(out, "# TYPE process_uptime_seconds gauge");
    let _ = writeln!(out, "process_uptime_seconds {}", stats.uptime_seconds);

    let _ = writeln!(
        out,
        "# HELP process_start_time_seconds Start time of the process since unix epoch in seconds"
    );
    let _ = writeln!(out, "# TYPE process_start_time_seconds gauge");
    let _ = writeln!(out, "process_start_time_seconds {}", stats.start_time_seconds);

    if let Some(rss) = stats.resident_memory_bytes {
        let _ = writeln!(
            out,
            "# HELP process_resident_memory_bytes Resident memory size in bytes"
        );
        let _ = writeln!(out, "# TYPE process_resident_memory_bytes gauge");
        let _ = writeln!(out, "process_resident_memory_bytes {rss}");
    }
}

#[cfg(test)]
#[cfg(target_os = "linux")]
mod tests {
    use super::*;

    #[test]
    fn vm_rss_is_reported_in_kb() {
        let status = "Name:\tpulsecheck\nVmPeak:\t   20000 kB\nVmRSS:\t    1234 kB\nThreads:\t5\n";
        assert_eq!(parse_vm_rss(status), Some(1234 * 1024));
    }

    #[test]
    fn missing_vm_rss_line_is_none() {
        assert_eq!(parse_vm_rss("Name:\tpulsecheck\nThreads:\t5\n"), None);
        assert_eq!(parse_vm_rss("VmRSS:\tgarbage kB\n"), None);
    }
}
