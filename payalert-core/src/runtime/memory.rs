use serde::Serialize;

/// Process memory figures in kilobytes, as reported by the kernel.
///
/// Only populated on Linux; every field is `None` elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    pub rss_kb: Option<u64>,
    pub peak_rss_kb: Option<u64>,
    pub virtual_kb: Option<u64>,
}

impl MemorySnapshot {
    pub fn capture() -> Self {
        match std::fs::read_to_string("/proc/self/status") {
            Ok(status) => Self::from_proc_status(&status),
            Err(_) => Self::default(),
        }
    }

    /// Parse the `VmRSS`, `VmHWM` and `VmSize` lines of `/proc/<pid>/status`.
    pub fn from_proc_status(status: &str) -> Self {
        let mut snapshot = Self::default();

        for line in status.lines() {
            let Some((key, rest)) = line.split_once(':') else {
                continue;
            };
            let value = rest
                .split_whitespace()
                .next()
                .and_then(|v| v.parse::<u64>().ok());

            match key {
                "VmRSS" => snapshot.rss_kb = value,
                "VmHWM" => snapshot.peak_rss_kb = value,
                "VmSize" => snapshot.virtual_kb = value,
                _ => {}
            }
        }

        snapshot
    }
}
