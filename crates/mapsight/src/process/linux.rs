//! Process access through procfs, for the game running under Wine/Proton.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind};
use std::os::unix::fs::FileExt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::process::context::{ProcessContext, ProcessInfo, ProcessProvider};
use crate::process::reader::ReadMemory;

/// Longest process name the kernel keeps in `comm`.
const COMM_LEN: usize = 15;

/// Enumerates and attaches to game processes via `/proc`.
#[derive(Debug, Clone)]
pub struct SystemProcessProvider {
    process_name: String,
}

impl SystemProcessProvider {
    pub fn new(process_name: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into(),
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        // comm is truncated to 15 bytes by the kernel
        let wanted = self.process_name.to_ascii_lowercase();
        let candidate = candidate.trim().to_ascii_lowercase();
        candidate == wanted || (candidate.len() == COMM_LEN && wanted.starts_with(&candidate))
    }
}

impl ProcessProvider for SystemProcessProvider {
    type Context = ProcessHandle;

    fn list(&self) -> Result<Vec<ProcessInfo>> {
        let mut found = Vec::new();
        for entry in fs::read_dir("/proc")? {
            let entry = entry?;
            let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok())
            else {
                continue;
            };
            let Ok(comm) = fs::read_to_string(entry.path().join("comm")) else {
                continue;
            };
            if self.matches(&comm) {
                found.push(ProcessInfo {
                    pid,
                    name: comm.trim().to_string(),
                });
            }
        }
        found.sort_by_key(|p| p.pid);
        Ok(found)
    }

    fn open(&self, pid: u32) -> Result<Option<ProcessHandle>> {
        let mem = match File::open(format!("/proc/{pid}/mem")) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::ProcessOpenFailed(format!("pid {pid}: {e}"))),
        };

        let Some(base_address) = find_module_base(pid, &self.process_name)? else {
            debug!("pid {} has no mapping for {}", pid, self.process_name);
            return Ok(None);
        };

        Ok(Some(ProcessHandle {
            pid,
            base_address,
            mem,
        }))
    }
}

/// Start address of the first mapping backed by `module`.
fn find_module_base(pid: u32, module: &str) -> Result<Option<u64>> {
    let maps = match File::open(format!("/proc/{pid}/maps")) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let module = module.to_ascii_lowercase();

    for line in BufReader::new(maps).lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(range) = parts.next() else { continue };
        let Some(path) = parts.nth(4) else { continue };
        if !path.to_ascii_lowercase().ends_with(&module) {
            continue;
        }
        let start = range
            .split('-')
            .next()
            .and_then(|s| u64::from_str_radix(s, 16).ok());
        if start.is_some() {
            return Ok(start);
        }
    }
    Ok(None)
}

/// An open `/proc/<pid>/mem`. Closed on drop.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: u32,
    base_address: u64,
    mem: File,
}

impl ReadMemory for ProcessHandle {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; len];
        self.mem
            .read_exact_at(&mut buffer, address)
            .map_err(|e| Error::read_failed(address, e.to_string()))?;
        Ok(buffer)
    }
}

impl ProcessContext for ProcessHandle {
    fn process_id(&self) -> u32 {
        self.pid
    }

    fn base_address(&self) -> u64 {
        self.base_address
    }

    fn main_window_handle(&self) -> isize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comm_matching_handles_truncation() {
        let provider = SystemProcessProvider::new("D2R.exe");
        assert!(provider.matches("D2R.exe\n"));
        assert!(provider.matches("d2r.exe"));
        assert!(!provider.matches("bash"));
        assert!(!provider.matches(""));

        let long = SystemProcessProvider::new("VeryLongGameName.exe");
        assert!(long.matches("VeryLongGameNam"));
    }

    #[test]
    fn test_open_missing_pid_is_unavailable() {
        let provider = SystemProcessProvider::new("D2R.exe");
        assert!(provider.open(u32::MAX).unwrap().is_none());
    }
}
