//! In-memory stand-in for a foreign process, for tests.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::process::context::{ProcessContext, ProcessInfo, ProcessProvider};
use crate::process::reader::ReadMemory;

/// Sparse fake address space. Reading any byte that was never written fails,
/// the same way an unmapped page fails in a real process.
#[derive(Debug, Clone, Default)]
pub struct MockProcess {
    pid: u32,
    base_address: u64,
    main_window: isize,
    bytes: HashMap<u64, u8>,
}

impl MockProcess {
    pub fn write_bytes(&mut self, address: u64, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.bytes.insert(address.wrapping_add(i as u64), *byte);
        }
    }

    pub fn write_u8(&mut self, address: u64, value: u8) {
        self.write_bytes(address, &[value]);
    }

    pub fn write_u16(&mut self, address: u64, value: u16) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_u32(&mut self, address: u64, value: u32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_u64(&mut self, address: u64, value: u64) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    /// Zero-fill a region so that reads of it succeed.
    pub fn map_zeroed(&mut self, address: u64, len: usize) {
        self.write_bytes(address, &vec![0u8; len]);
    }

    /// Make a region unreadable again.
    pub fn unmap(&mut self, address: u64, len: usize) {
        for i in 0..len as u64 {
            self.bytes.remove(&address.wrapping_add(i));
        }
    }
}

impl ReadMemory for MockProcess {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        (0..len as u64)
            .map(|i| {
                self.bytes
                    .get(&address.wrapping_add(i))
                    .copied()
                    .ok_or_else(|| Error::read_failed(address.wrapping_add(i), "unmapped"))
            })
            .collect()
    }
}

impl ProcessContext for MockProcess {
    fn process_id(&self) -> u32 {
        self.pid
    }

    fn base_address(&self) -> u64 {
        self.base_address
    }

    fn main_window_handle(&self) -> isize {
        self.main_window
    }
}

/// Builder for [`MockProcess`].
#[derive(Debug, Default)]
pub struct MockMemoryBuilder {
    process: MockProcess,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pid(mut self, pid: u32) -> Self {
        self.process.pid = pid;
        self
    }

    pub fn base_address(mut self, base: u64) -> Self {
        self.process.base_address = base;
        self
    }

    pub fn main_window(mut self, hwnd: isize) -> Self {
        self.process.main_window = hwnd;
        self
    }

    pub fn write_u32(mut self, address: u64, value: u32) -> Self {
        self.process.write_u32(address, value);
        self
    }

    pub fn write_u64(mut self, address: u64, value: u64) -> Self {
        self.process.write_u64(address, value);
        self
    }

    pub fn build(self) -> MockProcess {
        self.process
    }
}

/// Provider over a fixed set of mock processes.
#[derive(Debug, Default)]
pub struct MockProvider {
    pub processes: HashMap<u32, MockProcess>,
}

impl MockProvider {
    pub fn insert(&mut self, process: MockProcess) {
        self.processes.insert(process.pid, process);
    }
}

impl ProcessProvider for MockProvider {
    type Context = MockProcess;

    fn list(&self) -> Result<Vec<ProcessInfo>> {
        let mut list: Vec<_> = self
            .processes
            .keys()
            .map(|&pid| ProcessInfo {
                pid,
                name: "D2R.exe".to_string(),
            })
            .collect();
        list.sort_by_key(|p| p.pid);
        Ok(list)
    }

    fn open(&self, pid: u32) -> Result<Option<MockProcess>> {
        Ok(self.processes.get(&pid).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_reads_fail() {
        let mut process = MockMemoryBuilder::new()
            .pid(7)
            .write_u32(0x1000, 42)
            .build();
        assert_eq!(process.read_u32(0x1000).unwrap(), 42);
        assert!(process.read_u32(0x1002).is_err());

        process.unmap(0x1000, 1);
        assert!(process.read_u32(0x1000).is_err());
    }

    #[test]
    fn test_base_relative_read() {
        let process = MockMemoryBuilder::new()
            .base_address(0x4000_0000)
            .write_u64(0x4000_0010, 0xDEAD)
            .build();
        assert_eq!(process.read::<u64>(0x10).unwrap(), 0xDEAD);
    }
}
