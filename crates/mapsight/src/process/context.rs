use crate::error::Result;
use crate::process::reader::{FromMemory, ReadMemory};

/// Running game process as reported by process enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
}

/// An attached foreign process.
///
/// Contexts are acquired per frame and released when dropped, so the handle
/// is closed on every exit path of a snapshot read.
pub trait ProcessContext: ReadMemory {
    fn process_id(&self) -> u32;

    /// Base address of the game's main module.
    fn base_address(&self) -> u64;

    /// Native handle of the game's main window, 0 when there is none.
    fn main_window_handle(&self) -> isize;

    /// Read a value at an offset from the main module's base address.
    fn read<T: FromMemory>(&self, offset: u64) -> Result<T> {
        self.read_at(self.base_address().wrapping_add(offset))
    }
}

/// Source of process contexts.
pub trait ProcessProvider {
    type Context: ProcessContext;

    /// All running game processes.
    fn list(&self) -> Result<Vec<ProcessInfo>>;

    /// Attach to `pid`. `Ok(None)` means the process is gone or not attachable.
    fn open(&self, pid: u32) -> Result<Option<Self::Context>>;
}
