//! Foreign process access.
//!
//! Everything above this module only sees [`ProcessContext`]: typed reads that
//! may fail, plus the process id and main window handle. The platform
//! implementations live behind [`SystemProcessProvider`].

mod context;
pub mod layout;
mod reader;

#[cfg(not(target_os = "windows"))]
mod linux;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(test)]
pub mod mock;

pub use context::{ProcessContext, ProcessInfo, ProcessProvider};
pub use reader::{ByteBuffer, FromMemory, ReadMemory, decode_name};

#[cfg(not(target_os = "windows"))]
pub use linux::{ProcessHandle, SystemProcessProvider};
#[cfg(target_os = "windows")]
pub use windows::{ProcessHandle, SystemProcessProvider};

#[cfg(test)]
pub use mock::{MockMemoryBuilder, MockProcess, MockProvider};
