//! Process access through the Win32 API.

use std::ffi::c_void;

use tracing::{debug, warn};
use windows::Win32::Foundation::{BOOL, CloseHandle, HANDLE, HWND, LPARAM};
use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, PROCESSENTRY32W, Process32FirstW,
    Process32NextW, TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowThreadProcessId, IsWindowVisible,
};

use crate::error::{Error, Result};
use crate::process::context::{ProcessContext, ProcessInfo, ProcessProvider};
use crate::process::reader::ReadMemory;

/// Enumerates and attaches to game processes via ToolHelp snapshots.
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
}

fn wide_to_string(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..len])
}

/// Owned snapshot handle, closed on drop.
struct Snapshot(HANDLE);

impl Drop for Snapshot {
    fn drop(&mut self) {
        // SAFETY: the handle came from CreateToolhelp32Snapshot and is closed once.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

impl ProcessProvider for SystemProcessProvider {
    type Context = ProcessHandle;

    fn list(&self) -> Result<Vec<ProcessInfo>> {
        // SAFETY: plain snapshot creation, the handle is owned by `Snapshot`.
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .map(Snapshot)
            .map_err(|e| Error::ProcessNotFound(format!("process snapshot failed: {e}")))?;

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        let mut found = Vec::new();
        // SAFETY: `entry` is a properly sized PROCESSENTRY32W.
        let mut more = unsafe { Process32FirstW(snapshot.0, &mut entry) }.is_ok();
        while more {
            let name = wide_to_string(&entry.szExeFile);
            if name.eq_ignore_ascii_case(&self.process_name) {
                found.push(ProcessInfo {
                    pid: entry.th32ProcessID,
                    name,
                });
            }
            // SAFETY: same snapshot and entry as above.
            more = unsafe { Process32NextW(snapshot.0, &mut entry) }.is_ok();
        }

        Ok(found)
    }

    fn open(&self, pid: u32) -> Result<Option<ProcessHandle>> {
        // SAFETY: the returned handle is owned by `ProcessHandle` and closed on drop.
        let handle = match unsafe {
            OpenProcess(PROCESS_VM_READ | PROCESS_QUERY_INFORMATION, false, pid)
        } {
            Ok(handle) => handle,
            Err(e) => {
                debug!("OpenProcess({}) failed: {}", pid, e);
                return Ok(None);
            }
        };
        let mut process = ProcessHandle {
            pid,
            handle,
            base_address: 0,
            main_window: 0,
        };

        process.base_address = match module_base(pid) {
            Ok(base) => base,
            Err(e) => {
                warn!("Could not resolve module base for pid {}: {}", pid, e);
                return Ok(None);
            }
        };
        process.main_window = find_main_window(pid);

        Ok(Some(process))
    }
}

fn module_base(pid: u32) -> Result<u64> {
    // SAFETY: plain snapshot creation, the handle is owned by `Snapshot`.
    let snapshot =
        unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid) }
            .map(Snapshot)
            .map_err(|e| Error::ProcessOpenFailed(format!("module snapshot failed: {e}")))?;

    let mut entry = MODULEENTRY32W {
        dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
        ..Default::default()
    };
    // SAFETY: `entry` is a properly sized MODULEENTRY32W.
    unsafe { Module32FirstW(snapshot.0, &mut entry) }
        .map_err(|e| Error::ProcessOpenFailed(format!("no main module: {e}")))?;

    Ok(entry.modBaseAddr as u64)
}

struct WindowSearch {
    pid: u32,
    hwnd: isize,
}

unsafe extern "system" fn enum_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam points at the WindowSearch owned by find_main_window.
    let search = unsafe { &mut *(lparam.0 as *mut WindowSearch) };
    let mut owner = 0u32;
    // SAFETY: hwnd is supplied by EnumWindows.
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut owner as *mut u32)) };
    if owner == search.pid && unsafe { IsWindowVisible(hwnd) }.as_bool() {
        search.hwnd = hwnd.0 as isize;
        return BOOL(0);
    }
    BOOL(1)
}

fn find_main_window(pid: u32) -> isize {
    let mut search = WindowSearch { pid, hwnd: 0 };
    // SAFETY: the callback only touches `search`, which outlives the call.
    // EnumWindows reports an error when the callback stops early; that is the
    // found case, so the result is ignored.
    let _ = unsafe {
        EnumWindows(
            Some(enum_window),
            LPARAM(&mut search as *mut WindowSearch as isize),
        )
    };
    search.hwnd
}

/// An open process handle. Closed on drop.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: u32,
    handle: HANDLE,
    base_address: u64,
    main_window: isize,
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from OpenProcess and is closed once.
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}

impl ReadMemory for ProcessHandle {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; len];
        let mut read = 0usize;
        // SAFETY: `buffer` has room for `len` bytes.
        unsafe {
            ReadProcessMemory(
                self.handle,
                address as *const c_void,
                buffer.as_mut_ptr().cast(),
                len,
                Some(&mut read as *mut usize),
            )
        }
        .map_err(|e| Error::read_failed(address, e.to_string()))?;

        if read != len {
            return Err(Error::read_failed(
                address,
                format!("partial read: {read} of {len} bytes"),
            ));
        }
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
        self.main_window
    }
}
