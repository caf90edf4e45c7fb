// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Windows implementation of named semaphores via CreateSemaphoreW.
// Kernel objects vanish with their last handle, so there is no unlink.

use std::io;
use std::ptr;
use std::time::{Duration, SystemTime};

use windows_sys::Win32::Foundation::{
    CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, FALSE, HANDLE, WAIT_FAILED, WAIT_OBJECT_0,
    WAIT_TIMEOUT,
};
use windows_sys::Win32::System::Threading::{
    CreateSemaphoreW, OpenSemaphoreW, ReleaseSemaphore, WaitForSingleObject, INFINITE,
    SEMAPHORE_ALL_ACCESS,
};

use crate::options::OpenFlags;

/// Encode a name as a null-terminated wide string for Win32 APIs.
fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

pub struct PlatformSemaphore {
    handle: HANDLE,
}

unsafe impl Send for PlatformSemaphore {}
unsafe impl Sync for PlatformSemaphore {}

impl PlatformSemaphore {
    pub fn open(name: &str, flags: OpenFlags, _mode: u32, value: u32) -> io::Result<Self> {
        let wide_name = to_wide(name);

        if flags == OpenFlags::Open {
            let handle = unsafe { OpenSemaphoreW(SEMAPHORE_ALL_ACCESS, FALSE, wide_name.as_ptr()) };
            if handle.is_null() {
                return Err(io::Error::last_os_error());
            }
            return Ok(Self { handle });
        }

        let initial = i32::try_from(value)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "initial count too large"))?;
        let handle =
            unsafe { CreateSemaphoreW(ptr::null(), initial, i32::MAX, wide_name.as_ptr()) };
        let last = unsafe { GetLastError() };
        if handle.is_null() {
            return Err(io::Error::from_raw_os_error(last as i32));
        }
        if flags == OpenFlags::Create && last == ERROR_ALREADY_EXISTS {
            unsafe { CloseHandle(handle) };
            return Err(io::Error::from_raw_os_error(ERROR_ALREADY_EXISTS as i32));
        }
        Ok(Self { handle })
    }

    fn wait_ms(&self, ms: u32) -> io::Result<bool> {
        let ret = unsafe { WaitForSingleObject(self.handle, ms) };
        match ret {
            WAIT_OBJECT_0 => Ok(true),
            WAIT_TIMEOUT => Ok(false),
            WAIT_FAILED => Err(io::Error::last_os_error()),
            other => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("unexpected wait result {other:#x}"),
            )),
        }
    }

    pub fn wait(&self) -> io::Result<()> {
        self.wait_ms(INFINITE).map(|_| ())
    }

    pub fn try_wait(&self) -> io::Result<bool> {
        self.wait_ms(0)
    }

    pub fn timed_wait(&self, deadline: SystemTime) -> io::Result<bool> {
        loop {
            let remaining = deadline
                .duration_since(SystemTime::now())
                .unwrap_or(Duration::ZERO);
            // Round up so we never wake before the deadline; stay below INFINITE.
            let ms = remaining.as_nanos().div_ceil(1_000_000).min((INFINITE - 1) as u128) as u32;
            if self.wait_ms(ms)? {
                return Ok(true);
            }
            if SystemTime::now() >= deadline {
                return Ok(false);
            }
        }
    }

    pub fn post(&self) -> io::Result<()> {
        if unsafe { ReleaseSemaphore(self.handle, 1, ptr::null_mut()) } == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    pub fn unlink(_name: &str) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for PlatformSemaphore {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { CloseHandle(self.handle) };
        }
    }
}
