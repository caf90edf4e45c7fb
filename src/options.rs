// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Open/create options for named semaphores.

/// How `sem_open` treats an existing or missing object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenFlags {
    /// Open existing — fail if it does not exist.
    Open,
    /// Create exclusively — fail if already exists.
    Create,
    /// Create if missing, open if it already exists.
    #[default]
    CreateOrOpen,
}

impl OpenFlags {
    #[cfg(unix)]
    pub(crate) fn as_oflag(self) -> libc::c_int {
        match self {
            OpenFlags::Open => 0,
            OpenFlags::Create => libc::O_CREAT | libc::O_EXCL,
            OpenFlags::CreateOrOpen => libc::O_CREAT,
        }
    }

    pub fn may_create(self) -> bool {
        self != OpenFlags::Open
    }
}

/// Default permission bits: read/write for user, group and other.
pub const DEFAULT_MODE: u32 = 0o666;

/// Options passed to `SemaphoreHandle::open`.
///
/// `mode` and `initial_count` only matter when the call creates the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemaphoreOptions {
    pub flags: OpenFlags,
    pub mode: u32,
    pub initial_count: u32,
}

impl Default for SemaphoreOptions {
    fn default() -> Self {
        Self {
            flags: OpenFlags::CreateOrOpen,
            mode: DEFAULT_MODE,
            initial_count: 0,
        }
    }
}

impl SemaphoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn initial_count(mut self, count: u32) -> Self {
        self.initial_count = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = SemaphoreOptions::default();
        assert_eq!(o.flags, OpenFlags::CreateOrOpen);
        assert_eq!(o.mode, 0o666);
        assert_eq!(o.initial_count, 0);
    }

    #[test]
    fn builder_overrides() {
        let o = SemaphoreOptions::new()
            .flags(OpenFlags::Create)
            .mode(0o600)
            .initial_count(3);
        assert_eq!(o.flags, OpenFlags::Create);
        assert_eq!(o.mode, 0o600);
        assert_eq!(o.initial_count, 3);
        assert!(o.flags.may_create());
        assert!(!OpenFlags::Open.may_create());
    }

    #[cfg(unix)]
    #[test]
    fn oflag_mapping() {
        assert_eq!(OpenFlags::Open.as_oflag(), 0);
        assert_eq!(OpenFlags::CreateOrOpen.as_oflag(), libc::O_CREAT);
        assert_eq!(OpenFlags::Create.as_oflag(), libc::O_CREAT | libc::O_EXCL);
    }
}
