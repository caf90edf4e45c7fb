// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Named inter-process counting semaphores.
// POSIX `sem_open` family on Unix, `CreateSemaphoreW` on Windows, with
// ownership-aware unlinking on drop.

pub mod sem_name;
pub mod timespec;

mod platform;

mod error;
pub use error::{Result, SemaphoreError};

mod options;
pub use options::{OpenFlags, SemaphoreOptions, DEFAULT_MODE};

mod handle;
pub use handle::SemaphoreHandle;

mod named;
pub use named::{NamedSemaphore, OwnedSemaphore, SharedSemaphore};
