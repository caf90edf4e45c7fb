// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Named-semaphore name mangling.
// Produces POSIX-safe semaphore names: leading '/', hashed shortening where
// the platform limit is small.

/// FNV-1a 64-bit hash.
pub fn fnv1a_64(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in data {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Convert a 64-bit value to a fixed-width 16-char lowercase hex string.
fn to_hex(val: u64) -> [u8; 16] {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut buf = [0u8; 16];
    let mut v = val;
    for i in (0..16).rev() {
        buf[i] = DIGITS[(v & 0xf) as usize];
        v >>= 4;
    }
    buf
}

/// Maximum length for POSIX semaphore names. 0 disables shortening.
///
/// macOS rejects names longer than `PSEMNAMLEN` (31) with `ENAMETOOLONG`.
/// On Linux the name becomes `/dev/shm/sem.<name>` and the limit is
/// `NAME_MAX - 4`, which is large enough that we leave it to the OS.
#[cfg(target_os = "macos")]
pub const SEM_NAME_MAX: usize = 31;

#[cfg(not(target_os = "macos"))]
pub const SEM_NAME_MAX: usize = 0;

/// Produce the platform name for a semaphore (with leading '/').
///
/// When `SEM_NAME_MAX > 0`, names whose POSIX form would exceed the limit
/// are shortened to `/<prefix>_<16-hex-FNV-1a-hash>`. The prefix keeps the
/// start of the original name so it stays recognisable in `ipcs`-style
/// listings. Any other validation is left to `sem_open`.
pub fn make_sem_name(name: &str) -> String {
    let result = if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    };

    if SEM_NAME_MAX == 0 || result.len() <= SEM_NAME_MAX {
        return result;
    }

    // 1 (underscore) + 16 (hex hash)
    const HASH_SUFFIX_LEN: usize = 1 + 16;
    let prefix_len = SEM_NAME_MAX.saturating_sub(HASH_SUFFIX_LEN + 1);

    let hex = to_hex(fnv1a_64(result.as_bytes()));

    let mut shortened = String::with_capacity(SEM_NAME_MAX);
    shortened.push('/');
    // Walk back to a char boundary so multi-byte names don't split.
    let body = &result[1..];
    let mut take = prefix_len.min(body.len());
    while !body.is_char_boundary(take) {
        take -= 1;
    }
    shortened.push_str(&body[..take]);
    shortened.push('_');
    shortened.extend(hex.iter().map(|&b| b as char));
    shortened
}
