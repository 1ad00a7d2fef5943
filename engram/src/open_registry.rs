//! Process-wide guard against opening the same vault file twice from this
//! process (spec §5: "opening two writers to the same file is forbidden
//! and must be detected at open with a clear error"). `rusqlite`'s own
//! file locking catches a second *process*; this catches the same-process
//! case, which the OS-level lock doesn't, since both handles would share
//! one `Connection`-owning thread's file descriptor table.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

fn registry() -> &'static Mutex<HashSet<String>> {
    static REGISTRY: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Claims `key` for the caller. Returns `false` if already claimed.
pub(crate) fn claim(key: &str) -> bool {
    registry().lock().expect("open registry lock poisoned").insert(key.to_string())
}

/// Releases a previously claimed `key`. No-op if not claimed.
pub(crate) fn release(key: &str) {
    registry().lock().expect("open registry lock poisoned").remove(key);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_on_same_key_is_rejected() {
        let key = "test-vault-path-unique-1";
        release(key);
        assert!(claim(key));
        assert!(!claim(key));
        release(key);
        assert!(claim(key));
        release(key);
    }
}
