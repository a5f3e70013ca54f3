use std::sync::Mutex;

/// Well-known key the serialized session lives under in the host's persisted
/// storage (the browser's localStorage in the SPA shell).
pub const STORAGE_KEY: &str = "userInfo";

/// Minimal persisted-storage surface the session manager needs. The SPA shell
/// backs this with localStorage; tests use the in-memory variant.
pub trait SessionStore {
    fn get(&self) -> Option<String>;
    fn put(&self, raw: &str);
    fn remove(&self);
}

/// In-memory store, one slot, interior mutability so callers can hold it by
/// shared reference the way a storage handle is held.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl SessionStore for MemoryStore {
    fn get(&self) -> Option<String> {
        self.slot.lock().expect("session store poisoned").clone()
    }

    fn put(&self, raw: &str) {
        *self.slot.lock().expect("session store poisoned") = Some(raw.to_string());
    }

    fn remove(&self) {
        *self.slot.lock().expect("session store poisoned") = None;
    }
}
