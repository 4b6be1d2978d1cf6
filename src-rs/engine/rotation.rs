use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin over a fixed set of API keys.
pub struct KeyRotator {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyRotator {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn next(&self) -> Option<&str> {
        self.key_at(self.start(), 0)
    }

    /// Claims a starting position for one request. Walk it with `key_at` so concurrent callers
    /// moving the cursor cannot make a request skip keys.
    pub fn start(&self) -> usize {
        self.cursor.fetch_add(1, Ordering::Relaxed)
    }

    pub fn key_at(&self, start: usize, attempt: usize) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }
        let idx = start.wrapping_add(attempt) % self.keys.len();
        Some(self.keys[idx].as_str())
    }
}
