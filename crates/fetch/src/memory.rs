use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::{Fetch, Result};

/// In-memory page set for tests: serves captured fixtures offline and
/// records the sequence of requested URLs. Unknown URLs resolve to empty
/// bytes, exactly like a dead link through the real client.
#[derive(Debug, Default)]
pub struct MemoryFetch {
    pages: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.pages.insert(url.into(), body.into());
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetch for MemoryFetch {
    fn get(&self, url: &str, _max_age: Duration) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(self.pages.get(url).cloned().unwrap_or_default())
    }
}
