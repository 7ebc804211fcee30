//! Fetched diagram markup, keyed by source URL

use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct DiagramCache {
    entries: HashMap<String, Rc<str>>,
}

impl DiagramCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Rc<str>> {
        self.entries.get(url).cloned()
    }

    pub fn insert(&mut self, url: impl Into<String>, markup: impl Into<Rc<str>>) {
        self.entries.insert(url.into(), markup.into());
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn evict(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
