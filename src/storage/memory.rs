use super::{KeyValueStore, Result};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::storage::KeyValueStore;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("velto-theme").expect("get"), None);

        store
            .set("velto-theme", &serde_json::json!("dark"))
            .expect("set");
        assert_eq!(
            store.get("velto-theme").expect("get"),
            Some(serde_json::json!("dark"))
        );

        store.remove("velto-theme").expect("remove");
        store.remove("velto-theme").expect("second remove is fine");
        assert!(store.is_empty());
    }
}
