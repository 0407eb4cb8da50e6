use super::LocalStorage;
use crate::db::DbResult;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Process-memory storage. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryLocalStorage {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> DbResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
