use super::{MemoryStore, Record};
use crate::model::{Category, UNKNOWN_CATEGORY};

pub type CategoryStore = MemoryStore<Category>;

impl Record for Category {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl MemoryStore<Category> {
    /// Name of the category with the given id, or `"Unknown"`
    pub fn name_of(&self, category_id: i64) -> String {
        self.lock()
            .iter()
            .find(|category| category.id == category_id)
            .map_or_else(|| UNKNOWN_CATEGORY.to_string(), |category| category.name.clone())
    }
}
