use super::{MemoryStore, Record};
use crate::model::Product;

pub type ProductStore = MemoryStore<Product>;

impl Record for Product {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}
