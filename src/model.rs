//! Catalog records
//!
//! Wire shapes for products and categories. Decoding is lenient: missing or
//! `null` fields fall back to zero values and unknown fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// Decode a field, mapping `null` to the type's zero value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Category name returned when a product references a category that does not exist
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Sellable item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "nama", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "harga", deserialize_with = "null_as_default")]
    pub price: i64,
    #[serde(rename = "stok", deserialize_with = "null_as_default")]
    pub stock: i64,
    #[serde(rename = "kategori_id", deserialize_with = "null_as_default")]
    pub category_id: i64,
}

/// Grouping label referenced by products
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "nama", deserialize_with = "null_as_default")]
    pub name: String,
}

/// Read projection of a product with its category name resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub id: i64,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "harga")]
    pub price: i64,
    #[serde(rename = "stok")]
    pub stock: i64,
    #[serde(rename = "kategori")]
    pub category: String,
}

impl ProductView {
    pub fn new(product: Product, category: String) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            stock: product.stock,
            category,
        }
    }
}

impl Product {
    pub fn new(id: i64, name: &str, price: i64, stock: i64, category_id: i64) -> Self {
        Self {
            id,
            name: name.to_string(),
            price,
            stock,
            category_id,
        }
    }
}

impl Category {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// Categories present at startup
pub fn seed_categories() -> Vec<Category> {
    vec![Category::new(1, "Makanan"), Category::new(2, "Minuman")]
}

/// Products present at startup
pub fn seed_products() -> Vec<Product> {
    vec![
        Product::new(1, "Mie Goreng Sambal Ijo", 18000, 15, 1),
        Product::new(2, "Mie Goreng Ayam Geprek", 25000, 8, 1),
        Product::new(3, "Es Teh", 5000, 100, 2),
    ]
}
