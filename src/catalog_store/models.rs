//! Catalog models as stored in and read from the SQLite database.

use serde::{Deserialize, Serialize};

/// Row id of a category.
pub type CategoryId = i64;

/// Row id of an item.
pub type ItemId = i64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// An item joined with the name of its category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    /// Content-derived filename of the item image inside the images directory.
    pub image: String,
}

/// Wire shape of the full item listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsList {
    pub items: Vec<Item>,
}

impl From<Vec<Item>> for ItemsList {
    fn from(items: Vec<Item>) -> Self {
        ItemsList { items }
    }
}
