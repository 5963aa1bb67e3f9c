//! CatalogStore trait definition.

use super::error::CatalogStoreResult;
use super::models::{Category, CategoryId, Item, ItemId};

/// Trait for catalog storage backends.
///
/// The store exclusively owns categories and items. Every item references an
/// existing category and category names are unique.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Categories
    // =========================================================================

    /// Exact-match lookup of a category id by name.
    fn find_category_id_by_name(&self, name: &str) -> CatalogStoreResult<Option<CategoryId>>;

    /// Insert a new category. Fails with `DuplicateName` if the name is taken.
    fn create_category(&self, name: &str) -> CatalogStoreResult<CategoryId>;

    /// All categories ordered by id.
    fn get_all_categories(&self) -> CatalogStoreResult<Vec<Category>>;

    // =========================================================================
    // Items
    // =========================================================================

    /// Insert an item referencing an existing category.
    /// Fails with `ConstraintViolation` if the category does not exist.
    fn create_item(
        &self,
        name: &str,
        category_id: CategoryId,
        image_filename: &str,
    ) -> CatalogStoreResult<ItemId>;

    /// Find-or-create the category, then create the item, as one unit.
    fn add_item(
        &self,
        name: &str,
        category_name: &str,
        image_filename: &str,
    ) -> CatalogStoreResult<ItemId>;

    /// Every item joined with its category name, ordered by id.
    fn get_all_items(&self) -> CatalogStoreResult<Vec<Item>>;

    /// Single item joined with its category name.
    fn get_item_by_id(&self, id: ItemId) -> CatalogStoreResult<Option<Item>>;

    // =========================================================================
    // Counts
    // =========================================================================

    fn get_items_count(&self) -> usize;

    fn get_categories_count(&self) -> usize;
}
