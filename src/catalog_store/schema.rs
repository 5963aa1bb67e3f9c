//! SQLite schema definitions for the item catalog database.
//!
//! Categories are created lazily the first time an item references them and
//! are never updated or removed, so items reference them with RESTRICT.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const CATEGORY_FK: ForeignKey = ForeignKey {
    foreign_table: "categories",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

/// Categories table, one row per distinct category name.
const CATEGORIES_TABLE: Table = Table {
    name: "categories",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

/// Items table
const ITEMS_TABLE: Table = Table {
    name: "items",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!(
            "category_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&CATEGORY_FK)
        ),
        sqlite_column!("image_filename", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_items_category", "category_id")],
    unique_constraints: &[],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[CATEGORIES_TABLE, ITEMS_TABLE],
    migration: None,
}];
