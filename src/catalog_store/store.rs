//! SQLite-backed catalog store implementation.
//!
//! Writes go through a single connection guarded by a mutex, reads are spread
//! over a small pool of read-only connections. The database runs in WAL mode
//! so readers never wait on the writer.

use super::error::{map_insert_error, CatalogStoreError, CatalogStoreResult};
use super::models::{Category, CategoryId, Item, ItemId};
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use super::validation::{validate_category_name, validate_new_item};
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_READ_POOL_SIZE: usize = 4;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed store for items and categories.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn lock(conn: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    conn.lock().unwrap_or_else(PoisonError::into_inner)
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let latest_version = CATALOG_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &CATALOG_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version < BASE_DB_VERSION as i64 {
        bail!(
            "Database has user_version {}, it was not created by this server",
            db_version
        );
    }
    let mut current_version = (db_version - BASE_DB_VERSION as i64) as usize;
    if current_version > latest_version {
        bail!(
            "Catalog db is at version {}, newer than the latest known version {}",
            current_version,
            latest_version
        );
    }

    if current_version < latest_version {
        let tx = conn.transaction()?;
        for schema in CATALOG_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
            if let Some(migration_fn) = schema.migration {
                info!(
                    "Migrating catalog db from version {} to {}",
                    current_version, schema.version
                );
                migration_fn(&tx)?;
            }
            current_version = schema.version;
        }
        tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
        tx.commit()?;
    }

    latest_schema
        .validate(conn)
        .context("Catalog db schema does not match the expected one")
}

impl SqliteCatalogStore {
    /// Open (or create) the catalog database at `db_path`.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of connections used for concurrent reads
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database {:?}", db_path_ref))?;

        write_conn.busy_timeout(BUSY_TIMEOUT)?;
        write_conn.pragma_update(None, "foreign_keys", "ON")?;
        migrate_if_needed(&mut write_conn)?;
        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let mut read_pool = Vec::with_capacity(read_pool_size.max(1));
        for _ in 0..read_pool_size.max(1) {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_conn.busy_timeout(BUSY_TIMEOUT)?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        let store = SqliteCatalogStore {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        };

        info!(
            "Opened catalog: {} items, {} categories",
            store.get_items_count(),
            store.get_categories_count()
        );

        Ok(store)
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    // =========================================================================
    // Internal Helper Methods
    // =========================================================================

    fn category_id_by_name(
        conn: &Connection,
        name: &str,
    ) -> CatalogStoreResult<Option<CategoryId>> {
        let mut stmt = conn.prepare_cached("SELECT id FROM categories WHERE name = ?1")?;
        Ok(stmt.query_row(params![name], |r| r.get(0)).optional()?)
    }

    fn insert_category(conn: &Connection, name: &str) -> CatalogStoreResult<CategoryId> {
        conn.execute("INSERT INTO categories (name) VALUES (?1)", params![name])
            .map_err(|e| map_insert_error(e, Some(name)))?;
        let id = conn.last_insert_rowid();
        info!("Created category '{}' with id {}", name, id);
        Ok(id)
    }

    fn insert_item(
        conn: &Connection,
        name: &str,
        category_id: CategoryId,
        image_filename: &str,
    ) -> CatalogStoreResult<ItemId> {
        conn.execute(
            "INSERT INTO items (name, category_id, image_filename) VALUES (?1, ?2, ?3)",
            params![name, category_id, image_filename],
        )
        .map_err(|e| map_insert_error(e, None))?;
        Ok(conn.last_insert_rowid())
    }

    /// Resolve the category id for `name`, inserting the category if needed.
    fn find_or_create_category(conn: &Connection, name: &str) -> CatalogStoreResult<CategoryId> {
        if let Some(id) = Self::category_id_by_name(conn, name)? {
            return Ok(id);
        }
        Self::insert_or_reread_category(conn, name)
    }

    /// Insert `name`, falling back to the existing row if the insert lost a race.
    fn insert_or_reread_category(conn: &Connection, name: &str) -> CatalogStoreResult<CategoryId> {
        match Self::insert_category(conn, name) {
            Ok(id) => Ok(id),
            Err(CatalogStoreError::DuplicateName(_)) => {
                // Another writer on the same file got there first.
                debug!("Category '{}' appeared concurrently, re-reading it", name);
                Self::category_id_by_name(conn, name)?
                    .ok_or_else(|| CatalogStoreError::DuplicateName(name.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    fn parse_item_row(row: &rusqlite::Row) -> rusqlite::Result<Item> {
        Ok(Item {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            image: row.get(3)?,
        })
    }

    fn count_rows(&self, table: &str) -> usize {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn);
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
            r.get::<_, i64>(0)
        })
        .map(|count| count as usize)
        .unwrap_or(0)
    }
}

const SELECT_ITEMS: &str = "SELECT items.id, items.name, categories.name, items.image_filename \
     FROM items JOIN categories ON categories.id = items.category_id";

impl CatalogStore for SqliteCatalogStore {
    fn find_category_id_by_name(&self, name: &str) -> CatalogStoreResult<Option<CategoryId>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn);
        Self::category_id_by_name(&conn, name)
    }

    fn create_category(&self, name: &str) -> CatalogStoreResult<CategoryId> {
        validate_category_name(name)?;
        let conn = lock(&self.write_conn);
        Self::insert_category(&conn, name)
    }

    fn get_all_categories(&self) -> CatalogStoreResult<Vec<Category>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn);
        let mut stmt = conn.prepare_cached("SELECT id, name FROM categories ORDER BY id")?;
        let categories = stmt
            .query_map([], |r| {
                Ok(Category {
                    id: r.get(0)?,
                    name: r.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn create_item(
        &self,
        name: &str,
        category_id: CategoryId,
        image_filename: &str,
    ) -> CatalogStoreResult<ItemId> {
        validate_new_item(name, image_filename)?;
        let conn = lock(&self.write_conn);
        Self::insert_item(&conn, name, category_id, image_filename)
    }

    fn add_item(
        &self,
        name: &str,
        category_name: &str,
        image_filename: &str,
    ) -> CatalogStoreResult<ItemId> {
        validate_category_name(category_name)?;
        validate_new_item(name, image_filename)?;

        let mut conn = lock(&self.write_conn);
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let category_id = Self::find_or_create_category(&tx, category_name)?;
        let item_id = Self::insert_item(&tx, name, category_id, image_filename)?;
        tx.commit()?;

        info!(
            "Added item {} '{}' in category '{}' ({})",
            item_id, name, category_name, category_id
        );
        Ok(item_id)
    }

    fn get_all_items(&self) -> CatalogStoreResult<Vec<Item>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn);
        let mut stmt = conn.prepare_cached(&format!("{} ORDER BY items.id", SELECT_ITEMS))?;
        let items = stmt
            .query_map([], Self::parse_item_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn get_item_by_id(&self, id: ItemId) -> CatalogStoreResult<Option<Item>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn);
        let mut stmt = conn.prepare_cached(&format!("{} WHERE items.id = ?1", SELECT_ITEMS))?;
        Ok(stmt.query_row(params![id], Self::parse_item_row).optional()?)
    }

    fn get_items_count(&self) -> usize {
        self.count_rows("items")
    }

    fn get_categories_count(&self) -> usize {
        self.count_rows("categories")
    }
}
