//! Generic SQLite-backed entity store.
//!
//! # Responsibility
//! - Provide keyed CRUD, equality queries and bulk restore for every
//!   record kind implementing [`Entity`].
//!
//! # Invariants
//! - `insert` assigns identifiers; `bulk_insert` preserves caller ids and
//!   exists solely for snapshot restore.
//! - All statements derive from `Entity::TABLE`/`Entity::COLUMNS`, so the
//!   store itself holds no per-entity SQL.

use crate::model::RecordId;
use crate::store::{Entity, StoreError, StoreResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Keyed storage handle over one SQLite connection.
///
/// Borrowing `&Connection` lets the same store type operate inside a
/// facade transaction (a `Transaction` derefs to `Connection`), which is
/// how multi-entity operations stay atomic.
pub struct EntityStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> EntityStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Gets one record by id.
    pub fn get<T: Entity>(&self, id: RecordId) -> StoreResult<Option<T>> {
        let sql = format!("{} WHERE id = ?1;", select_sql::<T>());
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(T::from_row(row)?));
        }
        Ok(None)
    }

    /// Gets one record by id, failing with `NotFound` when absent.
    pub fn require<T: Entity>(&self, id: RecordId) -> StoreResult<T> {
        self.get::<T>(id)?.ok_or(StoreError::NotFound {
            table: T::TABLE,
            id,
        })
    }

    /// Lists every record of one kind, ordered by id for stable output.
    pub fn all<T: Entity>(&self) -> StoreResult<Vec<T>> {
        let sql = format!("{} ORDER BY id ASC;", select_sql::<T>());
        self.query_rows::<T>(&sql, Vec::new())
    }

    /// Lists records whose `column` equals `value`.
    ///
    /// `column` must be one of `T::COLUMNS`; unknown names are rejected
    /// before any SQL is built.
    pub fn find<T: Entity>(&self, column: &'static str, value: impl Into<Value>) -> StoreResult<Vec<T>> {
        if !T::COLUMNS.contains(&column) {
            return Err(StoreError::InvalidData(format!(
                "unknown query column `{column}` for table {}",
                T::TABLE
            )));
        }
        let sql = format!("{} WHERE {column} = ? ORDER BY id ASC;", select_sql::<T>());
        self.query_rows::<T>(&sql, vec![value.into()])
    }

    /// Like [`find`](Self::find) but returns the first match, if any.
    pub fn find_one<T: Entity>(
        &self,
        column: &'static str,
        value: impl Into<Value>,
    ) -> StoreResult<Option<T>> {
        Ok(self.find::<T>(column, value)?.into_iter().next())
    }

    /// Inserts one record and returns the store-assigned identifier.
    pub fn insert<T: Entity>(&self, record: &T) -> StoreResult<RecordId> {
        record.validate()?;
        let placeholders = placeholder_list(T::COLUMNS.len());
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({});",
            T::TABLE,
            T::COLUMNS.join(", "),
            placeholders
        );
        self.conn
            .execute(&sql, params_from_iter(record.to_values()))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Inserts one record keeping its existing identifier.
    pub fn insert_with_id<T: Entity>(&self, record: &T) -> StoreResult<()> {
        record.validate()?;
        let placeholders = placeholder_list(T::COLUMNS.len() + 1);
        let sql = format!(
            "INSERT INTO {} (id, {}) VALUES ({});",
            T::TABLE,
            T::COLUMNS.join(", "),
            placeholders
        );
        let mut values = vec![Value::from(record.id())];
        values.extend(record.to_values());
        self.conn.execute(&sql, params_from_iter(values))?;
        Ok(())
    }

    /// Restores a batch of records with their identifiers intact.
    pub fn bulk_insert<T: Entity>(&self, records: &[T]) -> StoreResult<()> {
        for record in records {
            self.insert_with_id(record)?;
        }
        Ok(())
    }

    /// Rewrites the full row for an existing record.
    pub fn update<T: Entity>(&self, record: &T) -> StoreResult<()> {
        record.validate()?;
        let assignments = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{};",
            T::TABLE,
            T::COLUMNS.len() + 1
        );
        let mut values = record.to_values();
        values.push(Value::from(record.id()));

        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                table: T::TABLE,
                id: record.id(),
            });
        }
        Ok(())
    }

    /// Deletes one record by id.
    pub fn delete<T: Entity>(&self, id: RecordId) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1;", T::TABLE);
        let changed = self.conn.execute(&sql, [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                table: T::TABLE,
                id,
            });
        }
        Ok(())
    }

    /// Deletes every record whose `column` equals `value`; returns the
    /// number of rows removed. Used by cascade deletes.
    pub fn delete_where<T: Entity>(
        &self,
        column: &'static str,
        value: impl Into<Value>,
    ) -> StoreResult<usize> {
        if !T::COLUMNS.contains(&column) {
            return Err(StoreError::InvalidData(format!(
                "unknown query column `{column}` for table {}",
                T::TABLE
            )));
        }
        let sql = format!("DELETE FROM {} WHERE {column} = ?;", T::TABLE);
        let changed = self
            .conn
            .execute(&sql, params_from_iter([value.into()]))?;
        Ok(changed)
    }

    /// Removes every record of one kind. Used by snapshot restore.
    pub fn clear<T: Entity>(&self) -> StoreResult<()> {
        self.conn
            .execute_batch(&format!("DELETE FROM {};", T::TABLE))?;
        Ok(())
    }

    /// Counts records of one kind.
    pub fn count<T: Entity>(&self) -> StoreResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {};", T::TABLE);
        let count = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    fn query_rows<T: Entity>(&self, sql: &str, values: Vec<Value>) -> StoreResult<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(T::from_row(row)?);
        }
        Ok(records)
    }
}

fn select_sql<T: Entity>() -> String {
    format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
}

fn placeholder_list(count: usize) -> String {
    (1..=count)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ")
}
