//! # Tillroll Warehouse
//!
//! DuckDB-based persistence for sales records.
//!
//! ## Overview
//!
//! This crate owns the `event_data` table: schema migrations, inserts, and
//! reads. Records arrive already normalized (see `tillroll-core`); nothing
//! here fills defaults or validates field contents.
//!
//! All SQL is fixed and parameterized; caller-provided values never reach a
//! statement by interpolation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tillroll_warehouse::Warehouse;
//!
//! fn main() -> Result<(), tillroll_warehouse::WarehouseError> {
//!     let warehouse = Warehouse::open_default()?;
//!     println!("{} records stored", warehouse.count()?);
//!     Ok(())
//! }
//! ```

pub mod duckdb;
pub mod migrations;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::{Connection, ToSql};
use thiserror::Error;
use time::Date;

use tillroll_core::{SalesRecord, StoredRecord, DATE_FORMAT};

pub use duckdb::{DuckDbConnectionManager, PooledConnection};

/// Errors that can occur during warehouse operations.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A stored row could not be read back as a valid record.
    #[error("corrupt stored record: {0}")]
    Corrupt(String),
}

/// Configuration for the warehouse database.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Root directory for tillroll data.
    pub tillroll_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of connections in the pool.
    pub max_pool_size: usize,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        let tillroll_home = resolve_tillroll_home();
        let db_path = tillroll_home.join("sales.duckdb");
        Self {
            tillroll_home,
            db_path,
            max_pool_size: 4,
        }
    }
}

/// The store of normalized sales records.
#[derive(Clone)]
pub struct Warehouse {
    manager: DuckDbConnectionManager,
}

impl Warehouse {
    /// Open a warehouse with default configuration.
    ///
    /// # Errors
    /// Returns an error if the database directory cannot be created or the
    /// schema cannot be applied.
    pub fn open_default() -> Result<Self, WarehouseError> {
        Self::open(WarehouseConfig::default())
    }

    /// Open a warehouse with the specified configuration.
    ///
    /// # Errors
    /// Returns an error if the database directory cannot be created or the
    /// schema cannot be applied.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = DuckDbConnectionManager::new(config.db_path.clone(), config.max_pool_size);
        let warehouse = Self { manager };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Apply schema migrations.
    ///
    /// # Errors
    /// Returns an error if a migration statement fails.
    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        self.manager.db_path()
    }

    /// Insert one record and return it with its assigned id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn insert(&self, record: &SalesRecord) -> Result<StoredRecord, WarehouseError> {
        let connection = self.manager.acquire()?;
        let id = insert_record(&connection, record)?;
        Ok(StoredRecord {
            id,
            record: record.clone(),
        })
    }

    /// Insert a batch of records inside a single transaction.
    ///
    /// Either every record is committed or none is.
    ///
    /// # Errors
    /// Returns an error if any insert fails; the transaction is rolled back.
    pub fn insert_many(&self, records: &[SalesRecord]) -> Result<usize, WarehouseError> {
        if records.is_empty() {
            return Ok(0);
        }

        let connection = self.manager.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<usize, WarehouseError> {
            for record in records {
                insert_record(&connection, record)?;
            }
            Ok(records.len())
        })();

        finalize_transaction(&connection, result)
    }

    /// Read every stored record, oldest first.
    ///
    /// # Errors
    /// Returns an error if the read fails or a stored row cannot be parsed
    /// back into a record.
    pub fn query_all(&self) -> Result<Vec<StoredRecord>, WarehouseError> {
        let connection = self.manager.acquire()?;
        let mut statement = connection.prepare(
            "SELECT id, event_name, venue_name, operating_hours, \
             CAST(event_date_from AS VARCHAR), CAST(event_date_to AS VARCHAR), \
             products_sold, sales_volume, price_per_unit, total_revenue, \
             sale_hour, payment_method \
             FROM event_data ORDER BY id",
        )?;

        // Dates come back as VARCHAR and are parsed outside the cursor so
        // parse failures surface as Corrupt, not as a driver error.
        let raw_rows = statement
            .query_map([], |row| {
                Ok(RawRow {
                    id: row.get(0)?,
                    event_name: row.get(1)?,
                    venue_name: row.get(2)?,
                    operating_hours: row.get(3)?,
                    event_date_from: row.get(4)?,
                    event_date_to: row.get(5)?,
                    products_sold: row.get(6)?,
                    sales_volume: row.get(7)?,
                    price_per_unit: row.get(8)?,
                    total_revenue: row.get(9)?,
                    sale_hour: row.get(10)?,
                    payment_method: row.get(11)?,
                })
            })?
            .collect::<Result<Vec<RawRow>, ::duckdb::Error>>()?;

        raw_rows.into_iter().map(RawRow::into_stored).collect()
    }

    /// Number of stored records.
    ///
    /// # Errors
    /// Returns an error if the count query fails.
    pub fn count(&self) -> Result<i64, WarehouseError> {
        let connection = self.manager.acquire()?;
        let count = connection.query_row("SELECT COUNT(*) FROM event_data", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// A row as read from DuckDB, before date parsing.
struct RawRow {
    id: i64,
    event_name: String,
    venue_name: String,
    operating_hours: String,
    event_date_from: String,
    event_date_to: String,
    products_sold: String,
    sales_volume: f64,
    price_per_unit: f64,
    total_revenue: f64,
    sale_hour: i64,
    payment_method: String,
}

impl RawRow {
    fn into_stored(self) -> Result<StoredRecord, WarehouseError> {
        let event_date_from = parse_stored_date(self.event_date_from.as_str())?;
        let event_date_to = parse_stored_date(self.event_date_to.as_str())?;
        Ok(StoredRecord {
            id: self.id,
            record: SalesRecord {
                event_name: self.event_name,
                venue_name: self.venue_name,
                operating_hours: self.operating_hours,
                event_date_from,
                event_date_to,
                products_sold: self.products_sold,
                sales_volume: self.sales_volume,
                price_per_unit: self.price_per_unit,
                total_revenue: self.total_revenue,
                sale_hour: self.sale_hour,
                payment_method: self.payment_method,
            },
        })
    }
}

/// Insert one record on an already-acquired connection, returning its id.
fn insert_record(connection: &Connection, record: &SalesRecord) -> Result<i64, WarehouseError> {
    let date_from = format_date(record.event_date_from)?;
    let date_to = format_date(record.event_date_to)?;

    let params: [&dyn ToSql; 11] = [
        &record.event_name,
        &record.venue_name,
        &record.operating_hours,
        &date_from,
        &date_to,
        &record.products_sold,
        &record.sales_volume,
        &record.price_per_unit,
        &record.total_revenue,
        &record.sale_hour,
        &record.payment_method,
    ];
    let id = connection.query_row(
        "INSERT INTO event_data \
         (event_name, venue_name, operating_hours, event_date_from, event_date_to, \
          products_sold, sales_volume, price_per_unit, total_revenue, sale_hour, payment_method) \
         VALUES (?, ?, ?, TRY_CAST(? AS DATE), TRY_CAST(? AS DATE), ?, ?, ?, ?, ?, ?) \
         RETURNING id",
        params.as_slice(),
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Finalize a transaction, committing on success or rolling back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, WarehouseError>,
) -> Result<T, WarehouseError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

fn format_date(date: Date) -> Result<String, WarehouseError> {
    date.format(DATE_FORMAT)
        .map_err(|error| WarehouseError::Corrupt(format!("unformattable date: {error}")))
}

fn parse_stored_date(value: &str) -> Result<Date, WarehouseError> {
    Date::parse(value, DATE_FORMAT)
        .map_err(|_| WarehouseError::Corrupt(format!("unparseable stored date '{value}'")))
}

/// Resolve the tillroll home directory from environment or default.
fn resolve_tillroll_home() -> PathBuf {
    if let Some(path) = env::var_os("TILLROLL_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".tillroll");
    }

    PathBuf::from(".tillroll")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use time::macros::date;

    fn open_temp(temp: &tempfile::TempDir) -> Warehouse {
        let tillroll_home = temp.path().join("tillroll-home");
        let db_path = tillroll_home.join("sales.duckdb");
        Warehouse::open(WarehouseConfig {
            tillroll_home,
            db_path,
            max_pool_size: 2,
        })
        .expect("warehouse open")
    }

    fn sample(name: &str) -> SalesRecord {
        SalesRecord {
            event_name: name.to_string(),
            venue_name: "Town Hall".to_string(),
            operating_hours: "12:00 PM - 11:00 PM".to_string(),
            event_date_from: date!(2024 - 03 - 01),
            event_date_to: date!(2024 - 03 - 02),
            products_sold: r#"["Fosters","Amstel"]"#.to_string(),
            sales_volume: 120.5,
            price_per_unit: 2.75,
            total_revenue: 331.38,
            sale_hour: 18,
            payment_method: "Card".to_string(),
        }
    }

    #[test]
    fn inserted_record_reads_back_unchanged() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open_temp(&temp);

        let stored = warehouse.insert(&sample("Spring Fair")).expect("insert");
        assert!(stored.id >= 1);

        let all = warehouse.query_all().expect("query_all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], stored);
    }

    #[test]
    fn ids_are_assigned_in_insert_order() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open_temp(&temp);

        let first = warehouse.insert(&sample("First")).expect("insert");
        let second = warehouse.insert(&sample("Second")).expect("insert");
        assert!(second.id > first.id);

        let names: Vec<String> = warehouse
            .query_all()
            .expect("query_all")
            .into_iter()
            .map(|stored| stored.record.event_name)
            .collect();
        assert_eq!(names, vec!["First".to_string(), "Second".to_string()]);
    }

    #[test]
    fn insert_many_commits_all_rows_at_once() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open_temp(&temp);

        let batch = vec![sample("A"), sample("B"), sample("C")];
        let inserted = warehouse.insert_many(&batch).expect("insert_many");
        assert_eq!(inserted, 3);
        assert_eq!(warehouse.count().expect("count"), 3);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open_temp(&temp);

        assert_eq!(warehouse.insert_many(&[]).expect("insert_many"), 0);
        assert_eq!(warehouse.count().expect("count"), 0);
    }

    #[test]
    fn reopening_preserves_stored_records() {
        let temp = tempdir().expect("tempdir");
        let tillroll_home = temp.path().join("tillroll-home");
        let config = WarehouseConfig {
            db_path: tillroll_home.join("sales.duckdb"),
            tillroll_home,
            max_pool_size: 2,
        };

        {
            let warehouse = Warehouse::open(config.clone()).expect("first open");
            warehouse.insert(&sample("Kept")).expect("insert");
        }

        let warehouse = Warehouse::open(config).expect("second open");
        assert_eq!(warehouse.count().expect("count"), 1);
    }

    #[test]
    fn sql_metacharacters_in_text_fields_round_trip() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open_temp(&temp);

        let mut record = sample("O'Malley's; DROP TABLE event_data; --");
        record.venue_name = "The \"Crown\" & Anchor".to_string();
        warehouse.insert(&record).expect("insert");

        let all = warehouse.query_all().expect("query_all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record.event_name, record.event_name);
        assert_eq!(all[0].record.venue_name, record.venue_name);
    }
}
