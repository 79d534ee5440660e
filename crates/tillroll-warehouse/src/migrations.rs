use ::duckdb::Connection;

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_event_data",
        sql: r#"
CREATE SEQUENCE IF NOT EXISTS event_data_id_seq;

CREATE TABLE IF NOT EXISTS event_data (
    id BIGINT PRIMARY KEY DEFAULT nextval('event_data_id_seq'),
    event_name VARCHAR NOT NULL,
    venue_name VARCHAR NOT NULL,
    operating_hours VARCHAR NOT NULL,
    event_date_from DATE NOT NULL,
    event_date_to DATE NOT NULL,
    products_sold VARCHAR NOT NULL,
    sales_volume DOUBLE NOT NULL,
    price_per_unit DOUBLE NOT NULL,
    total_revenue DOUBLE NOT NULL,
    sale_hour BIGINT NOT NULL,
    payment_method VARCHAR NOT NULL
);
"#,
    },
    Migration {
        version: "0002_indexes",
        sql: r#"
CREATE INDEX IF NOT EXISTS idx_event_data_date_from ON event_data(event_date_from);
"#,
    },
];

pub fn apply_migrations(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    for migration in MIGRATIONS {
        let query = format!(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = '{}'",
            escape_sql_string(migration.version)
        );
        let applied_count: i64 = connection.query_row(query.as_str(), [], |row| row.get(0))?;

        if applied_count == 0 {
            connection.execute_batch(migration.sql)?;
            let insert = format!(
                "INSERT INTO schema_migrations (version) VALUES ('{}')",
                escape_sql_string(migration.version)
            );
            connection.execute_batch(insert.as_str())?;
        }
    }

    Ok(())
}

fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}
