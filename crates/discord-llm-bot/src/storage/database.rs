//! Read-only SQLite access to the books database

use parking_lot::Mutex;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Rows shown per table in `table_info`
const SAMPLE_ROWS: usize = 3;

/// Longest sample value shown in `table_info`
const SAMPLE_VALUE_CHARS: usize = 100;

/// Books database opened once and shared read-only
#[derive(Clone)]
pub struct BooksDatabase {
    conn: Arc<Mutex<Connection>>,
}

impl BooksDatabase {
    /// Open the database file read-only
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| Error::Database(format!("Failed to open {}: {}", path.display(), e)))?;

        tracing::info!("Opened books database at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// SQL dialect name given to the model
    pub fn dialect(&self) -> &'static str {
        "sqlite"
    }

    /// User table names, sorted
    pub fn table_names(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Schema and sample rows for `tables`, or for every table when `None`
    pub fn table_info(&self, tables: Option<&[String]>) -> Result<String> {
        let all = self.table_names()?;
        let selected: Vec<String> = match tables {
            None => all,
            Some(requested) => {
                let missing: Vec<&str> = requested
                    .iter()
                    .filter(|t| !all.contains(*t))
                    .map(String::as_str)
                    .collect();
                if !missing.is_empty() {
                    return Err(Error::Database(format!(
                        "table_names {:?} not found in database",
                        missing
                    )));
                }
                requested.to_vec()
            }
        };

        let conn = self.conn.lock();
        let mut infos = Vec::with_capacity(selected.len());

        for table in &selected {
            let create: String = conn.query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT * FROM \"{}\" LIMIT {}",
                table.replace('"', "\"\""),
                SAMPLE_ROWS
            ))?;
            let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
            let width = columns.len();

            let mut lines = vec![columns.join("\t")];
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(width);
                for i in 0..width {
                    let value = plain_value(row.get_ref(i)?);
                    values.push(value.chars().take(SAMPLE_VALUE_CHARS).collect::<String>());
                }
                lines.push(values.join("\t"));
            }

            infos.push(format!(
                "{}\n\n/*\n{} rows from {} table:\n{}\n*/",
                create.trim(),
                SAMPLE_ROWS,
                table,
                lines.join("\n")
            ));
        }

        Ok(infos.join("\n\n"))
    }

    /// Run a statement and render its rows as a list of tuples
    ///
    /// Returns an empty string when there are no rows.
    pub fn run(&self, sql: &str) -> Result<String> {
        let sql = sql.trim();
        tracing::info!("Running SQL: {}", sql);

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;
        let width = stmt.column_count();
        let mut rows = stmt.query([])?;

        let mut tuples = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(literal_value(row.get_ref(i)?));
            }
            tuples.push(if values.len() == 1 {
                format!("({},)", values[0])
            } else {
                format!("({})", values.join(", "))
            });
        }

        if tuples.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("[{}]", tuples.join(", ")))
    }
}

/// Value as shown in sample rows
fn plain_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "None".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => format!("{:?}", f),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Value as a literal inside a result tuple
fn literal_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Text(t) => {
            let text = String::from_utf8_lossy(t);
            if text.contains('\'') && !text.contains('"') {
                format!("\"{}\"", text)
            } else {
                format!("'{}'", text.replace('\'', "\\'"))
            }
        }
        other => plain_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn books_db() -> (TempDir, BooksDatabase) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.db");

        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE books (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                language TEXT,
                average_rating REAL,
                ratings_count INTEGER,
                text_reviews_count INTEGER
            );
            INSERT INTO books VALUES (1, 'Dune', 'Frank Herbert', 'eng', 4.25, 500, 20);
            INSERT INTO books VALUES (2, 'Emma', 'Jane Austen', 'eng', 4.0, 300, 15);
            INSERT INTO books VALUES (3, 'Les Misérables', 'Victor Hugo', 'fre', 4.17, 200, NULL);
            INSERT INTO books VALUES (4, 'Ender''s Game', 'Orson Scott Card', 'eng', 4.3, 900, 40);
            "#,
        )
        .unwrap();
        drop(conn);

        let db = BooksDatabase::open(&path).unwrap();
        (dir, db)
    }

    #[test]
    fn test_table_names() {
        let (_dir, db) = books_db();
        assert_eq!(db.dialect(), "sqlite");
        assert_eq!(db.table_names().unwrap(), vec!["books".to_string()]);
    }

    #[test]
    fn test_run_renders_tuples() {
        let (_dir, db) = books_db();

        assert_eq!(db.run("SELECT COUNT(*) FROM books").unwrap(), "[(4,)]");
        assert_eq!(
            db.run("SELECT title, average_rating FROM books WHERE id <= 2 ORDER BY id").unwrap(),
            "[('Dune', 4.25), ('Emma', 4.0)]"
        );
        assert_eq!(
            db.run("SELECT title, text_reviews_count FROM books WHERE id >= 3 ORDER BY id").unwrap(),
            "[('Les Misérables', None), (\"Ender's Game\", 40)]"
        );
        assert_eq!(db.run("SELECT title FROM books WHERE id = 99").unwrap(), "");
    }

    #[test]
    fn test_run_errors() {
        let (_dir, db) = books_db();

        let err = db.run("SELECT nope FROM books").unwrap_err();
        assert!(matches!(err, Error::Database(_)));

        let err = db.run("DELETE FROM books").unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        assert_eq!(db.run("SELECT COUNT(*) FROM books").unwrap(), "[(4,)]");
    }

    #[test]
    fn test_table_info() {
        let (_dir, db) = books_db();
        let info = db.table_info(None).unwrap();

        assert!(info.starts_with("CREATE TABLE books"));
        assert!(info.contains("/*\n3 rows from books table:\n"));
        assert!(info.contains("id\ttitle\tauthor\tlanguage\taverage_rating\tratings_count\ttext_reviews_count"));
        assert!(info.contains("1\tDune\tFrank Herbert\teng\t4.25\t500\t20"));
        assert!(!info.contains("Ender"));
        assert!(info.ends_with("*/"));

        let err = db.table_info(Some(&["authors".to_string()])).unwrap_err();
        assert!(err.to_string().contains("authors"));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(BooksDatabase::open(dir.path().join("missing.db")).is_err());
    }
}
