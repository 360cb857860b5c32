//! Student lookup.
//!
//! The only query the pipeline makes is an exact-name lookup, once per
//! run. [`SqliteStudentStore`] reads the `students` table;
//! [`InMemoryStudentStore`] holds a fixed table for tests and demos.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use tutor_types::{Result, StudentRecord, Subject, TutorError};

/// Read-only access to registered students.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Exact-match lookup by name.
    async fn find(&self, name: &str) -> Result<Option<StudentRecord>>;

    /// All students, ordered by name.
    async fn list(&self) -> Result<Vec<StudentRecord>>;
}

/// The two students every demo database starts with.
pub fn demo_students() -> Vec<StudentRecord> {
    vec![
        StudentRecord::new("alice", Subject::Math, 12),
        StudentRecord::new("bob", Subject::History, 15),
    ]
}

// ── In-memory ───────────────────────────────────────────────────────────

/// A fixed table held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStudentStore {
    students: BTreeMap<String, StudentRecord>,
}

impl InMemoryStudentStore {
    pub fn new(students: impl IntoIterator<Item = StudentRecord>) -> Self {
        Self {
            students: students
                .into_iter()
                .map(|s| (s.name.clone(), s))
                .collect(),
        }
    }

    /// `alice` (math, 12) and `bob` (history, 15).
    pub fn demo() -> Self {
        Self::new(demo_students())
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn find(&self, name: &str) -> Result<Option<StudentRecord>> {
        Ok(self.students.get(name).cloned())
    }

    async fn list(&self) -> Result<Vec<StudentRecord>> {
        Ok(self.students.values().cloned().collect())
    }
}

// ── SQLite ──────────────────────────────────────────────────────────────

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS students (
    name TEXT PRIMARY KEY,
    subject TEXT NOT NULL,
    age INTEGER NOT NULL
)";

/// The `students` table in a SQLite database file.
///
/// Every call opens its own connection on a blocking thread; nothing is
/// cached between lookups.
#[derive(Debug, Clone)]
pub struct SqliteStudentStore {
    path: PathBuf,
}

impl SqliteStudentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the `students` table if it does not exist.
    pub async fn init(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(CREATE_TABLE, [])?;
            Ok(())
        })
        .await
    }

    /// Insert or replace the demo students. Returns how many rows were written.
    pub async fn seed_demo(&self) -> Result<usize> {
        self.upsert(demo_students()).await
    }

    /// Insert or replace `students`, creating the table if needed.
    pub async fn upsert(&self, students: Vec<StudentRecord>) -> Result<usize> {
        self.with_connection(move |conn| {
            conn.execute(CREATE_TABLE, [])?;
            let tx = conn.transaction()?;
            let mut written = 0;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR REPLACE INTO students (name, subject, age) VALUES (?1, ?2, ?3)",
                )?;
                for s in &students {
                    written += stmt.execute(params![s.name, s.subject.as_str(), s.age])?;
                }
            }
            tx.commit()?;
            Ok(written)
        })
        .await
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = Connection::open(&path).map_err(store_err)?;
            f(&mut conn).map_err(store_err)
        })
        .await
        .map_err(|e| TutorError::Store(format!("lookup task failed: {e}")))?
    }
}

fn store_err(e: rusqlite::Error) -> TutorError {
    TutorError::Store(e.to_string())
}

fn record_from_row(name: String, subject: String, age: i64) -> Result<StudentRecord> {
    let subject = subject
        .parse::<Subject>()
        .map_err(|e| TutorError::Store(format!("student '{name}': {e}")))?;
    let age = u32::try_from(age)
        .map_err(|_| TutorError::Store(format!("student '{name}': invalid age {age}")))?;
    Ok(StudentRecord { name, subject, age })
}

#[async_trait]
impl StudentStore for SqliteStudentStore {
    async fn find(&self, name: &str) -> Result<Option<StudentRecord>> {
        debug!(db = %self.path.display(), student = %name, "looking up student");
        let key = name.to_string();
        let row = self
            .with_connection(move |conn| {
                conn.query_row(
                    "SELECT subject, age FROM students WHERE name = ?1",
                    params![key],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
                )
                .optional()
            })
            .await?;

        row.map(|(subject, age)| record_from_row(name.to_string(), subject, age))
            .transpose()
    }

    async fn list(&self) -> Result<Vec<StudentRecord>> {
        let rows = self
            .with_connection(|conn| {
                let mut stmt = conn.prepare("SELECT name, subject, age FROM students ORDER BY name")?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, i64>(2)?,
                        ))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter()
            .map(|(name, subject, age)| record_from_row(name, subject, age))
            .collect()
    }
}
