// Communication with SQLite
// The whole task collection is read once and rewritten on every save
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use rusqlite::{ffi, params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::app::models::Task;
use crate::error::{Result, TodoError};

const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

const CREATE_TASK_TABLE: &str = "CREATE TABLE IF NOT EXISTS task_item (
    Id INTEGER PRIMARY KEY,
    Position INTEGER NOT NULL,
    Name TEXT NOT NULL,
    PriorityLevel INT NOT NULL,
    Created DATETIME NOT NULL,
    DueDate DATE,
    Completed DATETIME
);";
const CREATE_META_TABLE: &str = "CREATE TABLE IF NOT EXISTS store_meta (
    Key TEXT PRIMARY KEY,
    Value INTEGER NOT NULL
);";
const SELECT_TASKS: &str =
    "SELECT Id, Name, PriorityLevel, Created, DueDate, Completed FROM task_item ORDER BY Position;";
const SELECT_MAX_ID: &str = "SELECT Value FROM store_meta WHERE Key = 'max_id';";
const DELETE_TASKS: &str = "DELETE FROM task_item;";
const INSERT_TASK: &str = "INSERT INTO task_item (Id, Position, Name, PriorityLevel, Created, DueDate, Completed)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);";
const UPSERT_MAX_ID: &str = "INSERT INTO store_meta (Key, Value) VALUES ('max_id', ?1)
    ON CONFLICT(Key) DO UPDATE SET Value = excluded.Value;";

// Everything needed to rebuild a TaskStore
#[derive(Debug, Default)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub max_id: i64,
}

pub struct Storage {
    path: PathBuf,
    db_con: Connection,
    created: bool,
}

impl Storage {
    /// Opens the task file, creating it (and its parent directory) when it
    /// does not exist yet. An existing file that SQLite refuses to read is
    /// reported as corrupt and left untouched.
    pub fn open(path: &Path) -> Result<Storage> {
        let existed = path.exists();
        if existed {
            check_header(path)?;
        } else if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| TodoError::StorageLocation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let classify = |source: rusqlite::Error| {
            if existed {
                TodoError::StorageCorrupt {
                    path: path.to_path_buf(),
                    source,
                }
            } else {
                TodoError::StorageWrite {
                    path: path.to_path_buf(),
                    source,
                }
            }
        };

        let db_con = Connection::open(path).map_err(classify)?;
        db_con
            .execute_batch(&format!("{CREATE_TASK_TABLE}\n{CREATE_META_TABLE}"))
            .map_err(classify)?;

        debug!(path = %path.display(), created = !existed, "opened task file");
        Ok(Storage {
            path: path.to_path_buf(),
            db_con,
            created: !existed,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // True when this open created the file
    pub fn is_new(&self) -> bool {
        self.created
    }

    // READ
    pub fn load(&self) -> Result<Snapshot> {
        self.read_snapshot().map_err(|source| TodoError::StorageCorrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn read_snapshot(&self) -> rusqlite::Result<Snapshot> {
        let mut stmt = self.db_con.prepare(SELECT_TASKS)?;
        let tasks = stmt
            .query_map([], |row| {
                Ok(Task {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    priority: row.get(2)?,
                    created: row.get(3)?,
                    due_date: row.get(4)?,
                    completed: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<Task>>>()?;

        let stored_max: Option<i64> = self
            .db_con
            .query_row(SELECT_MAX_ID, [], |row| row.get(0))
            .optional()?;

        // A counter older than the rows it guards must never win
        let highest_id = tasks.iter().map(|task| task.id).fold(0, i64::max);
        if let Some(stored) = stored_max.filter(|stored| *stored < highest_id) {
            warn!(stored, highest_id, "stored id counter is behind the tasks, using highest id");
        }
        let max_id = stored_max.unwrap_or(0).max(highest_id);

        debug!(count = tasks.len(), max_id, "loaded tasks");
        Ok(Snapshot { tasks, max_id })
    }

    // WRITE
    // Replaces the stored collection in one transaction, so a failure keeps
    // the previous contents.
    pub fn save(&mut self, tasks: &[Task], max_id: i64) -> Result<()> {
        self.write_snapshot(tasks, max_id)
            .map_err(|source| TodoError::StorageWrite {
                path: self.path.clone(),
                source,
            })
    }

    fn write_snapshot(&mut self, tasks: &[Task], max_id: i64) -> rusqlite::Result<()> {
        let tx = self.db_con.transaction()?;
        tx.execute(DELETE_TASKS, [])?;
        {
            let mut insert = tx.prepare(INSERT_TASK)?;
            for (position, task) in tasks.iter().enumerate() {
                insert.execute(params![
                    task.id,
                    position as i64,
                    task.name,
                    task.priority,
                    task.created,
                    task.due_date,
                    task.completed,
                ])?;
            }
        }
        tx.execute(UPSERT_MAX_ID, [max_id])?;
        tx.commit()?;

        debug!(count = tasks.len(), max_id, "saved tasks");
        Ok(())
    }
}

// SQLite only looks at a file when it first needs a page, and a file shorter
// than its header is taken for a fresh database. Anything non-empty must
// already carry the header.
fn check_header(path: &Path) -> Result<()> {
    let mut header = Vec::with_capacity(SQLITE_HEADER.len());
    File::open(path)
        .and_then(|file| file.take(SQLITE_HEADER.len() as u64).read_to_end(&mut header))
        .map_err(|source| TodoError::StorageLocation {
            path: path.to_path_buf(),
            source,
        })?;

    if header.is_empty() || header.as_slice() == SQLITE_HEADER.as_slice() {
        return Ok(());
    }
    Err(TodoError::StorageCorrupt {
        path: path.to_path_buf(),
        source: rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_NOTADB),
            Some("file does not start with the SQLite header".to_string()),
        ),
    })
}
