//! Shared test fixture: a migrated database in a temp directory, with a
//! connection pool and a live writer actor.

use std::sync::Arc;

use crate::db::{self, DbPool, WriteHandle};

pub(crate) struct TestDb {
    pub(crate) pool: Arc<DbPool>,
    pub(crate) writer: WriteHandle,
    _dir: tempfile::TempDir,
}

/// Must run inside a Tokio runtime because it spawns the writer task.
pub(crate) fn setup() -> TestDb {
    let dir = tempfile::tempdir().expect("create temp dir");
    let data_dir = dir.path().to_string_lossy().to_string();
    let db_path = db::init(&data_dir).expect("init database");
    let pool = db::create_pool(&db_path).expect("create pool");
    db::run_migrations(&pool).expect("run migrations");
    let writer = db::spawn_writer(pool.clone());
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}
