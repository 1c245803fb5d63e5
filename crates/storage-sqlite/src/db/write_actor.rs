//! Single-writer actor for SQLite.
//!
//! SQLite allows one writer at a time. Instead of letting pool connections
//! race for the write lock, all writes funnel through one background task
//! that owns a dedicated connection and runs each job inside an immediate
//! transaction. Reads keep going through the pool concurrently under WAL.

use std::any::Any;
use std::sync::Arc;

use diesel::SqliteConnection;
use log::error;
use tokio::sync::{mpsc, oneshot};

use nestegg_core::errors::{DatabaseError, Error, Result};

use super::DbPool;
use crate::errors::StorageError;

type Reply = Result<Box<dyn Any + Send + 'static>>;
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> Reply + Send + 'static>;

/// Handle for sending jobs to the writer actor. Cheap to clone.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job, oneshot::Sender<Reply>)>,
}

impl WriteHandle {
    /// Runs `job` on the writer's dedicated connection, inside an immediate
    /// transaction. Everything the closure writes commits or rolls back as
    /// one unit.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |conn| job(conn).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                reply_tx,
            ))
            .await
            .map_err(|_| {
                DatabaseError::Internal("Database writer is no longer running".to_string())
            })?;

        let reply = reply_rx.await.map_err(|_| {
            DatabaseError::Internal("Database writer dropped the reply channel".to_string())
        })?;

        reply.map(|boxed| {
            *boxed
                .downcast::<T>()
                .unwrap_or_else(|_| panic!("Writer reply type did not match the job return type"))
        })
    }
}

/// Spawns the background task that owns the write connection and processes
/// jobs serially. The task ends once every `WriteHandle` clone is dropped.
pub fn spawn_writer(pool: Arc<DbPool>) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(Job, oneshot::Sender<Reply>)>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Database writer could not acquire a connection: {e}");
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    job(c).map_err(StorageError::from)
                })
                .map_err(Error::from);

            // The requester may have been cancelled; nothing to do then.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
