//! Explicit transaction scope over a [`Database`] handle.

use crate::error::{DbError, DbResult};
use crate::traits::Database;

/// Rolls back an open transaction when dropped unless it was finished.
///
/// Covers early returns and unwinding out of the transaction body.
struct TransactionGuard<'a> {
    db: &'a dyn Database,
    finished: bool,
}

impl<'a> TransactionGuard<'a> {
    fn begin(db: &'a dyn Database) -> DbResult<Self> {
        db.begin()?;
        Ok(Self {
            db,
            finished: false,
        })
    }

    fn commit(mut self) -> DbResult<()> {
        self.finished = true;
        if let Err(commit_err) = self.db.commit() {
            if let Err(e) = self.db.rollback() {
                log::warn!("Rollback after failed COMMIT also failed: {}", e);
            }
            return Err(match commit_err {
                DbError::TransactionError(_) => commit_err,
                other => DbError::TransactionError(format!("COMMIT failed: {other}")),
            });
        }
        Ok(())
    }

    fn rollback(mut self) {
        self.finished = true;
        if let Err(e) = self.db.rollback() {
            log::warn!("Rollback failed: {}", e);
        }
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log::debug!("Transaction scope ended without commit, rolling back");
            if let Err(e) = self.db.rollback() {
                log::warn!("Rollback failed: {}", e);
            }
        }
    }
}

/// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
/// error.
///
/// The transaction is also rolled back if `body` panics. A failed `COMMIT`
/// is reported as [`DbError::TransactionError`].
pub fn with_transaction<T, E, F>(db: &dyn Database, body: F) -> Result<T, E>
where
    F: FnOnce(&dyn Database) -> Result<T, E>,
    E: From<DbError>,
{
    let guard = TransactionGuard::begin(db)?;

    match body(db) {
        Ok(value) => {
            guard.commit()?;
            Ok(value)
        }
        Err(e) => {
            guard.rollback();
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;
