use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use error_stack::Report;
use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

use crate::error::ConvertError;

pub use self::{movie::*, rental::*, user::*};

mod movie;
mod rental;
mod user;

const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-local store implementing every kernel repository.
///
/// Clones share the same tables. A transaction holds the table lock until it is
/// committed or dropped, so transactions never interleave.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Transaction = MemoryTransaction;

    #[tracing::instrument(skip_all)]
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = tokio::time::timeout(LOCK_TIMEOUT, self.tables.clone().lock_owned())
            .await
            .convert_error()?;
        let staged = guard.clone();
        Ok(MemoryTransaction { guard, staged })
    }
}

/// Works on a private copy of the tables; [`Transaction::commit`] publishes it.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let Self { mut guard, staged } = self;
        *guard = staged;
        tracing::trace!("transaction committed");
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        tracing::trace!("transaction rolled back");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub(in crate::database) struct Tables {
    users: BTreeMap<i32, UserRow>,
    movies: BTreeMap<i32, MovieRow>,
    rentals: BTreeMap<i32, RentalRow>,
    sequences: Sequences,
}

// Last identifier handed out per table, serial style.
#[derive(Debug, Clone, Default)]
struct Sequences {
    users: i32,
    movies: i32,
    rentals: i32,
}

fn next_id(sequence: &mut i32, table: &str) -> error_stack::Result<i32, KernelError> {
    let id = sequence.checked_add(1).ok_or_else(|| {
        Report::new(KernelError::Internal).attach_printable(format!("{table} sequence exhausted"))
    })?;
    *sequence = id;
    Ok(id)
}
