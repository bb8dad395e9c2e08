use error_stack::Report;
use time::OffsetDateTime;

use kernel::interface::query::RentalQuery;
use kernel::interface::update::RentalModifier;
use kernel::prelude::entity::{
    IsClosed, Movie, Rental, RentalDate, RentalDraft, RentalEndDate, RentalId, UserId,
};
use kernel::KernelError;

use super::{next_id, MemoryTransaction, Tables};

pub struct MemoryRentalRepository;

#[async_trait::async_trait]
impl RentalQuery for MemoryRentalRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let tables = &con.staged;
        Ok(tables
            .rentals
            .values()
            .map(|row| MemoryRentalInternal::assemble(tables, row))
            .collect())
    }

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let tables = &con.staged;
        Ok(tables
            .rentals
            .get(&i32::from(*id))
            .map(|row| MemoryRentalInternal::assemble(tables, row)))
    }

    async fn find_by_user_id(
        &self,
        con: &mut MemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let tables = &con.staged;
        let user_id = i32::from(*user_id);
        Ok(tables
            .rentals
            .values()
            .filter(|row| row.user_id == user_id)
            .map(|row| MemoryRentalInternal::assemble(tables, row))
            .collect())
    }
}

#[async_trait::async_trait]
impl RentalModifier for MemoryRentalRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        rental: &RentalDraft,
    ) -> error_stack::Result<Rental, KernelError> {
        MemoryRentalInternal::ensure_user(&con.staged, rental.user_id())?;
        let id = next_id(&mut con.staged.sequences.rentals, "rentals")?;
        let rental = rental.clone().into_rental(RentalId::new(id));
        con.staged.rentals.insert(id, RentalRow::from(&rental));
        Ok(rental)
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        MemoryRentalInternal::ensure_user(&con.staged, rental.user_id())?;
        let row = RentalRow::from(rental);
        let stored = con.staged.rentals.get_mut(&row.id).ok_or_else(|| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("rental {} does not exist", row.id))
        })?;
        *stored = row;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(in crate::database) struct RentalRow {
    id: i32,
    date: OffsetDateTime,
    end_date: OffsetDateTime,
    user_id: i32,
    closed: bool,
}

impl From<&Rental> for RentalRow {
    fn from(value: &Rental) -> Self {
        Self {
            id: i32::from(*value.id()),
            date: (*value.date()).into(),
            end_date: (*value.end_date()).into(),
            user_id: i32::from(*value.user_id()),
            closed: value.closed().is_closed(),
        }
    }
}

pub(in crate::database) struct MemoryRentalInternal;

impl MemoryRentalInternal {
    // Movies are joined through their rental linkage, like a foreign key lookup.
    fn assemble(tables: &Tables, row: &RentalRow) -> Rental {
        let movies = tables
            .movies
            .values()
            .filter(|movie| movie.is_attached_to(row.id))
            .cloned()
            .map(Movie::from)
            .collect();
        Rental::new(
            RentalId::new(row.id),
            RentalDate::new(row.date),
            RentalEndDate::new(row.end_date),
            UserId::new(row.user_id),
            IsClosed::new(row.closed),
            movies,
        )
    }

    fn ensure_user(tables: &Tables, user_id: &UserId) -> error_stack::Result<(), KernelError> {
        let user_id = i32::from(*user_id);
        if tables.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(Report::new(KernelError::Internal)
                .attach_printable(format!("user {user_id} does not exist")))
        }
    }
}
