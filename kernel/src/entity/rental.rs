mod closed;
mod date;
mod id;

pub use self::{closed::*, date::*, id::*};
use crate::entity::{Movie, UserId};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Rental {
    id: RentalId,
    date: RentalDate,
    end_date: RentalEndDate,
    user_id: UserId,
    closed: IsClosed,
    movies: Vec<Movie>,
}

impl Rental {
    pub fn new(
        id: RentalId,
        date: RentalDate,
        end_date: RentalEndDate,
        user_id: UserId,
        closed: IsClosed,
        movies: Vec<Movie>,
    ) -> Self {
        Self {
            id,
            date,
            end_date,
            user_id,
            closed,
            movies,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.closed.is_closed()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct RentalDraft {
    date: RentalDate,
    end_date: RentalEndDate,
    user_id: UserId,
}

impl RentalDraft {
    pub fn new(date: RentalDate, end_date: RentalEndDate, user_id: UserId) -> Self {
        Self {
            date,
            end_date,
            user_id,
        }
    }

    pub fn into_rental(self, id: RentalId) -> Rental {
        let DestructRentalDraft {
            date,
            end_date,
            user_id,
        } = self.into_destruct();
        Rental::new(
            id,
            date,
            end_date,
            user_id,
            IsClosed::new(false),
            Vec::new(),
        )
    }
}
