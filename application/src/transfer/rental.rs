use serde::Serialize;
use time::OffsetDateTime;

use kernel::prelude::entity::{DestructRental, Rental};

use crate::transfer::MovieDto;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalDto {
    pub id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
    pub user_id: i32,
    pub closed: bool,
    pub movies: Vec<MovieDto>,
}

impl From<Rental> for RentalDto {
    fn from(value: Rental) -> Self {
        let DestructRental {
            id,
            date,
            end_date,
            user_id,
            closed,
            movies,
        } = value.into_destruct();
        Self {
            id: id.into(),
            date: date.into(),
            end_date: end_date.into(),
            user_id: user_id.into(),
            closed: closed.into(),
            movies: movies.into_iter().map(MovieDto::from).collect(),
        }
    }
}

pub struct GetRentalDto {
    pub id: i32,
}

pub struct CreateRentalDto {
    pub user_id: i32,
    pub movies_id: Vec<i32>,
}

pub struct FinishRentalDto {
    pub id: i32,
}
