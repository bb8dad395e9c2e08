use serde::Serialize;

use kernel::prelude::entity::{DestructMovie, Movie};

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDto {
    pub id: i32,
    pub name: String,
    pub adults_only: bool,
    pub rental_id: Option<i32>,
}

impl From<Movie> for MovieDto {
    fn from(value: Movie) -> Self {
        let DestructMovie {
            id,
            name,
            adults_only,
            rental_id,
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            adults_only: adults_only.into(),
            rental_id: rental_id.map(Into::into),
        }
    }
}

pub struct GetMovieDto {
    pub id: i32,
}

pub struct CreateMovieDto {
    pub name: String,
    pub adults_only: bool,
}
