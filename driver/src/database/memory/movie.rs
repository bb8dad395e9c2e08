use error_stack::Report;

use kernel::interface::query::MovieQuery;
use kernel::interface::update::MovieModifier;
use kernel::prelude::entity::{AdultsOnly, Movie, MovieDraft, MovieId, MovieName, RentalId};
use kernel::KernelError;

use super::{next_id, MemoryTransaction};

pub struct MemoryMovieRepository;

#[async_trait::async_trait]
impl MovieQuery for MemoryMovieRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Movie>, KernelError> {
        Ok(con
            .staged
            .movies
            .values()
            .cloned()
            .map(Movie::from)
            .collect())
    }

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &MovieId,
    ) -> error_stack::Result<Option<Movie>, KernelError> {
        let row = con.staged.movies.get(&i32::from(*id)).cloned();
        Ok(row.map(Movie::from))
    }
}

#[async_trait::async_trait]
impl MovieModifier for MemoryMovieRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        movie: &MovieDraft,
    ) -> error_stack::Result<Movie, KernelError> {
        let id = next_id(&mut con.staged.sequences.movies, "movies")?;
        let movie = movie.clone().into_movie(MovieId::new(id));
        con.staged.movies.insert(id, MovieRow::from(&movie));
        Ok(movie)
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        movie: &Movie,
    ) -> error_stack::Result<(), KernelError> {
        let row = MovieRow::from(movie);
        if let Some(rental_id) = row.rental_id {
            if !con.staged.rentals.contains_key(&rental_id) {
                return Err(Report::new(KernelError::Internal)
                    .attach_printable(format!("rental {rental_id} does not exist")));
            }
        }
        let stored = con.staged.movies.get_mut(&row.id).ok_or_else(|| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("movie {} does not exist", row.id))
        })?;
        *stored = row;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(in crate::database) struct MovieRow {
    id: i32,
    name: String,
    adults_only: bool,
    rental_id: Option<i32>,
}

impl MovieRow {
    pub(in crate::database) fn is_attached_to(&self, rental_id: i32) -> bool {
        self.rental_id == Some(rental_id)
    }
}

impl From<MovieRow> for Movie {
    fn from(value: MovieRow) -> Self {
        Movie::new(
            MovieId::new(value.id),
            MovieName::new(value.name),
            AdultsOnly::new(value.adults_only),
            value.rental_id.map(RentalId::new),
        )
    }
}

impl From<&Movie> for MovieRow {
    fn from(value: &Movie) -> Self {
        Self {
            id: i32::from(*value.id()),
            name: value.name().clone().into(),
            adults_only: value.adults_only().is_restricted(),
            rental_id: value.rental_id().map(i32::from),
        }
    }
}
