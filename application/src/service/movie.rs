use error_stack::{Report, ResultExt};

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnMovieQuery, MovieQuery};
use kernel::interface::update::{DependOnMovieModifier, MovieModifier};
use kernel::prelude::entity::{AdultsOnly, MovieDraft, MovieId, MovieName};
use kernel::{KernelError, Resource};

use crate::transfer::{CreateMovieDto, GetMovieDto, MovieDto};

#[async_trait::async_trait]
pub trait GetMovieService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnMovieQuery
{
    async fn get_movies(&self) -> error_stack::Result<Vec<MovieDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let movies = self.movie_query().find_all(&mut connection).await?;
        connection.commit().await?;

        Ok(movies.into_iter().map(MovieDto::from).collect())
    }

    async fn get_movie(&self, dto: GetMovieDto) -> error_stack::Result<MovieDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = MovieId::new(dto.id);
        let movie = self
            .movie_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound(Resource::Movie)))
            .attach_printable_lazy(|| format!("movie_id: {}", dto.id))?;
        connection.commit().await?;

        Ok(MovieDto::from(movie))
    }
}

impl<T> GetMovieService for T where T: DependOnDatabaseConnection + DependOnMovieQuery {}

#[async_trait::async_trait]
pub trait CreateMovieService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnMovieModifier
{
    async fn create_movie(
        &self,
        dto: CreateMovieDto,
    ) -> error_stack::Result<MovieDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let draft = MovieDraft::new(MovieName::new(dto.name), AdultsOnly::new(dto.adults_only));
        let movie = self
            .movie_modifier()
            .create(&mut connection, &draft)
            .await?;
        connection.commit().await?;

        tracing::debug!(movie_id = ?movie.id(), "movie created");
        Ok(MovieDto::from(movie))
    }
}

impl<T> CreateMovieService for T where T: DependOnDatabaseConnection + DependOnMovieModifier {}
