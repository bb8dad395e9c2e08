use std::collections::HashSet;

use error_stack::{Report, ResultExt};
use time::OffsetDateTime;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnMovieQuery, DependOnRentalQuery, DependOnUserQuery, MovieQuery, RentalQuery,
    UserQuery,
};
use kernel::interface::update::{
    DependOnMovieModifier, DependOnRentalModifier, MovieModifier, RentalModifier,
};
use kernel::prelude::entity::{IsClosed, MovieId, RentalDate, RentalDraft, RentalId, UserId};
use kernel::{DependOnRentalPolicy, KernelError, Resource};

use crate::transfer::{CreateRentalDto, FinishRentalDto, GetRentalDto, RentalDto};

#[async_trait::async_trait]
pub trait GetRentalService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnRentalQuery
{
    async fn get_rentals(&self) -> error_stack::Result<Vec<RentalDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let rentals = self.rental_query().find_all(&mut connection).await?;
        connection.commit().await?;

        Ok(rentals.into_iter().map(RentalDto::from).collect())
    }

    async fn get_rental_by_id(
        &self,
        dto: GetRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = RentalId::new(dto.id);
        let rental = self
            .rental_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound(Resource::Rental)))
            .attach_printable_lazy(|| format!("rental_id: {}", dto.id))?;
        connection.commit().await?;

        Ok(RentalDto::from(rental))
    }
}

impl<T> GetRentalService for T where T: DependOnDatabaseConnection + DependOnRentalQuery {}

#[async_trait::async_trait]
pub trait CreateRentalService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnUserQuery
    + DependOnMovieQuery
    + DependOnMovieModifier
    + DependOnRentalQuery
    + DependOnRentalModifier
    + DependOnRentalPolicy
{
    /// Opens a rental for `dto.user_id` holding every requested movie.
    ///
    /// Checks run in order and stop at the first violation: the user must exist, the request
    /// must name at least one movie, the user must not hold an open rental, and each movie (in request order) must exist, be free and be
    /// allowed for the user's age. Nothing is written unless every check passes.
    async fn create_rental(
        &self,
        dto: CreateRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let user_id = UserId::new(dto.user_id);
        let user = self
            .user_query()
            .find_by_id(&mut connection, &user_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound(Resource::User)))
            .attach_printable_lazy(|| format!("user_id: {}", dto.user_id))?;

        let movie_ids = distinct_movies(dto.movies_id);
        if movie_ids.is_empty() {
            return Err(Report::new(KernelError::InvalidRequest)
                .attach_printable("movies_id is empty"));
        }

        let now = OffsetDateTime::now_utc();
        let age = user.age_at(now.date());

        let rentals = self
            .rental_query()
            .find_by_user_id(&mut connection, &user_id)
            .await?;
        if let Some(pending) = rentals.iter().find(|rental| rental.is_open()) {
            tracing::debug!(
                user_id = dto.user_id,
                rental_id = ?pending.id(),
                "user already has an open rental"
            );
            return Err(Report::new(KernelError::PendentRental)
                .attach_printable(format!("open rental: {:?}", pending.id())));
        }

        let policy = self.rental_policy();
        let mut movies = Vec::with_capacity(movie_ids.len());
        for movie_id in movie_ids {
            let movie = self
                .movie_query()
                .find_by_id(&mut connection, &movie_id)
                .await?
                .ok_or_else(|| Report::new(KernelError::NotFound(Resource::Movie)))
                .attach_printable_lazy(|| format!("movie_id: {:?}", movie_id))?;
            if !movie.is_available() {
                return Err(Report::new(KernelError::MovieInRental).attach_printable(format!(
                    "movie {:?} is held by rental {:?}",
                    movie.id(),
                    movie.rental_id()
                )));
            }
            if movie.adults_only().is_restricted() && age < *policy.adult_age() {
                return Err(Report::new(KernelError::InsufficientAge)
                    .attach_printable(format!("user age {age}, movie {:?}", movie.id())));
            }
            movies.push(movie);
        }

        let date = RentalDate::new(now);
        let draft = RentalDraft::new(date, date.end_after(*policy.period()), user_id);
        let mut rental = self.rental_modifier().create(&mut connection, &draft).await?;

        let rental_id = *rental.id();
        let mut attached = Vec::with_capacity(movies.len());
        for mut movie in movies {
            movie.substitute(|movie| *movie.rental_id = Some(rental_id));
            self.movie_modifier()
                .update(&mut connection, &movie)
                .await?;
            attached.push(movie);
        }
        // Stored rentals list their movies by id.
        attached.sort_by_key(|movie| *movie.id());
        rental.substitute(|rental| rental.movies.append(&mut attached));

        connection.commit().await?;
        tracing::info!(rental_id = ?rental_id, user_id = dto.user_id, "rental created");

        Ok(RentalDto::from(rental))
    }
}

impl<T> CreateRentalService for T where
    T: DependOnDatabaseConnection
        + DependOnUserQuery
        + DependOnMovieQuery
        + DependOnMovieModifier
        + DependOnRentalQuery
        + DependOnRentalModifier
        + DependOnRentalPolicy
{
}

#[async_trait::async_trait]
pub trait FinishRentalService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnRentalQuery
    + DependOnRentalModifier
    + DependOnMovieModifier
{
    async fn finish_rental(&self, dto: FinishRentalDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = RentalId::new(dto.id);
        let mut rental = self
            .rental_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound(Resource::Rental)))
            .attach_printable_lazy(|| format!("rental_id: {}", dto.id))?;

        rental.substitute(|rental| *rental.closed = IsClosed::new(true));
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;

        for mut movie in rental.movies().iter().cloned() {
            movie.substitute(|movie| *movie.rental_id = None);
            self.movie_modifier()
                .update(&mut connection, &movie)
                .await?;
        }

        connection.commit().await?;
        tracing::info!(rental_id = dto.id, "rental finished");

        Ok(())
    }
}

impl<T> FinishRentalService for T where
    T: DependOnDatabaseConnection
        + DependOnRentalQuery
        + DependOnRentalModifier
        + DependOnMovieModifier
{
}

// Repeated ids would attach the same movie twice; only the first occurrence is kept.
fn distinct_movies(ids: Vec<i32>) -> Vec<MovieId> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .map(MovieId::new)
        .collect()
}

#[cfg(test)]
mod test {
    use rand::Rng;
    use time::{Date, Duration, Month, OffsetDateTime};

    use driver::database::MemoryDatabase;
    use driver::module::AppModule;
    use kernel::{KernelError, RentalPolicy, Resource};

    use crate::service::{
        CreateMovieService, CreateRentalService, CreateUserService, FinishRentalService,
        GetMovieService, GetRentalService,
    };
    use crate::transfer::{
        CreateMovieDto, CreateRentalDto, CreateUserDto, FailureDto, FinishRentalDto,
        GetMovieDto, GetRentalDto, MovieDto, UserDto,
    };

    fn module() -> AppModule {
        AppModule::new(MemoryDatabase::default(), RentalPolicy::default())
    }

    async fn user_aged(app: &AppModule, age: i32) -> UserDto {
        let today = OffsetDateTime::now_utc().date();
        let birth_date = Date::from_calendar_date(today.year() - age, Month::January, 1).unwrap();
        app.create_user(CreateUserDto {
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            email: "ana@example.com".to_string(),
            national_id: "123456789".to_string(),
            birth_date,
        })
        .await
        .unwrap()
    }

    async fn movie(app: &AppModule, name: &str, adults_only: bool) -> MovieDto {
        app.create_movie(CreateMovieDto {
            name: name.to_string(),
            adults_only,
        })
        .await
        .unwrap()
    }

    fn adult_age() -> i32 {
        rand::thread_rng().gen_range(18..=80)
    }

    fn minor_age() -> i32 {
        rand::thread_rng().gen_range(1..18)
    }

    #[tokio::test]
    async fn creates_rental_with_requested_movies() {
        let app = module();
        let user = user_aged(&app, 25).await;
        let first = movie(&app, "Central Station", false).await;
        let second = movie(&app, "City of God", false).await;

        let rental = app
            .create_rental(CreateRentalDto {
                user_id: user.id,
                movies_id: vec![first.id, second.id],
            })
            .await
            .unwrap();

        assert_eq!(rental.user_id, user.id);
        assert!(!rental.closed);
        assert_eq!(rental.end_date - rental.date, Duration::days(3));
        let movie_ids = rental.movies.iter().map(|m| m.id).collect::<Vec<_>>();
        assert_eq!(movie_ids, vec![first.id, second.id]);
        assert!(rental.movies.iter().all(|m| m.rental_id == Some(rental.id)));

        let stored = app
            .get_movie(GetMovieDto { id: first.id })
            .await
            .unwrap();
        assert_eq!(stored.rental_id, Some(rental.id));
    }

    #[tokio::test]
    async fn get_rental_by_id_returns_stored_rental() {
        let app = module();
        let user = user_aged(&app, adult_age()).await;
        let film = movie(&app, "Elite Squad", true).await;
        let created = app
            .create_rental(CreateRentalDto {
                user_id: user.id,
                movies_id: vec![film.id],
            })
            .await
            .unwrap();

        let found = app
            .get_rental_by_id(GetRentalDto { id: created.id })
            .await
            .unwrap();
        assert_eq!(found, created);

        let all = app.get_rentals().await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn missing_rental_is_not_found() {
        let app = module();
        let error = app
            .get_rental_by_id(GetRentalDto { id: 1 })
            .await
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &KernelError::NotFound(Resource::Rental)
        );

        let body = serde_json::to_value(FailureDto::from(&error)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"name": "NotFoundError", "message": "Rental not found."})
        );
    }

    #[tokio::test]
    async fn missing_user_is_rejected_before_movies() {
        let app = module();
        let error = app
            .create_rental(CreateRentalDto {
                user_id: 1,
                movies_id: vec![1, 2],
            })
            .await
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &KernelError::NotFound(Resource::User)
        );
        assert_eq!(error.current_context().to_string(), "User not found.");
    }

    #[tokio::test]
    async fn open_rental_blocks_a_second_one() {
        let app = module();
        let user = user_aged(&app, 25).await;
        let first = movie(&app, "Bacurau", false).await;
        let second = movie(&app, "Aquarius", false).await;
        let third = movie(&app, "Pixote", false).await;
        app.create_rental(CreateRentalDto {
            user_id: user.id,
            movies_id: vec![first.id, second.id],
        })
        .await
        .unwrap();

        let error = app
            .create_rental(CreateRentalDto {
                user_id: user.id,
                movies_id: vec![third.id],
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::PendentRental);

        let body = serde_json::to_value(FailureDto::from(&error)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "name": "PendentRentalError",
                "message": "The user already have a rental!"
            })
        );
    }

    #[tokio::test]
    async fn missing_movie_is_not_found() {
        let app = module();
        let user = user_aged(&app, adult_age()).await;
        let error = app
            .create_rental(CreateRentalDto {
                user_id: user.id,
                movies_id: vec![42],
            })
            .await
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &KernelError::NotFound(Resource::Movie)
        );
        assert_eq!(error.current_context().to_string(), "Movie not found.");
    }

    #[tokio::test]
    async fn movie_held_by_another_rental_is_rejected() {
        let app = module();
        let holder = user_aged(&app, adult_age()).await;
        let other = user_aged(&app, adult_age()).await;
        let film = movie(&app, "Carandiru", false).await;
        app.create_rental(CreateRentalDto {
            user_id: holder.id,
            movies_id: vec![film.id],
        })
        .await
        .unwrap();

        let error = app
            .create_rental(CreateRentalDto {
                user_id: other.id,
                movies_id: vec![film.id],
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::MovieInRental);
        assert_eq!(error.current_context().to_string(), "Movie alredy in a rental");
    }

    #[tokio::test]
    async fn minors_cannot_rent_adults_only_movies() {
        let app = module();
        let minor = user_aged(&app, minor_age()).await;
        let adult = user_aged(&app, adult_age()).await;
        let family = movie(&app, "Rio", false).await;
        let restricted = movie(&app, "Tropa de Elite", true).await;

        let error = app
            .create_rental(CreateRentalDto {
                user_id: minor.id,
                movies_id: vec![family.id, restricted.id],
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InsufficientAge);
        assert_eq!(error.current_context().to_string(), "Cannot see that movie.");

        let rental = app
            .create_rental(CreateRentalDto {
                user_id: adult.id,
                movies_id: vec![family.id, restricted.id],
            })
            .await
            .unwrap();
        assert_eq!(rental.movies.len(), 2);
    }

    #[tokio::test]
    async fn minors_may_rent_unrestricted_movies() {
        let app = module();
        let minor = user_aged(&app, minor_age()).await;
        let family = movie(&app, "Rio", false).await;

        let rental = app
            .create_rental(CreateRentalDto {
                user_id: minor.id,
                movies_id: vec![family.id],
            })
            .await
            .unwrap();
        assert_eq!(rental.movies[0].id, family.id);
    }

    #[tokio::test]
    async fn first_violation_wins() {
        let app = module();
        let holder = user_aged(&app, 30).await;
        let minor = user_aged(&app, 12).await;
        let taken = movie(&app, "Taken", true).await;
        app.create_rental(CreateRentalDto {
            user_id: holder.id,
            movies_id: vec![taken.id],
        })
        .await
        .unwrap();

        let error = app
            .create_rental(CreateRentalDto {
                user_id: minor.id,
                movies_id: vec![taken.id, 999],
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::MovieInRental);
    }

    #[tokio::test]
    async fn rejected_rental_leaves_nothing_behind() {
        let app = module();
        let user = user_aged(&app, 40).await;
        let film = movie(&app, "Cidade Baixa", false).await;

        let error = app
            .create_rental(CreateRentalDto {
                user_id: user.id,
                movies_id: vec![film.id, 999],
            })
            .await
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &KernelError::NotFound(Resource::Movie)
        );

        assert!(app.get_rentals().await.unwrap().is_empty());
        let stored = app.get_movie(GetMovieDto { id: film.id }).await.unwrap();
        assert_eq!(stored.rental_id, None);
    }

    #[tokio::test]
    async fn empty_request_is_invalid() {
        let app = module();
        let user = user_aged(&app, 40).await;
        let error = app
            .create_rental(CreateRentalDto {
                user_id: user.id,
                movies_id: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidRequest);
    }

    #[tokio::test]
    async fn missing_user_wins_over_empty_request() {
        let app = module();
        let error = app
            .create_rental(CreateRentalDto {
                user_id: 7,
                movies_id: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &KernelError::NotFound(Resource::User)
        );
    }

    #[tokio::test]
    async fn created_rental_matches_stored_movie_order() {
        let app = module();
        let user = user_aged(&app, 33).await;
        let first = movie(&app, "Vidas Secas", false).await;
        let second = movie(&app, "Deus e o Diabo na Terra do Sol", false).await;

        let created = app
            .create_rental(CreateRentalDto {
                user_id: user.id,
                movies_id: vec![second.id, first.id],
            })
            .await
            .unwrap();
        let fetched = app
            .get_rental_by_id(GetRentalDto { id: created.id })
            .await
            .unwrap();
        assert_eq!(created, fetched);
        let movie_ids = created.movies.iter().map(|m| m.id).collect::<Vec<_>>();
        assert_eq!(movie_ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn duplicated_movie_ids_are_attached_once() {
        let app = module();
        let user = user_aged(&app, 40).await;
        let film = movie(&app, "O Auto da Compadecida", false).await;

        let rental = app
            .create_rental(CreateRentalDto {
                user_id: user.id,
                movies_id: vec![film.id, film.id],
            })
            .await
            .unwrap();
        assert_eq!(rental.movies.len(), 1);
    }

    #[tokio::test]
    async fn finishing_releases_movies() {
        let app = module();
        let user = user_aged(&app, 25).await;
        let film = movie(&app, "Que Horas Ela Volta?", false).await;
        let rental = app
            .create_rental(CreateRentalDto {
                user_id: user.id,
                movies_id: vec![film.id],
            })
            .await
            .unwrap();

        app.finish_rental(FinishRentalDto { id: rental.id })
            .await
            .unwrap();

        let finished = app
            .get_rental_by_id(GetRentalDto { id: rental.id })
            .await
            .unwrap();
        assert!(finished.closed);
        assert!(finished.movies.is_empty());
        let stored = app.get_movie(GetMovieDto { id: film.id }).await.unwrap();
        assert_eq!(stored.rental_id, None);

        let again = app
            .create_rental(CreateRentalDto {
                user_id: user.id,
                movies_id: vec![film.id],
            })
            .await
            .unwrap();
        assert_ne!(again.id, rental.id);
    }

    #[tokio::test]
    async fn finishing_twice_is_idempotent() {
        let app = module();
        let user = user_aged(&app, 50).await;
        let film = movie(&app, "O Pagador de Promessas", false).await;
        let rental = app
            .create_rental(CreateRentalDto {
                user_id: user.id,
                movies_id: vec![film.id],
            })
            .await
            .unwrap();

        app.finish_rental(FinishRentalDto { id: rental.id })
            .await
            .unwrap();
        let first = app
            .get_rental_by_id(GetRentalDto { id: rental.id })
            .await
            .unwrap();

        app.finish_rental(FinishRentalDto { id: rental.id })
            .await
            .unwrap();
        let second = app
            .get_rental_by_id(GetRentalDto { id: rental.id })
            .await
            .unwrap();

        assert!(second.closed);
        assert_eq!(first, second);
        let stored = app.get_movie(GetMovieDto { id: film.id }).await.unwrap();
        assert_eq!(stored.rental_id, None);
    }

    #[tokio::test]
    async fn finishing_missing_rental_is_not_found() {
        let app = module();
        let error = app
            .finish_rental(FinishRentalDto { id: 1 })
            .await
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &KernelError::NotFound(Resource::Rental)
        );
        assert_eq!(error.current_context().to_string(), "Rental not found.");
    }
}
