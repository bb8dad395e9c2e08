use std::ops::Deref;
use std::sync::Arc;

use vodca::References;

use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::{DependOnMovieQuery, DependOnRentalQuery, DependOnUserQuery};
use kernel::interface::update::{
    DependOnMovieModifier, DependOnRentalModifier, DependOnUserModifier,
};
use kernel::{DependOnRentalPolicy, KernelError, RentalPolicy};

use crate::config::load_rental_policy;
use crate::database::{
    MemoryDatabase, MemoryMovieRepository, MemoryRentalRepository, MemoryUserRepository,
};

/// Composition root handing the in-memory repositories and the rental policy to services.
#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub fn new(database: MemoryDatabase, policy: RentalPolicy) -> Self {
        Self(Arc::new(Handler { database, policy }))
    }

    pub fn init() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init()?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    database: MemoryDatabase,
    policy: RentalPolicy,
}

impl Handler {
    pub fn init() -> error_stack::Result<Self, KernelError> {
        let policy = load_rental_policy()?;
        tracing::info!(period = ?policy.period(), "handler initialised");
        Ok(Self {
            database: MemoryDatabase::default(),
            policy,
        })
    }
}

impl DependOnDatabaseConnection for AppModule {
    type DatabaseConnection = MemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        self.database()
    }
}

impl DependOnRentalPolicy for AppModule {
    fn rental_policy(&self) -> &RentalPolicy {
        self.policy()
    }
}

impl DependOnUserQuery for AppModule {
    type UserQuery = MemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &MemoryUserRepository
    }
}

impl DependOnUserModifier for AppModule {
    type UserModifier = MemoryUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &MemoryUserRepository
    }
}

impl DependOnMovieQuery for AppModule {
    type MovieQuery = MemoryMovieRepository;
    fn movie_query(&self) -> &Self::MovieQuery {
        &MemoryMovieRepository
    }
}

impl DependOnMovieModifier for AppModule {
    type MovieModifier = MemoryMovieRepository;
    fn movie_modifier(&self) -> &Self::MovieModifier {
        &MemoryMovieRepository
    }
}

impl DependOnRentalQuery for AppModule {
    type RentalQuery = MemoryRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &MemoryRentalRepository
    }
}

impl DependOnRentalModifier for AppModule {
    type RentalModifier = MemoryRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &MemoryRentalRepository
    }
}
