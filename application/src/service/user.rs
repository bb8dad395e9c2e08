use error_stack::{Report, ResultExt};

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::update::{DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{
    UserBirthDate, UserDraft, UserEmail, UserFirstName, UserId, UserLastName, UserNationalId,
};
use kernel::{KernelError, Resource};

use crate::transfer::{CreateUserDto, GetUserDto, UserDto};

#[async_trait::async_trait]
pub trait GetUserService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnUserQuery
{
    async fn get_user(&self, dto: GetUserDto) -> error_stack::Result<UserDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = UserId::new(dto.id);
        let user = self
            .user_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::NotFound(Resource::User)))
            .attach_printable_lazy(|| format!("user_id: {}", dto.id))?;
        connection.commit().await?;

        Ok(UserDto::from(user))
    }
}

impl<T> GetUserService for T where T: DependOnDatabaseConnection + DependOnUserQuery {}

#[async_trait::async_trait]
pub trait CreateUserService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnUserModifier
{
    async fn create_user(&self, dto: CreateUserDto) -> error_stack::Result<UserDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let draft = UserDraft::new(
            UserFirstName::new(dto.first_name),
            UserLastName::new(dto.last_name),
            UserEmail::new(dto.email),
            UserNationalId::new(dto.national_id),
            UserBirthDate::new(dto.birth_date),
        );
        let user = self.user_modifier().create(&mut connection, &draft).await?;
        connection.commit().await?;

        tracing::debug!(user_id = ?user.id(), "user created");
        Ok(UserDto::from(user))
    }
}

impl<T> CreateUserService for T where T: DependOnDatabaseConnection + DependOnUserModifier {}
