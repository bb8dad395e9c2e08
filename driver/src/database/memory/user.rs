use time::Date;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{
    User, UserBirthDate, UserDraft, UserEmail, UserFirstName, UserId, UserLastName,
    UserNationalId,
};
use kernel::KernelError;

use super::{next_id, MemoryTransaction};

pub struct MemoryUserRepository;

#[async_trait::async_trait]
impl UserQuery for MemoryUserRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = con.staged.users.get(&i32::from(*id)).cloned();
        Ok(row.map(User::from))
    }
}

#[async_trait::async_trait]
impl UserModifier for MemoryUserRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        user: &UserDraft,
    ) -> error_stack::Result<User, KernelError> {
        let id = next_id(&mut con.staged.sequences.users, "users")?;
        let user = user.clone().into_user(UserId::new(id));
        con.staged.users.insert(id, UserRow::from(&user));
        Ok(user)
    }
}

#[derive(Debug, Clone)]
pub(in crate::database) struct UserRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    national_id: String,
    birth_date: Date,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        User::new(
            UserId::new(value.id),
            UserFirstName::new(value.first_name),
            UserLastName::new(value.last_name),
            UserEmail::new(value.email),
            UserNationalId::new(value.national_id),
            UserBirthDate::new(value.birth_date),
        )
    }
}

impl From<&User> for UserRow {
    fn from(value: &User) -> Self {
        Self {
            id: i32::from(*value.id()),
            first_name: value.first_name().clone().into(),
            last_name: value.last_name().clone().into(),
            email: value.email().clone().into(),
            national_id: value.national_id().clone().into(),
            birth_date: (*value.birth_date()).into(),
        }
    }
}
