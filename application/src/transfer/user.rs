use serde::Serialize;
use time::Date;

use kernel::prelude::entity::{DestructUser, User};

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub national_id: String,
    pub birth_date: Date,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let DestructUser {
            id,
            first_name,
            last_name,
            email,
            national_id,
            birth_date,
        } = value.into_destruct();
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            national_id: national_id.into(),
            birth_date: birth_date.into(),
        }
    }
}

pub struct GetUserDto {
    pub id: i32,
}

pub struct CreateUserDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub national_id: String,
    pub birth_date: Date,
}
