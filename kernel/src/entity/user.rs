mod birth_date;
mod email;
mod id;
mod name;
mod national_id;

pub use self::{birth_date::*, email::*, id::*, name::*, national_id::*};
use destructure::Destructure;
use time::Date;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct User {
    id: UserId,
    first_name: UserFirstName,
    last_name: UserLastName,
    email: UserEmail,
    national_id: UserNationalId,
    birth_date: UserBirthDate,
}

impl User {
    pub fn new(
        id: UserId,
        first_name: UserFirstName,
        last_name: UserLastName,
        email: UserEmail,
        national_id: UserNationalId,
        birth_date: UserBirthDate,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            national_id,
            birth_date,
        }
    }

    pub fn age_at(&self, today: Date) -> i32 {
        self.birth_date.age_at(today)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct UserDraft {
    first_name: UserFirstName,
    last_name: UserLastName,
    email: UserEmail,
    national_id: UserNationalId,
    birth_date: UserBirthDate,
}

impl UserDraft {
    pub fn new(
        first_name: UserFirstName,
        last_name: UserLastName,
        email: UserEmail,
        national_id: UserNationalId,
        birth_date: UserBirthDate,
    ) -> Self {
        Self {
            first_name,
            last_name,
            email,
            national_id,
            birth_date,
        }
    }

    pub fn into_user(self, id: UserId) -> User {
        let DestructUserDraft {
            first_name,
            last_name,
            email,
            national_id,
            birth_date,
        } = self.into_destruct();
        User::new(id, first_name, last_name, email, national_id, birth_date)
    }
}
