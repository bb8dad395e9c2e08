use serde::{Deserialize, Serialize};
use time::Date;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct UserBirthDate(Date);

impl UserBirthDate {
    pub fn new(date: impl Into<Date>) -> Self {
        Self(date.into())
    }

    /// Whole years elapsed between the birth date and `today`.
    pub fn age_at(&self, today: Date) -> i32 {
        let birth = self.0;
        let age = today.year() - birth.year();
        let before_birthday = (u8::from(today.month()), today.day())
            < (u8::from(birth.month()), birth.day());
        if before_birthday {
            age - 1
        } else {
            age
        }
    }
}
