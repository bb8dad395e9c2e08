use time::Duration;

pub const ADULT_AGE: i32 = 18;
pub const DEFAULT_RENTAL_DAYS: i64 = 3;

/// Business constants applied when a rental is opened.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RentalPolicy {
    period: Duration,
    adult_age: i32,
}

impl RentalPolicy {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            adult_age: ADULT_AGE,
        }
    }

    pub fn period(&self) -> &Duration {
        &self.period
    }

    pub fn adult_age(&self) -> &i32 {
        &self.adult_age
    }
}

impl Default for RentalPolicy {
    fn default() -> Self {
        Self::new(Duration::days(DEFAULT_RENTAL_DAYS))
    }
}

pub trait DependOnRentalPolicy: 'static + Sync + Send {
    fn rental_policy(&self) -> &RentalPolicy;
}
