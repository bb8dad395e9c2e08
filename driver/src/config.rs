use std::env::VarError;

use error_stack::Report;
use time::Duration;

use kernel::{KernelError, RentalPolicy};

use crate::env;
use crate::error::{ConvertError, DriverError};

const RENTAL_PERIOD_DAYS: &str = "RENTAL_PERIOD_DAYS";

/// Reads the rental policy from the environment (or a `.env` file).
///
/// `RENTAL_PERIOD_DAYS` is optional and falls back to the default period when unset.
pub fn load_rental_policy() -> error_stack::Result<RentalPolicy, KernelError> {
    rental_policy_from(env(RENTAL_PERIOD_DAYS))
}

fn rental_policy_from(
    value: Result<String, DriverError>,
) -> error_stack::Result<RentalPolicy, KernelError> {
    let raw = match value {
        Ok(raw) => raw,
        Err(DriverError::Env(dotenvy::Error::EnvVar(VarError::NotPresent))) => {
            return Ok(RentalPolicy::default());
        }
        Err(error) => {
            return Err(Report::new(error)
                .change_context(KernelError::Internal)
                .attach_printable(format!("failed to read {RENTAL_PERIOD_DAYS}")));
        }
    };
    let days = raw
        .trim()
        .parse::<i64>()
        .map_err(DriverError::from)
        .convert_error()?;
    if days <= 0 {
        return Err(Report::new(DriverError::Config(format!(
            "{RENTAL_PERIOD_DAYS} must be positive, got {days}"
        )))
        .change_context(KernelError::Internal));
    }
    tracing::debug!(days, "rental period loaded");
    Ok(RentalPolicy::new(Duration::days(days)))
}
