mod failure;
mod movie;
mod rental;
mod user;

pub use self::{failure::*, movie::*, rental::*, user::*};
