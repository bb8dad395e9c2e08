use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Fromln, AsRefln,
)]
pub struct MovieId(i32);

impl MovieId {
    pub fn new(id: impl Into<i32>) -> Self {
        Self(id.into())
    }
}
