use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

// Kept as text: national identifiers may carry leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct UserNationalId(String);

impl UserNationalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}
