//! Users - the record type with unique `username` and `email`.

mod repository;

use serde::{Deserialize, Serialize};

use crate::record::{Record, UniqueField, ValidationError};

pub use repository::UserRepository;

/// A user account.
///
/// `id` is `None` until the store assigns one; `version` is the optimistic
/// lock token and must be sent back unchanged with an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        User {
            id: None,
            version: 0,
            username: username.into(),
            email: email.into(),
            name: name.into(),
        }
    }
}

impl Record for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    fn unique_fields(&self) -> Vec<UniqueField<'_>> {
        vec![
            UniqueField::new("username", &self.username),
            UniqueField::new("email", &self.email),
        ]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() || self.email.is_empty() {
            let empty = [("username", &self.username), ("email", &self.email)]
                .into_iter()
                .filter(|(_, value)| value.is_empty())
                .map(|(field, _)| field)
                .collect();
            return Err(ValidationError::new(
                empty,
                "username and email are required, but one or both is empty",
            ));
        }
        Ok(())
    }
}
