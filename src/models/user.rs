use serde::{Deserialize, Serialize};

/// An organisational unit users belong to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Facility {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name_first: String,
    pub name_last: String,
    pub email: String,
    /// Plain text when read from a fixture; a bcrypt hash once stored.
    #[serde(skip_serializing)]
    pub password: String,
    pub password_reset: bool,
    pub role: String,
    pub facility_id: i64,
}

impl User {
    /// Replace the password with its bcrypt hash. Values that already look like a
    /// bcrypt hash are left alone; an empty password stays empty.
    pub fn hash_password(&mut self) -> Result<(), bcrypt::BcryptError> {
        if self.password.is_empty() || is_bcrypt_hash(&self.password) {
            return Ok(());
        }
        self.password = bcrypt::hash(&self.password, bcrypt::DEFAULT_COST)?;
        Ok(())
    }
}

fn is_bcrypt_hash(value: &str) -> bool {
    value.len() == 60 && ["$2a$", "$2b$", "$2x$", "$2y$"].iter().any(|p| value.starts_with(p))
}

/// A navigation group shown in the client's left menu. `links` is a list of
/// `{ "label": "url" }` objects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeftMenuLink {
    pub id: i64,
    pub name: String,
    pub rank: i32,
    pub links: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_password_replaces_plain_text() {
        let mut user = User {
            password: "ChangeMe!".into(),
            ..Default::default()
        };
        user.hash_password().unwrap();
        assert_ne!(user.password, "ChangeMe!");
        assert!(bcrypt::verify("ChangeMe!", &user.password).unwrap());

        let stored = user.password.clone();
        user.hash_password().unwrap();
        assert_eq!(user.password, stored);
    }

    #[test]
    fn password_is_not_serialized() {
        let user = User {
            username: "jdoe".into(),
            password: "secret".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "jdoe");
    }
}
