use models::user::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Back-office account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub username: String,
    pub national_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub full_name: String,
    pub username: String,
    pub national_id: String,
    pub role: Role,
}

impl NewUser {
    pub fn into_user(self, id: Uuid) -> User {
        User { id, full_name: self.full_name, username: self.username, national_id: self.national_id, role: self.role }
    }
}

/// Partial update; absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.username.is_none() && self.national_id.is_none() && self.role.is_none()
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(v) = &self.full_name { user.full_name = v.clone(); }
        if let Some(v) = &self.username { user.username = v.clone(); }
        if let Some(v) = &self.national_id { user.national_id = v.clone(); }
        if let Some(v) = self.role { user.role = v; }
    }
}

/// Listing projection (full name omitted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub national_id: String,
    pub role: Role,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self { id: u.id, username: u.username, national_id: u.national_id, role: u.role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_snake_case_labels() {
        let p: UserPatch = serde_json::from_str(r#"{"role":"hr_readonly"}"#).unwrap();
        assert_eq!(p.role, Some(Role::HrReadonly));
        assert!(serde_json::from_str::<UserPatch>(r#"{"role":"root"}"#).is_err());
    }

    #[test]
    fn summary_drops_full_name() {
        let u = NewUser { full_name: "Ana Diaz".into(), username: "ana".into(), national_id: "12345678".into(), role: Role::Hr }
            .into_user(Uuid::nil());
        let v = serde_json::to_value(UserSummary::from(u)).unwrap();
        assert!(v.get("full_name").is_none());
        assert_eq!(v["role"], "hr");
    }
}
