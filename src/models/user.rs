use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// Documento da collection "users"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    /// Empty string, or the derived URL of the uploaded image. Never taken
    /// from the client directly.
    #[serde(default)]
    pub avatar: String,
}

/// Response de usuário (ObjectId exposto como hex)
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub avatar: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password: user.password,
            avatar: user.avatar,
        }
    }
}

/// Explicit field map handed to `$set`. The four text fields are always
/// present: a field the caller did not send arrives here as the empty string
/// and overwrites the stored value, so callers must resend everything they
/// want preserved. The avatar joins the update only when a new file was
/// uploaded in the same request.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

impl UpdateUserFields {
    pub fn into_document(self) -> Document {
        let mut update = doc! {
            "firstName": self.first_name,
            "lastName": self.last_name,
            "email": self.email,
            "password": self.password,
        };
        if let Some(avatar) = self.avatar {
            update.insert("avatar", avatar);
        }
        update
    }
}
