// ==================== USER RECORD STORE ====================
// CRUD sobre a collection "users" no MongoDB

use crate::{
    database::MongoDB,
    models::{UpdateUserFields, User},
    utils::error::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

const USERS_COLLECTION: &str = "users";

fn users(db: &MongoDB) -> Collection<User> {
    db.collection::<User>(USERS_COLLECTION)
}

/// Parse a path id into an ObjectId, rejecting malformed identifiers before
/// any query runs.
pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidId("Invalid user ID".to_string()))
}

/// Inserts a new document and returns it with the generated identifier.
pub async fn create_user(db: &MongoDB, mut user: User) -> Result<User, AppError> {
    let result = users(db)
        .insert_one(&user)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let inserted_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::DatabaseError("inserted _id is not an ObjectId".to_string()))?;
    user.id = Some(inserted_id);

    log::info!("✅ User created: {}", inserted_id.to_hex());
    Ok(user)
}

/// Returns every stored user, in insertion order.
pub async fn list_users(db: &MongoDB) -> Result<Vec<User>, AppError> {
    let mut cursor = users(db)
        .find(doc! {})
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let mut result = Vec::new();
    while let Some(user) = cursor
        .try_next()
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
    {
        result.push(user);
    }

    Ok(result)
}

pub async fn get_user(db: &MongoDB, id: &str) -> Result<User, AppError> {
    let object_id = parse_object_id(id)?;

    users(db)
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Merges the field map into the document and returns the post-update value.
pub async fn update_user(
    db: &MongoDB,
    id: &str,
    fields: UpdateUserFields,
) -> Result<User, AppError> {
    let object_id = parse_object_id(id)?;

    users(db)
        .find_one_and_update(
            doc! { "_id": object_id },
            doc! { "$set": fields.into_document() },
        )
        .return_document(ReturnDocument::After)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn delete_user(db: &MongoDB, id: &str) -> Result<(), AppError> {
    let object_id = parse_object_id(id)?;

    let result = users(db)
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    log::info!("🗑️  User deleted: {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_id_accepts_valid_hex() {
        let id = ObjectId::new().to_hex();
        assert!(parse_object_id(&id).is_ok());
    }

    #[test]
    fn parse_object_id_rejects_malformed_input() {
        let err = parse_object_id("not-an-id").unwrap_err();
        assert!(matches!(err, AppError::InvalidId(_)));
    }

    async fn test_db() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/user_service_test".to_string());
        MongoDB::new(&uri).await.expect("MongoDB must be running")
    }

    fn sample_user() -> User {
        User {
            id: None,
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
            avatar: String::new(),
        }
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn create_then_get_round_trips() {
        let db = test_db().await;

        let created = create_user(&db, sample_user()).await.unwrap();
        let id = created.id.expect("created user has an id").to_hex();
        assert!(!id.is_empty());

        let fetched = get_user(&db, &id).await.unwrap();
        assert_eq!(fetched.first_name, created.first_name);
        assert_eq!(fetched.email, created.email);
        assert_eq!(fetched.id, created.id);

        delete_user(&db, &id).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn update_rewrites_unsent_fields_with_empty_strings() {
        let db = test_db().await;

        let created = create_user(&db, sample_user()).await.unwrap();
        let id = created.id.unwrap().to_hex();

        let updated = update_user(
            &db,
            &id,
            UpdateUserFields {
                first_name: "Maria".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.first_name, "Maria");
        assert_eq!(updated.last_name, "");
        assert_eq!(updated.email, "");
        assert_eq!(updated.password, "");
        // Avatar untouched when no new file was uploaded
        assert_eq!(updated.avatar, created.avatar);

        delete_user(&db, &id).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn deleting_twice_reports_not_found() {
        let db = test_db().await;

        let created = create_user(&db, sample_user()).await.unwrap();
        let id = created.id.unwrap().to_hex();

        delete_user(&db, &id).await.unwrap();

        let err = delete_user(&db, &id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = get_user(&db, &id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn unknown_id_is_not_found() {
        let db = test_db().await;
        let id = ObjectId::new().to_hex();

        assert!(matches!(
            get_user(&db, &id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            update_user(&db, &id, UpdateUserFields::default())
                .await
                .unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            delete_user(&db, &id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
