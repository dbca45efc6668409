// ==================== USER PERSISTENCE ====================
// Thin wrappers over the `users` collection. Each operation issues
// exactly one store call; "not found" is the only classified failure,
// everything else surfaces as a database error.

use crate::{
    database::MongoDB,
    models::{CreateUserRequest, User, USER_FIELDS},
    utils::error::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use serde_json::Value;

const COLLECTION: &str = "users";

fn db_error(e: impl std::fmt::Display) -> AppError {
    AppError::DatabaseError(e.to_string())
}

fn not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// Inserts a new user and returns it with the store-assigned id.
pub async fn create_user(db: &MongoDB, request: CreateUserRequest) -> Result<User, AppError> {
    let mut user = User {
        id: None,
        first_name: request.first_name,
        last_name: request.last_name,
        age_group: request.age_group,
        gender: request.gender,
        has_laptop: request.has_laptop,
        bio: request.bio,
        heard_from: request.heard_from,
    };

    let collection = db.collection::<User>(COLLECTION);
    let result = collection.insert_one(&user).await.map_err(db_error)?;
    user.id = result.inserted_id.as_object_id();

    Ok(user)
}

/// Fetches every user in the collection
pub async fn list_users(db: &MongoDB) -> Result<Vec<User>, AppError> {
    let collection = db.collection::<User>(COLLECTION);
    let mut cursor = collection.find(doc! {}).await.map_err(db_error)?;

    let mut users = Vec::new();
    while let Some(user) = cursor.try_next().await.map_err(db_error)? {
        users.push(user);
    }

    Ok(users)
}

pub async fn get_user(db: &MongoDB, id: ObjectId) -> Result<User, AppError> {
    let collection = db.collection::<User>(COLLECTION);
    collection
        .find_one(doc! { "_id": id })
        .await
        .map_err(db_error)?
        .ok_or_else(not_found)
}

/// Merge-update: `$set` only the recognized fields present in `body`,
/// returning the post-update document. A body with no recognized fields
/// is a no-op that re-reads the current record.
pub async fn update_user(db: &MongoDB, id: ObjectId, body: &Value) -> Result<User, AppError> {
    let changes = update_document(body)?;
    if changes.is_empty() {
        return get_user(db, id).await;
    }

    let collection = db.collection::<User>(COLLECTION);
    collection
        .find_one_and_update(doc! { "_id": id }, doc! { "$set": changes })
        .return_document(ReturnDocument::After)
        .await
        .map_err(db_error)?
        .ok_or_else(not_found)
}

pub async fn delete_user(db: &MongoDB, id: ObjectId) -> Result<(), AppError> {
    let collection = db.collection::<User>(COLLECTION);
    let result = collection
        .delete_one(doc! { "_id": id })
        .await
        .map_err(db_error)?;

    if result.deleted_count == 0 {
        return Err(not_found());
    }
    Ok(())
}

/// Builds the `$set` document from a validated update body, keeping
/// only schema fields and dropping anything else the client sent.
fn update_document(body: &Value) -> Result<Document, AppError> {
    let mut changes = Document::new();
    for field in USER_FIELDS {
        if let Some(value) = body.get(field) {
            changes.insert(field, mongodb::bson::to_bson(value).map_err(db_error)?);
        }
    }
    Ok(changes)
}
