use actix_web::{web, HttpResponse, Responder};
use serde_json::{json, Value};

use crate::{
    database::MongoDB,
    models::{CreateUserRequest, UpdateUserRequest, UserResponse},
    services::user_service,
    utils::{
        error::AppError,
        validation::{self, Mode},
    },
};

fn validation_failed(errors: Vec<validation::FieldError>) -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(json!({ "errors": errors }))
}

fn server_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({ "error": "Server error" }))
}

fn user_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "User not found" }))
}

/// POST /api/users - Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 422, description = "Validation errors"),
        (status = 500, description = "Server error")
    )
)]
pub async fn create_user(db: web::Data<MongoDB>, body: web::Json<Value>) -> impl Responder {
    let errors = validation::validate_user(&body, Mode::Create);
    if !errors.is_empty() {
        log::warn!("⚠️ POST /users rejected: {} validation error(s)", errors.len());
        return validation_failed(errors);
    }

    // Shape is guaranteed by the validation above
    let request: CreateUserRequest = match serde_json::from_value(body.into_inner()) {
        Ok(request) => request,
        Err(e) => {
            log::error!("❌ Validated body failed to deserialize: {}", e);
            return server_error();
        }
    };

    match user_service::create_user(&db, request).await {
        Ok(user) => {
            let response = UserResponse::from(user);
            log::info!("✅ User created: {}", response.id);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::error!("❌ Error creating user: {}", e);
            server_error()
        }
    }
}

/// GET /api/users - List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 500, description = "Server error")
    )
)]
pub async fn list_users(db: web::Data<MongoDB>) -> impl Responder {
    match user_service::list_users(&db).await {
        Ok(users) => {
            let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            HttpResponse::Ok().json(users)
        }
        Err(e) => {
            log::error!("❌ Error listing users: {}", e);
            server_error()
        }
    }
}

/// GET /api/users/{id} - Fetch one user
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex characters)")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 422, description = "Invalid user ID format"),
        (status = 500, description = "Server error")
    )
)]
pub async fn get_user(db: web::Data<MongoDB>, path: web::Path<String>) -> impl Responder {
    let id = match validation::parse_user_id(&path) {
        Ok(id) => id,
        Err(err) => return validation_failed(vec![err]),
    };

    match user_service::get_user(&db, id).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse::from(user)),
        Err(AppError::NotFound(_)) => user_not_found(),
        Err(e) => {
            log::error!("❌ Error fetching user {}: {}", id.to_hex(), e);
            server_error()
        }
    }
}

/// PUT /api/users/{id} - Merge-update one user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex characters)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation errors"),
        (status = 500, description = "Server error")
    )
)]
pub async fn update_user(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> impl Responder {
    let id = match validation::parse_user_id(&path) {
        Ok(id) => id,
        Err(err) => return validation_failed(vec![err]),
    };

    let errors = validation::validate_user(&body, Mode::Update);
    if !errors.is_empty() {
        log::warn!("⚠️ PUT /users/{} rejected: {} validation error(s)", id.to_hex(), errors.len());
        return validation_failed(errors);
    }

    match user_service::update_user(&db, id, &body).await {
        Ok(user) => {
            log::info!("✅ User updated: {}", id.to_hex());
            HttpResponse::Ok().json(UserResponse::from(user))
        }
        Err(AppError::NotFound(_)) => user_not_found(),
        Err(e) => {
            log::error!("❌ Error updating user {}: {}", id.to_hex(), e);
            server_error()
        }
    }
}

/// DELETE /api/users/{id} - Remove one user
///
/// Responds 200 with an informational message; a 204 could not carry
/// the message body.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex characters)")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Invalid user ID format"),
        (status = 500, description = "Server error")
    )
)]
pub async fn delete_user(db: web::Data<MongoDB>, path: web::Path<String>) -> impl Responder {
    let id = match validation::parse_user_id(&path) {
        Ok(id) => id,
        Err(err) => return validation_failed(vec![err]),
    };

    match user_service::delete_user(&db, id).await {
        Ok(()) => {
            log::info!("🗑️ User deleted: {}", id.to_hex());
            HttpResponse::Ok().json(json!({ "message": "User deleted successfully" }))
        }
        Err(AppError::NotFound(_)) => user_not_found(),
        Err(e) => {
            log::error!("❌ Error deleting user {}: {}", id.to_hex(), e);
            server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    async fn test_db() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/user_service_test".to_string());
        MongoDB::new(&uri).await.expect("MongoDB must be running")
    }

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new().app_data(web::Data::new(test_db().await)).service(
                    web::scope("/api/users")
                        .route("", web::post().to(create_user))
                        .route("", web::get().to(list_users))
                        .route("/{id}", web::get().to(get_user))
                        .route("/{id}", web::put().to(update_user))
                        .route("/{id}", web::delete().to(delete_user)),
                ),
            )
            .await
        };
    }

    fn valid_create_body() -> Value {
        json!({
            "firstName": "A",
            "lastName": "B",
            "ageGroup": "18-24",
            "gender": "Other",
            "hasLaptop": true,
            "bio": "I like computers",
            "heardFrom": ["friend"]
        })
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_create_get_update_delete_flow() {
        let app = test_app!();

        // Create
        let request = test::TestRequest::post()
            .uri("/api/users")
            .set_json(valid_create_body())
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, request).await;
        let id = created["id"].as_str().expect("created user carries an id").to_string();
        assert_eq!(created["firstName"], "A");
        assert_eq!(created["hasLaptop"], true);

        // Get-one returns the identical record
        let request = test::TestRequest::get()
            .uri(&format!("/api/users/{}", id))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(fetched, created);

        // Partial update changes only the supplied field
        let request = test::TestRequest::put()
            .uri(&format!("/api/users/{}", id))
            .set_json(json!({ "gender": "Female" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(updated["gender"], "Female");
        assert_eq!(updated["bio"], "I like computers");

        // Delete, then the id is gone
        let request = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", id))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 200);

        let request = test::TestRequest::get()
            .uri(&format!("/api/users/{}", id))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 404);
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_create_missing_fields_is_422() {
        let app = test_app!();

        let request = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({ "firstName": "A" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 422);

        let body: Value = test::read_body_json(response).await;
        let errors = body["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| e["field"] == "lastName"));
        assert!(errors.iter().any(|e| e["field"] == "heardFrom"));
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_malformed_id_is_422_for_every_verb() {
        let app = test_app!();

        for request in [
            test::TestRequest::get().uri("/api/users/not-an-id").to_request(),
            test::TestRequest::put()
                .uri("/api/users/not-an-id")
                .set_json(json!({}))
                .to_request(),
            test::TestRequest::delete().uri("/api/users/not-an-id").to_request(),
        ] {
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), 422);
            let body: Value = test::read_body_json(response).await;
            assert_eq!(body["errors"][0]["message"], "Invalid user ID format");
        }
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_unknown_id_is_404() {
        let app = test_app!();
        let id = "ffffffffffffffffffffffff";

        for request in [
            test::TestRequest::get().uri(&format!("/api/users/{}", id)).to_request(),
            test::TestRequest::put()
                .uri(&format!("/api/users/{}", id))
                .set_json(json!({ "bio": "long enough bio" }))
                .to_request(),
            test::TestRequest::delete().uri(&format!("/api/users/{}", id)).to_request(),
        ] {
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), 404);
            let body: Value = test::read_body_json(response).await;
            assert_eq!(body["error"], "User not found");
        }
    }
}
