use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "CRUD API for User records backed by MongoDB.\n\n**Validation:** create requests must carry every field; update requests may carry any subset, and each supplied field is checked individually. Violations come back as a 422 with the full list of field errors."
    ),
    paths(
        crate::api::health::index,
        crate::api::health::health_check,
        crate::api::users::create_user,
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::CreateUserRequest,
            crate::models::UpdateUserRequest,
            crate::models::UserResponse,
            crate::utils::validation::FieldError,
        )
    ),
    tags(
        (name = "Users", description = "Create, list, fetch, update and delete User records."),
        (name = "Health", description = "Liveness and health endpoints for monitoring.")
    )
)]
pub struct ApiDoc;
