use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "REST service for managing user records with optional avatar image upload.\n\n**Uploads:** `POST /create` and `PATCH /users/{id}` accept `multipart/form-data` with an optional `avatar` file field; stored images are served back under `/uploads/{filename}`."
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Users
        crate::api::users::create_user,
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::users::MessageResponse,
            crate::models::user::UserResponse,
        )
    ),
    tags(
        (name = "Users", description = "User record management. Create, list, fetch, update and delete users; create and update take an optional avatar image."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    )
)]
pub struct ApiDoc;
