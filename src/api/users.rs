use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse, Responder, ResponseError};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::{
    database::MongoDB,
    models::{UpdateUserFields, User, UserResponse},
    services::{upload_service, upload_service::UploadConfig, user_service},
    utils::error::AppError,
};

/// Confirmation / error body
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Text fields shared by the create and update bodies. The avatar URL is
/// always derived from an uploaded file, never taken from the client body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct UserForm {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    #[serde(skip)]
    avatar_url: Option<String>,
}

async fn read_text(field: &mut Field) -> Result<String, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| AppError::InvalidRequest(e.to_string()))?;
        bytes.extend_from_slice(&data);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn drain_field(field: &mut Field) -> Result<(), AppError> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|e| AppError::InvalidRequest(e.to_string()))?;
    }
    Ok(())
}

async fn read_multipart_form(
    req: &HttpRequest,
    mut payload: Multipart,
    uploads: &UploadConfig,
) -> Result<UserForm, AppError> {
    let mut form = UserForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::InvalidRequest(e.to_string()))?;
        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "avatar" => {
                // A file input left empty still produces a part, without a filename
                let has_file = field
                    .content_disposition()
                    .get_filename()
                    .map_or(false, |filename| !filename.is_empty());
                if !has_file {
                    drain_field(&mut field).await?;
                    continue;
                }

                let filename = upload_service::save_field(uploads, &mut field).await?;
                let conn = req.connection_info();
                form.avatar_url = Some(uploads.public_url(conn.scheme(), conn.host(), &filename));
            }
            "firstName" => form.first_name = Some(read_text(&mut field).await?),
            "lastName" => form.last_name = Some(read_text(&mut field).await?),
            "email" => form.email = Some(read_text(&mut field).await?),
            "password" => form.password = Some(read_text(&mut field).await?),
            _ => drain_field(&mut field).await?,
        }
    }

    Ok(form)
}

/// Accepts either `multipart/form-data` (text fields plus an optional
/// `avatar` file part) or a plain JSON body. The JSON path never carries a
/// file.
async fn read_user_input(
    req: &HttpRequest,
    mut payload: web::Payload,
    uploads: &UploadConfig,
) -> Result<UserForm, AppError> {
    if req.content_type().starts_with("multipart/form-data") {
        let multipart = Multipart::new(req.headers(), payload);
        return read_multipart_form(req, multipart, uploads).await;
    }

    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        let data = chunk.map_err(|e| AppError::InvalidRequest(e.to_string()))?;
        body.extend_from_slice(&data);
    }

    if body.is_empty() {
        return Ok(UserForm::default());
    }

    serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid JSON body: {}", e)))
}

/// POST /create - Cria usuário com upload opcional de avatar
#[utoipa::path(
    post,
    path = "/create",
    tag = "Users",
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid body or unsupported file type", body = MessageResponse),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn create_user(
    req: HttpRequest,
    payload: web::Payload,
    db: web::Data<MongoDB>,
    uploads: web::Data<UploadConfig>,
) -> impl Responder {
    let form = match read_user_input(&req, payload, &uploads).await {
        Ok(form) => form,
        Err(e) => return e.error_response(),
    };

    let user = User {
        id: None,
        first_name: form.first_name.unwrap_or_default(),
        last_name: form.last_name.unwrap_or_default(),
        email: form.email.unwrap_or_default(),
        password: form.password.unwrap_or_default(),
        avatar: form.avatar_url.unwrap_or_default(),
    };

    match user_service::create_user(&db, user).await {
        Ok(created) => HttpResponse::Created().json(UserResponse::from(created)),
        Err(e) => {
            log::error!("❌ Error creating user: {}", e);
            e.error_response()
        }
    }
}

/// GET / - Lista todos os usuários
#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn list_users(db: web::Data<MongoDB>) -> impl Responder {
    match user_service::list_users(&db).await {
        Ok(users) => {
            let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            HttpResponse::Ok().json(users)
        }
        Err(e) => {
            log::error!("❌ Error fetching users: {}", e);
            e.error_response()
        }
    }
}

/// GET /user/{id} - Busca usuário por id
#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed identifier", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn get_user(path: web::Path<String>, db: web::Data<MongoDB>) -> impl Responder {
    let id = path.into_inner();

    match user_service::get_user(&db, &id).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse::from(user)),
        Err(e) => e.error_response(),
    }
}

/// PATCH /users/{id} - Atualiza usuário, com upload opcional de novo avatar
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Malformed identifier, body or file", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn update_user(
    req: HttpRequest,
    payload: web::Payload,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    uploads: web::Data<UploadConfig>,
) -> impl Responder {
    let id = path.into_inner();

    let form = match read_user_input(&req, payload, &uploads).await {
        Ok(form) => form,
        Err(e) => return e.error_response(),
    };

    // Every text field is written back unconditionally; an unsent field
    // becomes the empty string. Callers resend everything they keep.
    let fields = UpdateUserFields {
        first_name: form.first_name.unwrap_or_default(),
        last_name: form.last_name.unwrap_or_default(),
        email: form.email.unwrap_or_default(),
        password: form.password.unwrap_or_default(),
        avatar: form.avatar_url,
    };

    match user_service::update_user(&db, &id, fields).await {
        Ok(updated) => HttpResponse::Ok().json(UserResponse::from(updated)),
        Err(e) => {
            log::error!("❌ Error updating user {}: {}", id, e);
            e.error_response()
        }
    }
}

/// DELETE /users/{id} - Remove usuário
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Malformed identifier", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn delete_user(path: web::Path<String>, db: web::Data<MongoDB>) -> impl Responder {
    let id = path.into_inner();

    match user_service::delete_user(&db, &id).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: format!("User with id {} has been deleted successfully", id),
        }),
        Err(e) => e.error_response(),
    }
}
