mod api;
mod database;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use services::upload_service::UploadConfig;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

    log::info!("🚀 Starting User Service...");

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // The uploads directory must exist before the first request comes in
    let uploads = UploadConfig::new(&upload_dir);
    uploads
        .ensure_dir()
        .expect("Failed to create uploads directory");
    let uploads_data = web::Data::new(uploads);

    log::info!("🖼️  Uploaded avatars stored in ./{}", upload_dir);
    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::permissive();

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(uploads_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Users CRUD
            .route("/create", web::post().to(api::users::create_user))
            .route("/", web::get().to(api::users::list_users))
            .route("/user/{id}", web::get().to(api::users::get_user))
            .route("/users/{id}", web::patch().to(api::users::update_user))
            .route("/users/{id}", web::delete().to(api::users::delete_user))
            // Uploaded avatars served statically
            .service(Files::new("/uploads", upload_dir.clone()))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
