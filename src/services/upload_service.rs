// ==================== AVATAR UPLOAD HANDLER ====================
// Valida, nomeia e persiste a imagem enviada no campo "avatar"

use crate::utils::error::AppError;
use actix_multipart::Field;
use chrono::Utc;
use futures::StreamExt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Where uploaded files land on disk and under which public path prefix they
/// are served back.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    dir: PathBuf,
    public_prefix: String,
}

impl UploadConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: "/uploads".to_string(),
        }
    }

    /// The directory must exist before the first handler runs.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Unique name: millisecond timestamp + random suffix + original
    /// extension. Concurrent uploads cannot collide, no lock involved.
    pub fn generate_filename(&self, original: &str) -> String {
        let extension = Path::new(original)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        format!(
            "{}-{}{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension
        )
    }

    /// Fully-qualified URL persisted on the user record.
    pub fn public_url(&self, scheme: &str, host: &str, filename: &str) -> String {
        format!("{}://{}{}/{}", scheme, host, self.public_prefix, filename)
    }
}

/// Only `image/*` payloads are accepted.
pub fn is_image(content_type: Option<&mime::Mime>) -> bool {
    content_type.map_or(false, |ct| ct.type_() == mime::IMAGE)
}

/// Streams one multipart field to disk and returns the generated filename.
/// The content type is checked before a single byte is written.
pub async fn save_field(config: &UploadConfig, field: &mut Field) -> Result<String, AppError> {
    if !is_image(field.content_type()) {
        return Err(AppError::UnsupportedFileType(
            "Only image files are allowed".to_string(),
        ));
    }

    let original = field
        .content_disposition()
        .get_filename()
        .unwrap_or_default()
        .to_string();
    let filename = config.generate_filename(&original);
    let path = config.dir.join(&filename);

    let mut file = File::create(&path).map_err(|e| AppError::UploadError(e.to_string()))?;
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| AppError::UploadError(e.to_string()))?;
        file.write_all(&data)
            .map_err(|e| AppError::UploadError(e.to_string()))?;
    }

    log::info!("🖼️  Avatar stored as {}", filename);
    Ok(filename)
}
