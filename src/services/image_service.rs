//! Almacenamiento de imágenes
//!
//! Los logos de los talleres se suben a Cloudinary mediante la API de
//! subida firmada. Las firmas usan SHA-256, por lo que la cuenta debe tener
//! configurado ese algoritmo de firma.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::config::environment::CloudinaryConfig;
use crate::utils::errors::{AppError, AppResult};

/// Carpeta donde se guardan los logos
pub const LOGO_FOLDER: &str = "workshop-logos";

/// Transformación aplicada a los logos en la subida
pub const LOGO_TRANSFORMATION: &str = "c_fill,h_400,w_400";

/// Archivo recibido del cliente
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

/// Imagen ya alojada
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub url: String,
    pub public_id: String,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Sube una imagen con el id público indicado dentro de `folder`
    async fn upload(&self, image: ImageUpload, folder: &str, public_id: &str) -> AppResult<StoredImage>;

    /// Borra una imagen por su id público completo (carpeta incluida)
    async fn delete(&self, public_id: &str) -> AppResult<()>;
}

/// Id público a partir de la URL de un logo anterior
///
/// `https://.../workshop-logos/workshop-1-logo-2.png` → `workshop-logos/workshop-1-logo-2`
pub fn public_id_from_url(url: &str) -> Option<String> {
    let file_name = url.rsplit('/').next()?;
    let stem = file_name.split('.').next()?;
    if stem.is_empty() {
        return None;
    }
    Some(format!("{}/{}", LOGO_FOLDER, stem))
}

pub struct CloudinaryImageStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

impl CloudinaryImageStore {
    pub fn new(client: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/{}",
            self.config.cloud_name, action
        )
    }

    fn signature(&self, params: &BTreeMap<&str, String>) -> String {
        sign_params(params, &self.config.api_secret)
    }
}

/// Firma de Cloudinary: parámetros ordenados `k=v` unidos por `&` más el secreto
pub fn sign_params(params: &BTreeMap<&str, String>, secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload(&self, image: ImageUpload, folder: &str, public_id: &str) -> AppResult<StoredImage> {
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut params = BTreeMap::new();
        params.insert("folder", folder.to_string());
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", timestamp);
        params.insert("transformation", LOGO_TRANSFORMATION.to_string());
        let signature = self.signature(&params);

        let file = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| AppError::ExternalApi(format!("Tipo de archivo inválido: {}", e)))?;

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error subiendo imagen: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Cloudinary respondió {}: {}",
                status, body
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Respuesta de Cloudinary inválida: {}", e)))?;

        tracing::info!("🖼️ Imagen subida: {}", uploaded.public_id);
        Ok(StoredImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = self.signature(&params);

        let mut form = vec![
            ("api_key", self.config.api_key.clone()),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ];
        form.extend(params);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error borrando imagen: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Cloudinary respondió {} al borrar {}",
                response.status(),
                public_id
            )));
        }
        Ok(())
    }
}

/// Almacén usado cuando no hay credenciales de Cloudinary
pub struct UnconfiguredImageStore;

#[async_trait]
impl ImageStore for UnconfiguredImageStore {
    async fn upload(&self, _image: ImageUpload, _folder: &str, _public_id: &str) -> AppResult<StoredImage> {
        Err(AppError::Internal(
            "Cloudinary no está configurado; no se pueden subir imágenes".to_string(),
        ))
    }

    async fn delete(&self, _public_id: &str) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_from_url() {
        let url = "https://res.cloudinary.com/demo/image/upload/v1/workshop-logos/workshop-1-logo-2.png";
        assert_eq!(
            public_id_from_url(url).as_deref(),
            Some("workshop-logos/workshop-1-logo-2")
        );
        assert_eq!(public_id_from_url("https://cdn.test/"), None);
    }

    #[test]
    fn test_signature_is_stable_and_sorted() {
        let mut a = BTreeMap::new();
        a.insert("timestamp", "1700000000".to_string());
        a.insert("folder", "workshop-logos".to_string());

        let mut b = BTreeMap::new();
        b.insert("folder", "workshop-logos".to_string());
        b.insert("timestamp", "1700000000".to_string());

        let sig = sign_params(&a, "secret");
        assert_eq!(sig, sign_params(&b, "secret"));
        assert_eq!(sig.len(), 64);
        assert_ne!(sig, sign_params(&a, "other"));
    }
}
