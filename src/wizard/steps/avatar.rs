//! Step 4: avatar selection, square crop, and upload.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageReader};
use tracing::{info, warn};

use super::StepController;
use crate::api::{AvatarUpload, ProfileApi};
use crate::draft::DraftStore;
use crate::error::{ApiError, AvatarError};
use crate::in_flight::InFlight;
use crate::session::Session;
use crate::wizard::WizardStep;

/// Largest accepted source file.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;
/// Minimum width and height of the source image.
pub const MIN_AVATAR_DIMENSION: u32 = 200;
/// JPEG quality of cropped uploads.
pub const CROP_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else {
            None
        }
    }
}

/// A decoded image that passed the avatar constraints.
pub struct ValidatedImage {
    bytes: Vec<u8>,
    kind: ImageKind,
    file_name: String,
    image: DynamicImage,
}

impl std::fmt::Debug for ValidatedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatedImage")
            .field("kind", &self.kind)
            .field("file_name", &self.file_name)
            .field("size", &self.bytes.len())
            .field("dimensions", &self.image.dimensions())
            .finish()
    }
}

impl ValidatedImage {
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// The largest centred square, the crop offered by default.
    pub fn default_crop(&self) -> CropRegion {
        let (width, height) = self.dimensions();
        let size = width.min(height);
        CropRegion {
            x: (width - size) / 2,
            y: (height - size) / 2,
            size,
        }
    }
}

/// Square crop in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

/// Check type, size, decodability, and minimum dimensions of a chosen file.
pub fn validate_image(
    bytes: Vec<u8>,
    content_type: &str,
    file_name: &str,
) -> Result<ValidatedImage, AvatarError> {
    let declared = ImageKind::from_content_type(content_type).ok_or(AvatarError::UnsupportedType)?;
    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(AvatarError::TooLarge {
            size: bytes.len(),
            max: MAX_AVATAR_BYTES,
        });
    }
    let kind = ImageKind::sniff(&bytes)
        .filter(|sniffed| *sniffed == declared)
        .ok_or(AvatarError::UnsupportedType)?;

    let image = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .map_err(|e| AvatarError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| AvatarError::Decode(e.to_string()))?;

    let (width, height) = image.dimensions();
    if width < MIN_AVATAR_DIMENSION || height < MIN_AVATAR_DIMENSION {
        return Err(AvatarError::TooSmall { width, height });
    }

    Ok(ValidatedImage {
        bytes,
        kind,
        file_name: file_name.to_string(),
        image,
    })
}

/// Cut `region` out of `image` and encode it as JPEG.
pub fn crop_square(image: &ValidatedImage, region: CropRegion) -> Result<Vec<u8>, AvatarError> {
    let (width, height) = image.dimensions();
    let fits = region.size > 0
        && region.x.checked_add(region.size).is_some_and(|right| right <= width)
        && region.y.checked_add(region.size).is_some_and(|bottom| bottom <= height);
    if !fits {
        return Err(AvatarError::InvalidCrop {
            x: region.x,
            y: region.y,
            size: region.size,
            width,
            height,
        });
    }

    let cropped = image
        .image
        .crop_imm(region.x, region.y, region.size, region.size)
        .to_rgb8();
    let mut out = Vec::new();
    cropped
        .write_with_encoder(JpegEncoder::new_with_quality(&mut out, CROP_JPEG_QUALITY))
        .map_err(|e| AvatarError::Encode(e.to_string()))?;
    Ok(out)
}

pub struct AvatarStep {
    store: Arc<DraftStore>,
    api: Arc<dyn ProfileApi>,
    session: Session,
    asset_base_url: String,
    uploading: AtomicBool,
}

impl AvatarStep {
    pub fn new(
        store: Arc<DraftStore>,
        api: Arc<dyn ProfileApi>,
        session: Session,
        asset_base_url: &str,
    ) -> Self {
        Self {
            store,
            api,
            session,
            asset_base_url: asset_base_url.trim_end_matches('/').to_string(),
            uploading: AtomicBool::new(false),
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    pub async fn avatar_url(&self) -> String {
        self.store.avatar_url().await
    }

    /// Upload `image` (cropped when `crop` is given) and store the resulting URL.
    pub async fn upload(
        &self,
        image: &ValidatedImage,
        crop: Option<CropRegion>,
    ) -> Result<String, AvatarError> {
        let Some(_in_flight) = InFlight::acquire(&self.uploading) else {
            return Err(AvatarError::InFlight);
        };

        let upload = match crop {
            Some(region) => AvatarUpload {
                bytes: crop_square(image, region)?,
                file_name: image.file_name.clone(),
                content_type: ImageKind::Jpeg.content_type().to_string(),
            },
            None => AvatarUpload {
                bytes: image.bytes.clone(),
                file_name: image.file_name.clone(),
                content_type: image.kind.content_type().to_string(),
            },
        };

        let token = self.session.token().await.ok_or(AvatarError::NotLoggedIn)?;

        let response = match self.api.upload_avatar(&token, upload).await {
            Ok(response) => response,
            Err(ApiError::Unauthorized) => return Err(AvatarError::SessionExpired),
            Err(e) => {
                warn!("Avatar upload failed: {}", e);
                let message = e
                    .server_message()
                    .unwrap_or("Failed to upload image")
                    .to_string();
                return Err(AvatarError::UploadFailed(message));
            }
        };
        if response.avatar_url.is_empty() {
            return Err(AvatarError::UploadFailed("Failed to upload image".to_string()));
        }

        let url = self.absolute_url(&response.avatar_url);
        self.store.set_avatar_url(url.clone()).await;
        info!(%url, "Avatar uploaded");
        Ok(url)
    }

    /// Clear the chosen avatar.
    pub async fn remove(&self) {
        self.store.set_avatar_url(String::new()).await;
    }

    fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.asset_base_url, path)
        }
    }
}

#[async_trait]
impl StepController for AvatarStep {
    fn step(&self) -> WizardStep {
        WizardStep::Avatar
    }

    async fn can_advance(&self) -> bool {
        self.store.is_avatar_complete().await
    }
}
