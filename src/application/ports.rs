use async_trait::async_trait;
use image::RgbImage;
use tokio::sync::broadcast;

use crate::domain::{
    camera::*,
    detection::DetectionOutput,
    errors::DomainResult,
    geometry::FrameSize,
    model::*,
    stream::FrameMeta,
};

#[async_trait]
pub trait CameraCatalogPort: Send + Sync {
    async fn list_cameras(&self) -> DomainResult<Vec<CameraInfo>>;
    async fn list_formats(&self, camera: &CameraId) -> DomainResult<Vec<PixelFormat>>;
    async fn list_frame_sizes(&self, camera: &CameraId, fourcc: &str) -> DomainResult<Vec<FrameSize>>;
}

#[async_trait]
pub trait ModelCatalogPort: Send + Sync {
    async fn validate_model(&self, model: &ModelId) -> DomainResult<()>;
}

#[async_trait]
pub trait StreamPort: Send + Sync {
    async fn configure(&self, camera: CameraId, mode: CameraMode, infer: InferenceConfig) -> DomainResult<()>;
    async fn subscribe(&self) -> DomainResult<broadcast::Receiver<(FrameMeta, Vec<u8>)>>;
}

// Los dos puertos siguientes son síncronos: los consume el worker del
// pipeline desde su propio hilo, nunca desde el runtime async.

/// Fuente de frames en vivo. Es dueña del dispositivo de captura y de la
/// resolución negociada con él.
pub trait FrameSourcePort: Send {
    /// Dimensiones reales acordadas con el dispositivo al abrirlo.
    fn dimensions(&self) -> FrameSize;

    /// Frame actual en RGB. Bloquea hasta el siguiente refresco de captura,
    /// lo que marca la cadencia del lazo de anotación.
    fn next_frame(&mut self) -> anyhow::Result<RgbImage>;
}

/// Colaborador de detección: una imagen, una llamada, una respuesta.
/// Sin streaming y sin lotes; la compuerta de inferencia garantiza que solo
/// hay una llamada en vuelo.
pub trait DetectorPort: Send + Sync {
    fn detect(&self, frame: &RgbImage, params: &DetectorParams) -> anyhow::Result<DetectionOutput>;
}
