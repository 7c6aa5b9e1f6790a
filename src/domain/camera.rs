// src/domain/camera.rs
use serde::{Deserialize, Serialize};

use super::geometry::FrameSize;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraId { pub path: String }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraInfo {
    pub id: CameraId,
    pub name: String,
    pub card: String,
    pub driver: String,
    pub bus: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixelFormat {
    pub fourcc: String,
    pub description: String,
}

/// Modo de captura negociable con el dispositivo: formato, tamaño y FPS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraMode {
    pub format: String,
    pub size: FrameSize,
    pub fps: u32,
}
