use serde::{Deserialize, Serialize};

use crate::domain::{
    camera::{CameraId, CameraMode},
    geometry::FrameSize,
    model::{DetectorParams, InferenceConfig, ModelId},
    tuning::TuningState,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurePipelineRequest {
    pub camera_path: String,
    pub fourcc: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,

    pub model_name: String,
    pub onnx_path: String,
    pub detector: DetectorParams,
}

impl From<ConfigurePipelineRequest> for (CameraId, CameraMode, InferenceConfig) {
    fn from(r: ConfigurePipelineRequest) -> Self {
        let cam = CameraId { path: r.camera_path };
        let mode = CameraMode {
            format: r.fourcc,
            size: FrameSize { width: r.width, height: r.height },
            fps: r.fps,
        };
        let infer = InferenceConfig {
            model: ModelId { name: r.model_name, onnx_path: r.onnx_path },
            params: r.detector,
        };
        (cam, mode, infer)
    }
}

/// Actualización parcial de la superficie de configuración: solo los campos
/// presentes cambian. Los valores se acotan en este borde; el núcleo del
/// pipeline no vuelve a validar.
///
/// Cotas: umbral en [0, 1], tamaño de proceso en [32, 1024], escala en
/// [0.05, 4.0], factores de filtro >= 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TuningUpdate {
    pub threshold: Option<f32>,
    pub processing_size: Option<u32>,
    pub scale: Option<f32>,
    pub mirror: Option<bool>,
    pub brightness: Option<f32>,
    pub contrast: Option<f32>,
    pub saturation: Option<f32>,
}

impl TuningUpdate {
    pub fn apply_to(&self, state: &mut TuningState) {
        if let Some(v) = self.threshold {
            state.threshold = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.processing_size {
            state.processing_size = v.clamp(32, 1024);
        }
        if let Some(v) = self.scale {
            state.scale = v.clamp(0.05, 4.0);
        }
        if let Some(v) = self.mirror {
            state.mirror = v;
        }
        if let Some(v) = self.brightness {
            state.brightness = v.max(0.0);
        }
        if let Some(v) = self.contrast {
            state.contrast = v.max(0.0);
        }
        if let Some(v) = self.saturation {
            state.saturation = v.max(0.0);
        }
    }
}
