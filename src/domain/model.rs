use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelId {
    pub name: String,       // logical name, e.g. "yolo11m"
    pub onnx_path: String,  // filesystem path
}

/// Parámetros de una llamada al detector.
///
/// `input_size` se sobreescribe en cada llamada con el tamaño de proceso
/// vigente en la superficie de configuración. `candidate_floor` es un suelo
/// estático para descartar candidatos sin puntuación; el umbral de confianza
/// que ve el usuario se aplica después, al construir el overlay, de modo que
/// cambiarlo no exige una nueva inferencia.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectorParams {
    pub input_size: u32,
    pub candidate_floor: f32,
    pub max_detections: usize,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            input_size: 128,
            candidate_floor: 0.05,
            max_detections: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub model: ModelId,
    pub params: DetectorParams,
}
