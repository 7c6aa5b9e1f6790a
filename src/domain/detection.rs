use serde::{Deserialize, Serialize};

use super::geometry::FrameSize;

/// Una instancia de objeto predicha por el detector. Las coordenadas van en
/// el espacio del frame que el detector consumió realmente (ver
/// `DetectionOutput::frame_size`), no en el espacio de la superficie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
    pub class_id: usize,
    pub label: String,
}

impl Detection {
    /// Refleja la extensión horizontal de la caja respecto al centro vertical
    /// de un frame de ancho `width`. Aplicada dos veces devuelve la caja
    /// original.
    pub fn mirrored_x(mut self, width: f32) -> Self {
        let x1 = self.x1;
        self.x1 = width - self.x2;
        self.x2 = width - x1;
        self
    }
}

/// Resultado de una llamada al detector: el conjunto completo de detecciones
/// de ese ciclo más el tamaño espacial que el detector procesó. Cada
/// resultado sustituye íntegramente al anterior; nunca se mezclan ciclos.
#[derive(Debug, Clone, Default)]
pub struct DetectionOutput {
    pub detections: Vec<Detection>,
    pub frame_size: FrameSize,
}
