use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::detection::Detection;
use super::overlay::OverlayBox;

/// Metadatos que acompañan a cada frame publicado hacia el dashboard.
///
/// `width`/`height` son la resolución procesada (captura × escala);
/// `display_width`/`display_height` son el tamaño del contenedor de
/// visualización, una magnitud independiente. `fps` se mide entre
/// terminaciones de inferencia consecutivas, no entre ticks de captura.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameMeta {
    pub width: u32,
    pub height: u32,
    pub display_width: f32,
    pub display_height: f32,
    pub infer_ms: f32,
    pub fps: f32,
    pub status: String,
    pub boxes: Vec<OverlayBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsFrameMetaMessage {
    pub r#type: String,
    pub meta: FrameMeta,
}

/// Resumen legible por etiqueta, p. ej. "2 persona, 1 perro".
pub fn summarize_detections(detections: &[Detection]) -> String {
    let mut counts = HashMap::new();
    for det in detections {
        *counts.entry(&det.label).or_insert(0) += 1;
    }
    counts.iter()
        .map(|(label, count)| format!("{} {}", count, label))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_by_label() {
        let det = |label: &str| Detection {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
            score: 0.9,
            class_id: 0,
            label: label.into(),
        };
        let summary = summarize_detections(&[det("persona"), det("persona"), det("perro")]);
        assert!(summary.contains("2 persona"));
        assert!(summary.contains("1 perro"));
    }
}
