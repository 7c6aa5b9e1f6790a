use serde::{Deserialize, Serialize};

use super::detection::Detection;
use super::geometry::FrameSize;

/// Paleta fija de colores por clase. La clase `n` usa siempre la entrada
/// `n % len`, de modo que una misma clase mantiene su color durante toda la
/// sesión.
pub const COLOURS: [&str; 20] = [
    "#EF4444", "#4299E1", "#059669", "#FBBF24", "#4B52B1",
    "#7B3AC2", "#ED507A", "#1DD1A1", "#F3873A", "#4B5563",
    "#DC2626", "#1852B4", "#18A35D", "#F59E0B", "#4059BE",
    "#6027A5", "#D63D60", "#00AC9B", "#E64A19", "#272A34",
];

/// Caja declarativa lista para pintar en el cliente. Las posiciones van en
/// porcentaje del overlay, así el mismo resultado vale para cualquier tamaño
/// de contenedor sin recalcular nada al cambiar la geometría.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    pub label: String,
}

/// Construye el overlay completo a partir del último resultado del detector.
///
/// Cada pasada sustituye íntegramente a la anterior: no hay diff incremental.
/// Las detecciones llegan en el espacio de `frame_size` (el tamaño que el
/// detector consumió) y salen en porcentaje del overlay. Con `mirror` activo
/// la extensión horizontal se refleja ANTES de la conversión a porcentaje,
/// para que las cajas sigan exactamente al vídeo reflejado.
pub fn build_overlay(
    detections: &[Detection],
    frame_size: FrameSize,
    threshold: f32,
    mirror: bool,
) -> Vec<OverlayBox> {
    if frame_size.width == 0 || frame_size.height == 0 {
        return Vec::new();
    }
    let w = frame_size.width as f32;
    let h = frame_size.height as f32;

    detections
        .iter()
        .filter(|d| d.score >= threshold)
        .map(|d| {
            let d = if mirror { d.clone().mirrored_x(w) } else { d.clone() };
            let color = COLOURS[d.class_id % COLOURS.len()];
            OverlayBox {
                left: 100.0 * d.x1 / w,
                top: 100.0 * d.y1 / h,
                width: 100.0 * (d.x2 - d.x1) / w,
                height: 100.0 * (d.y2 - d.y1) / h,
                color: color.to_string(),
                label: format!("{} ({:.2}%)", d.label, 100.0 * d.score),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Detection {
        Detection {
            x1: 10.0,
            y1: 10.0,
            x2: 50.0,
            y2: 50.0,
            score: 0.9,
            class_id: 2,
            label: "coche".into(),
        }
    }

    fn size_128() -> FrameSize {
        FrameSize { width: 128, height: 128 }
    }

    #[test]
    fn threshold_filters_strictly_below() {
        let mut dets = Vec::new();
        for score in [0.1, 0.25, 0.4, 0.9] {
            let mut d = sample();
            d.score = score;
            dets.push(d);
        }
        let boxes = build_overlay(&dets, size_128(), 0.25, false);
        // score == umbral se conserva; solo 0.1 queda fuera.
        assert_eq!(boxes.len(), 3);
    }

    #[test]
    fn maps_detector_space_to_percentages() {
        let boxes = build_overlay(&[sample()], size_128(), 0.25, false);
        assert_eq!(boxes.len(), 1);
        let b = &boxes[0];
        assert!((b.left - 7.8125).abs() < 1e-4);
        assert!((b.top - 7.8125).abs() < 1e-4);
        assert!((b.width - 31.25).abs() < 1e-4);
        assert!((b.height - 31.25).abs() < 1e-4);
    }

    #[test]
    fn mirror_reflects_x_extent_before_percentage() {
        let boxes = build_overlay(&[sample()], size_128(), 0.25, true);
        let b = &boxes[0];
        // x1' = 128 - 50 = 78, x2' = 128 - 10 = 118
        assert!((b.left - 60.9375).abs() < 1e-4);
        assert!((b.width - 31.25).abs() < 1e-4);
        // El eje vertical no se toca.
        assert!((b.top - 7.8125).abs() < 1e-4);
        assert!((b.height - 31.25).abs() < 1e-4);
    }

    #[test]
    fn raising_threshold_drops_boxes_without_new_detections() {
        let dets = vec![sample()];
        let before = build_overlay(&dets, size_128(), 0.25, false);
        let after = build_overlay(&dets, size_128(), 0.95, false);
        assert_eq!(before.len(), 1);
        assert!(after.is_empty());
    }

    #[test]
    fn colour_is_deterministic_per_class() {
        let mut a = sample();
        a.class_id = 2;
        let mut b = sample();
        b.class_id = 22; // 22 % 20 == 2
        let boxes = build_overlay(&[a, b], size_128(), 0.0, false);
        assert_eq!(boxes[0].color, boxes[1].color);
        assert_eq!(boxes[0].color, COLOURS[2]);
    }

    #[test]
    fn label_shows_name_and_confidence_percentage() {
        let boxes = build_overlay(&[sample()], size_128(), 0.25, false);
        assert_eq!(boxes[0].label, "coche (90.00%)");
    }

    #[test]
    fn degenerate_frame_size_yields_no_boxes() {
        let boxes = build_overlay(&[sample()], FrameSize { width: 0, height: 0 }, 0.0, false);
        assert!(boxes.is_empty());
    }
}
