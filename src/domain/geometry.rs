use serde::{Deserialize, Serialize};

/// Tamaño en píxeles enteros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// Geometría activa del stream: las dimensiones negociadas con la cámara
/// más el factor de escala que determina la resolución de salida.
///
/// La resolución de salida (`output`) y la caja de visualización
/// (`display_box`) son magnitudes independientes: la primera es la
/// resolución a la que se procesa y publica el frame; la segunda es solo
/// el tamaño del contenedor en el dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StreamGeometry {
    pub capture: FrameSize,
    pub scale: f32,
}

impl StreamGeometry {
    pub fn new(capture: FrameSize, scale: f32) -> Self {
        Self { capture, scale }
    }

    /// Dimensiones de salida: round(captura × escala). La superficie de
    /// render y el overlay comparten siempre este mismo tamaño.
    pub fn output(&self) -> FrameSize {
        FrameSize {
            width: (self.capture.width as f32 * self.scale).round() as u32,
            height: (self.capture.height as f32 * self.scale).round() as u32,
        }
    }

    /// Caja de visualización del contenedor: encaja la relación de aspecto
    /// de la captura dentro de 720×405 píxeles CSS.
    pub fn display_box(&self) -> (f32, f32) {
        let ar = self.capture.width as f32 / self.capture.height as f32;
        if ar > 720.0 / 405.0 {
            (720.0, 720.0 / ar)
        } else {
            (405.0 * ar, 405.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_rounds_capture_times_scale() {
        let geo = StreamGeometry::new(FrameSize { width: 640, height: 480 }, 0.5);
        assert_eq!(geo.output(), FrameSize { width: 320, height: 240 });

        let geo = StreamGeometry::new(FrameSize { width: 640, height: 480 }, 0.33);
        // 640 * 0.33 = 211.2 -> 211 ; 480 * 0.33 = 158.4 -> 158
        assert_eq!(geo.output(), FrameSize { width: 211, height: 158 });

        let geo = StreamGeometry::new(FrameSize { width: 1280, height: 720 }, 1.5);
        assert_eq!(geo.output(), FrameSize { width: 1920, height: 1080 });
    }

    #[test]
    fn display_box_fits_wide_capture_to_width() {
        let geo = StreamGeometry::new(FrameSize { width: 1920, height: 800 }, 1.0);
        let (w, h) = geo.display_box();
        assert_eq!(w, 720.0);
        assert!((h - 720.0 / (1920.0 / 800.0)).abs() < 1e-3);
    }

    #[test]
    fn display_box_fits_tall_capture_to_height() {
        let geo = StreamGeometry::new(FrameSize { width: 480, height: 640 }, 1.0);
        let (w, h) = geo.display_box();
        assert_eq!(h, 405.0);
        assert!((w - 405.0 * (480.0 / 640.0)).abs() < 1e-3);
    }

    #[test]
    fn display_box_ignores_scale() {
        let a = StreamGeometry::new(FrameSize { width: 640, height: 480 }, 0.25);
        let b = StreamGeometry::new(FrameSize { width: 640, height: 480 }, 2.0);
        assert_eq!(a.display_box(), b.display_box());
    }
}
