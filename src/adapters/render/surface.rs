use image::{Rgb, RgbImage};

use crate::domain::geometry::StreamGeometry;
use crate::domain::tuning::TuningState;

/// Superficie de composición del pipeline.
///
/// Mantiene un único buffer RGB que se reutiliza tick a tick: solo se
/// redimensiona cuando cambia la geometría de salida, así el lazo puede
/// invocarla a cadencia de captura sin crecer en memoria. El espejado y los
/// filtros de color se aplican durante la misma pasada de dibujo; no queda
/// ningún estado de transformación que pueda afectar a una pasada posterior.
pub struct RenderSurface {
    buffer: RgbImage,
}

impl RenderSurface {
    pub fn new() -> Self {
        Self { buffer: RgbImage::new(0, 0) }
    }

    /// Compone `frame` sobre el buffer a la resolución `geometry.output()`,
    /// con muestreo de vecino más próximo, espejado horizontal opcional y los
    /// filtros multiplicativos de brillo, contraste y saturación compuestos
    /// en ese orden (1.0 = identidad).
    pub fn render(
        &mut self,
        frame: &RgbImage,
        geometry: &StreamGeometry,
        tuning: &TuningState,
    ) -> &RgbImage {
        let out = geometry.output();
        if self.buffer.width() != out.width || self.buffer.height() != out.height {
            self.buffer = RgbImage::new(out.width, out.height);
        }
        if frame.width() == 0 || frame.height() == 0 {
            return &self.buffer;
        }

        let identity_filters =
            tuning.brightness == 1.0 && tuning.contrast == 1.0 && tuning.saturation == 1.0;

        for y in 0..out.height {
            let src_y = (y as f32 * frame.height() as f32 / out.height as f32) as u32;
            let src_y = src_y.min(frame.height() - 1);

            for x in 0..out.width {
                // El espejado se resuelve en el muestreo: la columna de
                // salida x lee la columna reflejada de la fuente.
                let sample_x = if tuning.mirror { out.width - 1 - x } else { x };
                let src_x = (sample_x as f32 * frame.width() as f32 / out.width as f32) as u32;
                let src_x = src_x.min(frame.width() - 1);

                let px = *frame.get_pixel(src_x, src_y);
                let px = if identity_filters { px } else { apply_filters(px, tuning) };
                self.buffer.put_pixel(x, y, px);
            }
        }

        &self.buffer
    }

    /// Último contenido compuesto.
    pub fn pixels(&self) -> &RgbImage {
        &self.buffer
    }
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Brillo, contraste y saturación como multiplicadores, compuestos en ese
/// orden sobre el canal normalizado [0, 1] y recortados al rango válido.
fn apply_filters(px: Rgb<u8>, tuning: &TuningState) -> Rgb<u8> {
    let mut rgb = [
        px[0] as f32 / 255.0,
        px[1] as f32 / 255.0,
        px[2] as f32 / 255.0,
    ];

    for c in &mut rgb {
        *c *= tuning.brightness;
    }
    for c in &mut rgb {
        *c = (*c - 0.5) * tuning.contrast + 0.5;
    }
    let luma = 0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2];
    for c in &mut rgb {
        *c = luma + (*c - luma) * tuning.saturation;
    }

    Rgb([
        (rgb[0].clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb[1].clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb[2].clamp(0.0, 1.0) * 255.0).round() as u8,
    ])
}
