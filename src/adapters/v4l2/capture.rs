use anyhow::{anyhow, Result};
use image::{ImageFormat, RgbImage};
use v4l::format::FourCC;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::Device;

use crate::application::ports::FrameSourcePort;
use crate::domain::geometry::FrameSize;

/// Configuración para inicializar la captura de vídeo.
pub struct CaptureConfig {
    pub camera_path: String,
    pub fourcc: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// Fuente de frames física sobre V4L2. Es dueña del dispositivo y de la
/// resolución negociada; cada `next_frame` bloquea hasta el siguiente
/// refresco de captura, que es lo que marca la cadencia del lazo.
pub struct V4l2FrameSource {
    stream: Stream<'static>,
    fourcc: FourCC,
    negotiated: FrameSize,
}

impl V4l2FrameSource {
    /// Abre el dispositivo, negocia formato y tamaño y arranca el flujo de
    /// memoria mapeada (MMAP). Un fallo aquí es terminal para la sesión:
    /// el llamante no debe reintentar con la misma configuración.
    pub fn open(cfg: &CaptureConfig) -> Result<Self> {
        let dev = Device::with_path(&cfg.camera_path)?;

        let mut fmt = dev.format()?;
        let b = cfg.fourcc.as_bytes();
        if b.len() != 4 {
            return Err(anyhow!("FourCC debe tener 4 caracteres"));
        }
        fmt.fourcc = v4l::FourCC::new(&[b[0], b[1], b[2], b[3]]);
        fmt.width = cfg.width;
        fmt.height = cfg.height;

        // El driver puede ajustar los valores a los más cercanos soportados;
        // lo que vale a partir de aquí es lo que devuelve, no lo pedido.
        let actual_fmt = dev.set_format(&fmt)?;

        let mut params = dev.params()?;
        params.interval.numerator = 1;
        params.interval.denominator = cfg.fps;
        let _ = dev.set_params(&params);

        // Box::leak para que el dispositivo viva tanto como el stream 'static.
        let dev_static: &'static Device = Box::leak(Box::new(dev));
        let stream = Stream::with_buffers(dev_static, v4l::buffer::Type::VideoCapture, 4)?;

        tracing::info!(
            "Cámara abierta: {}x{} [{}] a {} FPS",
            actual_fmt.width, actual_fmt.height, actual_fmt.fourcc, cfg.fps
        );

        Ok(Self {
            stream,
            fourcc: actual_fmt.fourcc,
            negotiated: FrameSize { width: actual_fmt.width, height: actual_fmt.height },
        })
    }
}

impl FrameSourcePort for V4l2FrameSource {
    fn dimensions(&self) -> FrameSize {
        self.negotiated
    }

    /// Captura el siguiente frame y lo decodifica a RGB según el formato
    /// negociado. Errores aquí son transitorios: el dispositivo sigue
    /// abierto y el llamante puede pedir el frame siguiente.
    fn next_frame(&mut self) -> Result<RgbImage> {
        let (data, _) = self.stream.next()?;
        let fcc_str = self.fourcc.str().map_err(|_| anyhow!("FourCC inválido"))?;

        match fcc_str {
            "MJPG" => {
                // MJPG es una secuencia de JPEGs independientes.
                let img = image::load_from_memory_with_format(data, ImageFormat::Jpeg)?;
                Ok(img.to_rgb8())
            }
            "YUYV" => Ok(yuyv_to_rgb(data, self.negotiated.width, self.negotiated.height)),
            _ => Err(anyhow!("Formato de cámara {} no soportado por este pipeline", fcc_str)),
        }
    }
}

/// Convierte un buffer YUYV (YUV 4:2:2) a una RgbImage.
fn yuyv_to_rgb(yuyv: &[u8], w: u32, h: u32) -> RgbImage {
    let mut out = RgbImage::new(w, h);

    // Cada bloque de 4 bytes define 2 píxeles: [Y0, U, Y1, V].
    for (i, chunk) in yuyv.chunks_exact(4).enumerate() {
        let y0 = chunk[0] as f32;
        let u  = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v  = chunk[3] as f32 - 128.0;

        // Conversión estándar BT.601.
        let to_rgb = |y: f32| {
            [
                (y + 1.402 * v).clamp(0.0, 255.0) as u8,
                (y - 0.344136 * u - 0.714136 * v).clamp(0.0, 255.0) as u8,
                (y + 1.772 * u).clamp(0.0, 255.0) as u8,
            ]
        };

        let pixel_idx = i as u32 * 2;
        let x = pixel_idx % w;
        let y = pixel_idx / w;

        if y < h {
            out.put_pixel(x, y, image::Rgb(to_rgb(y0)));
            if x + 1 < w {
                out.put_pixel(x + 1, y, image::Rgb(to_rgb(y1)));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuyv_grey_decodes_to_grey() {
        // Y=128, U=V=128 (sin croma) -> gris medio en los dos píxeles.
        let data = [128u8, 128, 128, 128];
        let rgb = yuyv_to_rgb(&data, 2, 1);
        assert_eq!(*rgb.get_pixel(0, 0), image::Rgb([128, 128, 128]));
        assert_eq!(*rgb.get_pixel(1, 0), image::Rgb([128, 128, 128]));
    }

    #[test]
    fn yuyv_chroma_is_shared_between_pixel_pairs() {
        // V alto -> componente roja dominante en ambos píxeles del par.
        let data = [128u8, 128, 128, 255];
        let rgb = yuyv_to_rgb(&data, 2, 1);
        let p0 = rgb.get_pixel(0, 0);
        let p1 = rgb.get_pixel(1, 0);
        assert_eq!(p0, p1);
        assert!(p0[0] > p0[2]);
    }
}
