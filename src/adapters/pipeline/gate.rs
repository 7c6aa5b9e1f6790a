use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use image::RgbImage;
use tracing::warn;

use crate::application::ports::DetectorPort;
use crate::domain::detection::Detection;
use crate::domain::geometry::FrameSize;
use crate::domain::model::DetectorParams;

/// Último resultado de inferencia completado. Se publica como unidad: las
/// detecciones y el tamaño de frame que las acompaña nunca se observan a
/// medio actualizar.
#[derive(Debug, Clone, Default)]
pub struct DetectionSnapshot {
    pub detections: Vec<Detection>,
    /// Tamaño espacial que el detector procesó realmente; es el espacio de
    /// coordenadas de `detections`.
    pub frame_size: FrameSize,
    /// Frames por segundo entre terminaciones de inferencia consecutivas.
    pub fps: f32,
    /// Latencia de la última llamada al detector.
    pub infer_ms: f32,
}

/// Compuerta de inferencia: garantiza como mucho UNA llamada al detector en
/// vuelo en todo el sistema.
///
/// El lazo de render la sondea una vez por tick. Si está ocupada, el frame se
/// descarta para inferencia (se muestra igualmente) y no se encola nada: el
/// overlay refleja siempre el resultado completado más reciente, que por
/// construcción va al menos un tick por detrás de lo que se ve.
pub struct InferenceGate {
    in_flight: Arc<AtomicBool>,
    published: Arc<RwLock<DetectionSnapshot>>,
    previous_completion: Arc<Mutex<Option<Instant>>>,
}

/// Libera la bandera de ocupado al salir del hilo de inferencia por
/// cualquier camino, incluido un pánico del detector.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl InferenceGate {
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(AtomicBool::new(false)),
            published: Arc::new(RwLock::new(DetectionSnapshot::default())),
            previous_completion: Arc::new(Mutex::new(None)),
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    /// Instantánea del último resultado completado.
    pub fn latest(&self) -> DetectionSnapshot {
        self.published.read().unwrap().clone()
    }

    /// Un tick del lazo: si no hay llamada en vuelo, envía `frame` al
    /// detector en un hilo aparte y devuelve `true`. Si la compuerta está
    /// ocupada, devuelve `false` sin bloquear ni encolar.
    ///
    /// Si el detector falla, la compuerta se libera igualmente y las
    /// detecciones de ese ciclo simplemente no se actualizan.
    pub fn tick(
        &self,
        frame: RgbImage,
        detector: Arc<dyn DetectorPort>,
        params: DetectorParams,
    ) -> bool {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return false;
        }

        let guard = InFlightGuard(self.in_flight.clone());
        let published = self.published.clone();
        let previous_completion = self.previous_completion.clone();

        std::thread::spawn(move || {
            let _guard = guard;
            let started = Instant::now();

            match detector.detect(&frame, &params) {
                Ok(output) => {
                    let infer_ms = started.elapsed().as_secs_f32() * 1000.0;
                    let now = Instant::now();

                    let fps = {
                        let mut previous = previous_completion.lock().unwrap();
                        let fps = previous
                            .map(|t| 1.0 / now.duration_since(t).as_secs_f32().max(1e-3))
                            .unwrap_or(0.0);
                        *previous = Some(now);
                        fps
                    };

                    let mut slot = published.write().unwrap();
                    *slot = DetectionSnapshot {
                        detections: output.detections,
                        frame_size: output.frame_size,
                        fps,
                        infer_ms,
                    };
                }
                Err(e) => {
                    warn!("Fallo del detector, se descarta el ciclo: {e:#}");
                }
            }
        });

        true
    }
}

impl Default for InferenceGate {
    fn default() -> Self {
        Self::new()
    }
}
