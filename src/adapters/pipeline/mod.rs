pub mod gate;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use image::RgbImage;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::adapters::onnx::yolo_engine::OnnxYoloEngine;
use crate::adapters::render::surface::RenderSurface;
use crate::adapters::v4l2::capture::{CaptureConfig, V4l2FrameSource};
use crate::application::ports::{DetectorPort, FrameSourcePort, StreamPort};
use crate::application::services::TuningService;
use crate::domain::{
    camera::{CameraId, CameraMode},
    errors::{DomainError, DomainResult},
    geometry::StreamGeometry,
    model::{DetectorParams, InferenceConfig},
    overlay::build_overlay,
    stream::{summarize_detections, FrameMeta},
};

use gate::InferenceGate;

/// Orquestador del lazo de anotación.
///
/// Un hilo worker captura, compone y publica a cadencia de cámara; la
/// inferencia corre solapada a su propio ritmo detrás de la compuerta, y el
/// overlay de cada frame se construye siempre con el último resultado
/// completado. El lazo nunca se bloquea esperando al detector.
pub struct AnnotatorPipeline {
    cfg: Arc<RwLock<Option<PipelineConfig>>>,
    tx: broadcast::Sender<(FrameMeta, Vec<u8>)>,
}

#[derive(Clone)]
struct PipelineConfig {
    camera: CameraId,
    mode: CameraMode,
    infer: InferenceConfig,
}

impl AnnotatorPipeline {
    pub fn new(tuning: TuningService) -> Self {
        let (tx, _) = broadcast::channel(16);

        let pipeline = Self {
            cfg: Arc::new(RwLock::new(None)),
            tx,
        };

        pipeline.spawn_worker(tuning);
        pipeline
    }

    fn spawn_worker(&self, tuning: TuningService) {
        let cfg_handle = self.cfg.clone();
        let tx = self.tx.clone();

        std::thread::spawn(move || {
            let gate = InferenceGate::new();
            let mut surface = RenderSurface::new();
            let mut source: Option<V4l2FrameSource> = None;
            let mut engine: Option<Arc<OnnxYoloEngine>> = None;
            let mut last_key: Option<String> = None;

            info!("Worker del pipeline: lazo de anotación iniciado.");

            loop {
                // 1. Configuración vigente.
                let current = {
                    let lock = cfg_handle.read().unwrap();
                    lock.clone()
                };

                let Some(current) = current else {
                    std::thread::sleep(Duration::from_millis(250));
                    continue;
                };

                // 2. Recarga de recursos si cambió cámara o modelo. Un fallo
                // al abrir la cámara es terminal para esta configuración: no
                // se reintenta hasta que llegue una configuración nueva.
                let config_key = format!(
                    "{}-{}x{}-{}",
                    current.camera.path,
                    current.mode.size.width,
                    current.mode.size.height,
                    current.infer.model.onnx_path
                );

                if Some(&config_key) != last_key.as_ref() {
                    info!("Pipeline: recargando recursos para {}", config_key);

                    source = V4l2FrameSource::open(&CaptureConfig {
                        camera_path: current.camera.path.clone(),
                        fourcc: current.mode.format.clone(),
                        width: current.mode.size.width,
                        height: current.mode.size.height,
                        fps: current.mode.fps,
                    })
                    .map_err(|e| error!("No se pudo abrir la cámara: {e:#}"))
                    .ok();

                    info!("Cargando modelo...");
                    engine = OnnxYoloEngine::load(&current.infer.model.onnx_path)
                        .map_err(|e| error!("Error cargando el modelo: {e:#}"))
                        .ok()
                        .map(Arc::new);

                    if source.is_some() && engine.is_some() {
                        info!("Listo");
                    }
                    last_key = Some(config_key);
                }

                // 3. Un tick del lazo: captura, composición, quizá inferencia.
                if let (Some(src), Some(eng)) = (source.as_mut(), engine.as_ref()) {
                    match src.next_frame() {
                        Ok(frame) => {
                            let tuning = tuning.snapshot();
                            let geometry = StreamGeometry::new(src.dimensions(), tuning.scale);

                            // El frame se dibuja siempre antes de (quizá)
                            // enviarse a inferencia en este mismo tick.
                            surface.render(&frame, &geometry, &tuning);

                            if gate.is_idle() {
                                let params = DetectorParams {
                                    input_size: tuning.processing_size,
                                    ..current.infer.params
                                };
                                let detector: Arc<dyn DetectorPort> = eng.clone();
                                gate.tick(surface.pixels().clone(), detector, params);
                            }

                            // 4. Overlay con el último resultado completado y
                            // publicación hacia el dashboard.
                            if tx.receiver_count() > 0 {
                                let snapshot = gate.latest();
                                let boxes = build_overlay(
                                    &snapshot.detections,
                                    snapshot.frame_size,
                                    tuning.threshold,
                                    tuning.mirror,
                                );

                                let out = geometry.output();
                                let (display_width, display_height) = geometry.display_box();

                                let mut status = if snapshot.fps > 0.0 {
                                    format!("FPS: {:.2}", snapshot.fps)
                                } else {
                                    "Listo".to_string()
                                };
                                let summary = summarize_detections(&snapshot.detections);
                                if !summary.is_empty() {
                                    status.push_str(&format!(" ({summary})"));
                                }

                                let meta = FrameMeta {
                                    width: out.width,
                                    height: out.height,
                                    display_width,
                                    display_height,
                                    infer_ms: snapshot.infer_ms,
                                    fps: snapshot.fps,
                                    status,
                                    boxes,
                                };

                                match encode_jpeg(surface.pixels()) {
                                    Ok(jpeg) => {
                                        let _ = tx.send((meta, jpeg));
                                    }
                                    Err(e) => warn!("Error codificando JPEG: {e:#}"),
                                }
                            }
                        }
                        Err(e) => {
                            warn!("Error capturando frame: {e}");
                            std::thread::sleep(Duration::from_millis(10));
                        }
                    }
                } else {
                    std::thread::sleep(Duration::from_millis(1000));
                }
            }
        });
    }
}

fn encode_jpeg(rgb: &RgbImage) -> Result<Vec<u8>> {
    let mut jpeg = Vec::new();
    let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 80);
    enc.encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(jpeg)
}

#[async_trait]
impl StreamPort for AnnotatorPipeline {
    async fn configure(
        &self,
        camera: CameraId,
        mode: CameraMode,
        infer: InferenceConfig,
    ) -> DomainResult<()> {
        let mut lock = self
            .cfg
            .write()
            .map_err(|_| DomainError::OperationFailed("Lock de configuración fallido".into()))?;
        *lock = Some(PipelineConfig { camera, mode, infer });
        Ok(())
    }

    async fn subscribe(&self) -> DomainResult<broadcast::Receiver<(FrameMeta, Vec<u8>)>> {
        Ok(self.tx.subscribe())
    }
}
