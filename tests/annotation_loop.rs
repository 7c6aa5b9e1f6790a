//! Escenarios del lazo de anotación completo con dobles de prueba:
//! fuente de frames sintética y detector de respuesta fija.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::{Rgb, RgbImage};

use annotator_dashboard::adapters::pipeline::gate::InferenceGate;
use annotator_dashboard::adapters::render::surface::RenderSurface;
use annotator_dashboard::application::ports::{DetectorPort, FrameSourcePort};
use annotator_dashboard::domain::detection::{Detection, DetectionOutput};
use annotator_dashboard::domain::geometry::{FrameSize, StreamGeometry};
use annotator_dashboard::domain::model::DetectorParams;
use annotator_dashboard::domain::overlay::build_overlay;
use annotator_dashboard::domain::tuning::TuningState;

/// Fuente sintética: produce un degradado a la resolución "negociada".
struct PatternSource {
    size: FrameSize,
}

impl FrameSourcePort for PatternSource {
    fn dimensions(&self) -> FrameSize {
        self.size
    }

    fn next_frame(&mut self) -> anyhow::Result<RgbImage> {
        let mut img = RgbImage::new(self.size.width, self.size.height);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgb([(x % 256) as u8, (y % 256) as u8, 64]);
        }
        Ok(img)
    }
}

/// Detector de prueba: devuelve siempre la misma detección, expresada en un
/// frame interno de 128×128, y cuenta cuántas llamadas recibe.
struct FixedDetector {
    calls: AtomicUsize,
}

impl FixedDetector {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }
}

impl DetectorPort for FixedDetector {
    fn detect(&self, _frame: &RgbImage, _params: &DetectorParams) -> anyhow::Result<DetectionOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(5));
        Ok(DetectionOutput {
            detections: vec![Detection {
                x1: 10.0,
                y1: 10.0,
                x2: 50.0,
                y2: 50.0,
                score: 0.9,
                class_id: 2,
                label: "coche".into(),
            }],
            frame_size: FrameSize { width: 128, height: 128 },
        })
    }
}

fn wait_idle(gate: &InferenceGate) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !gate.is_idle() {
        assert!(Instant::now() < deadline, "la compuerta no volvió a reposo");
        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Un tick completo del lazo: captura, composición y quizá inferencia.
fn tick(
    source: &mut PatternSource,
    surface: &mut RenderSurface,
    gate: &InferenceGate,
    detector: &Arc<FixedDetector>,
    tuning: &TuningState,
) -> StreamGeometry {
    let frame = source.next_frame().expect("frame sintético");
    let geometry = StreamGeometry::new(source.dimensions(), tuning.scale);
    surface.render(&frame, &geometry, tuning);

    if gate.is_idle() {
        let params = DetectorParams { input_size: tuning.processing_size, ..Default::default() };
        let det: Arc<dyn DetectorPort> = detector.clone();
        gate.tick(surface.pixels().clone(), det, params);
    }
    geometry
}

#[test]
fn full_loop_maps_one_detection_onto_the_scaled_surface() {
    let mut source = PatternSource { size: FrameSize { width: 640, height: 480 } };
    let mut surface = RenderSurface::new();
    let gate = InferenceGate::new();
    let detector = Arc::new(FixedDetector::new());
    let tuning = TuningState::default(); // escala 0.5, umbral 0.25, sin espejo

    let geometry = tick(&mut source, &mut surface, &gate, &detector, &tuning);

    // Captura 640×480 con escala 0.5: superficie de 320×240.
    assert_eq!(geometry.output(), FrameSize { width: 320, height: 240 });
    assert_eq!(surface.pixels().width(), 320);
    assert_eq!(surface.pixels().height(), 240);

    wait_idle(&gate);
    let snapshot = gate.latest();
    assert_eq!(snapshot.frame_size, FrameSize { width: 128, height: 128 });

    let boxes = build_overlay(&snapshot.detections, snapshot.frame_size, tuning.threshold, tuning.mirror);
    assert_eq!(boxes.len(), 1);
    let b = &boxes[0];
    assert!((b.left - 7.8125).abs() < 1e-4);
    assert!((b.top - 7.8125).abs() < 1e-4);
    assert!((b.width - 31.25).abs() < 1e-4);
    assert!((b.height - 31.25).abs() < 1e-4);
    assert_eq!(b.label, "coche (90.00%)");
}

#[test]
fn full_loop_with_mirror_reflects_boxes_with_the_video() {
    let mut source = PatternSource { size: FrameSize { width: 640, height: 480 } };
    let mut surface = RenderSurface::new();
    let gate = InferenceGate::new();
    let detector = Arc::new(FixedDetector::new());
    let tuning = TuningState { mirror: true, ..Default::default() };

    tick(&mut source, &mut surface, &gate, &detector, &tuning);
    wait_idle(&gate);

    let snapshot = gate.latest();
    let boxes = build_overlay(&snapshot.detections, snapshot.frame_size, tuning.threshold, tuning.mirror);
    assert_eq!(boxes.len(), 1);
    let b = &boxes[0];
    // x1' = 128 − 50 = 78 → 60.9375 % del ancho del frame del detector.
    assert!((b.left - 60.9375).abs() < 1e-4);
    assert!((b.width - 31.25).abs() < 1e-4);
    assert!((b.top - 7.8125).abs() < 1e-4);
}

#[test]
fn threshold_change_refilters_without_a_new_inference() {
    let mut source = PatternSource { size: FrameSize { width: 640, height: 480 } };
    let mut surface = RenderSurface::new();
    let gate = InferenceGate::new();
    let detector = Arc::new(FixedDetector::new());

    let tuning = TuningState::default();
    tick(&mut source, &mut surface, &gate, &detector, &tuning);
    wait_idle(&gate);

    let snapshot = gate.latest();
    let visible = build_overlay(&snapshot.detections, snapshot.frame_size, 0.25, false);
    assert_eq!(visible.len(), 1);

    // Subir el umbral entre ticks elimina la caja en el siguiente repintado
    // sin pedirle nada nuevo al detector.
    let snapshot = gate.latest();
    let hidden = build_overlay(&snapshot.detections, snapshot.frame_size, 0.95, false);
    assert!(hidden.is_empty());
    assert_eq!(detector.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn scale_change_between_ticks_resizes_surface_and_overlay_geometry_together() {
    let mut source = PatternSource { size: FrameSize { width: 640, height: 480 } };
    let mut surface = RenderSurface::new();
    let gate = InferenceGate::new();
    let detector = Arc::new(FixedDetector::new());

    let half = TuningState::default();
    let geometry = tick(&mut source, &mut surface, &gate, &detector, &half);
    assert_eq!(geometry.output(), FrameSize { width: 320, height: 240 });

    let quarter = TuningState { scale: 0.25, ..Default::default() };
    let geometry = tick(&mut source, &mut surface, &gate, &detector, &quarter);
    assert_eq!(geometry.output(), FrameSize { width: 160, height: 120 });
    assert_eq!(surface.pixels().width(), 160);
    assert_eq!(surface.pixels().height(), 120);

    // Las cajas siguen en porcentaje: la misma detección vale para ambas
    // geometrías sin recalcular nada.
    wait_idle(&gate);
    let snapshot = gate.latest();
    let boxes = build_overlay(&snapshot.detections, snapshot.frame_size, 0.25, false);
    assert_eq!(boxes.len(), 1);
    assert!((boxes[0].width - 31.25).abs() < 1e-4);
}
