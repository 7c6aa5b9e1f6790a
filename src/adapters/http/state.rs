use std::sync::Arc;
use crate::application::services::{CameraService, PipelineService, TuningService};

/// Estado compartido para los manejadores HTTP de Axum.
/// Siguiendo la Arquitectura Hexagonal, el estado contiene los servicios (Casos de Uso).
#[derive(Clone)]
pub struct HttpState {
    /// Servicio para el inventario de cámaras y sus modos.
    pub camera: Arc<CameraService>,
    /// Servicio para orquestar el flujo de captura, render e inferencia.
    pub pipeline: Arc<PipelineService>,
    /// Superficie de configuración en vivo (umbral, escala, filtros...).
    pub tuning: TuningService,
}
