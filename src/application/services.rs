use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

use crate::{
    application::dto::TuningUpdate,
    application::ports::{CameraCatalogPort, ModelCatalogPort, StreamPort},
    domain::{
        camera::{CameraId, CameraInfo, CameraMode, PixelFormat},
        errors::DomainResult,
        geometry::FrameSize,
        model::InferenceConfig,
        stream::FrameMeta,
        tuning::TuningState,
    },
};

/// Servicio encargado del inventario de dispositivos físicos de captura.
/// Permite listar cámaras y consultar sus formatos y tamaños soportados.
#[derive(Clone)]
pub struct CameraService {
    catalog: Arc<dyn CameraCatalogPort>,
}

impl CameraService {
    pub fn new(catalog: Arc<dyn CameraCatalogPort>) -> Self {
        Self { catalog }
    }

    pub async fn list_cameras(&self) -> DomainResult<Vec<CameraInfo>> {
        self.catalog.list_cameras().await
    }

    pub async fn list_formats(&self, camera: CameraId) -> DomainResult<Vec<PixelFormat>> {
        self.catalog.list_formats(&camera).await
    }

    pub async fn list_frame_sizes(
        &self,
        camera: CameraId,
        fourcc: String,
    ) -> DomainResult<Vec<FrameSize>> {
        self.catalog.list_frame_sizes(&camera, &fourcc).await
    }
}

/// Orquestador del pipeline (captura + render + inferencia).
#[derive(Clone)]
pub struct PipelineService {
    stream: Arc<dyn StreamPort>,
    model_catalog: Arc<dyn ModelCatalogPort>,
}

impl PipelineService {
    pub fn new(stream: Arc<dyn StreamPort>, model_catalog: Arc<dyn ModelCatalogPort>) -> Self {
        Self {
            stream,
            model_catalog,
        }
    }

    /// Configura el pipeline completo. Antes de aplicar la configuración,
    /// valida que el modelo seleccionado exista.
    pub async fn configure(
        &self,
        camera: CameraId,
        mode: CameraMode,
        infer: InferenceConfig,
    ) -> DomainResult<()> {
        self.model_catalog.validate_model(&infer.model).await?;
        self.stream.configure(camera, mode, infer).await
    }

    /// Proporciona un receptor del canal de difusión donde se publican los
    /// frames procesados y sus metadatos.
    pub async fn subscribe(&self) -> DomainResult<broadcast::Receiver<(FrameMeta, Vec<u8>)>> {
        self.stream.subscribe().await
    }
}

/// Superficie de configuración en vivo.
///
/// Los manejadores HTTP escriben aquí (escrituras por flanco: el valor nuevo
/// rige a partir del siguiente tick); el worker del pipeline lee una
/// instantánea por tick y no escribe nunca.
#[derive(Clone)]
pub struct TuningService {
    state: Arc<RwLock<TuningState>>,
}

impl TuningService {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(TuningState::default())),
        }
    }

    /// Instantánea inmutable del estado actual.
    pub fn snapshot(&self) -> TuningState {
        *self.state.read().unwrap()
    }

    /// Aplica los campos presentes de `update` y devuelve el estado
    /// resultante. El acotado de rangos ocurre en el propio update.
    pub fn apply(&self, update: TuningUpdate) -> TuningState {
        let mut state = self.state.write().unwrap();
        update.apply_to(&mut state);
        *state
    }
}

impl Default for TuningService {
    fn default() -> Self {
        Self::new()
    }
}
