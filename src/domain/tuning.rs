use serde::{Deserialize, Serialize};

/// Parámetros ajustables en vivo desde el dashboard.
///
/// El worker del pipeline toma una instantánea inmutable por tick; un cambio
/// surte efecto a partir del tick siguiente y nunca reprocesa frames pasados.
/// Los tres factores de filtro son multiplicadores no negativos con 1.0 como
/// identidad.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TuningState {
    /// Umbral de confianza del overlay (las cajas con score inferior se
    /// descartan al pintar).
    pub threshold: f32,
    /// Lado al que el detector redimensiona internamente la imagen.
    pub processing_size: u32,
    /// Factor de escala de la resolución de salida.
    pub scale: f32,
    /// Reflejo horizontal del frame y de las coordenadas del overlay.
    pub mirror: bool,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for TuningState {
    fn default() -> Self {
        Self {
            threshold: 0.25,
            processing_size: 128,
            scale: 0.5,
            mirror: false,
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}
