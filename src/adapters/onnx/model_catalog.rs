use async_trait::async_trait;
use std::path::Path;

use crate::application::ports::ModelCatalogPort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::ModelId;

pub struct OnnxModelCatalog;

impl OnnxModelCatalog {
    pub fn new() -> Self { Self }
}

#[async_trait]
impl ModelCatalogPort for OnnxModelCatalog {
    async fn validate_model(&self, model: &ModelId) -> DomainResult<()> {
        let path = model.onnx_path.trim();
        if path.is_empty() {
            return Err(DomainError::InvalidInput("onnx_path vacío".into()));
        }
        if !path.ends_with(".onnx") {
            return Err(DomainError::InvalidInput(format!(
                "se esperaba un fichero .onnx: {path}"
            )));
        }
        if !Path::new(path).exists() {
            return Err(DomainError::NotFound(format!("modelo no encontrado: {path}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(path: &str) -> ModelId {
        ModelId { name: "yolo".into(), onnx_path: path.into() }
    }

    #[tokio::test]
    async fn rejects_empty_path() {
        let catalog = OnnxModelCatalog::new();
        assert!(catalog.validate_model(&model("  ")).await.is_err());
    }

    #[tokio::test]
    async fn rejects_non_onnx_extension() {
        let catalog = OnnxModelCatalog::new();
        assert!(catalog.validate_model(&model("/tmp/pesos.bin")).await.is_err());
    }

    #[tokio::test]
    async fn rejects_missing_file() {
        let catalog = OnnxModelCatalog::new();
        let result = catalog.validate_model(&model("/no/existe/modelo.onnx")).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
