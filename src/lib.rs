//! Anotación de vídeo en vivo.
//!
//! Lazo de anotación en tiempo real: captura de cámara V4L2, composición de
//! la superficie de render (escala, espejo y filtros de color), inferencia
//! ONNX solapada detrás de una compuerta de exclusión mutua y overlay
//! declarativo de cajas etiquetadas publicado hacia un dashboard web.
//!
//! # Estructura
//!
//! - `domain`: tipos y lógica pura (geometría, detecciones, overlay, ajustes)
//! - `application`: puertos y servicios (casos de uso)
//! - `adapters`: infraestructura (V4L2, ONNX, superficie de render,
//!   pipeline y HTTP/WebSocket)

pub mod adapters;
pub mod application;
pub mod domain;
