use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::fs;

use crate::adapters::http::state::HttpState;
use crate::application::dto::{ConfigurePipelineRequest, TuningUpdate};
use crate::domain::model::DetectorParams;

#[derive(Deserialize)]
pub struct FileQuery { path: Option<String> }

fn get_video_path(idx: u32) -> String { format!("/dev/video{}", idx) }

pub async fn list_files(Query(query): Query<FileQuery>) -> impl IntoResponse {
    let current_path = query.path.unwrap_or_else(|| ".".into());
    let mut entries = Vec::new();

    if let Ok(read_dir) = fs::read_dir(&current_path) {
        for entry in read_dir.flatten() {
            let path = entry.path();
            let name = path.file_name().unwrap_or_default().to_string_lossy().to_string();
            let is_dir = path.is_dir();
            if is_dir || name.ends_with(".onnx") {
                entries.push(json!({
                    "name": name,
                    "path": path.to_string_lossy().to_string(),
                    "is_dir": is_dir
                }));
            }
        }
    }
    Json(json!({
        "current_path": fs::canonicalize(&current_path).unwrap_or(current_path.into()).to_string_lossy(),
        "entries": entries
    }))
}

pub async fn get_config() -> impl IntoResponse {
    let params = DetectorParams::default();
    Json(json!({
        "camera_index": 0,
        "fourcc": "MJPG",
        "width": 640,
        "height": 480,
        "fps": 30,
        "model_path": "models/yolo11n.onnx",
        "candidate_floor": params.candidate_floor,
        "max_det": params.max_detections
    }))
}

pub async fn list_cameras(State(st): State<HttpState>) -> impl IntoResponse {
    match st.camera.list_cameras().await {
        Ok(cameras) => {
            let res: Vec<_> = cameras.into_iter().map(|c| {
                let idx = c.id.path.chars().filter(|ch| ch.is_ascii_digit()).collect::<String>().parse::<u32>().unwrap_or(0);
                json!({ "index": idx, "card": c.card, "path": c.id.path })
            }).collect();
            Json(res).into_response()
        },
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

pub async fn list_modes_by_index(State(st): State<HttpState>, Path(idx): Path<u32>) -> impl IntoResponse {
    let cam = crate::domain::camera::CameraId { path: get_video_path(idx) };
    let formats = st.camera.list_formats(cam.clone()).await.unwrap_or_default();
    let sizes = if let Some(f) = formats.iter().find(|f| f.fourcc == "MJPG").or(formats.first()) {
        st.camera.list_frame_sizes(cam, f.fourcc.clone()).await.unwrap_or_default()
    } else { vec![] };

    Json(json!({ "formats": formats, "frame_sizes": sizes, "fps_options": [15, 30, 60] })).into_response()
}

/// Lectura de la superficie de configuración en vivo.
pub async fn get_tuning(State(st): State<HttpState>) -> impl IntoResponse {
    Json(st.tuning.snapshot())
}

/// Escritura parcial sobre la superficie de configuración. El cambio rige a
/// partir del siguiente tick del lazo; nunca reprocesa frames pasados.
pub async fn set_tuning(State(st): State<HttpState>, Json(update): Json<TuningUpdate>) -> impl IntoResponse {
    Json(st.tuning.apply(update))
}

pub async fn apply_config(State(st): State<HttpState>, Json(req): Json<serde_json::Value>) -> impl IntoResponse {
    let idx = req["camera_index"].as_u64().unwrap_or(0) as u32;
    let defaults = DetectorParams::default();
    let (cam, mode, infer) = ConfigurePipelineRequest {
        camera_path: get_video_path(idx),
        fourcc: req["fourcc"].as_str().unwrap_or("MJPG").to_string(),
        width: req["width"].as_u64().unwrap_or(640) as u32,
        height: req["height"].as_u64().unwrap_or(480) as u32,
        fps: req["fps"].as_u64().unwrap_or(30) as u32,
        model_name: "yolo".to_string(),
        onnx_path: req["model_path"].as_str().unwrap_or("").to_string(),
        detector: DetectorParams {
            input_size: req["imgsz"].as_u64().unwrap_or(defaults.input_size as u64) as u32,
            candidate_floor: req["candidate_floor"].as_f64().unwrap_or(defaults.candidate_floor as f64) as f32,
            max_detections: req["max_det"].as_u64().unwrap_or(defaults.max_detections as u64) as usize,
        },
    }.into();

    match st.pipeline.configure(cam, mode, infer).await {
        Ok(_) => Json(json!({ "ok": true })).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response(),
    }
}
