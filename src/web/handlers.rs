use crate::image_input::{self, ImageLoader};
use crate::stats::StatsReport;
use crate::utils::error::ServiceError;
use crate::web::AppState;
use crate::{classifier, Prediction, Result};
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// JSON request body (base64 mode)
#[derive(Debug, Deserialize)]
pub struct ClassifyJsonRequest {
    /// Base64-encoded image data, with or without a data-URL prefix
    pub image: String,
}

/// Outcome of one classification: the prediction, the texts the UI shows
/// for it, and the refreshed aggregate view.
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub prediction: Prediction,
    pub caption: String,
    pub message: String,
    pub stats: StatsReport,
}

/// Standard response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: String,
    pub request_id: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            timestamp: chrono::Utc::now().to_rfc3339(),
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Multipart file upload handler
pub async fn classify_upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ClassifyResponse>>> {
    let start_time = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!("Processing upload: request_id={}", request_id);

    let mut image_data: Option<axum::body::Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ServiceError::InvalidInput(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or("unknown").to_string();

        match field_name.as_str() {
            "file" => {
                if let Some(content_type) = field.content_type() {
                    if !content_type.starts_with("image/") {
                        return Err(ServiceError::UnsupportedFormat(content_type.to_string()));
                    }
                }

                let data = field.bytes().await.map_err(|e| {
                    ServiceError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;

                if data.is_empty() {
                    return Err(ServiceError::InvalidInput("Empty file".to_string()));
                }

                tracing::debug!("Received file: {} bytes", data.len());
                image_data = Some(data);
            }
            _ => {
                tracing::debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let image_data = image_data
        .ok_or_else(|| ServiceError::InvalidInput("No image file provided".to_string()))?;

    let image = ImageLoader::from_bytes(&image_data, state.config.server_config.max_request_size)?;
    let response = classify_and_record(&state, image).await?;

    tracing::info!(
        "Classification completed: request_id={}, category={}, confidence={:.2}%, time={:.3}s",
        request_id,
        response.prediction.category,
        response.prediction.confidence,
        start_time.elapsed().as_secs_f32()
    );

    Ok(Json(ApiResponse::success(response)))
}

/// JSON base64 upload handler
pub async fn classify_base64_handler(
    State(state): State<AppState>,
    Json(request): Json<ClassifyJsonRequest>,
) -> Result<Json<ApiResponse<ClassifyResponse>>> {
    let start_time = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!("Processing base64 upload: request_id={}", request_id);

    if request.image.trim().is_empty() {
        return Err(ServiceError::InvalidInput("Empty image data".to_string()));
    }

    let image = ImageLoader::from_base64(
        &request.image,
        state.config.server_config.max_request_size,
    )?;
    let response = classify_and_record(&state, image).await?;

    tracing::info!(
        "Classification completed: request_id={}, category={}, confidence={:.2}%, time={:.3}s",
        request_id,
        response.prediction.category,
        response.prediction.confidence,
        start_time.elapsed().as_secs_f32()
    );

    Ok(Json(ApiResponse::success(response)))
}

/// Aggregate counters handler
pub async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatsReport>>> {
    let counts = state.store.list_all().await?;
    Ok(Json(ApiResponse::success(StatsReport::from_counts(&counts))))
}

/// Shared pipeline: preprocess, predict, decode, record, re-read stats.
async fn classify_and_record(state: &AppState, image: DynamicImage) -> Result<ClassifyResponse> {
    let tensor = image_input::to_tensor(&image);
    let scores = state.classifier.predict(tensor)?;
    let prediction = classifier::decode(&scores)?;

    state.store.increment(prediction.category).await?;
    let counts = state.store.list_all().await?;

    Ok(ClassifyResponse {
        caption: prediction.caption(),
        message: prediction.message(),
        prediction,
        stats: StatsReport::from_counts(&counts),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classify;
    use crate::store::{CounterStore, MemoryCounterStore};
    use crate::{Category, Config};
    use image::RgbImage;
    use ndarray::Array4;
    use std::sync::Arc;

    /// Scorer returning fixed raw scores, standing in for the ONNX model.
    struct CannedClassifier {
        scores: Vec<f32>,
    }

    impl Classify for CannedClassifier {
        fn predict(&self, _input: Array4<f32>) -> crate::Result<Vec<f32>> {
            Ok(self.scores.clone())
        }
    }

    fn state_with(scores: Vec<f32>, store: Arc<MemoryCounterStore>) -> AppState {
        let config = Config::new(
            "127.0.0.1:0".to_string(),
            "models/trash_classifier.onnx".to_string(),
            "firebase_key.json".to_string(),
            true,
        )
        .unwrap();

        AppState {
            config,
            classifier: Arc::new(CannedClassifier { scores }),
            store,
        }
    }

    fn test_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(64, 64))
    }

    #[tokio::test]
    async fn classification_increments_counter_and_refreshes_stats() {
        let store = Arc::new(MemoryCounterStore::new());
        for _ in 0..2 {
            store.increment(Category::Glass).await.unwrap();
        }

        // Scores strongly favoring glass
        let state = state_with(vec![10.0, 0.0, 0.0, 0.0], store.clone());
        let response = classify_and_record(&state, test_image()).await.unwrap();

        assert_eq!(response.prediction.category, Category::Glass);
        assert!(response.prediction.confidence > 90.0);
        assert!(response.caption.starts_with("Prediction: glass ("));
        assert_eq!(response.message, "This looks like GLASS waste.");

        // Counter went from 2 to 3, and the returned stats already see it
        assert_eq!(store.get(Category::Glass).await.unwrap(), Some(3));
        assert_eq!(response.stats.total, 3);
        assert_eq!(response.stats.rows.len(), 1);
        assert_eq!(response.stats.rows[0].category, Category::Glass);
        assert_eq!(response.stats.rows[0].count, 3);
    }

    #[tokio::test]
    async fn first_prediction_of_a_category_creates_its_record() {
        let store = Arc::new(MemoryCounterStore::new());

        // Scores favoring metal, which has no record yet
        let state = state_with(vec![0.0, 10.0, 0.0, 0.0], store.clone());
        let response = classify_and_record(&state, test_image()).await.unwrap();

        assert_eq!(response.prediction.category, Category::Metal);
        assert_eq!(store.get(Category::Metal).await.unwrap(), Some(1));
        assert_eq!(response.stats.rows.len(), 1);
        assert_eq!(response.stats.rows[0].count, 1);
        assert!((response.stats.rows[0].percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn envelope_serializes_with_data() {
        let response = ApiResponse::success(Prediction {
            category: Category::Glass,
            confidence: 92.5,
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["category"], "glass");
        assert!(value["request_id"].is_string());
    }
}
