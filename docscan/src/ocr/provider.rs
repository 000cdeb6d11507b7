use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::DynamicImage;
use leptess::LepTess;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{parse_ocr_provider_model, OcrConfig};
use crate::error::{DocscanError, Result};

use super::api::VisionApiClient;
use super::decode::encode_png;

/// Text recognition over decoded image pixels.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &DynamicImage) -> Result<String>;

    fn is_available(&self) -> bool {
        true
    }

    /// Short label for health output and logs.
    fn name(&self) -> String;
}

#[derive(Clone)]
enum OcrBackend {
    Local { tesseract: Arc<Mutex<LepTess>> },
    Api { client: VisionApiClient },
    Unavailable { reason: String },
}

/// OCR engine selected from [`OcrConfig::model`].
///
/// `local/*` (or no prefix) runs Tesseract in-process through leptess;
/// `openai/<model>` calls a vision chat-completions API. If the chosen engine
/// cannot start, the provider stays up in an unavailable state and every
/// recognize call fails with [`DocscanError::OcrUnavailable`].
#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

fn create_tesseract(languages: &str) -> std::result::Result<LepTess, String> {
    LepTess::new(None, languages).map_err(|e| e.to_string())
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Self {
        let (provider, _) = parse_ocr_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => match VisionApiClient::new(config) {
                Ok(client) => {
                    info!(model = client.model(), "Vision API OCR backend initialized");
                    OcrBackend::Api { client }
                }
                Err(e) => {
                    let reason = format!("Vision OCR backend unavailable: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
            _ => match create_tesseract(&config.languages) {
                Ok(lt) => {
                    info!(languages = %config.languages, "Tesseract OCR initialized");
                    OcrBackend::Local {
                        tesseract: Arc::new(Mutex::new(lt)),
                    }
                }
                Err(e) => {
                    let reason = format!("Tesseract not available: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
        };

        Self {
            backend,
            config: config.clone(),
        }
    }

    async fn recognize_internal(&self, image: &DynamicImage) -> Result<String> {
        let text = match &self.backend {
            OcrBackend::Local { tesseract } => {
                let png = encode_png(image)?;
                let tesseract = Arc::clone(tesseract);

                tokio::task::spawn_blocking(move || {
                    let mut lt = tesseract.blocking_lock();
                    lt.set_image_from_mem(&png)
                        .map_err(|e| DocscanError::Ocr(format!("Failed to set image: {e}")))?;
                    lt.get_utf8_text()
                        .map_err(|e| DocscanError::Ocr(format!("Failed to extract text: {e}")))
                })
                .await
                .map_err(|e| DocscanError::Ocr(format!("OCR task panicked: {e}")))??
            }
            OcrBackend::Api { client } => {
                let png = encode_png(image)?;
                client.ocr(&png).await?
            }
            OcrBackend::Unavailable { reason } => {
                return Err(DocscanError::OcrUnavailable(reason.clone()));
            }
        };

        // Engines pad their output differently; callers see it trimmed.
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl OcrEngine for OcrProvider {
    async fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let timeout = Duration::from_secs(self.config.timeout_secs);

        match tokio::time::timeout(timeout, self.recognize_internal(image)).await {
            Ok(result) => result,
            Err(_) => Err(DocscanError::Ocr(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    fn name(&self) -> String {
        match &self.backend {
            OcrBackend::Local { .. } => "tesseract".to_string(),
            OcrBackend::Api { client } => format!("openai/{}", client.model()),
            OcrBackend::Unavailable { .. } => "unavailable".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(model: &str, api_key: Option<&str>) -> OcrConfig {
        OcrConfig {
            model: model.to_string(),
            api_key: api_key.map(String::from),
            ..OcrConfig::default()
        }
    }

    fn api_config(server: &MockServer, timeout_secs: u64) -> OcrConfig {
        OcrConfig {
            base_url: Some(server.uri()),
            timeout_secs,
            ..make_config("openai/gpt-4o-mini", Some("test-key"))
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    fn blank_image() -> DynamicImage {
        DynamicImage::ImageLuma8(ImageBuffer::from_pixel(8, 8, Luma([255u8])))
    }

    #[test]
    fn test_local_model_reports_engine_state() {
        // Tesseract may or may not be installed; both outcomes are coherent.
        let provider = OcrProvider::new(&make_config("local/tesseract", None));
        let expected = if provider.is_available() {
            "tesseract"
        } else {
            "unavailable"
        };
        assert_eq!(provider.name(), expected);
    }

    #[tokio::test]
    async fn test_unavailable_returns_error() {
        let provider = OcrProvider {
            backend: OcrBackend::Unavailable {
                reason: "Test unavailable".to_string(),
            },
            config: OcrConfig::default(),
        };

        let result = provider.recognize(&blank_image()).await;
        assert!(matches!(result, Err(DocscanError::OcrUnavailable(_))));
        assert_eq!(provider.name(), "unavailable");
    }

    #[test]
    fn test_openai_without_api_key_falls_back_to_unavailable() {
        let provider = OcrProvider::new(&make_config("openai/gpt-4o-mini", None));
        assert!(!provider.is_available());
    }

    #[test]
    fn test_openai_with_api_key_is_available() {
        let provider = OcrProvider::new(&make_config("openai/gpt-4o-mini", Some("k")));
        assert!(provider.is_available());
        assert_eq!(provider.name(), "openai/gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_api_output_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("  INVOICE 42\n\n")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OcrProvider::new(&api_config(&server, 5));
        let text = provider.recognize(&blank_image()).await.unwrap();
        assert_eq!(text, "INVOICE 42");
    }

    #[tokio::test]
    async fn test_slow_engine_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("too late"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let provider = OcrProvider::new(&api_config(&server, 1));
        let started = std::time::Instant::now();
        let result = provider.recognize(&blank_image()).await;

        assert!(matches!(result, Err(DocscanError::Ocr(_))));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_clones_share_the_api_client() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("same")))
            .expect(2)
            .mount(&server)
            .await;

        let provider = OcrProvider::new(&api_config(&server, 5));
        let cloned = provider.clone();

        assert_eq!(provider.recognize(&blank_image()).await.unwrap(), "same");
        assert_eq!(cloned.recognize(&blank_image()).await.unwrap(), "same");
    }
}
