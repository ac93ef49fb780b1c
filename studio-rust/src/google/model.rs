use super::api::{GenerateContentParameters, GenerateContentResponse};
use crate::{client_utils, ContentModel, StudioError, StudioResult};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "google";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleModel {
    model_id: String,
    api_key: String,
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct GoogleModelOptions {
    pub api_key: String,
    pub base_url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    /// Share one client between the lyric, image and speech models to reuse
    /// connections.
    pub client: Option<Client>,
}

impl GoogleModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: GoogleModelOptions) -> Self {
        let GoogleModelOptions {
            api_key,
            base_url,
            headers,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            model_id: model_id.into(),
            api_key,
            base_url,
            client,
            headers,
        }
    }

    fn request_headers(&self) -> StudioResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                StudioError::InvalidInput(format!("Invalid Google header name '{key}': {error}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                StudioError::InvalidInput(format!(
                    "Invalid Google header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model_id, self.api_key
        )
    }
}

#[async_trait::async_trait]
impl ContentModel for GoogleModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate_content(
        &self,
        params: GenerateContentParameters,
    ) -> StudioResult<GenerateContentResponse> {
        crate::opentelemetry::trace_generate_content(
            self.provider(),
            &self.model_id,
            params,
            |params| async move {
                if self.api_key.is_empty() {
                    return Err(StudioError::InvalidInput(
                        "Google API key is empty".to_string(),
                    ));
                }
                let headers = self.request_headers()?;
                client_utils::send_json(&self.client, &self.generate_content_url(), &params, headers)
                    .await
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_without_trailing_slash() {
        let model = GoogleModel::new(
            "gemini-2.5-flash-preview-tts",
            GoogleModelOptions {
                api_key: "secret".to_string(),
                base_url: Some("http://localhost:8080/v1beta/".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(
            model.generate_content_url(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash-preview-tts:generateContent?key=secret"
        );
    }

    #[test]
    fn rejects_invalid_header_names() {
        let model = GoogleModel::new(
            "gemini-3-flash-preview",
            GoogleModelOptions {
                api_key: "secret".to_string(),
                headers: Some(HashMap::from([(
                    "bad header".to_string(),
                    "value".to_string(),
                )])),
                ..Default::default()
            },
        );

        assert!(matches!(
            model.request_headers(),
            Err(StudioError::InvalidInput(_))
        ));
    }
}
