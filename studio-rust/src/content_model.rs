use crate::{
    google::api::{GenerateContentParameters, GenerateContentResponse},
    StudioResult,
};

/// A remote model that answers `generateContent` requests.
///
/// Lyrics, cover art and speech each go through one of these, so tests can
/// swap any of them for [`crate::studio_test::MockContentModel`].
#[async_trait::async_trait]
pub trait ContentModel: Send + Sync {
    fn provider(&self) -> &'static str;
    fn model_id(&self) -> String;
    async fn generate_content(
        &self,
        params: GenerateContentParameters,
    ) -> StudioResult<GenerateContentResponse>;
}
