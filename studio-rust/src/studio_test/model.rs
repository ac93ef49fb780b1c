use std::{collections::VecDeque, sync::Mutex};

use crate::{
    google::api::{GenerateContentParameters, GenerateContentResponse},
    ContentModel, StudioError, StudioResult,
};

/// Result for a mocked `generate_content` call.
/// It can either be a full response or an error to return.
pub enum MockContentResult {
    Response(GenerateContentResponse),
    Error(StudioError),
}

impl MockContentResult {
    /// Construct a result that yields the provided response.
    pub fn response(response: GenerateContentResponse) -> Self {
        Self::Response(response)
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: StudioError) -> Self {
        Self::Error(error)
    }
}

impl From<GenerateContentResponse> for MockContentResult {
    fn from(response: GenerateContentResponse) -> Self {
        Self::response(response)
    }
}

impl From<StudioResult<GenerateContentResponse>> for MockContentResult {
    fn from(result: StudioResult<GenerateContentResponse>) -> Self {
        match result {
            Ok(response) => Self::Response(response),
            Err(error) => Self::Error(error),
        }
    }
}

#[derive(Default)]
struct MockContentModelState {
    mocked_results: VecDeque<MockContentResult>,
    tracked_inputs: Vec<GenerateContentParameters>,
}

/// A mock content model for testing that tracks inputs and yields predefined
/// outputs in order.
pub struct MockContentModel {
    provider: &'static str,
    model_id: String,
    state: Mutex<MockContentModelState>,
}

impl Default for MockContentModel {
    fn default() -> Self {
        Self {
            provider: "mock",
            model_id: "mock-model".to_string(),
            state: Mutex::new(MockContentModelState::default()),
        }
    }
}

impl MockContentModel {
    /// Construct a new mock content model instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the model identifier returned by the mock.
    pub fn set_model_id<S: Into<String>>(&mut self, model_id: S) {
        self.model_id = model_id.into();
    }

    /// Enqueue one or more mocked results.
    pub fn enqueue_results<I>(&self, results: I) -> &Self
    where
        I: IntoIterator<Item = MockContentResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_results.extend(results);
        drop(state);
        self
    }

    /// Convenience to enqueue a single mocked result.
    pub fn enqueue<R>(&self, result: R) -> &Self
    where
        R: Into<MockContentResult>,
    {
        self.enqueue_results(std::iter::once(result.into()))
    }

    /// Retrieve the tracked inputs accumulated so far.
    pub fn tracked_inputs(&self) -> Vec<GenerateContentParameters> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_inputs.clone()
    }

    /// Clear both tracked inputs and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_results.clear();
        state.tracked_inputs.clear();
    }
}

#[async_trait::async_trait]
impl ContentModel for MockContentModel {
    fn provider(&self) -> &'static str {
        self.provider
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate_content(
        &self,
        params: GenerateContentParameters,
    ) -> StudioResult<GenerateContentResponse> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_inputs.push(params);

        let result = state.mocked_results.pop_front().ok_or_else(|| {
            StudioError::Invariant(self.provider, "no mocked results available".into())
        })?;

        match result {
            MockContentResult::Response(response) => Ok(response),
            MockContentResult::Error(error) => Err(error),
        }
    }
}
