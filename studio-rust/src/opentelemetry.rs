use crate::{
    google::api::{GenerateContentParameters, GenerateContentResponse},
    StudioResult,
};
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct ContentSpan {
    span: Span,
    start_time: Instant,
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
    response_id: Option<String>,
    response_modalities: Option<String>,
    temperature: Option<f64>,
}

impl ContentSpan {
    pub fn new(provider: &str, model_id: &str, params: &GenerateContentParameters) -> Self {
        let span = info_span!("songsmith.generate_content");
        span.set_attribute("gen_ai.operation.name", "generate_content");
        span.set_attribute("gen_ai.provider.name", provider.to_string());
        span.set_attribute("gen_ai.request.model", model_id.to_string());

        let config = params.generation_config.as_ref();
        Self {
            span,
            start_time: Instant::now(),
            input_tokens: None,
            output_tokens: None,
            response_id: None,
            response_modalities: config
                .and_then(|c| c.response_modalities.as_ref())
                .map(|modalities| modalities.join(",")),
            temperature: config.and_then(|c| c.temperature),
        }
    }

    fn span(&self) -> Span {
        self.span.clone()
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span()).await
    }

    pub fn on_response(&mut self, response: &GenerateContentResponse) {
        if let Some(usage) = &response.usage_metadata {
            self.input_tokens = usage.prompt_token_count;
            self.output_tokens = usage.candidates_token_count;
        }
        self.response_id.clone_from(&response.response_id);
    }

    pub fn on_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        if let Some(input_tokens) = self.input_tokens {
            self.span
                .set_attribute("gen_ai.usage.input_tokens", i64::from(input_tokens));
        }
        if let Some(output_tokens) = self.output_tokens {
            self.span
                .set_attribute("gen_ai.usage.output_tokens", i64::from(output_tokens));
        }
        if let Some(response_id) = &self.response_id {
            self.span
                .set_attribute("gen_ai.response.id", response_id.clone());
        }
        if let Some(modalities) = &self.response_modalities {
            self.span
                .set_attribute("songsmith.request.modalities", modalities.clone());
        }
        if let Some(temperature) = self.temperature {
            self.span
                .set_attribute("gen_ai.request.temperature", temperature);
        }
        self.span
            .set_attribute("songsmith.duration_seconds", self.elapsed_seconds());
    }

    fn elapsed_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

pub async fn trace_generate_content<F, Fut>(
    provider: &str,
    model_id: &str,
    params: GenerateContentParameters,
    f: F,
) -> StudioResult<GenerateContentResponse>
where
    F: FnOnce(GenerateContentParameters) -> Fut,
    Fut: std::future::Future<Output = StudioResult<GenerateContentResponse>>,
{
    let mut span = ContentSpan::new(provider, model_id, &params);
    let result = span.instrument_future(f(params)).await;

    match &result {
        Ok(response) => span.on_response(response),
        Err(error) => span.on_error(error),
    }

    span.on_end();
    result
}
