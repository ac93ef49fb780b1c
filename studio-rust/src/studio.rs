use crate::{
    google::{
        api::{
            Content, GenerateContentConfig, GenerateContentParameters, ImageConfig,
            PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
        },
        GoogleModel, GoogleModelOptions,
    },
    response, ContentModel, CoverArt, GeneratedSong, GenerationParams, StudioError,
    StudioOptions, StudioResult, Track,
};
use songsmith_audio::{render_speech, RenderedAudio};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};
use tracing_futures::Instrument;

const FALLBACK_LYRICS: &str = "No lyrics generated.";
const COVER_TITLE_CHARS: usize = 20;
const COVER_ASPECT_RATIO: &str = "1:1";
const AUDIO_MODALITY: &str = "AUDIO";

/// Produces songs from prompts: lyrics first, then vocals sung from those
/// lyrics, with cover art generated alongside.
pub struct Studio {
    lyric_model: Arc<dyn ContentModel>,
    image_model: Arc<dyn ContentModel>,
    speech_model: Arc<dyn ContentModel>,
    options: StudioOptions,
}

impl Studio {
    #[must_use]
    pub fn new(
        lyric_model: Arc<dyn ContentModel>,
        image_model: Arc<dyn ContentModel>,
        speech_model: Arc<dyn ContentModel>,
        options: StudioOptions,
    ) -> Self {
        Self {
            lyric_model,
            image_model,
            speech_model,
            options,
        }
    }

    /// A studio backed by Gemini, with the three models sharing one HTTP
    /// client.
    #[must_use]
    pub fn google(model_options: GoogleModelOptions, options: StudioOptions) -> Self {
        let model_options = GoogleModelOptions {
            client: Some(model_options.client.clone().unwrap_or_default()),
            ..model_options
        };
        let model = |model_id: &str| -> Arc<dyn ContentModel> {
            Arc::new(GoogleModel::new(model_id, model_options.clone()))
        };

        Self::new(
            model(&options.lyric_model_id),
            model(&options.image_model_id),
            model(&options.speech_model_id),
            options,
        )
    }

    #[must_use]
    pub fn options(&self) -> &StudioOptions {
        &self.options
    }

    /// Generates lyrics, cover art and vocals for `params`.
    ///
    /// Cover art never fails the generation; a placeholder is used instead.
    pub async fn generate_song(&self, params: &GenerationParams) -> StudioResult<GeneratedSong> {
        if params.prompt.trim().is_empty() {
            return Err(StudioError::InvalidInput(
                "Prompt must not be empty".to_string(),
            ));
        }

        let span = info_span!(
            "songsmith.generate_song",
            style = %params.style,
            voice = %params.voice
        );

        self.compose_song(params).instrument(span).await
    }

    async fn compose_song(&self, params: &GenerationParams) -> StudioResult<GeneratedSong> {
        let (cover, vocals) = futures::join!(self.generate_cover(params), async {
            let lyrics = self.generate_lyrics(params).await?;
            let audio = self.generate_vocals(params, &lyrics).await?;
            Ok::<_, StudioError>((lyrics, audio))
        });
        let (lyrics, audio) = vocals?;

        info!(
            duration = audio.duration,
            generated_cover = cover.is_generated(),
            "generated song"
        );
        Ok(GeneratedSong {
            lyrics,
            cover,
            audio,
        })
    }

    /// Generates a song and wraps it as a new track.
    pub async fn create_track(&self, params: &GenerationParams) -> StudioResult<Track> {
        let song = self.generate_song(params).await?;
        Ok(Track::from_generation(params, &song))
    }

    pub async fn generate_lyrics(&self, params: &GenerationParams) -> StudioResult<String> {
        let request = GenerateContentParameters {
            contents: vec![Content::user_text(lyric_prompt(params))],
            ..Default::default()
        };
        let response = self.lyric_model.generate_content(request).await?;

        Ok(response::text(&response).unwrap_or_else(|| {
            debug!("lyric model returned no text");
            FALLBACK_LYRICS.to_string()
        }))
    }

    pub async fn generate_cover(&self, params: &GenerationParams) -> CoverArt {
        let request = GenerateContentParameters {
            contents: vec![Content::user_text(cover_prompt(params))],
            generation_config: Some(GenerateContentConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: Some(COVER_ASPECT_RATIO.to_string()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        match self.image_model.generate_content(request).await {
            Ok(response) => response::inline_image(&response).unwrap_or_else(|| {
                warn!("image model returned no inline image, using placeholder cover");
                CoverArt::placeholder()
            }),
            Err(error) => {
                warn!(%error, "cover generation failed, using placeholder cover");
                CoverArt::placeholder()
            }
        }
    }

    /// Sings `lyrics` with the requested voice and renders the result as WAV.
    pub async fn generate_vocals(
        &self,
        params: &GenerationParams,
        lyrics: &str,
    ) -> StudioResult<RenderedAudio> {
        let request = GenerateContentParameters {
            contents: vec![Content::user_text(speech_prompt(params, lyrics))],
            generation_config: Some(GenerateContentConfig {
                response_modalities: Some(vec![AUDIO_MODALITY.to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: Some(VoiceConfig {
                        prebuilt_voice_config: Some(PrebuiltVoiceConfig {
                            voice_name: Some(params.voice.as_str().to_string()),
                        }),
                    }),
                    language_code: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let response = self.speech_model.generate_content(request).await?;

        let payload = response::speech_payload(
            &response,
            self.options.speech_sample_rate,
            self.options.speech_channels,
        )?;
        Ok(render_speech(&payload)?)
    }
}

fn lyric_prompt(params: &GenerationParams) -> String {
    format!(
        "Write a short 4-line song lyric based on this prompt: \"{}\".\n\
         Style: {}.\n\
         Make it poetic and catchy. Only return the lyrics, nothing else.",
        params.prompt, params.style
    )
}

fn cover_prompt(params: &GenerationParams) -> String {
    let title: String = params.prompt.chars().take(COVER_TITLE_CHARS).collect();
    format!(
        "An artistic, high-quality album cover for a song titled \"{title}\". \
         Style: {}. Abstract, cinematic lighting, vibrant colors.",
        params.style
    )
}

fn speech_prompt(params: &GenerationParams, lyrics: &str) -> String {
    format!(
        "Speak rhythmically and with emotion like a {} artist: {lyrics}",
        params.style
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VoiceName;

    fn params() -> GenerationParams {
        GenerationParams {
            prompt: "a very long prompt about midnight trains and rain".to_string(),
            style: "Synthwave".to_string(),
            voice: VoiceName::Puck,
        }
    }

    #[test]
    fn cover_prompt_uses_first_twenty_chars() {
        assert!(cover_prompt(&params()).contains("titled \"a very long prompt a\"."));
    }

    #[test]
    fn speech_prompt_embeds_style_and_lyrics() {
        assert_eq!(
            speech_prompt(&params(), "la la la"),
            "Speak rhythmically and with emotion like a Synthwave artist: la la la"
        );
    }

    #[test]
    fn lyric_prompt_quotes_the_request() {
        let prompt = lyric_prompt(&params());
        assert!(prompt.contains("\"a very long prompt about midnight trains and rain\""));
        assert!(prompt.contains("Style: Synthwave."));
    }
}
