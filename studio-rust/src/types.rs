use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use songsmith_audio::RenderedAudio;
use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

/// Prebuilt speech voices offered for the vocals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VoiceName {
    #[default]
    Kore,
    Puck,
    Charon,
    Fenrir,
    Zephyr,
}

impl VoiceName {
    pub const ALL: [Self; 5] = [
        Self::Kore,
        Self::Puck,
        Self::Charon,
        Self::Fenrir,
        Self::Zephyr,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kore => "Kore",
            Self::Puck => "Puck",
            Self::Charon => "Charon",
            Self::Fenrir => "Fenrir",
            Self::Zephyr => "Zephyr",
        }
    }
}

impl fmt::Display for VoiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub prompt: String,
    /// Musical style, e.g. "Synthwave" or "Acoustic Folk".
    pub style: String,
    pub voice: VoiceName,
}

/// Cover art for a track: either generated inline or a placeholder image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CoverArt {
    Generated {
        mime_type: String,
        /// Base64 image bytes.
        data: String,
    },
    Placeholder { url: String },
}

impl CoverArt {
    /// A random square placeholder image.
    #[must_use]
    pub fn placeholder() -> Self {
        let seed: u64 = rand::thread_rng().gen();
        Self::Placeholder {
            url: format!("https://picsum.photos/seed/{seed}/400/400"),
        }
    }

    #[must_use]
    pub fn url(&self) -> String {
        match self {
            Self::Generated { mime_type, data } => format!("data:{mime_type};base64,{data}"),
            Self::Placeholder { url } => url.clone(),
        }
    }

    #[must_use]
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }
}

/// Everything one generation produced.
#[derive(Debug, Clone)]
pub struct GeneratedSong {
    pub lyrics: String,
    pub cover: CoverArt,
    pub audio: RenderedAudio,
}

impl GeneratedSong {
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.audio.duration
    }

    /// The vocals as a `data:audio/wav;base64,…` URL.
    #[must_use]
    pub fn audio_url(&self) -> String {
        self.audio.container.to_data_url()
    }
}

/// A finished song as it appears in a track list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub style: String,
    pub prompt: String,
    pub lyrics: String,
    pub audio_url: String,
    pub cover_url: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

const UNTITLED: &str = "Untitled Session";
const TITLE_WORDS: usize = 3;
const ID_LEN: usize = 7;

impl Track {
    #[must_use]
    pub fn from_generation(params: &GenerationParams, song: &GeneratedSong) -> Self {
        Self {
            id: generate_id(),
            title: title_from_prompt(&params.prompt),
            style: params.style.clone(),
            prompt: params.prompt.clone(),
            lyrics: song.lyrics.clone(),
            audio_url: song.audio_url(),
            cover_url: song.cover.url(),
            created_at: now_millis(),
            duration: Some(song.duration()),
        }
    }

    /// File name offered when the vocals are downloaded. Path separators,
    /// reserved punctuation and control characters in the title become `_`.
    #[must_use]
    pub fn download_file_name(&self) -> String {
        format!("{}.wav", file_stem(&self.title))
    }
}

fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim();
    if stem.chars().all(|c| c == '.') {
        UNTITLED.to_string()
    } else {
        stem.to_string()
    }
}

/// The first three words of the prompt, or a fixed fallback for blank ones.
#[must_use]
pub fn title_from_prompt(prompt: &str) -> String {
    let title = prompt
        .split_whitespace()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_takes_first_three_words() {
        assert_eq!(
            title_from_prompt("neon rain over  Tokyo at midnight"),
            "neon rain over"
        );
        assert_eq!(title_from_prompt("lullaby"), "lullaby");
    }

    fn track_titled(title: &str) -> Track {
        Track {
            id: "abc1234".to_string(),
            title: title.to_string(),
            style: "Rock".to_string(),
            prompt: String::new(),
            lyrics: String::new(),
            audio_url: String::new(),
            cover_url: String::new(),
            created_at: 0,
            duration: None,
        }
    }

    #[test]
    fn download_name_replaces_path_separators() {
        let name = track_titled(&title_from_prompt("AC/DC style anthem")).download_file_name();
        assert_eq!(name, "AC_DC style anthem.wav");

        let name = track_titled(&title_from_prompt("../../tmp/owned anthem now please"))
            .download_file_name();
        assert_eq!(name, ".._.._tmp_owned anthem now.wav");
        assert!(!name.contains('/') && !name.contains('\\'));

        let name = track_titled("back\\slash\ttab").download_file_name();
        assert_eq!(name, "back_slash_tab.wav");
    }

    #[test]
    fn dot_only_titles_get_fallback_file_name() {
        assert_eq!(track_titled("..").download_file_name(), "Untitled Session.wav");
        assert_eq!(track_titled("").download_file_name(), "Untitled Session.wav");
        assert_eq!(track_titled(" . ").download_file_name(), "Untitled Session.wav");
    }

    #[test]
    fn blank_prompt_gets_fallback_title() {
        assert_eq!(title_from_prompt("   "), "Untitled Session");
    }

    #[test]
    fn ids_are_short_lowercase_base36() {
        let id = generate_id();
        assert_eq!(id.len(), 7);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn generated_cover_becomes_data_url() {
        let cover = CoverArt::Generated {
            mime_type: "image/png".to_string(),
            data: "iVBORw0KGgo=".to_string(),
        };
        assert_eq!(cover.url(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn placeholder_cover_is_square() {
        let url = CoverArt::placeholder().url();
        assert!(url.starts_with("https://picsum.photos/seed/"));
        assert!(url.ends_with("/400/400"));
    }

    #[test]
    fn voice_names_serialize_verbatim() {
        for voice in VoiceName::ALL {
            assert_eq!(
                serde_json::to_string(&voice).unwrap(),
                format!("\"{}\"", voice.as_str())
            );
        }
    }
}
