// Usage: cargo run --example generate-song -- "<prompt>" [style] [voice]
use dotenvy::dotenv;
use songsmith_studio::{
    google::GoogleModelOptions, GenerationParams, Studio, StudioOptions, Track, VoiceName,
};
use std::fs::File;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let prompt = args
        .next()
        .unwrap_or_else(|| "a quiet walk through a rainy city at night".to_string());
    let style = args.next().unwrap_or_else(|| "Chill Lofi".to_string());
    let voice = args
        .next()
        .and_then(|name| {
            VoiceName::ALL
                .into_iter()
                .find(|voice| voice.as_str().eq_ignore_ascii_case(&name))
        })
        .unwrap_or_default();

    let studio = Studio::google(
        GoogleModelOptions {
            api_key: std::env::var("GOOGLE_API_KEY")
                .expect("GOOGLE_API_KEY environment variable must be set"),
            ..Default::default()
        },
        StudioOptions::from_env().expect("invalid SONGSMITH_* configuration"),
    );

    let params = GenerationParams {
        prompt,
        style,
        voice,
    };
    let song = studio
        .generate_song(&params)
        .await
        .expect("song generation failed");
    let track = Track::from_generation(&params, &song);

    println!("{}\n", song.lyrics);
    println!("cover: {}", if song.cover.is_generated() { "generated" } else { "placeholder" });
    println!("duration: {:.2}s", song.duration());

    let path = track.download_file_name();
    let file = File::create(&path).expect("failed to create output file");
    song.audio
        .container
        .write_to(file)
        .expect("failed to write wav file");
    println!("wrote {path}");
}
