use activpik::Client;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    // Example program that calls the library API.
    // Configure credentials via env vars or a `.activpikrc` file.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let file: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: upload_and_transcribe <media file>")?;

    let client = Client::from_env()?;

    let media = client.add_media(&file, "Demo upload", "Uploaded by the activpik demo")?;
    let media_id = media["id"].as_u64().context("media record has no numeric id")?;
    println!("media {} created", media_id);

    let job = client.transcribe_media(media_id)?;
    let job_id = job["id"].as_u64().context("transcription record has no numeric id")?;

    // Transcriptions leave the CR (created) state once the backend picks them up.
    loop {
        let status = client.get_transcription_status(job_id)?;
        let state = status["state"].as_str().unwrap_or("?");
        println!("transcription {}: {}", job_id, state);
        if state != "CR" {
            break;
        }
        thread::sleep(Duration::from_secs(10));
    }

    let entities = client.get_timecoded_named_entities_for_media(media_id)?;
    println!("{}", serde_json::to_string_pretty(&entities)?);
    Ok(())
}
