//! Pronunciation clip playback.

use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::info;

/// Decode and play a pre-recorded clip, blocking until it finishes.
pub fn play_file(path: &Path) -> Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open audio clip {:?}", path))?;
    let decoder = Decoder::new(BufReader::new(file))
        .with_context(|| format!("unsupported audio format in {:?}", path))?;
    let (_stream, handle) =
        OutputStream::try_default().context("failed to open audio output stream")?;
    let sink = Sink::try_new(&handle).context("failed to create audio sink")?;
    info!(path = ?path, "playing pronunciation clip");
    sink.append(decoder.convert_samples::<f32>());
    sink.set_volume(1.0);
    sink.sleep_until_end();
    Ok(())
}
