//! One-shot microphone capture.
//!
//! Records a fixed-duration utterance from the default (or named) input
//! device at whatever rate the device offers, mixes to mono, and resamples
//! to the requested output rate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, ensure, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, SampleFormat, Stream, StreamConfig};
use tracing::{debug, error, info};

const CHANNEL_CAPACITY: usize = 64;
const RECV_TIMEOUT_MS: u64 = 50;

#[derive(Clone, Debug)]
pub struct CaptureSettings {
    pub device_name: Option<String>,
    /// Output sample rate after resampling.
    pub sample_rate: u32,
    pub duration: Duration,
}

/// Record one utterance and return mono f32 samples at
/// `settings.sample_rate`.
pub fn record_utterance(settings: &CaptureSettings) -> Result<Vec<f32>> {
    let device = select_device(settings.device_name.as_deref())?;
    info!(
        device = ?device.name().ok(),
        seconds = settings.duration.as_secs_f32(),
        "starting utterance capture"
    );

    let supported = device
        .default_input_config()
        .context("failed to query default input config")?;
    let stream_config = StreamConfig {
        channels: supported.channels(),
        sample_rate: supported.sample_rate(),
        buffer_size: BufferSize::Default,
    };
    let native_rate = stream_config.sample_rate.0;

    let (sender, receiver) = mpsc::sync_channel::<Vec<f32>>(CHANNEL_CAPACITY);
    let done = Arc::new(AtomicBool::new(false));
    let stream = build_stream(
        &device,
        &stream_config,
        supported.sample_format(),
        sender,
        done.clone(),
    )?;
    stream.play().context("failed to start capture stream")?;

    let frames_needed = (settings.duration.as_secs_f64() * native_rate as f64).ceil() as usize;
    let native = collect_frames(&receiver, frames_needed);
    done.store(true, Ordering::SeqCst);
    stream.pause().ok();
    drop(stream);

    debug!(
        native_rate,
        captured = native.len(),
        "capture finished; resampling"
    );
    resample_linear(&native, native_rate, settings.sample_rate)
}

fn select_device(name: Option<&str>) -> Result<Device> {
    let host = cpal::default_host();
    if let Some(wanted) = name {
        for device in host
            .input_devices()
            .context("listing input devices failed")?
        {
            if device.name().map(|n| n == wanted).unwrap_or(false) {
                return Ok(device);
            }
        }
        bail!("input device '{}' not found", wanted);
    }
    host.default_input_device()
        .context("no default input device available")
}

fn build_stream(
    device: &Device,
    config: &StreamConfig,
    format: SampleFormat,
    sender: SyncSender<Vec<f32>>,
    done: Arc<AtomicBool>,
) -> Result<Stream> {
    let channels = config.channels as usize;
    let err_fn = |err| error!(error = %err, "audio input stream error");
    match format {
        SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _| forward_frames(data.iter().copied(), channels, &sender, &done),
            err_fn,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _| {
                let scaled = data.iter().map(|&s| s as f32 / i16::MAX as f32);
                forward_frames(scaled, channels, &sender, &done)
            },
            err_fn,
            None,
        ),
        SampleFormat::U16 => device.build_input_stream(
            config,
            move |data: &[u16], _| {
                let scaled = data.iter().map(|&s| (s as f32 / u16::MAX as f32) * 2.0 - 1.0);
                forward_frames(scaled, channels, &sender, &done)
            },
            err_fn,
            None,
        ),
        other => return Err(anyhow!("unsupported input sample format {:?}", other)),
    }
    .map_err(|err| anyhow!(err))
    .context("failed to build input stream")
}

fn forward_frames<I>(samples: I, channels: usize, sender: &SyncSender<Vec<f32>>, done: &AtomicBool)
where
    I: Iterator<Item = f32>,
{
    if done.load(Ordering::Relaxed) || channels == 0 {
        return;
    }
    let interleaved: Vec<f32> = samples.collect();
    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(mix_to_mono)
        .collect();
    let _ = sender.try_send(mono);
}

fn collect_frames(receiver: &Receiver<Vec<f32>>, frames_needed: usize) -> Vec<f32> {
    let mut collected = Vec::with_capacity(frames_needed);
    while collected.len() < frames_needed {
        match receiver.recv_timeout(Duration::from_millis(RECV_TIMEOUT_MS)) {
            Ok(chunk) => {
                let remaining = frames_needed - collected.len();
                collected.extend(chunk.into_iter().take(remaining));
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    collected
}

fn mix_to_mono(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    frame.iter().sum::<f32>() / frame.len() as f32
}

/// Linear-interpolation resampler; identity when the rates already match.
fn resample_linear(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    ensure!(source_rate > 0, "source sample rate must be positive");
    ensure!(target_rate > 0, "target sample rate must be positive");
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = ((samples.len() as f64) * ratio).ceil().max(1.0) as usize;
    let last = samples.len() - 1;
    let mut output = Vec::with_capacity(output_len);
    for index in 0..output_len {
        let position = index as f64 / ratio;
        let left = position.floor() as usize;
        let right = (left + 1).min(last);
        let frac = (position - left as f64) as f32;
        output.push(samples[left] * (1.0 - frac) + samples[right] * frac);
    }
    Ok(output)
}
