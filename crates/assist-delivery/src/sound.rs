//! Alert tone playback.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use assist_core::config::delivery::DeliveryConfig;
use assist_core::{AppError, AppResult};

/// Plays the alert tone. Implementations must restart playback from the
/// beginning when triggered while a tone is already sounding — overlapping
/// triggers restart rather than queue or layer.
pub trait AlertSound: Send + Sync + std::fmt::Debug {
    /// Trigger the tone at the given gain (0.0 to 1.0).
    fn play(&self, gain: f32);
}

/// Command sent to the audio thread.
#[derive(Debug)]
struct ToneCommand {
    gain: f32,
}

/// Oscillator state shared with the output callback.
#[derive(Debug)]
struct ToneState {
    phase: f32,
    remaining: usize,
    gain: f32,
}

/// Synthesized alert tone on the default output device.
///
/// The audio device is a single shared handle owned by a dedicated thread;
/// triggers are forwarded over a channel and reset the oscillator, which
/// gives the restart-not-layer semantics for free. Playback faults (no
/// device, unsupported format) are logged once and swallowed — a broken
/// audio setup never blocks notification delivery.
#[derive(Debug)]
pub struct TonePlayer {
    tx: mpsc::UnboundedSender<ToneCommand>,
}

impl TonePlayer {
    /// Spawn the audio thread and return the trigger handle.
    pub fn new(config: &DeliveryConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let frequency = config.tone_frequency_hz;
        let duration = Duration::from_millis(config.tone_duration_ms);

        let spawned = std::thread::Builder::new()
            .name("assist-audio".to_string())
            .spawn(move || audio_thread(rx, frequency, duration));
        if let Err(e) = spawned {
            warn!("Failed to spawn audio thread: {e}");
        }

        Self { tx }
    }
}

impl AlertSound for TonePlayer {
    fn play(&self, gain: f32) {
        let command = ToneCommand {
            gain: gain.clamp(0.0, 1.0),
        };
        if self.tx.send(command).is_err() {
            debug!("Audio thread is gone; dropping tone trigger");
        }
    }
}

/// Owns the output stream for the lifetime of the player and applies
/// trigger commands to the shared oscillator state.
fn audio_thread(
    mut rx: mpsc::UnboundedReceiver<ToneCommand>,
    frequency: f32,
    duration: Duration,
) {
    let state = Arc::new(Mutex::new(ToneState {
        phase: 0.0,
        remaining: 0,
        gain: 0.0,
    }));

    let built = build_stream(&state, frequency);
    let sample_rate = match &built {
        Ok((_, rate)) => *rate,
        Err(e) => {
            warn!("Audio output unavailable: {e}");
            0
        }
    };
    // Keep the stream alive while commands arrive; silence plays between
    // triggers.
    let _stream = built.ok();

    while let Some(command) = rx.blocking_recv() {
        if sample_rate == 0 {
            continue;
        }
        let mut tone = state.lock().unwrap_or_else(|e| e.into_inner());
        tone.gain = command.gain;
        tone.remaining = (duration.as_secs_f32() * sample_rate as f32) as usize;
        // Restart from the beginning.
        tone.phase = 0.0;
    }
}

fn build_stream(
    state: &Arc<Mutex<ToneState>>,
    frequency: f32,
) -> AppResult<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| AppError::internal("No default audio output device"))?;
    let config = device
        .default_output_config()
        .map_err(|e| AppError::internal(format!("No default output config: {e}")))?;

    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(AppError::internal(format!(
            "Unsupported sample format: {:?}",
            config.sample_format()
        )));
    }

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    let callback_state = Arc::clone(state);

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                let mut tone = callback_state.lock().unwrap_or_else(|e| e.into_inner());
                for frame in data.chunks_mut(channels) {
                    let sample = if tone.remaining > 0 {
                        tone.remaining -= 1;
                        let value = (tone.phase * std::f32::consts::TAU).sin() * tone.gain;
                        tone.phase = (tone.phase + frequency / sample_rate as f32).fract();
                        value
                    } else {
                        0.0
                    };
                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                }
            },
            |e| warn!("Audio stream error: {e}"),
            None,
        )
        .map_err(|e| AppError::internal(format!("Failed to build audio stream: {e}")))?;

    stream
        .play()
        .map_err(|e| AppError::internal(format!("Failed to start audio stream: {e}")))?;

    Ok((stream, sample_rate))
}
