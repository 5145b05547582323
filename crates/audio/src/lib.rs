//! Background music.
//!
//! The track is opened and decoded before any output device is touched, so a
//! missing or corrupt asset fails fast with a precise error.
//!
//! # Invariants
//! - Playback state lives in [`BackgroundMusic`]; dropping it stops the sound
//!   and releases the device.
//! - Nothing here depends on game state.

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tilehop_common::AudioConfig;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("cannot open audio track {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot decode audio track {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
    #[error("no audio output device: {0}")]
    Device(#[from] rodio::StreamError),
    #[error("playback failed: {0}")]
    Playback(#[from] rodio::PlayError),
}

/// Format details of a decodable track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub duration: Option<Duration>,
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Open and decode `path` without playing it.
pub fn probe_track(path: impl AsRef<Path>) -> Result<TrackInfo, AudioError> {
    let source = decode(path.as_ref())?;
    Ok(TrackInfo {
        channels: source.channels(),
        sample_rate: source.sample_rate(),
        duration: source.total_duration(),
    })
}

/// The background track, playing on the default output device.
pub struct BackgroundMusic {
    // The stream must outlive the sink.
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
    track: PathBuf,
}

impl BackgroundMusic {
    /// Decode the configured track, open the default device and start playing.
    pub fn play(config: &AudioConfig) -> Result<Self, AudioError> {
        let source = decode(&config.track)?;
        let info = TrackInfo {
            channels: source.channels(),
            sample_rate: source.sample_rate(),
            duration: source.total_duration(),
        };

        let (stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;
        sink.set_volume(config.volume);
        if config.looped {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }

        tracing::info!(
            track = %config.track.display(),
            channels = info.channels,
            sample_rate = info.sample_rate,
            looped = config.looped,
            "background music started"
        );

        Ok(Self {
            _stream: stream,
            _handle: handle,
            sink,
            track: config.track.clone(),
        })
    }

    pub fn track(&self) -> &Path {
        &self.track
    }

    pub fn volume(&self) -> f32 {
        self.sink.volume()
    }

    pub fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume.max(0.0));
    }

    pub fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

impl Drop for BackgroundMusic {
    fn drop(&mut self) {
        self.sink.stop();
        tracing::debug!(track = %self.track.display(), "background music stopped");
    }
}
