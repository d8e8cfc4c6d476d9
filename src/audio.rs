//! rodio-backed playback element
//!
//! The output stream is not `Send`, so it lives on its own thread for the
//! whole process and only its handle is shared. A ticker task reports the
//! sink position while playing and notices when the sink drains.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{PlayerError, PlayerResult};
use crate::player::{Blob, MediaElement, MediaEvent, ObjectUrl, TrackId};

pub const DEFAULT_VOLUME: f32 = 1.0;

struct BoundSource {
    url: ObjectUrl,
    blob: Blob,
    duration: Option<Duration>,
    sink: Option<Arc<Sink>>,
    playing: Arc<AtomicBool>,
    ticker: Option<JoinHandle<()>>,
}

pub struct RodioElement {
    output: Option<OutputStreamHandle>,
    events: mpsc::UnboundedSender<MediaEvent>,
    tick_interval: Duration,
    source: Option<BoundSource>,
    tracks: Vec<TrackId>,
}

impl RodioElement {
    pub fn new(events: mpsc::UnboundedSender<MediaEvent>, tick_interval: Duration) -> Self {
        let output = open_output();
        if output.is_none() {
            tracing::warn!("No audio output device, playback requests will be rejected");
        }
        Self {
            output,
            events,
            tick_interval,
            source: None,
            tracks: Vec::new(),
        }
    }

    fn decode(blob: &Blob) -> PlayerResult<Decoder<Cursor<bytes::Bytes>>> {
        Decoder::new(Cursor::new(blob.bytes.clone()))
            .map_err(|e| PlayerError::Media(format!("cannot decode {}: {}", blob.mime_type, e)))
    }

    /// Build a paused sink over the bound blob, starting at the beginning.
    fn build_sink(&mut self) -> PlayerResult<Arc<Sink>> {
        let output = self
            .output
            .as_ref()
            .ok_or_else(|| PlayerError::PlaybackRejected("no audio output device".to_string()))?;
        let source = self
            .source
            .as_mut()
            .ok_or_else(|| PlayerError::PlaybackRejected("no source bound".to_string()))?;

        let decoder = Self::decode(&source.blob)?;
        let sink = Sink::try_new(output).map_err(|e| PlayerError::PlaybackRejected(e.to_string()))?;
        sink.pause();
        sink.set_volume(DEFAULT_VOLUME);
        sink.append(decoder);

        let sink = Arc::new(sink);
        if let Some(old) = source.sink.replace(sink.clone()) {
            old.stop();
        }
        if let Some(ticker) = source.ticker.take() {
            ticker.abort();
        }
        source.ticker = Some(spawn_ticker(
            source.url.clone(),
            source.duration,
            sink.clone(),
            source.playing.clone(),
            self.events.clone(),
            self.tick_interval,
        ));
        Ok(sink)
    }

    /// The current sink, rebuilt if it has drained.
    fn live_sink(&mut self) -> PlayerResult<Arc<Sink>> {
        match self.source.as_ref().and_then(|s| s.sink.clone()) {
            Some(sink) if !sink.empty() => Ok(sink),
            _ => self.build_sink(),
        }
    }
}

#[async_trait]
impl MediaElement for RodioElement {
    fn load(&mut self, source: &ObjectUrl, blob: Blob) -> PlayerResult<()> {
        self.unload();

        let decoder = Self::decode(&blob)?;
        let duration = decoder.total_duration();
        drop(decoder);

        self.source = Some(BoundSource {
            url: source.clone(),
            blob,
            duration,
            sink: None,
            playing: Arc::new(AtomicBool::new(false)),
            ticker: None,
        });

        if self.output.is_some() {
            if let Err(e) = self.build_sink() {
                tracing::error!(url = %source, error = %e, "Could not prepare audio sink");
                let _ = self.events.send(MediaEvent::Error {
                    source: source.clone(),
                    message: e.to_string(),
                });
            }
        }

        tracing::debug!(url = %source, ?duration, "Source loaded");
        let _ = self.events.send(MediaEvent::LoadedMetadata {
            source: source.clone(),
            duration: duration.map(|d| d.as_secs_f64()).unwrap_or(f64::NAN),
        });
        Ok(())
    }

    fn unload(&mut self) {
        if let Some(source) = self.source.take() {
            source.playing.store(false, Ordering::SeqCst);
            if let Some(ticker) = source.ticker {
                ticker.abort();
            }
            if let Some(sink) = source.sink {
                sink.stop();
            }
            tracing::debug!(url = %source.url, "Source unloaded");
        }
    }

    async fn play(&mut self) -> PlayerResult<()> {
        let sink = self.live_sink()?;
        sink.play();
        if let Some(source) = self.source.as_ref() {
            source.playing.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(source) = self.source.as_ref() {
            source.playing.store(false, Ordering::SeqCst);
            if let Some(sink) = source.sink.as_ref() {
                sink.pause();
            }
        }
    }

    fn set_current_time(&mut self, position: f64) {
        let sink = match self.live_sink() {
            Ok(sink) => sink,
            Err(e) => {
                tracing::warn!(error = %e, "Seek without a usable sink");
                return;
            }
        };
        if let Err(e) = sink.try_seek(Duration::from_secs_f64(position.max(0.0))) {
            tracing::warn!(error = %e, position, "Seek failed");
        }
    }

    fn add_text_track(&mut self, track: TrackId) {
        self.tracks.push(track);
    }

    fn remove_text_track(&mut self, track: TrackId) {
        self.tracks.retain(|t| *t != track);
    }

    fn has_text_track(&self, track: TrackId) -> bool {
        // Cues are rendered by the controller; a track counts as wired once
        // there is a source to time it against.
        self.source.is_some() && self.tracks.contains(&track)
    }
}

impl Drop for RodioElement {
    fn drop(&mut self) {
        self.unload();
    }
}

fn spawn_ticker(
    url: ObjectUrl,
    duration: Option<Duration>,
    sink: Arc<Sink>,
    playing: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<MediaEvent>,
    interval: Duration,
) -> JoinHandle<()> {
    let duration = duration.map(|d| d.as_secs_f64()).unwrap_or(f64::NAN);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if !playing.load(Ordering::SeqCst) {
                continue;
            }

            let event = if sink.empty() {
                playing.store(false, Ordering::SeqCst);
                MediaEvent::Ended { source: url.clone() }
            } else {
                MediaEvent::TimeUpdate {
                    source: url.clone(),
                    position: sink.get_pos().as_secs_f64(),
                    duration,
                }
            };

            if events.send(event).is_err() {
                break;
            }
        }
    })
}

/// Open the default output device on a dedicated thread that keeps the
/// stream alive for the rest of the process.
fn open_output() -> Option<OutputStreamHandle> {
    let (tx, rx) = std::sync::mpsc::channel();
    let spawned = std::thread::Builder::new()
        .name("audio-output".to_string())
        .spawn(move || match OutputStream::try_default() {
            Ok((stream, handle)) => {
                let _ = tx.send(Some(handle));
                let _stream = stream;
                loop {
                    std::thread::park();
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to open audio output");
                let _ = tx.send(None);
            }
        });

    if let Err(e) = spawned {
        tracing::error!(error = %e, "Failed to spawn audio output thread");
        return None;
    }
    rx.recv().ok().flatten()
}
