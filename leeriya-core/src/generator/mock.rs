use std::time::Duration;

use async_trait::async_trait;
use leeriya_types::room_state::PlaybackState;
use leeriya_types::{MusicConfig, RoomState};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::synth::{prompt_bias, render_pcm16_stereo, FRAME_MS};
use super::{AudioChunkCallback, GeneratorSession};

struct Inner {
    config: MusicConfig,
    prompt_weights: Vec<f64>,
    playing: bool,
    phase: f64,
    running: bool,
}

impl Default for Inner {
    fn default() -> Self {
        Inner {
            config: MusicConfig::default(),
            prompt_weights: Vec::new(),
            playing: false,
            phase: 0.0,
            running: false,
        }
    }
}

/// Deterministic additive synthesizer used in dev/tests and as the remote
/// adapter's fallback. Emits one frame roughly every 20ms while playing,
/// via a best-effort `tokio::time::interval` rather than a busy-wait.
pub struct MockGeneratorSession {
    inner: std::sync::Arc<Mutex<Inner>>,
    on_audio_chunk: AudioChunkCallback,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl MockGeneratorSession {
    pub fn new(on_audio_chunk: AudioChunkCallback) -> Self {
        MockGeneratorSession {
            inner: std::sync::Arc::new(Mutex::new(Inner::default())),
            on_audio_chunk,
            task: Mutex::new(None),
        }
    }
}

#[async_trait]
impl GeneratorSession for MockGeneratorSession {
    async fn start(&self) {
        let mut task_guard = self.task.lock().await;
        if task_guard.is_some() {
            return;
        }
        {
            let mut inner = self.inner.lock().await;
            inner.running = true;
        }
        let inner = self.inner.clone();
        let callback = self.on_audio_chunk.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(FRAME_MS as u64));
            loop {
                interval.tick().await;
                let chunk = {
                    let mut guard = inner.lock().await;
                    if !guard.running {
                        break;
                    }
                    if !guard.playing {
                        None
                    } else {
                        let bias = prompt_bias(&guard.prompt_weights);
                        let phase = &mut guard.phase;
                        let config = guard.config.clone();
                        Some(render_pcm16_stereo(&config, bias, phase))
                    }
                };
                if let Some(chunk) = chunk {
                    callback(chunk);
                }
            }
        });
        *task_guard = Some(handle);
    }

    async fn close(&self) {
        {
            let mut inner = self.inner.lock().await;
            inner.running = false;
        }
        let handle = self.task.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    async fn apply_state(&self, state: &RoomState) {
        let mut inner = self.inner.lock().await;
        inner.config = state.music_config.clone();
        inner.prompt_weights = state.prompts.iter().map(|p| p.weight).collect();
        inner.playing = matches!(state.playback_state, PlaybackState::Playing);
        if matches!(state.playback_state, PlaybackState::Stopped) {
            inner.phase = 0.0;
        }
    }

    async fn play(&self) {
        self.inner.lock().await.playing = true;
    }

    async fn pause(&self) {
        self.inner.lock().await.playing = false;
    }

    async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        inner.playing = false;
        inner.phase = 0.0;
    }

    async fn reset_context(&self) {
        self.inner.lock().await.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_callback() -> (AudioChunkCallback, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counted = count.clone();
        let cb: AudioChunkCallback = Arc::new(move |chunk| {
            assert_eq!(chunk.len(), super::super::FRAME_BYTES);
            counted.fetch_add(1, Ordering::SeqCst);
        });
        (cb, count)
    }

    #[tokio::test(start_paused = true)]
    async fn emits_frames_only_while_playing() {
        let (cb, count) = counting_callback();
        let session = MockGeneratorSession::new(cb);
        session.start().await;
        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0, "not playing yet, no frames");

        session.play().await;
        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(count.load(Ordering::SeqCst) >= 4);

        session.close().await;
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let (cb, _count) = counting_callback();
        let session = MockGeneratorSession::new(cb);
        session.start().await;
        session.start().await;
        session.close().await;
        session.close().await;
    }

    #[tokio::test]
    async fn stop_resets_phase_pause_does_not() {
        let (cb, _count) = counting_callback();
        let session = MockGeneratorSession::new(cb);
        session.play().await;
        {
            let mut inner = session.inner.lock().await;
            inner.phase = 500.0;
        }
        session.pause().await;
        assert_eq!(session.inner.lock().await.phase, 500.0);
        session.stop().await;
        assert_eq!(session.inner.lock().await.phase, 0.0);
    }
}
