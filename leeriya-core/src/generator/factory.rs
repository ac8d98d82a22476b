use std::sync::Arc;

use super::mock::MockGeneratorSession;
use super::remote::{RemoteGeneratorSession, RemoteSessionConfig};
use super::{AudioChunkCallback, GeneratorSession};

/// Chooses the mock or remote variant behind a single [`GeneratorSession`]
/// handle based on configuration: the generator is unconditionally the mock
/// if `use_mock` is set or no API key is configured.
pub fn create_generator_session(
    use_mock: bool,
    remote: Option<RemoteSessionConfig>,
    on_audio_chunk: AudioChunkCallback,
) -> Arc<dyn GeneratorSession> {
    match (use_mock, remote) {
        (false, Some(remote_config)) if remote_config.api_key.is_some() => {
            Arc::new(RemoteGeneratorSession::new(remote_config, on_audio_chunk))
        }
        _ => Arc::new(MockGeneratorSession::new(on_audio_chunk)),
    }
}
