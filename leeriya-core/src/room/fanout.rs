use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::Inner;

/// Forwards generator-produced audio chunks to every registered audio
/// subscriber, outside the room lock except for the brief snapshot/evict
/// critical sections. No per-subscriber queue: a subscriber that can't keep
/// up simply has its send fail and is dropped.
pub(super) fn spawn(inner: Arc<Mutex<Inner>>, mut chunks: UnboundedReceiver<Vec<u8>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(chunk) = chunks.recv().await {
            let subs: Vec<(u64, super::AudioSender)> = {
                let guard = inner.lock().await;
                guard.audio_sockets.iter().map(|(id, s)| (*id, s.clone())).collect()
            };

            let mut stale = Vec::new();
            for (id, sender) in subs {
                if sender.send(chunk.clone()).is_err() {
                    stale.push(id);
                }
            }

            if !stale.is_empty() {
                let mut guard = inner.lock().await;
                for id in stale {
                    guard.audio_sockets.remove(&id);
                }
            }
        }
    })
}
