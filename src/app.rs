//! Wires configuration, decode batch and playback together for the CLI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::decode::{
    BatchDecodeCoordinator, BatchResult, ByteSource, DecoderEngineAdapter, EngineFactory,
    FileSource, SlotInput,
};
use crate::playback::{create_sink, PlaybackBufferRegistry, PlaybackEngine};
use crate::slot::SlotId;

/// Split `SLOT=PATH` arguments into slot assignments.
///
/// A single bare `PATH` goes to the implicit `single` slot.
pub fn parse_assignments(args: &[String]) -> Result<Vec<(SlotId, PathBuf)>> {
    let mut assignments = Vec::new();
    let mut bare = 0;

    for arg in args {
        match arg.split_once('=') {
            Some((slot, path)) if !slot.is_empty() => {
                let slot: SlotId = slot.parse()?;
                if path.is_empty() {
                    anyhow::bail!("missing path for slot {}", slot);
                }
                assignments.push((slot, PathBuf::from(path)));
            }
            _ => {
                bare += 1;
                if bare > 1 {
                    anyhow::bail!("only one file may be given without a slot name (use SLOT=PATH)");
                }
                assignments.push((SlotId::Single, PathBuf::from(arg)));
            }
        }
    }
    Ok(assignments)
}

/// One entry per drum slot (unassigned ones are empty), plus `single` if used.
pub fn slot_inputs(assignments: Vec<(SlotId, PathBuf)>) -> Vec<SlotInput> {
    let mut inputs: Vec<SlotInput> = SlotId::DRUMS.iter().map(|slot| (*slot, None)).collect();
    for (slot, path) in assignments {
        let source = Some(Box::new(FileSource::new(path)) as Box<dyn ByteSource>);
        match inputs.iter_mut().find(|(s, _)| *s == slot) {
            Some(entry) => entry.1 = source,
            None => inputs.push((slot, source)),
        }
    }
    inputs
}

pub struct App {
    config: Config,
    registry: Arc<PlaybackBufferRegistry>,
    coordinator: BatchDecodeCoordinator,
}

impl App {
    pub fn new(config: Config, factory: EngineFactory) -> Self {
        let registry = Arc::new(PlaybackBufferRegistry::new());
        let adapter = Arc::new(DecoderEngineAdapter::new(factory, config.convention));
        let coordinator =
            BatchDecodeCoordinator::new(adapter, registry.clone()).with_parallel(config.parallel);
        Self {
            config,
            registry,
            coordinator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<PlaybackBufferRegistry> {
        &self.registry
    }

    pub async fn decode_all(&self, inputs: Vec<SlotInput>) -> BatchResult {
        self.coordinator.run(inputs).await
    }

    /// Playback engine over this session's registry and the configured sink.
    pub fn player(&self) -> Result<PlaybackEngine> {
        let sink = create_sink(&self.config)?;
        Ok(PlaybackEngine::new(self.registry.clone(), sink))
    }

    /// Drop all registered buffers.
    pub async fn shutdown(&self) {
        self.registry.clear().await;
        log::info!("Session closed, all slots unregistered");
    }
}
