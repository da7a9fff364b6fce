//! Batch decode: per-slot isolation, registry publication, input policy.

mod common;

use std::sync::Arc;

use bytes::Bytes;

use common::{adapter, drum_hit, xa_bytes, PanickingEngine};
use xa_preview::decode::{
    factory, BatchDecodeCoordinator, ByteSource, CallingConvention, DecodeErrorKind,
    DecodeOutcome, DecoderEngineAdapter, FileSource, TrackDecodeSession,
};
use xa_preview::playback::PlaybackBufferRegistry;
use xa_preview::SlotId;

fn coordinator(
    convention: CallingConvention,
) -> (BatchDecodeCoordinator, Arc<PlaybackBufferRegistry>) {
    let registry = Arc::new(PlaybackBufferRegistry::new());
    let coordinator = BatchDecodeCoordinator::new(adapter(convention), registry.clone());
    (coordinator, registry)
}

fn kind(outcome: &DecodeOutcome) -> Option<DecodeErrorKind> {
    outcome.error().map(|e| e.kind())
}

#[tokio::test]
async fn valid_buffer_normalizes_to_same_length_in_range() {
    let pcm = drum_hit(4096);
    let outcome = TrackDecodeSession::new(SlotId::Single, adapter(CallingConvention::HeaderFirst))
        .run(xa_bytes(8000, 1, &pcm))
        .await;

    let decoded = outcome.decoded().expect("decode should succeed");
    assert_eq!(decoded.track.samples, pcm);
    assert_eq!(decoded.buffer.len(), pcm.len());
    assert_eq!(decoded.buffer.sample_rate, 8000);
    assert!(decoded.buffer.samples.iter().all(|s| (-1.0..1.0).contains(s)));
}

#[tokio::test]
async fn malformed_buffers_fail_without_partial_track() {
    let valid = xa_bytes(8000, 1, &drum_hit(256));
    let truncated_payload = valid.slice(..valid.len() - 10);
    let truncated_header = valid.slice(..7);
    let mut bad_magic = valid.to_vec();
    bad_magic[0] = 0;

    for convention in [CallingConvention::HeaderFirst, CallingConvention::DecodeThenQuery] {
        let (coordinator, registry) = coordinator(convention);
        let results = coordinator
            .run_bytes([
                (SlotId::Bass, Some(truncated_payload.clone())),
                (SlotId::HighTom, Some(truncated_header.clone())),
                (SlotId::MidTom, Some(Bytes::from(bad_magic.clone()))),
            ])
            .await;

        assert_eq!(kind(&results[&SlotId::Bass]), Some(DecodeErrorKind::Decode));
        assert_eq!(kind(&results[&SlotId::HighTom]), Some(DecodeErrorKind::Header));
        assert_eq!(kind(&results[&SlotId::MidTom]), Some(DecodeErrorKind::Header));
        assert!(registry.slots().await.is_empty());
    }
}

#[tokio::test]
async fn unsupported_channel_count_is_header_error() {
    for convention in [CallingConvention::HeaderFirst, CallingConvention::DecodeThenQuery] {
        let (coordinator, registry) = coordinator(convention);
        let results = coordinator
            .run_bytes([(SlotId::HiHat, Some(xa_bytes(8000, 3, &drum_hit(64))))])
            .await;

        let error = results[&SlotId::HiHat].error().unwrap();
        assert_eq!(error.kind(), DecodeErrorKind::Header);
        assert!(error.message().contains("Invalid number of channels: 3"));
        assert!(registry.lookup(SlotId::HiHat).await.is_none());
    }
}

#[tokio::test]
async fn same_bytes_give_same_outcome() {
    let (coordinator, _) = coordinator(CallingConvention::HeaderFirst);
    let bytes = xa_bytes(22050, 1, &drum_hit(512));

    let first = coordinator.run_bytes([(SlotId::LowTom, Some(bytes.clone()))]).await;
    let second = coordinator.run_bytes([(SlotId::LowTom, Some(bytes))]).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn corrupt_slot_does_not_affect_valid_slot() {
    let (coordinator, registry) = coordinator(CallingConvention::HeaderFirst);
    let good = xa_bytes(8000, 1, &drum_hit(1000));
    let corrupt = Bytes::from_static(b"not an xa file at all");

    let alone = coordinator.run_bytes([(SlotId::Bass, Some(good.clone()))]).await;
    let mixed = coordinator
        .run_bytes([(SlotId::Bass, Some(good)), (SlotId::HiHat, Some(corrupt))])
        .await;

    assert_eq!(mixed.len(), 2);
    assert_eq!(mixed[&SlotId::Bass], alone[&SlotId::Bass]);
    assert!(mixed[&SlotId::Bass].is_success());
    assert_eq!(kind(&mixed[&SlotId::HiHat]), Some(DecodeErrorKind::Header));
    assert_eq!(registry.slots().await, vec![SlotId::Bass]);
}

#[tokio::test]
async fn absent_input_is_skipped_but_empty_input_is_a_header_error() {
    let (coordinator, registry) = coordinator(CallingConvention::HeaderFirst);
    let results = coordinator
        .run_bytes([
            (SlotId::Bass, Some(xa_bytes(8000, 1, &drum_hit(800)))),
            (SlotId::HighTom, Some(Bytes::new())),
            (SlotId::MidTom, None),
        ])
        .await;

    assert_eq!(results.keys().copied().collect::<Vec<_>>(), vec![SlotId::Bass, SlotId::HighTom]);

    let bass = results[&SlotId::Bass].decoded().unwrap();
    assert_eq!(bass.track.format.sample_rate, 8000);
    assert_eq!(bass.track.format.channels, 1);
    assert_eq!(kind(&results[&SlotId::HighTom]), Some(DecodeErrorKind::Header));

    assert!(registry.lookup(SlotId::Bass).await.is_some());
    assert!(registry.lookup(SlotId::HighTom).await.is_none());
    assert!(registry.lookup(SlotId::MidTom).await.is_none());
}

#[tokio::test]
async fn later_success_replaces_and_later_failure_clears() {
    let (coordinator, registry) = coordinator(CallingConvention::DecodeThenQuery);

    coordinator.run_bytes([(SlotId::Bass, Some(xa_bytes(8000, 1, &[16384; 8])))]).await;
    coordinator.run_bytes([(SlotId::Bass, Some(xa_bytes(11025, 1, &[-32768; 4])))]).await;
    let current = registry.lookup(SlotId::Bass).await.unwrap();
    assert_eq!(current.sample_rate, 11025);
    assert_eq!(current.samples, vec![-1.0; 4]);

    coordinator.run_bytes([(SlotId::Bass, Some(Bytes::from_static(b"junk")))]).await;
    assert!(registry.lookup(SlotId::Bass).await.is_none());
}

#[tokio::test]
async fn batch_without_buffer_for_slot_leaves_its_entry() {
    let (coordinator, registry) = coordinator(CallingConvention::HeaderFirst);
    coordinator.run_bytes([(SlotId::HiHat, Some(xa_bytes(8000, 1, &[1, 2, 3])))]).await;

    let results = coordinator.run_bytes([(SlotId::HiHat, None)]).await;
    assert!(results.is_empty());
    assert!(registry.lookup(SlotId::HiHat).await.is_some());
}

#[tokio::test]
async fn engine_panic_is_contained_in_its_slot() {
    let registry = Arc::new(PlaybackBufferRegistry::new());
    let panicking = Arc::new(DecoderEngineAdapter::new(
        factory(|| PanickingEngine),
        CallingConvention::HeaderFirst,
    ));
    let coordinator = BatchDecodeCoordinator::new(panicking, registry.clone());

    let results = coordinator
        .run_bytes([(SlotId::Bass, Some(xa_bytes(8000, 1, &[0; 32])))])
        .await;

    let error = results[&SlotId::Bass].error().unwrap();
    assert_eq!(error.kind(), DecodeErrorKind::Decode);
    assert!(error.message().contains("Invalid factor: 7"));
    assert!(registry.lookup(SlotId::Bass).await.is_none());
}

#[tokio::test]
async fn sequential_and_parallel_agree() {
    let inputs = || {
        [
            (SlotId::Bass, Some(xa_bytes(8000, 1, &drum_hit(300)))),
            (SlotId::MidTom, Some(Bytes::from_static(b"KWD"))),
            (SlotId::HiHat, Some(xa_bytes(44100, 2, &drum_hit(600)))),
        ]
    };

    let (parallel, _) = coordinator(CallingConvention::HeaderFirst);
    let registry = Arc::new(PlaybackBufferRegistry::new());
    let sequential = BatchDecodeCoordinator::new(adapter(CallingConvention::HeaderFirst), registry)
        .with_parallel(false);

    assert_eq!(parallel.run_bytes(inputs()).await, sequential.run_bytes(inputs()).await);
}

#[tokio::test]
async fn files_are_read_and_missing_files_are_source_errors() {
    let dir = tempfile::tempdir().unwrap();
    let bass = dir.path().join("bass.xa");
    std::fs::write(&bass, xa_bytes(8000, 1, &drum_hit(128))).unwrap();

    let (coordinator, _) = coordinator(CallingConvention::HeaderFirst);
    let results = coordinator
        .run([
            (SlotId::Bass, Some(Box::new(FileSource::new(&bass)) as Box<dyn ByteSource>)),
            (
                SlotId::LowTom,
                Some(Box::new(FileSource::new(dir.path().join("floortom.xa"))) as Box<dyn ByteSource>),
            ),
        ])
        .await;

    assert!(results[&SlotId::Bass].is_success());
    let error = results[&SlotId::LowTom].error().unwrap();
    assert_eq!(error.kind(), DecodeErrorKind::Source);
    assert!(error.message().contains("floortom.xa"));
}
