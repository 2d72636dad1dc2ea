//! Collection scheme contract
//!
//! A collection scheme is an externally owned, immutable description of
//! what a campaign wants captured: signals to decode, partial-signal
//! resolution data, and raw CAN frames to collect byte-for-byte. The
//! extractor only reads schemes through the [`CollectionScheme`] trait;
//! scheme storage and lifecycle live in the embedding agent.

use crate::types::{CanRawFrameId, InterfaceId, SignalId, SignalPath};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A raw CAN frame capture request
///
/// Raw frame collection is independent of signal-level decoding: the frame
/// payload is captured byte-for-byte whether or not any of its signals are
/// also requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanFrameCollectionInfo {
    /// CAN frame id to capture
    pub frame_id: CanRawFrameId,
    /// Textual id of the interface the frame is expected on
    pub interface_id: InterfaceId,
}

/// Read-only view of one active collection scheme
pub trait CollectionScheme {
    /// Signal ids this scheme wants collected
    ///
    /// May contain partial signal ids; those resolve through
    /// [`partial_signal_lookup`](Self::partial_signal_lookup).
    fn signals_to_collect(&self) -> &[SignalId];

    /// Resolution table for partial signal ids
    ///
    /// Maps a partial signal id to the owning base signal id and the access
    /// path from the base signal's root to the requested leaf.
    fn partial_signal_lookup(&self) -> &HashMap<SignalId, (SignalId, SignalPath)>;

    /// Raw CAN frame capture requests of this scheme
    fn raw_frames_to_collect(&self) -> &[CanFrameCollectionInfo];
}

/// Plain owned [`CollectionScheme`] implementation
///
/// Embedding agents that materialize schemes from their own storage can
/// implement the trait directly; this type covers the common case of a
/// scheme assembled in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchemeData {
    /// Signal ids to collect (base or partial)
    #[serde(default)]
    pub signals: Vec<SignalId>,
    /// Partial signal id -> (base signal id, access path)
    #[serde(default)]
    pub partial_signals: HashMap<SignalId, (SignalId, SignalPath)>,
    /// Raw CAN frame capture requests
    #[serde(default)]
    pub raw_frames: Vec<CanFrameCollectionInfo>,
}

impl CollectionSchemeData {
    /// Create a new empty scheme
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: collect a signal
    pub fn add_signal(mut self, signal_id: SignalId) -> Self {
        self.signals.push(signal_id);
        self
    }

    /// Builder method: collect a leaf of a composite signal
    ///
    /// Registers the partial id both in the signal list and in the
    /// partial-signal lookup table. An empty path requests the whole raw
    /// payload of the base signal.
    pub fn add_partial_signal(
        mut self,
        partial_signal_id: SignalId,
        base_signal_id: SignalId,
        signal_path: SignalPath,
    ) -> Self {
        self.signals.push(partial_signal_id);
        self.partial_signals
            .insert(partial_signal_id, (base_signal_id, signal_path));
        self
    }

    /// Builder method: collect a raw CAN frame
    pub fn add_raw_frame(
        mut self,
        interface_id: impl Into<InterfaceId>,
        frame_id: CanRawFrameId,
    ) -> Self {
        self.raw_frames.push(CanFrameCollectionInfo {
            frame_id,
            interface_id: interface_id.into(),
        });
        self
    }
}

impl CollectionScheme for CollectionSchemeData {
    fn signals_to_collect(&self) -> &[SignalId] {
        &self.signals
    }

    fn partial_signal_lookup(&self) -> &HashMap<SignalId, (SignalId, SignalPath)> {
        &self.partial_signals
    }

    fn raw_frames_to_collect(&self) -> &[CanFrameCollectionInfo] {
        &self.raw_frames
    }
}
