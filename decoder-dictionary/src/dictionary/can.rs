//! Frame-oriented decoder dictionary (CAN and OBD)
//!
//! CAN and OBD share one dictionary shape: a two-level map from channel to
//! frame id (or PID) to the decode method for that frame. This module owns
//! the insertion rules, including the monotone collect-type escalation and
//! the PID-to-bit-layout arithmetic.

use crate::manifest::formats::{CanMessageFormat, CanSignalFormat, PidSignalDecoderFormat};
use crate::types::{CanRawFrameId, ChannelId, SignalId};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Placeholder channel id for OBD entries
///
/// There is exactly one OBD channel; the placeholder keeps the generic
/// channel -> frame -> method structure intact.
pub const OBD_CHANNEL_ID: ChannelId = 0;

const BYTE_SIZE: usize = 8;

/// What to capture for a frame
///
/// Escalation is monotone: `Raw` and `Decode` can only ever be upgraded to
/// `RawAndDecode`, never downgraded or crossed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanMessageCollectType {
    /// Capture the raw frame payload only
    Raw,
    /// Decode the frame's signals only
    #[default]
    Decode,
    /// Capture the raw payload and decode the signals
    RawAndDecode,
}

/// Decode method for one frame or PID
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanMessageDecoderMethod {
    /// What to capture for this frame
    pub collect_type: CanMessageCollectType,
    /// Decode layout of the frame; empty for raw-only entries
    pub format: CanMessageFormat,
}

/// Decode dictionary for the frame-oriented protocols (CAN, OBD)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanDecoderDictionary {
    /// channel id -> frame id (or PID) -> decode method
    pub decoder_methods: HashMap<ChannelId, HashMap<CanRawFrameId, CanMessageDecoderMethod>>,
    /// All signal ids this dictionary collects
    pub signal_ids_to_collect: HashSet<SignalId>,
}

impl CanDecoderDictionary {
    /// Create a new empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a CAN signal whose frame should be decoded
    ///
    /// The frame's full layout already describes every signal of the frame,
    /// so it is fetched once when the frame entry is created (or when a
    /// raw-only entry is escalated to `RawAndDecode`), never per signal.
    /// `format` is only invoked in those two cases.
    pub fn insert_decode_signal(
        &mut self,
        signal_id: SignalId,
        channel_id: ChannelId,
        frame_id: CanRawFrameId,
        format: impl FnOnce() -> CanMessageFormat,
    ) {
        self.signal_ids_to_collect.insert(signal_id);
        let frames = self.decoder_methods.entry(channel_id).or_default();
        match frames.entry(frame_id) {
            Entry::Vacant(entry) => {
                entry.insert(CanMessageDecoderMethod {
                    collect_type: CanMessageCollectType::Decode,
                    format: format(),
                });
            }
            Entry::Occupied(mut entry) => {
                let method = entry.get_mut();
                if method.collect_type == CanMessageCollectType::Raw {
                    // Created for raw capture only; now also attach the layout
                    method.collect_type = CanMessageCollectType::RawAndDecode;
                    method.format = format();
                }
            }
        }
    }

    /// Record a raw capture request for a frame
    ///
    /// A frame without an existing entry is captured raw-only; a frame
    /// already marked for decoding is escalated to `RawAndDecode`.
    pub fn insert_raw_frame(&mut self, channel_id: ChannelId, frame_id: CanRawFrameId) {
        let frames = self.decoder_methods.entry(channel_id).or_default();
        match frames.entry(frame_id) {
            Entry::Vacant(entry) => {
                entry.insert(CanMessageDecoderMethod {
                    collect_type: CanMessageCollectType::Raw,
                    format: CanMessageFormat::default(),
                });
            }
            Entry::Occupied(mut entry) => {
                if entry.get().collect_type == CanMessageCollectType::Decode {
                    entry.get_mut().collect_type = CanMessageCollectType::RawAndDecode;
                }
            }
        }
    }

    /// Record an OBD signal under its PID
    ///
    /// The PID entry is created once, seeded with the PID value and the
    /// declared response length; each signal then appends its computed
    /// bit-level layout. A signal already present in the entry is not
    /// appended again, so requesting it from several schemes keeps one
    /// layout. `signal_id` goes into the collect set while
    /// `requested_signal_id` (the id as the scheme asked for it) goes into
    /// the layout.
    pub fn insert_pid_signal(
        &mut self,
        signal_id: SignalId,
        requested_signal_id: SignalId,
        decoder_format: &PidSignalDecoderFormat,
    ) {
        self.signal_ids_to_collect.insert(signal_id);
        let frames = self.decoder_methods.entry(OBD_CHANNEL_ID).or_default();
        let method = frames.entry(decoder_format.pid).or_insert_with(|| {
            let mut method = CanMessageDecoderMethod::default();
            method.format.message_id = decoder_format.pid;
            method.format.size_in_bytes = decoder_format.pid_response_length as u8;
            method
        });
        if method
            .format
            .signals
            .iter()
            .any(|layout| layout.signal_id == requested_signal_id)
        {
            return;
        }
        method.format.signals.push(pid_signal_layout(requested_signal_id, decoder_format));
    }
}

/// Express a PID-located OBD signal as a generic bit-level signal layout
///
/// Saturating arithmetic keeps malformed manifests (zero byte length,
/// out-of-range start bytes) from panicking; the resulting layout is
/// nonsensical but stays within the pass's no-crash guarantee.
fn pid_signal_layout(
    signal_id: SignalId,
    decoder_format: &PidSignalDecoderFormat,
) -> CanSignalFormat {
    let first_bit_position = decoder_format
        .start_byte
        .saturating_mul(BYTE_SIZE)
        .saturating_add(usize::from(decoder_format.bit_right_shift));
    let size_in_bits = decoder_format
        .byte_length
        .saturating_sub(1)
        .saturating_mul(BYTE_SIZE)
        .saturating_add(usize::from(decoder_format.bit_mask_length));
    CanSignalFormat {
        signal_id,
        first_bit_position: first_bit_position as u16,
        size_in_bits: size_in_bits as u16,
        factor: decoder_format.scaling,
        offset: decoder_format.offset,
        ..Default::default()
    }
}
