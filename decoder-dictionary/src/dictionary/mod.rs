//! Decoder dictionaries
//!
//! A decoder dictionary is the self-contained decode instruction set for one
//! network protocol. The frame-oriented shape serves CAN and OBD; complex
//! data gets its own shape. The extractor produces one dictionary per
//! protocol with at least one collected signal, and consumers receive them
//! as one map keyed by protocol.

pub mod can;
pub mod complex;

pub use can::{
    CanDecoderDictionary, CanMessageCollectType, CanMessageDecoderMethod, OBD_CHANNEL_ID,
};
pub use complex::{
    ComplexDataDecoderDictionary, ComplexDataMessageFormat, SignalPathAndPartialSignalId,
};

use crate::types::VehicleDataProtocol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Decode instruction set for one protocol
///
/// The variant is fixed by the protocol: raw-socket CAN and OBD use the
/// frame-oriented shape, complex data uses its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecoderDictionary {
    /// Channel/frame-keyed dictionary (CAN, OBD)
    FrameOriented(CanDecoderDictionary),
    /// Interface/message-keyed dictionary (complex data)
    ComplexData(ComplexDataDecoderDictionary),
}

impl DecoderDictionary {
    /// Create the empty dictionary shape matching a protocol
    pub fn for_protocol(protocol: VehicleDataProtocol) -> Self {
        match protocol {
            VehicleDataProtocol::RawSocket | VehicleDataProtocol::Obd => {
                Self::FrameOriented(CanDecoderDictionary::new())
            }
            VehicleDataProtocol::ComplexData => {
                Self::ComplexData(ComplexDataDecoderDictionary::new())
            }
        }
    }

    /// The frame-oriented dictionary, if this is one
    pub fn as_frame_oriented(&self) -> Option<&CanDecoderDictionary> {
        match self {
            Self::FrameOriented(dictionary) => Some(dictionary),
            Self::ComplexData(_) => None,
        }
    }

    /// The complex-data dictionary, if this is one
    pub fn as_complex_data(&self) -> Option<&ComplexDataDecoderDictionary> {
        match self {
            Self::FrameOriented(_) => None,
            Self::ComplexData(dictionary) => Some(dictionary),
        }
    }
}

/// Extraction output: one optional dictionary per supported protocol
///
/// Every supported protocol is present as a key; `None` means no collection
/// scheme requested anything over that protocol. The ordered map keeps
/// iteration (and therefore listener notification) deterministic.
pub type DecoderDictionaryMap = BTreeMap<VehicleDataProtocol, Option<DecoderDictionary>>;

/// Published form of [`DecoderDictionaryMap`] with shared, immutable entries
pub type SharedDecoderDictionaryMap =
    BTreeMap<VehicleDataProtocol, Option<Arc<DecoderDictionary>>>;
