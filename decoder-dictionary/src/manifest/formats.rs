//! Decode format types returned by the decoder manifest
//!
//! These structs describe how a signal is physically encoded on the wire.
//! They are produced by the manifest and copied into the decode dictionary;
//! the live decoding engine consumes them from there.

use crate::types::{ComplexDataTypeId, InterfaceId, SignalId};
use serde::{Deserialize, Serialize};

/// Bit-level layout of one signal within a CAN frame or PID response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanSignalFormat {
    /// Signal id this layout decodes
    pub signal_id: SignalId,
    /// True if the signal is big-endian (Motorola byte order)
    pub is_big_endian: bool,
    /// True if the raw value is a signed integer
    pub is_signed: bool,
    /// Bit position of the signal's first bit within the payload
    pub first_bit_position: u16,
    /// Signal width in bits
    pub size_in_bits: u16,
    /// Offset to add after scaling
    pub offset: f64,
    /// Scale factor to convert the raw value to a physical value
    pub factor: f64,
}

/// Full decode layout of one CAN frame
///
/// The layout always describes *every* signal of the frame as defined in
/// the decoder manifest; it is fetched whole, never assembled signal by
/// signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanMessageFormat {
    /// CAN message id (or OBD PID for PID response layouts)
    pub message_id: u32,
    /// Payload size in bytes
    pub size_in_bytes: u8,
    /// Layouts of all signals in this frame
    pub signals: Vec<CanSignalFormat>,
}

/// How one OBD signal is located within a PID response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PidSignalDecoderFormat {
    /// Parameter id of the diagnostic request
    pub pid: u32,
    /// Length in bytes of the PID response payload
    pub pid_response_length: usize,
    /// OBD service (mode) the PID belongs to, e.g. 0x01 for current data
    pub service_mode: u8,
    /// Scale factor to convert the raw value to a physical value
    pub scaling: f64,
    /// Offset to add after scaling
    pub offset: f64,
    /// First byte of the signal within the response payload
    pub start_byte: usize,
    /// Number of bytes the signal spans
    pub byte_length: usize,
    /// Right shift applied to the first byte before masking
    pub bit_right_shift: u8,
    /// Number of mask bits in the last byte
    pub bit_mask_length: u8,
}

/// Where a complex signal's payload arrives and how its type graph roots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexSignalDecoderFormat {
    /// Textual id of the interface the payload arrives on
    ///
    /// An empty interface id marks the format as unresolved; the extractor
    /// skips such signals.
    pub interface_id: InterfaceId,
    /// Message id within the interface (e.g. a topic name)
    pub message_id: String,
    /// Root of the signal's complex type graph
    pub root_type_id: ComplexDataTypeId,
}

