//! Core types for the decoder dictionary library
//!
//! This module defines the shared vocabulary of the extraction pipeline:
//! signal and frame identifiers, the supported network protocols, complex
//! data type definitions, and the library error type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for decoder dictionary operations
pub type Result<T> = std::result::Result<T, DictionaryError>;

/// Numeric signal identifier, unique across a decoder manifest
pub type SignalId = u32;

/// Sentinel for a signal id that could not be resolved
pub const INVALID_SIGNAL_ID: SignalId = 0;

/// Bit marking a signal id as *partial*
///
/// A partial signal id identifies one leaf of a larger composite signal.
/// It is only meaningful together with the owning collection scheme's
/// partial-signal lookup table, which resolves it to the base signal id
/// and the access path to the leaf.
pub const PARTIAL_SIGNAL_ID_BITMASK: SignalId = 0x8000_0000;

/// True if the given id carries the partial-signal bit
pub fn is_partial_signal_id(signal_id: SignalId) -> bool {
    (signal_id & PARTIAL_SIGNAL_ID_BITMASK) != 0
}

/// Raw CAN frame identifier (11-bit or 29-bit message id)
pub type CanRawFrameId = u32;

/// Sentinel for an unknown CAN frame id
pub const INVALID_CAN_RAW_FRAME_ID: CanRawFrameId = 0xFFFF_FFFF;

/// Dense numeric channel id assigned by the [`CanIdTranslator`]
///
/// [`CanIdTranslator`]: crate::channel::CanIdTranslator
pub type ChannelId = u32;

/// Stable textual identifier of a physical network interface (e.g. "can0")
pub type InterfaceId = String;

/// Identifier of a complex data type in the decoder manifest's type catalog
pub type ComplexDataTypeId = u32;

/// Access path from a composite signal's root to one of its leaves
///
/// Each element is the index of the member (for structs) or element (for
/// arrays) to descend into. An empty path denotes the whole signal.
pub type SignalPath = Vec<u32>;

/// Network protocols a signal can be sourced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VehicleDataProtocol {
    /// Classic CAN frames read from a raw socket
    RawSocket,
    /// On-board diagnostics (OBD-II) PID responses
    Obd,
    /// Complex structured payloads (e.g. imagery, ROS-style messages)
    ComplexData,
}

impl VehicleDataProtocol {
    /// All protocols the extraction pass produces dictionaries for
    ///
    /// The dictionary map always contains one entry per supported protocol;
    /// protocols without any collected signal stay disabled (`None`).
    pub const SUPPORTED: [VehicleDataProtocol; 3] = [
        VehicleDataProtocol::RawSocket,
        VehicleDataProtocol::Obd,
        VehicleDataProtocol::ComplexData,
    ];
}

impl fmt::Display for VehicleDataProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleDataProtocol::RawSocket => write!(f, "RawSocket"),
            VehicleDataProtocol::Obd => write!(f, "Obd"),
            VehicleDataProtocol::ComplexData => write!(f, "ComplexData"),
        }
    }
}

/// Scalar value types a complex-type leaf can decode to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveType {
    Bool,
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Uint64,
    Int64,
    Float32,
    Float64,
}

/// A scalar leaf in the complex type graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveData {
    /// Scalar type of the raw value
    pub primitive_type: PrimitiveType,
    /// Scale factor to convert the raw value to a physical value
    pub scaling: f64,
    /// Offset to add after scaling
    pub offset: f64,
}

/// A fixed-size array of one repeated complex type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexArray {
    /// Number of elements
    pub size: u32,
    /// Type id of every element
    pub repeated_type_id: ComplexDataTypeId,
}

/// A struct of ordered members, each referring to another complex type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexStruct {
    /// Member type ids in declared order
    pub ordered_type_ids: Vec<ComplexDataTypeId>,
}

/// A complex data type definition from the decoder manifest's type catalog
///
/// Types are recursively defined: arrays and structs refer to other type
/// ids, which may themselves be arrays or structs. The catalog can contain
/// cycles, so any traversal over it must be bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComplexDataType {
    /// Scalar leaf
    Primitive(PrimitiveData),
    /// Fixed-size array of one repeated type
    Array(ComplexArray),
    /// Struct with ordered members
    Struct(ComplexStruct),
}

/// Errors reported by the decoder dictionary library
///
/// Extraction itself never fails: per-signal and per-frame problems are
/// logged and the affected unit of work is dropped from the dictionary.
/// These errors surface from catalog ingestion, where malformed entries
/// are rejected up front.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictionaryError {
    #[error("Invalid signal ID: {0}")]
    InvalidSignalId(SignalId),

    #[error("Signal {0} carries the partial-signal bit; only base signals can be registered")]
    PartialSignalId(SignalId),

    #[error("Signal {signal_id} is already registered for protocol {protocol}")]
    DuplicateSignal {
        signal_id: SignalId,
        protocol: VehicleDataProtocol,
    },

    #[error("Complex type {0} is already defined")]
    DuplicateComplexType(ComplexDataTypeId),
}
