//! Decoder manifest contract and in-memory catalog
//!
//! The decoder manifest is the catalog describing how every known signal
//! is physically encoded. The extractor consumes it exclusively through
//! the [`DecoderManifest`] lookup trait and never mutates it.

use crate::types::{
    CanRawFrameId, ComplexDataType, ComplexDataTypeId, InterfaceId, SignalId, VehicleDataProtocol,
};

pub mod catalog;
pub mod formats;

// Re-export key types for convenience
pub use catalog::{CatalogStats, SignalCatalog};
pub use formats::{
    CanMessageFormat, CanSignalFormat, ComplexSignalDecoderFormat, PidSignalDecoderFormat,
};

/// Read-only lookup contract of a decoder manifest
///
/// Lookups that can legitimately miss return `Option`; the remaining
/// queries return an empty/default format for unknown signals, which the
/// extractor treats as unresolved further down the line. Implementations
/// must answer `None` for [`INVALID_SIGNAL_ID`](crate::INVALID_SIGNAL_ID)
/// in [`network_protocol`](Self::network_protocol).
pub trait DecoderManifest {
    /// Network protocol the signal is sourced from
    fn network_protocol(&self, signal_id: SignalId) -> Option<VehicleDataProtocol>;

    /// CAN frame id and interface id a CAN signal lives on
    ///
    /// Unknown signals yield
    /// ([`INVALID_CAN_RAW_FRAME_ID`](crate::types::INVALID_CAN_RAW_FRAME_ID),
    /// empty interface id).
    fn can_frame_and_interface_id(&self, signal_id: SignalId) -> (CanRawFrameId, InterfaceId);

    /// Full decode layout of a CAN frame on a given interface
    fn can_message_format(&self, frame_id: CanRawFrameId, interface_id: &str) -> CanMessageFormat;

    /// PID response layout of an OBD signal
    fn pid_signal_decoder_format(&self, signal_id: SignalId) -> PidSignalDecoderFormat;

    /// Interface, message id and root type of a complex signal
    fn complex_signal_decoder_format(&self, signal_id: SignalId) -> ComplexSignalDecoderFormat;

    /// Definition of a complex data type, `None` if the id is unknown
    fn complex_data_type(&self, type_id: ComplexDataTypeId) -> Option<ComplexDataType>;
}
