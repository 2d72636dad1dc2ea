//! In-memory signal catalog
//!
//! A concrete [`DecoderManifest`] implementation that holds every lookup
//! table in memory. Agents that ingest their manifest from a wire format
//! can either populate a catalog or implement the trait directly on their
//! own storage.

use crate::manifest::formats::{
    CanMessageFormat, ComplexSignalDecoderFormat, PidSignalDecoderFormat,
};
use crate::manifest::DecoderManifest;
use crate::types::{
    is_partial_signal_id, CanRawFrameId, ComplexDataType, ComplexDataTypeId, DictionaryError,
    InterfaceId, Result, SignalId, VehicleDataProtocol, INVALID_CAN_RAW_FRAME_ID,
    INVALID_SIGNAL_ID,
};
use std::collections::HashMap;

/// In-memory decoder manifest
///
/// Ingestion methods validate signal id hygiene up front (the invalid
/// sentinel, the partial-signal bit, double registration); interface ids
/// and layout contents are stored as given, since defending against stale
/// or misconfigured manifest *data* is the extractor's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalCatalog {
    /// Protocol of every registered signal
    protocols: HashMap<SignalId, VehicleDataProtocol>,

    /// CAN signal id -> (frame id, interface id)
    can_locations: HashMap<SignalId, (CanRawFrameId, InterfaceId)>,

    /// (frame id, interface id) -> full frame decode layout
    can_formats: HashMap<(CanRawFrameId, InterfaceId), CanMessageFormat>,

    /// OBD signal id -> PID response layout
    pid_formats: HashMap<SignalId, PidSignalDecoderFormat>,

    /// Complex signal id -> interface/message/root-type format
    complex_formats: HashMap<SignalId, ComplexSignalDecoderFormat>,

    /// Complex type id -> type definition
    complex_types: HashMap<ComplexDataTypeId, ComplexDataType>,
}

impl SignalCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a CAN signal and the frame/interface it lives on
    pub fn add_can_signal(
        &mut self,
        signal_id: SignalId,
        frame_id: CanRawFrameId,
        interface_id: impl Into<InterfaceId>,
    ) -> Result<()> {
        self.register_signal(signal_id, VehicleDataProtocol::RawSocket)?;
        self.can_locations
            .insert(signal_id, (frame_id, interface_id.into()));
        Ok(())
    }

    /// Store the full decode layout of a CAN frame on an interface
    ///
    /// The layout covers every signal of the frame; a later registration
    /// for the same (frame, interface) pair replaces the previous layout.
    pub fn add_can_message_format(
        &mut self,
        frame_id: CanRawFrameId,
        interface_id: impl Into<InterfaceId>,
        format: CanMessageFormat,
    ) {
        self.can_formats.insert((frame_id, interface_id.into()), format);
    }

    /// Register an OBD signal and its PID response layout
    pub fn add_pid_signal(
        &mut self,
        signal_id: SignalId,
        format: PidSignalDecoderFormat,
    ) -> Result<()> {
        self.register_signal(signal_id, VehicleDataProtocol::Obd)?;
        self.pid_formats.insert(signal_id, format);
        Ok(())
    }

    /// Register a complex signal and its decoder format
    pub fn add_complex_signal(
        &mut self,
        signal_id: SignalId,
        format: ComplexSignalDecoderFormat,
    ) -> Result<()> {
        self.register_signal(signal_id, VehicleDataProtocol::ComplexData)?;
        self.complex_formats.insert(signal_id, format);
        Ok(())
    }

    /// Define a complex data type
    pub fn add_complex_data_type(
        &mut self,
        type_id: ComplexDataTypeId,
        data_type: ComplexDataType,
    ) -> Result<()> {
        if self.complex_types.contains_key(&type_id) {
            return Err(DictionaryError::DuplicateComplexType(type_id));
        }
        self.complex_types.insert(type_id, data_type);
        Ok(())
    }

    /// Validate a signal id and bind it to a protocol
    fn register_signal(
        &mut self,
        signal_id: SignalId,
        protocol: VehicleDataProtocol,
    ) -> Result<()> {
        if signal_id == INVALID_SIGNAL_ID {
            return Err(DictionaryError::InvalidSignalId(signal_id));
        }
        if is_partial_signal_id(signal_id) {
            return Err(DictionaryError::PartialSignalId(signal_id));
        }
        if let Some(existing) = self.protocols.get(&signal_id) {
            return Err(DictionaryError::DuplicateSignal {
                signal_id,
                protocol: *existing,
            });
        }
        self.protocols.insert(signal_id, protocol);
        Ok(())
    }

    /// Get catalog statistics
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            num_can_signals: self.can_locations.len(),
            num_pid_signals: self.pid_formats.len(),
            num_complex_signals: self.complex_formats.len(),
            num_can_formats: self.can_formats.len(),
            num_complex_types: self.complex_types.len(),
        }
    }
}

impl DecoderManifest for SignalCatalog {
    fn network_protocol(&self, signal_id: SignalId) -> Option<VehicleDataProtocol> {
        self.protocols.get(&signal_id).copied()
    }

    fn can_frame_and_interface_id(&self, signal_id: SignalId) -> (CanRawFrameId, InterfaceId) {
        self.can_locations
            .get(&signal_id)
            .cloned()
            .unwrap_or((INVALID_CAN_RAW_FRAME_ID, InterfaceId::new()))
    }

    fn can_message_format(&self, frame_id: CanRawFrameId, interface_id: &str) -> CanMessageFormat {
        self.can_formats
            .get(&(frame_id, interface_id.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn pid_signal_decoder_format(&self, signal_id: SignalId) -> PidSignalDecoderFormat {
        self.pid_formats
            .get(&signal_id)
            .cloned()
            .unwrap_or_default()
    }

    fn complex_signal_decoder_format(&self, signal_id: SignalId) -> ComplexSignalDecoderFormat {
        self.complex_formats
            .get(&signal_id)
            .cloned()
            .unwrap_or_default()
    }

    fn complex_data_type(&self, type_id: ComplexDataTypeId) -> Option<ComplexDataType> {
        self.complex_types.get(&type_id).cloned()
    }
}

/// Catalog statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    /// Number of registered CAN signals
    pub num_can_signals: usize,
    /// Number of registered OBD signals
    pub num_pid_signals: usize,
    /// Number of registered complex signals
    pub num_complex_signals: usize,
    /// Number of stored CAN frame layouts
    pub num_can_formats: usize,
    /// Number of defined complex types
    pub num_complex_types: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::formats::CanSignalFormat;
    use crate::types::{ComplexStruct, PARTIAL_SIGNAL_ID_BITMASK};

    #[test]
    fn test_empty_catalog() {
        let catalog = SignalCatalog::new();
        let stats = catalog.stats();
        assert_eq!(stats.num_can_signals, 0);
        assert_eq!(stats.num_pid_signals, 0);
        assert_eq!(stats.num_complex_signals, 0);
        assert_eq!(stats.num_can_formats, 0);
        assert_eq!(stats.num_complex_types, 0);
    }

    #[test]
    fn test_add_can_signal() {
        let mut catalog = SignalCatalog::new();
        catalog.add_can_signal(1, 0x123, "can0").unwrap();
        catalog.add_can_message_format(
            0x123,
            "can0",
            CanMessageFormat {
                message_id: 0x123,
                size_in_bytes: 8,
                signals: vec![CanSignalFormat {
                    signal_id: 1,
                    size_in_bits: 16,
                    factor: 1.0,
                    ..Default::default()
                }],
            },
        );

        assert_eq!(
            catalog.network_protocol(1),
            Some(VehicleDataProtocol::RawSocket)
        );
        assert_eq!(
            catalog.can_frame_and_interface_id(1),
            (0x123, "can0".to_string())
        );
        let format = catalog.can_message_format(0x123, "can0");
        assert_eq!(format.signals.len(), 1);
        assert_eq!(catalog.stats().num_can_signals, 1);
    }

    #[test]
    fn test_unknown_signal_lookups() {
        let catalog = SignalCatalog::new();
        assert_eq!(catalog.network_protocol(42), None);
        assert_eq!(catalog.network_protocol(INVALID_SIGNAL_ID), None);
        assert_eq!(
            catalog.can_frame_and_interface_id(42),
            (INVALID_CAN_RAW_FRAME_ID, String::new())
        );
        // Unknown layout queries return empty defaults, not errors
        assert_eq!(catalog.can_message_format(0x1, "can0"), CanMessageFormat::default());
        assert!(catalog.complex_signal_decoder_format(42).interface_id.is_empty());
        assert_eq!(catalog.complex_data_type(100), None);
    }

    #[test]
    fn test_signal_id_validation() {
        let mut catalog = SignalCatalog::new();
        assert_eq!(
            catalog.add_can_signal(INVALID_SIGNAL_ID, 0x123, "can0"),
            Err(DictionaryError::InvalidSignalId(INVALID_SIGNAL_ID))
        );

        let partial_id = PARTIAL_SIGNAL_ID_BITMASK | 5;
        assert_eq!(
            catalog.add_pid_signal(partial_id, PidSignalDecoderFormat::default()),
            Err(DictionaryError::PartialSignalId(partial_id))
        );
    }

    #[test]
    fn test_duplicate_signal_rejected() {
        let mut catalog = SignalCatalog::new();
        catalog.add_can_signal(1, 0x123, "can0").unwrap();
        assert_eq!(
            catalog.add_pid_signal(1, PidSignalDecoderFormat::default()),
            Err(DictionaryError::DuplicateSignal {
                signal_id: 1,
                protocol: VehicleDataProtocol::RawSocket,
            })
        );
    }

    #[test]
    fn test_duplicate_complex_type_rejected() {
        let mut catalog = SignalCatalog::new();
        let definition = ComplexDataType::Struct(ComplexStruct {
            ordered_type_ids: vec![2, 3],
        });
        catalog.add_complex_data_type(1, definition.clone()).unwrap();
        assert_eq!(
            catalog.add_complex_data_type(1, definition),
            Err(DictionaryError::DuplicateComplexType(1))
        );
    }
}
