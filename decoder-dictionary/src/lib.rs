//! Decoder Dictionary Library
//!
//! A stateless, reusable library for building per-protocol decode
//! dictionaries from active collection schemes and a decoder manifest, for
//! vehicle data sourced from CAN, OBD and structured (complex data)
//! interfaces.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on extraction:
//! - Resolves every requested signal id to its network protocol via a
//!   decoder manifest
//! - Builds frame-oriented dictionaries for CAN and OBD, and
//!   descriptor-based dictionaries for complex structured data
//! - Folds raw CAN frame capture requests into the frame-oriented
//!   dictionary, escalating collect types where signals and raw captures
//!   meet
//! - Publishes finished dictionaries to listeners as shared, immutable
//!   snapshots
//!
//! The library does NOT:
//! - Parse manifests or collection schemes off the wire
//! - Capture or decode live bus traffic
//! - Diff dictionaries across passes or persist them
//! - Schedule extraction passes (the caller decides when to rerun)
//!
//! Every extraction pass rebuilds the whole dictionary map from scratch, so
//! no decode rule from a stale collection scheme can survive an update.
//!
//! # Example Usage
//!
//! ```
//! use decoder_dictionary::{
//!     CanIdTranslator, CanMessageFormat, CollectionSchemeData, DictionaryExtractor,
//!     SignalCatalog, VehicleDataProtocol,
//! };
//!
//! // Describe what the vehicle can decode
//! let mut catalog = SignalCatalog::new();
//! catalog.add_can_signal(1, 0x123, "can0").unwrap();
//! catalog.add_can_message_format(0x123, "can0", CanMessageFormat::default());
//!
//! // Map interface names to numeric channel ids
//! let mut translator = CanIdTranslator::new();
//! translator.add("can0");
//!
//! // One active collection scheme wants signal 1
//! let scheme = CollectionSchemeData::new().add_signal(1);
//!
//! let extractor = DictionaryExtractor::new(&catalog, &translator);
//! let dictionaries = extractor.extract(&[&scheme]);
//!
//! assert!(dictionaries[&VehicleDataProtocol::RawSocket].is_some());
//! assert!(dictionaries[&VehicleDataProtocol::Obd].is_none());
//! ```

// Public modules
pub mod channel;
pub mod config;
pub mod dictionary;
pub mod extractor;
pub mod manifest;
pub mod publisher;
pub mod scheme;
pub mod types;

// Re-export main types for convenience
pub use channel::CanIdTranslator;
pub use config::{ExtractorConfig, MAX_COMPLEX_TYPES};
pub use dictionary::{
    CanDecoderDictionary, CanMessageCollectType, CanMessageDecoderMethod,
    ComplexDataDecoderDictionary, ComplexDataMessageFormat, DecoderDictionary,
    DecoderDictionaryMap, SharedDecoderDictionaryMap, SignalPathAndPartialSignalId,
    OBD_CHANNEL_ID,
};
pub use extractor::DictionaryExtractor;
pub use manifest::{
    CanMessageFormat, CanSignalFormat, CatalogStats, ComplexSignalDecoderFormat, DecoderManifest,
    PidSignalDecoderFormat, SignalCatalog,
};
pub use publisher::{DictionaryListener, DictionaryPublisher};
pub use scheme::{CanFrameCollectionInfo, CollectionScheme, CollectionSchemeData};
pub use types::{
    is_partial_signal_id, CanRawFrameId, ChannelId, ComplexArray, ComplexDataType,
    ComplexDataTypeId, ComplexStruct, DictionaryError, InterfaceId, PrimitiveData, PrimitiveType,
    Result, SignalId, SignalPath, VehicleDataProtocol, INVALID_CAN_RAW_FRAME_ID,
    INVALID_SIGNAL_ID, PARTIAL_SIGNAL_ID_BITMASK,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
