//! Complex-data decoder dictionary
//!
//! Tree-shaped signals (structs, arrays, nested primitives) are addressed by
//! interface id and message id rather than by numeric frame id. Each message
//! descriptor carries the closure of complex type definitions reachable from
//! its root type, so a consumer can decode the payload without further
//! manifest lookups.

use crate::manifest::DecoderManifest;
use crate::types::{
    ComplexDataType, ComplexDataTypeId, InterfaceId, SignalId, SignalPath, INVALID_SIGNAL_ID,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One requested subtree of a complex signal
///
/// Ordering is lexicographic on the path first, so the paths of a message
/// stay sorted the way consumers walk the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignalPathAndPartialSignalId {
    /// Path from the root type to the requested subtree
    pub signal_path: SignalPath,
    /// The partial signal id the path was registered under
    pub partial_signal_id: SignalId,
}

/// Decode descriptor for one complex message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexDataMessageFormat {
    /// Base signal id of the message
    pub signal_id: SignalId,
    /// Root complex type of the payload
    pub root_type_id: ComplexDataTypeId,
    /// Collect the full serialized payload
    pub collect_raw: bool,
    /// Every complex type reachable from the root, keyed by type id
    pub type_map: HashMap<ComplexDataTypeId, ComplexDataType>,
    /// Requested subtrees, sorted by path and deduplicated
    pub signal_paths: Vec<SignalPathAndPartialSignalId>,
}

impl Default for ComplexDataMessageFormat {
    fn default() -> Self {
        Self {
            signal_id: INVALID_SIGNAL_ID,
            root_type_id: 0,
            collect_raw: false,
            type_map: HashMap::new(),
            signal_paths: Vec::new(),
        }
    }
}

impl ComplexDataMessageFormat {
    /// Whether the descriptor has been initialized by a first signal
    pub fn is_initialized(&self) -> bool {
        self.signal_id != INVALID_SIGNAL_ID
    }

    /// Record one requested signal in this descriptor
    ///
    /// The first signal for the message initializes the descriptor: it sets
    /// the base signal id and root type and gathers the reachable complex
    /// types (bounded by `max_complex_types`). Every signal then either
    /// marks the message for raw collection (empty path) or files its path
    /// in sorted order.
    pub fn record_signal(
        &mut self,
        signal_id: SignalId,
        partial_signal_id: SignalId,
        signal_path: SignalPath,
        root_type_id: ComplexDataTypeId,
        manifest: &dyn DecoderManifest,
        max_complex_types: usize,
    ) {
        if !self.is_initialized() {
            self.signal_id = signal_id;
            self.root_type_id = root_type_id;
            self.collect_reachable_types(manifest, max_complex_types);
        }
        if signal_path.is_empty() {
            self.collect_raw = true;
        } else {
            self.insert_signal_path(SignalPathAndPartialSignalId {
                signal_path,
                partial_signal_id,
            });
        }
    }

    /// Gather the complex types reachable from the root into `type_map`
    ///
    /// Depth-first over a worklist; `type_map` doubles as the visited set so
    /// cyclic definitions terminate. The budget counts pops, bounding the
    /// work even on adversarial manifests.
    fn collect_reachable_types(
        &mut self,
        manifest: &dyn DecoderManifest,
        max_complex_types: usize,
    ) {
        let mut to_traverse = vec![self.root_type_id];
        let mut remaining = max_complex_types;
        while remaining > 0 {
            let type_id = match to_traverse.pop() {
                Some(type_id) => type_id,
                None => break,
            };
            remaining -= 1;
            if self.type_map.contains_key(&type_id) {
                continue;
            }
            let data_type = match manifest.complex_data_type(type_id) {
                Some(data_type) => data_type,
                None => {
                    log::error!("Invalid complex type id: {}", type_id);
                    continue;
                }
            };
            match &data_type {
                ComplexDataType::Primitive(_) => {}
                ComplexDataType::Array(array) => to_traverse.push(array.repeated_type_id),
                ComplexDataType::Struct(members) => {
                    to_traverse.extend(members.ordered_type_ids.iter().copied());
                }
            }
            self.type_map.insert(type_id, data_type);
        }
    }

    /// File a path in its sorted slot; repeated paths are dropped
    fn insert_signal_path(&mut self, entry: SignalPathAndPartialSignalId) {
        match self.signal_paths.binary_search(&entry) {
            Ok(_) => {}
            Err(position) => self.signal_paths.insert(position, entry),
        }
    }
}

/// Decode dictionary for complex-data signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexDataDecoderDictionary {
    /// interface id -> message id -> decode descriptor
    pub decoder_methods: HashMap<InterfaceId, HashMap<String, ComplexDataMessageFormat>>,
}

impl ComplexDataDecoderDictionary {
    /// Create a new empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor for a message, created empty on first access
    pub fn decoder_method_mut(
        &mut self,
        interface_id: InterfaceId,
        message_id: String,
    ) -> &mut ComplexDataMessageFormat {
        self.decoder_methods
            .entry(interface_id)
            .or_default()
            .entry(message_id)
            .or_default()
    }

    /// Look up the descriptor for a message, if any
    pub fn decoder_method(
        &self,
        interface_id: &str,
        message_id: &str,
    ) -> Option<&ComplexDataMessageFormat> {
        self.decoder_methods.get(interface_id)?.get(message_id)
    }
}
