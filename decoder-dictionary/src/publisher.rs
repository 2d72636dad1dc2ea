//! Dictionary publication
//!
//! The publisher is the single point where freshly built dictionaries become
//! visible outside the extraction pass. Dictionaries are wrapped in [`Arc`]
//! on publish and handed to every registered listener as shared, immutable
//! snapshots; a later pass replaces the whole map instead of mutating
//! anything in place.

use crate::dictionary::{DecoderDictionary, DecoderDictionaryMap, SharedDecoderDictionaryMap};
use crate::types::VehicleDataProtocol;
use std::sync::Arc;

/// Observer of decoder dictionary updates
///
/// Notified once per supported protocol after every extraction pass. `None`
/// means the protocol has no active collection and its capture path should
/// be disabled.
pub trait DictionaryListener {
    /// Called with the new dictionary (or `None`) for one protocol
    fn on_dictionary_changed(
        &self,
        dictionary: Option<Arc<DecoderDictionary>>,
        protocol: VehicleDataProtocol,
    );
}

/// Broadcasts extraction results to registered listeners
#[derive(Default)]
pub struct DictionaryPublisher {
    listeners: Vec<Arc<dyn DictionaryListener>>,
}

impl DictionaryPublisher {
    /// Create a publisher with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for future publications
    pub fn subscribe(&mut self, listener: Arc<dyn DictionaryListener>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Publish one extraction result to every listener
    ///
    /// Each listener is notified exactly once per supported protocol, in the
    /// map's order, including protocols whose entry is `None`. Returns the
    /// shared form of the map for the caller's own bookkeeping.
    pub fn publish(&self, dictionaries: DecoderDictionaryMap) -> SharedDecoderDictionaryMap {
        let shared: SharedDecoderDictionaryMap = dictionaries
            .into_iter()
            .map(|(protocol, dictionary)| (protocol, dictionary.map(Arc::new)))
            .collect();

        for (protocol, dictionary) in &shared {
            match dictionary {
                Some(_) => log::debug!("Publishing decoder dictionary for protocol {}", protocol),
                None => log::debug!("Protocol {} disabled, publishing empty update", protocol),
            }
            for listener in &self.listeners {
                listener.on_dictionary_changed(dictionary.clone(), *protocol);
            }
        }
        shared
    }
}
