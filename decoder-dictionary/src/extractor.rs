//! Decoder dictionary extraction
//!
//! One extraction pass walks every active collection scheme, resolves each
//! requested signal to its protocol through the decoder manifest, and builds
//! one decode dictionary per protocol that has at least one signal. A second
//! sweep per scheme folds in raw CAN frame capture requests. The pass never
//! fails as a whole: anything unresolvable is logged and dropped, and the
//! remaining signals still produce a usable dictionary.

use crate::channel::CanIdTranslator;
use crate::config::ExtractorConfig;
use crate::dictionary::{DecoderDictionary, DecoderDictionaryMap};
use crate::manifest::DecoderManifest;
use crate::scheme::CollectionScheme;
use crate::types::{
    is_partial_signal_id, SignalId, SignalPath, VehicleDataProtocol, INVALID_SIGNAL_ID,
};

/// Builds decoder dictionaries from collection schemes and a decoder manifest
///
/// The manifest and the channel translator are borrowed for the duration of
/// one pass; the extractor never mutates either. Each call to
/// [`extract`](Self::extract) produces a fresh map, so no decode rule from a
/// previous pass can leak into the next one.
///
/// # Example
///
/// ```
/// use decoder_dictionary::{
///     CanIdTranslator, CollectionSchemeData, DictionaryExtractor, SignalCatalog,
/// };
///
/// let mut catalog = SignalCatalog::new();
/// catalog.add_can_signal(1, 0x123, "can0").unwrap();
/// let mut translator = CanIdTranslator::new();
/// translator.add("can0");
///
/// let scheme = CollectionSchemeData::new().add_signal(1);
/// let extractor = DictionaryExtractor::new(&catalog, &translator);
/// let dictionaries = extractor.extract(&[&scheme]);
/// ```
pub struct DictionaryExtractor<'a> {
    manifest: &'a dyn DecoderManifest,
    translator: &'a CanIdTranslator,
    config: ExtractorConfig,
}

impl<'a> DictionaryExtractor<'a> {
    /// Create an extractor with the default configuration
    pub fn new(manifest: &'a dyn DecoderManifest, translator: &'a CanIdTranslator) -> Self {
        Self::with_config(manifest, translator, ExtractorConfig::default())
    }

    /// Create an extractor with an explicit configuration
    pub fn with_config(
        manifest: &'a dyn DecoderManifest,
        translator: &'a CanIdTranslator,
        config: ExtractorConfig,
    ) -> Self {
        Self {
            manifest,
            translator,
            config,
        }
    }

    /// Run one extraction pass over the given collection schemes
    ///
    /// Returns a map with one entry per supported protocol. Protocols no
    /// scheme collects data for stay `None`, which consumers read as
    /// "disable this capture path".
    pub fn extract(&self, schemes: &[&dyn CollectionScheme]) -> DecoderDictionaryMap {
        let mut dictionaries = DecoderDictionaryMap::new();
        for protocol in VehicleDataProtocol::SUPPORTED {
            dictionaries.insert(protocol, None);
        }

        for scheme in schemes {
            self.extract_signals(*scheme, &mut dictionaries);
            self.extract_raw_frames(*scheme, &mut dictionaries);
        }

        log::info!(
            "Built decoder dictionaries for {} of {} supported protocols from {} collection schemes",
            dictionaries.values().filter(|dictionary| dictionary.is_some()).count(),
            dictionaries.len(),
            schemes.len()
        );
        dictionaries
    }

    fn extract_signals(
        &self,
        scheme: &dyn CollectionScheme,
        dictionaries: &mut DecoderDictionaryMap,
    ) {
        for &requested_signal_id in scheme.signals_to_collect() {
            let mut signal_id = requested_signal_id;
            let mut signal_path = SignalPath::new();
            if is_partial_signal_id(signal_id) {
                match scheme.partial_signal_lookup().get(&signal_id) {
                    Some((base_signal_id, path)) => {
                        signal_id = *base_signal_id;
                        signal_path = path.clone();
                    }
                    None => {
                        log::warn!("Unknown partial signal ID: {}", requested_signal_id);
                        // The sentinel resolves to no protocol, so the
                        // lookup below drops the signal
                        signal_id = INVALID_SIGNAL_ID;
                    }
                }
            }

            let protocol = match self.manifest.network_protocol(signal_id) {
                Some(protocol) => protocol,
                None => {
                    log::warn!("Invalid protocol provided for signal: {}", signal_id);
                    continue;
                }
            };

            let dictionary = dictionaries
                .entry(protocol)
                .or_insert(None)
                .get_or_insert_with(|| DecoderDictionary::for_protocol(protocol));

            match protocol {
                VehicleDataProtocol::RawSocket => self.insert_can_signal(dictionary, signal_id),
                VehicleDataProtocol::Obd => {
                    self.insert_obd_signal(dictionary, signal_id, requested_signal_id)
                }
                VehicleDataProtocol::ComplexData => self.insert_complex_signal(
                    dictionary,
                    signal_id,
                    requested_signal_id,
                    signal_path,
                ),
            }
        }
    }

    /// Record a CAN signal into the frame-oriented dictionary
    fn insert_can_signal(&self, dictionary: &mut DecoderDictionary, signal_id: SignalId) {
        let (frame_id, interface_id) = self.manifest.can_frame_and_interface_id(signal_id);
        let channel_id = match self.translator.channel_numeric_id(&interface_id) {
            Some(channel_id) => channel_id,
            None => {
                log::warn!("Invalid interface ID provided: '{}'", interface_id);
                return;
            }
        };
        match dictionary {
            DecoderDictionary::FrameOriented(frame_dictionary) => {
                frame_dictionary.insert_decode_signal(signal_id, channel_id, frame_id, || {
                    self.manifest.can_message_format(frame_id, &interface_id)
                });
            }
            DecoderDictionary::ComplexData(_) => {
                log::warn!(
                    "Frame-oriented dictionary expected for CAN signal ID: {}",
                    signal_id
                );
            }
        }
    }

    /// Record an OBD signal into the frame-oriented dictionary
    fn insert_obd_signal(
        &self,
        dictionary: &mut DecoderDictionary,
        signal_id: SignalId,
        requested_signal_id: SignalId,
    ) {
        let decoder_format = self.manifest.pid_signal_decoder_format(signal_id);
        match dictionary {
            DecoderDictionary::FrameOriented(frame_dictionary) => {
                frame_dictionary.insert_pid_signal(signal_id, requested_signal_id, &decoder_format);
            }
            DecoderDictionary::ComplexData(_) => {
                log::warn!(
                    "Frame-oriented dictionary expected for OBD signal ID: {}",
                    signal_id
                );
            }
        }
    }

    /// Record a complex signal occurrence into its message descriptor
    fn insert_complex_signal(
        &self,
        dictionary: &mut DecoderDictionary,
        signal_id: SignalId,
        requested_signal_id: SignalId,
        signal_path: SignalPath,
    ) {
        let complex_dictionary = match dictionary {
            DecoderDictionary::ComplexData(complex_dictionary) => complex_dictionary,
            DecoderDictionary::FrameOriented(_) => {
                log::warn!(
                    "Complex data dictionary expected for signal ID: {}",
                    requested_signal_id
                );
                return;
            }
        };
        // The sentinel never maps to a protocol, so this is unreachable
        // through extract(); kept as a guard against misbehaving manifests
        if signal_id == INVALID_SIGNAL_ID {
            return;
        }
        let decoder_format = self.manifest.complex_signal_decoder_format(signal_id);
        if decoder_format.interface_id.is_empty() {
            log::warn!("Complex signal ID has empty interface ID: {}", signal_id);
            return;
        }
        let root_type_id = decoder_format.root_type_id;
        let descriptor = complex_dictionary
            .decoder_method_mut(decoder_format.interface_id, decoder_format.message_id);
        descriptor.record_signal(
            signal_id,
            requested_signal_id,
            signal_path,
            root_type_id,
            self.manifest,
            self.config.max_complex_types,
        );
    }

    /// Fold the scheme's raw CAN frame requests into the dictionary map
    fn extract_raw_frames(
        &self,
        scheme: &dyn CollectionScheme,
        dictionaries: &mut DecoderDictionaryMap,
    ) {
        let raw_frames = scheme.raw_frames_to_collect();
        if raw_frames.is_empty() {
            return;
        }
        let dictionary = dictionaries
            .entry(VehicleDataProtocol::RawSocket)
            .or_insert(None)
            .get_or_insert_with(|| {
                DecoderDictionary::for_protocol(VehicleDataProtocol::RawSocket)
            });
        let frame_dictionary = match dictionary {
            DecoderDictionary::FrameOriented(frame_dictionary) => frame_dictionary,
            DecoderDictionary::ComplexData(_) => {
                log::warn!("Frame-oriented dictionary expected for raw CAN frame collection");
                return;
            }
        };
        for frame_info in raw_frames {
            match self.translator.channel_numeric_id(&frame_info.interface_id) {
                Some(channel_id) => {
                    frame_dictionary.insert_raw_frame(channel_id, frame_info.frame_id);
                }
                None => {
                    log::warn!("Invalid interface ID provided: '{}'", frame_info.interface_id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{CanMessageCollectType, OBD_CHANNEL_ID};
    use crate::manifest::{
        CanMessageFormat, CanSignalFormat, ComplexSignalDecoderFormat, PidSignalDecoderFormat,
        SignalCatalog,
    };
    use crate::scheme::CollectionSchemeData;
    use crate::types::{
        ComplexDataType, ComplexStruct, PrimitiveData, PrimitiveType, PARTIAL_SIGNAL_ID_BITMASK,
    };

    const SPEED_SIGNAL: SignalId = 1;
    const RPM_SIGNAL: SignalId = 2;
    const SPEED_FRAME: u32 = 0x123;
    const RPM_FRAME: u32 = 0x200;

    fn speed_format() -> CanMessageFormat {
        CanMessageFormat {
            message_id: SPEED_FRAME,
            size_in_bytes: 8,
            signals: vec![CanSignalFormat {
                signal_id: SPEED_SIGNAL,
                size_in_bits: 16,
                factor: 0.01,
                ..Default::default()
            }],
        }
    }

    fn can_catalog() -> SignalCatalog {
        let mut catalog = SignalCatalog::new();
        catalog.add_can_signal(SPEED_SIGNAL, SPEED_FRAME, "can0").unwrap();
        catalog.add_can_message_format(SPEED_FRAME, "can0", speed_format());
        catalog.add_can_signal(RPM_SIGNAL, RPM_FRAME, "can1").unwrap();
        catalog.add_can_message_format(RPM_FRAME, "can1", CanMessageFormat::default());
        catalog
    }

    fn translator_for(interfaces: &[&str]) -> CanIdTranslator {
        let mut translator = CanIdTranslator::new();
        for interface in interfaces {
            translator.add(*interface);
        }
        translator
    }

    #[test]
    fn test_no_schemes_disables_every_protocol() {
        let catalog = SignalCatalog::new();
        let translator = CanIdTranslator::new();
        let extractor = DictionaryExtractor::new(&catalog, &translator);

        let dictionaries = extractor.extract(&[]);
        assert_eq!(dictionaries.len(), VehicleDataProtocol::SUPPORTED.len());
        assert!(dictionaries.values().all(|dictionary| dictionary.is_none()));
    }

    #[test]
    fn test_can_signal_builds_frame_oriented_dictionary() {
        let catalog = can_catalog();
        let translator = translator_for(&["can0", "can1"]);
        let extractor = DictionaryExtractor::new(&catalog, &translator);

        let scheme = CollectionSchemeData::new().add_signal(SPEED_SIGNAL);
        let dictionaries = extractor.extract(&[&scheme]);

        let dictionary = dictionaries[&VehicleDataProtocol::RawSocket]
            .as_ref()
            .and_then(|dictionary| dictionary.as_frame_oriented())
            .unwrap();
        assert!(dictionary.signal_ids_to_collect.contains(&SPEED_SIGNAL));
        let method = &dictionary.decoder_methods[&0][&SPEED_FRAME];
        assert_eq!(method.collect_type, CanMessageCollectType::Decode);
        assert_eq!(method.format.signals.len(), 1);

        assert!(dictionaries[&VehicleDataProtocol::Obd].is_none());
        assert!(dictionaries[&VehicleDataProtocol::ComplexData].is_none());
    }

    #[test]
    fn test_unknown_signal_leaves_other_signals_intact() {
        let catalog = can_catalog();
        let translator = translator_for(&["can0", "can1"]);
        let extractor = DictionaryExtractor::new(&catalog, &translator);

        // Signal 99 is not in the manifest at all
        let scheme = CollectionSchemeData::new().add_signal(99).add_signal(SPEED_SIGNAL);
        let dictionaries = extractor.extract(&[&scheme]);

        let dictionary = dictionaries[&VehicleDataProtocol::RawSocket]
            .as_ref()
            .and_then(|dictionary| dictionary.as_frame_oriented())
            .unwrap();
        assert_eq!(dictionary.signal_ids_to_collect.len(), 1);
        assert!(dictionary.signal_ids_to_collect.contains(&SPEED_SIGNAL));
    }

    #[test]
    fn test_unresolvable_partial_signal_is_dropped() {
        let catalog = can_catalog();
        let translator = translator_for(&["can0", "can1"]);
        let extractor = DictionaryExtractor::new(&catalog, &translator);

        // Partial id with no entry in the scheme's lookup table
        let scheme = CollectionSchemeData::new().add_signal(PARTIAL_SIGNAL_ID_BITMASK | 7);
        let dictionaries = extractor.extract(&[&scheme]);
        assert!(dictionaries.values().all(|dictionary| dictionary.is_none()));
    }

    #[test]
    fn test_unresolved_interface_skips_only_that_signal() {
        let catalog = can_catalog();
        // can1 is not registered, so RPM_SIGNAL cannot be placed
        let translator = translator_for(&["can0"]);
        let extractor = DictionaryExtractor::new(&catalog, &translator);

        let scheme = CollectionSchemeData::new()
            .add_signal(RPM_SIGNAL)
            .add_signal(SPEED_SIGNAL);
        let dictionaries = extractor.extract(&[&scheme]);

        let dictionary = dictionaries[&VehicleDataProtocol::RawSocket]
            .as_ref()
            .and_then(|dictionary| dictionary.as_frame_oriented())
            .unwrap();
        assert_eq!(dictionary.signal_ids_to_collect.len(), 1);
        assert!(dictionary.signal_ids_to_collect.contains(&SPEED_SIGNAL));
        assert!(!dictionary.decoder_methods[&0].contains_key(&RPM_FRAME));
    }

    #[test]
    fn test_obd_signal_lands_on_placeholder_channel() {
        let mut catalog = SignalCatalog::new();
        catalog
            .add_pid_signal(
                10,
                PidSignalDecoderFormat {
                    pid: 0x0C,
                    pid_response_length: 2,
                    byte_length: 2,
                    bit_mask_length: 8,
                    scaling: 0.25,
                    ..Default::default()
                },
            )
            .unwrap();
        let translator = CanIdTranslator::new();
        let extractor = DictionaryExtractor::new(&catalog, &translator);

        let scheme = CollectionSchemeData::new().add_signal(10);
        let dictionaries = extractor.extract(&[&scheme]);

        let dictionary = dictionaries[&VehicleDataProtocol::Obd]
            .as_ref()
            .and_then(|dictionary| dictionary.as_frame_oriented())
            .unwrap();
        let method = &dictionary.decoder_methods[&OBD_CHANNEL_ID][&0x0C];
        assert_eq!(method.format.message_id, 0x0C);
        assert_eq!(method.format.signals[0].size_in_bits, 16);
    }

    #[test]
    fn test_partial_signal_resolves_to_complex_descriptor() {
        let mut catalog = SignalCatalog::new();
        catalog
            .add_complex_signal(
                20,
                ComplexSignalDecoderFormat {
                    interface_id: "uds0".to_string(),
                    message_id: "Image".to_string(),
                    root_type_id: 1,
                },
            )
            .unwrap();
        catalog
            .add_complex_data_type(
                1,
                ComplexDataType::Primitive(PrimitiveData {
                    primitive_type: PrimitiveType::Uint8,
                    scaling: 1.0,
                    offset: 0.0,
                }),
            )
            .unwrap();
        let translator = CanIdTranslator::new();
        let extractor = DictionaryExtractor::new(&catalog, &translator);

        let partial_id = PARTIAL_SIGNAL_ID_BITMASK | 3;
        let scheme = CollectionSchemeData::new().add_partial_signal(partial_id, 20, vec![0, 1]);
        let dictionaries = extractor.extract(&[&scheme]);

        let dictionary = dictionaries[&VehicleDataProtocol::ComplexData]
            .as_ref()
            .and_then(|dictionary| dictionary.as_complex_data())
            .unwrap();
        let descriptor = dictionary.decoder_method("uds0", "Image").unwrap();
        assert_eq!(descriptor.signal_id, 20);
        assert!(!descriptor.collect_raw);
        assert_eq!(descriptor.signal_paths.len(), 1);
        assert_eq!(descriptor.signal_paths[0].partial_signal_id, partial_id);
        assert_eq!(descriptor.signal_paths[0].signal_path, vec![0, 1]);
    }

    #[test]
    fn test_configured_budget_limits_type_traversal() {
        let mut catalog = SignalCatalog::new();
        catalog
            .add_complex_signal(
                20,
                ComplexSignalDecoderFormat {
                    interface_id: "uds0".to_string(),
                    message_id: "Image".to_string(),
                    root_type_id: 1,
                },
            )
            .unwrap();
        catalog
            .add_complex_data_type(
                1,
                ComplexDataType::Struct(ComplexStruct {
                    ordered_type_ids: vec![2],
                }),
            )
            .unwrap();
        catalog
            .add_complex_data_type(
                2,
                ComplexDataType::Primitive(PrimitiveData {
                    primitive_type: PrimitiveType::Uint8,
                    scaling: 1.0,
                    offset: 0.0,
                }),
            )
            .unwrap();
        let translator = CanIdTranslator::new();
        let config = ExtractorConfig::new().with_max_complex_types(1);
        let extractor = DictionaryExtractor::with_config(&catalog, &translator, config);

        let scheme = CollectionSchemeData::new().add_signal(20);
        let dictionaries = extractor.extract(&[&scheme]);

        let descriptor = dictionaries[&VehicleDataProtocol::ComplexData]
            .as_ref()
            .and_then(|dictionary| dictionary.as_complex_data())
            .and_then(|dictionary| dictionary.decoder_method("uds0", "Image"))
            .unwrap();
        // A budget of one pop resolves the root type only
        assert_eq!(descriptor.type_map.len(), 1);
        assert!(descriptor.type_map.contains_key(&1));
    }

    #[test]
    fn test_empty_interface_id_leaves_descriptor_out() {
        let mut catalog = SignalCatalog::new();
        catalog
            .add_complex_signal(
                21,
                ComplexSignalDecoderFormat {
                    interface_id: String::new(),
                    message_id: "Image".to_string(),
                    root_type_id: 1,
                },
            )
            .unwrap();
        let translator = CanIdTranslator::new();
        let extractor = DictionaryExtractor::new(&catalog, &translator);

        let scheme = CollectionSchemeData::new().add_signal(21);
        let dictionaries = extractor.extract(&[&scheme]);

        // The dictionary is created when the protocol resolves, but the
        // signal itself is skipped
        let dictionary = dictionaries[&VehicleDataProtocol::ComplexData]
            .as_ref()
            .and_then(|dictionary| dictionary.as_complex_data())
            .unwrap();
        assert!(dictionary.decoder_methods.is_empty());
    }

    #[test]
    fn test_raw_frames_without_signals() {
        let catalog = can_catalog();
        let translator = translator_for(&["can0"]);
        let extractor = DictionaryExtractor::new(&catalog, &translator);

        let scheme = CollectionSchemeData::new().add_raw_frame("can0", SPEED_FRAME);
        let dictionaries = extractor.extract(&[&scheme]);

        let dictionary = dictionaries[&VehicleDataProtocol::RawSocket]
            .as_ref()
            .and_then(|dictionary| dictionary.as_frame_oriented())
            .unwrap();
        assert!(dictionary.signal_ids_to_collect.is_empty());
        assert_eq!(
            dictionary.decoder_methods[&0][&SPEED_FRAME].collect_type,
            CanMessageCollectType::Raw
        );
    }

    #[test]
    fn test_raw_frame_with_unknown_interface_still_creates_dictionary() {
        let catalog = can_catalog();
        let translator = translator_for(&["can0"]);
        let extractor = DictionaryExtractor::new(&catalog, &translator);

        let scheme = CollectionSchemeData::new().add_raw_frame("vcan9", SPEED_FRAME);
        let dictionaries = extractor.extract(&[&scheme]);

        // The frame-oriented dictionary exists but holds no entry
        let dictionary = dictionaries[&VehicleDataProtocol::RawSocket]
            .as_ref()
            .and_then(|dictionary| dictionary.as_frame_oriented())
            .unwrap();
        assert!(dictionary.decoder_methods.is_empty());
    }

    #[test]
    fn test_signals_from_multiple_schemes_are_merged() {
        let catalog = can_catalog();
        let translator = translator_for(&["can0", "can1"]);
        let extractor = DictionaryExtractor::new(&catalog, &translator);

        let first = CollectionSchemeData::new().add_signal(SPEED_SIGNAL);
        let second = CollectionSchemeData::new()
            .add_signal(RPM_SIGNAL)
            .add_raw_frame("can0", SPEED_FRAME);
        let dictionaries = extractor.extract(&[&first, &second]);

        let dictionary = dictionaries[&VehicleDataProtocol::RawSocket]
            .as_ref()
            .and_then(|dictionary| dictionary.as_frame_oriented())
            .unwrap();
        assert_eq!(dictionary.signal_ids_to_collect.len(), 2);
        // Raw request from the second scheme escalates the first scheme's entry
        assert_eq!(
            dictionary.decoder_methods[&0][&SPEED_FRAME].collect_type,
            CanMessageCollectType::RawAndDecode
        );
        assert_eq!(
            dictionary.decoder_methods[&1][&RPM_FRAME].collect_type,
            CanMessageCollectType::Decode
        );
    }
}
