//! Standalone decoder dictionary extraction demo
//!
//! Builds a small signal catalog (CAN, OBD and one complex vision signal),
//! runs an extraction pass over two collection schemes and shows the
//! resulting per-protocol dictionaries, first as a walkthrough and then as
//! JSON.
//!
//! Usage:
//!   cargo run --example extract_dictionary
//!
//! Set RUST_LOG=debug to watch the extraction and publication steps.

use decoder_dictionary::{
    CanIdTranslator, CanMessageFormat, CanSignalFormat, CollectionSchemeData, ComplexArray,
    ComplexDataType, ComplexSignalDecoderFormat, ComplexStruct, DecoderDictionary,
    DictionaryExtractor, DictionaryListener, DictionaryPublisher, PidSignalDecoderFormat,
    PrimitiveData, PrimitiveType, SignalCatalog, VehicleDataProtocol, PARTIAL_SIGNAL_ID_BITMASK,
};
use std::sync::Arc;

// Signal ids used by the demo catalog
const VEHICLE_SPEED: u32 = 1;
const BRAKE_PRESSURE: u32 = 2;
const ENGINE_RPM: u32 = 10;
const FRONT_CAMERA_IMAGE: u32 = 20;

const SPEED_FRAME: u32 = 0x123;

fn build_catalog() -> decoder_dictionary::Result<SignalCatalog> {
    let mut catalog = SignalCatalog::new();

    // Two CAN signals sharing one frame on can0
    catalog.add_can_signal(VEHICLE_SPEED, SPEED_FRAME, "can0")?;
    catalog.add_can_signal(BRAKE_PRESSURE, SPEED_FRAME, "can0")?;
    catalog.add_can_message_format(
        SPEED_FRAME,
        "can0",
        CanMessageFormat {
            message_id: SPEED_FRAME,
            size_in_bytes: 8,
            signals: vec![
                CanSignalFormat {
                    signal_id: VEHICLE_SPEED,
                    first_bit_position: 0,
                    size_in_bits: 16,
                    factor: 0.01,
                    ..Default::default()
                },
                CanSignalFormat {
                    signal_id: BRAKE_PRESSURE,
                    first_bit_position: 16,
                    size_in_bits: 8,
                    factor: 1.0,
                    ..Default::default()
                },
            ],
        },
    );

    // Standard OBD engine speed (PID 0x0C, two bytes, value = raw / 4)
    catalog.add_pid_signal(
        ENGINE_RPM,
        PidSignalDecoderFormat {
            pid: 0x0C,
            pid_response_length: 2,
            service_mode: 1,
            scaling: 0.25,
            offset: 0.0,
            start_byte: 0,
            byte_length: 2,
            bit_right_shift: 0,
            bit_mask_length: 8,
        },
    )?;

    // A camera image: struct Image { width: u32, pixels: Pixel[64] },
    // struct Pixel { r: u8, g: u8, b: u8 }
    catalog.add_complex_signal(
        FRONT_CAMERA_IMAGE,
        ComplexSignalDecoderFormat {
            interface_id: "ros2".to_string(),
            message_id: "ImageTopic:sensor_msgs/msg/Image".to_string(),
            root_type_id: 100,
        },
    )?;
    catalog.add_complex_data_type(
        100,
        ComplexDataType::Struct(ComplexStruct {
            ordered_type_ids: vec![101, 102],
        }),
    )?;
    catalog.add_complex_data_type(
        101,
        ComplexDataType::Primitive(PrimitiveData {
            primitive_type: PrimitiveType::Uint32,
            scaling: 1.0,
            offset: 0.0,
        }),
    )?;
    catalog.add_complex_data_type(
        102,
        ComplexDataType::Array(ComplexArray {
            size: 64,
            repeated_type_id: 103,
        }),
    )?;
    catalog.add_complex_data_type(
        103,
        ComplexDataType::Struct(ComplexStruct {
            ordered_type_ids: vec![104, 104, 104],
        }),
    )?;
    catalog.add_complex_data_type(
        104,
        ComplexDataType::Primitive(PrimitiveData {
            primitive_type: PrimitiveType::Uint8,
            scaling: 1.0,
            offset: 0.0,
        }),
    )?;

    Ok(catalog)
}

/// Listener that prints every dictionary update it receives
struct PrintingListener;

impl DictionaryListener for PrintingListener {
    fn on_dictionary_changed(
        &self,
        dictionary: Option<Arc<DecoderDictionary>>,
        protocol: VehicleDataProtocol,
    ) {
        match dictionary {
            Some(_) => println!("  listener: new dictionary for {}", protocol),
            None => println!("  listener: {} disabled", protocol),
        }
    }
}

fn print_dictionary(protocol: VehicleDataProtocol, dictionary: &DecoderDictionary) {
    match dictionary {
        DecoderDictionary::FrameOriented(frame_dictionary) => {
            println!(
                "{}: {} signals to collect, {} channel(s)",
                protocol,
                frame_dictionary.signal_ids_to_collect.len(),
                frame_dictionary.decoder_methods.len()
            );
            for (channel_id, frames) in &frame_dictionary.decoder_methods {
                for (frame_id, method) in frames {
                    println!(
                        "  channel {} frame 0x{:03X}: {:?}, {} signal layout(s)",
                        channel_id,
                        frame_id,
                        method.collect_type,
                        method.format.signals.len()
                    );
                }
            }
        }
        DecoderDictionary::ComplexData(complex_dictionary) => {
            println!(
                "{}: {} interface(s)",
                protocol,
                complex_dictionary.decoder_methods.len()
            );
            for (interface_id, messages) in &complex_dictionary.decoder_methods {
                for (message_id, descriptor) in messages {
                    println!(
                        "  {} / {}: collect_raw={}, {} path(s), {} type(s)",
                        interface_id,
                        message_id,
                        descriptor.collect_raw,
                        descriptor.signal_paths.len(),
                        descriptor.type_map.len()
                    );
                }
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Decoder Dictionary Extraction ===\n");

    let catalog = build_catalog()?;
    let stats = catalog.stats();
    println!("=== SIGNAL CATALOG ===");
    println!("CAN signals: {}", stats.num_can_signals);
    println!("OBD signals: {}", stats.num_pid_signals);
    println!("Complex signals: {}", stats.num_complex_signals);
    println!("Complex types: {}", stats.num_complex_types);
    println!();

    let mut translator = CanIdTranslator::new();
    translator.add("can0");
    translator.add("can1");

    // Scheme 1: decode the speed frame signals and also keep its raw bytes
    let cruise_scheme = CollectionSchemeData::new()
        .add_signal(VEHICLE_SPEED)
        .add_signal(BRAKE_PRESSURE)
        .add_signal(ENGINE_RPM)
        .add_raw_frame("can0", SPEED_FRAME);

    // Scheme 2: the image width (member 0 of the Image struct) plus the
    // whole image as a raw payload
    let camera_scheme = CollectionSchemeData::new()
        .add_partial_signal(PARTIAL_SIGNAL_ID_BITMASK | 1, FRONT_CAMERA_IMAGE, vec![0])
        .add_partial_signal(PARTIAL_SIGNAL_ID_BITMASK | 2, FRONT_CAMERA_IMAGE, vec![]);

    let extractor = DictionaryExtractor::new(&catalog, &translator);
    let dictionaries = extractor.extract(&[&cruise_scheme, &camera_scheme]);

    println!("=== EXTRACTED DICTIONARIES ===");
    for (protocol, dictionary) in &dictionaries {
        match dictionary {
            Some(dictionary) => print_dictionary(*protocol, dictionary),
            None => println!("{}: disabled (no signals requested)", protocol),
        }
    }
    println!();

    println!("=== AS JSON ===");
    println!("{}", serde_json::to_string_pretty(&dictionaries)?);
    println!();

    println!("=== PUBLISHING ===");
    let mut publisher = DictionaryPublisher::new();
    publisher.subscribe(Arc::new(PrintingListener));
    let _shared = publisher.publish(dictionaries);

    Ok(())
}
