/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rim_common_verifier::{AlgorithmId, CryptoVerifier, PcrReplay, RimError};
use tcg_event_log::event::builder::{
    crtm_version_content, image_load_content, signature_list_content, uefi_variable_content,
};
use tcg_event_log::{EventLog, EventLogBuilder, EventType, LogFormat, TpmEventLog};

const EV_POST_CODE: u32 = 0x00000001;
const EV_SEPARATOR: u32 = 0x00000004;
const EV_S_CRTM_VERSION: u32 = 0x00000008;
const EV_EFI_VARIABLE_DRIVER_CONFIG: u32 = 0x80000001;
const EV_EFI_BOOT_SERVICES_APPLICATION: u32 = 0x80000003;
const EV_EFI_ACTION: u32 = 0x80000007;

fn sample_builder(banks: &[AlgorithmId]) -> EventLogBuilder {
    EventLogBuilder::crypto_agile(banks)
        .startup_locality(3)
        .measure(0, EV_S_CRTM_VERSION, &crtm_version_content("1.00"))
        .unwrap()
        .measure(0, EV_POST_CODE, b"ACPI DATA")
        .unwrap()
        .measure(7, EV_EFI_VARIABLE_DRIVER_CONFIG, &uefi_variable_content("SecureBoot", &[1]))
        .unwrap()
        .measure(7, EV_EFI_VARIABLE_DRIVER_CONFIG, &uefi_variable_content("db", &signature_list_content(
            "77fa9abd-0359-4d32-bd60-28f4e78f784b",
            &[[0x11; 32], [0x22; 32]],
        )))
        .unwrap()
        .measure(4, EV_EFI_BOOT_SERVICES_APPLICATION, &image_load_content("\\EFI\\BOOT\\shimx64.efi"))
        .unwrap()
        .measure(4, EV_SEPARATOR, &[0, 0, 0, 0])
        .unwrap()
}

// ===========================================================================
// Format detection and bank selection
// ===========================================================================

/// Test Objective: decode a crypto-agile log and select the preferred bank
/// Expected Result: every record decoded in order with SHA-256 digests
#[test]
fn test_decode_crypto_agile_log_with_preferred_bank() {
    let bytes = sample_builder(&[AlgorithmId::Sha1, AlgorithmId::Sha256]).build();
    let log = EventLog::decode(&bytes, AlgorithmId::Sha256).unwrap();

    assert_eq!(log.format, LogFormat::CryptoAgile);
    assert_eq!(log.algorithm, AlgorithmId::Sha256);
    assert_eq!(log.locality, Some(3));
    assert_eq!(log.len(), 8);
    for (i, event) in log.events().iter().enumerate() {
        assert_eq!(event.event_number as usize, i);
        assert!(!event.error);
    }

    let post_code = log.event_by_number(3).unwrap();
    assert_eq!(post_code.event_type, EventType::EvPostCode);
    assert_eq!(post_code.digest, CryptoVerifier::digest(&AlgorithmId::Sha256, b"ACPI DATA").unwrap());
    assert_eq!(post_code.digests.len(), 2);
    assert_eq!(post_code.content_str, "ACPI DATA");
}

/// Test Objective: preferred bank absent from the header
/// Expected Result: first listed bank is used
#[test]
fn test_decode_when_preferred_bank_missing_then_first_listed() {
    let bytes = sample_builder(&[AlgorithmId::Sha384, AlgorithmId::Sha1]).build();
    let log = EventLog::decode(&bytes, AlgorithmId::Sha256).unwrap();
    assert_eq!(log.algorithm, AlgorithmId::Sha384);
    assert_eq!(log.event_by_number(2).unwrap().digest.len(), 48);
}

/// Test Objective: decode a legacy SHA-1 log
/// Expected Result: SHA-1 digests regardless of preference, numbering starts at 0
#[test]
fn test_decode_legacy_sha1_log() {
    let bytes = EventLogBuilder::legacy()
        .measure(0, EV_POST_CODE, b"POST CODE")
        .unwrap()
        .measure(4, EV_EFI_ACTION, b"Calling EFI Application from Boot Option")
        .unwrap()
        .build();
    let log = EventLog::decode(&bytes, AlgorithmId::Sha256).unwrap();

    assert_eq!(log.format, LogFormat::LegacySha1);
    assert_eq!(log.algorithm, AlgorithmId::Sha1);
    assert_eq!(log.len(), 2);
    assert_eq!(log.events()[0].event_number, 0);
    assert_eq!(log.events()[1].content_str, "Calling EFI Application from Boot Option");
    assert_eq!(log.events()[1].digest, CryptoVerifier::digest(&AlgorithmId::Sha1, b"Calling EFI Application from Boot Option").unwrap());
}

/// Test Objective: base64 input path
/// Expected Result: identical to decoding the raw bytes
#[test]
fn test_from_base64_matches_decode() {
    let bytes = sample_builder(&[AlgorithmId::Sha256]).build();
    let log = EventLog::from_base64(&BASE64.encode(&bytes), AlgorithmId::Sha256).unwrap();
    assert_eq!(log.len(), EventLog::decode(&bytes, AlgorithmId::Sha256).unwrap().len());

    let err = EventLog::from_base64("not base64!!", AlgorithmId::Sha256).unwrap_err();
    assert!(matches!(err, RimError::InputError(_)));
}

// ===========================================================================
// Malformed logs
// ===========================================================================

/// Test Objective: empty buffer
/// Expected Result: MalformedLog
#[test]
fn test_decode_when_empty_then_malformed() {
    assert!(matches!(EventLog::decode(&[], AlgorithmId::Sha256), Err(RimError::MalformedLog(_))));
}

/// Test Objective: record truncated in the middle of its content
/// Expected Result: MalformedLog, no partial result
#[test]
fn test_decode_when_truncated_then_malformed() {
    let mut bytes = sample_builder(&[AlgorithmId::Sha256]).build();
    bytes.truncate(bytes.len() - 2);
    assert!(matches!(EventLog::decode(&bytes, AlgorithmId::Sha256), Err(RimError::MalformedLog(_))));
}

/// Test Objective: record size larger than the remaining buffer
/// Expected Result: MalformedLog naming the size
#[test]
fn test_decode_when_event_size_exceeds_buffer_then_malformed() {
    let mut bytes = EventLogBuilder::legacy().measure(0, EV_POST_CODE, b"abc").unwrap().build();
    // event size field follows pcr index, type and the 20 byte digest
    bytes[28..32].copy_from_slice(&1000u32.to_le_bytes());
    match EventLog::decode(&bytes, AlgorithmId::Sha1) {
        Err(RimError::MalformedLog(msg)) => assert!(msg.contains("exceeds remaining data")),
        other => panic!("unexpected result {:?}", other.map(|l| l.len())),
    }
}

/// Test Objective: first record is EV_NO_ACTION with an unknown signature
/// Expected Result: MalformedLog
#[test]
fn test_decode_when_header_signature_unknown_then_malformed() {
    let bytes = EventLogBuilder::legacy()
        .record(0, 3, vec![(AlgorithmId::Sha1, vec![0; 20])], b"Bogus Header 99\0\0\0\0\0")
        .build();
    assert!(matches!(EventLog::decode(&bytes, AlgorithmId::Sha1), Err(RimError::MalformedLog(_))));
}

/// Test Objective: crypto-agile record lacking the selected bank
/// Expected Result: MalformedLog
#[test]
fn test_decode_when_record_misses_selected_bank_then_malformed() {
    let bytes = EventLogBuilder::crypto_agile(&[AlgorithmId::Sha1, AlgorithmId::Sha256])
        .record(0, EV_POST_CODE, vec![(AlgorithmId::Sha1, vec![0xAA; 20])], b"POST")
        .build();
    assert!(matches!(EventLog::decode(&bytes, AlgorithmId::Sha256), Err(RimError::MalformedLog(_))));
    assert!(EventLog::decode(&bytes, AlgorithmId::Sha1).is_ok());
}

/// Test Objective: well framed record whose payload does not parse
/// Expected Result: decode succeeds and the raw payload is kept
#[test]
fn test_decode_when_content_unparseable_then_raw_content_kept() {
    let bytes = EventLogBuilder::crypto_agile(&[AlgorithmId::Sha256])
        .measure(7, EV_EFI_VARIABLE_DRIVER_CONFIG, &[0x01, 0x02, 0x03])
        .unwrap()
        .build();
    let log = EventLog::decode(&bytes, AlgorithmId::Sha256).unwrap();
    let event = log.event_by_number(1).unwrap();
    assert!(matches!(event.event, TpmEventLog::EventBase(ref raw) if raw == &vec![0x01, 0x02, 0x03]));
    assert_eq!(event.content_str, "010203");
}

// ===========================================================================
// Content rendering
// ===========================================================================

/// Test Objective: rendered content exposes the stable phrases
/// Expected Result: variable, CRTM and image names appear in the text
#[test]
fn test_rendered_content_of_sample_log() {
    let log = EventLog::decode(&sample_builder(&[AlgorithmId::Sha256]).build(), AlgorithmId::Sha256).unwrap();
    let contents: Vec<&str> = log.events().iter().map(|e| e.content_str()).collect();

    assert_eq!(contents[2], "S-CRTM Version: 1.00");
    assert!(contents[4].starts_with("Variable Name:SecureBoot\nUEFI_GUID = 8be4df61-93ca-11d2-aa0d-00e098032b8c\n"));
    assert!(contents[4].contains("Secure Boot is enabled"));
    assert!(contents[5].contains("variable named db holds 1 signature list(s) and 2 signature(s)"));
    assert!(contents[6].contains("\\EFI\\BOOT\\shimx64.efi"));
}

// ===========================================================================
// PCR replay and serialization
// ===========================================================================

/// Test Objective: expected PCR values from replay
/// Expected Result: 24 values, PCR0 seeded with locality, untouched PCRs at initial values
#[test]
fn test_expected_pcr_values_replays_selected_bank() {
    let log = EventLog::decode(&sample_builder(&[AlgorithmId::Sha256]).build(), AlgorithmId::Sha256).unwrap();
    let pcrs = log.expected_pcr_values().unwrap();
    assert_eq!(pcrs.len(), 24);

    let mut initial = vec![0u8; 32];
    initial[31] = 3;
    let crtm = CryptoVerifier::digest(&AlgorithmId::Sha256, &crtm_version_content("1.00")).unwrap();
    let post = CryptoVerifier::digest(&AlgorithmId::Sha256, b"ACPI DATA").unwrap();
    let pcr0 = PcrReplay::replay(&AlgorithmId::Sha256, &initial, [crtm.as_slice(), post.as_slice()]).unwrap();
    assert_eq!(pcrs[0], hex::encode(pcr0));

    assert_eq!(pcrs[1], "0".repeat(64));
    assert_eq!(pcrs[17], "f".repeat(64));
}

/// Test Objective: JSON view of the log
/// Expected Result: one object per event carrying type name, digest and content
#[test]
fn test_to_json_value_lists_events() {
    let log = EventLog::decode(&sample_builder(&[AlgorithmId::Sha256]).build(), AlgorithmId::Sha256).unwrap();
    let json = log.to_json_value().unwrap();
    let events = json.as_array().unwrap();
    assert_eq!(events.len(), log.len());
    assert_eq!(events[0]["event_type"], "EV_NO_ACTION");
    assert_eq!(events[3]["digest"]["hash_id"], "sha256");
    assert_eq!(events[3]["content"], "ACPI DATA");
    assert_eq!(events[3]["error"], false);
}
