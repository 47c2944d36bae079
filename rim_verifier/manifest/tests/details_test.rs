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

mod common;

use common::{
    base_rim, issued_by, measurement, platform_log, platform_log_builder, root_ca, sign_rim, support_rim,
    InMemoryRimStore, MockStore, StaticCertificates, EV_POST_CODE,
};
use config_manager::types::EngineConfig;
use rim_common_verifier::{AlgorithmId, RimError};
use rim_manifest::entities::ReferenceDigestValue;
use rim_manifest::{PersistResult, RimDetails, RimDetailsService};
use serde_json::{json, Value};
use std::sync::Mutex;
use tcg_event_log::EventLog;
use uuid::Uuid;

const SUMMARY_FIELDS: [&str; 14] = [
    "crtm",
    "bootManager",
    "osLoader",
    "osKernel",
    "acpiTables",
    "smbiosTables",
    "gptTable",
    "bootOrder",
    "defaultBootDevice",
    "secureBoot",
    "pk",
    "kek",
    "sigDb",
    "forbiddenDbx",
];

// ==================== base RIM ====================

/// Test Objective: Base RIM without association, one support RIM of the same manufacturer whose
/// hash is declared as a resource
/// Expected Result: the link is resolved and persisted exactly once, the support hash validates and
/// the field map carries the PCR list
#[test]
fn test_base_rim_details_links_and_validates_support() {
    let support = support_rim(platform_log());
    let base = base_rim(&support);
    let store = InMemoryRimStore {
        bases: Mutex::new(vec![base.clone()]),
        supports: Mutex::new(vec![support.clone()]),
        ..Default::default()
    };
    let certificates = StaticCertificates(Vec::new());
    let config = EngineConfig::default();
    let service = RimDetailsService::new(&store, &certificates, &config);

    let RimDetails::Base(details) = service.rim_detail_info(&base.id).unwrap() else {
        panic!("expected base RIM details");
    };
    assert_eq!(details.link_persisted, PersistResult::Persisted);
    assert_eq!(details.validation.support_hash_valid, Some(true));
    assert_eq!(details.base.associated_rim, Some(support.id));

    let fields = details.to_field_map();
    assert_eq!(fields["supportRimHashValid"], json!(true));
    assert_eq!(fields["associatedRim"], json!(support.id));
    assert_eq!(fields["signatureValid"], json!(false));
    assert_eq!(fields["swidCorpus"], json!("False"));
    assert_eq!(fields["linkHrefLink"], json!(""));
    assert_eq!(fields["pcrList"].as_array().map(|a| a.len()), Some(24));
    assert!(!fields.contains_key("rimLinkId"));
    assert!(!fields.contains_key("linkHashValid"));
    assert!(!fields.contains_key("issuerID"));

    // resolved again: the link is read back, not written again
    let RimDetails::Base(again) = service.rim_detail_info(&base.id).unwrap() else {
        panic!("expected base RIM details");
    };
    assert_eq!(again.link_persisted, PersistResult::Unchanged);
    assert_eq!(store.persist_count(), 1);
}

/// Test Objective: Same scenario against a mocked store
/// Expected Result: the back-link persistence callback fires exactly once
#[test]
fn test_base_rim_details_persist_callback_called_once() {
    let support = support_rim(platform_log());
    let base = base_rim(&support);
    let mut store = MockStore::new();
    let (lookup, listed, candidate) = (base.clone(), base.clone(), support.clone());
    store.expect_base_rim_by_id().returning(move |_| Ok(Some(lookup.clone())));
    store.expect_base_rims().returning(move || Ok(vec![listed.clone()]));
    store.expect_support_rims_by_manufacturer().returning(move |_| Ok(vec![candidate.clone()]));
    let (base_id, support_id) = (base.id, support.id);
    store
        .expect_persist_base_link()
        .withf(move |b, s| *b == base_id && *s == support_id)
        .times(1)
        .returning(|_, _| Ok(()));
    let certificates = StaticCertificates(Vec::new());
    let config = EngineConfig::default();

    let details = RimDetailsService::new(&store, &certificates, &config).rim_detail_info(&base.id).unwrap();
    let fields = details.to_field_map();
    assert_eq!(fields["supportRimHashValid"], json!(true));
}

/// Test Objective: Verify the hash link, href link, signer fields and the patch rule for PCR values
/// Expected Result: rimLinkId and linkHashValid follow the hash lookup, linkHrefLink names the
/// referenced base RIM, pcrList is omitted for a patch base RIM
#[test]
fn test_base_rim_details_link_fields() {
    let root = root_ca("RIM Root CA");
    let signer = issued_by(&root, "RIM Signer", 7, false);
    let support = support_rim(platform_log());
    let mut linked = base_rim(&support);
    linked.tag_id = "linked-tag-0001".to_string();
    let mut base = base_rim(&support);
    base.swid.patch = true;
    base.link.href = "swid:linked-tag-0001".to_string();
    base.rim_link_hash = Some(linked.hex_hash.clone());
    base.associated_rim = Some(support.id);
    base.signature = Some(sign_rim(&signer, b"<SoftwareIdentity/>"));
    let mut missing = base.clone();
    missing.id = Uuid::new_v4();
    missing.rim_link_hash = Some("ff".repeat(32));
    let store = InMemoryRimStore {
        bases: Mutex::new(vec![linked.clone(), base.clone(), missing.clone()]),
        supports: Mutex::new(vec![support.clone()]),
        ..Default::default()
    };
    let signer_record = signer.record();
    let certificates = StaticCertificates(vec![root.record(), signer_record.clone()]);
    let config = EngineConfig::default();
    let service = RimDetailsService::new(&store, &certificates, &config);

    let fields = service.rim_detail_info(&base.id).unwrap().to_field_map();
    assert_eq!(fields["linkHrefLink"], json!(linked.id));
    assert_eq!(fields["linkHashValid"], json!(true));
    assert!(fields.contains_key("rimLinkId"));
    assert_eq!(fields["swidPatch"], json!("True"));
    assert!(!fields.contains_key("pcrList"));
    assert_eq!(fields["signatureValid"], json!(true));
    assert_eq!(fields["issuerID"], json!(signer_record.id.to_string()));
    assert!(fields["skID"].is_string());

    let fields = service.rim_detail_info(&missing.id).unwrap().to_field_map();
    assert_eq!(fields["linkHashValid"], json!(false));
    assert!(!fields.contains_key("rimLinkId"));
}

/// Test Objective: Verify an unknown identifier
/// Expected Result: NotFound, distinct from other failures
#[test]
fn test_unknown_rim_is_not_found() {
    let store = InMemoryRimStore::default();
    let certificates = StaticCertificates(Vec::new());
    let config = EngineConfig::default();

    let result = RimDetailsService::new(&store, &certificates, &config).rim_detail_info(&Uuid::new_v4());
    assert!(matches!(result, Err(RimError::NotFound(_))));
}

// ==================== support RIM ====================

/// Test Objective: Verify support RIM details against the live log with the same hash
/// Expected Result: no event flagged, support fields and boot chain summary present
#[test]
fn test_support_rim_details() {
    let support = support_rim(platform_log());
    let mut owner = base_rim(&support);
    owner.associated_rim = Some(support.id);
    let live = measurement(platform_log());
    let store = InMemoryRimStore {
        bases: Mutex::new(vec![owner.clone()]),
        supports: Mutex::new(vec![support.clone()]),
        measurements: vec![live],
        ..Default::default()
    };
    let certificates = StaticCertificates(Vec::new());
    let config = EngineConfig::default();

    let RimDetails::Support(details) =
        RimDetailsService::new(&store, &certificates, &config).rim_detail_info(&support.id).unwrap()
    else {
        panic!("expected support RIM details");
    };
    assert_eq!(details.link_persisted, PersistResult::Persisted);
    assert!(details.measurement.is_some());
    assert!(details.events.iter().all(|e| !e.error));

    let fields = details.to_field_map();
    assert_eq!(fields["swidBase"], json!(true));
    assert_eq!(fields["swidPatch"], json!("False"));
    assert_eq!(fields["associatedRim"], json!(owner.id));
    assert_eq!(fields["tagId"], json!(support.tag_id));
    assert_eq!(fields["secureBoot"], json!(true));
    for field in SUMMARY_FIELDS {
        assert!(fields[field].is_boolean(), "missing {}", field);
    }
}

// ==================== measurement ====================

/// Test Objective: Verify measurement details with golden values and device support RIMs
/// Expected Result: golden events are excluded from livelogEvents, the base support RIM file
/// name is reported and the event type map covers every livelog event
#[test]
fn test_measurement_details() {
    let support_bytes = platform_log();
    let mut support = support_rim(support_bytes.clone());
    let base = base_rim(&support);
    support.associated_rim = Some(base.id);

    let live_bytes = platform_log_builder().measure(0, EV_POST_CODE, b"unexpected firmware").unwrap().build();
    let live_log = EventLog::decode(&live_bytes, AlgorithmId::Sha256).unwrap();
    let references: Vec<ReferenceDigestValue> = EventLog::decode(&support_bytes, AlgorithmId::Sha256)
        .unwrap()
        .events()
        .iter()
        .map(|e| ReferenceDigestValue {
            id: Uuid::new_v4(),
            base_rim_id: Some(base.id),
            digest_value: e.digest_hex(),
            ..Default::default()
        })
        .collect();
    let live = measurement(live_bytes);
    let store = InMemoryRimStore {
        bases: Mutex::new(vec![base.clone()]),
        supports: Mutex::new(vec![support.clone()]),
        measurements: vec![live.clone()],
        references,
        ..Default::default()
    };
    let certificates = StaticCertificates(Vec::new());
    let config = EngineConfig::default();

    let fields = RimDetailsService::new(&store, &certificates, &config)
        .rim_detail_info(&live.id)
        .unwrap()
        .to_field_map();
    assert_eq!(fields["supportFilename"], json!(support.file_name));
    assert_eq!(fields["supportId"], json!(support.id));
    assert_eq!(fields["associatedRim"], json!(base.id));
    assert_eq!(fields["hostName"], json!("host-01"));
    assert_eq!(fields["swidBase"], json!(true));

    let livelog = fields["livelogEvents"].as_array().unwrap();
    assert_eq!(livelog.len(), 1);
    let unexpected = live_log.events().last().unwrap();
    let event_type_map = fields["eventTypeMap"].as_object().unwrap();
    assert_eq!(event_type_map.len(), 1);
    assert!(event_type_map.contains_key(&unexpected.digest_hex()));
    assert_eq!(fields["events"].as_array().map(|a| a.len()), Some(live_log.len()));
}

/// Test Objective: Verify defaults when no support RIM is registered for the device
/// Expected Result: "Blank" file name, empty ids, no tagId and no eventTypeMap
#[test]
fn test_measurement_details_without_supports() {
    let live = measurement(platform_log());
    let store = InMemoryRimStore { measurements: vec![live.clone()], ..Default::default() };
    let certificates = StaticCertificates(Vec::new());
    let config = EngineConfig::default();

    let fields = RimDetailsService::new(&store, &certificates, &config)
        .rim_detail_info(&live.id)
        .unwrap()
        .to_field_map();
    assert_eq!(fields["supportFilename"], json!("Blank"));
    assert_eq!(fields["supportId"], json!(""));
    assert_eq!(fields["associatedRim"], json!(""));
    assert!(!fields.contains_key("tagId"));
    assert!(!fields.contains_key("eventTypeMap"));
    assert_eq!(fields["livelogEvents"], fields["events"]);
    assert_eq!(fields["validationResult"], Value::String("PASS".to_string()));
}

/// Test Objective: Verify the event type map is reported whenever the device has support RIMs
/// Expected Result: with a single undecodable support RIM the map is present and every livelog
/// event has an empty candidate list
#[test]
fn test_measurement_details_with_undecodable_support() {
    let support = support_rim(b"not an event log".to_vec());
    let live = measurement(platform_log());
    let store = InMemoryRimStore {
        supports: Mutex::new(vec![support]),
        measurements: vec![live.clone()],
        ..Default::default()
    };
    let certificates = StaticCertificates(Vec::new());
    let config = EngineConfig::default();

    let fields = RimDetailsService::new(&store, &certificates, &config)
        .rim_detail_info(&live.id)
        .unwrap()
        .to_field_map();
    let map = fields["eventTypeMap"].as_object().unwrap();
    assert!(!map.is_empty());
    assert!(map.values().all(|candidates| candidates.as_array().map_or(false, |c| c.is_empty())));
}
