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

//! Event log encoder.
//!
//! Produces binary logs in either layout from a list of records. Used to build reference
//! fixtures and by the test suites of the verifier crates.

use rim_common_verifier::{AlgorithmId, CryptoVerifier, RimError};
use uuid::Uuid;

use crate::event::model::{EventType, SPEC_ID_EVENT_SIGNATURE_03, STARTUP_LOCALITY_SIGNATURE};

const EFI_GLOBAL_VARIABLE: &str = "8be4df61-93ca-11d2-aa0d-00e098032b8c";
const EFI_IMAGE_SECURITY_DATABASE: &str = "d719b2cb-3d3a-4596-a3bc-dad00e67656f";

struct Record {
    pcr_index: u32,
    event_type: u32,
    digests: Vec<(AlgorithmId, Vec<u8>)>,
    content: Vec<u8>,
}

pub struct EventLogBuilder {
    /// Banks of a crypto-agile log, empty for a legacy SHA-1 log
    banks: Vec<AlgorithmId>,
    records: Vec<Record>,
}

impl EventLogBuilder {
    pub fn crypto_agile(banks: &[AlgorithmId]) -> Self {
        Self { banks: banks.to_vec(), records: Vec::new() }
    }

    pub fn legacy() -> Self {
        Self { banks: Vec::new(), records: Vec::new() }
    }

    pub fn startup_locality(mut self, locality: u8) -> Self {
        let mut content = STARTUP_LOCALITY_SIGNATURE.to_vec();
        content.push(locality);
        self.records.push(Record { pcr_index: 0, event_type: EventType::EvNoAction as u32, digests: Vec::new(), content });
        self
    }

    /// Adds a record whose digests are the hashes of `content` in every bank.
    pub fn measure(self, pcr_index: u32, event_type: u32, content: &[u8]) -> Result<Self, RimError> {
        let data = content.to_vec();
        self.measure_data(pcr_index, event_type, content, &data)
    }

    /// Adds a record whose digests are the hashes of `measured` rather than of its content.
    pub fn measure_data(mut self, pcr_index: u32, event_type: u32, content: &[u8], measured: &[u8]) -> Result<Self, RimError> {
        let digests = self
            .bank_list()
            .into_iter()
            .map(|alg| CryptoVerifier::digest(&alg, measured).map(|d| (alg, d)))
            .collect::<Result<Vec<_>, RimError>>()?;
        self.records.push(Record { pcr_index, event_type, digests, content: content.to_vec() });
        Ok(self)
    }

    /// Adds a record with explicit digests, one per bank.
    pub fn record(mut self, pcr_index: u32, event_type: u32, digests: Vec<(AlgorithmId, Vec<u8>)>, content: &[u8]) -> Self {
        self.records.push(Record { pcr_index, event_type, digests, content: content.to_vec() });
        self
    }

    fn bank_list(&self) -> Vec<AlgorithmId> {
        if self.banks.is_empty() {
            vec![AlgorithmId::Sha1]
        } else {
            self.banks.clone()
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if self.banks.is_empty() {
            for record in &self.records {
                out.extend(record.pcr_index.to_le_bytes());
                out.extend(record.event_type.to_le_bytes());
                let sha1 = record.digests.iter().find(|(a, _)| *a == AlgorithmId::Sha1).map(|(_, d)| d.clone());
                out.extend(sha1.unwrap_or_else(|| vec![0u8; 20]));
                push_content(&mut out, &record.content);
            }
            return out;
        }

        out.extend(0u32.to_le_bytes());
        out.extend((EventType::EvNoAction as u32).to_le_bytes());
        out.extend([0u8; 20]);
        push_content(&mut out, &self.spec_id_content());
        for record in &self.records {
            out.extend(record.pcr_index.to_le_bytes());
            out.extend(record.event_type.to_le_bytes());
            out.extend((record.digests.len() as u32).to_le_bytes());
            for (alg, digest) in &record.digests {
                out.extend((*alg as u16).to_le_bytes());
                out.extend(digest);
            }
            push_content(&mut out, &record.content);
        }
        out
    }

    fn spec_id_content(&self) -> Vec<u8> {
        let mut content = SPEC_ID_EVENT_SIGNATURE_03.to_vec();
        content.extend(0u32.to_le_bytes());
        // family 2.0, errata 0, UINTN of 8 bytes
        content.extend([0u8, 2, 0, 2]);
        content.extend((self.banks.len() as u32).to_le_bytes());
        for bank in &self.banks {
            content.extend((*bank as u16).to_le_bytes());
            content.extend((bank.digest_size() as u16).to_le_bytes());
        }
        content.push(0);
        content
    }
}

fn push_content(out: &mut Vec<u8>, content: &[u8]) {
    out.extend((content.len() as u32).to_le_bytes());
    out.extend_from_slice(content);
}

fn guid_bytes(guid: &str) -> [u8; 16] {
    Uuid::parse_str(guid).map(|g| g.to_bytes_le()).unwrap_or([0u8; 16])
}

fn ucs2(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|c| c.to_le_bytes()).collect()
}

/// UEFI_VARIABLE_DATA for a variable in the global or image security namespace.
pub fn uefi_variable_content(name: &str, data: &[u8]) -> Vec<u8> {
    let namespace = if matches!(name, "db" | "dbx") { EFI_IMAGE_SECURITY_DATABASE } else { EFI_GLOBAL_VARIABLE };
    let mut out = guid_bytes(namespace).to_vec();
    out.extend((name.encode_utf16().count() as u64).to_le_bytes());
    out.extend((data.len() as u64).to_le_bytes());
    out.extend(ucs2(name));
    out.extend_from_slice(data);
    out
}

/// EFI_SIGNATURE_LIST holding one SHA-256 entry per hash.
pub fn signature_list_content(owner: &str, hashes: &[[u8; 32]]) -> Vec<u8> {
    let signature_size: u32 = 16 + 32;
    let mut out = guid_bytes("c1c41626-504c-4092-aca9-41f936934328").to_vec();
    out.extend((28 + signature_size * hashes.len() as u32).to_le_bytes());
    out.extend(0u32.to_le_bytes());
    out.extend(signature_size.to_le_bytes());
    for hash in hashes {
        out.extend(guid_bytes(owner));
        out.extend(hash);
    }
    out
}

/// UEFI_IMAGE_LOAD_EVENT whose device path is a single file path node.
pub fn image_load_content(path: &str) -> Vec<u8> {
    let mut name = ucs2(path);
    name.extend([0, 0]);
    let mut device_path = vec![0x04, 0x04];
    device_path.extend(((name.len() + 4) as u16).to_le_bytes());
    device_path.extend(name);
    device_path.extend([0x7F, 0xFF, 0x04, 0x00]);

    let mut out = Vec::new();
    out.extend(0x1000_0000u64.to_le_bytes());
    out.extend(0x2000u64.to_le_bytes());
    out.extend(0u64.to_le_bytes());
    out.extend((device_path.len() as u64).to_le_bytes());
    out.extend(device_path);
    out
}

/// S-CRTM version as a UCS-2 string.
pub fn crtm_version_content(version: &str) -> Vec<u8> {
    let mut out = ucs2(version);
    out.extend([0, 0]);
    out
}
