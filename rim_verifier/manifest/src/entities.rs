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

//! Decoded RIM records handed to the engine by the persistence and XML binding layers.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use config_manager::types::EngineConfig;
use openssl::x509::X509;
use rim_common_verifier::{AlgorithmId, RimError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tcg_event_log::EventLog;
use uuid::Uuid;

use crate::xmldsig::RimSignature;

/// `use` attribute of a SWID link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkUse {
    Required,
    Recommended,
    Optional,
}

impl FromStr for LinkUse {
    type Err = RimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" => Ok(LinkUse::Required),
            "recommended" => Ok(LinkUse::Recommended),
            "optional" => Ok(LinkUse::Optional),
            other => Err(RimError::InputError(format!("Unknown link use: {}", other))),
        }
    }
}

/// `ownership` attribute of a SWID link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkOwnership {
    Abandon,
    Private,
    Shared,
}

impl FromStr for LinkOwnership {
    type Err = RimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abandon" => Ok(LinkOwnership::Abandon),
            "private" => Ok(LinkOwnership::Private),
            "shared" => Ok(LinkOwnership::Shared),
            other => Err(RimError::InputError(format!("Unknown link ownership: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RimLink {
    pub href: String,
    pub rel: String,
    pub artifact: Option<String>,
    pub media: Option<String>,
    pub media_type: Option<String>,
    pub ownership: Option<LinkOwnership>,
    pub link_use: Option<LinkUse>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwidIdentity {
    pub name: String,
    pub version: String,
    pub tag_version: String,
    pub corpus: bool,
    pub patch: bool,
    pub supplemental: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RimEntity {
    pub name: String,
    pub reg_id: String,
    pub role: String,
    pub thumbprint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub manufacturer: String,
    pub manufacturer_id: String,
    pub model: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadMetadata {
    pub payload_type: String,
    pub colloquial_version: String,
    pub edition: String,
    pub product: String,
    pub revision: String,
    pub binding_spec: String,
    pub binding_spec_version: String,
    pub pc_uri_global: String,
    pub pc_uri_local: String,
}

/// A payload file a Base RIM vouches for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwidResource {
    pub name: String,
    pub size: Option<u64>,
    pub hash_value: String,
    /// Digest algorithm of `hash_value`; the configured support hash algorithm when absent.
    pub hash_algorithm: Option<String>,
    pub rim_format: Option<String>,
    pub rim_type: Option<String>,
    pub rim_uri_global: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseRim {
    pub id: Uuid,
    pub tag_id: String,
    pub hex_hash: String,
    pub rim_type: String,
    pub file_name: String,
    pub swid: SwidIdentity,
    pub entity: RimEntity,
    pub link: RimLink,
    pub platform: PlatformInfo,
    pub payload: PayloadMetadata,
    pub rim_link_hash: Option<String>,
    pub associated_rim: Option<Uuid>,
    pub resources: Vec<SwidResource>,
    pub signature: Option<RimSignature>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportRim {
    pub id: Uuid,
    pub tag_id: String,
    pub hex_hash: String,
    pub rim_type: String,
    pub file_name: String,
    pub platform_manufacturer: String,
    pub device_name: Option<String>,
    pub swid_patch: bool,
    pub swid_supplemental: bool,
    pub associated_rim: Option<Uuid>,
    pub rim_bytes: Vec<u8>,
}

impl SupportRim {
    /// A support RIM that is neither a patch nor a supplemental overlay.
    pub fn is_base_support(&self) -> bool {
        !self.swid_patch && !self.swid_supplemental
    }

    pub fn event_log(&self, config: &EngineConfig) -> Result<EventLog, RimError> {
        EventLog::decode(&self.rim_bytes, preferred_algorithm(config)?)
    }
}

/// A live event log uploaded by a device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurement {
    pub id: Uuid,
    pub device_name: Option<String>,
    pub hex_hash: String,
    pub rim_type: String,
    pub rim_bytes: Vec<u8>,
    pub overall_validation_result: String,
}

impl Measurement {
    pub fn event_log(&self, config: &EngineConfig) -> Result<EventLog, RimError> {
        EventLog::decode(&self.rim_bytes, preferred_algorithm(config)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDigestValue {
    pub id: Uuid,
    pub base_rim_id: Option<Uuid>,
    pub support_rim_id: Option<Uuid>,
    pub manufacturer: String,
    pub model: String,
    pub pcr_index: u32,
    pub digest_value: String,
    pub event_type: String,
    pub match_fail: bool,
    pub patched: bool,
    pub updated: bool,
}

/// A supply chain CA certificate. `encoded` may hold PEM, bare base64 or DER.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateRecord {
    pub id: Uuid,
    pub encoded: Vec<u8>,
}

impl CertificateRecord {
    pub fn new(id: Uuid, encoded: impl Into<Vec<u8>>) -> Self {
        Self { id, encoded: encoded.into() }
    }

    pub fn x509(&self) -> Result<X509, RimError> {
        parse_certificate(&self.encoded)
            .map_err(|e| RimError::CertificateError(format!("Certificate {}: {}", self.id, e)))
    }

    /// DER encoded SubjectPublicKeyInfo of the certificate.
    pub fn encoded_public_key(&self) -> Result<Vec<u8>, RimError> {
        let cert = self.x509()?;
        public_key_der(&cert)
    }

    pub fn subject_key_identifier(&self) -> Result<Option<Vec<u8>>, RimError> {
        Ok(self.x509()?.subject_key_id().map(|ski| ski.as_slice().to_vec()))
    }
}

/// Parses PEM, bare base64 or DER certificate bytes.
pub fn parse_certificate(encoded: &[u8]) -> Result<X509, RimError> {
    if let Ok(cert) = X509::from_pem(encoded) {
        return Ok(cert);
    }
    let compact: Vec<u8> = encoded.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
    if let Ok(der) = BASE64.decode(&compact) {
        if let Ok(cert) = X509::from_der(&der) {
            return Ok(cert);
        }
    }
    X509::from_der(encoded).map_err(|e| RimError::CertificateError(format!("Unparseable certificate: {}", e)))
}

pub fn public_key_der(cert: &X509) -> Result<Vec<u8>, RimError> {
    cert.public_key()
        .and_then(|key| key.public_key_to_der())
        .map_err(|e| RimError::CertificateError(format!("Failed to read certificate public key: {}", e)))
}

pub fn preferred_algorithm(config: &EngineConfig) -> Result<AlgorithmId, RimError> {
    config.preferred_digest_algorithm.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_use_from_str() {
        assert_eq!("Required".parse::<LinkUse>().unwrap(), LinkUse::Required);
        assert_eq!(" optional ".parse::<LinkUse>().unwrap(), LinkUse::Optional);
        assert!("sometimes".parse::<LinkUse>().is_err());
        assert_eq!("shared".parse::<LinkOwnership>().unwrap(), LinkOwnership::Shared);
    }

    #[test]
    fn test_base_support_flags() {
        let mut support = SupportRim::default();
        assert!(support.is_base_support());
        support.swid_patch = true;
        assert!(!support.is_base_support());
        support.swid_patch = false;
        support.swid_supplemental = true;
        assert!(!support.is_base_support());
    }

    #[test]
    fn test_garbage_certificate_is_rejected() {
        let record = CertificateRecord::new(Uuid::new_v4(), b"not a certificate".to_vec());
        assert!(matches!(record.x509(), Err(RimError::CertificateError(_))));
    }
}
