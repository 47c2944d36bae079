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

#![allow(dead_code)]

use mockall::mock;
use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::{hash, MessageDigest};
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::sign::Signer;
use openssl::x509::extension::{BasicConstraints, SubjectKeyIdentifier};
use openssl::x509::{X509Builder, X509NameBuilder, X509};
use rim_common_verifier::{AlgorithmId, RimError};
use rim_manifest::entities::{BaseRim, CertificateRecord, Measurement, ReferenceDigestValue, SupportRim};
use rim_manifest::store::{CertificateStore, RimStore};
use rim_manifest::xmldsig::{RimSignature, SignatureReference, DIGEST_SHA256, RSA_SHA256};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tcg_event_log::event::builder::{
    crtm_version_content, image_load_content, signature_list_content, uefi_variable_content,
};
use tcg_event_log::EventLogBuilder;
use uuid::Uuid;

pub const EV_POST_CODE: u32 = 0x00000001;
pub const EV_SEPARATOR: u32 = 0x00000004;
pub const EV_S_CRTM_VERSION: u32 = 0x00000008;
pub const EV_EFI_VARIABLE_DRIVER_CONFIG: u32 = 0x80000001;
pub const EV_EFI_VARIABLE_BOOT: u32 = 0x80000002;
pub const EV_EFI_BOOT_SERVICES_APPLICATION: u32 = 0x80000003;

// ==================== event logs ====================

/// UEFI load option with an empty device path.
pub fn boot_option_content(description: &str) -> Vec<u8> {
    let mut option = Vec::new();
    option.extend_from_slice(&1u32.to_le_bytes());
    option.extend_from_slice(&4u16.to_le_bytes());
    for unit in description.encode_utf16().chain(std::iter::once(0)) {
        option.extend_from_slice(&unit.to_le_bytes());
    }
    option.extend_from_slice(&[0x7f, 0xff, 0x04, 0x00]);
    uefi_variable_content("Boot0000", &option)
}

/// A secure boot enabled platform booting shim, grub and a kernel.
pub fn platform_log_builder() -> EventLogBuilder {
    EventLogBuilder::crypto_agile(&[AlgorithmId::Sha1, AlgorithmId::Sha256])
        .measure(0, EV_S_CRTM_VERSION, &crtm_version_content("1.00"))
        .unwrap()
        .measure(7, EV_EFI_VARIABLE_DRIVER_CONFIG, &uefi_variable_content("SecureBoot", &[1]))
        .unwrap()
        .measure(7, EV_EFI_VARIABLE_DRIVER_CONFIG, &uefi_variable_content("PK", &signature_list_content(
            "77fa9abd-0359-4d32-bd60-28f4e78f784b",
            &[[0x01; 32]],
        )))
        .unwrap()
        .measure(7, EV_EFI_VARIABLE_DRIVER_CONFIG, &uefi_variable_content("KEK", &signature_list_content(
            "77fa9abd-0359-4d32-bd60-28f4e78f784b",
            &[[0x02; 32]],
        )))
        .unwrap()
        .measure(7, EV_EFI_VARIABLE_DRIVER_CONFIG, &uefi_variable_content("db", &signature_list_content(
            "77fa9abd-0359-4d32-bd60-28f4e78f784b",
            &[[0x03; 32]],
        )))
        .unwrap()
        .measure(7, EV_EFI_VARIABLE_DRIVER_CONFIG, &uefi_variable_content("dbx", &signature_list_content(
            "77fa9abd-0359-4d32-bd60-28f4e78f784b",
            &[[0x04; 32]],
        )))
        .unwrap()
        .measure(1, EV_EFI_VARIABLE_BOOT, &uefi_variable_content("BootOrder", &[0, 0, 1, 0]))
        .unwrap()
        .measure(1, EV_EFI_VARIABLE_BOOT, &boot_option_content("ubuntu"))
        .unwrap()
        .measure(4, EV_EFI_BOOT_SERVICES_APPLICATION, &image_load_content("\\EFI\\ubuntu\\shimx64.efi"))
        .unwrap()
        .measure(4, EV_EFI_BOOT_SERVICES_APPLICATION, &image_load_content("\\EFI\\ubuntu\\grubx64.efi"))
        .unwrap()
        .measure(4, EV_EFI_BOOT_SERVICES_APPLICATION, &image_load_content("\\boot\\vmlinuz-6.1"))
        .unwrap()
        .measure(7, EV_SEPARATOR, &[0, 0, 0, 0])
        .unwrap()
}

pub fn platform_log() -> Vec<u8> {
    platform_log_builder().build()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(hash(MessageDigest::sha256(), data).unwrap())
}

// ==================== certificates ====================

pub struct TestIdentity {
    pub key: PKey<Private>,
    pub cert: X509,
}

impl TestIdentity {
    pub fn record(&self) -> CertificateRecord {
        CertificateRecord::new(Uuid::new_v4(), self.cert.to_pem().unwrap())
    }
}

fn new_rsa_key() -> PKey<Private> {
    PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap()
}

fn build_cert(common_name: &str, serial: u32, key: &PKey<Private>, issuer: Option<&TestIdentity>, ca: bool) -> X509 {
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("CN", common_name).unwrap();
    let name = name.build();

    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;
    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();
    builder.set_serial_number(&BigNum::from_u32(serial).unwrap().to_asn1_integer().unwrap()).unwrap();
    builder.set_subject_name(&name).unwrap();
    match issuer {
        Some(issuer) => builder.set_issuer_name(issuer.cert.subject_name()).unwrap(),
        None => builder.set_issuer_name(&name).unwrap(),
    }
    builder.set_pubkey(key).unwrap();
    builder.set_not_before(&Asn1Time::from_unix(now - 3600).unwrap()).unwrap();
    builder.set_not_after(&Asn1Time::days_from_now(365).unwrap()).unwrap();
    if ca {
        builder.append_extension(BasicConstraints::new().critical().ca().build().unwrap()).unwrap();
    }
    let ski = SubjectKeyIdentifier::new().build(&builder.x509v3_context(None, None)).unwrap();
    builder.append_extension(ski).unwrap();
    let signing_key = issuer.map(|i| &i.key).unwrap_or(key);
    builder.sign(signing_key, MessageDigest::sha256()).unwrap();
    builder.build()
}

pub fn root_ca(common_name: &str) -> TestIdentity {
    let key = new_rsa_key();
    let cert = build_cert(common_name, 1, &key, None, true);
    TestIdentity { key, cert }
}

/// Self-signed CA with a P-256 key.
pub fn ec_root_ca(common_name: &str) -> TestIdentity {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
    let key = PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap();
    let cert = build_cert(common_name, 1, &key, None, true);
    TestIdentity { key, cert }
}

/// Another certificate for the key of `subject`, signed by `issuer`.
pub fn reissued(subject: &TestIdentity, issuer: &TestIdentity, common_name: &str, serial: u32) -> TestIdentity {
    let key = subject.key.clone();
    let cert = build_cert(common_name, serial, &key, Some(issuer), false);
    TestIdentity { key, cert }
}

pub fn issued_by(issuer: &TestIdentity, common_name: &str, serial: u32, ca: bool) -> TestIdentity {
    let key = new_rsa_key();
    let cert = build_cert(common_name, serial, &key, Some(issuer), ca);
    TestIdentity { key, cert }
}

/// Enveloped rsa-sha256 signature over `payload` by `signer`.
pub fn sign_rim(signer: &TestIdentity, payload: &[u8]) -> RimSignature {
    let digest = hash(MessageDigest::sha256(), payload).unwrap().to_vec();
    let signed_info = format!(
        "<SignedInfo><Reference URI=\"\"><DigestValue>{}</DigestValue></Reference></SignedInfo>",
        hex::encode(&digest)
    )
    .into_bytes();
    let mut sig = Signer::new(MessageDigest::sha256(), &signer.key).unwrap();
    sig.update(&signed_info).unwrap();
    RimSignature {
        signed_info,
        signature_method: RSA_SHA256.to_string(),
        signature_value: sig.sign_to_vec().unwrap(),
        references: vec![SignatureReference {
            uri: String::new(),
            digest_method: DIGEST_SHA256.to_string(),
            digest_value: digest,
            referenced_bytes: payload.to_vec(),
        }],
        subject_key_identifier: signer.cert.subject_key_id().map(|ski| ski.as_slice().to_vec()),
        key_value: Some(signer.key.public_key_to_der().unwrap()),
        x509_certificate: None,
    }
}

// ==================== store ====================

#[derive(Default)]
pub struct InMemoryRimStore {
    pub bases: Mutex<Vec<BaseRim>>,
    pub supports: Mutex<Vec<SupportRim>>,
    pub measurements: Vec<Measurement>,
    pub references: Vec<ReferenceDigestValue>,
    pub persist_calls: Mutex<usize>,
}

impl InMemoryRimStore {
    pub fn persist_count(&self) -> usize {
        *self.persist_calls.lock().unwrap()
    }
}

impl RimStore for InMemoryRimStore {
    fn base_rim_by_id(&self, id: &Uuid) -> Result<Option<BaseRim>, RimError> {
        Ok(self.bases.lock().unwrap().iter().find(|b| &b.id == id).cloned())
    }

    fn support_rim_by_id(&self, id: &Uuid) -> Result<Option<SupportRim>, RimError> {
        Ok(self.supports.lock().unwrap().iter().find(|s| &s.id == id).cloned())
    }

    fn measurement_by_id(&self, id: &Uuid) -> Result<Option<Measurement>, RimError> {
        Ok(self.measurements.iter().find(|m| &m.id == id).cloned())
    }

    fn base_rim_by_hash(&self, hex_hash: &str) -> Result<Option<BaseRim>, RimError> {
        Ok(self.bases.lock().unwrap().iter().find(|b| b.hex_hash.eq_ignore_ascii_case(hex_hash)).cloned())
    }

    fn measurement_by_hash(&self, hex_hash: &str) -> Result<Option<Measurement>, RimError> {
        Ok(self.measurements.iter().find(|m| m.hex_hash.eq_ignore_ascii_case(hex_hash)).cloned())
    }

    fn base_rims(&self) -> Result<Vec<BaseRim>, RimError> {
        Ok(self.bases.lock().unwrap().clone())
    }

    fn base_rims_by_type(&self, rim_type: &str) -> Result<Vec<BaseRim>, RimError> {
        Ok(self.bases.lock().unwrap().iter().filter(|b| b.rim_type == rim_type).cloned().collect())
    }

    fn support_rims_by_manufacturer(&self, manufacturer: &str) -> Result<Vec<SupportRim>, RimError> {
        Ok(self.supports.lock().unwrap().iter().filter(|s| s.platform_manufacturer == manufacturer).cloned().collect())
    }

    fn support_rims_by_device(&self, device_name: &str) -> Result<Vec<SupportRim>, RimError> {
        Ok(self
            .supports
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.device_name.as_deref() == Some(device_name))
            .cloned()
            .collect())
    }

    fn reference_values_by_base_rim(&self, base_rim_id: &Uuid) -> Result<Vec<ReferenceDigestValue>, RimError> {
        Ok(self.references.iter().filter(|r| r.base_rim_id.as_ref() == Some(base_rim_id)).cloned().collect())
    }

    fn persist_base_link(&self, base_id: &Uuid, support_id: &Uuid) -> Result<(), RimError> {
        *self.persist_calls.lock().unwrap() += 1;
        let mut bases = self.bases.lock().unwrap();
        let base = bases
            .iter_mut()
            .find(|b| &b.id == base_id)
            .ok_or_else(|| RimError::StoreError(format!("No base RIM {}", base_id)))?;
        base.associated_rim = Some(*support_id);
        Ok(())
    }

    fn persist_support_link(&self, support_id: &Uuid, base_id: &Uuid) -> Result<(), RimError> {
        *self.persist_calls.lock().unwrap() += 1;
        let mut supports = self.supports.lock().unwrap();
        let support = supports
            .iter_mut()
            .find(|s| &s.id == support_id)
            .ok_or_else(|| RimError::StoreError(format!("No support RIM {}", support_id)))?;
        support.associated_rim = Some(*base_id);
        Ok(())
    }
}

mock! {
    pub Store {}
    impl RimStore for Store {
        fn base_rim_by_id(&self, id: &Uuid) -> Result<Option<BaseRim>, RimError>;
        fn support_rim_by_id(&self, id: &Uuid) -> Result<Option<SupportRim>, RimError>;
        fn measurement_by_id(&self, id: &Uuid) -> Result<Option<Measurement>, RimError>;
        fn base_rim_by_hash(&self, hex_hash: &str) -> Result<Option<BaseRim>, RimError>;
        fn measurement_by_hash(&self, hex_hash: &str) -> Result<Option<Measurement>, RimError>;
        fn base_rims(&self) -> Result<Vec<BaseRim>, RimError>;
        fn base_rims_by_type(&self, rim_type: &str) -> Result<Vec<BaseRim>, RimError>;
        fn support_rims_by_manufacturer(&self, manufacturer: &str) -> Result<Vec<SupportRim>, RimError>;
        fn support_rims_by_device(&self, device_name: &str) -> Result<Vec<SupportRim>, RimError>;
        fn reference_values_by_base_rim(&self, base_rim_id: &Uuid) -> Result<Vec<ReferenceDigestValue>, RimError>;
        fn persist_base_link(&self, base_id: &Uuid, support_id: &Uuid) -> Result<(), RimError>;
        fn persist_support_link(&self, support_id: &Uuid, base_id: &Uuid) -> Result<(), RimError>;
    }
}

pub struct StaticCertificates(pub Vec<CertificateRecord>);

impl CertificateStore for StaticCertificates {
    fn certificates(&self) -> Result<Vec<CertificateRecord>, RimError> {
        Ok(self.0.clone())
    }
}

// ==================== records ====================

pub const MANUFACTURER: &str = "Example Platform Inc.";
pub const DEVICE: &str = "host-01";

pub fn support_rim(rim_bytes: Vec<u8>) -> SupportRim {
    SupportRim {
        id: Uuid::new_v4(),
        tag_id: "example-support-tag".to_string(),
        hex_hash: sha256_hex(&rim_bytes),
        rim_type: "Support".to_string(),
        file_name: "platform.rimel".to_string(),
        platform_manufacturer: MANUFACTURER.to_string(),
        device_name: Some(DEVICE.to_string()),
        rim_bytes,
        ..SupportRim::default()
    }
}

pub fn base_rim(support: &SupportRim) -> BaseRim {
    let mut base = BaseRim {
        id: Uuid::new_v4(),
        tag_id: "example-base-tag".to_string(),
        hex_hash: sha256_hex(b"base rim document"),
        rim_type: "Base".to_string(),
        file_name: "platform.swidtag".to_string(),
        ..BaseRim::default()
    };
    base.swid.name = "Example Platform Firmware".to_string();
    base.swid.version = "1.0".to_string();
    base.platform.manufacturer = MANUFACTURER.to_string();
    base.platform.model = "Model X".to_string();
    base.resources.push(rim_manifest::entities::SwidResource {
        name: support.file_name.clone(),
        hash_value: support.hex_hash.to_uppercase(),
        ..Default::default()
    });
    base
}

pub fn measurement(rim_bytes: Vec<u8>) -> Measurement {
    Measurement {
        id: Uuid::new_v4(),
        device_name: Some(DEVICE.to_string()),
        hex_hash: sha256_hex(&rim_bytes),
        rim_type: "Measurement".to_string(),
        rim_bytes,
        overall_validation_result: "PASS".to_string(),
    }
}
