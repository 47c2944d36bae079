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

use common_log::{debug, error, info, warn};
use config_manager::types::EngineConfig;
use openssl::pkey::PKey;
use openssl::x509::X509;
use rim_common_verifier::{AlgorithmId, CryptoVerifier, RimError};
use serde::Serialize;
use uuid::Uuid;

use crate::cert_chain::CertChainVerifier;
use crate::entities::{parse_certificate, public_key_der, BaseRim, CertificateRecord, SupportRim};
use crate::xmldsig::RimSignature;

/// Outcome of checking one Base RIM against its support RIM and the CA certificates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RimValidationReport {
    /// `None` when no declared resource carries the support RIM's hash.
    pub support_hash_valid: Option<bool>,
    pub signature_valid: bool,
    /// Certificate whose key verified the signature and whose chain is trusted.
    pub signing_certificate: Option<Uuid>,
    /// Hex subject key identifier of the signer.
    pub subject_key_identifier: Option<String>,
    /// Candidate certificate holding the signer's public key.
    pub issuer_id: Option<Uuid>,
    /// Candidates that could not be parsed, with the reason.
    pub skipped_certificates: Vec<(Uuid, String)>,
}

pub struct SignatureAndHashValidator<'a> {
    config: &'a EngineConfig,
}

impl<'a> SignatureAndHashValidator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn validate(
        &self,
        base: &BaseRim,
        support: Option<&SupportRim>,
        certificates: &[CertificateRecord],
    ) -> Result<RimValidationReport, RimError> {
        let mut report = RimValidationReport::default();
        if let Some(support) = support {
            report.support_hash_valid = self.validate_support_hash(base, support)?;
        }

        let mut candidates: Vec<(Uuid, X509)> = Vec::with_capacity(certificates.len());
        for record in certificates {
            match record.x509() {
                Ok(cert) => candidates.push((record.id, cert)),
                Err(e) => {
                    warn!("Skipping certificate {}: {}", record.id, e);
                    report.skipped_certificates.push((record.id, e.to_string()));
                },
            }
        }

        let signature = match &base.signature {
            Some(signature) => signature,
            None => {
                warn!("Base RIM {} carries no signature", base.id);
                return Ok(report);
            },
        };

        report.signing_certificate = self.find_trusted_signer(base, signature, &candidates)?;
        report.signature_valid = report.signing_certificate.is_some();
        if report.signature_valid {
            info!("Base RIM {} signature validated", base.id);
        }

        let embedded = match &signature.x509_certificate {
            Some(encoded) => Some(parse_certificate(encoded)?),
            None => None,
        };
        report.subject_key_identifier = signature
            .subject_key_identifier
            .clone()
            .or_else(|| embedded.as_ref().and_then(|c| c.subject_key_id().map(|ski| ski.as_slice().to_vec())))
            .map(hex::encode);
        report.issuer_id = self.identify_issuer(signature, embedded.as_ref(), &candidates)?;
        Ok(report)
    }

    /// Recomputes the support RIM digest for the resource declaring the support RIM's hash.
    pub fn validate_support_hash(&self, base: &BaseRim, support: &SupportRim) -> Result<Option<bool>, RimError> {
        let resource = match base.resources.iter().find(|r| r.hash_value.eq_ignore_ascii_case(&support.hex_hash)) {
            Some(resource) => resource,
            None => {
                debug!("Base RIM {} declares no resource for support RIM {}", base.id, support.id);
                return Ok(None);
            },
        };
        let algorithm: AlgorithmId =
            resource.hash_algorithm.as_deref().unwrap_or(&self.config.support_hash_algorithm).parse()?;
        let computed = CryptoVerifier::digest_hex(&algorithm, &support.rim_bytes)?;
        let valid = computed.eq_ignore_ascii_case(&resource.hash_value);
        if !valid {
            warn!("Support RIM {} payload does not hash to {}", support.id, resource.hash_value);
        }
        Ok(Some(valid))
    }

    /// First candidate whose key verifies the signature and whose chain reaches a trusted root.
    fn find_trusted_signer(
        &self,
        base: &BaseRim,
        signature: &RimSignature,
        candidates: &[(Uuid, X509)],
    ) -> Result<Option<Uuid>, RimError> {
        signature.check_algorithms()?;
        let keystore: Vec<X509> = candidates.iter().map(|(_, cert)| cert.clone()).collect();
        let chain = CertChainVerifier::new(&keystore, self.config.max_chain_depth);
        for (id, cert) in candidates {
            let public_key = match cert.public_key() {
                Ok(key) => key,
                Err(e) => {
                    error!("Failed to read public key of certificate {}: {}", id, e);
                    continue;
                },
            };
            match signature.verify_with(&public_key) {
                Ok(true) => {},
                Ok(false) => continue,
                Err(e) => {
                    error!("Failed to verify signature with certificate {}: {}", id, e);
                    continue;
                },
            }
            debug!("Certificate {} verifies the signature of base RIM {}", id, base.id);
            match chain.verify(cert) {
                Ok(true) => return Ok(Some(*id)),
                Ok(false) => error!("Certificate {} does not chain to a trusted root", id),
                Err(e) => error!("Error verifying cert chain: {}", e),
            }
        }
        Ok(None)
    }

    fn identify_issuer(
        &self,
        signature: &RimSignature,
        embedded: Option<&X509>,
        candidates: &[(Uuid, X509)],
    ) -> Result<Option<Uuid>, RimError> {
        let signer_key = match (&signature.key_value, embedded) {
            (Some(key_value), _) => Some(
                PKey::public_key_from_der(key_value)
                    .and_then(|key| key.public_key_to_der())
                    .map_err(|e| RimError::CertificateError(format!("Invalid KeyValue: {}", e)))?,
            ),
            (None, Some(cert)) => Some(public_key_der(cert)?),
            (None, None) => None,
        };

        let mut issuer = None;
        for (id, cert) in candidates {
            let matches = match (&signer_key, &signature.subject_key_identifier) {
                (Some(key), _) => public_key_der(cert).map(|der| &der == key).unwrap_or(false),
                (None, Some(ski)) => cert.subject_key_id().map(|own| own.as_slice() == ski.as_slice()).unwrap_or(false),
                (None, None) => false,
            };
            if matches {
                issuer = Some(*id);
            }
        }
        if issuer.is_none() {
            debug!("Unable to link signing certificate");
        }
        Ok(issuer)
    }
}
