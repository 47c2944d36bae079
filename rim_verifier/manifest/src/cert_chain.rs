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

//! Walks a certificate up to a self-signed trust anchor through a keystore of CA certificates.

use common_log::{error, info};
use openssl::asn1::Asn1Time;
use openssl::x509::{X509NameRef, X509};
use rim_common_verifier::RimError;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub struct CertChainVerifier<'a> {
    keystore: &'a [X509],
    max_depth: usize,
}

impl<'a> CertChainVerifier<'a> {
    pub fn new(keystore: &'a [X509], max_depth: usize) -> Self {
        Self { keystore, max_depth }
    }

    /// Returns `Ok(true)` when every link up to a self-signed certificate held in the keystore
    /// verifies and is inside its validity period. At most `max_depth` issuer steps are taken.
    pub fn verify(&self, cert: &X509) -> Result<bool, RimError> {
        let mut current = cert.clone();
        info!("Begin verify certificate chain {}", name_string(current.subject_name()));
        if !check_validity(&current)? {
            error!("The certificate {} is expired or not yet valid", name_string(current.subject_name()));
            return Ok(false);
        }
        for _ in 0..=self.max_depth {
            if name_string(current.issuer_name()) == name_string(current.subject_name()) {
                return self.verify_anchor(&current);
            }
            match self.find_parent(&current)? {
                Some(parent) => current = parent,
                None => {
                    error!("Not find the certificate {} parent certificate", name_string(current.subject_name()));
                    return Ok(false);
                },
            }
        }
        error!("Certificate chain is longer than {}", self.max_depth);
        Ok(false)
    }

    fn find_parent(&self, cert: &X509) -> Result<Option<X509>, RimError> {
        let issuer = name_string(cert.issuer_name());
        let parents: Vec<&X509> =
            self.keystore.iter().filter(|candidate| name_string(candidate.subject_name()) == issuer).collect();
        if parents.is_empty() {
            error!("The certificate {} parent certificates is empty", name_string(cert.subject_name()));
            return Ok(None);
        }
        for parent in parents {
            if !check_validity(parent)? {
                error!("The parent certificate is expired");
                continue;
            }
            let parent_key = parent
                .public_key()
                .map_err(|e| RimError::CertificateError(format!("Failed to read parent public key: {}", e)))?;
            match cert.verify(&parent_key) {
                Ok(true) => {
                    info!("Verify chain success");
                    return Ok(Some(parent.clone()));
                },
                Ok(false) => error!("Verify chain failed"),
                Err(e) => error!("Verify chain occur error: {}", e),
            }
        }
        Ok(None)
    }

    fn verify_anchor(&self, root: &X509) -> Result<bool, RimError> {
        let root_key = root
            .public_key()
            .map_err(|e| RimError::CertificateError(format!("Failed to read root public key: {}", e)))?;
        if !root.verify(&root_key).unwrap_or(false) {
            error!("Root certificate {} self signature is invalid", name_string(root.subject_name()));
            return Ok(false);
        }
        let root_der = root.to_der().map_err(|e| RimError::InternalError(format!("Failed to encode root: {}", e)))?;
        let trusted = self.keystore.iter().any(|candidate| candidate.to_der().map(|der| der == root_der).unwrap_or(false));
        if !trusted {
            error!("Root certificate {} is not in the keystore", name_string(root.subject_name()));
            return Ok(false);
        }
        info!("Certificate chain verification successful");
        Ok(true)
    }
}

/// Certificate validity check against the current time.
pub fn check_validity(cert: &X509) -> Result<bool, RimError> {
    let now = Asn1Time::days_from_now(0)
        .map_err(|e| RimError::InternalError(format!("Failed to get current time: {}", e)))?;
    let after_start = now
        .compare(cert.not_before())
        .map_err(|e| RimError::CertificateError(e.to_string()))?
        != Ordering::Less;
    let before_end = now
        .compare(cert.not_after())
        .map_err(|e| RimError::CertificateError(e.to_string()))?
        == Ordering::Less;
    Ok(after_start && before_end)
}

/// Stable textual form of an X.509 name used for issuer/subject comparison.
pub fn name_string(name: &X509NameRef) -> String {
    let map = name
        .entries()
        .map(|e| (e.object().to_string(), String::from_utf8_lossy(e.data().as_slice()).into_owned()))
        .collect::<BTreeMap<String, String>>();
    serde_json::to_string(&map).unwrap_or_default()
}
