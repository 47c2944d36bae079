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

//! Enveloped XML signature of a Base RIM, already canonicalized by the XML binding layer.

use common_log::debug;
use openssl::pkey::{PKey, Public};
use rim_common_verifier::{AlgorithmId, CryptoVerifier, RimError};

pub const DIGEST_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
pub const DIGEST_SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
pub const DIGEST_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";
pub const DIGEST_SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";

pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";
pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
pub const RSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384";
pub const RSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";
pub const RSA_PSS_SHA256: &str = "http://www.w3.org/2007/05/xmldsig-more#sha256-rsa-MGF1";
pub const RSA_PSS_SHA384: &str = "http://www.w3.org/2007/05/xmldsig-more#sha384-rsa-MGF1";
pub const RSA_PSS_SHA512: &str = "http://www.w3.org/2007/05/xmldsig-more#sha512-rsa-MGF1";
pub const ECDSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha256";
pub const ECDSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha384";
pub const ECDSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha512";

/// Maps a `DigestMethod` algorithm URI to its digest.
pub fn digest_algorithm_from_uri(uri: &str) -> Result<AlgorithmId, RimError> {
    match uri.trim() {
        DIGEST_SHA1 => Ok(AlgorithmId::Sha1),
        DIGEST_SHA256 => Ok(AlgorithmId::Sha256),
        DIGEST_SHA384 => Ok(AlgorithmId::Sha384),
        DIGEST_SHA512 => Ok(AlgorithmId::Sha512),
        other => Err(RimError::UnsupportedAlgorithm(format!("Unsupported digest method: {}", other))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMethod {
    RsaPkcs1(AlgorithmId),
    RsaPss(AlgorithmId),
    Ecdsa(AlgorithmId),
}

impl SignatureMethod {
    pub fn from_uri(uri: &str) -> Result<Self, RimError> {
        match uri.trim() {
            RSA_SHA1 => Ok(SignatureMethod::RsaPkcs1(AlgorithmId::Sha1)),
            RSA_SHA256 => Ok(SignatureMethod::RsaPkcs1(AlgorithmId::Sha256)),
            RSA_SHA384 => Ok(SignatureMethod::RsaPkcs1(AlgorithmId::Sha384)),
            RSA_SHA512 => Ok(SignatureMethod::RsaPkcs1(AlgorithmId::Sha512)),
            RSA_PSS_SHA256 => Ok(SignatureMethod::RsaPss(AlgorithmId::Sha256)),
            RSA_PSS_SHA384 => Ok(SignatureMethod::RsaPss(AlgorithmId::Sha384)),
            RSA_PSS_SHA512 => Ok(SignatureMethod::RsaPss(AlgorithmId::Sha512)),
            ECDSA_SHA256 => Ok(SignatureMethod::Ecdsa(AlgorithmId::Sha256)),
            ECDSA_SHA384 => Ok(SignatureMethod::Ecdsa(AlgorithmId::Sha384)),
            ECDSA_SHA512 => Ok(SignatureMethod::Ecdsa(AlgorithmId::Sha512)),
            other => Err(RimError::UnsupportedAlgorithm(format!("Unsupported signature method: {}", other))),
        }
    }

    pub fn digest_algorithm(&self) -> AlgorithmId {
        match self {
            SignatureMethod::RsaPkcs1(alg) | SignatureMethod::RsaPss(alg) | SignatureMethod::Ecdsa(alg) => *alg,
        }
    }
}

/// One `Reference` of the SignedInfo together with the canonical bytes it points at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureReference {
    pub uri: String,
    pub digest_method: String,
    pub digest_value: Vec<u8>,
    pub referenced_bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RimSignature {
    /// Canonical SignedInfo element, the data covered by `signature_value`.
    pub signed_info: Vec<u8>,
    pub signature_method: String,
    pub signature_value: Vec<u8>,
    pub references: Vec<SignatureReference>,
    /// KeyInfo `KeyName` holding the signer's subject key identifier.
    pub subject_key_identifier: Option<Vec<u8>>,
    /// KeyInfo `KeyValue` as a DER SubjectPublicKeyInfo.
    pub key_value: Option<Vec<u8>>,
    /// KeyInfo `X509Certificate`.
    pub x509_certificate: Option<Vec<u8>>,
}

impl RimSignature {
    /// Resolves the signature method and every reference digest method.
    pub fn check_algorithms(&self) -> Result<SignatureMethod, RimError> {
        for reference in &self.references {
            digest_algorithm_from_uri(&reference.digest_method)?;
        }
        SignatureMethod::from_uri(&self.signature_method)
    }

    /// Checks every reference digest, then the signature over SignedInfo with `public_key`.
    /// Returns `Ok(false)` for a mismatch and an error only for unsupported algorithms or
    /// failures inside openssl.
    pub fn verify_with(&self, public_key: &PKey<Public>) -> Result<bool, RimError> {
        for reference in &self.references {
            let algorithm = digest_algorithm_from_uri(&reference.digest_method)?;
            let computed = CryptoVerifier::digest(&algorithm, &reference.referenced_bytes)?;
            if computed != reference.digest_value {
                debug!("Reference {} digest mismatch", reference.uri);
                return Ok(false);
            }
        }

        let method = SignatureMethod::from_uri(&self.signature_method)?;
        let md = CryptoVerifier::algorithm_to_message_digest(&method.digest_algorithm())?;
        match method {
            SignatureMethod::RsaPkcs1(_) => {
                CryptoVerifier::verify_rsa_signature(&self.signed_info, &self.signature_value, md, public_key)
            },
            SignatureMethod::RsaPss(_) => {
                CryptoVerifier::verify_rsapss_signature(&self.signed_info, &self.signature_value, md, public_key)
            },
            SignatureMethod::Ecdsa(_) => {
                let der = CryptoVerifier::ecdsa_raw_to_der(&self.signature_value)?;
                CryptoVerifier::verify_ecdsa_signature(&self.signed_info, &der, md, public_key)
            },
        }
    }
}
