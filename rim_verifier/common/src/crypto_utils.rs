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

//! Crypto utilities for signature verification and hash operations
//!
//! This module provides helper functions for:
//! - Converting between algorithm IDs and OpenSSL message digests
//! - Computing digests over byte strings
//! - RSA and ECDSA signature verification
use openssl::bn::BigNum;
use openssl::ecdsa::EcdsaSig;
use openssl::hash::{hash, MessageDigest};
use openssl::pkey::{PKey, Public};
use openssl::rsa::Padding;
use openssl::sign::{RsaPssSaltlen, Verifier};

use crate::algorithm::AlgorithmId;
use crate::error::RimError;

pub struct CryptoVerifier;

impl CryptoVerifier {
    pub fn algorithm_to_message_digest(alg: &AlgorithmId) -> Result<MessageDigest, RimError> {
        match alg {
            AlgorithmId::Sha1 => Ok(MessageDigest::sha1()),
            AlgorithmId::Sha256 => Ok(MessageDigest::sha256()),
            AlgorithmId::Sha384 => Ok(MessageDigest::sha384()),
            AlgorithmId::Sha512 => Ok(MessageDigest::sha512()),
            AlgorithmId::Sm3 => Ok(MessageDigest::sm3()),
            AlgorithmId::Unknown => Err(RimError::UnsupportedAlgorithm(format!("{:?}", alg))),
        }
    }

    pub fn hash_str_to_message_digest(hash_str: &str) -> Result<MessageDigest, RimError> {
        let alg: AlgorithmId = hash_str.parse()?;
        Self::algorithm_to_message_digest(&alg)
    }

    /// Digest `data` with the given algorithm.
    pub fn digest(alg: &AlgorithmId, data: &[u8]) -> Result<Vec<u8>, RimError> {
        let md = Self::algorithm_to_message_digest(alg)?;
        hash(md, data)
            .map(|d| d.to_vec())
            .map_err(|e| RimError::InternalError(format!("Failed to compute {} digest: {}", alg, e)))
    }

    /// Lower-case hex digest of `data`.
    pub fn digest_hex(alg: &AlgorithmId, data: &[u8]) -> Result<String, RimError> {
        Self::digest(alg, data).map(hex::encode)
    }

    /// PKCS#1 v1.5 verification. `Ok(false)` means the signature does not match the data.
    pub fn verify_rsa_signature(
        data: &[u8],
        signature: &[u8],
        hash_alg: MessageDigest,
        public_key: &PKey<Public>,
    ) -> Result<bool, RimError> {
        let mut verifier = Self::new_verifier(hash_alg, public_key)?;
        verifier
            .set_rsa_padding(Padding::PKCS1)
            .map_err(|e| RimError::InternalError(format!("Failed to set PKCS1 padding: {}", e)))?;
        Self::finish_verify(&mut verifier, data, signature)
    }

    pub fn verify_rsapss_signature(
        data: &[u8],
        signature: &[u8],
        hash_alg: MessageDigest,
        public_key: &PKey<Public>,
    ) -> Result<bool, RimError> {
        let mut verifier = Self::new_verifier(hash_alg, public_key)?;
        verifier
            .set_rsa_padding(Padding::PKCS1_PSS)
            .map_err(|e| RimError::InternalError(format!("Failed to set PSS padding: {}", e)))?;
        verifier
            .set_rsa_pss_saltlen(RsaPssSaltlen::DIGEST_LENGTH)
            .map_err(|e| RimError::InternalError(format!("Failed to set salt length: {}", e)))?;
        Self::finish_verify(&mut verifier, data, signature)
    }

    /// ECDSA verification over a DER encoded signature.
    pub fn verify_ecdsa_signature(
        data: &[u8],
        signature: &[u8],
        hash_alg: MessageDigest,
        public_key: &PKey<Public>,
    ) -> Result<bool, RimError> {
        let mut verifier = Self::new_verifier(hash_alg, public_key)?;
        Self::finish_verify(&mut verifier, data, signature)
    }

    /// Converts a fixed size `r || s` ECDSA signature into DER. Already DER encoded input
    /// (leading SEQUENCE tag with consistent length) is returned unchanged.
    pub fn ecdsa_raw_to_der(signature: &[u8]) -> Result<Vec<u8>, RimError> {
        if Self::looks_like_der(signature) {
            return Ok(signature.to_vec());
        }
        if signature.is_empty() || signature.len() % 2 != 0 {
            return Err(RimError::InputError(format!("Invalid raw ECDSA signature length {}", signature.len())));
        }
        let (r, s) = signature.split_at(signature.len() / 2);
        let r = BigNum::from_slice(r).map_err(|e| RimError::InternalError(format!("Invalid ECDSA r: {}", e)))?;
        let s = BigNum::from_slice(s).map_err(|e| RimError::InternalError(format!("Invalid ECDSA s: {}", e)))?;
        let sig = EcdsaSig::from_private_components(r, s)
            .map_err(|e| RimError::InternalError(format!("Failed to build ECDSA signature: {}", e)))?;
        sig.to_der().map_err(|e| RimError::InternalError(format!("Failed to encode ECDSA signature: {}", e)))
    }

    fn looks_like_der(signature: &[u8]) -> bool {
        match signature {
            [0x30, 0x81, len, ..] => *len as usize + 3 == signature.len(),
            [0x30, len, ..] => *len < 0x80 && *len as usize + 2 == signature.len(),
            _ => false,
        }
    }

    fn new_verifier<'a>(hash_alg: MessageDigest, public_key: &'a PKey<Public>) -> Result<Verifier<'a>, RimError> {
        Verifier::new(hash_alg, public_key)
            .map_err(|e| RimError::InternalError(format!("Failed to create verifier: {}", e)))
    }

    fn finish_verify(verifier: &mut Verifier<'_>, data: &[u8], signature: &[u8]) -> Result<bool, RimError> {
        verifier
            .update(data)
            .map_err(|e| RimError::InternalError(format!("Failed to update verifier: {}", e)))?;
        // openssl reports malformed signatures as errors, treat them as a mismatch
        Ok(verifier.verify(signature).unwrap_or(false))
    }
}
