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

//! PCR extend replay.
//!
//! A PCR starts from a well known value and every measurement extends it with
//! `new = H(old || digest)`. Replaying a log's digests per PCR yields the values a TPM
//! that recorded the same log would report.
use openssl::hash::Hasher;

use crate::algorithm::AlgorithmId;
use crate::crypto_utils::CryptoVerifier;
use crate::error::RimError;

/// Number of PCRs in a PC Client TPM bank.
pub const PCR_COUNT: u32 = 24;

pub struct PcrReplay;

impl PcrReplay {
    /// Extends `initial_value` with each digest in order and returns the final value.
    pub fn replay<'a, I>(algorithm: &AlgorithmId, initial_value: &[u8], digests: I) -> Result<Vec<u8>, RimError>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let digest_alg = CryptoVerifier::algorithm_to_message_digest(algorithm)?;
        let mut current_value = initial_value.to_vec();

        for digest in digests {
            let mut hasher = Hasher::new(digest_alg)
                .map_err(|e| RimError::InternalError(format!("Failed to create hasher: {}", e)))?;
            hasher
                .update(&current_value)
                .map_err(|e| RimError::InternalError(format!("Failed to update hash with current value: {}", e)))?;
            hasher
                .update(digest)
                .map_err(|e| RimError::InternalError(format!("Failed to update hash with log value: {}", e)))?;
            current_value = hasher
                .finish()
                .map_err(|e| RimError::InternalError(format!("Failed to finalize hash: {}", e)))?
                .to_vec();
        }

        Ok(current_value)
    }

    /// Initial PCR value after a platform reset:
    /// PCR 0-16 and 23 start as zeros, PCR 17-22 start as all ones, and PCR 0 carries the
    /// startup locality in its last byte when one was recorded.
    pub fn create_initial_pcr_value(
        algorithm: &AlgorithmId,
        pcr_index: u32,
        locality: Option<u8>,
    ) -> Result<Vec<u8>, RimError> {
        let digest_size = algorithm.digest_size();
        if digest_size == 0 {
            return Err(RimError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        let mut initial_value = match pcr_index {
            0..=16 | 23 => vec![0u8; digest_size],
            17..=22 => vec![0xffu8; digest_size],
            _ => return Err(RimError::InputError(format!("Invalid PCR index: {}", pcr_index))),
        };

        if pcr_index == 0 {
            if let Some(loc) = locality {
                initial_value[digest_size - 1] = loc;
            }
        }
        Ok(initial_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_initial_pcr_value_per_index() {
        let pcr0 = PcrReplay::create_initial_pcr_value(&AlgorithmId::Sha256, 0, Some(3)).unwrap();
        assert_eq!(pcr0.len(), 32);
        assert_eq!(pcr0[31], 3);
        assert!(pcr0[..31].iter().all(|b| *b == 0));

        let pcr17 = PcrReplay::create_initial_pcr_value(&AlgorithmId::Sha1, 17, None).unwrap();
        assert_eq!(pcr17, vec![0xff; 20]);

        let err = PcrReplay::create_initial_pcr_value(&AlgorithmId::Sha1, 24, None).unwrap_err();
        assert!(matches!(err, RimError::InputError(_)));
    }

    #[test]
    fn test_replay_without_digests_returns_initial_value() {
        let initial = vec![0u8; 32];
        let value = PcrReplay::replay(&AlgorithmId::Sha256, &initial, std::iter::empty()).unwrap();
        assert_eq!(value, initial);
    }

    #[test]
    fn test_replay_single_extend() {
        let initial = vec![0u8; 32];
        let measurement = vec![0u8; 32];
        let value = PcrReplay::replay(&AlgorithmId::Sha256, &initial, [measurement.as_slice()]).unwrap();
        let expected = CryptoVerifier::digest(&AlgorithmId::Sha256, &[0u8; 64]).unwrap();
        assert_eq!(value, expected);
    }
}
