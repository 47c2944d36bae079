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

use rim_common_verifier::{AlgorithmId, RimError, PCR_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A digest value tagged with its algorithm. The value length always matches the algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest {
    algorithm: AlgorithmId,
    value: Vec<u8>,
}

impl Digest {
    pub fn new(algorithm: AlgorithmId, value: Vec<u8>) -> Result<Self, RimError> {
        let expected = algorithm.digest_size();
        if expected == 0 {
            return Err(RimError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }
        if value.len() != expected {
            return Err(RimError::InputError(format!(
                "{} digest must be {} bytes, got {}",
                algorithm,
                expected,
                value.len()
            )));
        }
        Ok(Self { algorithm, value })
    }

    pub fn from_hex(algorithm: AlgorithmId, value: &str) -> Result<Self, RimError> {
        let bytes = hex::decode(value.trim())
            .map_err(|e| RimError::InputError(format!("Invalid digest hex {}: {}", value, e)))?;
        Self::new(algorithm, bytes)
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.value)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// One acceptable value of one PCR.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PcrMeasurementRecord {
    pcr_index: u32,
    hash: Digest,
}

impl PcrMeasurementRecord {
    pub fn new(pcr_index: u32, hash: Digest) -> Result<Self, RimError> {
        check_pcr_index(pcr_index)?;
        Ok(Self { pcr_index, hash })
    }

    pub fn pcr_index(&self) -> u32 {
        self.pcr_index
    }

    pub fn hash(&self) -> &Digest {
        &self.hash
    }
}

impl fmt::Display for PcrMeasurementRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PCR{} {}", self.pcr_index, self.hash)
    }
}

pub fn check_pcr_index(pcr_index: u32) -> Result<(), RimError> {
    if pcr_index >= PCR_COUNT {
        return Err(RimError::InputError(format!(
            "PCR index {} out of range 0..={}",
            pcr_index,
            PCR_COUNT - 1
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_new_checks_length() {
        assert!(Digest::new(AlgorithmId::Sha1, vec![0; 20]).is_ok());
        assert!(matches!(Digest::new(AlgorithmId::Sha256, vec![0; 20]), Err(RimError::InputError(_))));
        assert!(matches!(Digest::new(AlgorithmId::Unknown, vec![]), Err(RimError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_record_rejects_out_of_range_pcr() {
        let digest = Digest::new(AlgorithmId::Sha1, vec![1; 20]).unwrap();
        assert!(PcrMeasurementRecord::new(23, digest.clone()).is_ok());
        assert!(matches!(PcrMeasurementRecord::new(24, digest), Err(RimError::InputError(_))));
    }
}
