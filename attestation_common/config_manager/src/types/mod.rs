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

use serde::Deserialize;

/// Top level structure of `rim_config.yaml`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RimConfig {
    #[serde(default)]
    pub rim_validator: EngineConfig,
}

/// Settings of the RIM linkage, event log and baseline matching engine.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Digest bank selected from crypto-agile event logs
    #[serde(default = "default_digest_algorithm")]
    pub preferred_digest_algorithm: String,
    /// RIM type scanned when a support RIM has no association
    #[serde(default = "default_base_rim_type")]
    pub base_rim_type: String,
    /// Marker preceding a UEFI variable name in rendered event content
    #[serde(default = "default_variable_prefix")]
    pub uefi_variable_prefix: String,
    /// Marker following a UEFI variable name in rendered event content
    #[serde(default = "default_variable_suffix")]
    pub uefi_variable_suffix: String,
    /// Upper bound on certificate chain length
    #[serde(default = "default_max_chain_depth")]
    pub max_chain_depth: usize,
    /// Hash algorithm for support RIM resources that do not name one
    #[serde(default = "default_digest_algorithm")]
    pub support_hash_algorithm: String,
}

fn default_digest_algorithm() -> String {
    "sha256".to_string()
}

fn default_base_rim_type() -> String {
    "Base".to_string()
}

fn default_variable_prefix() -> String {
    "Variable Name:".to_string()
}

fn default_variable_suffix() -> String {
    "UEFI_GUID".to_string()
}

fn default_max_chain_depth() -> usize {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preferred_digest_algorithm: default_digest_algorithm(),
            base_rim_type: default_base_rim_type(),
            uefi_variable_prefix: default_variable_prefix(),
            uefi_variable_suffix: default_variable_suffix(),
            max_chain_depth: default_max_chain_depth(),
            support_hash_algorithm: default_digest_algorithm(),
        }
    }
}
