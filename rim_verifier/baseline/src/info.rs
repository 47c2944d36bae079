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

//! Device descriptors attached to a baseline. Every text field defaults to
//! [`NOT_SPECIFIED`] and every version number to zero.

use serde::{Deserialize, Serialize};

pub const NOT_SPECIFIED: &str = "Not Specified";

fn not_specified() -> String {
    NOT_SPECIFIED.to_string()
}

fn is_not_specified(value: &str) -> bool {
    value == NOT_SPECIFIED
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareInfo {
    pub bios_vendor: String,
    pub bios_version: String,
    pub bios_release_date: String,
}

impl Default for FirmwareInfo {
    fn default() -> Self {
        Self { bios_vendor: not_specified(), bios_version: not_specified(), bios_release_date: not_specified() }
    }
}

impl FirmwareInfo {
    pub fn is_unspecified(&self) -> bool {
        [&self.bios_vendor, &self.bios_version, &self.bios_release_date].iter().all(|v| is_not_specified(v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub manufacturer: String,
    pub product_name: String,
    pub version: String,
    pub system_serial_number: String,
    pub chassis_serial_number: String,
    pub baseboard_serial_number: String,
}

impl Default for HardwareInfo {
    fn default() -> Self {
        Self {
            manufacturer: not_specified(),
            product_name: not_specified(),
            version: not_specified(),
            system_serial_number: not_specified(),
            chassis_serial_number: not_specified(),
            baseboard_serial_number: not_specified(),
        }
    }
}

impl HardwareInfo {
    pub fn is_unspecified(&self) -> bool {
        [
            &self.manufacturer,
            &self.product_name,
            &self.version,
            &self.system_serial_number,
            &self.chassis_serial_number,
            &self.baseboard_serial_number,
        ]
        .iter()
        .all(|v| is_not_specified(v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub os_name: String,
    pub os_version: String,
    pub os_arch: String,
    pub distribution: String,
    pub distribution_release: String,
}

impl Default for OsInfo {
    fn default() -> Self {
        Self {
            os_name: not_specified(),
            os_version: not_specified(),
            os_arch: not_specified(),
            distribution: not_specified(),
            distribution_release: not_specified(),
        }
    }
}

impl OsInfo {
    pub fn is_unspecified(&self) -> bool {
        [&self.os_name, &self.os_version, &self.os_arch, &self.distribution, &self.distribution_release]
            .iter()
            .all(|v| is_not_specified(v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TpmInfo {
    pub tpm_make: String,
    pub version_major: u16,
    pub version_minor: u16,
    pub version_rev_major: u16,
    pub version_rev_minor: u16,
}

impl Default for TpmInfo {
    fn default() -> Self {
        Self { tpm_make: not_specified(), version_major: 0, version_minor: 0, version_rev_major: 0, version_rev_minor: 0 }
    }
}

impl TpmInfo {
    pub fn is_unspecified(&self) -> bool {
        is_not_specified(&self.tpm_make)
            && self.version_major == 0
            && self.version_minor == 0
            && self.version_rev_major == 0
            && self.version_rev_minor == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RimInfo {
    pub rim_manufacturer: String,
    pub model: String,
}

impl Default for RimInfo {
    fn default() -> Self {
        Self { rim_manufacturer: not_specified(), model: not_specified() }
    }
}

impl RimInfo {
    pub fn is_unspecified(&self) -> bool {
        is_not_specified(&self.rim_manufacturer) && is_not_specified(&self.model)
    }
}
