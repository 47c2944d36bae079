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

use crate::info::{FirmwareInfo, HardwareInfo, OsInfo, RimInfo, TpmInfo};
use crate::record::{check_pcr_index, Digest, PcrMeasurementRecord};
use common_log::{debug, info, warn};
use rim_common_verifier::RimError;
use serde::{Deserialize, Serialize};
use tcg_event_log::EventLog;

/// A named set of acceptable PCR values. Several records may share one PCR index, each one
/// describing another value the PCR is allowed to hold. Records keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcrBaseline {
    name: String,
    records: Vec<PcrMeasurementRecord>,
    firmware_info: FirmwareInfo,
    hardware_info: HardwareInfo,
    os_info: OsInfo,
    tpm_info: TpmInfo,
    rim_info: RimInfo,
}

impl PcrBaseline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
            firmware_info: FirmwareInfo::default(),
            hardware_info: HardwareInfo::default(),
            os_info: OsInfo::default(),
            tpm_info: TpmInfo::default(),
            rim_info: RimInfo::default(),
        }
    }

    /// Builds a baseline holding the selected-bank digest of every measured event of `log`.
    /// Events repeating an already recorded (PCR, digest) pair are folded into one record.
    /// Events extending a PCR outside 0..=23 are left out.
    pub fn from_event_log(name: impl Into<String>, log: &EventLog) -> Result<Self, RimError> {
        let mut baseline = Self::new(name);
        for event in log.measurements() {
            if check_pcr_index(event.pcr_index).is_err() {
                warn!("Skipping event {} of PCR {} while building baseline", event.event_number, event.pcr_index);
                continue;
            }
            let digest = Digest::new(log.algorithm, event.digest.clone())?;
            let record = PcrMeasurementRecord::new(event.pcr_index, digest)?;
            if !baseline.is_in_baseline(&record) {
                baseline.records.push(record);
            }
        }
        debug!("Built baseline {} with {} record(s) from event log", baseline.name, baseline.records.len());
        Ok(baseline)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pcr_records(&self) -> &[PcrMeasurementRecord] {
        &self.records
    }

    /// All digests recorded for `pcr_index`, in insertion order.
    pub fn pcr_hashes(&self, pcr_index: u32) -> Result<Vec<Digest>, RimError> {
        check_pcr_index(pcr_index)?;
        Ok(self.records.iter().filter(|r| r.pcr_index() == pcr_index).map(|r| r.hash().clone()).collect())
    }

    pub fn is_in_baseline(&self, record: &PcrMeasurementRecord) -> bool {
        self.records.contains(record)
    }

    pub fn add_to_baseline(&mut self, record: PcrMeasurementRecord) -> Result<(), RimError> {
        if self.is_in_baseline(&record) {
            return Err(RimError::DuplicateRecord(format!("Record {} already in baseline {}", record, self.name)));
        }
        info!("Adding {} to baseline {}", record, self.name);
        self.records.push(record);
        Ok(())
    }

    /// Returns false when the record was not part of the baseline.
    pub fn remove_from_baseline(&mut self, record: &PcrMeasurementRecord) -> bool {
        match self.records.iter().position(|r| r == record) {
            Some(position) => {
                self.records.remove(position);
                info!("Removed {} from baseline {}", record, self.name);
                true
            },
            None => {
                debug!("Record {} not found in baseline {}", record, self.name);
                false
            },
        }
    }

    /// True only when no record is present and every descriptor still holds its default.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
            && self.firmware_info.is_unspecified()
            && self.hardware_info.is_unspecified()
            && self.os_info.is_unspecified()
            && self.tpm_info.is_unspecified()
            && self.rim_info.is_unspecified()
    }

    pub fn firmware_info(&self) -> &FirmwareInfo {
        &self.firmware_info
    }

    pub fn set_firmware_info(&mut self, firmware_info: Option<FirmwareInfo>) {
        self.firmware_info = firmware_info.unwrap_or_default();
    }

    pub fn hardware_info(&self) -> &HardwareInfo {
        &self.hardware_info
    }

    pub fn set_hardware_info(&mut self, hardware_info: Option<HardwareInfo>) {
        self.hardware_info = hardware_info.unwrap_or_default();
    }

    pub fn os_info(&self) -> &OsInfo {
        &self.os_info
    }

    pub fn set_os_info(&mut self, os_info: Option<OsInfo>) {
        self.os_info = os_info.unwrap_or_default();
    }

    pub fn tpm_info(&self) -> &TpmInfo {
        &self.tpm_info
    }

    pub fn set_tpm_info(&mut self, tpm_info: Option<TpmInfo>) {
        self.tpm_info = tpm_info.unwrap_or_default();
    }

    pub fn rim_info(&self) -> &RimInfo {
        &self.rim_info
    }

    pub fn set_rim_info(&mut self, rim_info: Option<RimInfo>) {
        self.rim_info = rim_info.unwrap_or_default();
    }
}
