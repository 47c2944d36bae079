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

//! Boot chain milestones found in a decoded event log.

use serde::Serialize;
use serde_json::{Map, Value};
use tcg_event_log::{EventLog, PcrEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFlag {
    Crtm,
    BootManager,
    OsLoader,
    OsKernel,
    AcpiTables,
    SmbiosTables,
    GptTable,
    BootOrder,
    DefaultBootDevice,
    SecureBoot,
    Pk,
    Kek,
    SigDb,
    ForbiddenDbx,
}

/// Matches rendered content containing any `any_of` marker and every `requires` marker.
#[derive(Debug, Clone, Copy)]
pub struct BootChainRule {
    pub any_of: &'static [&'static str],
    pub requires: &'static [&'static str],
    pub flag: SummaryFlag,
}

impl BootChainRule {
    pub fn matches(&self, content: &str) -> bool {
        self.any_of.iter().any(|m| content.contains(m)) && self.requires.iter().all(|m| content.contains(m))
    }
}

const fn rule(any_of: &'static [&'static str], flag: SummaryFlag) -> BootChainRule {
    BootChainRule { any_of, requires: &[], flag }
}

/// Checked in order; the first matching rule classifies an event.
pub const BOOT_CHAIN_RULES: &[BootChainRule] = &[
    rule(&["CRTM"], SummaryFlag::Crtm),
    rule(&["shimx64.efi", "bootmgfw.efi"], SummaryFlag::BootManager),
    rule(&["grubx64.efi", "winload.efi"], SummaryFlag::OsLoader),
    rule(&["vmlinuz", "ntoskrnl.exe"], SummaryFlag::OsKernel),
    rule(&["ACPI"], SummaryFlag::AcpiTables),
    rule(&["SMBIOS"], SummaryFlag::SmbiosTables),
    rule(&["GPT"], SummaryFlag::GptTable),
    rule(&["BootOrder"], SummaryFlag::BootOrder),
    rule(&["Boot0000"], SummaryFlag::DefaultBootDevice),
    rule(&["variable named PK"], SummaryFlag::Pk),
    rule(&["variable named KEK"], SummaryFlag::Kek),
    BootChainRule { any_of: &["variable named db"], requires: &["dbx"], flag: SummaryFlag::ForbiddenDbx },
    rule(&["variable named db"], SummaryFlag::SigDb),
    rule(&["Secure Boot is enabled"], SummaryFlag::SecureBoot),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootChainSummary {
    pub crtm: bool,
    pub boot_manager: bool,
    pub os_loader: bool,
    pub os_kernel: bool,
    pub acpi_tables: bool,
    pub smbios_tables: bool,
    pub gpt_table: bool,
    pub boot_order: bool,
    pub default_boot_device: bool,
    pub secure_boot: bool,
    pub pk: bool,
    pub kek: bool,
    pub sig_db: bool,
    pub forbidden_dbx: bool,
}

impl BootChainSummary {
    pub fn from_events(events: &[PcrEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            if let Some(rule) = BOOT_CHAIN_RULES.iter().find(|r| r.matches(&event.content_str)) {
                summary.set(rule.flag);
            }
        }
        summary
    }

    pub fn from_log(log: &EventLog) -> Self {
        Self::from_events(log.events())
    }

    fn set(&mut self, flag: SummaryFlag) {
        let field = match flag {
            SummaryFlag::Crtm => &mut self.crtm,
            SummaryFlag::BootManager => &mut self.boot_manager,
            SummaryFlag::OsLoader => &mut self.os_loader,
            SummaryFlag::OsKernel => &mut self.os_kernel,
            SummaryFlag::AcpiTables => &mut self.acpi_tables,
            SummaryFlag::SmbiosTables => &mut self.smbios_tables,
            SummaryFlag::GptTable => &mut self.gpt_table,
            SummaryFlag::BootOrder => &mut self.boot_order,
            SummaryFlag::DefaultBootDevice => &mut self.default_boot_device,
            SummaryFlag::SecureBoot => &mut self.secure_boot,
            SummaryFlag::Pk => &mut self.pk,
            SummaryFlag::Kek => &mut self.kek,
            SummaryFlag::SigDb => &mut self.sig_db,
            SummaryFlag::ForbiddenDbx => &mut self.forbidden_dbx,
        };
        *field = true;
    }

    /// Adds the fourteen summary booleans to a detail field map.
    pub fn extend_field_map(&self, map: &mut Map<String, Value>) {
        if let Ok(Value::Object(fields)) = serde_json::to_value(self) {
            map.extend(fields);
        }
    }
}
