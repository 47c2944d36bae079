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

//! Text rendering of decoded event payloads.
//!
//! The rendered text is what reports display and what boot chain classification and
//! variable matching search in, so the phrases emitted here are stable:
//! `Variable Name:<name>` followed by `UEFI_GUID = <guid>` for every UEFI variable,
//! `variable named <name>` for signature databases, `Secure Boot is enabled|disabled`,
//! `S-CRTM` for CRTM measurements, `GPT` for partition tables, and `SMBIOS` / `ACPI`
//! for the matching handoff tables.

use std::fmt::Write;

use crate::event::model::{
    EfiVariableData, EvNoActionEvent, EventType, TpmEventLog, UefiFirmwareBlobEvent, UefiHandoffTablesEvent,
    UefiVariableDataEvent,
};

const SMBIOS_TABLE_GUID: &str = "eb9d2d31-2d88-11d3-9a16-0090273fc14d";
const SMBIOS3_TABLE_GUID: &str = "f2fd1544-9794-4a2c-992e-e5bbcf20e394";
const ACPI_TABLE_GUID: &str = "eb9d2d30-2d88-11d3-9a16-0090273fc14d";
const ACPI_20_TABLE_GUID: &str = "8868e871-e4f1-11d3-bc22-0080c73c8881";

fn table_name(guid: &str) -> &'static str {
    match guid {
        SMBIOS_TABLE_GUID => "SMBIOS Table",
        SMBIOS3_TABLE_GUID => "SMBIOS3 Table",
        ACPI_TABLE_GUID => "ACPI Table",
        ACPI_20_TABLE_GUID => "ACPI 2.0 Table",
        _ => "Vendor Table",
    }
}

fn render_variable(var: &UefiVariableDataEvent) -> String {
    let mut out = format!("Variable Name:{}\nUEFI_GUID = {}\n", var.unicode_name, var.variable_guid);
    // writing to a String cannot fail
    let _ = match &var.variable_data {
        EfiVariableData::SecureBoot(enabled) if var.unicode_name == "SecureBoot" => {
            writeln!(out, "Secure Boot is {}", if *enabled { "enabled" } else { "disabled" })
        },
        EfiVariableData::SecureBoot(enabled) => writeln!(out, "Value: {}", if *enabled { "Yes" } else { "No" }),
        EfiVariableData::SignatureList(lists) => {
            let signatures: usize = lists.iter().map(|l| l.signatures.len()).sum();
            writeln!(
                out,
                "UEFI Variable: variable named {} holds {} signature list(s) and {} signature(s)",
                var.unicode_name,
                lists.len(),
                signatures
            )
        },
        EfiVariableData::AuthoritySignature(sig) => writeln!(
            out,
            "UEFI Variable: authority from variable named {}, owner {}",
            var.unicode_name, sig.signature_owner
        ),
        EfiVariableData::VariableAuthority(text) => writeln!(out, "{}", text.trim_end()),
        EfiVariableData::BootOrder(order) => writeln!(out, "BootOrder: {}", order.join(" ")),
        EfiVariableData::Boot(option) => writeln!(out, "Description: {}", option.description),
        EfiVariableData::Unknown(data) => writeln!(out, "Data: {}", hex::encode(data)),
    };
    out
}

fn render_handoff_tables(tables: &UefiHandoffTablesEvent) -> String {
    let mut out = String::new();
    if let Some(description) = &tables.description {
        let _ = writeln!(out, "{}", description);
    }
    let _ = writeln!(out, "Number of Tables: {}", tables.tables.len());
    for table in &tables.tables {
        let _ = writeln!(out, "{} {} at 0x{:x}", table_name(&table.vendor_guid), table.vendor_guid, table.vendor_table);
    }
    out
}

/// Renders a decoded payload as text.
pub fn render_content(event_type: &EventType, event: &TpmEventLog) -> String {
    let text = match event {
        TpmEventLog::EventBase(data) => hex::encode(data),
        TpmEventLog::EventBaseStr(text) => text.clone(),
        TpmEventLog::EventEfiFirmwareBlob(blob) => {
            let prefix = if *event_type == EventType::EvSCrtmContents { "S-CRTM Contents: " } else { "" };
            match blob {
                UefiFirmwareBlobEvent::FirmwareString(text) => format!("{}{}", prefix, text),
                UefiFirmwareBlobEvent::FirmwareBlob(b) => {
                    format!("{}Firmware Blob base 0x{:x}, length {}", prefix, b.blob_base, b.blob_length)
                },
                UefiFirmwareBlobEvent::FirmwareBlob2(b) => format!(
                    "{}{}: Firmware Blob base 0x{:x}, length {}",
                    prefix, b.blob_description, b.blob_base, b.blob_length
                ),
            }
        },
        TpmEventLog::EventNoAction(no_action) => match no_action {
            EvNoActionEvent::SpecIdEvent(spec) => {
                let algorithms: Vec<String> = spec.digest_algorithms.iter().map(|a| a.algorithm().to_string()).collect();
                format!(
                    "{} version {}.{} errata {}, algorithms: {}",
                    spec.signature,
                    spec.family_major,
                    spec.family_minor,
                    spec.spec_version,
                    algorithms.join(", ")
                )
            },
            EvNoActionEvent::LegacySpecId(_) => "Spec ID Event00".to_string(),
            EvNoActionEvent::StartupLocality(loc) => format!("StartupLocality {}", loc.locality),
            EvNoActionEvent::Unknown(data) => hex::encode(data),
        },
        TpmEventLog::EventSeparator(sep) => format!("Separator value 0x{:08x}", sep.value),
        TpmEventLog::EventPcClientTagged(tag) => {
            format!("Tagged Event id {}: {}", tag.tagged_event_id, hex::encode(&tag.tagged_event_data))
        },
        TpmEventLog::EventSCrtmVersion(version) => format!("S-CRTM Version: {}", version.version),
        TpmEventLog::EventUefiPlatformFirmwareBlob(b) => {
            format!("Platform Firmware Blob base 0x{:x}, length {}", b.blob_base, b.blob_length)
        },
        TpmEventLog::EventUefiPlatformFirmwareBlob2(b) => format!(
            "Platform Firmware Blob {} base 0x{:x}, length {}",
            b.blob_description, b.blob_base, b.blob_length
        ),
        TpmEventLog::EventUefiVariable(var) => render_variable(var),
        TpmEventLog::EventEfiImageLoad(image) => format!(
            "UEFI Image Load: {} (length {})",
            image.device_path.file_path().unwrap_or_else(|| image.device_path.to_string()),
            image.image_length_in_memory
        ),
        TpmEventLog::EventEfiGptEvent(gpt) => format!(
            "GPT Header: disk {}, {} partition(s)",
            gpt.header.disk_guid,
            gpt.partitions.len()
        ),
        TpmEventLog::EventEfiHandoffTables(tables) => render_handoff_tables(tables),
    };
    text.replace('\0', "")
}
