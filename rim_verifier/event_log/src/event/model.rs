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

//! Event Type Definitions
//!
//! Event types, digest entries and the decoded payload structures of a TCG event log.

use rim_common_verifier::AlgorithmId;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::event::device_path::DevicePath;

pub const NO_ACTION_EVENT_SIZE: usize = 16;
/// GPT partition names are 36 UCS-2 code units
pub const UEFI_PARTITION_NAME_CHARS: usize = 36;

/// "Spec ID Event03\0"
pub const SPEC_ID_EVENT_SIGNATURE_03: &[u8] = b"Spec ID Event03\0";

/// "Spec ID Event00\0", the TCG 1.2 header of a legacy SHA-1 log
pub const SPEC_ID_EVENT_SIGNATURE_00: &[u8] = b"Spec ID Event00\0";

/// "StartupLocality\0"
pub const STARTUP_LOCALITY_SIGNATURE: &[u8] = b"StartupLocality\0";

pub(crate) fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

/// TCG Event Type Enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EventType {
    EvPrebootCert = 0x00000000,
    EvPostCode = 0x00000001,
    EvUnused = 0x00000002,
    EvNoAction = 0x00000003,
    EvSeparator = 0x00000004,
    EvAction = 0x00000005,
    EvEventTag = 0x00000006,
    EvSCrtmContents = 0x00000007,
    EvSCrtmVersion = 0x00000008,
    EvCpuMicrocode = 0x00000009,
    EvPlatformConfigFlags = 0x0000000A,
    EvTableOfDevices = 0x0000000B,
    EvCompactHash = 0x0000000C,
    EvIpl = 0x0000000D,
    EvIplPartitionData = 0x0000000E,
    EvNonhostCode = 0x0000000F,
    EvNonhostConfig = 0x00000010,
    EvNonhostInfo = 0x00000011,
    EvOmitBootDeviceEvents = 0x00000012,
    EvPostCode2 = 0x00000013,

    // EFI specific event types
    EvEfiEventBase = 0x80000000,
    EvEfiVariableDriverConfig = 0x80000001,
    EvEfiVariableBoot = 0x80000002,
    EvEfiBootServicesApplication = 0x80000003,
    EvEfiBootServicesDriver = 0x80000004,
    EvEfiRuntimeServicesDriver = 0x80000005,
    EvEfiGptEvent = 0x80000006,
    EvEfiAction = 0x80000007,
    EvEfiPlatformFirmwareBlob = 0x80000008,
    EvEfiHandoffTables = 0x80000009,
    EvEfiPlatformFirmwareBlob2 = 0x8000000A,
    EvEfiHandoffTables2 = 0x8000000B,
    EvEfiVariableBoot2 = 0x8000000C,
    EvEfiGptEvent2 = 0x8000000D,
    EvEfiHcrtmEvent = 0x80000010,

    EvEfiVariableAuthority = 0x800000E0,
    EvEfiSpdmFirmwareBlob = 0x800000E1,
    EvEfiSpdmFirmwareConfig = 0x800000E2,
    EvEfiSpdmDevicePolicy = 0x800000E3,
    EvEfiSpdmDeviceAuthority = 0x800000E4,
    Unknown = 0xFFFFFFFF,
}

impl EventType {
    /// Maps a raw event type code; codes outside the known set become `Unknown`.
    pub fn from_u32(value: u32) -> Self {
        match value {
            0x00000000 => Self::EvPrebootCert,
            0x00000001 => Self::EvPostCode,
            0x00000002 => Self::EvUnused,
            0x00000003 => Self::EvNoAction,
            0x00000004 => Self::EvSeparator,
            0x00000005 => Self::EvAction,
            0x00000006 => Self::EvEventTag,
            0x00000007 => Self::EvSCrtmContents,
            0x00000008 => Self::EvSCrtmVersion,
            0x00000009 => Self::EvCpuMicrocode,
            0x0000000A => Self::EvPlatformConfigFlags,
            0x0000000B => Self::EvTableOfDevices,
            0x0000000C => Self::EvCompactHash,
            0x0000000D => Self::EvIpl,
            0x0000000E => Self::EvIplPartitionData,
            0x0000000F => Self::EvNonhostCode,
            0x00000010 => Self::EvNonhostConfig,
            0x00000011 => Self::EvNonhostInfo,
            0x00000012 => Self::EvOmitBootDeviceEvents,
            0x00000013 => Self::EvPostCode2,
            0x80000000 => Self::EvEfiEventBase,
            0x80000001 => Self::EvEfiVariableDriverConfig,
            0x80000002 => Self::EvEfiVariableBoot,
            0x80000003 => Self::EvEfiBootServicesApplication,
            0x80000004 => Self::EvEfiBootServicesDriver,
            0x80000005 => Self::EvEfiRuntimeServicesDriver,
            0x80000006 => Self::EvEfiGptEvent,
            0x80000007 => Self::EvEfiAction,
            0x80000008 => Self::EvEfiPlatformFirmwareBlob,
            0x80000009 => Self::EvEfiHandoffTables,
            0x8000000A => Self::EvEfiPlatformFirmwareBlob2,
            0x8000000B => Self::EvEfiHandoffTables2,
            0x8000000C => Self::EvEfiVariableBoot2,
            0x8000000D => Self::EvEfiGptEvent2,
            0x80000010 => Self::EvEfiHcrtmEvent,
            0x800000E0 => Self::EvEfiVariableAuthority,
            0x800000E1 => Self::EvEfiSpdmFirmwareBlob,
            0x800000E2 => Self::EvEfiSpdmFirmwareConfig,
            0x800000E3 => Self::EvEfiSpdmDevicePolicy,
            0x800000E4 => Self::EvEfiSpdmDeviceAuthority,
            _ => Self::Unknown,
        }
    }

    pub fn is_uefi_variable(&self) -> bool {
        matches!(
            self,
            Self::EvEfiVariableDriverConfig
                | Self::EvEfiVariableBoot
                | Self::EvEfiVariableBoot2
                | Self::EvEfiVariableAuthority
                | Self::EvEfiSpdmDevicePolicy
                | Self::EvEfiSpdmDeviceAuthority
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EvPrebootCert => "EV_PREBOOT_CERT",
            Self::EvPostCode => "EV_POST_CODE",
            Self::EvUnused => "EV_UNUSED",
            Self::EvNoAction => "EV_NO_ACTION",
            Self::EvSeparator => "EV_SEPARATOR",
            Self::EvAction => "EV_ACTION",
            Self::EvEventTag => "EV_EVENT_TAG",
            Self::EvSCrtmContents => "EV_S_CRTM_CONTENTS",
            Self::EvSCrtmVersion => "EV_S_CRTM_VERSION",
            Self::EvCpuMicrocode => "EV_CPU_MICROCODE",
            Self::EvPlatformConfigFlags => "EV_PLATFORM_CONFIG_FLAGS",
            Self::EvTableOfDevices => "EV_TABLE_OF_DEVICES",
            Self::EvCompactHash => "EV_COMPACT_HASH",
            Self::EvIpl => "EV_IPL",
            Self::EvIplPartitionData => "EV_IPL_PARTITION_DATA",
            Self::EvNonhostCode => "EV_NONHOST_CODE",
            Self::EvNonhostConfig => "EV_NONHOST_CONFIG",
            Self::EvNonhostInfo => "EV_NONHOST_INFO",
            Self::EvOmitBootDeviceEvents => "EV_OMIT_BOOT_DEVICE_EVENTS",
            Self::EvPostCode2 => "EV_POST_CODE2",
            Self::EvEfiEventBase => "EV_EFI_EVENT_BASE",
            Self::EvEfiVariableDriverConfig => "EV_EFI_VARIABLE_DRIVER_CONFIG",
            Self::EvEfiVariableBoot => "EV_EFI_VARIABLE_BOOT",
            Self::EvEfiBootServicesApplication => "EV_EFI_BOOT_SERVICES_APPLICATION",
            Self::EvEfiBootServicesDriver => "EV_EFI_BOOT_SERVICES_DRIVER",
            Self::EvEfiRuntimeServicesDriver => "EV_EFI_RUNTIME_SERVICES_DRIVER",
            Self::EvEfiGptEvent => "EV_EFI_GPT_EVENT",
            Self::EvEfiAction => "EV_EFI_ACTION",
            Self::EvEfiPlatformFirmwareBlob => "EV_EFI_PLATFORM_FIRMWARE_BLOB",
            Self::EvEfiHandoffTables => "EV_EFI_HANDOFF_TABLES",
            Self::EvEfiPlatformFirmwareBlob2 => "EV_EFI_PLATFORM_FIRMWARE_BLOB2",
            Self::EvEfiHandoffTables2 => "EV_EFI_HANDOFF_TABLES2",
            Self::EvEfiVariableBoot2 => "EV_EFI_VARIABLE_BOOT2",
            Self::EvEfiGptEvent2 => "EV_EFI_GPT_EVENT2",
            Self::EvEfiHcrtmEvent => "EV_EFI_HCRTM_EVENT",
            Self::EvEfiVariableAuthority => "EV_EFI_VARIABLE_AUTHORITY",
            Self::EvEfiSpdmFirmwareBlob => "EV_EFI_SPDM_FIRMWARE_BLOB",
            Self::EvEfiSpdmFirmwareConfig => "EV_EFI_SPDM_FIRMWARE_CONFIG",
            Self::EvEfiSpdmDevicePolicy => "EV_EFI_SPDM_DEVICE_POLICY",
            Self::EvEfiSpdmDeviceAuthority => "EV_EFI_SPDM_DEVICE_AUTHORITY",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{}", name)
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// One digest of a record, in a single bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TpmDigestEntry {
    pub algorithm_id: AlgorithmId,
    #[serde(serialize_with = "serialize_hex")]
    pub digest: Vec<u8>,
}

impl TpmDigestEntry {
    pub fn new(algorithm_id: AlgorithmId, digest: Vec<u8>) -> Self {
        Self { algorithm_id, digest }
    }
}

/// Algorithm table entry of the Spec ID header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TcgEfiSpecIdEventAlgorithmSize {
    pub algorithm_id: u16,
    pub digest_size: u16,
}

impl TcgEfiSpecIdEventAlgorithmSize {
    pub fn algorithm(&self) -> AlgorithmId {
        AlgorithmId::from(self.algorithm_id)
    }
}

/// Specification ID Event Data
#[derive(Debug, Clone, Serialize)]
pub struct EfiSpecIdEvent {
    pub signature: String,
    pub platform_class: u32,
    pub family_minor: u8,
    pub family_major: u8,
    pub spec_version: u8,
    pub uintn_size: u8,
    pub digest_algorithms: Vec<TcgEfiSpecIdEventAlgorithmSize>,
    #[serde(serialize_with = "serialize_hex")]
    pub vendor_info: Vec<u8>,
}

impl EfiSpecIdEvent {
    /// Digest size declared for a raw algorithm id.
    pub fn digest_size_of(&self, algorithm_id: u16) -> Option<usize> {
        self.digest_algorithms
            .iter()
            .find(|a| a.algorithm_id == algorithm_id)
            .map(|a| a.digest_size as usize)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartupLocalityEvent {
    pub locality: u8,
}

#[derive(Debug, Clone, Serialize)]
pub enum EvNoActionEvent {
    SpecIdEvent(EfiSpecIdEvent),
    LegacySpecId(#[serde(serialize_with = "serialize_hex")] Vec<u8>),
    StartupLocality(StartupLocalityEvent),
    Unknown(#[serde(serialize_with = "serialize_hex")] Vec<u8>),
}

#[derive(Debug, Clone, Serialize)]
pub struct EfiSignatureList {
    pub signature_type: String,
    pub signature_list_size: u32,
    pub signature_header_size: u32,
    pub signature_size: u32,
    pub signatures: Vec<EfiSignatureData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EfiSignatureData {
    pub signature_owner: String,
    #[serde(serialize_with = "serialize_hex")]
    pub signature_data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EfiLoadOption {
    pub attributes: u32,
    pub file_path_list_length: u16,
    pub description: String,
    pub device_path: DevicePath,
}

/// UEFI Variable Data
#[derive(Debug, Clone, Serialize)]
pub enum EfiVariableData {
    SignatureList(Vec<EfiSignatureList>),
    SecureBoot(bool),
    VariableAuthority(String),
    AuthoritySignature(EfiSignatureData),
    BootOrder(Vec<String>),
    Boot(EfiLoadOption),
    Unknown(#[serde(serialize_with = "serialize_hex")] Vec<u8>),
}

/// UEFI_VARIABLE_DATA
#[derive(Debug, Clone, Serialize)]
pub struct UefiVariableDataEvent {
    pub variable_guid: String,
    pub unicode_name: String,
    pub variable_data: EfiVariableData,
}

#[derive(Debug, Clone, Serialize)]
pub struct UefiPlatformFirmwareBlobEvent {
    pub blob_base: u64,
    pub blob_length: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UefiPlatformFirmwareBlobEvent2 {
    pub blob_description: String,
    pub blob_base: u64,
    pub blob_length: u64,
}

/// Payload of POST code and S-CRTM contents events, whose layout depends on the firmware
#[derive(Debug, Clone, Serialize)]
pub enum UefiFirmwareBlobEvent {
    FirmwareString(String),
    FirmwareBlob(UefiPlatformFirmwareBlobEvent),
    FirmwareBlob2(UefiPlatformFirmwareBlobEvent2),
}

#[derive(Debug, Clone, Serialize)]
pub struct PcClientTaggedEvent {
    pub tagged_event_id: u32,
    #[serde(serialize_with = "serialize_hex")]
    pub tagged_event_data: Vec<u8>,
}

/// S-CRTM version as either a GUID or a UCS-2 string
#[derive(Debug, Clone, Serialize)]
pub struct SCrtmVersionEvent {
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvSeparatorEvent {
    pub value: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct UefiPartitionHeader {
    pub signature: String,
    pub revision: u32,
    pub header_size: u32,
    pub header_crc32: u32,
    pub my_lba: u64,
    pub alternate_lba: u64,
    pub first_usable_lba: u64,
    pub last_usable_lba: u64,
    pub disk_guid: String,
    pub partition_entries_lba: u64,
    pub number_of_partition_entries: u32,
    pub size_of_partition_entry: u32,
    pub partition_entry_array_crc32: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct UefiPartitionEntry {
    pub partition_type_guid: String,
    pub unique_partition_guid: String,
    pub starting_lba: u64,
    pub ending_lba: u64,
    pub attributes: u64,
    pub partition_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UefiGptDataEvent {
    pub header: UefiPartitionHeader,
    pub partitions: Vec<UefiPartitionEntry>,
}

/// UEFI_IMAGE_LOAD_EVENT
#[derive(Debug, Clone, Serialize)]
pub struct UefiImageLoadEvent {
    pub image_location_in_memory: u64,
    pub image_length_in_memory: u64,
    pub image_link_time_address: u64,
    pub device_path: DevicePath,
}

#[derive(Debug, Clone, Serialize)]
pub struct UefiConfigurationTable {
    pub vendor_guid: String,
    pub vendor_table: u64,
}

/// UEFI_HANDOFF_TABLE_POINTERS and UEFI_HANDOFF_TABLE_POINTERS2
#[derive(Debug, Clone, Serialize)]
pub struct UefiHandoffTablesEvent {
    pub description: Option<String>,
    pub tables: Vec<UefiConfigurationTable>,
}

/// Decoded payload of a record
#[derive(Debug, Clone, Serialize)]
pub enum TpmEventLog {
    EventBase(#[serde(serialize_with = "serialize_hex")] Vec<u8>),
    EventBaseStr(String),
    EventEfiFirmwareBlob(UefiFirmwareBlobEvent),
    EventNoAction(EvNoActionEvent),
    EventSeparator(EvSeparatorEvent),
    EventPcClientTagged(PcClientTaggedEvent),
    EventSCrtmVersion(SCrtmVersionEvent),
    EventUefiPlatformFirmwareBlob(UefiPlatformFirmwareBlobEvent),
    EventUefiPlatformFirmwareBlob2(UefiPlatformFirmwareBlobEvent2),
    EventUefiVariable(UefiVariableDataEvent),
    EventEfiImageLoad(UefiImageLoadEvent),
    EventEfiGptEvent(UefiGptDataEvent),
    EventEfiHandoffTables(UefiHandoffTablesEvent),
}

/// One decoded record of an event log.
///
/// `event_number` is the record's 0-based position in the log, the header record included.
/// `digest` holds the selected bank's value; `digests` keeps every bank the record carries.
#[derive(Debug, Clone, Serialize)]
pub struct PcrEvent {
    pub event_number: u32,
    pub pcr_index: u32,
    pub event_type: EventType,
    pub event_type_raw: u32,
    #[serde(serialize_with = "serialize_hex")]
    pub digest: Vec<u8>,
    pub digests: Vec<TpmDigestEntry>,
    #[serde(serialize_with = "serialize_hex")]
    pub content: Vec<u8>,
    pub event: TpmEventLog,
    pub content_str: String,
    pub error: bool,
}

impl PcrEvent {
    pub fn digest_hex(&self) -> String {
        hex::encode(&self.digest)
    }

    pub fn content_str(&self) -> &str {
        &self.content_str
    }
}
