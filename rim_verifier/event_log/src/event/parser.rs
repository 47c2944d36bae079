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

//! Event Parsing Module
//!
//! Record digest parsing for both log formats and `ByteParseable` implementations for the
//! payload structures in `model`.

use rim_common_verifier::{AlgorithmId, RimError};
use std::mem::size_of;

use crate::byte_reader::{ByteParseable, ByteReader, UEFI_GUID_SIZE};
use crate::event::device_path::DevicePath;
use crate::event::model::{
    EfiLoadOption, EfiSignatureData, EfiSignatureList, EfiSpecIdEvent, EfiVariableData, EvNoActionEvent,
    EvSeparatorEvent, EventType, PcClientTaggedEvent, SCrtmVersionEvent, StartupLocalityEvent,
    TcgEfiSpecIdEventAlgorithmSize, TpmDigestEntry, TpmEventLog, UefiConfigurationTable, UefiFirmwareBlobEvent,
    UefiGptDataEvent, UefiHandoffTablesEvent, UefiImageLoadEvent, UefiPartitionEntry, UefiPartitionHeader,
    UefiPlatformFirmwareBlobEvent, UefiPlatformFirmwareBlobEvent2, UefiVariableDataEvent, NO_ACTION_EVENT_SIZE,
    SPEC_ID_EVENT_SIGNATURE_00, SPEC_ID_EVENT_SIGNATURE_03, STARTUP_LOCALITY_SIGNATURE, UEFI_PARTITION_NAME_CHARS,
};

const SHA1_DIGEST_SIZE: usize = 20;
// sha1, sha256, sha384, sha512, sm3
const TCG_DIGEST_ALGORITHM_COUNT: u32 = 5;

const VAR_SECURE_BOOT: &str = "SecureBoot";
const VAR_DB: &str = "db";
const VAR_DBX: &str = "dbx";
const VAR_KEK: &str = "KEK";
const VAR_PK: &str = "PK";
const VAR_SBAT_LEVEL: &str = "SbatLevel";
const VAR_SHIM: &str = "Shim";
const VAR_MOK_LIST: &str = "MokList";
const VAR_MOK_LIST_TRUSTED: &str = "MokListTrusted";
const VAR_BOOT_ORDER: &str = "BootOrder";
const VAR_BOOT_PREFIX: &str = "Boot";

/// Reads the digest part of a record.
pub trait TcgDigestParse {
    fn parse_digest(&self, parser: &mut ByteReader<'_>) -> Result<Vec<TpmDigestEntry>, RimError>;
}

/// TCG 1.2 record: a single SHA-1 digest.
pub struct TcgDigestParseV1;

/// Crypto-agile record: TPML_DIGEST_VALUES sized by the Spec ID header.
pub struct TcgDigestParseV2<'a> {
    pub spec_id: &'a EfiSpecIdEvent,
}

impl TcgDigestParse for TcgDigestParseV1 {
    fn parse_digest(&self, parser: &mut ByteReader<'_>) -> Result<Vec<TpmDigestEntry>, RimError> {
        let digest = parser.read_bytes(SHA1_DIGEST_SIZE)?;
        Ok(vec![TpmDigestEntry::new(AlgorithmId::Sha1, digest)])
    }
}

impl TcgDigestParse for TcgDigestParseV2<'_> {
    fn parse_digest(&self, parser: &mut ByteReader<'_>) -> Result<Vec<TpmDigestEntry>, RimError> {
        let digest_count = parser.read_u32()?;
        if digest_count > TCG_DIGEST_ALGORITHM_COUNT {
            return Err(RimError::MalformedLog(format!("Invalid digest count: {}", digest_count)));
        }

        let mut digests = Vec::with_capacity(digest_count as usize);
        for _ in 0..digest_count {
            let algorithm_id_raw = parser.read_u16()?;
            let algorithm_id = AlgorithmId::from(algorithm_id_raw);
            let digest_size = self
                .spec_id
                .digest_size_of(algorithm_id_raw)
                .unwrap_or_else(|| algorithm_id.digest_size());
            if digest_size == 0 {
                return Err(RimError::MalformedLog(format!("Unknown digest algorithm: 0x{:04x}", algorithm_id_raw)));
            }
            let digest = parser.read_bytes(digest_size)?;
            digests.push(TpmDigestEntry::new(algorithm_id, digest));
        }
        Ok(digests)
    }
}

impl ByteParseable for EfiSpecIdEvent {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let platform_class = parser.read_u32()?;
        let family_minor = parser.read_u8()?;
        let family_major = parser.read_u8()?;
        let spec_version = parser.read_u8()?;
        let uintn_size = parser.read_u8()?;

        let algorithm_count = parser.read_u32()?;
        if algorithm_count == 0 || algorithm_count > TCG_DIGEST_ALGORITHM_COUNT {
            return Err(RimError::MalformedLog(format!("Invalid algorithm count: {}", algorithm_count)));
        }

        let mut digest_algorithms = Vec::with_capacity(algorithm_count as usize);
        for _ in 0..algorithm_count {
            let algorithm_id = parser.read_u16()?;
            let digest_size = parser.read_u16()?;
            digest_algorithms.push(TcgEfiSpecIdEventAlgorithmSize { algorithm_id, digest_size });
        }

        let vendor_info_size = parser.read_u8()?;
        let vendor_info = parser.read_bytes(vendor_info_size as usize)?;

        Ok(EfiSpecIdEvent {
            signature: String::from_utf8_lossy(SPEC_ID_EVENT_SIGNATURE_03).trim_end_matches('\0').to_string(),
            platform_class,
            family_minor,
            family_major,
            spec_version,
            uintn_size,
            digest_algorithms,
            vendor_info,
        })
    }
}

impl ByteParseable for EvNoActionEvent {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        if parser.remaining() < NO_ACTION_EVENT_SIZE as u64 {
            return Ok(EvNoActionEvent::Unknown(parser.read_to_end()?));
        }
        let start = parser.position();
        let signature = parser.read_bytes(NO_ACTION_EVENT_SIZE)?;
        if signature == SPEC_ID_EVENT_SIGNATURE_03 {
            Ok(EvNoActionEvent::SpecIdEvent(EfiSpecIdEvent::parse_from(parser)?))
        } else if signature == SPEC_ID_EVENT_SIGNATURE_00 {
            parser.set_position(start)?;
            Ok(EvNoActionEvent::LegacySpecId(parser.read_to_end()?))
        } else if signature == STARTUP_LOCALITY_SIGNATURE {
            let locality = parser.read_u8()?;
            Ok(EvNoActionEvent::StartupLocality(StartupLocalityEvent { locality }))
        } else {
            parser.set_position(start)?;
            Ok(EvNoActionEvent::Unknown(parser.read_to_end()?))
        }
    }
}

impl ByteParseable for EvSeparatorEvent {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        Ok(EvSeparatorEvent { value: parser.read_u32()? })
    }
}

impl ByteParseable for PcClientTaggedEvent {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let tagged_event_id = parser.read_u32()?;
        let tagged_event_data_size = parser.read_u32()?;
        let tagged_event_data = parser.read_bytes(tagged_event_data_size as usize)?;
        Ok(PcClientTaggedEvent { tagged_event_id, tagged_event_data })
    }
}

impl ByteParseable for UefiPlatformFirmwareBlobEvent {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let blob_base = parser.read_u64()?;
        let blob_length = parser.read_u64()?;
        Ok(UefiPlatformFirmwareBlobEvent { blob_base, blob_length })
    }
}

impl ByteParseable for UefiPlatformFirmwareBlobEvent2 {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let blob_description_size = parser.read_u8()?;
        let blob_description = parser.read_string(blob_description_size as usize)?;
        let blob_base = parser.read_u64()?;
        let blob_length = parser.read_u64()?;
        Ok(UefiPlatformFirmwareBlobEvent2 { blob_description, blob_base, blob_length })
    }
}

impl ByteParseable for UefiFirmwareBlobEvent {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let blob_size = size_of::<u64>() * 2;
        let remaining = parser.remaining() as usize;
        if remaining == blob_size {
            return Ok(UefiFirmwareBlobEvent::FirmwareBlob(UefiPlatformFirmwareBlobEvent::parse_from(parser)?));
        }
        if remaining > blob_size {
            let start = parser.position();
            let description_size = parser.read_u8()? as usize;
            parser.set_position(start)?;
            if remaining == size_of::<u8>() + description_size + blob_size {
                return Ok(UefiFirmwareBlobEvent::FirmwareBlob2(UefiPlatformFirmwareBlobEvent2::parse_from(parser)?));
            }
        }
        Ok(UefiFirmwareBlobEvent::FirmwareString(parser.read_string(remaining)?))
    }
}

impl ByteParseable for SCrtmVersionEvent {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let version = if parser.remaining() as usize == UEFI_GUID_SIZE {
            parser.read_guid()?
        } else {
            parser.read_ucs2_string()?
        };
        Ok(SCrtmVersionEvent { version })
    }
}

impl ByteParseable for EfiSignatureData {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let signature_owner = parser.read_guid()?;
        let signature_data = parser.read_to_end()?;
        Ok(EfiSignatureData { signature_owner, signature_data })
    }
}

impl ByteParseable for EfiSignatureList {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let signature_type = parser.read_guid()?;
        let signature_list_size = parser.read_u32()?;
        let signature_header_size = parser.read_u32()?;
        let signature_size = parser.read_u32()?;
        parser.read_bytes(signature_header_size as usize)?;

        // guid + list size + header size + signature size + header
        let prefix_size = UEFI_GUID_SIZE + size_of::<u32>() * 3 + signature_header_size as usize;
        if (signature_list_size as usize) < prefix_size || (signature_size as usize) <= UEFI_GUID_SIZE {
            return Err(RimError::MalformedLog("Invalid signature list size or signature size".to_string()));
        }

        let signature_count = (signature_list_size as usize - prefix_size) / signature_size as usize;
        let mut signatures = Vec::with_capacity(signature_count);
        for _ in 0..signature_count {
            let signature_owner = parser.read_guid()?;
            let signature_data = parser.read_bytes(signature_size as usize - UEFI_GUID_SIZE)?;
            signatures.push(EfiSignatureData { signature_owner, signature_data });
        }

        Ok(EfiSignatureList { signature_type, signature_list_size, signature_header_size, signature_size, signatures })
    }
}

impl ByteParseable for EfiLoadOption {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let attributes = parser.read_u32()?;
        let file_path_list_length = parser.read_u16()?;
        let description = parser.read_ucs2_string()?;
        let device_path_bytes = parser.read_bytes((file_path_list_length as usize).min(parser.remaining() as usize))?;
        // optional data after the file path list is not interpreted
        parser.read_to_end()?;
        Ok(EfiLoadOption {
            attributes,
            file_path_list_length,
            description,
            device_path: DevicePath::parse(&device_path_bytes),
        })
    }
}

fn is_boot_option_name(name: &str) -> bool {
    name.len() == 8
        && name.starts_with(VAR_BOOT_PREFIX)
        && name[VAR_BOOT_PREFIX.len()..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Parses UEFI_VARIABLE_DATA and interprets the variables the boot chain relies on.
pub fn parse_uefi_variable_data_event(
    event_type: &EventType,
    parser: &mut ByteReader<'_>,
) -> Result<UefiVariableDataEvent, RimError> {
    let variable_guid = parser.read_guid()?;
    // length in UCS-2 code units
    let unicode_name_length = parser.read_u64()?;
    // length in bytes
    let variable_data_length = parser.read_u64()?;
    let unicode_name = parser.read_unicode_name(unicode_name_length as usize)?;
    let data = parser.read_bytes(variable_data_length as usize)?;
    let mut data_reader = ByteReader::new(&data);

    let variable_data = match (event_type, unicode_name.as_str()) {
        (EventType::EvEfiVariableDriverConfig, VAR_PK | VAR_KEK | VAR_DB | VAR_DBX) => {
            let mut lists = Vec::new();
            while !data_reader.is_end() {
                lists.push(EfiSignatureList::parse_from(&mut data_reader)?);
            }
            EfiVariableData::SignatureList(lists)
        },
        (EventType::EvEfiVariableDriverConfig, VAR_SECURE_BOOT) => {
            EfiVariableData::SecureBoot(data_reader.read_u8()? == 1)
        },
        (EventType::EvEfiVariableAuthority, VAR_SBAT_LEVEL) => {
            EfiVariableData::VariableAuthority(data_reader.read_string(data.len())?)
        },
        (EventType::EvEfiVariableAuthority, VAR_MOK_LIST_TRUSTED) => {
            EfiVariableData::SecureBoot(data_reader.read_u8()? == 1)
        },
        (EventType::EvEfiVariableAuthority, VAR_DB | VAR_SHIM | VAR_MOK_LIST) => {
            EfiVariableData::AuthoritySignature(EfiSignatureData::parse_from(&mut data_reader)?)
        },
        (EventType::EvEfiVariableBoot | EventType::EvEfiVariableBoot2, VAR_BOOT_ORDER) => {
            let mut boot_order = Vec::with_capacity(data.len() / 2);
            while data_reader.remaining() >= 2 {
                boot_order.push(format!("{}{:04X}", VAR_BOOT_PREFIX, data_reader.read_u16()?));
            }
            EfiVariableData::BootOrder(boot_order)
        },
        (EventType::EvEfiVariableBoot | EventType::EvEfiVariableBoot2, name) if is_boot_option_name(name) => {
            EfiVariableData::Boot(EfiLoadOption::parse_from(&mut data_reader)?)
        },
        _ => EfiVariableData::Unknown(data),
    };

    Ok(UefiVariableDataEvent { variable_guid, unicode_name, variable_data })
}

impl ByteParseable for UefiPartitionHeader {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let signature = parser.read_string(size_of::<u64>())?;
        let revision = parser.read_u32()?;
        let header_size = parser.read_u32()?;
        let header_crc32 = parser.read_u32()?;
        // reserved
        parser.read_u32()?;
        Ok(Self {
            signature,
            revision,
            header_size,
            header_crc32,
            my_lba: parser.read_u64()?,
            alternate_lba: parser.read_u64()?,
            first_usable_lba: parser.read_u64()?,
            last_usable_lba: parser.read_u64()?,
            disk_guid: parser.read_guid()?,
            partition_entries_lba: parser.read_u64()?,
            number_of_partition_entries: parser.read_u32()?,
            size_of_partition_entry: parser.read_u32()?,
            partition_entry_array_crc32: parser.read_u32()?,
        })
    }
}

impl ByteParseable for UefiPartitionEntry {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        Ok(Self {
            partition_type_guid: parser.read_guid()?,
            unique_partition_guid: parser.read_guid()?,
            starting_lba: parser.read_u64()?,
            ending_lba: parser.read_u64()?,
            attributes: parser.read_u64()?,
            partition_name: parser.read_unicode_name(UEFI_PARTITION_NAME_CHARS)?,
        })
    }
}

impl ByteParseable for UefiGptDataEvent {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let header = UefiPartitionHeader::parse_from(parser)?;
        let number_of_partitions = parser.read_u64()?;
        let mut partitions = Vec::new();
        for _ in 0..number_of_partitions {
            let start = parser.position();
            partitions.push(UefiPartitionEntry::parse_from(parser)?);
            // entries may be larger than the fields we read
            let entry_size = header.size_of_partition_entry as u64;
            if entry_size > parser.position() - start {
                parser.set_position(start + entry_size)?;
            }
        }
        Ok(Self { header, partitions })
    }
}

impl ByteParseable for UefiImageLoadEvent {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError> {
        let image_location_in_memory = parser.read_u64()?;
        let image_length_in_memory = parser.read_u64()?;
        let image_link_time_address = parser.read_u64()?;
        let length_of_device_path = parser.read_u64()?;
        let device_path = parser.read_bytes(length_of_device_path as usize)?;
        Ok(Self {
            image_location_in_memory,
            image_length_in_memory,
            image_link_time_address,
            device_path: DevicePath::parse(&device_path),
        })
    }
}

/// Parses UEFI_HANDOFF_TABLE_POINTERS, or the POINTERS2 form when `with_description` is set.
pub fn parse_handoff_tables(parser: &mut ByteReader<'_>, with_description: bool) -> Result<UefiHandoffTablesEvent, RimError> {
    let description = if with_description {
        let size = parser.read_u8()?;
        Some(parser.read_string(size as usize)?)
    } else {
        None
    };
    let count = parser.read_u64()?;
    let entry_size = (UEFI_GUID_SIZE + size_of::<u64>()) as u64;
    if count.saturating_mul(entry_size) > parser.remaining() {
        return Err(RimError::MalformedLog(format!("Handoff table count {} exceeds event data", count)));
    }
    let mut tables = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let vendor_guid = parser.read_guid()?;
        let vendor_table = parser.read_u64()?;
        tables.push(UefiConfigurationTable { vendor_guid, vendor_table });
    }
    Ok(UefiHandoffTablesEvent { description, tables })
}

/// Parses `T` and wraps it into a payload variant.
pub fn parse_typed_event<T, F>(parser: &mut ByteReader<'_>, wrapper: F, event_name: &str) -> Result<TpmEventLog, RimError>
where
    T: ByteParseable,
    F: FnOnce(T) -> TpmEventLog,
{
    T::parse_from(parser)
        .map(wrapper)
        .map_err(|e| RimError::MalformedLog(format!("Failed to parse {}: {}", event_name, e)))
}

/// Interprets the payload of a record by event type.
pub fn parse_event_data(event_type: &EventType, event_data: &[u8]) -> Result<TpmEventLog, RimError> {
    let mut parser = ByteReader::new(event_data);

    match event_type {
        EventType::EvPostCode | EventType::EvPostCode2 | EventType::EvSCrtmContents => {
            parse_typed_event::<UefiFirmwareBlobEvent, _>(&mut parser, TpmEventLog::EventEfiFirmwareBlob, "Firmware Blob Event")
        },
        EventType::EvEfiPlatformFirmwareBlob => parse_typed_event::<UefiPlatformFirmwareBlobEvent, _>(
            &mut parser,
            TpmEventLog::EventUefiPlatformFirmwareBlob,
            "UEFI Platform Firmware Blob Event",
        ),
        EventType::EvEfiPlatformFirmwareBlob2 => parse_typed_event::<UefiPlatformFirmwareBlobEvent2, _>(
            &mut parser,
            TpmEventLog::EventUefiPlatformFirmwareBlob2,
            "UEFI Platform Firmware Blob2 Event",
        ),
        EventType::EvNoAction => {
            parse_typed_event::<EvNoActionEvent, _>(&mut parser, TpmEventLog::EventNoAction, "No Action Event")
        },
        EventType::EvSeparator => {
            parse_typed_event::<EvSeparatorEvent, _>(&mut parser, TpmEventLog::EventSeparator, "Separator Event")
        },
        EventType::EvAction
        | EventType::EvOmitBootDeviceEvents
        | EventType::EvEfiAction
        | EventType::EvIpl
        | EventType::EvEfiHcrtmEvent => Ok(TpmEventLog::EventBaseStr(parser.read_string(event_data.len())?)),
        EventType::EvEventTag => {
            parse_typed_event::<PcClientTaggedEvent, _>(&mut parser, TpmEventLog::EventPcClientTagged, "Tagged Event")
        },
        EventType::EvSCrtmVersion => {
            parse_typed_event::<SCrtmVersionEvent, _>(&mut parser, TpmEventLog::EventSCrtmVersion, "S-CRTM Version Event")
        },
        t if t.is_uefi_variable() => parse_uefi_variable_data_event(event_type, &mut parser)
            .map(TpmEventLog::EventUefiVariable)
            .map_err(|e| RimError::MalformedLog(format!("Failed to parse UEFI variable event: {}", e))),
        EventType::EvEfiGptEvent | EventType::EvEfiGptEvent2 => {
            parse_typed_event::<UefiGptDataEvent, _>(&mut parser, TpmEventLog::EventEfiGptEvent, "UEFI GPT Event")
        },
        EventType::EvEfiBootServicesApplication
        | EventType::EvEfiBootServicesDriver
        | EventType::EvEfiRuntimeServicesDriver => {
            parse_typed_event::<UefiImageLoadEvent, _>(&mut parser, TpmEventLog::EventEfiImageLoad, "UEFI Image Load Event")
        },
        EventType::EvEfiHandoffTables | EventType::EvEfiHandoffTables2 => {
            parse_handoff_tables(&mut parser, *event_type == EventType::EvEfiHandoffTables2)
                .map(TpmEventLog::EventEfiHandoffTables)
        },
        _ => Ok(TpmEventLog::EventBase(parser.read_to_end()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable_event(name: &str, data: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; UEFI_GUID_SIZE];
        out.extend((name.encode_utf16().count() as u64).to_le_bytes());
        out.extend((data.len() as u64).to_le_bytes());
        out.extend(name.encode_utf16().flat_map(|c| c.to_le_bytes()));
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn test_parse_secure_boot_variable() {
        let data = variable_event("SecureBoot", &[1]);
        let event = parse_event_data(&EventType::EvEfiVariableDriverConfig, &data).unwrap();
        match event {
            TpmEventLog::EventUefiVariable(var) => {
                assert_eq!(var.unicode_name, "SecureBoot");
                assert!(matches!(var.variable_data, EfiVariableData::SecureBoot(true)));
            },
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_parse_boot_order_variable() {
        let data = variable_event("BootOrder", &[0x00, 0x00, 0x01, 0x00]);
        let event = parse_event_data(&EventType::EvEfiVariableBoot, &data).unwrap();
        let TpmEventLog::EventUefiVariable(var) = event else { panic!("not a variable event") };
        match var.variable_data {
            EfiVariableData::BootOrder(order) => assert_eq!(order, vec!["Boot0000", "Boot0001"]),
            other => panic!("unexpected data {:?}", other),
        }
    }

    #[test]
    fn test_parse_variable_when_data_length_overruns_then_error() {
        let mut data = variable_event("db", &[0u8; 4]);
        data.truncate(data.len() - 2);
        let err = parse_event_data(&EventType::EvEfiVariableDriverConfig, &data).unwrap_err();
        assert!(matches!(err, RimError::MalformedLog(_)));
    }

    #[test]
    fn test_firmware_blob_falls_back_to_string() {
        let event = parse_event_data(&EventType::EvPostCode, b"ACPI DATA").unwrap();
        assert!(matches!(event, TpmEventLog::EventEfiFirmwareBlob(UefiFirmwareBlobEvent::FirmwareString(ref s)) if s == "ACPI DATA"));
    }

    #[test]
    fn test_handoff_tables_read_guid_entries() {
        let mut data = 1u64.to_le_bytes().to_vec();
        data.extend([0x31, 0x2d, 0x9d, 0xeb, 0x88, 0x2d, 0xd3, 0x11, 0x9a, 0x16, 0x00, 0x90, 0x27, 0x3f, 0xc1, 0x4d]);
        data.extend(0x7f00_0000u64.to_le_bytes());
        let event = parse_event_data(&EventType::EvEfiHandoffTables, &data).unwrap();
        let TpmEventLog::EventEfiHandoffTables(tables) = event else { panic!("not a handoff event") };
        assert_eq!(tables.tables[0].vendor_guid, "eb9d2d31-2d88-11d3-9a16-0090273fc14d");
    }
}
