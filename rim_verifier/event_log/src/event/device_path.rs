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

//! UEFI device paths carried by image load events and boot options.
//!
//! A device path is a packed list of nodes `{type: u8, subtype: u8, length: u16, data}`
//! where `length` counts the 4 byte node header. Only the nodes needed to name a boot
//! component are decoded; everything else is kept as raw bytes.

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use std::fmt;

use crate::event::model::serialize_hex;

const NODE_HEADER_SIZE: usize = 4;

const TYPE_HARDWARE: u8 = 0x01;
const TYPE_ACPI: u8 = 0x02;
const TYPE_MESSAGING: u8 = 0x03;
const TYPE_MEDIA: u8 = 0x04;
const TYPE_END: u8 = 0x7F;

const SUBTYPE_PCI: u8 = 0x01;
const SUBTYPE_ACPI: u8 = 0x01;
const SUBTYPE_HARD_DRIVE: u8 = 0x01;
const SUBTYPE_FILE_PATH: u8 = 0x04;
const SUBTYPE_FIRMWARE_FILE: u8 = 0x06;
const SUBTYPE_FIRMWARE_VOLUME: u8 = 0x07;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DevicePathNode {
    Pci { function: u8, device: u8 },
    Acpi { hid: u32, uid: u32 },
    HardDrive { partition_number: u32, partition_start: u64, partition_size: u64, signature: String },
    FilePath(String),
    FirmwareFile(String),
    FirmwareVolume(String),
    End,
    Other {
        device_type: u8,
        device_subtype: u8,
        #[serde(serialize_with = "serialize_hex")]
        data: Vec<u8>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DevicePath {
    pub nodes: Vec<DevicePathNode>,
}

fn ucs2_to_string(data: &[u8]) -> String {
    data.chunks_exact(2)
        .map(LittleEndian::read_u16)
        .take_while(|c| *c != 0)
        .map(|c| std::char::from_u32(c as u32).unwrap_or('\u{FFFD}'))
        .collect()
}

fn guid_to_string(data: &[u8]) -> String {
    match <[u8; 16]>::try_from(data) {
        Ok(bytes) => uuid::Uuid::from_bytes_le(bytes).to_string(),
        Err(_) => hex::encode(data),
    }
}

impl DevicePathNode {
    fn parse(device_type: u8, device_subtype: u8, data: &[u8]) -> Self {
        match (device_type, device_subtype, data.len()) {
            (TYPE_END, _, _) => DevicePathNode::End,
            (TYPE_HARDWARE, SUBTYPE_PCI, 2) => DevicePathNode::Pci { function: data[0], device: data[1] },
            (TYPE_ACPI, SUBTYPE_ACPI, 8) => DevicePathNode::Acpi {
                hid: LittleEndian::read_u32(&data[0..4]),
                uid: LittleEndian::read_u32(&data[4..8]),
            },
            (TYPE_MEDIA, SUBTYPE_HARD_DRIVE, 38) => DevicePathNode::HardDrive {
                partition_number: LittleEndian::read_u32(&data[0..4]),
                partition_start: LittleEndian::read_u64(&data[4..12]),
                partition_size: LittleEndian::read_u64(&data[12..20]),
                signature: if data[37] == 0x02 { guid_to_string(&data[20..36]) } else { hex::encode(&data[20..24]) },
            },
            (TYPE_MEDIA, SUBTYPE_FILE_PATH, _) => DevicePathNode::FilePath(ucs2_to_string(data)),
            (TYPE_MEDIA, SUBTYPE_FIRMWARE_FILE, 16) => DevicePathNode::FirmwareFile(guid_to_string(data)),
            (TYPE_MEDIA, SUBTYPE_FIRMWARE_VOLUME, 16) => DevicePathNode::FirmwareVolume(guid_to_string(data)),
            _ => DevicePathNode::Other { device_type, device_subtype, data: data.to_vec() },
        }
    }
}

impl DevicePath {
    /// Decodes a device path. A node whose length is inconsistent with the buffer ends
    /// decoding and the remaining bytes are kept as an opaque node.
    pub fn parse(data: &[u8]) -> Self {
        let mut nodes = Vec::new();
        let mut offset = 0usize;
        while offset < data.len() {
            let rest = &data[offset..];
            if rest.len() < NODE_HEADER_SIZE {
                nodes.push(DevicePathNode::Other { device_type: 0, device_subtype: 0, data: rest.to_vec() });
                break;
            }
            let length = LittleEndian::read_u16(&rest[2..4]) as usize;
            if length < NODE_HEADER_SIZE || length > rest.len() {
                nodes.push(DevicePathNode::Other { device_type: rest[0], device_subtype: rest[1], data: rest.to_vec() });
                break;
            }
            let node = DevicePathNode::parse(rest[0], rest[1], &rest[NODE_HEADER_SIZE..length]);
            let end = node == DevicePathNode::End && rest[1] == 0xFF;
            nodes.push(node);
            offset += length;
            if end {
                break;
            }
        }
        DevicePath { nodes }
    }

    /// File path nodes joined in order, e.g. `\EFI\BOOT\shimx64.efi`.
    pub fn file_path(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .nodes
            .iter()
            .filter_map(|n| match n {
                DevicePathNode::FilePath(p) => Some(p.as_str()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(""))
        }
    }
}

impl fmt::Display for DevicePathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevicePathNode::Pci { function, device } => write!(f, "Pci(0x{:x},0x{:x})", device, function),
            DevicePathNode::Acpi { hid, uid } => write!(f, "Acpi(0x{:08x},0x{:x})", hid, uid),
            DevicePathNode::HardDrive { partition_number, signature, .. } => {
                write!(f, "HD({},{})", partition_number, signature)
            },
            DevicePathNode::FilePath(path) => write!(f, "{}", path),
            DevicePathNode::FirmwareFile(guid) => write!(f, "FvFile({})", guid),
            DevicePathNode::FirmwareVolume(guid) => write!(f, "Fv({})", guid),
            DevicePathNode::End => Ok(()),
            DevicePathNode::Other { device_type, device_subtype, .. } => {
                let kind = match *device_type {
                    TYPE_MESSAGING => "Msg",
                    TYPE_MEDIA => "Media",
                    _ => "Path",
                };
                write!(f, "{}(0x{:x},0x{:x})", kind, device_type, device_subtype)
            },
        }
    }
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .nodes
            .iter()
            .filter(|n| **n != DevicePathNode::End)
            .map(|n| n.to_string())
            .collect();
        write!(f, "{}", rendered.join("/"))
    }
}
