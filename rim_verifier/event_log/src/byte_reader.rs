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

//! Byte Reader Module
//!
//! Little-endian cursor over event log bytes. Every read is bounds checked and reports
//! running past the end of the buffer as a malformed log.

use byteorder::{LittleEndian, ReadBytesExt};
use rim_common_verifier::RimError;
use std::io::{Cursor, Read};
use uuid::Uuid;

/// UEFI GUID size
pub const UEFI_GUID_SIZE: usize = 16;

pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

/// Types that can be parsed directly from a [`ByteReader`].
pub trait ByteParseable: Sized {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, RimError>;
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(data) }
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn set_position(&mut self, pos: u64) -> Result<(), RimError> {
        if pos > self.get_length() {
            return Err(RimError::MalformedLog("Position exceeds data range".to_string()));
        }
        self.cursor.set_position(pos);
        Ok(())
    }

    pub fn remaining(&self) -> u64 {
        self.get_length().saturating_sub(self.cursor.position())
    }

    pub fn read_u8(&mut self) -> Result<u8, RimError> {
        self.cursor.read_u8().map_err(|e| RimError::MalformedLog(format!("Failed to read u8: {}", e)))
    }

    pub fn read_u16(&mut self) -> Result<u16, RimError> {
        self.cursor
            .read_u16::<LittleEndian>()
            .map_err(|e| RimError::MalformedLog(format!("Failed to read u16: {}", e)))
    }

    pub fn read_u32(&mut self) -> Result<u32, RimError> {
        self.cursor
            .read_u32::<LittleEndian>()
            .map_err(|e| RimError::MalformedLog(format!("Failed to read u32: {}", e)))
    }

    pub fn read_u64(&mut self) -> Result<u64, RimError> {
        self.cursor
            .read_u64::<LittleEndian>()
            .map_err(|e| RimError::MalformedLog(format!("Failed to read u64: {}", e)))
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>, RimError> {
        if length as u64 > self.remaining() {
            return Err(RimError::MalformedLog(format!(
                "Read exceeds data range: requested {} bytes but only {} bytes remain",
                length,
                self.remaining()
            )));
        }

        let mut buffer: Vec<u8> = vec![0u8; length];
        self.cursor
            .read_exact(&mut buffer)
            .map_err(|e| RimError::MalformedLog(format!("Failed to read bytes: {}", e)))?;
        Ok(buffer)
    }

    pub fn read_to_end(&mut self) -> Result<Vec<u8>, RimError> {
        self.read_bytes(self.remaining() as usize)
    }

    /// Reads `length` bytes as text, dropping trailing NUL padding.
    pub fn read_string(&mut self, length: usize) -> Result<String, RimError> {
        let bytes: Vec<u8> = self.read_bytes(length)?;
        Ok(String::from_utf8_lossy(&bytes).trim_end_matches('\0').to_string())
    }

    /// Reads a mixed-endian EFI_GUID and returns its canonical text form.
    pub fn read_guid(&mut self) -> Result<String, RimError> {
        let mut guid_bytes: [u8; UEFI_GUID_SIZE] = [0; UEFI_GUID_SIZE];
        self.cursor
            .read_exact(&mut guid_bytes)
            .map_err(|e| RimError::MalformedLog(format!("Failed to read guid: {}", e)))?;
        Ok(Uuid::from_bytes_le(guid_bytes).to_string())
    }

    /// Reads exactly `length` UCS-2 code units; text stops at the first NUL.
    pub fn read_unicode_name(&mut self, length: usize) -> Result<String, RimError> {
        let mut unicode_name = String::new();
        let mut terminated = false;
        for _ in 0..length {
            let char_code = self.read_u16()?;
            if char_code == 0 {
                terminated = true;
            }
            if !terminated {
                unicode_name.push(std::char::from_u32(char_code as u32).unwrap_or('?'));
            }
        }
        Ok(unicode_name)
    }

    /// Reads UCS-2 text up to a NUL terminator or the end of the buffer.
    pub fn read_ucs2_string(&mut self) -> Result<String, RimError> {
        let mut unicode_str = String::new();
        while self.remaining() >= 2 {
            let code_unit = self.read_u16()?;
            if code_unit == 0 {
                break;
            }
            unicode_str.push(std::char::from_u32(code_unit as u32).unwrap_or('\u{FFFD}'));
        }
        Ok(unicode_str)
    }

    pub fn is_end(&self) -> bool {
        self.remaining() == 0
    }

    pub fn get_length(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }
}
