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

//! Event Log Parsing
//!
//! Decodes a binary TCG event log into [`PcrEvent`]s, replays it into expected PCR values
//! and serializes it for display.
//!
//! Two layouts are accepted:
//! - crypto-agile logs whose first record is a TCG 1.2 framed `Spec ID Event03` header and
//!   whose following records carry a TPML_DIGEST_VALUES list sized by that header
//! - legacy logs where every record carries a single SHA-1 digest
//!
//! Record framing is strict and any inconsistency fails the whole log. Payload
//! interpretation is lenient: a well framed record whose payload does not parse keeps its
//! raw bytes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use common_log::{debug, warn};
use rim_common_verifier::{AlgorithmId, PcrReplay, RimError, PCR_COUNT};
use serde::Serialize;
use serde_json::{json, Value};

use crate::byte_reader::ByteReader;
use crate::event::model::{
    EfiSpecIdEvent, EvNoActionEvent, EventType, PcrEvent, TpmDigestEntry, TpmEventLog, NO_ACTION_EVENT_SIZE,
    SPEC_ID_EVENT_SIGNATURE_00, SPEC_ID_EVENT_SIGNATURE_03,
};
use crate::event::parser::{parse_event_data, TcgDigestParse, TcgDigestParseV1, TcgDigestParseV2};
use crate::event::render::render_content;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogFormat {
    /// TCG 1.2 layout with SHA-1 digests only
    LegacySha1,
    /// TCG PC Client crypto-agile layout
    CryptoAgile,
}

#[derive(Debug, Clone)]
pub struct EventLog {
    pub format: LogFormat,
    /// Bank whose digests populate `PcrEvent::digest`
    pub algorithm: AlgorithmId,
    pub spec_id: Option<EfiSpecIdEvent>,
    /// Locality from the StartupLocality event, if the log has one
    pub locality: Option<u8>,
    pub events: Vec<PcrEvent>,
}

/// Framing of one record before payload interpretation.
struct RawRecord {
    pcr_index: u32,
    event_type_raw: u32,
    digests: Vec<TpmDigestEntry>,
    content: Vec<u8>,
}

impl EventLog {
    /// Decodes a base64 encoded event log.
    pub fn from_base64(log_data: &str, preferred: AlgorithmId) -> Result<Self, RimError> {
        let bytes = BASE64
            .decode(log_data.trim().as_bytes())
            .map_err(|e| RimError::InputError(format!("Failed to decode event log: {}", e)))?;
        Self::decode(&bytes, preferred)
    }

    /// Decodes a binary event log. The digest bank is `preferred` when a crypto-agile log
    /// carries it, the first bank listed in the header otherwise, and SHA-1 for legacy logs.
    pub fn decode(bytes: &[u8], preferred: AlgorithmId) -> Result<Self, RimError> {
        if bytes.is_empty() {
            return Err(RimError::MalformedLog("Event log is empty".to_string()));
        }
        debug!("Decoding event log of {} bytes", bytes.len());

        let mut parser = ByteReader::new(bytes);
        let header = read_record(&mut parser, &TcgDigestParseV1, 0)?;
        let spec_id = parse_header(&header)?;

        let (format, algorithm) = match &spec_id {
            Some(spec) => (LogFormat::CryptoAgile, select_algorithm(spec, preferred)?),
            None => (LogFormat::LegacySha1, AlgorithmId::Sha1),
        };

        let mut log = EventLog { format, algorithm, spec_id: None, locality: None, events: Vec::new() };
        log.push_event(header)?;

        let mut event_number: u32 = 1;
        match &spec_id {
            Some(spec) => {
                let digest_parser = TcgDigestParseV2 { spec_id: spec };
                while !parser.is_end() {
                    let record = read_record(&mut parser, &digest_parser, event_number)?;
                    log.push_event(record)?;
                    event_number += 1;
                }
            },
            None => {
                while !parser.is_end() {
                    let record = read_record(&mut parser, &TcgDigestParseV1, event_number)?;
                    log.push_event(record)?;
                    event_number += 1;
                }
            },
        }
        log.spec_id = spec_id;

        debug!("Decoded {} events, format {:?}, bank {}", log.events.len(), log.format, log.algorithm);
        Ok(log)
    }

    fn push_event(&mut self, record: RawRecord) -> Result<(), RimError> {
        let event_number = self.events.len() as u32;
        let event_type = EventType::from_u32(record.event_type_raw);

        // header and other no-action records carry no measurement
        let digest = if event_type == EventType::EvNoAction && self.format == LogFormat::CryptoAgile {
            find_digest(&record.digests, self.algorithm).unwrap_or_default()
        } else {
            find_digest(&record.digests, self.algorithm).ok_or_else(|| {
                RimError::MalformedLog(format!(
                    "Event {} has no {} digest, event_type: {}",
                    event_number, self.algorithm, event_type
                ))
            })?
        };

        let event = match parse_event_data(&event_type, &record.content) {
            Ok(event) => event,
            Err(e) => {
                warn!("Keeping raw content of event {} ({}): {}", event_number, event_type, e);
                TpmEventLog::EventBase(record.content.clone())
            },
        };
        if let TpmEventLog::EventNoAction(EvNoActionEvent::StartupLocality(loc)) = &event {
            self.locality = Some(loc.locality);
        }
        let content_str = render_content(&event_type, &event);

        self.events.push(PcrEvent {
            event_number,
            pcr_index: record.pcr_index,
            event_type,
            event_type_raw: record.event_type_raw,
            digest,
            digests: record.digests,
            content: record.content,
            event,
            content_str,
            error: false,
        });
        Ok(())
    }

    pub fn events(&self) -> &[PcrEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn event_by_number(&self, event_number: u32) -> Option<&PcrEvent> {
        self.events.get(event_number as usize).filter(|e| e.event_number == event_number)
    }

    /// Events that extend a PCR, in log order.
    pub fn measurements(&self) -> impl Iterator<Item = &PcrEvent> {
        self.events.iter().filter(|e| e.event_type != EventType::EvNoAction)
    }

    /// Replays the selected bank into the PCR values a TPM recording this log would hold,
    /// one lower-case hex string per PCR 0 to 23.
    pub fn expected_pcr_values(&self) -> Result<Vec<String>, RimError> {
        (0..PCR_COUNT)
            .map(|index| {
                let initial = PcrReplay::create_initial_pcr_value(
                    &self.algorithm,
                    index,
                    if index == 0 { self.locality } else { None },
                )?;
                let digests = self.measurements().filter(|e| e.pcr_index == index).map(|e| e.digest.as_slice());
                PcrReplay::replay(&self.algorithm, &initial, digests).map(hex::encode)
            })
            .collect()
    }

    pub fn to_json_value(&self) -> Result<Value, RimError> {
        let events = self
            .events
            .iter()
            .map(|entry| {
                let mut obj = serde_json::Map::new();
                obj.insert("event_number".to_string(), json!(entry.event_number));
                obj.insert("pcr_index".to_string(), json!(entry.pcr_index));
                obj.insert("event_type".to_string(), json!(entry.event_type.to_string()));
                obj.insert(
                    "digest".to_string(),
                    json!({ "hash_id": self.algorithm.to_string(), "digest": entry.digest_hex() }),
                );
                let event_json = serde_json::to_value(&entry.event)
                    .map_err(|e| RimError::InternalError(format!("Failed to serialize event: {}", e)))?;
                obj.insert("event".to_string(), event_json);
                obj.insert("content".to_string(), json!(entry.content_str));
                obj.insert("error".to_string(), json!(entry.error));
                Ok(Value::Object(obj))
            })
            .collect::<Result<Vec<Value>, RimError>>()?;
        Ok(Value::Array(events))
    }
}

fn find_digest(digests: &[TpmDigestEntry], algorithm: AlgorithmId) -> Option<Vec<u8>> {
    digests.iter().find(|d| d.algorithm_id == algorithm).map(|d| d.digest.clone())
}

fn read_record(parser: &mut ByteReader<'_>, digest_parser: &dyn TcgDigestParse, event_number: u32) -> Result<RawRecord, RimError> {
    let context = |what: &str, e: RimError| RimError::MalformedLog(format!("{} of event {}: {}", what, event_number, e));

    let pcr_index = parser.read_u32().map_err(|e| context("Failed to read PCR index", e))?;
    let event_type_raw = parser.read_u32().map_err(|e| context("Failed to read event type", e))?;
    let digests = digest_parser.parse_digest(parser).map_err(|e| context("Failed to parse digest", e))?;
    let event_size = parser.read_u32().map_err(|e| context("Failed to read event size", e))?;
    if event_size as u64 > parser.remaining() {
        return Err(RimError::MalformedLog(format!(
            "Event size {} exceeds remaining data {}, event_number: {}",
            event_size,
            parser.remaining(),
            event_number
        )));
    }
    let content = parser.read_bytes(event_size as usize).map_err(|e| context("Failed to read event data", e))?;
    Ok(RawRecord { pcr_index, event_type_raw, digests, content })
}

/// Returns the Spec ID header of a crypto-agile log, `None` for a legacy log.
fn parse_header(header: &RawRecord) -> Result<Option<EfiSpecIdEvent>, RimError> {
    if EventType::from_u32(header.event_type_raw) != EventType::EvNoAction {
        return Ok(None);
    }
    let signature = header.content.get(..NO_ACTION_EVENT_SIZE).unwrap_or(header.content.as_slice());
    if signature == SPEC_ID_EVENT_SIGNATURE_00 {
        return Ok(None);
    }
    if signature != SPEC_ID_EVENT_SIGNATURE_03 {
        return Err(RimError::MalformedLog(format!(
            "Unrecognized event log header signature: {}",
            String::from_utf8_lossy(signature).trim_end_matches('\0')
        )));
    }
    match parse_event_data(&EventType::EvNoAction, &header.content)? {
        TpmEventLog::EventNoAction(EvNoActionEvent::SpecIdEvent(spec)) => Ok(Some(spec)),
        _ => Err(RimError::MalformedLog("Failed to parse Spec ID event".to_string())),
    }
}

fn select_algorithm(spec: &EfiSpecIdEvent, preferred: AlgorithmId) -> Result<AlgorithmId, RimError> {
    let listed: Vec<AlgorithmId> = spec
        .digest_algorithms
        .iter()
        .map(|a| a.algorithm())
        .filter(|a| *a != AlgorithmId::Unknown)
        .collect();
    if listed.contains(&preferred) {
        return Ok(preferred);
    }
    listed
        .first()
        .copied()
        .ok_or_else(|| RimError::MalformedLog("Spec ID event lists no supported digest algorithm".to_string()))
}
