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

//! TCG PC Client event log decoding.
//!
//! Decodes legacy SHA-1 and crypto-agile event logs into an ordered list of [`PcrEvent`]s,
//! interprets the well known event payloads, renders each payload into a stable text form,
//! and replays the log into expected PCR values.

pub mod byte_reader;
pub mod event;

pub use event::builder::EventLogBuilder;
pub use event::log::{EventLog, LogFormat};
pub use event::model::{EventType, PcrEvent, TpmDigestEntry, TpmEventLog};
