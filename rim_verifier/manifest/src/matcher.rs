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

//! Reconciles live event logs against golden digest values and support RIM baselines.

use common_log::{debug, warn};
use config_manager::types::EngineConfig;
use pcr_baseline::{Digest, PcrBaseline};
use rim_common_verifier::{RimError, PCR_COUNT};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tcg_event_log::{EventLog, EventType, PcrEvent};

use crate::entities::ReferenceDigestValue;

#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    /// Live events whose digest is a golden value.
    pub matched: Vec<PcrEvent>,
    /// Live events with no golden value ("livelog events").
    pub unmatched: Vec<PcrEvent>,
    /// Baseline events of the same type, keyed by the unmatched live event's digest.
    /// Present only when at least one baseline was supplied.
    pub candidates: Option<BTreeMap<String, Vec<PcrEvent>>>,
}

pub struct BaselineMatcher {
    variable_prefix: String,
    variable_suffix: String,
}

impl BaselineMatcher {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            variable_prefix: config.uefi_variable_prefix.clone(),
            variable_suffix: config.uefi_variable_suffix.clone(),
        }
    }

    /// Splits `live` into matched and unmatched events, then lists baseline candidates for
    /// every unmatched event.
    pub fn reconcile(
        &self,
        live: &EventLog,
        reference_values: &HashMap<String, ReferenceDigestValue>,
        baselines: &[EventLog],
    ) -> MatchReport {
        let mut report = MatchReport::default();
        for event in live.events() {
            if reference_values.contains_key(&event.digest_hex()) {
                report.matched.push(event.clone());
            } else {
                report.unmatched.push(event.clone());
            }
        }
        debug!("{} live event(s) matched golden values, {} unmatched", report.matched.len(), report.unmatched.len());

        if baselines.is_empty() {
            return report;
        }
        let combined: Vec<&PcrEvent> = baselines.iter().flat_map(|log| log.events()).collect();
        let mut candidates = BTreeMap::new();
        for event in &report.unmatched {
            candidates.insert(event.digest_hex(), self.candidates_for(event, &combined));
        }
        report.candidates = Some(candidates);
        report
    }

    fn candidates_for(&self, event: &PcrEvent, combined: &[&PcrEvent]) -> Vec<PcrEvent> {
        let variable = self.variable_name(&event.content_str);
        combined
            .iter()
            .filter(|b| b.event_type_raw == event.event_type_raw)
            .filter(|b| variable.map_or(true, |name| self.variable_name(&b.content_str) == Some(name)))
            .map(|b| (*b).clone())
            .collect()
    }

    /// Name of the UEFI variable in rendered content: the text after the variable prefix up
    /// to the suffix, cut at the first comma or whitespace.
    pub fn variable_name<'c>(&self, content: &'c str) -> Option<&'c str> {
        let start = content.find(&self.variable_prefix)? + self.variable_prefix.len();
        let rest = &content[start..];
        let rest = match rest.find(&self.variable_suffix) {
            Some(end) => &rest[..end],
            None => rest,
        };
        let name = rest.trim_start();
        let end = name.find(|c: char| c == ',' || c.is_whitespace()).unwrap_or(name.len());
        let name = &name[..end];
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Recomputes the `error` flag of every baseline event: set when the measurement event at
    /// the same position carries another digest (skipped for supplemental baselines) or when
    /// the baseline digest never occurs in the measurement.
    pub fn flag_errors(&self, baseline: &mut EventLog, measurement: &EventLog, supplemental: bool) {
        let live_digests: HashSet<&[u8]> = measurement.events().iter().map(|e| e.digest.as_slice()).collect();
        for event in baseline.events.iter_mut() {
            let positional_mismatch = match measurement.event_by_number(event.event_number) {
                Some(live) => live.digest != event.digest,
                None => true,
            };
            event.error =
                (!supplemental && positional_mismatch) || !live_digests.contains(event.digest.as_slice());
        }
    }

    /// Measured events of `live` whose digest is not an acceptable value of their PCR.
    /// Events extending a PCR outside the baseline's range are always unmatched.
    pub fn unmatched_against_baseline(&self, live: &EventLog, baseline: &PcrBaseline) -> Result<Vec<PcrEvent>, RimError> {
        let mut unmatched = Vec::new();
        for event in live.events().iter().filter(|e| e.event_type != EventType::EvNoAction) {
            if event.pcr_index >= PCR_COUNT {
                warn!("Event {} extends PCR {} outside the baseline range", event.event_number, event.pcr_index);
                unmatched.push(event.clone());
                continue;
            }
            let digest = Digest::new(live.algorithm, event.digest.clone())?;
            if !baseline.pcr_hashes(event.pcr_index)?.contains(&digest) {
                unmatched.push(event.clone());
            }
        }
        Ok(unmatched)
    }
}

/// Golden values keyed by lower-case digest hex.
pub fn reference_value_map(values: Vec<ReferenceDigestValue>) -> HashMap<String, ReferenceDigestValue> {
    values.into_iter().map(|v| (v.digest_value.to_ascii_lowercase(), v)).collect()
}
