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

//! Association between Base RIMs, Support RIMs and live measurement logs.
//!
//! Resolution is read-only and yields a [`LinkDecision`]; [`RimLinkageResolver::apply`] performs
//! the single persistence callback a decision may require. When several records satisfy a
//! strategy the first one returned by the store is taken and an ambiguity note is attached.

use common_log::{error, info, warn};
use config_manager::types::EngineConfig;
use rim_common_verifier::RimError;
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{BaseRim, Measurement, ReferenceDigestValue, SupportRim};
use crate::store::RimStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LinkDecision {
    AlreadyLinked,
    BindBaseToSupport { base_id: Uuid, support_id: Uuid },
    BindSupportToBase { support_id: Uuid, base_id: Uuid },
    Unlinked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LinkageNote {
    /// More than one record satisfied the strategy; `chosen` was taken.
    Ambiguous { chosen: Uuid, candidates: Vec<Uuid> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PersistResult {
    Unchanged,
    Persisted,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseLinkage {
    /// The base RIM with `associated_rim` reflecting the decision.
    pub base: BaseRim,
    pub support: Option<SupportRim>,
    pub decision: LinkDecision,
    pub notes: Vec<LinkageNote>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportLinkage {
    /// The support RIM with `associated_rim` reflecting the decision.
    pub support: SupportRim,
    pub base: Option<BaseRim>,
    /// Live log whose hash equals the support RIM hash.
    pub measurement: Option<Measurement>,
    pub decision: LinkDecision,
    pub notes: Vec<LinkageNote>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementLinkage {
    pub measurement: Measurement,
    /// Every support RIM registered for the measurement's device.
    pub supports: Vec<SupportRim>,
    pub base_support: Option<SupportRim>,
    pub base: Option<BaseRim>,
    pub reference_values: Vec<ReferenceDigestValue>,
    pub notes: Vec<LinkageNote>,
}

pub struct RimLinkageResolver<'a, S: RimStore + ?Sized> {
    store: &'a S,
    config: &'a EngineConfig,
}

impl<'a, S: RimStore + ?Sized> RimLinkageResolver<'a, S> {
    pub fn new(store: &'a S, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Finds the support RIM of `base`: its recorded association first, else the first support
    /// RIM sharing the base RIM's platform manufacturer.
    pub fn resolve_base(&self, base: &BaseRim) -> Result<BaseLinkage, RimError> {
        let mut linked = base.clone();
        if let Some(support_id) = base.associated_rim {
            let support = self.store.support_rim_by_id(&support_id)?;
            return Ok(BaseLinkage { base: linked, support, decision: LinkDecision::AlreadyLinked, notes: Vec::new() });
        }

        let candidates = self.store.support_rims_by_manufacturer(&base.platform.manufacturer)?;
        let notes = ambiguity_note(candidates.iter().map(|s| s.id).collect(), "support RIM", &base.id);
        match candidates.into_iter().next() {
            Some(support) => {
                linked.associated_rim = Some(support.id);
                let decision = LinkDecision::BindBaseToSupport { base_id: base.id, support_id: support.id };
                Ok(BaseLinkage { base: linked, support: Some(support), decision, notes })
            },
            None => Ok(BaseLinkage { base: linked, support: None, decision: LinkDecision::Unlinked, notes }),
        }
    }

    /// Finds the base RIM of `support`: its recorded association first, else a base RIM of the
    /// configured type whose association names this support RIM. Also looks up the live log
    /// carrying the same hash.
    pub fn resolve_support(&self, support: &SupportRim) -> Result<SupportLinkage, RimError> {
        let mut linked = support.clone();
        let mut notes = Vec::new();
        let (base, decision) = match support.associated_rim {
            Some(base_id) => (self.store.base_rim_by_id(&base_id)?, LinkDecision::AlreadyLinked),
            None => {
                let owners: Vec<BaseRim> = self
                    .store
                    .base_rims_by_type(&self.config.base_rim_type)?
                    .into_iter()
                    .filter(|b| b.associated_rim == Some(support.id))
                    .collect();
                notes = ambiguity_note(owners.iter().map(|b| b.id).collect(), "base RIM", &support.id);
                match owners.into_iter().next() {
                    Some(owner) => {
                        linked.associated_rim = Some(owner.id);
                        let decision = LinkDecision::BindSupportToBase { support_id: support.id, base_id: owner.id };
                        (Some(owner), decision)
                    },
                    None => (None, LinkDecision::Unlinked),
                }
            },
        };
        let measurement = self.store.measurement_by_hash(&support.hex_hash)?;
        Ok(SupportLinkage { support: linked, base, measurement, decision, notes })
    }

    /// Links a live log to the support RIMs of its device and, through the base support RIM,
    /// to a base RIM and its golden values.
    pub fn resolve_measurement(&self, measurement: &Measurement) -> Result<MeasurementLinkage, RimError> {
        let mut linkage = MeasurementLinkage {
            measurement: measurement.clone(),
            supports: Vec::new(),
            base_support: None,
            base: None,
            reference_values: Vec::new(),
            notes: Vec::new(),
        };
        let device_name = match &measurement.device_name {
            Some(name) => name,
            None => return Ok(linkage),
        };

        linkage.supports = self.store.support_rims_by_device(device_name)?;
        let base_supports: Vec<&SupportRim> = linkage.supports.iter().filter(|s| s.is_base_support()).collect();
        linkage.notes = ambiguity_note(base_supports.iter().map(|s| s.id).collect(), "base support RIM", &measurement.id);
        linkage.base_support = base_supports.first().map(|s| (*s).clone());

        if let Some(base_id) = linkage.base_support.as_ref().and_then(|s| s.associated_rim) {
            linkage.base = self.store.base_rim_by_id(&base_id)?;
        }
        if let Some(base) = &linkage.base {
            linkage.reference_values = self.store.reference_values_by_base_rim(&base.id)?;
        }
        Ok(linkage)
    }

    /// Persists the back-link a decision calls for.
    pub fn apply(&self, decision: &LinkDecision) -> PersistResult {
        let result = match decision {
            LinkDecision::AlreadyLinked | LinkDecision::Unlinked => return PersistResult::Unchanged,
            LinkDecision::BindBaseToSupport { base_id, support_id } => {
                self.store.persist_base_link(base_id, support_id)
            },
            LinkDecision::BindSupportToBase { support_id, base_id } => {
                self.store.persist_support_link(support_id, base_id)
            },
        };
        match result {
            Ok(()) => {
                info!("Persisted RIM link {:?}", decision);
                PersistResult::Persisted
            },
            Err(e) => {
                error!("Failed to persist RIM link {:?}: {}", decision, e);
                PersistResult::Failed(e.to_string())
            },
        }
    }
}

fn ambiguity_note(candidates: Vec<Uuid>, kind: &str, owner: &Uuid) -> Vec<LinkageNote> {
    if candidates.len() < 2 {
        return Vec::new();
    }
    warn!("{} candidates match as {} of {}, taking {}", candidates.len(), kind, owner, candidates[0]);
    vec![LinkageNote::Ambiguous { chosen: candidates[0], candidates }]
}
