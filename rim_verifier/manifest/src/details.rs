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

//! Detail reports for one RIM record, and their flat field maps for the presentation layer.

use common_log::{debug, error, warn};
use config_manager::types::EngineConfig;
use rim_common_verifier::RimError;
use serde_json::{json, Map, Value};
use tcg_event_log::{EventLog, PcrEvent};
use uuid::Uuid;

use crate::entities::{BaseRim, Measurement, SupportRim};
use crate::linkage::{LinkageNote, PersistResult, RimLinkageResolver};
use crate::matcher::{reference_value_map, BaselineMatcher, MatchReport};
use crate::store::{CertificateStore, RimStore};
use crate::summary::BootChainSummary;
use crate::validator::{RimValidationReport, SignatureAndHashValidator};

#[derive(Debug, Clone)]
pub struct BaseRimDetails {
    /// The base RIM with its resolved association.
    pub base: BaseRim,
    pub support: Option<SupportRim>,
    /// Base RIM whose tag id appears in the link href.
    pub link_href_link: Option<Uuid>,
    /// Base RIM found by `rim_link_hash`.
    pub rim_link_id: Option<Uuid>,
    /// `None` when the base RIM has no `rim_link_hash`.
    pub link_hash_valid: Option<bool>,
    pub validation: RimValidationReport,
    /// Replayed PCR values of the support RIM, for a standalone base RIM only.
    pub pcr_list: Option<Vec<String>>,
    pub link_persisted: PersistResult,
    pub notes: Vec<LinkageNote>,
}

#[derive(Debug, Clone)]
pub struct SupportRimDetails {
    pub support: SupportRim,
    pub base: Option<BaseRim>,
    pub measurement: Option<Measurement>,
    /// Support RIM events, error flags set against `measurement` when it exists.
    pub events: Vec<PcrEvent>,
    pub summary: BootChainSummary,
    pub link_persisted: PersistResult,
    pub notes: Vec<LinkageNote>,
}

#[derive(Debug, Clone)]
pub struct MeasurementDetails {
    pub measurement: Measurement,
    pub base_support: Option<SupportRim>,
    pub base: Option<BaseRim>,
    pub report: MatchReport,
    pub events: Vec<PcrEvent>,
    pub summary: BootChainSummary,
    pub notes: Vec<LinkageNote>,
}

#[derive(Debug, Clone)]
pub enum RimDetails {
    Base(Box<BaseRimDetails>),
    Support(Box<SupportRimDetails>),
    Measurement(Box<MeasurementDetails>),
}

pub struct RimDetailsService<'a, S: RimStore + ?Sized, C: CertificateStore + ?Sized> {
    store: &'a S,
    certificates: &'a C,
    config: &'a EngineConfig,
}

impl<'a, S: RimStore + ?Sized, C: CertificateStore + ?Sized> RimDetailsService<'a, S, C> {
    pub fn new(store: &'a S, certificates: &'a C, config: &'a EngineConfig) -> Self {
        Self { store, certificates, config }
    }

    /// Looks `id` up as a base RIM, a support RIM and a measurement, in that order.
    pub fn rim_detail_info(&self, id: &Uuid) -> Result<RimDetails, RimError> {
        if let Some(base) = self.store.base_rim_by_id(id)? {
            return Ok(RimDetails::Base(Box::new(self.base_rim_info(&base)?)));
        }
        if let Some(support) = self.store.support_rim_by_id(id)? {
            return Ok(RimDetails::Support(Box::new(self.support_rim_info(&support)?)));
        }
        if let Some(measurement) = self.store.measurement_by_id(id)? {
            return Ok(RimDetails::Measurement(Box::new(self.measurement_info(&measurement)?)));
        }
        warn!("Unable to find RIM with ID: {}", id);
        Err(RimError::NotFound(format!("Unable to find RIM with ID: {}", id)))
    }

    pub fn base_rim_info(&self, base: &BaseRim) -> Result<BaseRimDetails, RimError> {
        let resolver = RimLinkageResolver::new(self.store, self.config);
        let linkage = resolver.resolve_base(base)?;
        let link_persisted = resolver.apply(&linkage.decision);

        let mut link_href_link = None;
        for candidate in self.store.base_rims()? {
            if !candidate.tag_id.is_empty() && base.link.href.contains(&candidate.tag_id) {
                link_href_link = Some(candidate.id);
            }
        }
        let (rim_link_id, link_hash_valid) = match &base.rim_link_hash {
            Some(hash) => {
                let linked = self.store.base_rim_by_hash(hash)?.map(|rim| rim.id);
                (linked, Some(linked.is_some()))
            },
            None => (None, None),
        };

        let certificates = self.certificates.certificates()?;
        let validation =
            SignatureAndHashValidator::new(self.config).validate(&linkage.base, linkage.support.as_ref(), &certificates)?;

        let pcr_list = match &linkage.support {
            Some(support) if !base.swid.patch && !base.swid.supplemental => {
                match support.event_log(self.config).and_then(|log| log.expected_pcr_values()) {
                    Ok(values) => Some(values),
                    Err(e) => {
                        error!("Failed to replay support RIM {}: {}", support.id, e);
                        None
                    },
                }
            },
            _ => None,
        };

        Ok(BaseRimDetails {
            base: linkage.base,
            support: linkage.support,
            link_href_link,
            rim_link_id,
            link_hash_valid,
            validation,
            pcr_list,
            link_persisted,
            notes: linkage.notes,
        })
    }

    pub fn support_rim_info(&self, support: &SupportRim) -> Result<SupportRimDetails, RimError> {
        let resolver = RimLinkageResolver::new(self.store, self.config);
        let linkage = resolver.resolve_support(support)?;
        let link_persisted = resolver.apply(&linkage.decision);

        let mut log = support.event_log(self.config)?;
        if let Some(measurement) = &linkage.measurement {
            let live = measurement.event_log(self.config)?;
            BaselineMatcher::new(self.config).flag_errors(&mut log, &live, support.swid_supplemental);
        }
        let summary = BootChainSummary::from_log(&log);

        Ok(SupportRimDetails {
            support: linkage.support,
            base: linkage.base,
            measurement: linkage.measurement,
            events: log.events,
            summary,
            link_persisted,
            notes: linkage.notes,
        })
    }

    pub fn measurement_info(&self, measurement: &Measurement) -> Result<MeasurementDetails, RimError> {
        let linkage = RimLinkageResolver::new(self.store, self.config).resolve_measurement(measurement)?;
        let live = measurement.event_log(self.config)?;

        let mut baselines: Vec<EventLog> = Vec::with_capacity(linkage.supports.len());
        for support in &linkage.supports {
            match support.event_log(self.config) {
                Ok(log) => baselines.push(log),
                Err(e) => warn!("Skipping baseline of support RIM {}: {}", support.id, e),
            }
        }
        let references = reference_value_map(linkage.reference_values);
        let mut report = BaselineMatcher::new(self.config).reconcile(&live, &references, &baselines);
        if report.candidates.is_none() && !linkage.supports.is_empty() {
            // supports exist but none decoded: every livelog event keeps an empty candidate list
            report.candidates = Some(report.unmatched.iter().map(|e| (e.digest_hex(), Vec::new())).collect());
        }
        debug!("Measurement {} has {} livelog event(s)", measurement.id, report.unmatched.len());
        let summary = BootChainSummary::from_log(&live);

        Ok(MeasurementDetails {
            measurement: linkage.measurement,
            base_support: linkage.base_support,
            base: linkage.base,
            report,
            events: live.events,
            summary,
            notes: linkage.notes,
        })
    }
}

fn true_false(flag: bool) -> Value {
    Value::String(if flag { "True" } else { "False" }.to_string())
}

fn events_value(events: &[PcrEvent]) -> Value {
    serde_json::to_value(events).unwrap_or(Value::Array(Vec::new()))
}

impl RimDetails {
    /// Flat field map with the field names and presence rules the presentation layer expects.
    pub fn to_field_map(&self) -> Map<String, Value> {
        match self {
            RimDetails::Base(details) => details.to_field_map(),
            RimDetails::Support(details) => details.to_field_map(),
            RimDetails::Measurement(details) => details.to_field_map(),
        }
    }
}

impl BaseRimDetails {
    pub fn to_field_map(&self) -> Map<String, Value> {
        let base = &self.base;
        let mut data = Map::new();
        data.insert("swidName".into(), json!(base.swid.name));
        data.insert("swidVersion".into(), json!(base.swid.version));
        data.insert("swidTagVersion".into(), json!(base.swid.tag_version));
        data.insert("swidCorpus".into(), true_false(base.swid.corpus));
        data.insert("swidPatch".into(), true_false(base.swid.patch));
        data.insert("swidSupplemental".into(), true_false(base.swid.supplemental));
        data.insert("swidTagId".into(), json!(base.tag_id));
        data.insert("entityName".into(), json!(base.entity.name));
        data.insert("entityRegId".into(), json!(base.entity.reg_id));
        data.insert("entityRole".into(), json!(base.entity.role));
        data.insert("entityThumbprint".into(), json!(base.entity.thumbprint));
        data.insert("linkHref".into(), json!(base.link.href));
        data.insert(
            "linkHrefLink".into(),
            self.link_href_link.map(|id| json!(id)).unwrap_or_else(|| json!("")),
        );
        data.insert("linkRel".into(), json!(base.link.rel));
        data.insert("platformManufacturer".into(), json!(base.platform.manufacturer));
        data.insert("platformManufacturerId".into(), json!(base.platform.manufacturer_id));
        data.insert("platformModel".into(), json!(base.platform.model));
        data.insert("platformVersion".into(), json!(base.platform.version));
        data.insert("payloadType".into(), json!(base.payload.payload_type));
        data.insert("colloquialVersion".into(), json!(base.payload.colloquial_version));
        data.insert("edition".into(), json!(base.payload.edition));
        data.insert("product".into(), json!(base.payload.product));
        data.insert("revision".into(), json!(base.payload.revision));
        data.insert("bindingSpec".into(), json!(base.payload.binding_spec));
        data.insert("bindingSpecVersion".into(), json!(base.payload.binding_spec_version));
        data.insert("pcUriGlobal".into(), json!(base.payload.pc_uri_global));
        data.insert("pcUriLocal".into(), json!(base.payload.pc_uri_local));
        data.insert("rimLinkHash".into(), json!(base.rim_link_hash));
        if let Some(id) = self.rim_link_id {
            data.insert("rimLinkId".into(), json!(id));
        }
        if let Some(valid) = self.link_hash_valid {
            data.insert("linkHashValid".into(), json!(valid));
        }
        data.insert("rimType".into(), json!(base.rim_type));
        if let Some(valid) = self.validation.support_hash_valid {
            data.insert("supportRimHashValid".into(), json!(valid));
        }
        data.insert("associatedRim".into(), json!(base.associated_rim));
        data.insert("swidFiles".into(), json!(base.resources));
        if let Some(pcr_list) = &self.pcr_list {
            data.insert("pcrList".into(), json!(pcr_list));
        }
        data.insert("signatureValid".into(), json!(self.validation.signature_valid));
        data.insert("skID".into(), json!(self.validation.subject_key_identifier));
        if let Some(issuer) = self.validation.issuer_id {
            data.insert("issuerID".into(), json!(issuer.to_string()));
        }
        data
    }
}

impl SupportRimDetails {
    pub fn to_field_map(&self) -> Map<String, Value> {
        let support = &self.support;
        let mut data = Map::new();
        data.insert("swidPatch".into(), true_false(support.swid_patch));
        data.insert("swidSupplemental".into(), true_false(support.swid_supplemental));
        data.insert("swidBase".into(), json!(support.is_base_support()));
        data.insert("baseRim".into(), json!(support.tag_id));
        data.insert("associatedRim".into(), json!(support.associated_rim));
        data.insert("rimType".into(), json!(support.rim_type));
        data.insert("tagId".into(), json!(support.tag_id));
        data.insert("events".into(), events_value(&self.events));
        self.summary.extend_field_map(&mut data);
        data
    }
}

impl MeasurementDetails {
    pub fn to_field_map(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(
            "supportFilename".into(),
            json!(self.base_support.as_ref().map(|s| s.file_name.as_str()).unwrap_or("Blank")),
        );
        data.insert(
            "supportId".into(),
            self.base_support.as_ref().map(|s| json!(s.id)).unwrap_or_else(|| json!("")),
        );
        data.insert("associatedRim".into(), self.base.as_ref().map(|b| json!(b.id)).unwrap_or_else(|| json!("")));
        data.insert("rimType".into(), json!(self.measurement.rim_type));
        data.insert("hostName".into(), json!(self.measurement.device_name));
        data.insert("validationResult".into(), json!(self.measurement.overall_validation_result));
        data.insert("swidBase".into(), json!(true));
        if let Some(base_support) = &self.base_support {
            data.insert("tagId".into(), json!(base_support.tag_id));
        }
        if let Some(candidates) = &self.report.candidates {
            data.insert("eventTypeMap".into(), json!(candidates));
        }
        data.insert("livelogEvents".into(), events_value(&self.report.unmatched));
        data.insert("events".into(), events_value(&self.events));
        self.summary.extend_field_map(&mut data);
        data
    }
}
