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

//! Lookups and link mutations the engine needs from the RIM persistence layer.
//!
//! Implementations are synchronous. The two `persist_*` callbacks may be called again for a
//! pair that is already linked and must leave the store unchanged in that case.

use rim_common_verifier::RimError;
use uuid::Uuid;

use crate::entities::{BaseRim, CertificateRecord, Measurement, ReferenceDigestValue, SupportRim};

pub trait RimStore {
    fn base_rim_by_id(&self, id: &Uuid) -> Result<Option<BaseRim>, RimError>;

    fn support_rim_by_id(&self, id: &Uuid) -> Result<Option<SupportRim>, RimError>;

    fn measurement_by_id(&self, id: &Uuid) -> Result<Option<Measurement>, RimError>;

    fn base_rim_by_hash(&self, hex_hash: &str) -> Result<Option<BaseRim>, RimError>;

    fn measurement_by_hash(&self, hex_hash: &str) -> Result<Option<Measurement>, RimError>;

    fn base_rims(&self) -> Result<Vec<BaseRim>, RimError>;

    fn base_rims_by_type(&self, rim_type: &str) -> Result<Vec<BaseRim>, RimError>;

    fn support_rims_by_manufacturer(&self, manufacturer: &str) -> Result<Vec<SupportRim>, RimError>;

    fn support_rims_by_device(&self, device_name: &str) -> Result<Vec<SupportRim>, RimError>;

    fn reference_values_by_base_rim(&self, base_rim_id: &Uuid) -> Result<Vec<ReferenceDigestValue>, RimError>;

    /// Records `support_id` as the associated RIM of base RIM `base_id`.
    fn persist_base_link(&self, base_id: &Uuid, support_id: &Uuid) -> Result<(), RimError>;

    /// Records `base_id` as the associated RIM of support RIM `support_id`.
    fn persist_support_link(&self, support_id: &Uuid, base_id: &Uuid) -> Result<(), RimError>;
}

pub trait CertificateStore {
    /// Candidate supply chain CA certificates.
    fn certificates(&self) -> Result<Vec<CertificateRecord>, RimError>;
}
