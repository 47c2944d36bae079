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

//! Reference Integrity Manifest engine: links Base RIMs, Support RIMs and live measurement
//! logs, validates RIM signatures and declared payload hashes, reconciles live events against
//! golden values and summarizes the measured boot chain.

pub mod cert_chain;
pub mod details;
pub mod entities;
pub mod linkage;
pub mod matcher;
pub mod store;
pub mod summary;
pub mod validator;
pub mod xmldsig;

pub use details::{BaseRimDetails, MeasurementDetails, RimDetails, RimDetailsService, SupportRimDetails};
pub use entities::{BaseRim, CertificateRecord, Measurement, ReferenceDigestValue, SupportRim};
pub use linkage::{LinkDecision, LinkageNote, PersistResult, RimLinkageResolver};
pub use matcher::{BaselineMatcher, MatchReport};
pub use store::{CertificateStore, RimStore};
pub use summary::{BootChainSummary, BOOT_CHAIN_RULES};
pub use validator::{RimValidationReport, SignatureAndHashValidator};
pub use xmldsig::RimSignature;
