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

//! Named sets of acceptable PCR measurements together with the device descriptors of the
//! platform they were captured from.

pub mod baseline;
pub mod info;
pub mod record;

pub use baseline::PcrBaseline;
pub use info::{FirmwareInfo, HardwareInfo, OsInfo, RimInfo, TpmInfo, NOT_SPECIFIED};
pub use record::{Digest, PcrMeasurementRecord};
