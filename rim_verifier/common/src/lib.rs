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

//! Shared building blocks of the RIM verifier crates: the error type, TPM algorithm
//! identifiers, openssl backed digest and signature helpers, and PCR extend replay.

pub mod algorithm;
pub mod crypto_utils;
pub mod error;
pub mod pcr;

pub use algorithm::AlgorithmId;
pub use crypto_utils::CryptoVerifier;
pub use error::RimError;
pub use pcr::{PcrReplay, PCR_COUNT};
