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

/// Configuration management module for loading and accessing application configuration.
///
/// A thread-safe singleton holds configuration loaded from YAML files, and `types` carries
/// the strongly typed settings of the RIM validation engine.
///
/// # Example
///
/// ```no_run
/// use config_manager::types::RimConfig;
/// use config_manager::ConfigSingleton;
///
/// static CONFIG: ConfigSingleton<RimConfig> = ConfigSingleton::new();
///
/// CONFIG.initialize("rim_config.yaml").expect("Failed to load config");
/// let engine = &CONFIG.get_instance().expect("Config not initialized").rim_validator;
/// println!("preferred bank: {}", engine.preferred_digest_algorithm);
/// ```
pub mod manager;
pub mod types;

// Re-export key struct
pub use manager::ConfigSingleton;
