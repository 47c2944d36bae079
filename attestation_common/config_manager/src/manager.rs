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

use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::OnceLock;

/// A thread-safe singleton configuration manager that loads and provides access to configuration data.
///
/// # Type Parameters
///
/// * `T` - The configuration type that must implement `Deserialize`, `Send`, `Sync`, and have a static lifetime.
pub struct ConfigSingleton<T: for<'a> Deserialize<'a> + Send + Sync + 'static> {
    instance: OnceLock<T>,
}

impl<T: for<'a> Deserialize<'a> + Send + Sync + 'static> ConfigSingleton<T> {
    /// Creates a new, uninitialized `ConfigSingleton` instance.
    pub const fn new() -> Self {
        ConfigSingleton { instance: OnceLock::new() }
    }

    /// Loads and parses a YAML configuration file.
    ///
    /// A second call after a successful initialization returns `Ok(())` and keeps the first value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read, or if the YAML content cannot be
    /// parsed into `T`.
    pub fn initialize<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        if self.instance.get().is_some() {
            return Ok(());
        }

        let file = File::open(path).map_err(|e| format!("Failed to open config file: {}", e))?;

        let mut contents = String::new();
        let mut reader = BufReader::new(file);
        reader.read_to_string(&mut contents).map_err(|e| format!("Failed to read config file: {}", e))?;

        let config = serde_yaml::from_str(&contents).map_err(|e| format!("Failed to parse YAML: {}", e))?;
        let _ = self.instance.set(config);
        Ok(())
    }

    /// Stores an already built configuration, used when no file is supplied.
    pub fn initialize_with(&self, config: T) -> Result<(), String> {
        self.instance.set(config).map_err(|_| "Configuration already initialized".to_string())
    }

    /// Retrieves a reference to the initialized configuration instance.
    pub fn get_instance(&self) -> Result<&T, String> {
        self.instance.get().ok_or_else(|| "Configuration not initialized".to_string())
    }
}

impl<T: for<'a> Deserialize<'a> + Send + Sync + 'static> Default for ConfigSingleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RimConfig;
    use std::io::Write;

    #[test]
    fn test_get_instance_when_not_initialized_then_error() {
        let config = ConfigSingleton::<RimConfig>::new();
        assert!(config.get_instance().is_err());
    }

    #[test]
    fn test_initialize_with_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rim_validator:\n  preferred_digest_algorithm: sha384\n  max_chain_depth: 4").unwrap();

        let config = ConfigSingleton::<RimConfig>::new();
        config.initialize(file.path()).unwrap();
        let engine = &config.get_instance().unwrap().rim_validator;
        assert_eq!(engine.preferred_digest_algorithm, "sha384");
        assert_eq!(engine.max_chain_depth, 4);
        assert_eq!(engine.base_rim_type, "Base");
    }

    #[test]
    fn test_initialize_when_file_missing_then_error() {
        let config = ConfigSingleton::<RimConfig>::new();
        let err = config.initialize("/nonexistent/rim_config.yaml").unwrap_err();
        assert!(err.starts_with("Failed to open config file"));
    }

    #[test]
    fn test_initialize_with_twice_then_error() {
        let config = ConfigSingleton::<RimConfig>::new();
        config.initialize_with(RimConfig::default()).unwrap();
        assert!(config.initialize_with(RimConfig::default()).is_err());
    }
}
