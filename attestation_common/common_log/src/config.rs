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
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub loggers: Vec<LoggerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggerConfig {
    pub path_prefix: String,
    pub log_directory: String,
    pub log_file_name: String,
    pub max_file_size: u64,
    pub max_zip_count: u32,
    pub level: String,
}

impl LogConfig {
    pub fn from_yaml(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let config_str = std::fs::read_to_string(path.into())?;
        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: LogConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Finds the logger whose `path_prefix` is a prefix of the given module path.
    pub fn get_logger_config(&self, path_prefix: &str) -> Option<&LoggerConfig> {
        self.loggers.iter().find(|l| path_prefix.starts_with(&l.path_prefix))
    }

    pub fn get_root_config(&self) -> Option<&LoggerConfig> {
        self.get_logger_config("root")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
loggers:
  - path_prefix: root
    log_directory: logs
    log_file_name: rim.log
    max_file_size: 10485760
    max_zip_count: 6
    level: info
  - path_prefix: rim_manifest
    log_directory: logs
    log_file_name: manifest.log
    max_file_size: 1048576
    max_zip_count: 2
    level: debug
"#;

    #[test]
    fn test_from_yaml_str_reads_all_loggers() {
        let config = LogConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.loggers.len(), 2);
        assert_eq!(config.get_root_config().unwrap().log_file_name, "rim.log");
    }

    #[test]
    fn test_get_logger_config_matches_module_prefix() {
        let config = LogConfig::from_yaml_str(YAML).unwrap();
        let found = config.get_logger_config("rim_manifest::linkage").unwrap();
        assert_eq!(found.level, "debug");
        assert!(config.get_logger_config("tcg_event_log").is_none());
    }
}
