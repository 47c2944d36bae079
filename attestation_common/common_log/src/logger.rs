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

use crate::config::{LogConfig, LoggerConfig};
use chrono::{DateTime, Local};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger as SizeBasedTriggerPolicy;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::{
    append::rolling_file::RollingFileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config, Handle,
};
use std::env;
use std::path::PathBuf;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S:%3f)} {l} [{M}:{L}] - {m}{n}";
const ROOT_APPENDER: &str = "root_appender";

pub struct Logger {
    #[allow(dead_code)]
    handle: Handle,
}

impl Logger {
    pub fn new_from_yaml(config_path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let config = LogConfig::from_yaml(config_path)?;
        Self::new_from_config(config)
    }

    pub fn new_from_config(config: LogConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let final_config = Self::build_config(&config)?;
        let handle = log4rs::init_config(final_config)?;
        Ok(Self { handle })
    }

    /// Console-only logger used by the command line tool.
    pub fn new_console(level: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let stderr = ConsoleAppender::builder()
            .target(log4rs::append::console::Target::Stderr)
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        let config = Config::builder()
            .appender(Appender::builder().build("console", Box::new(stderr)))
            .build(Root::builder().appender("console").build(parse_level(level)))?;
        let handle = log4rs::init_config(config)?;
        Ok(Self { handle })
    }

    pub(crate) fn build_config(config: &LogConfig) -> Result<Config, Box<dyn std::error::Error>> {
        let mut log4rs_config = Config::builder();

        for logger_config in config.loggers.iter().filter(|l| l.path_prefix != "root") {
            let appender = create_appender(logger_config)?;
            let appender_name = format!("{}_appender", logger_config.path_prefix);
            log4rs_config = log4rs_config.appender(Appender::builder().build(&appender_name, Box::new(appender)));

            let logger = log4rs::config::Logger::builder()
                .appender(appender_name)
                .additive(false)
                .build(logger_config.path_prefix.clone(), parse_level(&logger_config.level));
            log4rs_config = log4rs_config.logger(logger);
        }

        let final_config = match config.get_root_config() {
            Some(root_config) => {
                let root_appender = create_appender(root_config)?;
                log4rs_config =
                    log4rs_config.appender(Appender::builder().build(ROOT_APPENDER, Box::new(root_appender)));
                let root = Root::builder().appender(ROOT_APPENDER).build(parse_level(&root_config.level));
                log4rs_config.build(root)?
            },
            None => log4rs_config.build(Root::builder().build(LevelFilter::Info))?,
        };
        Ok(final_config)
    }
}

/// Directory that holds all log directories, `LOG_OUTPUT_DIR` or the working directory.
fn log_output_dir() -> String {
    // .env is optional
    let _ = dotenv::dotenv();
    env::var("LOG_OUTPUT_DIR").unwrap_or_else(|_| ".".to_string())
}

fn create_appender(config: &LoggerConfig) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let log_directory = format!("{}/{}", log_output_dir(), config.log_directory);
    std::fs::create_dir_all(&log_directory)?;

    let now: DateTime<Local> = Local::now();
    let formatted_time = now.format("%Y%m%d%H%M%S%3f").to_string();

    let log_file = format!("{}/{}", log_directory, config.log_file_name);
    let archived_log_pattern = format!("{}/{}-{{}}-{}.gz", log_directory, config.log_file_name, formatted_time);

    let size_trigger = SizeBasedTriggerPolicy::new(config.max_file_size);
    let roller = FixedWindowRoller::builder().build(&archived_log_pattern, config.max_zip_count)?;
    let compound_policy = CompoundPolicy::new(Box::new(size_trigger), Box::new(roller));

    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(log_file, Box::new(compound_policy))?;
    Ok(appender)
}

pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}
