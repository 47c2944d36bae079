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

mod commands;

use crate::commands::LogCommands;
use base64::{engine::general_purpose, Engine as _};
use clap::Parser;
use common_log::{debug, error};
use config_manager::types::{EngineConfig, RimConfig};
use config_manager::ConfigSingleton;
use pcr_baseline::PcrBaseline;
use rim_common_verifier::{AlgorithmId, RimError};
use rim_manifest::{BaselineMatcher, BootChainSummary};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tcg_event_log::EventLog;

static RIM_CONFIG: ConfigSingleton<RimConfig> = ConfigSingleton::new();

#[derive(Parser)]
#[clap(author, version, about = "Offline TCG event log and RIM baseline tool", long_about = None)]
struct Cli {
    /// Engine configuration file (rim_validator section)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Logging configuration file, logs go to stderr when absent
    #[clap(long)]
    log_config: Option<PathBuf>,

    /// Console log level
    #[clap(long, default_value = "warn")]
    log_level: String,

    #[clap(subcommand)]
    command: LogCommands,
}

fn init_logging(cli: &Cli) {
    let result = match &cli.log_config {
        Some(path) => common_log::init_with_yaml(path.clone()),
        None => common_log::init_console(&cli.log_level),
    };
    if let Err(e) = result {
        eprintln!("warning: logging disabled: {}", e);
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    match path {
        Some(path) => RIM_CONFIG.initialize(path)?,
        None => RIM_CONFIG.initialize_with(RimConfig::default())?,
    }
    Ok(RIM_CONFIG.get_instance()?.rim_validator.clone())
}

fn read_log(path: &Path, is_base64: bool, algorithm: AlgorithmId) -> Result<EventLog, RimError> {
    let bytes = fs::read(path)
        .map_err(|e| RimError::InputError(format!("Failed to read {}: {}", path.display(), e)))?;
    debug!("Read {} byte(s) from {}", bytes.len(), path.display());
    if is_base64 {
        let text = String::from_utf8_lossy(&bytes);
        let decoded = general_purpose::STANDARD
            .decode(text.trim())
            .map_err(|e| RimError::InputError(format!("Invalid base64 in {}: {}", path.display(), e)))?;
        return EventLog::decode(&decoded, algorithm);
    }
    EventLog::decode(&bytes, algorithm)
}

fn run(command: &LogCommands, config: &EngineConfig) -> Result<Value, RimError> {
    let preferred: AlgorithmId = config.preferred_digest_algorithm.parse()?;
    match command {
        LogCommands::Decode { file, algorithm, base64 } => {
            let algorithm = match algorithm {
                Some(name) => name.parse()?,
                None => preferred,
            };
            read_log(file, *base64, algorithm)?.to_json_value()
        },
        LogCommands::Summary { file, base64 } => {
            let log = read_log(file, *base64, preferred)?;
            serde_json::to_value(BootChainSummary::from_log(&log))
                .map_err(|e| RimError::InternalError(format!("Failed to serialize summary: {}", e)))
        },
        LogCommands::Pcrs { file, base64 } => {
            let log = read_log(file, *base64, preferred)?;
            let pcrs: Vec<Value> = log
                .expected_pcr_values()?
                .into_iter()
                .enumerate()
                .map(|(index, value)| json!({ "pcr": index, "value": value }))
                .collect();
            Ok(json!({ "algorithm": log.algorithm.to_string(), "pcrs": pcrs }))
        },
        LogCommands::Compare { baseline, live, supplemental } => {
            let mut baseline_log = read_log(baseline, false, preferred)?;
            let live_log = read_log(live, false, preferred)?;
            let matcher = BaselineMatcher::new(config);
            matcher.flag_errors(&mut baseline_log, &live_log, *supplemental);
            let flagged: Vec<_> = baseline_log.events().iter().filter(|e| e.error).collect();

            let pcr_baseline = PcrBaseline::from_event_log(baseline.display().to_string(), &baseline_log)?;
            let unmatched = matcher.unmatched_against_baseline(&live_log, &pcr_baseline)?;
            Ok(json!({
                "flagged": flagged,
                "unmatched": unmatched,
            }))
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        },
    };
    match run(&cli.command, &config) {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string()));
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        },
    }
}
