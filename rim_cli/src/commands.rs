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

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum LogCommands {
    /// Decode an event log and print its events
    Decode {
        /// Event log file
        #[clap(short, long, required = true)]
        file: PathBuf,

        /// Digest bank to select from crypto-agile logs, default from configuration
        #[clap(short, long)]
        algorithm: Option<String>,

        /// The file holds base64 text instead of binary
        #[clap(long)]
        base64: bool,
    },

    /// Print the boot chain summary of an event log
    Summary {
        /// Event log file
        #[clap(short, long, required = true)]
        file: PathBuf,

        /// The file holds base64 text instead of binary
        #[clap(long)]
        base64: bool,
    },

    /// Replay an event log into the PCR values it produces
    Pcrs {
        /// Event log file
        #[clap(short, long, required = true)]
        file: PathBuf,

        /// The file holds base64 text instead of binary
        #[clap(long)]
        base64: bool,
    },

    /// Compare a baseline event log with a live event log
    Compare {
        /// Baseline (support RIM) event log file
        #[clap(short, long, required = true)]
        baseline: PathBuf,

        /// Live event log file
        #[clap(short, long, required = true)]
        live: PathBuf,

        /// The baseline is a supplemental overlay, skip positional checks
        #[clap(short, long)]
        supplemental: bool,
    },
}
