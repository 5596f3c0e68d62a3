// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end of the `exchange-ews` crate.

mod arg;
mod cli;
mod cmd_archive;
mod cmd_generate_completion;
mod cmd_range;
mod config;
mod replay;

pub use crate::cli::{Cli, Commands, run};
pub use crate::config::parse_config;
pub use crate::replay::ReplayTransport;
