// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgMatches, ValueEnum, arg, value_parser};
use exchange_ews::RequestFormat;

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn format() -> Arg {
        arg!(--format <FORMAT> "Wire format, defaults to the configured one")
            .value_parser(value_parser!(ArgFormat))
    }

    pub fn get_format(matches: &ArgMatches) -> Option<RequestFormat> {
        matches
            .get_one::<ArgFormat>("format")
            .copied()
            .map(RequestFormat::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArgFormat {
    Xml,
    Json,
}

impl From<ArgFormat> for RequestFormat {
    fn from(format: ArgFormat) -> Self {
        match format {
            ArgFormat::Xml => Self::Xml,
            ArgFormat::Json => Self::Json,
        }
    }
}
