// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command, arg, value_parser};
use exchange_ews::{
    ChangeTracker, EwsXmlWriter, ExchangeService, Recurrence, RecurrenceRange, RequestFormat,
    ServiceConfig, parse_unspecified_date,
};
use jiff::civil::Date;

use crate::arg::CommonArgs;

#[derive(Debug, Clone)]
pub struct CmdRange {
    pub start: Date,
    pub end: Option<Date>,
    pub count: Option<u32>,
    pub format: Option<RequestFormat>,
}

impl CmdRange {
    pub const NAME: &str = "range";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Serialize a recurrence with the given range")
            .arg(
                arg!(-s --start <DATE> "First date of the recurrence")
                    .value_parser(parse_date)
                    .required(true),
            )
            .arg(
                arg!(-e --end <DATE> "Last date of the recurrence")
                    .value_parser(parse_date)
                    .conflicts_with("count"),
            )
            .arg(
                arg!(-n --count <COUNT> "Number of occurrences")
                    .value_parser(value_parser!(u32).range(1..)),
            )
            .arg(CommonArgs::format())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let start = matches
            .get_one::<Date>("start")
            .copied()
            .ok_or("--start is required")?;

        Ok(Self {
            start,
            end: matches.get_one("end").copied(),
            count: matches.get_one("count").copied(),
            format: CommonArgs::get_format(matches),
        })
    }

    pub fn run(self, config: ServiceConfig) -> Result<(), Box<dyn Error>> {
        self.execute(config, &mut io::stdout())
    }

    pub fn execute(
        self,
        config: ServiceConfig,
        out: &mut impl io::Write,
    ) -> Result<(), Box<dyn Error>> {
        let format = self.format.unwrap_or(config.format);
        let service = ExchangeService::new(config)?;

        let mut tracker = ChangeTracker::new();
        let range = self.range(&mut tracker);
        let mut recurrence = Recurrence::new(&mut tracker);
        recurrence.set_range(&mut tracker, range)?;
        tracing::debug!(
            start = ?recurrence.start_date(),
            end = ?recurrence.end_date(),
            count = ?recurrence.number_of_occurrences(),
            "recurrence set up"
        );

        match format {
            RequestFormat::Xml => {
                let mut writer = EwsXmlWriter::new();
                recurrence.write_to_xml(&mut writer)?;
                writeln!(out, "{}", writer.into_string()?)?;
            }
            RequestFormat::Json => {
                let json = serde_json::Value::Object(recurrence.to_json(&service)?);
                writeln!(out, "{json:#}")?;
            }
        }
        Ok(())
    }

    fn range(&self, tracker: &mut ChangeTracker) -> RecurrenceRange {
        match (self.end, self.count) {
            (Some(end), _) => RecurrenceRange::end_date(tracker, self.start, end),
            (None, Some(count)) => RecurrenceRange::numbered(tracker, self.start, count),
            (None, None) => RecurrenceRange::no_end(tracker, self.start),
        }
    }
}

fn parse_date(value: &str) -> Result<Date, String> {
    parse_unspecified_date(value).ok_or_else(|| format!("Invalid date: {value}"))
}
