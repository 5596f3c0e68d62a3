// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io, path::PathBuf};

use clap::{ArgAction, ArgMatches, Command, ValueHint, arg, value_parser};
use colored::Colorize;
use exchange_ews::{
    ArchiveItemRequest, ArchiveItemResponse, ExchangeService, FolderId, ItemId, RequestFormat,
    ServiceConfig, ServiceRequest, ServiceResponse, ServiceResult,
};

use crate::arg::CommonArgs;
use crate::replay::ReplayTransport;

#[derive(Debug, Clone)]
pub struct CmdArchive {
    pub folder: FolderId,
    pub items: Vec<ItemId>,
    pub format: Option<RequestFormat>,
    pub response: Option<PathBuf>,
}

impl CmdArchive {
    pub const NAME: &str = "archive";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Build an ArchiveItem request, or replay a saved response to it")
            .arg(
                arg!(-f --folder <FOLDER> "Source folder id, or a well-known name such as inbox")
                    .required(true),
            )
            .arg(arg!(-m --mailbox <MAILBOX> "Mailbox that holds the well-known folder"))
            .arg(
                arg!(-i --item <ITEM> "Item to archive, as ID or ID:CHANGEKEY")
                    .required(true)
                    .action(ArgAction::Append),
            )
            .arg(CommonArgs::format())
            .arg(
                arg!(-r --response <FILE> "Saved server response to replay")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let folder = matches
            .get_one::<String>("folder")
            .ok_or("--folder is required")?;
        let folder: FolderId = folder.parse()?;
        let folder = match (folder, matches.get_one::<String>("mailbox")) {
            (FolderId::Distinguished { name, .. }, Some(mailbox)) => {
                FolderId::distinguished_in(name, mailbox.clone())
            }
            (FolderId::Id { .. }, Some(_)) => {
                return Err("--mailbox only applies to well-known folders".into());
            }
            (folder, None) => folder,
        };

        let items = matches
            .get_many::<String>("item")
            .ok_or("at least one --item is required")?
            .map(|a| parse_item_id(a))
            .collect();

        Ok(Self {
            folder,
            items,
            format: CommonArgs::get_format(matches),
            response: matches.get_one("response").cloned(),
        })
    }

    pub fn run(self, config: ServiceConfig) -> Result<(), Box<dyn Error>> {
        self.execute(config, &mut io::stdout())
    }

    pub fn execute(
        self,
        mut config: ServiceConfig,
        out: &mut impl io::Write,
    ) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "archiving items...");
        if let Some(format) = self.format {
            config.format = format;
        }
        let service = ExchangeService::new(config)?;

        match self.response {
            None => {
                let mut request = ArchiveItemRequest::new(service.error_handling());
                request.set_source_folder_id(self.folder);
                request.ids_mut().extend(self.items);
                let outgoing = request.emit(&service, service.format())?;
                writeln!(out, "{}", outgoing.body)?;
            }
            Some(path) => {
                let mut transport = ReplayTransport::new(path);
                let responses = service.archive_items(&mut transport, self.items, self.folder)?;
                for response in &responses {
                    writeln!(out, "{}", format_response(response))?;
                }
            }
        }
        Ok(())
    }
}

fn parse_item_id(value: &str) -> ItemId {
    match value.split_once(':') {
        Some((id, change_key)) if !change_key.is_empty() => ItemId::with_change_key(id, change_key),
        Some((id, _)) => ItemId::new(id),
        None => ItemId::new(value),
    }
}

fn format_response(response: &ArchiveItemResponse) -> String {
    let outcome = response.outcome();
    let result = match outcome.result {
        ServiceResult::Success => outcome.result.as_str().green(),
        ServiceResult::Warning => outcome.result.as_str().yellow(),
        ServiceResult::Error => outcome.result.as_str().red(),
    };

    let mut line = format!(
        "#{} {} {} {}",
        response.index(),
        response.target(),
        result,
        outcome.code
    );
    if let Some(id) = response.item_id() {
        line.push_str(&format!(" -> {id}"));
    }
    if let Some(message) = &outcome.message {
        line.push_str(&format!(": {}", message.dimmed()));
    }
    line
}
