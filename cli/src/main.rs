// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `ews` - inspect Exchange Web Services requests and responses offline.

use std::error::Error;

use exchange_ews_cli::run;

fn main() -> Result<(), Box<dyn Error>> {
    run()
}
