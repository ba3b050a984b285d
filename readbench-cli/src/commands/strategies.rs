// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `readbench strategies` command - List read strategies.

use readbench_core::StrategyKind;

pub async fn execute() -> Result<(), Box<dyn std::error::Error>> {
    println!("Available strategies:");
    for kind in StrategyKind::ALL {
        println!("  {:<16} {}", kind.name(), kind.description());
    }
    Ok(())
}
