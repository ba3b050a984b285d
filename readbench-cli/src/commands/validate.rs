// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `readbench validate` command - Validate configuration file.

use std::path::Path;

use readbench_core::ConfigLoader;

pub async fn execute(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(file = %file.display(), "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            let sweep: Vec<String> = config.sweep().map(|size| size.to_string()).collect();

            println!("✓ Configuration is valid");
            println!();
            println!("Run Settings:");
            println!(
                "  File Size:    {} ({} bytes)",
                config.file_size(),
                config.file_size().bytes()
            );
            println!("  Repetitions:  {}", config.repetitions());
            println!(
                "  Buffer Sizes: {}..={} step {}",
                config.buffer_from(),
                config.buffer_to(),
                config.step()
            );
            println!(
                "  Temp Dir:     {}",
                config
                    .temp_dir()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|| "<system default>".to_string())
            );
            println!();
            println!("Sweep ({} points): {}", sweep.len(), sweep.join(", "));
            println!();
            println!("Strategies ({}):", config.strategies().len());
            for kind in config.strategies() {
                println!("  - {}", kind);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
