use clap::Parser;
use msgdeps::{Cli, MsgDeps, MsgDepsError};
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Handle config generation before anything else needs a valid setup
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    // clap enforces the positionals whenever --generate-config is absent
    let (source, destination) = match (&cli.source, &cli.destination) {
        (Some(source), Some(destination)) => (source.clone(), destination.clone()),
        _ => {
            eprintln!("error: SOURCE_DIR and DESTINATION_DIR are required");
            return 2;
        }
    };

    let msgdeps = match MsgDeps::from_cli(&cli) {
        Ok(instance) => instance,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&msgdeps, &source, &destination);
    }

    match msgdeps.generate(&source, &destination) {
        Ok(_progress) => 0,
        Err(e) => {
            msgdeps.handle_error(&e);
            match e {
                MsgDepsError::Cancelled => 130,
                _ => 1,
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("msgdeps.toml"));

    match MsgDeps::generate_sample_config(&config_path) {
        Ok(()) => {
            println!(
                "Generated sample configuration file: {}",
                config_path.display()
            );
            println!("Edit the file to customize your settings.");
            println!(
                "Use with: msgdeps --config {} <source-dir> <destination-dir>",
                config_path.display()
            );
            0
        }
        Err(e) => {
            eprintln!("Failed to generate config file: {}", e);
            1
        }
    }
}

fn handle_dry_run(msgdeps: &MsgDeps, source: &Path, destination: &Path) -> i32 {
    let formatter = msgdeps.output_formatter();
    let config = msgdeps.config();

    formatter.print_header("Dry Run");

    let messages = match msgdeps.discover(source) {
        Ok(messages) => messages,
        Err(e) => {
            msgdeps.handle_error(&e);
            return 1;
        }
    };

    println!("Source: {}", source.display());
    println!("Destination: {}", destination.display());
    println!("Generator: {}", config.generator_display());
    println!("Extension: .{}", config.discovery.extension);
    if !config.discovery.exclude_dirs.is_empty() {
        println!(
            "Excluded directories: {}",
            config.discovery.exclude_dirs.join(", ")
        );
    }
    if let Some(depth) = config.discovery.max_depth {
        println!("Max depth: {}", depth);
    }

    println!();
    println!("Files that would be processed: {}", messages.len());
    for message in &messages {
        println!(
            "  {} -> {}",
            message.display_path(),
            destination.join(&message.relative_path).display()
        );
    }

    formatter.print_separator();
    formatter.success("Dry run completed - no files were written");
    0
}

fn print_startup_error(error: &MsgDepsError) {
    // Create a basic formatter for error display
    let formatter = msgdeps::OutputFormatter::new(msgdeps::OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
