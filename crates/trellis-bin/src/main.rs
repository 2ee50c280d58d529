// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `trellisd` entry point.

use trellis_bin::cli::{Cli, Commands};
use trellis_bin::config::Settings;
use trellis_bin::{logging, runtime};

fn main() {
    let cli = Cli::parse_args();
    logging::init_logging(cli.effective_log_level(), cli.log_format);

    let exit = match cli.effective_command() {
        Commands::Run(args) => {
            let result = Settings::load_or_default(&cli.config).and_then(|mut settings| {
                if let Some(bind) = args.bind {
                    settings.net.bind_address = bind;
                }
                if let Some(uri) = args.application_uri {
                    settings.application_uri = uri;
                }
                settings.validate()
            });
            match result {
                Ok(settings) => {
                    let rt = tokio::runtime::Builder::new_multi_thread()
                        .enable_all()
                        .build()
                        .expect("failed to build tokio runtime");
                    match rt.block_on(runtime::run(settings)) {
                        Ok(()) => 0,
                        Err(error) => {
                            eprintln!("error: {}", error);
                            1
                        }
                    }
                }
                Err(error) => {
                    eprintln!("error: {}", error);
                    2
                }
            }
        }
        Commands::Validate(args) => match Settings::load(&cli.config) {
            Ok(settings) => match runtime::validate(&settings, args.show_config) {
                Ok(()) => 0,
                Err(error) => {
                    eprintln!("error: {}", error);
                    2
                }
            },
            Err(error) => {
                eprintln!("error: {}", error);
                2
            }
        },
        Commands::Version => {
            runtime::print_version();
            0
        }
    };

    std::process::exit(exit);
}
