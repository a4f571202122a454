use crate::conf::{ConfigError, ConfigOverrides, load_config};
use std::path::PathBuf;

pub fn check(path: PathBuf) -> anyhow::Result<()> {
    match load_config(Some(path.as_path()), ConfigOverrides::default()) {
        Ok(cfg) => {
            println!("✔ Config loaded successfully");
            if let Some(log_file) = &cfg.log_file {
                println!("✔ log file: {}", log_file.display());
            }
            println!(
                "✔ alert when >= {} hits in {}s",
                cfg.alert.threshold, cfg.alert.window_secs
            );
            println!(
                "✔ top {} sections every {}s",
                cfg.report.top_sections, cfg.report.interval_secs
            );
            Ok(())
        }
        Err(err) => {
            print_config_error(&err);
            std::process::exit(1);
        }
    }
}

fn print_config_error(err: &ConfigError) {
    eprintln!("{err}");
    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::MissingLogFile => Some(
            "The config must name the access log to follow.\n\
             \n\
             Example:\n\
             \n\
             log_file = \"/var/log/apache2/access.log\"",
        ),

        ConfigError::Parse { .. } => Some(
            "Settings are grouped in blocks.\n\
             \n\
             Example:\n\
             \n\
             alert {\n\
             \x20 threshold   = 110\n\
             \x20 window_secs = 120\n\
             }",
        ),

        ConfigError::Validation { .. } => Some(
            "Counts and intervals must be positive and within their limits.\n\
             \n\
             Run `hitwatch config init` to see every setting with its default.",
        ),

        ConfigError::ReadFile { .. } => None,
    }
}
