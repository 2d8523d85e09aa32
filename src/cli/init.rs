//! tt init: write a default `.tt.toml`.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::GlobalOptions;
use crate::config::{Config, CONFIG_FILENAME};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

pub struct InitOptions {
    pub global: GlobalOptions,
}

#[derive(Serialize)]
struct InitReport {
    config: PathBuf,
    created: bool,
}

pub fn run(options: InitOptions) -> Result<()> {
    let path = match options.global.config.clone() {
        Some(path) => path,
        None => std::env::current_dir()?.join(CONFIG_FILENAME),
    };

    let created = if path.exists() {
        if !path.is_file() {
            return Err(Error::InvalidConfig(format!(
                "{} exists but is not a file",
                path.display()
            )));
        }
        false
    } else {
        Config::default().save(&path)?;
        tracing::debug!(path = %path.display(), "wrote default config");
        true
    };

    let header = if created {
        "tt init: wrote default config"
    } else {
        "tt init: nothing to do"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("config", path.display().to_string());
    if created {
        human.push_next_step(format!("edit {} to change page size or id prefix", path.display()));
    }

    let report = InitReport {
        config: path,
        created,
    };
    emit_success(options.global.output(), "init", &report, Some(&human))
}
