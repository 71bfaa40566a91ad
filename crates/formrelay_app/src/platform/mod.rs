mod cli;
mod config;
mod interceptor;
mod render;

use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use formrelay_core::SubmitEvent;
use formrelay_engine::EngineHandle;
use log::LevelFilter;
use relay_logging::{relay_info, relay_warn};

use cli::{Cli, Cmd};
use config::PageConfig;
use interceptor::{Disposition, Interceptor};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if !relay_logging::initialize(cli.log.into(), level) {
        eprintln!("Warning: logging is disabled");
    }

    let config = PageConfig::load(&cli.page)?;
    relay_info!("Loaded page {:?}", cli.page);

    match cli.cmd {
        Cmd::Forms => {
            let state = config.page_state();
            for form in config.form_ids().filter_map(|id| state.form(id)) {
                println!("{}", render::form_line(form));
            }
            Ok(())
        }
        Cmd::Submit {
            forms,
            submitter,
            wait_secs,
        } => submit(&config, &forms, submitter, Duration::from_secs(wait_secs)),
    }
}

fn submit(
    config: &PageConfig,
    forms: &[u32],
    submitter: Option<u32>,
    wait: Duration,
) -> anyhow::Result<()> {
    let engine = EngineHandle::new(config.submit_settings()?, config.download_dir().to_path_buf())
        .context("failed to start submission engine")?;
    let mut interceptor = Interceptor::install(config.page_state(), engine);

    for &form_id in forms {
        let event = SubmitEvent {
            form_id,
            submitter: submitter.or_else(|| config.submitter_for(form_id)),
        };
        match interceptor.submit(event) {
            Disposition::Intercepted => {}
            Disposition::Default => {
                relay_warn!("Form {} is not intercepted; nothing was sent", form_id)
            }
            Disposition::Ignored => {
                relay_warn!("Form {} skipped: its button is still busy", form_id)
            }
        }
    }

    let settled = interceptor.wait_until_settled(wait);
    print!(
        "{}",
        render::render(&interceptor.view(), config.has_notification_region())
    );
    if !settled {
        bail!("gave up waiting for submissions after {wait:?}");
    }
    Ok(())
}
