use std::collections::HashSet;

use anyhow::Context;
use autofill_core::{format_cep, AutofillViewModel, FormField};
use autofill_engine::{AutofillHandle, Notification, NotificationId};
use autofill_logging::{autofill_info, autofill_warn};
use clap::Parser;
use log::LevelFilter;

use super::cli::Cli;
use super::config::AppConfig;
use super::render;

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    autofill_logging::initialize(cli.log, level);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    let failed = runtime.block_on(run(&cli, &config))?;
    if failed > 0 {
        anyhow::bail!("{failed} of {} lookup(s) failed", cli.ceps.len());
    }
    Ok(())
}

/// Runs the lookups one after another and returns how many ended in error.
async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<usize> {
    let engine_config = config.engine_config();
    autofill_info!(
        "Using {:?} backend at {}",
        engine_config.lookup.backend,
        engine_config.lookup.base_url
    );
    let handle = AutofillHandle::new(engine_config);

    if let Some(number) = &cli.number {
        handle.edit(FormField::Number, number.clone());
    }
    if let Some(complement) = &cli.complement {
        handle.edit(FormField::Complement, complement.clone());
    }

    let mut printer = Printer::new(handle.view());
    let mut views = handle.subscribe();
    let mut toasts = handle.notifications().observe();
    let mut failed = 0;

    for raw in &cli.ceps {
        println!("> CEP {}", format_cep(raw));
        handle.edit(FormField::PostalCode, raw.clone());
        handle.request_lookup();

        let settled = handle.settled();
        tokio::pin!(settled);
        let view = loop {
            tokio::select! {
                biased;
                view = &mut settled => {
                    break view.context("autofill stopped before the form settled")?;
                }
                Ok(()) = views.changed() => {
                    let next = views.borrow_and_update().clone();
                    printer.view(next);
                }
                Some(list) = toasts.next() => printer.notifications(&list),
            }
        };
        printer.notifications(&handle.notifications().snapshot());
        printer.view(view.clone());

        if render::lookup_failed(&view) {
            autofill_warn!("Lookup for {} did not fill the form", raw);
            failed += 1;
        }
    }

    let final_view = handle.view();
    handle.shutdown();

    println!("Final form:");
    for line in render::render_form(&final_view) {
        println!("  {line}");
    }
    Ok(failed)
}

/// Prints view transitions and each notification once.
struct Printer {
    last_view: AutofillViewModel,
    shown: HashSet<NotificationId>,
}

impl Printer {
    fn new(initial: AutofillViewModel) -> Self {
        Self {
            last_view: initial,
            shown: HashSet::new(),
        }
    }

    fn view(&mut self, next: AutofillViewModel) {
        for line in render::render_changes(&self.last_view, &next) {
            println!("  {line}");
        }
        self.last_view = next;
    }

    fn notifications(&mut self, list: &[Notification]) {
        for notification in list {
            if self.shown.insert(notification.id) {
                println!("{}", render::render_notification(notification));
            }
        }
    }
}
