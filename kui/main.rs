use anyhow::{Result, anyhow};
use browser::Browser;
use clap::Parser;
use cli::Command;
use kui_config::Config;
use kui_kube::KubeConfigLoader;
use kui_query::Backend;
use std::sync::Arc;
use tokio::runtime::Builder;
use tracing::{error, info};

pub mod browser;
pub mod cli;
pub mod output;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let _logging_guard = kui_common::logging::initialize(kui_config::APP_NAME)?;
    info!("{} v{} started", kui_config::APP_NAME, kui_config::APP_VERSION);

    if let Err(error) = run_application(&args) {
        error!(
            "{} v{} terminated with an error: {}",
            kui_config::APP_NAME,
            kui_config::APP_VERSION,
            error
        );
        Err(error)
    } else {
        info!("{} v{} stopped", kui_config::APP_NAME, kui_config::APP_VERSION);
        Ok(())
    }
}

fn run_application(args: &cli::Args) -> Result<()> {
    let rt = Builder::new_multi_thread().enable_all().build()?;

    let config = rt.block_on(Config::load_or_create())?;
    let loader = KubeConfigLoader::new(
        config.kube_config_files(args.kube_config.as_deref()),
        args.client_options(&config),
    );

    let mut browser = Browser::new(Arc::new(Backend::new(loader)), rt.handle().clone());
    rt.block_on(execute(args, &mut browser))
}

async fn execute(args: &cli::Args, browser: &mut Browser<Backend>) -> Result<()> {
    let contexts = browser.contexts().await?;
    for error in &contexts.errors {
        error!("Cannot load kubeconfig: {}", error);
    }

    let default = Some(contexts.default.as_str()).filter(|c| !c.is_empty());
    let context = args.context(default);

    match &args.command {
        Command::Contexts => output::print(&contexts, args.output),
        Command::Describe => {
            let detail = browser.open_context(required(context)?).await?;
            output::print(detail, args.output)
        },
        Command::List { resources, scope } => {
            browser.open_context(required(context)?).await?;
            let result = browser.list(resources, |default| scope.selection(default)).await?;
            output::print(&result, args.output)
        },
        Command::Get {
            resource,
            name,
            namespace,
        } => {
            browser.open_context(required(context)?).await?;
            let result = browser.get(resource, namespace.as_deref(), name).await?;
            output::print(&result, args.output)
        },
    }
}

fn required(context: Option<&str>) -> Result<&str> {
    context.ok_or_else(|| anyhow!("no current context is set, use --context to select one"))
}
