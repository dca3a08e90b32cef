//! Bat-Q - canned Batfish network analysis questions from the command line.

use std::process::ExitCode;

use batq::catalog::QueryCatalog;
use batq::cli::{Cli, Command};
use batq::config::Config;
use batq::engine::{self, AnalysisClient, MockAnalysisClient};
use batq::error::{BatqError, Result};
use batq::pages::{self, analysis, differential, failure, home, questions, Page, PageContext};
use batq::render;
use batq::session::{SessionContext, SessionStore};
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse_args();
    let format = cli.parse_output_format().map_err(BatqError::config)?;

    // Host precedence: --host, then the config file, then BATFISH_SERVER.
    let config_path = cli.config_path();
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_overrides(&mut config);
    config.server.apply_env_defaults();

    batq::logging::init(&config.logging);
    info!("Loaded config from: {}", config_path.display());
    info!("Batfish host: {}", config.server.display_string());

    let catalog = if needs_catalog(&cli.command) {
        QueryCatalog::load(&config.catalog.path)?
    } else {
        QueryCatalog::default()
    };

    let client: Box<dyn AnalysisClient> = if cli.mock_engine {
        info!("Using the in-memory mock engine");
        Box::new(MockAnalysisClient::new())
    } else {
        engine::connect(&config.server)?
    };

    let mut ctx = PageContext::new(client.as_ref(), &catalog, &config.server);
    if cli.mock_engine {
        ctx = ctx.without_probe();
    }

    let store = SessionStore::new(config.session.path());
    let mut session = store.load();

    let page = dispatch(&cli.command, &ctx, &mut session).await;
    print!("{}", render::render(&page, format)?);

    if let Err(e) = store.save(&session) {
        warn!("Could not save session: {e}");
    }

    if page.blocked {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn needs_catalog(command: &Command) -> bool {
    !matches!(command, Command::Probe | Command::Snapshots(_))
}

async fn dispatch(
    command: &Command,
    ctx: &PageContext<'_>,
    session: &mut SessionContext,
) -> Page {
    match command {
        Command::Probe => pages::engine_status(ctx).await,
        Command::Snapshots(args) => home::home(ctx, session, args.to_action()).await,
        Command::Questions(cmd) => questions::questions(ctx, session, cmd.to_action()),
        Command::Analyze => analysis::analysis(ctx, session).await,
        Command::Fail(args) => failure::failure(ctx, session, args.to_request()).await,
        Command::Compare => differential::differential(ctx, session).await,
    }
}
