mod logging;

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use clap::Subcommand;
use filestore::FileLockStore;
use httpnet::HttpBackend;
use pollsync::render::render;
use pollsync::Backend;
use pollsync::Config;
use pollsync::PollDraft;
use pollsync::PollView;
use pollsync::ViewState;
use pollsync::VoteGuard;
use pollsync::VoteOutcome;

use crate::logging::init_logging;

/// A terminal client of the poll service.
#[derive(Debug, Parser)]
#[clap(name = "poll-cli", version, about)]
struct Args {
    #[clap(flatten)]
    config: Config,

    /// Where the votes of this client are recorded
    #[clap(long, default_value = ".pollsync/votes.json")]
    lock_file: PathBuf,

    #[clap(long, default_value = "_log")]
    log_dir: String,

    #[clap(long, default_value = "INFO")]
    log_level: String,

    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Show the latest poll and keep it up to date, until Ctrl-C
    Watch,

    /// Fetch the latest poll once and show it
    Show,

    /// Vote for an option of the latest poll
    Vote {
        /// The option key, as shown in brackets
        key: String,
    },

    /// Create a poll; it becomes the latest one
    Create {
        #[clap(long)]
        question: String,

        /// An option label; repeat for each option, at least two
        #[clap(long = "option", required = true)]
        options: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let g = init_logging("poll-cli", &args.log_dir, &args.log_level)?;
    Box::leak(Box::new(g));

    let config = Arc::new(args.config.clone().validate()?);
    let backend = HttpBackend::new(&config)?;

    match args.cmd {
        Cmd::Create { question, options } => {
            create(backend, question, options).await
        }
        Cmd::Watch => {
            let view = open_view(&config, backend, &args.lock_file, true)?;
            let res = watch(&view).await;
            view.shutdown().await?;
            res
        }
        Cmd::Show => {
            let view = open_view(&config, backend, &args.lock_file, false)?;
            let res = show(&view).await;
            view.shutdown().await?;
            res
        }
        Cmd::Vote { key } => {
            let view = open_view(&config, backend, &args.lock_file, false)?;
            let res = vote(&view, &key).await;
            view.shutdown().await?;
            res
        }
    }
}

fn open_view(
    config: &Arc<Config>,
    backend: HttpBackend,
    lock_file: &Path,
    enable_tick: bool,
) -> anyhow::Result<PollView> {
    let lock_store = FileLockStore::open(lock_file)?;

    let config = Arc::new(Config {
        enable_tick: config.enable_tick && enable_tick,
        ..config.as_ref().clone()
    });

    Ok(PollView::new(config, backend, lock_store))
}

/// Wait for the initial fetch to complete, successfully or not.
async fn first_fetch(view: &PollView) -> anyhow::Result<ViewState> {
    let timeout = view.config().request_timeout() + Duration::from_secs(1);

    let st = view
        .wait(Some(timeout))
        .state(|s| s.fetch_succeeded + s.fetch_failed > 0, "first fetch")
        .await?;

    if let (None, Some(e)) = (&st.snapshot, &st.last_error) {
        anyhow::bail!("failed to load the poll: {}", e);
    }
    Ok(st)
}

async fn show(view: &PollView) -> anyhow::Result<()> {
    first_fetch(view).await?;
    println!("{}", view.render());
    Ok(())
}

async fn vote(view: &PollView, key: &str) -> anyhow::Result<()> {
    first_fetch(view).await?;

    match view.vote(key).await? {
        VoteOutcome::Voted(_) => println!("Voted for {}.", key),
        VoteOutcome::Suppressed(s) => println!("Vote not sent: {}.", s),
        VoteOutcome::Failed(e) => println!("Vote failed: {}.", e),
    }

    println!();
    println!("{}", view.render());
    Ok(())
}

async fn watch(view: &PollView) -> anyhow::Result<()> {
    let mut rx = view.state();

    loop {
        {
            let st = rx.borrow_and_update().clone();
            print_frame(view, &st);
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            sig = tokio::signal::ctrl_c() => {
                sig?;
                tracing::info!("received Ctrl-C, stop watching");
                return Ok(());
            }
        }
    }
}

fn print_frame(view: &PollView, st: &ViewState) {
    let now = chrono::Local::now();

    println!();
    println!("{}", st.render(view.config().failure_policy));

    if let Some(e) = &st.last_error {
        println!("({}; last error: {})", now.format("%H:%M:%S"), e);
    } else {
        println!("(updated at {})", now.format("%H:%M:%S"));
    }
}

async fn create(
    mut backend: HttpBackend,
    question: String,
    options: Vec<String>,
) -> anyhow::Result<()> {
    let new_poll = PollDraft::with_options(question, options).validate()?;

    let created = backend.create(&new_poll).await?;

    println!("Created poll {}.", created.id);
    println!();
    println!("{}", render(&created, &VoteGuard::Unvoted));
    Ok(())
}
