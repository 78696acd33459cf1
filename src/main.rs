use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use kindred::{
    chat::{init_local_offset, ChatController, ChatSession},
    feed::{fetch_profiles, FeedPager},
    photos::{Gallery, PhotoFile, PhotoItem, PhotoManager},
    Api, ClientResult, Config, Mutation, Prompt,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kindred")]
#[command(about = "Chat, browse profiles and manage photos from the terminal")]
#[command(version)]
struct Args {
    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Join the group chat
    Chat,
    /// Page through the profile feed
    Feed {
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Upload photos to your profile
    Upload {
        files: Vec<std::path::PathBuf>,
    },
    /// Delete photos from your profile by id
    Delete {
        ids: Vec<i64>,
    },
}

struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn confirm(&self, message: &str) -> bool {
        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

fn main() -> ClientResult<()> {
    // must happen before the runtime spawns any threads
    init_local_offset();

    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(args.command))
}

async fn run(command: Command) -> ClientResult<()> {
    let config = Config::from_env()?;
    let api = Api::new(&config)?;

    match command {
        Command::Chat => chat(&config, &api).await,
        Command::Feed { pages } => {
            let mut pager = FeedPager::new(config.overlap);
            for _ in 0..pages {
                let Some(ctx) = pager.begin_load() else {
                    break;
                };
                let page = fetch_profiles(&api, ctx).await;
                let stop = match &page {
                    Ok(page) if page.profiles.is_empty() => {
                        info!("no more profiles");
                        true
                    }
                    Ok(page) => {
                        for card in &page.profiles {
                            println!("{card}");
                        }
                        false
                    }
                    Err(_) => true,
                };
                apply(&pager.finish_load(page));
                if stop {
                    break;
                }
            }
            Ok(())
        }
        Command::Upload { files } => {
            let mut picked = Vec::with_capacity(files.len());
            for path in files {
                picked.push(PhotoFile::open(path).await?);
            }

            let mut manager = PhotoManager::new(Gallery::default(), TerminalPrompt);
            apply(&manager.upload_photos(&api, picked).await);
            for item in manager.gallery().items() {
                println!("#{} {}", item.id, item.url);
            }
            Ok(())
        }
        Command::Delete { ids } => {
            let items = ids.iter()
                .map(|&id| PhotoItem { id, url: String::new(), selected: false })
                .collect();

            let mut manager = PhotoManager::new(Gallery::new(items), TerminalPrompt);
            for id in ids {
                manager.toggle(id, true);
            }
            apply(&manager.delete_selected(&api).await);
            println!("{} photos left", manager.gallery().items().len());
            Ok(())
        }
    }
}

async fn chat(config: &Config, api: &Api) -> ClientResult<()> {
    let (mut session, disposer) = ChatSession::connect(config).await?;
    let mut controller = ChatController::new(config.viewer.clone(), session.outbox());

    if let Some(bubbles) = controller.fetch_history(api).await {
        for bubble in &bubbles {
            println!("{bubble}");
        }
        apply(&controller.show(&bubbles));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(mut line)) => apply(&controller.send_message(&mut line)),
                Ok(None) => break,
                Err(e) => {
                    error!("can't read input: {e}");
                    break;
                }
            },
            payload = session.next_payload() => match payload {
                Some(payload) => {
                    if let Some(bubble) = controller.receive(&payload) {
                        println!("{bubble}");
                        apply(&controller.show(&[bubble]));
                    }
                }
                None => break,
            },
        }
    }

    disposer.dispose();
    Ok(())
}

/// There is no document in a terminal, so mutations are only traced
/// against the element they address.
fn apply(mutations: &[Mutation]) {
    for mutation in mutations {
        match mutation {
            Mutation::Append { port, html } => debug!("{} += {} bytes", port.selector(), html.len()),
            Mutation::Remove { selector } => debug!("{selector} removed"),
            Mutation::ScrollToBottom(port) => debug!("{} scrolled to bottom", port.selector()),
            Mutation::ClearInput(port) => debug!("{} cleared", port.selector()),
            Mutation::SetVisible { port, visible } => debug!("{} visible: {visible}", port.selector()),
        }
    }
}
