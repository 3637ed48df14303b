mod command;
mod config;
mod paths;
mod render;

use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use chrono::SecondsFormat;
use chrono::TimeDelta;
use chrono::Utc;
use command::Command;
use command::ParseError;
use log::error;
use log::info;
use postlist_lib::api::InMemoryProvider;
use postlist_lib::cache::CachedProvider;
use postlist_lib::model::Post;
use postlist_lib::model::PostStatus;
use postlist_lib::{Error, TableController};
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

type Table = TableController<CachedProvider<InMemoryProvider>>;

const SAMPLE_POSTS: u64 = 57;

const TOPICS: &[&str] = &[
    "Getting started with async Rust",
    "Release notes",
    "Weekly digest",
    "Benchmarking the page cache",
    "Community spotlight",
    "Migrating from version one",
    "Roadmap update",
];

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

enum Flow {
    Continue,
    Help,
    Quit,
}

fn init_logging() {
    let Some(path) = paths::prepare_log_file() else {
        eprintln!("Logging disabled: no cache directory");
        return;
    };
    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), file) {
                eprintln!("Logging disabled: {}", e);
            }
        }
        Err(e) => eprintln!("Logging disabled: {}", e),
    }
}

fn sample_posts() -> Vec<Post> {
    let now = Utc::now();
    (1..=SAMPLE_POSTS)
        .map(|i| {
            let topic = TOPICS[i as usize % TOPICS.len()];
            let status = PostStatus::ALL[i as usize % PostStatus::ALL.len()];
            let created_at = now - TimeDelta::hours(i as i64 * 9);
            Post::new(
                i,
                format!("{} #{}", topic, i),
                status,
                created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
        })
        .collect()
}

fn execute(table: &mut Table, command: Command) -> Result<Flow, Error> {
    match command {
        Command::Next => {
            table.next_page();
        }
        Command::Prev => {
            table.previous_page();
        }
        Command::First => {
            table.first_page();
        }
        Command::Last => {
            table.last_page();
        }
        Command::Page(page) => {
            table.go_to_page(page);
        }
        Command::Size(size) => {
            table.set_page_size(size)?;
        }
        Command::Sort(column) => {
            table.toggle_sort(&column)?;
        }
        Command::Filter { column, text } => {
            table.set_filter(&column, &text)?;
        }
        Command::Select(id) => {
            table.toggle_row(id)?;
        }
        Command::SelectAll => table.toggle_all(),
        Command::Edit(id) => table.begin_edit(id)?,
        Command::Title(title) => table.set_draft_title(title)?,
        Command::Status(status) => table.set_draft_status(status)?,
        Command::Save => table.submit_edit()?,
        Command::Cancel => {
            table.cancel_edit();
        }
        Command::Delete(id) => {
            table.request_delete_one(id);
        }
        Command::DeleteSelected => {
            if table.request_delete_selected().is_none() {
                println!("Nothing selected.");
            }
        }
        Command::Yes => table.confirm_delete()?,
        Command::No => {
            table.cancel_delete();
        }
        Command::Refresh => table.refresh(),
        Command::Help => return Ok(Flow::Help),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn show(table: &mut Table) {
    println!("\n{}", render::render(table.state()));
    if let Some(notice) = table.take_notice() {
        println!("{}", notice);
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

async fn run() -> Result<(), CliError> {
    let config = config::load()?;
    let store = InMemoryProvider::new(config.resource.clone()).with_posts(sample_posts());
    info!("Seeded {} sample posts", store.len());
    let provider = Arc::new(CachedProvider::new(store, config.cache.clone()));

    let mut table = TableController::new(provider, config);
    table.load();
    table.settle().await;
    show(&mut table);
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        match execute(&mut table, command) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Help) => {
                println!("{}", command::HELP);
                continue;
            }
            Ok(Flow::Quit) => break,
            Err(e) => println!("Error: {}", e),
        }
        table.settle().await;
        show(&mut table);
    }

    info!("Exiting");
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
