use std::{process, sync::Arc, time::Duration};

use quire::{
    application::{
        detail::{DetailState, PostDetailLoader},
        error::AppError,
        feed::{FeedSession, FeedView},
        repos::PostsProvider,
        store::PostStore,
    },
    config::{self, ListArgs, Settings, ShowArgs},
    domain::types::SortOrder,
    infra::{error::InfraError, mock::MockPostsProvider, telemetry},
    presentation::text,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{Dispatch, Level, debug, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();

    if dispatcher::has_been_set() {
        error!(source = report.source, error = %report.summary(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(source = report.source, error = %report.summary(), "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::List(ListArgs::default()));

    telemetry::init(&settings.logging)?;

    let provider: Arc<dyn PostsProvider> =
        Arc::new(MockPostsProvider::seeded(&settings.provider));
    let shutdown = CancellationToken::new();

    let result = match command {
        config::Command::List(args) => run_list(&settings, provider, &shutdown, args).await,
        config::Command::Show(args) => run_show(&settings, provider, &shutdown, args).await,
        config::Command::Browse => run_browse(&settings, provider, &shutdown).await,
    };

    shutdown.cancel();
    result
}

async fn run_list(
    settings: &Settings,
    provider: Arc<dyn PostsProvider>,
    shutdown: &CancellationToken,
    args: ListArgs,
) -> Result<(), AppError> {
    let store = Arc::new(PostStore::new(provider, settings.store.refetch));
    // One-shot queries skip the quiet period.
    let mut session = FeedSession::open(store, shutdown, Duration::ZERO);
    session.set_search(args.search.unwrap_or_default());
    session.set_sort(args.sort);

    if let Some(outcome) = session.settle().await {
        debug!(?outcome, "initial post load settled");
    }

    let view = session.view();
    if let FeedView::Failed { message } = &view {
        return Err(AppError::unexpected(message.clone()));
    }

    if args.json {
        print_json(view.posts())?;
    } else {
        print!("{}", text::render_feed(&view));
    }
    Ok(())
}

async fn run_show(
    settings: &Settings,
    provider: Arc<dyn PostsProvider>,
    shutdown: &CancellationToken,
    args: ShowArgs,
) -> Result<(), AppError> {
    let loader = PostDetailLoader::new(provider, settings.detail.min_display);
    let Some(result) = loader.resolve(&args.id, shutdown).await else {
        return Ok(());
    };

    match result {
        Ok(detail) if args.json => print_json(&detail.post),
        Ok(detail) => {
            print!("{}", text::render_detail(&DetailState::Ready(Box::new(detail))));
            Ok(())
        }
        Err(err) => {
            let failed = DetailState::Failed {
                message: err.public_message(),
            };
            print!("{}", text::render_detail(&failed));
            Err(err.into())
        }
    }
}

enum BrowseEvent {
    Line(Option<String>),
    Changed,
}

async fn run_browse(
    settings: &Settings,
    provider: Arc<dyn PostsProvider>,
    shutdown: &CancellationToken,
) -> Result<(), AppError> {
    let store = Arc::new(PostStore::new(provider, settings.store.refetch));
    let mut session = FeedSession::open(store, shutdown, settings.search.debounce);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_rendered = String::new();

    info!("browsing posts; type to search, `:sort ORDER`, `:reload` or `:quit`");
    show_if_changed(&session.view(), &mut last_rendered);

    loop {
        let event = tokio::select! {
            line = lines.next_line() => BrowseEvent::Line(line.map_err(InfraError::from)?),
            () = session.changed() => BrowseEvent::Changed,
        };

        match event {
            BrowseEvent::Changed => show_if_changed(&session.view(), &mut last_rendered),
            BrowseEvent::Line(None) => break,
            BrowseEvent::Line(Some(line)) => match line.trim() {
                ":quit" | ":q" => break,
                ":reload" => session.reload(),
                command if command.starts_with(":sort") => {
                    let order = command.trim_start_matches(":sort").trim();
                    match order.parse::<SortOrder>() {
                        Ok(order) => session.set_sort(order),
                        Err(err) => warn!(error = %err, "ignoring sort command"),
                    }
                }
                _ => session.set_search(line.as_str()),
            },
        }
    }

    // Let a search typed just before end of input settle.
    if session.search_pending() {
        tokio::time::sleep(settings.search.debounce).await;
    }
    show_if_changed(&session.view(), &mut last_rendered);
    session.close();
    Ok(())
}

fn show_if_changed(view: &FeedView, last_rendered: &mut String) {
    let rendered = text::render_feed(view);
    if rendered != *last_rendered {
        println!("{rendered}");
        *last_rendered = rendered;
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let encoded = serde_json::to_string_pretty(value).map_err(InfraError::from)?;
    println!("{encoded}");
    Ok(())
}
