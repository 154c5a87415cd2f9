use std::{process, sync::Arc};

use postboard::{
    application::{
        board::{Board, BoardConfig, CompletionOutcome},
        error::AppError,
        intent::{Confirmation, Intent},
        modal::ModalState,
        runtime::{Runtime, Wake},
    },
    config,
    infra::{error::InfraError, remote::HttpPostsRemote, telemetry},
    presentation::{
        commands::{self, ShellCommand},
        views::{self, TemplateRenderError},
    },
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};
use tracing::{Dispatch, Level, debug, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli().map_err(InfraError::from)?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let remote = HttpPostsRemote::new(&settings.remote.base_url, settings.remote.timeout)?;
    info!(base = %remote.base(), "remote configured");
    let board_config = BoardConfig::from(&settings);

    match cli_args.command.unwrap_or(config::Command::Browse) {
        config::Command::Browse => run_browse(board_config, remote).await,
        config::Command::List(args) => {
            let board_config = BoardConfig {
                initial_order: args.order,
                ..board_config
            };
            let mut runtime = Runtime::new(Board::new(board_config), Arc::new(remote));
            run_once(&mut runtime, Intent::GoToPage(args.page)).await?;
            print(&views::render_board(&runtime.board().snapshot()).map_err(render_failed)?)
                .await
        }
        config::Command::Search(args) => {
            let mut runtime = Runtime::new(Board::new(board_config), Arc::new(remote));
            run_once(&mut runtime, Intent::QueryChanged(args.query)).await?;
            print(&views::render_board(&runtime.board().snapshot()).map_err(render_failed)?)
                .await
        }
        config::Command::Show(args) => {
            let mut runtime = Runtime::new(Board::new(board_config), Arc::new(remote));
            run_once(&mut runtime, Intent::ShowDetails(args.id)).await?;
            match runtime.board().modal() {
                ModalState::Details(post) => {
                    print(&views::render_post(post).map_err(render_failed)?).await
                }
                _ => Err(AppError::unexpected(format!("post #{} was not loaded", args.id))),
            }
        }
    }
}

/// Dispatch a single intent and wait until the board has settled.
async fn run_once(runtime: &mut Runtime, intent: Intent) -> Result<(), AppError> {
    runtime.dispatch(intent)?;
    let wakes = runtime.settle().await;
    if wakes.contains(&Wake::Completed(CompletionOutcome::Failed)) {
        let reason = runtime.board().notice().unwrap_or("request failed");
        return Err(AppError::unexpected(reason.to_string()));
    }
    Ok(())
}

async fn run_browse(config: BoardConfig, remote: HttpPostsRemote) -> Result<(), AppError> {
    let mut runtime = Runtime::new(Board::new(config), Arc::new(remote));
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    if let Err(err) = runtime.dispatch(Intent::GoToPage(1)) {
        debug!(error = %err, "initial load rejected");
    }
    redraw(&mut stdout, &runtime).await?;

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line.map_err(InfraError::from)? else {
                    break;
                };
                match commands::parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(ShellCommand::Help)) => {
                        write(&mut stdout, &views::render_help().map_err(render_failed)?).await?;
                    }
                    Ok(Some(ShellCommand::Intent(intent))) => {
                        dispatch(&mut runtime, &mut input, &mut stdout, intent).await?;
                    }
                    Err(err) => write(&mut stdout, &format!("{err}\n")).await?,
                }
                redraw(&mut stdout, &runtime).await?;
            }
            wake = runtime.step() => {
                debug!(?wake, "board updated");
                redraw(&mut stdout, &runtime).await?;
            }
        }
    }

    Ok(())
}

/// Dispatch an intent, answering any confirmation it raises from stdin.
async fn dispatch(
    runtime: &mut Runtime,
    input: &mut Lines<BufReader<Stdin>>,
    stdout: &mut Stdout,
    intent: Intent,
) -> Result<(), AppError> {
    let mut pending = match runtime.dispatch(intent) {
        Ok(confirmations) => confirmations,
        Err(err) => {
            // The board keeps the error as its notice; the redraw shows it.
            debug!(error = %err, "intent rejected");
            return Ok(());
        }
    };

    while let Some(confirmation) = pending.pop() {
        let answer = ask(input, stdout, &confirmation).await?;
        let reply = if answer {
            Intent::Confirm(confirmation)
        } else {
            Intent::Decline
        };
        match runtime.dispatch(reply) {
            Ok(more) => pending.extend(more),
            Err(err) => debug!(error = %err, "confirmation rejected"),
        }
    }
    Ok(())
}

async fn ask(
    input: &mut Lines<BufReader<Stdin>>,
    stdout: &mut Stdout,
    confirmation: &Confirmation,
) -> Result<bool, AppError> {
    write(stdout, &views::confirmation_prompt(confirmation)).await?;
    let answer = input.next_line().await.map_err(InfraError::from)?;
    Ok(answer.as_deref().is_some_and(commands::is_affirmative))
}

async fn redraw(stdout: &mut Stdout, runtime: &Runtime) -> Result<(), AppError> {
    let board = views::render_board(&runtime.board().snapshot()).map_err(render_failed)?;
    write(stdout, &format!("\n{board}\n> ")).await
}

async fn print(text: &str) -> Result<(), AppError> {
    let mut stdout = tokio::io::stdout();
    write(&mut stdout, text).await?;
    if !text.ends_with('\n') {
        write(&mut stdout, "\n").await?;
    }
    Ok(())
}

async fn write(stdout: &mut Stdout, text: &str) -> Result<(), AppError> {
    stdout
        .write_all(text.as_bytes())
        .await
        .map_err(InfraError::from)?;
    stdout.flush().await.map_err(InfraError::from)?;
    Ok(())
}

fn render_failed(err: TemplateRenderError) -> AppError {
    error!(origin = err.origin(), error = ?err, "template rendering failed");
    AppError::unexpected(err.to_string())
}
