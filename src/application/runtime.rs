//! Drives a [`Board`] against a [`PostsRemote`].
//!
//! Requests run as spawned tasks and report back over a channel, so their
//! completions may arrive in any order; the board's recency tokens sort that
//! out. The runtime also sleeps until the debounced query is due.

use std::future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

use crate::application::board::{Board, CompletionOutcome};
use crate::application::error::AppError;
use crate::application::intent::{Completion, Confirmation, Effect, Intent, Request};
use crate::application::remote::PostsRemote;

/// Something the runtime reacted to while waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Completed(CompletionOutcome),
    /// The debounced query fired.
    QueryFired,
}

pub struct Runtime {
    board: Board,
    remote: Arc<dyn PostsRemote>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl Runtime {
    pub fn new(board: Board, remote: Arc<dyn PostsRemote>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            board,
            remote,
            completions_tx,
            completions_rx,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Dispatch an intent, start its requests, and return the questions the
    /// user must answer before it can go further.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Vec<Confirmation>, AppError> {
        let effects = self.board.dispatch(intent, Instant::now())?;
        Ok(self.run(effects))
    }

    fn run(&self, effects: Vec<Effect>) -> Vec<Confirmation> {
        let mut confirmations = Vec::new();
        for effect in effects {
            match effect {
                Effect::Request(request) => self.spawn(request),
                Effect::Confirm(confirmation) => confirmations.push(confirmation),
            }
        }
        confirmations
    }

    fn spawn(&self, request: Request) {
        let remote = Arc::clone(&self.remote);
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let Request { token, call } = request;
            let outcome = call.execute(remote.as_ref()).await;
            if tx.send(Completion { token, outcome }).is_err() {
                debug!(token = token.get(), "runtime dropped before completion");
            }
        });
    }

    /// Wait for the next completion or debounce deadline and apply it.
    ///
    /// Cancel-safe: nothing is applied unless the wait finished.
    pub async fn step(&mut self) -> Wake {
        let deadline = self.board.next_deadline();
        tokio::select! {
            Some(completion) = self.completions_rx.recv() => {
                Wake::Completed(self.board.complete(completion))
            }
            () = sleep_until_opt(deadline) => {
                let effects = self.board.poll(Instant::now());
                self.run(effects);
                Wake::QueryFired
            }
        }
    }

    /// Step until nothing is in flight and no query is waiting, returning
    /// every wake along the way.
    pub async fn settle(&mut self) -> Vec<Wake> {
        let mut wakes = Vec::new();
        while !self.board.is_settled() {
            wakes.push(self.step().await);
        }
        wakes
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}
