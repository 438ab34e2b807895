//! Batch driver: documents are processed on blocking workers, at most `jobs` at a time, and
//! their results merged once every document has finished.

use std::path::PathBuf;
use std::sync::Arc;

use tally_core::Ledger;
use tally_finance::{StatementOutcome, StatementProcessor};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

#[derive(Debug, Default)]
pub struct Batch {
    /// Completed documents, in input order
    pub documents: Vec<StatementOutcome>,
    /// Documents that could not be opened
    pub failed: usize,
    /// Ctrl-C arrived; in-flight documents were discarded
    pub interrupted: bool,
}

impl Batch {
    pub fn ledger(&self) -> Ledger {
        Ledger::from_documents(self.documents.iter().map(|d| d.transactions.clone()))
    }

    pub fn log_summary(&self, ledger: &Ledger) {
        let skipped = self
            .documents
            .iter()
            .filter(|d| d.report.institution.is_none())
            .count();
        let extracted: usize = self.documents.iter().map(|d| d.report.transactions).sum();
        let (money_in, money_out) = ledger.totals();
        info!(
            documents = self.documents.len(),
            skipped,
            failed = self.failed,
            extracted,
            ledger = ledger.len(),
            duplicates = extracted - ledger.len(),
            %money_in,
            %money_out,
            "batch finished"
        );
    }
}

pub async fn process_all(processor: Arc<StatementProcessor>, files: Vec<PathBuf>, jobs: usize) -> Batch {
    let jobs = jobs.max(1);
    let mut pending = files.into_iter().enumerate();
    let mut workers = JoinSet::new();
    let mut done = Vec::new();
    let mut batch = Batch::default();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut watch_ctrl_c = true;

    loop {
        while workers.len() < jobs {
            let Some((index, path)) = pending.next() else { break };
            let processor = Arc::clone(&processor);
            workers.spawn_blocking(move || {
                let result = processor.process_path(&path);
                (index, path, result)
            });
        }

        tokio::select! {
            joined = workers.join_next() => match joined {
                None => break,
                Some(Ok((index, _, Ok(outcome)))) => done.push((index, outcome)),
                Some(Ok((_, path, Err(e)))) => {
                    let reason = format!("{e:#}");
                    warn!(file = %path.display(), error = %reason, "skipping document");
                    batch.failed += 1;
                }
                Some(Err(e)) => {
                    error!(error = %e, "document worker failed");
                    batch.failed += 1;
                }
            },
            signal = &mut ctrl_c, if watch_ctrl_c => match signal {
                Ok(()) => {
                    warn!(in_flight = workers.len(), "interrupted, discarding unfinished documents");
                    workers.abort_all();
                    batch.interrupted = true;
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "cannot listen for Ctrl-C");
                    watch_ctrl_c = false;
                }
            },
        }
    }

    done.sort_by_key(|(index, _)| *index);
    batch.documents = done.into_iter().map(|(_, outcome)| outcome).collect();
    batch
}
