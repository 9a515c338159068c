//! Background insight runner
//!
//! Runs one strategic analysis at a time on a worker thread so the session
//! stays responsive. The worker only ever sees an owned snapshot of the
//! requests; it has no handle on any repository.

use crate::ai::client::{AiError, InsightProvider};
use crate::ai::responses::AiInsight;
use crate::models::RequestItem;
use log::{info, warn};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Status of the most recent analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisStatus {
    /// Nothing requested yet
    Idle,
    /// Waiting on the provider
    Running,
    /// Latest analysis succeeded
    Ready,
    /// Latest analysis failed
    Failed(String),
}

pub struct InsightRunner {
    provider: Arc<dyn InsightProvider>,
    result_rx: Option<Receiver<Result<AiInsight, AiError>>>,
    status: AnalysisStatus,
    latest: Option<AiInsight>,
}

impl InsightRunner {
    pub fn new(provider: Arc<dyn InsightProvider>) -> Self {
        Self {
            provider,
            result_rx: None,
            status: AnalysisStatus::Idle,
            latest: None,
        }
    }

    pub fn status(&self) -> &AnalysisStatus {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.result_rx.is_some()
    }

    /// The last successful insight, kept across later failures
    pub fn latest(&self) -> Option<&AiInsight> {
        self.latest.as_ref()
    }

    /// Starts an analysis of the snapshot; refused while one is in flight
    pub fn start(&mut self, snapshot: Vec<RequestItem>) -> Result<(), AiError> {
        if self.is_running() {
            return Err(AiError::Busy);
        }

        let (result_tx, result_rx) = mpsc::channel();
        let provider = Arc::clone(&self.provider);
        info!("Starting strategic analysis of {} requests", snapshot.len());

        thread::spawn(move || {
            let result = provider.strategic_insights(&snapshot);
            // Receiver may be gone if the runner was dropped
            let _ = result_tx.send(result);
        });

        self.result_rx = Some(result_rx);
        self.status = AnalysisStatus::Running;
        Ok(())
    }

    /// Collects a finished result without blocking
    pub fn poll(&mut self) -> &AnalysisStatus {
        let outcome = match &self.result_rx {
            Some(rx) => match rx.try_recv() {
                Ok(result) => Some(result),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Err(AiError::CliExecFailed(
                    "analysis worker stopped unexpectedly".to_string(),
                ))),
            },
            None => None,
        };
        if let Some(result) = outcome {
            self.finish(result);
        }
        &self.status
    }

    /// Blocks until the in-flight analysis, if any, completes
    pub fn wait(&mut self) -> &AnalysisStatus {
        if let Some(rx) = &self.result_rx {
            let result = rx.recv().unwrap_or_else(|_| {
                Err(AiError::CliExecFailed(
                    "analysis worker stopped unexpectedly".to_string(),
                ))
            });
            self.finish(result);
        }
        &self.status
    }

    fn finish(&mut self, result: Result<AiInsight, AiError>) {
        self.result_rx = None;
        match result {
            Ok(insight) => {
                info!(
                    "Strategic analysis finished: {} recommendations, {} synergy clusters",
                    insight.recommendations.len(),
                    insight.synergies.len()
                );
                self.latest = Some(insight);
                self.status = AnalysisStatus::Ready;
            }
            Err(e) => {
                warn!("Strategic analysis failed: {}", e);
                self.status = AnalysisStatus::Failed(e.to_string());
            }
        }
    }
}
