//! Sequential job queue.
//!
//! [`JobQueue::enqueue`] appends jobs and starts a drain task if none is
//! running. The drain task takes jobs strictly first-in first-out, runs
//! the pipeline once per job, and exits when the queue is empty.
//!
//! The pending jobs and the `draining` flag share one mutex. Popping the
//! last job and clearing the flag happen under the same lock, so an
//! enqueue either lands before the drain task sees an empty queue or
//! finds the flag cleared and starts a new task. At most one drain task
//! exists at any time.

use std::collections::VecDeque;
use std::sync::Arc;

use brainrot_client::PipelineBackend;
use brainrot_core::error::CoreError;
use brainrot_core::job::{job_id, validate_enqueue_count, Job, JobStatus};
use brainrot_core::types::JobId;
use tokio::sync::{watch, Mutex};

use crate::events::{PanelBus, PanelEvent};
use crate::form::SharedForm;
use crate::results::ResultViewer;

/// Point-in-time view of the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
    /// Jobs waiting to run, oldest first.
    pub pending: Vec<Job>,
    /// The job being run right now.
    pub active: Option<Job>,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Job>,
    active: Option<Job>,
    draining: bool,
    next_seq: u64,
}

impl QueueState {
    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            pending: self.pending.iter().cloned().collect(),
            active: self.active.clone(),
        }
    }
}

struct QueueInner {
    state: Mutex<QueueState>,
    /// Mirrors `QueueState::draining` for waiters.
    draining_tx: watch::Sender<bool>,
    backend: Arc<dyn PipelineBackend>,
    form: SharedForm,
    viewer: Arc<ResultViewer>,
    bus: Arc<PanelBus>,
}

impl QueueInner {
    fn publish_snapshot(&self, state: &QueueState) {
        let snapshot = state.snapshot();
        self.bus.publish(PanelEvent::QueueChanged {
            pending: snapshot.pending,
            active: snapshot.active,
        });
    }

    fn publish_status(&self, job: &Job) {
        self.bus.publish(PanelEvent::JobStatusChanged {
            id: job.id.clone(),
            status: job.status,
        });
    }
}

/// Handle to the job queue. Cheap to clone.
#[derive(Clone)]
pub struct JobQueue {
    inner: Arc<QueueInner>,
}

impl JobQueue {
    pub fn new(
        backend: Arc<dyn PipelineBackend>,
        form: SharedForm,
        viewer: Arc<ResultViewer>,
        bus: Arc<PanelBus>,
    ) -> Self {
        let (draining_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState::default()),
                draining_tx,
                backend,
                form,
                viewer,
                bus,
            }),
        }
    }

    /// Append `count` queued jobs and make sure a drain task is running.
    ///
    /// Returns the ids of the new jobs in queue order.
    pub async fn enqueue(&self, count: u32) -> Result<Vec<JobId>, CoreError> {
        validate_enqueue_count(count)?;

        let (ids, start_drain) = {
            let mut state = self.inner.state.lock().await;
            let now = chrono::Utc::now();
            let mut ids = Vec::new();

            for _ in 0..count {
                let job = Job::queued(job_id(now, state.next_seq));
                state.next_seq += 1;
                self.inner.publish_status(&job);
                ids.push(job.id.clone());
                state.pending.push_back(job);
            }
            self.inner.publish_snapshot(&state);

            let start_drain = !state.draining;
            if start_drain {
                state.draining = true;
                self.inner.draining_tx.send_replace(true);
            }
            (ids, start_drain)
        };

        tracing::info!(count, pending_ids = ?ids, "Jobs enqueued");

        if start_drain {
            tokio::spawn(drain(Arc::clone(&self.inner)));
        }
        Ok(ids)
    }

    pub async fn snapshot(&self) -> QueueSnapshot {
        self.inner.state.lock().await.snapshot()
    }

    pub async fn is_draining(&self) -> bool {
        self.inner.state.lock().await.draining
    }

    /// Wait until no drain task is running.
    pub async fn wait_idle(&self) {
        let mut rx = self.inner.draining_tx.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|draining| !*draining).await;
    }
}

/// Run queued jobs one at a time until the queue is empty.
async fn drain(inner: Arc<QueueInner>) {
    tracing::debug!("Drain task started");

    loop {
        let mut job = {
            let mut state = inner.state.lock().await;
            let Some(mut job) = state.pending.pop_front() else {
                state.draining = false;
                state.active = None;
                inner.draining_tx.send_replace(false);
                break;
            };
            if let Err(e) = job.transition(JobStatus::Running) {
                tracing::error!(job_id = %job.id, error = %e, "Dequeued job was not queued");
            }
            state.active = Some(job.clone());
            inner.publish_status(&job);
            inner.publish_snapshot(&state);
            job
        };

        let request = inner.form.read().await.run_request();
        tracing::info!(job_id = %job.id, "Running pipeline");

        let outcome = match inner.backend.run_pipeline(&request).await {
            Ok(report) => {
                tracing::info!(
                    job_id = %job.id,
                    pipeline_id = report.pipeline_id.as_deref().unwrap_or("-"),
                    overall_status = report.overall_status.as_deref().unwrap_or("-"),
                    "Pipeline run finished",
                );
                for (step, step_report) in &report.steps {
                    if let Some(error) = &step_report.error {
                        tracing::warn!(
                            job_id = %job.id,
                            step = %step,
                            status = %step_report.status,
                            error = %error,
                            "Pipeline step reported an error",
                        );
                    } else {
                        tracing::debug!(
                            job_id = %job.id,
                            step = %step,
                            status = %step_report.status,
                            "Pipeline step",
                        );
                    }
                }
                JobStatus::Done
            }
            Err(e) => {
                tracing::error!(job_id = %job.id, error = %e, "Pipeline run failed");
                JobStatus::Failed
            }
        };

        {
            let mut state = inner.state.lock().await;
            if let Err(e) = job.transition(outcome) {
                tracing::error!(job_id = %job.id, error = %e, "Running job could not be finished");
            }
            state.active = None;
            inner.publish_status(&job);
            inner.publish_snapshot(&state);
        }

        if outcome == JobStatus::Done {
            inner.viewer.refresh().await;
        }
    }

    tracing::debug!("Drain task finished, queue empty");
}
