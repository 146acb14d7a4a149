//! Units of work handed to workers

use crate::request::ProbeRequest;
use crate::traits::Requester;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::sync::Arc;

/// Job identifier, unique per submission
pub type JobId = u64;

/// Deferred work bound to a job, run once with the shared requester
pub type Task = Box<dyn FnOnce(Arc<dyn Requester>) -> BoxFuture<'static, JobOutcome> + Send>;

/// How a job ended, as seen by the worker that ran it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The task produced a result
    Succeeded,
    /// The task produced a failure
    Failed,
}

/// One submitted unit of work
///
/// Executing consumes the job, so it can run at most once.
pub struct Job {
    id: JobId,
    task: Task,
}

impl Job {
    /// Probe job for `request`
    ///
    /// Invokes the requester once. Failures are logged with the job id; the
    /// requester's observer sees every outcome.
    pub fn new(id: JobId, request: ProbeRequest) -> Self {
        Self::from_task(id, move |requester: Arc<dyn Requester>| {
            async move {
                match requester.invoke(&request).await {
                    Ok(_) => JobOutcome::Succeeded,
                    Err(failure) => {
                        tracing::warn!(
                            job_id = id,
                            target = %request,
                            status = failure.response.status,
                            error = %failure.error,
                            "Probe failed"
                        );
                        JobOutcome::Failed
                    }
                }
            }
            .boxed()
        })
    }

    /// Wrap an arbitrary task
    pub fn from_task<F>(id: JobId, task: F) -> Self
    where
        F: FnOnce(Arc<dyn Requester>) -> BoxFuture<'static, JobOutcome> + Send + 'static,
    {
        Self {
            id,
            task: Box::new(task),
        }
    }

    /// Job identifier
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Run the task to completion
    pub async fn execute(self, requester: Arc<dyn Requester>) -> JobOutcome {
        (self.task)(requester).await
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("id", &self.id).finish()
    }
}

/// One probe job per request, with sequential ids starting at zero
pub fn jobs_from_requests<I>(requests: I) -> Vec<Job>
where
    I: IntoIterator<Item = ProbeRequest>,
{
    requests
        .into_iter()
        .enumerate()
        .map(|(index, request)| Job::new(index as JobId, request))
        .collect()
}
