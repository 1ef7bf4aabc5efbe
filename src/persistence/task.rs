use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use super::{PersistenceError, PersistenceResult};

/// Awaitable result of a storage job
///
/// The job is already queued when the task is created; dropping the task
/// does not cancel it, the result is simply discarded.
#[must_use = "persistence tasks report failures only when awaited"]
pub struct PersistenceTask<T> {
    state: TaskState<T>,
}

enum TaskState<T> {
    Ready(Option<PersistenceResult<T>>),
    Pending(oneshot::Receiver<PersistenceResult<T>>),
}

impl<T> PersistenceTask<T> {
    /// A task that completed without queueing anything
    pub fn ready(result: PersistenceResult<T>) -> Self {
        Self {
            state: TaskState::Ready(Some(result)),
        }
    }

    pub(super) fn pending(receiver: oneshot::Receiver<PersistenceResult<T>>) -> Self {
        Self {
            state: TaskState::Pending(receiver),
        }
    }
}

// Never pin-projects into `T`
impl<T> Unpin for PersistenceTask<T> {}

impl<T> Future for PersistenceTask<T> {
    type Output = PersistenceResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            TaskState::Ready(result) => Poll::Ready(result.take().unwrap_or_else(|| {
                Err(PersistenceError::ChannelClosed(
                    "persistence task polled after completion".to_string(),
                ))
            })),
            TaskState::Pending(receiver) => Pin::new(receiver).poll(cx).map(|received| {
                received.unwrap_or_else(|_| {
                    Err(PersistenceError::ChannelClosed(
                        "storage queue dropped the job".to_string(),
                    ))
                })
            }),
        }
    }
}

impl<T> std::fmt::Debug for PersistenceTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            TaskState::Ready(_) => "ready",
            TaskState::Pending(_) => "pending",
        };
        f.debug_struct("PersistenceTask").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_task_resolves_immediately() {
        let task = PersistenceTask::ready(Ok(7));
        assert_eq!(task.await.expect("ready"), 7);
    }

    #[tokio::test]
    async fn test_pending_task_receives_reply() {
        let (reply, receiver) = oneshot::channel();
        let task = PersistenceTask::pending(receiver);
        reply.send(Ok("saved")).expect("receiver alive");
        assert_eq!(task.await.expect("reply"), "saved");
    }

    #[tokio::test]
    async fn test_dropped_sender_is_channel_closed() {
        let (reply, receiver) = oneshot::channel::<PersistenceResult<()>>();
        let task = PersistenceTask::pending(receiver);
        drop(reply);
        assert!(matches!(task.await, Err(PersistenceError::ChannelClosed(_))));
    }
}
