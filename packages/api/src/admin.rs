//! Admin server functions for queue introspection.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use ticket_core::QueueSnapshot;

/// Per-queue job counts, keyed by the queue's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStatsResponse {
    pub name: String,
    pub waiting: u64,
    pub active: u64,
    pub completed: u64,
    pub failed: u64,
    pub delayed: u64,
    pub paused: u64,
}

/// Get job counts for a named queue.
#[get("/api/admin/queues/:name/stats")]
pub async fn queue_stats(name: String) -> Result<QueueStatsResponse, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use queue::SupervisorMessage;

        let state = crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {e}")))?;

        let (tx, rx) = queue::concurrency::oneshot();
        state
            .supervisor
            .send_message(SupervisorMessage::GetCounts {
                queue: name.clone(),
                reply: tx.into(),
            })
            .map_err(|e| ServerFnError::new(format!("Failed to send message: {e}")))?;

        let counts = rx
            .await
            .map_err(|_| ServerFnError::new("Failed to receive response"))?
            .map_err(ServerFnError::new)?;

        Ok(QueueStatsResponse {
            name,
            waiting: counts.waiting,
            active: counts.active,
            completed: counts.completed,
            failed: counts.failed,
            delayed: counts.delayed,
            paused: counts.paused,
        })
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = name;
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Snapshot all queues for the admin dashboard.
#[get("/api/admin/queues")]
pub async fn list_queue_stats() -> Result<Vec<QueueSnapshot>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use queue::SupervisorMessage;

        let state = crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {e}")))?;

        let (tx, rx) = queue::concurrency::oneshot();
        state
            .supervisor
            .send_message(SupervisorMessage::ListQueues { reply: tx.into() })
            .map_err(|e| ServerFnError::new(format!("Failed to send message: {e}")))?;

        rx.await
            .map_err(|_| ServerFnError::new("Failed to receive response"))
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Pause a queue: workers stop pulling, enqueueing stays allowed.
#[post("/api/admin/queues/:name/pause")]
pub async fn pause_queue(name: String) -> Result<(), ServerFnError> {
    #[cfg(feature = "server")]
    {
        use queue::SupervisorMessage;

        let state = crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {e}")))?;

        let (tx, rx) = queue::concurrency::oneshot();
        state
            .supervisor
            .send_message(SupervisorMessage::PauseQueue {
                queue: name,
                reply: tx.into(),
            })
            .map_err(|e| ServerFnError::new(format!("Failed to send message: {e}")))?;

        rx.await
            .map_err(|_| ServerFnError::new("Failed to receive response"))?
            .map_err(ServerFnError::new)
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = name;
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Resume a paused queue.
#[post("/api/admin/queues/:name/resume")]
pub async fn resume_queue(name: String) -> Result<(), ServerFnError> {
    #[cfg(feature = "server")]
    {
        use queue::SupervisorMessage;

        let state = crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {e}")))?;

        let (tx, rx) = queue::concurrency::oneshot();
        state
            .supervisor
            .send_message(SupervisorMessage::ResumeQueue {
                queue: name,
                reply: tx.into(),
            })
            .map_err(|e| ServerFnError::new(format!("Failed to send message: {e}")))?;

        rx.await
            .map_err(|_| ServerFnError::new("Failed to receive response"))?
            .map_err(ServerFnError::new)
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = name;
        Err(ServerFnError::new("Server-only function"))
    }
}
