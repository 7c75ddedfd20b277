use std::future::Future;
use std::time::Duration;

use crate::error::EngineError;

use super::cancel::CancelSignal;

/// Run `work` after a simulated inference latency, bounded by `deadline`.
///
/// The deadline covers latency plus work. Cancellation (or a dropped
/// handle) wins over both, and nothing the work produced is returned.
pub async fn run_envelope<T, F>(
    latency: Duration,
    deadline: Duration,
    mut signal: CancelSignal,
    work: F,
) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, EngineError>>,
{
    if signal.is_cancelled() {
        return Err(EngineError::Cancelled);
    }

    let task = async {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        work.await
    };

    tokio::select! {
        biased;
        () = signal.cancelled() => {
            tracing::debug!("Analysis cancelled before completion");
            Err(EngineError::Cancelled)
        }
        outcome = tokio::time::timeout(deadline, task) => match outcome {
            Ok(result) => result,
            Err(_) => {
                let deadline_ms = deadline.as_millis() as u64;
                tracing::warn!(deadline_ms, "Analysis deadline exceeded");
                Err(EngineError::AnalysisTimeout { deadline_ms })
            }
        },
    }
}
