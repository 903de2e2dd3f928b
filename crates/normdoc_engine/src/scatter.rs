use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Result of one fan-out/fan-in round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome<T> {
    pub completed: Vec<T>,
    pub failed: usize,
    pub skipped: usize,
    pub dispatched: usize,
}

enum UnitOutcome<T, E> {
    Done(T),
    Failed(E),
    Skipped,
}

/// Dispatches one unit of work per item and joins exactly once after every
/// unit has completed, failed, or been skipped.
///
/// The cancel token is re-read at each unit's entry: a unit already running
/// finishes, but no unit starts once cancellation is observed. Failed units
/// are dropped from the joined result set; a single bad unit never blocks
/// its siblings.
pub async fn fan_out_join<I, T, E, F, Fut>(
    cancel: &CancellationToken,
    items: I,
    work: F,
) -> JoinOutcome<T>
where
    I: IntoIterator,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let mut handles = Vec::new();
    for item in items {
        let unit = work(item);
        let cancel = cancel.clone();
        handles.push(tokio::spawn(async move {
            if cancel.is_cancelled() {
                return UnitOutcome::Skipped;
            }
            match unit.await {
                Ok(value) => UnitOutcome::Done(value),
                Err(err) => UnitOutcome::Failed(err),
            }
        }));
    }

    let dispatched = handles.len();
    let mut outcome = JoinOutcome {
        completed: Vec::with_capacity(dispatched),
        failed: 0,
        skipped: 0,
        dispatched,
    };
    for handle in handles {
        match handle.await {
            Ok(UnitOutcome::Done(value)) => outcome.completed.push(value),
            Ok(UnitOutcome::Failed(err)) => {
                harvest_logging::harvest_warn!("unit of work failed: {err}");
                outcome.failed += 1;
            }
            Ok(UnitOutcome::Skipped) => outcome.skipped += 1,
            Err(join_err) => {
                harvest_logging::harvest_error!("unit of work panicked: {join_err}");
                outcome.failed += 1;
            }
        }
    }
    outcome
}
