//! Pipeline runner: applies refinement stages in order.
//!
//! The runner's only policy is propagation. The first stage that fails (or
//! that cannot start because the context has already ended) aborts the run
//! and no partial batch is returned.

use crate::context::RequestContext;
use crate::error::RefineError;
use crate::stage::RefineStage;
use crate::types::{Batch, SearchHit};

/// Apply `stages` to `initial` in slice order under one shared context.
///
/// Each stage receives the previous stage's output. `initial` is only
/// borrowed, so the caller's batch is intact whatever happens. With no
/// stages the result is a copy of `initial`.
///
/// # Errors
///
/// Returns [`RefineError::Stage`] naming the stage that failed. A stage whose
/// turn comes after the context was cancelled or passed its deadline fails
/// with [`RefineError::Cancelled`] / [`RefineError::DeadlineExceeded`] as the
/// cause, without being applied.
pub async fn run(
    stages: &[Box<dyn RefineStage>],
    ctx: &RequestContext,
    initial: &[SearchHit],
) -> Result<Batch, RefineError> {
    let Some((first, rest)) = stages.split_first() else {
        return Ok(initial.to_vec());
    };

    let mut batch = apply_stage(first.as_ref(), ctx, initial).await?;
    for stage in rest {
        batch = apply_stage(stage.as_ref(), ctx, &batch).await?;
    }
    Ok(batch)
}

async fn apply_stage(
    stage: &dyn RefineStage,
    ctx: &RequestContext,
    batch: &[SearchHit],
) -> Result<Batch, RefineError> {
    let name = stage.name();
    if let Err(reason) = ctx.check() {
        tracing::warn!(stage = name, error = %reason, "stage not started: context ended");
        return Err(reason.in_stage(name));
    }

    let input_len = batch.len();
    match stage.apply(ctx, batch).await {
        Ok(output) => {
            tracing::debug!(stage = name, input_len, output_len = output.len(), "stage applied");
            Ok(output)
        }
        Err(err) => {
            tracing::warn!(stage = name, error = %err, "stage failed");
            Err(err.in_stage(name))
        }
    }
}
