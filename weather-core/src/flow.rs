//! Authenticate, then compare. The two calls run strictly in sequence and
//! any error ends the run.

use std::{pin::pin, time::Duration};

use crate::{
    error::Result,
    model::{ComparisonQuery, ComparisonResult, Credential},
    service::{Authenticator, Comparator},
};

/// How often the progress sink is ticked while the comparison is pending.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Start,
    Authenticating,
    Authenticated,
    Comparing,
    Done,
    Failed,
}

impl FlowState {
    fn can_advance_to(&self, next: FlowState) -> bool {
        use FlowState::*;
        matches!(
            (self, next),
            (Start, Authenticating)
                | (Authenticating, Authenticated)
                | (Authenticating, Failed)
                | (Authenticated, Comparing)
                | (Comparing, Done)
                | (Comparing, Failed)
        )
    }
}

/// Receives updates while the comparison request is in flight.
pub trait Progress {
    fn start(&mut self, message: &str);
    fn tick(&mut self);
    fn finish(&mut self);
}

/// Progress sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&mut self, _message: &str) {}
    fn tick(&mut self) {}
    fn finish(&mut self) {}
}

/// One run of the comparison. Borrowed collaborators, no shared state.
#[derive(Debug)]
pub struct ComparisonFlow<'a, A: ?Sized, C: ?Sized> {
    authenticator: &'a A,
    comparator: &'a C,
    state: FlowState,
}

impl<'a, A, C> ComparisonFlow<'a, A, C>
where
    A: Authenticator + ?Sized,
    C: Comparator + ?Sized,
{
    pub fn new(authenticator: &'a A, comparator: &'a C) -> Self {
        Self {
            authenticator,
            comparator,
            state: FlowState::Start,
        }
    }

    fn advance(&mut self, next: FlowState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!(from = ?self.state, to = ?next, "flow transition");
        self.state = next;
    }

    /// Drives the flow to `Done` or `Failed`. Consumes the flow so no state
    /// is ever re-entered.
    pub async fn run(
        mut self,
        credential: &Credential,
        query: &ComparisonQuery,
        progress: &mut dyn Progress,
    ) -> Result<ComparisonResult> {
        self.advance(FlowState::Authenticating);
        let token = match self.authenticator.authenticate(credential).await {
            Ok(token) => token,
            Err(err) => {
                self.advance(FlowState::Failed);
                tracing::info!(error = %err, "authentication failed");
                return Err(err);
            }
        };
        self.advance(FlowState::Authenticated);

        self.advance(FlowState::Comparing);
        progress.start(&format!(
            "Fetching weather comparison for {} and {}...",
            query.city_a(),
            query.city_b()
        ));

        let outcome = {
            let mut request = pin!(self.comparator.compare(&token, query));
            let mut ticker = tokio::time::interval(PROGRESS_INTERVAL);
            loop {
                tokio::select! {
                    outcome = &mut request => break outcome,
                    _ = ticker.tick() => progress.tick(),
                }
            }
        };
        progress.finish();

        match outcome {
            Ok(result) => {
                self.advance(FlowState::Done);
                Ok(result)
            }
            Err(err) => {
                self.advance(FlowState::Failed);
                tracing::info!(error = %err, "comparison failed");
                Err(err)
            }
        }
    }
}

/// Authenticate with `credential`, then compare the two cities.
pub async fn compare_cities<A, C>(
    authenticator: &A,
    comparator: &C,
    credential: &Credential,
    query: &ComparisonQuery,
    progress: &mut dyn Progress,
) -> Result<ComparisonResult>
where
    A: Authenticator + ?Sized,
    C: Comparator + ?Sized,
{
    ComparisonFlow::new(authenticator, comparator)
        .run(credential, query, progress)
        .await
}
