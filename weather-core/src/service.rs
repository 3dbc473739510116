use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    model::{ComparisonQuery, ComparisonResult, Credential, SessionToken},
};

pub mod jellyfaas;

pub use jellyfaas::JellyFaasClient;

/// Exchanges a static credential for a session token.
#[async_trait]
pub trait Authenticator: Send + Sync + Debug {
    async fn authenticate(&self, credential: &Credential) -> Result<SessionToken>;
}

/// Asks the remote function to compare the weather of two cities.
#[async_trait]
pub trait Comparator: Send + Sync + Debug {
    async fn compare(
        &self,
        token: &SessionToken,
        query: &ComparisonQuery,
    ) -> Result<ComparisonResult>;
}
