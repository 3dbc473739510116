use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::{
    config::Endpoints,
    error::{Error, Result, Stage},
    model::{ComparisonQuery, ComparisonResult, Credential, FunctionRequest, SessionToken},
};

use super::{Authenticator, Comparator};

const API_KEY_HEADER: &str = "x-jf-apikey";
const TOKEN_HEADER: &str = "jfwt";

/// HTTP client for the JellyFaaS auth and query services.
#[derive(Debug, Clone)]
pub struct JellyFaasClient {
    endpoints: Endpoints,
    http: Client,
}

impl JellyFaasClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            http: Client::new(),
        }
    }

    /// Single round trip. Returns the body of a 2xx response.
    async fn send(&self, stage: Stage, request: RequestBuilder) -> Result<String> {
        let res = request
            .send()
            .await
            .map_err(|source| Error::Transport { stage, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| Error::Transport { stage, source })?;

        tracing::debug!(%stage, %status, bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(Error::Rejected { stage, status, body });
        }

        Ok(body)
    }
}

fn parse_json(stage: Stage, body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|err| Error::MalformedResponse {
        stage,
        reason: format!("invalid JSON: {err}"),
    })
}

fn extract_token(body: &Value) -> Result<SessionToken> {
    let stage = Stage::Authentication;
    let token = body.get("token").ok_or_else(|| Error::MalformedResponse {
        stage,
        reason: "missing `token` field".into(),
    })?;

    token
        .as_str()
        .and_then(SessionToken::new)
        .ok_or_else(|| Error::MalformedResponse {
            stage,
            reason: "`token` must be a non-empty string".into(),
        })
}

#[async_trait]
impl Authenticator for JellyFaasClient {
    async fn authenticate(&self, credential: &Credential) -> Result<SessionToken> {
        let stage = Stage::Authentication;
        tracing::debug!(url = %self.endpoints.auth_url, "requesting session token");

        let request = self
            .http
            .get(&self.endpoints.auth_url)
            .header(API_KEY_HEADER, credential.expose());

        let body = self.send(stage, request).await?;
        extract_token(&parse_json(stage, &body)?)
    }
}

#[async_trait]
impl Comparator for JellyFaasClient {
    async fn compare(
        &self,
        token: &SessionToken,
        query: &ComparisonQuery,
    ) -> Result<ComparisonResult> {
        let stage = Stage::Comparison;
        tracing::debug!(
            url = %self.endpoints.query_url,
            function = %self.endpoints.function,
            city_a = query.city_a(),
            city_b = query.city_b(),
            "requesting comparison"
        );

        let payload = FunctionRequest {
            query: query.instruction(),
            function: &self.endpoints.function,
        };

        let request = self
            .http
            .post(&self.endpoints.query_url)
            .header(TOKEN_HEADER, token.expose())
            .json(&payload);

        let body = self.send(stage, request).await?;
        Ok(ComparisonResult::new(parse_json(stage, &body)?))
    }
}
