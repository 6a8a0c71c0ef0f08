// Path: crates/client/src/algod/mod.rs
//! HTTP client for the node's v2 REST API.
//!
//! Idempotent requests are retried with backoff on transport failures, 429 and
//! 5xx responses. Transaction submission is never retried.

pub mod models;

use crate::error::ClientError;
use crate::ledger::{LedgerRead, LedgerWrite, ProgramCompiler, Simulator};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use koa_types::app::{Address, RawKeyValue, SuggestedParams};
use koa_types::codec;
use koa_types::config::AlgodConfig;
use koa_types::error::SubmissionError;
use models::{
    AccountApplicationInformation, AccountInformation, CompileResponse, ErrorResponse, NodeStatus,
    PendingTransaction, PostTransactionsResponse, SimulateRequest, SimulateResponse,
    TransactionParams,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, RETRY_AFTER, USER_AGENT},
    Client, RequestBuilder, StatusCode,
};
use serde::de::DeserializeOwned;
use tokio::time::{sleep, Duration};

/// Header carrying the node's API token.
pub const API_TOKEN_HEADER: &str = "x-algo-api-token";

const HTTP_RETRIES: usize = 5;
const BASE_BACKOFF_MS: u64 = 100;
const MAX_BACKOFF_MS: u64 = 2_000;

fn retry_delay(attempt: usize, retry_after: Option<&HeaderValue>) -> Duration {
    if let Some(secs) = retry_after
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
    {
        return Duration::from_secs(secs.min(5));
    }
    let shift = u32::try_from(attempt).unwrap_or(u32::MAX).min(16);
    let ms = BASE_BACKOFF_MS.saturating_mul(1u64 << shift).min(MAX_BACKOFF_MS);
    Duration::from_millis(ms)
}

fn ascii_snippet(bytes: &[u8]) -> String {
    let s = String::from_utf8_lossy(bytes);
    let s: String = s.trim().chars().take(160).collect();
    s.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| ascii_snippet(body))
}

#[derive(Clone)]
pub struct AlgodClient {
    base: String,
    client: Client,
    retries: usize,
}

impl std::fmt::Debug for AlgodClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgodClient")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl AlgodClient {
    pub fn new(endpoint: &str, api_token: &str, user_agent: &str) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if !api_token.is_empty() {
            let token = HeaderValue::from_str(api_token)
                .map_err(|e| ClientError::encoding("building client", e))?;
            headers.insert(API_TOKEN_HEADER, token);
        }
        let agent = HeaderValue::from_str(user_agent)
            .map_err(|e| ClientError::encoding("building client", e))?;
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::encoding("building client", e))?;

        Ok(Self {
            base: endpoint.trim_end_matches('/').to_string(),
            client,
            retries: HTTP_RETRIES,
        })
    }

    /// Overrides how many times an idempotent request is retried.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    pub fn from_config(config: &AlgodConfig) -> Result<Self, ClientError> {
        Self::new(&config.endpoint, &config.api_token, &config.user_agent)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Sends a request built by `make`, retrying transient failures.
    async fn execute<F>(&self, context: &str, make: F) -> Result<(StatusCode, Vec<u8>), ClientError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let resp = match make().send().await {
                Ok(r) => r,
                Err(e) if attempt < self.retries => {
                    tracing::debug!(
                        target: "algod",
                        "send error for {} (attempt {}): {}; retrying",
                        context,
                        attempt,
                        e
                    );
                    sleep(retry_delay(attempt, None)).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(ClientError::transport(context, e)),
            };

            let status = resp.status();
            let retry_after = resp.headers().get(RETRY_AFTER).cloned();
            let body = resp
                .bytes()
                .await
                .map_err(|e| ClientError::transport(context, e))?
                .to_vec();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                if attempt < self.retries {
                    let delay = retry_delay(attempt, retry_after.as_ref());
                    tracing::debug!(
                        target: "algod",
                        "HTTP {} for {}; backoff {:?}; body='{}'",
                        status.as_u16(),
                        context,
                        delay,
                        ascii_snippet(&body)
                    );
                    sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(ClientError::Http {
                    context: context.to_string(),
                    status: status.as_u16(),
                    body: ascii_snippet(&body),
                });
            }
            break Ok((status, body));
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, context: &str, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        let (status, body) = self.execute(context, || self.client.get(&url)).await?;
        Self::parse_json(context, status, &body)
    }

    fn parse_json<T: DeserializeOwned>(
        context: &str,
        status: StatusCode,
        body: &[u8],
    ) -> Result<T, ClientError> {
        if !status.is_success() {
            return Err(ClientError::Http {
                context: context.to_string(),
                status: status.as_u16(),
                body: error_message(body),
            });
        }
        serde_json::from_slice(body).map_err(|e| {
            ClientError::transport(
                context,
                format!("unexpected body ({}): '{}'", e, ascii_snippet(body)),
            )
        })
    }

    pub async fn account_information(
        &self,
        address: &Address,
    ) -> Result<AccountInformation, ClientError> {
        self.get_json("account information", &format!("/v2/accounts/{}", address))
            .await
    }
}

#[async_trait]
impl LedgerRead for AlgodClient {
    async fn suggested_params(&self) -> Result<SuggestedParams, ClientError> {
        let params: TransactionParams = self
            .get_json("suggested params", "/v2/transactions/params")
            .await?;
        Ok(params.into())
    }

    async fn read_contract_key_values(
        &self,
        address: &Address,
        app_id: u64,
    ) -> Result<Vec<RawKeyValue>, ClientError> {
        let info: AccountApplicationInformation = self
            .get_json(
                "account application information",
                &format!("/v2/accounts/{}/applications/{}", address, app_id),
            )
            .await?;
        match info.created_app {
            Some(app) => Ok(app.global_state),
            None => Err(ClientError::Http {
                context: "account application information".to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
                body: format!("application {} was not created by {}", app_id, address),
            }),
        }
    }

    async fn account_balance(&self, address: &Address) -> Result<u64, ClientError> {
        Ok(self.account_information(address).await?.amount)
    }
}

#[async_trait]
impl LedgerWrite for AlgodClient {
    async fn submit(&self, signed: &[u8]) -> Result<String, ClientError> {
        let url = self.url("/v2/transactions");
        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/x-binary")
            .body(signed.to_vec())
            .send()
            .await
            .map_err(|e| ClientError::transport("submit", e))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ClientError::transport("submit", e))?;

        if status == StatusCode::BAD_REQUEST {
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            }
            .into());
        }
        let posted: PostTransactionsResponse = Self::parse_json("submit", status, &body)?;
        tracing::info!(target: "algod", tx_id = %posted.tx_id, bytes = signed.len(), "submitted");
        Ok(posted.tx_id)
    }

    async fn status(&self) -> Result<NodeStatus, ClientError> {
        self.get_json("status", "/v2/status").await
    }

    async fn wait_for_block_after(&self, round: u64) -> Result<NodeStatus, ClientError> {
        self.get_json(
            "wait for block",
            &format!("/v2/status/wait-for-block-after/{}", round),
        )
        .await
    }

    async fn pending_transaction(&self, tx_id: &str) -> Result<PendingTransaction, ClientError> {
        self.get_json(
            "pending transaction",
            &format!("/v2/transactions/pending/{}?format=json", tx_id),
        )
        .await
    }
}

#[async_trait]
impl Simulator for AlgodClient {
    async fn simulate(&self, request: &SimulateRequest) -> Result<SimulateResponse, ClientError> {
        let body = codec::to_bytes_canonical(request)
            .map_err(|e| ClientError::encoding("encoding simulate request", e))?;
        let url = self.url("/v2/transactions/simulate?format=json");
        let (status, resp) = self
            .execute("simulate", || {
                self.client
                    .post(&url)
                    .header(CONTENT_TYPE, "application/msgpack")
                    .body(body.clone())
            })
            .await?;
        Self::parse_json("simulate", status, &resp)
    }
}

#[async_trait]
impl ProgramCompiler for AlgodClient {
    async fn compile(&self, source: &[u8]) -> Result<Vec<u8>, ClientError> {
        let url = self.url("/v2/teal/compile");
        let (status, body) = self
            .execute("compile", || {
                self.client
                    .post(&url)
                    .header(CONTENT_TYPE, "application/x-binary")
                    .body(source.to_vec())
            })
            .await?;
        let compiled: CompileResponse = Self::parse_json("compile", status, &body)?;
        log::debug!("compiled program {}", compiled.hash);
        B64.decode(compiled.result.as_bytes())
            .map_err(|e| ClientError::transport("compile", format!("bad program encoding: {}", e)))
    }
}

#[cfg(test)]
mod tests;
