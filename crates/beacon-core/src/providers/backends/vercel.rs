//! Vercel REST adapter.

use async_trait::async_trait;
use beacon_config::{AccountConfig, ProviderKind};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::deployments::UnifiedDeployment;
use crate::providers::errors::{MappingError, ProviderError};
use crate::providers::traits::ProviderAdapter;
use crate::providers::{check_status, decode_failed, logs, request_failed, require_token};
use crate::status::normalize;

const PROVIDER: &str = "Vercel";

#[derive(Debug, Deserialize)]
struct DeploymentsPage {
    #[serde(default)]
    deployments: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VercelDeployment {
    uid: Option<String>,
    name: Option<String>,
    url: Option<String>,
    state: Option<String>,
    ready_state: Option<String>,
    created_at: Option<i64>,
    created: Option<i64>,
    #[serde(default)]
    meta: VercelMeta,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VercelMeta {
    github_commit_message: Option<String>,
    github_commit_ref: Option<String>,
}

/// Vercel adapter: `GET /v6/deployments` with bearer auth, optional team scope.
pub struct VercelAdapter {
    client: reqwest::Client,
}

impl VercelAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProviderAdapter for VercelAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Vercel
    }

    async fn fetch(
        &self,
        account: &AccountConfig,
        window: usize,
    ) -> Result<Vec<UnifiedDeployment>, ProviderError> {
        let token = require_token(account)?;
        let url = format!("{}/v6/deployments", account.api_base());

        let mut query = vec![("limit", window.to_string())];
        if let Some(team_id) = &account.team_id {
            query.push(("teamId", team_id.clone()));
        }

        debug!(
            event = "core.provider.vercel.fetch_started",
            account = %account.id,
            window = window
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await
            .map_err(|e| request_failed(PROVIDER, e))?;
        let page: DeploymentsPage = check_status(PROVIDER, response)
            .await?
            .json()
            .await
            .map_err(|e| decode_failed(PROVIDER, e))?;

        let total = page.deployments.len();
        let deployments: Vec<UnifiedDeployment> = page
            .deployments
            .into_iter()
            .filter_map(|record| match map_record(record, account) {
                Ok(deployment) => Some(deployment),
                Err(e) => {
                    warn!(
                        event = "core.provider.vercel.record_skipped",
                        account = %account.id,
                        error = %e
                    );
                    None
                }
            })
            .collect();

        info!(
            event = "core.provider.vercel.fetch_completed",
            account = %account.id,
            received = total,
            mapped = deployments.len()
        );

        Ok(deployments)
    }

    async fn fetch_error_logs_text(
        &self,
        account: &AccountConfig,
        deployment_id: &str,
    ) -> Result<String, ProviderError> {
        let token = require_token(account)?;
        let url = format!(
            "{}/v3/deployments/{}/events",
            account.api_base(),
            deployment_id
        );

        let mut query = vec![("build", "1".to_string())];
        if let Some(team_id) = &account.team_id {
            query.push(("teamId", team_id.clone()));
        }

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await
            .map_err(|e| request_failed(PROVIDER, e))?;
        let body = check_status(PROVIDER, response)
            .await?
            .text()
            .await
            .map_err(|e| decode_failed(PROVIDER, e))?;

        let lines = logs::vercel_event_lines(&body);
        let errors: Vec<String> = lines
            .iter()
            .filter(|line| logs::is_error_line(line))
            .cloned()
            .collect();

        Ok(logs::error_text(&lines, &errors))
    }
}

/// Map one raw Vercel deployment record.
fn map_record(
    record: serde_json::Value,
    account: &AccountConfig,
) -> Result<UnifiedDeployment, MappingError> {
    let raw: VercelDeployment =
        serde_json::from_value(record).map_err(|e| MappingError::Malformed {
            message: e.to_string(),
        })?;

    let id = raw
        .uid
        .filter(|uid| !uid.is_empty())
        .ok_or(MappingError::MissingField { field: "uid" })?;
    let name = raw.name.ok_or(MappingError::MissingField { field: "name" })?;
    let status = raw
        .state
        .or(raw.ready_state)
        .unwrap_or_else(|| "UNKNOWN".to_string());

    Ok(UnifiedDeployment {
        canonical_status: normalize(&status, ProviderKind::Vercel),
        id,
        provider: ProviderKind::Vercel,
        name,
        url: raw.url.filter(|u| !u.is_empty()),
        status,
        created_at: raw.created_at.or(raw.created),
        commit_message: raw.meta.github_commit_message,
        branch: raw.meta.github_commit_ref,
        project_id: None,
        service_id: None,
        team_slug: account.team_slug.clone(),
        account_id: account.id.clone(),
    })
}
