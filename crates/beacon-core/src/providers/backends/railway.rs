//! Railway GraphQL adapter.
//!
//! Railway has no account-wide deployment listing, so a fetch lists the
//! projects (with their services and environments) and then queries the
//! deployments of every project/environment/service combination.

use async_trait::async_trait;
use beacon_config::{AccountConfig, ProviderKind, TokenType};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::deployments::{UnifiedDeployment, sort_most_recent_first};
use crate::providers::errors::{MappingError, ProviderError};
use crate::providers::traits::ProviderAdapter;
use crate::providers::{check_status, decode_failed, logs, request_failed, require_token};
use crate::status::normalize;

const PROVIDER: &str = "Railway";

/// Projects listed per fetch.
const PROJECT_LIMIT: u32 = 20;

/// Build log lines requested per deployment.
const BUILD_LOG_LIMIT: u32 = 500;

const PROJECTS_QUERY: &str = r#"
query Projects($first: Int!) {
  projects(first: $first) {
    edges {
      node {
        id
        name
        services { edges { node { id name } } }
        environments { edges { node { id name } } }
      }
    }
  }
}
"#;

const DEPLOYMENTS_QUERY: &str = r#"
query Deployments($first: Int!, $input: DeploymentListInput!) {
  deployments(first: $first, input: $input) {
    edges {
      node {
        id
        staticUrl
        status
        createdAt
        meta
      }
    }
  }
}
"#;

const BUILD_LOGS_QUERY: &str = r#"
query BuildLogs($deploymentId: String!, $limit: Int) {
  buildLogs(deploymentId: $deploymentId, limit: $limit) {
    message
    severity
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|e| e.node)
    }
}

#[derive(Debug, Deserialize)]
struct ProjectsData {
    projects: Connection<Project>,
}

#[derive(Debug, Deserialize)]
struct Project {
    id: String,
    name: String,
    services: Connection<Named>,
    environments: Connection<Named>,
}

#[derive(Debug, Clone, Deserialize)]
struct Named {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct DeploymentsData {
    deployments: Connection<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RailwayDeployment {
    id: Option<String>,
    static_url: Option<String>,
    status: Option<String>,
    created_at: Option<String>,
    meta: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildLogsData {
    build_logs: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    message: String,
    severity: Option<String>,
}

/// Where a deployment came from, carried into the unified record.
struct ServiceScope<'a> {
    project: &'a Project,
    service: &'a Named,
    environment: &'a Named,
}

/// Railway adapter: GraphQL over `POST {api_base}`.
///
/// Workspace tokens authenticate with bearer auth, project tokens with the
/// `Project-Access-Token` header.
pub struct RailwayAdapter {
    client: reqwest::Client,
}

impl RailwayAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        account: &AccountConfig,
        token: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ProviderError> {
        let request = self.client.post(account.api_base());
        let request = match account.token_type() {
            TokenType::Workspace => request.bearer_auth(token),
            TokenType::Project => request.header("Project-Access-Token", token),
        };
        let response = request
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| request_failed(PROVIDER, e))?;
        let body: GraphQlResponse<T> = check_status(PROVIDER, response)
            .await?
            .json()
            .await
            .map_err(|e| decode_failed(PROVIDER, e))?;

        if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
            let messages = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ProviderError::GraphQl { messages });
        }

        body.data
            .ok_or_else(|| decode_failed(PROVIDER, "response has no data"))
    }

    async fn fetch_service(
        &self,
        account: &AccountConfig,
        token: &str,
        scope: &ServiceScope<'_>,
        window: usize,
    ) -> Result<Vec<UnifiedDeployment>, ProviderError> {
        let variables = json!({
            "first": window,
            "input": {
                "projectId": scope.project.id,
                "serviceId": scope.service.id,
                "environmentId": scope.environment.id,
            }
        });
        let data: DeploymentsData = self
            .query(account, token, DEPLOYMENTS_QUERY, variables)
            .await?;

        Ok(data
            .deployments
            .into_nodes()
            .filter_map(|record| match map_record(record, scope, account) {
                Ok(deployment) => Some(deployment),
                Err(e) => {
                    warn!(
                        event = "core.provider.railway.record_skipped",
                        account = %account.id,
                        service = %scope.service.name,
                        error = %e
                    );
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl ProviderAdapter for RailwayAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Railway
    }

    async fn fetch(
        &self,
        account: &AccountConfig,
        window: usize,
    ) -> Result<Vec<UnifiedDeployment>, ProviderError> {
        let token = require_token(account)?;

        debug!(
            event = "core.provider.railway.fetch_started",
            account = %account.id,
            window = window
        );

        let projects: ProjectsData = self
            .query(account, &token, PROJECTS_QUERY, json!({ "first": PROJECT_LIMIT }))
            .await?;
        let projects: Vec<Project> = projects.projects.into_nodes().collect();

        let mut deployments = Vec::new();
        let mut succeeded = 0usize;
        let mut first_error = None;

        for project in &projects {
            let services: Vec<&Named> = project.services.edges.iter().map(|e| &e.node).collect();
            for environment in project.environments.edges.iter().map(|e| &e.node) {
                for &service in &services {
                    let scope = ServiceScope {
                        project,
                        service,
                        environment,
                    };
                    match self.fetch_service(account, &token, &scope, window).await {
                        Ok(found) => {
                            succeeded += 1;
                            deployments.extend(found);
                        }
                        Err(e) => {
                            warn!(
                                event = "core.provider.railway.service_fetch_failed",
                                account = %account.id,
                                project = %project.name,
                                service = %service.name,
                                environment = %environment.name,
                                error = %e
                            );
                            first_error.get_or_insert(e);
                        }
                    }
                }
            }
        }

        // Every combination failing is an account failure, not an empty account.
        if succeeded == 0
            && let Some(e) = first_error
        {
            return Err(e);
        }

        sort_most_recent_first(&mut deployments);
        deployments.truncate(window);

        info!(
            event = "core.provider.railway.fetch_completed",
            account = %account.id,
            projects = projects.len(),
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
        let data: BuildLogsData = self
            .query(
                account,
                &token,
                BUILD_LOGS_QUERY,
                json!({ "deploymentId": deployment_id, "limit": BUILD_LOG_LIMIT }),
            )
            .await?;

        let mut lines = Vec::with_capacity(data.build_logs.len());
        let mut errors = Vec::new();
        for entry in data.build_logs {
            let severe = entry
                .severity
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("error"));
            if severe || logs::is_error_line(&entry.message) {
                errors.push(entry.message.clone());
            }
            lines.push(entry.message);
        }

        Ok(logs::error_text(&lines, &errors))
    }
}

fn map_record(
    record: serde_json::Value,
    scope: &ServiceScope<'_>,
    account: &AccountConfig,
) -> Result<UnifiedDeployment, MappingError> {
    let raw: RailwayDeployment =
        serde_json::from_value(record).map_err(|e| MappingError::Malformed {
            message: e.to_string(),
        })?;

    let id = raw
        .id
        .filter(|id| !id.is_empty())
        .ok_or(MappingError::MissingField { field: "id" })?;
    let status = raw.status.unwrap_or_else(|| "UNKNOWN".to_string());
    let created_at = match raw.created_at.as_deref().map(parse_timestamp) {
        Some(Ok(millis)) => Some(millis),
        Some(Err(e)) => {
            warn!(
                event = "core.provider.railway.timestamp_invalid",
                account = %account.id,
                deployment_id = %id,
                error = %e
            );
            None
        }
        None => None,
    };
    let meta = raw.meta.unwrap_or(serde_json::Value::Null);

    Ok(UnifiedDeployment {
        canonical_status: normalize(&status, ProviderKind::Railway),
        id,
        provider: ProviderKind::Railway,
        name: format!("{} / {}", scope.project.name, scope.service.name),
        url: raw.static_url.filter(|u| !u.is_empty()),
        status,
        created_at,
        commit_message: meta_str(&meta, "commitMessage"),
        branch: meta_str(&meta, "branch"),
        project_id: Some(scope.project.id.clone()),
        service_id: Some(scope.service.id.clone()),
        team_slug: None,
        account_id: account.id.clone(),
    })
}

fn parse_timestamp(value: &str) -> Result<i64, MappingError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp_millis())
        .map_err(|e| MappingError::InvalidField {
            field: "createdAt",
            message: format!("'{}': {}", value, e),
        })
}

fn meta_str(meta: &serde_json::Value, key: &str) -> Option<String> {
    meta.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
