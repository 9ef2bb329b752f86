// src/cli.rs
use crate::app_log;
use crate::client::PortalClient;
use crate::core::endpoints::EndpointRegistry;
use crate::core::{ApiError, PollConfig};
use crate::environment::EnvironmentConfig;
use crate::job_insights::{format_salary, job_tags, popularity_score};
use crate::types::ai::{RecommendationQuery, ResumeIngestPayload};
use crate::types::{ApplicationStatus, ListQuery};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "job-portal")]
#[command(about = "Command line client for the job portal backends")]
pub struct PortalCli {
    #[command(subcommand)]
    pub command: PortalCommand,

    /// Bearer token for the session
    #[arg(long, global = true, env = "JOB_PORTAL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum PortalCommand {
    /// Show the signed-in user
    Me,
    /// Browse and search jobs
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// Browse organizations
    Orgs {
        #[command(subcommand)]
        command: OrgsCommand,
    },
    /// Inspect applications and move them through the pipeline
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
    /// Read notifications
    Notifications {
        #[command(subcommand)]
        command: NotificationsCommand,
    },
    /// Ingest or upload a resume
    Resume {
        #[command(subcommand)]
        command: ResumeCommand,
    },
    /// AI job recommendations
    Recommendations {
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        job_id: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print the endpoint registries of both backends
    Endpoints,
}

#[derive(Args)]
pub struct PageArgs {
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub page_size: Option<u32>,
}

impl PageArgs {
    fn to_query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            page_size: self.page_size,
            ..ListQuery::default()
        }
    }
}

#[derive(Subcommand)]
pub enum JobsCommand {
    /// List jobs, optionally filtered with key=value pairs
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// Show one job with its badges
    Get { id: String },
    /// Keyword search
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
}

#[derive(Subcommand)]
pub enum OrgsCommand {
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    Get { id: String },
}

#[derive(Subcommand)]
pub enum ApplicationsCommand {
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    Get { id: String },
    /// Set the status by label (e.g. Interview) or numeric code
    Status { id: String, status: String },
}

#[derive(Subcommand)]
pub enum NotificationsCommand {
    List,
    /// Mark one notification as read
    Read { id: String },
}

#[derive(Subcommand)]
pub enum ResumeCommand {
    /// Submit resume text or a URL and wait for extracted features
    Ingest {
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        text: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long, default_value_t = 1500)]
        poll_ms: u64,
        #[arg(long, default_value_t = 15000)]
        timeout_ms: u64,
    },
    /// Upload a PDF or DOCX resume
    Upload { file: PathBuf },
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", output);
    Ok(())
}

fn parse_filters(filters: &[String]) -> Result<ListQuery> {
    filters.iter().try_fold(ListQuery::new(), |query, pair| {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Filter must be key=value, got '{}'", pair))?;
        Ok(query.filter(key.trim(), value.trim()))
    })
}

fn print_endpoints() {
    for registry in [EndpointRegistry::primary(), EndpointRegistry::ai()] {
        for endpoint in registry.iter() {
            println!("{:<8} {:<28} {}", registry.backend(), endpoint.name, endpoint.template);
        }
    }
}

pub async fn handle_portal_command(cli: PortalCli) -> Result<()> {
    if let PortalCommand::Endpoints = cli.command {
        print_endpoints();
        return Ok(());
    }

    let config = EnvironmentConfig::load()?;
    let client = PortalClient::new(&config)?;

    if let Some(token) = cli.token.filter(|t| !t.trim().is_empty()) {
        client.sign_in_with(move || {
            let token = token.clone();
            async move { Some(token) }
        });
    }

    match cli.command {
        PortalCommand::Me => print_json(&client.auth().me().await?),

        PortalCommand::Jobs { command } => match command {
            JobsCommand::List { paging, filters } => {
                let mut query = parse_filters(&filters)?;
                query.page = paging.page;
                query.page_size = paging.page_size;
                print_json(&client.jobs().list(&query).await?)
            }
            JobsCommand::Get { id } => {
                let job = client.jobs().detail(&id).await?;
                print_json(&json!({
                    "popularity": popularity_score(&job),
                    "salary": format_salary(job.salary_min, job.salary_max),
                    "tags": job_tags(&job),
                    "job": job,
                }))
            }
            JobsCommand::Search {
                query,
                page,
                page_size,
            } => print_json(&client.jobs().search(&query, page, page_size).await?),
        },

        PortalCommand::Orgs { command } => match command {
            OrgsCommand::List { paging } => {
                print_json(&client.orgs().list(&paging.to_query()).await?)
            }
            OrgsCommand::Get { id } => print_json(&client.orgs().detail(&id).await?),
        },

        PortalCommand::Applications { command } => match command {
            ApplicationsCommand::List { paging } => {
                print_json(&client.applications().list(&paging.to_query()).await?)
            }
            ApplicationsCommand::Get { id } => {
                print_json(&client.applications().detail(&id).await?)
            }
            ApplicationsCommand::Status { id, status } => {
                let status = ApplicationStatus::parse(&status).ok_or_else(|| {
                    ApiError::unknown(format!("Unknown application status: {}", status))
                        .with_code("INVALID_REQUEST")
                })?;
                print_json(&client.applications().set_status(&id, status).await?)
            }
        },

        PortalCommand::Notifications { command } => match command {
            NotificationsCommand::List => print_json(&client.notifications().list().await?),
            NotificationsCommand::Read { id } => {
                client.notifications().mark_read(&id).await?;
                print_json(&json!({ "id": id, "read": true }))
            }
        },

        PortalCommand::Resume { command } => match command {
            ResumeCommand::Ingest {
                text,
                url,
                poll_ms,
                timeout_ms,
            } => {
                let payload = ResumeIngestPayload { text, url };
                let poll = PollConfig::default()
                    .with_interval(Duration::from_millis(poll_ms))
                    .with_timeout(Duration::from_millis(timeout_ms));
                let handle = client.ai_service().ingest_and_wait(&payload, &poll).await?;
                if handle.result.is_none() {
                    app_log!(warn, "Features for {} were not ready in time", handle.resource_id);
                }
                print_json(&handle)
            }
            ResumeCommand::Upload { file } => {
                print_json(&client.uploads().upload_resume(&file).await?)
            }
        },

        PortalCommand::Recommendations {
            user_id,
            job_id,
            limit,
        } => {
            let query = RecommendationQuery {
                user_id,
                job_id,
                limit,
            };
            print_json(&client.ai_service().recommendations(&query).await?)
        }

        PortalCommand::Endpoints => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_subcommands() {
        let cli = PortalCli::try_parse_from([
            "job-portal",
            "jobs",
            "list",
            "--page",
            "2",
            "--filter",
            "location=Remote",
        ])
        .unwrap();
        match cli.command {
            PortalCommand::Jobs {
                command: JobsCommand::List { paging, filters },
            } => {
                assert_eq!(paging.page, Some(2));
                assert_eq!(filters, vec!["location=Remote"]);
            }
            _ => panic!("expected jobs list"),
        }
    }

    #[test]
    fn test_resume_ingest_requires_text_or_url() {
        assert!(PortalCli::try_parse_from(["job-portal", "resume", "ingest"]).is_err());
        assert!(PortalCli::try_parse_from([
            "job-portal", "resume", "ingest", "--text", "a", "--url", "b"
        ])
        .is_err());
        assert!(PortalCli::try_parse_from(["job-portal", "resume", "ingest", "--url", "b"]).is_ok());
    }

    #[test]
    fn test_parse_filters() {
        let query = parse_filters(&["q = rust".to_string(), "remote=true".to_string()]).unwrap();
        assert_eq!(query.filters.get("q").map(String::as_str), Some("rust"));
        assert!(parse_filters(&["broken".to_string()]).is_err());
    }
}
