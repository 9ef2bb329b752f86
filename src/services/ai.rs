// src/services/ai.rs
//! AI backend: candidates, resume ingestion, insights, analytics,
//! recommendations, applications and starred jobs.

use crate::core::endpoints::ai;
use crate::core::poll::{is_empty_result, resource_id_from};
use crate::core::{ingest_and_poll, ApiError, IngestHandle, PollConfig, TransportClient};
use crate::types::ai::{
    AiApplication, AiApplicationCreate, AiJob, AnalyticsQuery, AnalyticsSeries,
    CandidateProfile, RecommendationFeedback, RecommendationItem, RecommendationQuery,
    ResumeIngestPayload, ResumeInsight, ResumeInsightsRequest, StarRequest, StarredJobs,
};
use crate::types::PagedBody;
use serde::de::IgnoredAny;
use serde_json::Value;

#[derive(Clone)]
pub struct AiService {
    client: TransportClient,
}

impl AiService {
    pub fn new(client: TransportClient) -> Self {
        Self { client }
    }

    // ===== Candidates and jobs =====

    pub async fn candidate_me(&self) -> Result<CandidateProfile, ApiError> {
        self.client.get(ai::CANDIDATES_ME.path()).await
    }

    /// Job list; the backend may wrap it in `{ items }`.
    pub async fn list_jobs(&self) -> Result<Vec<AiJob>, ApiError> {
        let body: PagedBody<AiJob> = self.client.get(ai::JOBS_LIST.path()).await?;
        Ok(body.into_items())
    }

    pub async fn job_candidates(&self, job_id: &str) -> Result<Vec<CandidateProfile>, ApiError> {
        let body: PagedBody<CandidateProfile> =
            self.client.get(&ai::JOBS_CANDIDATES.with_id(job_id)).await?;
        Ok(body.into_items())
    }

    // ===== Resumes =====

    /// Submit a resume for processing. The response carries the new resume id.
    pub async fn ingest_resume(&self, payload: &ResumeIngestPayload) -> Result<Value, ApiError> {
        self.client.post(ai::RESUMES_INGEST.path(), payload).await
    }

    pub async fn resume_features(&self, resume_id: &str) -> Result<Value, ApiError> {
        self.client.get(&ai::RESUMES_FEATURES.with_id(resume_id)).await
    }

    /// Ingest a resume, then poll its features until they are ready or the timeout passes.
    /// A timeout is not an error: the handle comes back with `result = None`.
    pub async fn ingest_and_wait(
        &self,
        payload: &ResumeIngestPayload,
        config: &PollConfig,
    ) -> Result<IngestHandle<Value>, ApiError> {
        let submit = async {
            let response = self.ingest_resume(payload).await?;
            resource_id_from(&response)
        };
        ingest_and_poll(
            submit,
            |resume_id| async move {
                let features = self.resume_features(&resume_id).await?;
                Ok::<_, ApiError>((!is_empty_result(&features)).then_some(features))
            },
            config,
        )
        .await
    }

    pub async fn resume_insights(
        &self,
        request: &ResumeInsightsRequest,
    ) -> Result<Vec<ResumeInsight>, ApiError> {
        self.client.post(ai::RESUMES_INSIGHTS.path(), request).await
    }

    // ===== Analytics =====

    pub async fn analytics(&self, query: &AnalyticsQuery) -> Result<Vec<AnalyticsSeries>, ApiError> {
        self.client.get_with(ai::ANALYTICS_INSIGHTS.path(), query).await
    }

    pub async fn employer_analytics(&self, employer_id: &str) -> Result<Value, ApiError> {
        self.client
            .get(&ai::ANALYTICS_EMPLOYER.with_id(employer_id))
            .await
    }

    // ===== Recommendations =====

    pub async fn recommendations(
        &self,
        query: &RecommendationQuery,
    ) -> Result<Vec<RecommendationItem>, ApiError> {
        self.client
            .get_with(ai::RECOMMENDATIONS_LIST.path(), query)
            .await
    }

    pub async fn send_recommendation_feedback(
        &self,
        feedback: &RecommendationFeedback,
    ) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .client
            .post(ai::RECOMMENDATIONS_FEEDBACK.path(), feedback)
            .await?;
        Ok(())
    }

    // ===== Applications and starred jobs =====

    pub async fn create_application(
        &self,
        body: &AiApplicationCreate,
    ) -> Result<AiApplication, ApiError> {
        self.client.post(ai::APPLICATIONS_CREATE.path(), body).await
    }

    pub async fn starred_jobs(&self) -> Result<Vec<String>, ApiError> {
        let starred: Option<StarredJobs> = self.client.get(ai::STARRED_LIST.path()).await?;
        Ok(starred.map(|s| s.job_ids).unwrap_or_default())
    }

    pub async fn add_star(&self, job_id: &str) -> Result<(), ApiError> {
        let body = StarRequest {
            job_id: job_id.to_string(),
        };
        let _: IgnoredAny = self.client.post(ai::STARRED_LIST.path(), &body).await?;
        Ok(())
    }

    pub async fn remove_star(&self, job_id: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .client
            .delete(&ai::STARRED_DETAIL.with_id(job_id))
            .await?;
        Ok(())
    }
}
