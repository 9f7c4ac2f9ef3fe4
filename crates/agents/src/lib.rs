use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, instrument, warn};
use triage_core::{
    classify_symptoms_rules, select_resources, Assessment, AssessmentResult, HealthcareResource,
    SymptomReport, UrgencyLevel, DISCLAIMER,
};
use triage_llm::{LlmError, OpenAiClassifier};
use triage_observability::AppMetrics;

/// Best-effort external classification strategy. Any error makes the agent
/// fall through to the rule-based strategy; nothing propagates further.
pub trait DelegateClassifier: Send + Sync {
    fn classify(
        &self,
        symptoms: &str,
    ) -> impl Future<Output = Result<Assessment, LlmError>> + Send;
}

impl DelegateClassifier for OpenAiClassifier {
    async fn classify(&self, symptoms: &str) -> Result<Assessment, LlmError> {
        OpenAiClassifier::classify(self, symptoms).await
    }
}

#[derive(Clone)]
pub struct TriageAgent<C>
where
    C: DelegateClassifier,
{
    catalog: Arc<Vec<HealthcareResource>>,
    delegate: Option<C>,
    metrics: Arc<AppMetrics>,
}

impl<C> TriageAgent<C>
where
    C: DelegateClassifier,
{
    pub fn new(
        catalog: Arc<Vec<HealthcareResource>>,
        delegate: Option<C>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            catalog,
            delegate,
            metrics,
        }
    }

    pub fn delegate_enabled(&self) -> bool {
        self.delegate.is_some()
    }

    /// Full assessment: classify, pick nearby resources for the resulting
    /// tier, stamp and attach the disclaimer. Input validation happens at
    /// the HTTP boundary; by the time we are called `symptoms` is non-empty.
    #[instrument(skip(self, report))]
    pub async fn assess(&self, report: SymptomReport) -> Result<AssessmentResult> {
        let started = Instant::now();
        self.metrics.inc_assessment();

        let assessment = self.classify(report.symptoms.trim()).await;
        let location = report.location.as_deref().unwrap_or("");
        let nearby_resources = select_resources(&self.catalog, location, assessment.urgency_level);

        self.metrics.observe_latency(started.elapsed());
        info!(
            urgency = assessment.urgency_level.as_code(),
            resources = nearby_resources.len(),
            "assessment produced"
        );

        Ok(AssessmentResult {
            assessment,
            nearby_resources,
            timestamp: Utc::now(),
            disclaimer: Some(DISCLAIMER.to_string()),
        })
    }

    /// Never fails. Tries the delegated strategy when configured and maps
    /// any failure to the deterministic keyword strategy.
    pub async fn classify(&self, symptoms: &str) -> Assessment {
        if let Some(delegate) = &self.delegate {
            match delegate.classify(symptoms).await {
                Ok(assessment) => {
                    self.metrics.inc_llm_classified();
                    return assessment;
                }
                Err(error) => {
                    self.metrics.inc_llm_fallback();
                    warn!(%error, "delegated classification failed, using rule-based fallback");
                }
            }
        }

        self.metrics.inc_rule_classified();
        classify_symptoms_rules(symptoms)
    }

    pub fn resources_for(
        &self,
        location: &str,
        urgency: UrgencyLevel,
    ) -> Vec<HealthcareResource> {
        select_resources(&self.catalog, location, urgency)
    }
}
