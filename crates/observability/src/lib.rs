use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    assessments_total: AtomicU64,
    llm_classified_total: AtomicU64,
    llm_fallback_total: AtomicU64,
    rule_classified_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub assessments_total: u64,
    pub llm_classified_total: u64,
    pub llm_fallback_total: u64,
    pub rule_classified_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_assessment(&self) {
        self.assessments_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_llm_classified(&self) {
        self.llm_classified_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_llm_fallback(&self) {
        self.llm_fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rule_classified(&self) {
        self.rule_classified_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let assessments = self.assessments_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            assessments_total: assessments,
            llm_classified_total: self.llm_classified_total.load(Ordering::Relaxed),
            llm_fallback_total: self.llm_fallback_total.load(Ordering::Relaxed),
            rule_classified_total: self.rule_classified_total.load(Ordering::Relaxed),
            avg_latency_millis: if assessments == 0 {
                0.0
            } else {
                latency as f64 / assessments as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,triage_api=info,triage_agents=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let metrics = AppMetrics::default();
        metrics.inc_assessment();
        metrics.inc_assessment();
        metrics.inc_llm_fallback();
        metrics.inc_rule_classified();
        metrics.observe_latency(Duration::from_millis(10));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.assessments_total, 2);
        assert_eq!(snapshot.llm_fallback_total, 1);
        assert_eq!(snapshot.rule_classified_total, 1);
        assert_eq!(snapshot.avg_latency_millis, 5.0);
    }
}
