//! Dashboard: variant selection, loading, and display shaping.
//!
//! The variant is picked once from the session role when the view is built.
//! Administrators get aggregate statistics, professors get their personal
//! statistics keyed by the session subject, anyone else gets no fetch.

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::{
    DashboardStats, LastPayment, MonthlyRevenue, ProfessorActivity, ProfessorStatistics,
};
use crate::session::CredentialStore;
use crate::views::scope::ViewScope;
use common::types::Role;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Months of revenue history requested by default.
pub const DEFAULT_REVENUE_MONTHS: u32 = 6;

/// Rows requested by default for payment and activity lists.
pub const DEFAULT_LIST_LIMIT: u32 = 10;

/// Which dashboard a session gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardVariant {
    Admin,
    Professor { login: String },
    /// No statistics for this session; the role is kept for display.
    Unavailable { role: Option<Role> },
}

impl DashboardVariant {
    /// Variant for the session currently in `store`.
    ///
    /// A professor token without a subject cannot be keyed and is
    /// unavailable.
    #[must_use]
    pub fn for_store(store: &CredentialStore) -> Self {
        let Some(claims) = store.claims() else {
            return DashboardVariant::Unavailable { role: None };
        };
        match (claims.role(), claims.sub) {
            (Some(Role::Admin), _) => DashboardVariant::Admin,
            (Some(Role::Professor), Some(login)) if !login.is_empty() => {
                DashboardVariant::Professor { login }
            }
            (role, _) => DashboardVariant::Unavailable { role },
        }
    }

    /// Whether this variant fetches anything.
    #[must_use]
    pub fn fetches(&self) -> bool {
        !matches!(self, DashboardVariant::Unavailable { .. })
    }
}

/// Loaded dashboard content.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardData {
    Admin(Box<DashboardStats>),
    Professor(ProfessorStatistics),
}

/// REST calls behind the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardLoader {
    api: ApiClient,
}

impl DashboardLoader {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /dashboard`.
    #[instrument(skip_all)]
    pub async fn admin_stats(&self) -> Result<DashboardStats, ApiError> {
        self.api.get_json(&["dashboard"], &[]).await
    }

    /// `GET /dashboard/revenue?months=N`.
    pub async fn revenue_by_month(&self, months: u32) -> Result<Vec<MonthlyRevenue>, ApiError> {
        self.api
            .get_json(&["dashboard", "revenue"], &[("months", months.to_string())])
            .await
    }

    /// `GET /dashboard/payments?limit=N`.
    pub async fn recent_payments(&self, limit: u32) -> Result<Vec<LastPayment>, ApiError> {
        self.api
            .get_json(&["dashboard", "payments"], &[("limit", limit.to_string())])
            .await
    }

    /// `GET /dashboard/professor-activities?limit=N`.
    pub async fn professor_activities(
        &self,
        limit: u32,
    ) -> Result<Vec<ProfessorActivity>, ApiError> {
        self.api
            .get_json(
                &["dashboard", "professor-activities"],
                &[("limit", limit.to_string())],
            )
            .await
    }

    /// `GET /dashboard/professors/{login}`.
    #[instrument(skip_all)]
    pub async fn professor_statistics(&self, login: &str) -> Result<ProfessorStatistics, ApiError> {
        self.api
            .get_json(&["dashboard", "professors", login], &[])
            .await
    }

    /// Fetch what `variant` needs. `Ok(None)` for variants that fetch nothing.
    pub async fn load(&self, variant: &DashboardVariant) -> Result<Option<DashboardData>, ApiError> {
        match variant {
            DashboardVariant::Admin => Ok(Some(DashboardData::Admin(Box::new(
                self.admin_stats().await?,
            )))),
            DashboardVariant::Professor { login } => Ok(Some(DashboardData::Professor(
                self.professor_statistics(login).await?,
            ))),
            DashboardVariant::Unavailable { .. } => Ok(None),
        }
    }
}

/// Observable state of a dashboard view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub loading: bool,
    pub data: Option<DashboardData>,
    /// Sanitized failure description of the last load.
    pub error: Option<String>,
}

/// Dashboard view bound to a [`ViewScope`].
#[derive(Debug)]
pub struct DashboardView {
    variant: DashboardVariant,
    state: Arc<Mutex<DashboardState>>,
    scope: ViewScope,
    pending: Option<JoinHandle<bool>>,
    /// Number of the most recent load; older loads never apply.
    generation: Arc<AtomicU64>,
}

impl DashboardView {
    /// Build the view and start loading. Must be called inside a tokio
    /// runtime when the variant fetches.
    #[must_use]
    pub fn open(store: &CredentialStore, loader: DashboardLoader) -> Self {
        let variant = DashboardVariant::for_store(store);
        let mut view = Self {
            variant,
            state: Arc::new(Mutex::new(DashboardState::default())),
            scope: ViewScope::new("dashboard"),
            pending: None,
            generation: Arc::new(AtomicU64::new(0)),
        };
        view.refresh(loader);
        view
    }

    /// Start a new load for the current variant, superseding any load still
    /// in flight.
    pub fn refresh(&mut self, loader: DashboardLoader) {
        if !self.variant.fetches() {
            warn!(
                target: "campus.dashboard",
                "No dashboard available for this session"
            );
            self.lock().loading = false;
            return;
        }

        if let Some(previous) = self.pending.take() {
            previous.abort();
            debug!(target: "campus.dashboard", "Superseding dashboard load in flight");
        }

        self.lock().loading = true;
        let variant = self.variant.clone();
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.generation);
        let generation = latest.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(target: "campus.dashboard", variant = ?variant, generation, "Loading dashboard");

        self.pending = Some(self.scope.spawn_with(
            async move { loader.load(&variant).await },
            move |result| {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                if latest.load(Ordering::SeqCst) != generation {
                    debug!(target: "campus.dashboard", generation, "Stale dashboard load discarded");
                    return;
                }
                state.loading = false;
                match result {
                    Ok(data) => {
                        info!(target: "campus.dashboard", "Dashboard loaded");
                        state.data = data;
                        state.error = None;
                    }
                    Err(e) => {
                        warn!(target: "campus.dashboard", error = %e, "Dashboard load failed");
                        state.error = Some(e.to_string());
                    }
                }
            },
        ));
    }

    /// Wait for the load in flight, if any. Returns whether its result was
    /// applied.
    pub async fn settled(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => handle.await.unwrap_or(false),
            None => false,
        }
    }

    #[must_use]
    pub fn variant(&self) -> &DashboardVariant {
        &self.variant
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> DashboardState {
        self.lock().clone()
    }

    /// End the view; a load still in flight is dropped.
    pub fn teardown(&self) {
        self.scope.teardown();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Labels and values ready for a chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// Monthly revenue line: one point per month, in backend order.
    #[must_use]
    pub fn monthly_revenue(months: &[MonthlyRevenue]) -> Self {
        Self {
            labels: months.iter().map(|m| m.month.clone()).collect(),
            values: months.iter().map(|m| m.revenue).collect(),
        }
    }

    /// Breakdown chart from a name-to-amount map, in key order.
    #[must_use]
    pub fn from_amounts(map: &BTreeMap<String, f64>) -> Self {
        Self {
            labels: map.keys().cloned().collect(),
            values: map.values().copied().collect(),
        }
    }

    /// Breakdown chart from a name-to-count map, in key order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(map: &BTreeMap<String, i64>) -> Self {
        Self {
            labels: map.keys().cloned().collect(),
            values: map.values().map(|v| *v as f64).collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Width, in percent, of a group's progress bar relative to the largest
/// group. Zero when there are no groups or the largest is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_width(student_count: i64, students_per_group: &BTreeMap<String, i64>) -> f64 {
    let Some(&max) = students_per_group.values().max() else {
        return 0.0;
    };
    if max <= 0 {
        return 0.0;
    }
    (student_count as f64 / max as f64 * 100.0).min(100.0)
}

/// One row of the professor's subject breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRow {
    pub subject_name: String,
    pub count: i64,
}

/// Subject distribution as rows, in subject-name order.
#[must_use]
pub fn subject_rows(distribution: &BTreeMap<String, i64>) -> Vec<SubjectRow> {
    distribution
        .iter()
        .map(|(subject_name, count)| SubjectRow {
            subject_name: subject_name.clone(),
            count: *count,
        })
        .collect()
}

/// Student count per group taught by the professor, summed over
/// assignments.
#[must_use]
pub fn students_by_group(stats: &ProfessorStatistics) -> BTreeMap<String, i64> {
    let mut groups = BTreeMap::new();
    for assignment in &stats.assignments {
        let name = assignment
            .student_group_name
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        *groups.entry(name).or_insert(0) += assignment.student_count;
    }
    groups
}
