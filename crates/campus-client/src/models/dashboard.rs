//! Dashboard statistics.
//!
//! The backend assembles these from loosely typed maps, so every field is
//! optional on the wire and decodes to zero or empty when missing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Decode `null` as the type's default, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Aggregate statistics shown on the administrator dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total_students: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_professors: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_student_groups: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_subjects: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_payments: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub pending_payments: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub average_payment_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_revenue: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub revenue_last_month: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub revenue_by_month: Vec<MonthlyRevenue>,
    #[serde(deserialize_with = "null_as_default")]
    pub last_payments: Vec<LastPayment>,
    #[serde(deserialize_with = "null_as_default")]
    pub professor_activities: Vec<ProfessorActivity>,
    /// Group name to student count.
    #[serde(deserialize_with = "null_as_default")]
    pub students_per_group: BTreeMap<String, i64>,
    /// Payment status to payment count.
    #[serde(deserialize_with = "null_as_default")]
    pub payments_per_status: BTreeMap<String, i64>,
    pub revenue_overview: Option<RevenueOverview>,
}

/// Revenue collected in one calendar month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyRevenue {
    /// Month name as sent by the backend, e.g. `MARCH`.
    #[serde(deserialize_with = "null_as_default")]
    pub month: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LastPayment {
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,
    pub status: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub student_id: Option<i64>,
    pub student_name: Option<String>,
}

/// One professor/subject/group teaching assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessorActivity {
    pub id: Option<i64>,
    pub professor_id: Option<i64>,
    pub professor_name: Option<String>,
    pub subject_name: Option<String>,
    pub student_group_id: Option<i64>,
    pub student_group_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueOverview {
    #[serde(deserialize_with = "null_as_default")]
    pub average_monthly_revenue: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub revenue_by_payment_method: BTreeMap<String, f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub top_revenue_by_student_group: BTreeMap<String, f64>,
}

/// Personal statistics shown on a professor's dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessorStatistics {
    #[serde(deserialize_with = "null_as_default")]
    pub total_assignments: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_student_groups: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_subjects: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_students: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub assignments: Vec<ProfessorAssignment>,
    /// Subject name to number of assignments.
    #[serde(deserialize_with = "null_as_default")]
    pub subject_distribution: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessorAssignment {
    pub id: Option<i64>,
    pub subject_id: Option<i64>,
    pub subject_name: Option<String>,
    pub student_group_id: Option<i64>,
    pub student_group_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub student_count: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_decodes_to_defaults() {
        let stats: DashboardStats = serde_json::from_value(json!({})).unwrap();
        assert_eq!(stats, DashboardStats::default());

        let prof: ProfessorStatistics = serde_json::from_value(json!({})).unwrap();
        assert_eq!(prof.total_assignments, 0);
        assert!(prof.subject_distribution.is_empty());
    }

    #[test]
    fn test_null_fields_decode_to_defaults() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "totalRevenue": null,
            "revenueByMonth": null,
            "studentsPerGroup": null,
            "totalStudents": 4
        }))
        .unwrap();
        assert_eq!(stats.total_students, 4);
        assert!(stats.revenue_by_month.is_empty());
        assert!(stats.students_per_group.is_empty());
    }

    #[test]
    fn test_admin_stats_decode() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "totalStudents": 120,
            "totalProfessors": 8,
            "totalRevenue": 15000.0,
            "revenueByMonth": [
                {"month": "JANUARY", "year": 2024, "revenue": 1200.0},
                {"month": "FEBRUARY", "year": 2024, "revenue": 900.5}
            ],
            "lastPayments": [
                {"id": 3, "amount": 100.0, "status": "ACCEPTED", "studentId": 7, "studentName": "Jane Doe"}
            ],
            "studentsPerGroup": {"G1": 30, "G2": 12},
            "revenueOverview": {
                "averageMonthlyRevenue": 1050.25,
                "revenueByPaymentMethod": {"Cash": 1500.0}
            }
        }))
        .unwrap();

        assert_eq!(stats.total_students, 120);
        assert_eq!(stats.revenue_by_month.len(), 2);
        assert_eq!(stats.last_payments.first().unwrap().student_name.as_deref(), Some("Jane Doe"));
        assert_eq!(stats.students_per_group.get("G1"), Some(&30));
        let overview = stats.revenue_overview.unwrap();
        assert!((overview.average_monthly_revenue - 1050.25).abs() < f64::EPSILON);
        assert!(overview.top_revenue_by_student_group.is_empty());
    }

    #[test]
    fn test_professor_statistics_decode() {
        let stats: ProfessorStatistics = serde_json::from_value(json!({
            "totalAssignments": 2,
            "assignments": [
                {"id": 1, "subjectName": "Algebra", "studentGroupName": "G1", "studentCount": 25}
            ],
            "subjectDistribution": {"Algebra": 2}
        }))
        .unwrap();

        assert_eq!(stats.total_assignments, 2);
        assert_eq!(stats.assignments.first().unwrap().student_count, 25);
        assert_eq!(stats.subject_distribution.get("Algebra"), Some(&2));
    }
}
