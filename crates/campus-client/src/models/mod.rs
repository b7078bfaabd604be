//! Wire types served by the REST backend.

pub mod dashboard;
pub mod entities;

pub use dashboard::{
    DashboardStats, LastPayment, MonthlyRevenue, ProfessorActivity, ProfessorAssignment,
    ProfessorStatistics, RevenueOverview,
};
pub use entities::{Group, Payment, PaymentStatus, Professor, Student, Subject, User};
