// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::task::TaskStatus;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TaskStatusCount {
    pub status: TaskStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub tasks_due_today: i64,
    pub overdue_tasks: i64,
    pub active_projects: i64,
    pub employees_on_site: i64,
    pub photos_today: i64,
    pub task_distribution: Vec<TaskStatusCount>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_companies: i64,
    pub total_users: i64,
    pub total_projects: i64,
    pub active_subscriptions: i64,
    pub pending_companies: i64,
}
