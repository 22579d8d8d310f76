pub mod auth;
pub mod chat;
pub mod companies;
pub mod daily_logs;
pub mod dashboard;
pub mod invoices;
pub mod jobs;
pub mod payroll;
pub mod photos;
pub mod projects;
pub mod purchase_orders;
pub mod rbac;
pub mod rfis;
pub mod super_admin;
pub mod tasks;
pub mod time_logs;
pub mod users;
