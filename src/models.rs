pub mod auth;
pub mod chat;
pub mod company;
pub mod daily_log;
pub mod dashboard;
pub mod invoice;
pub mod job;
pub mod payroll;
pub mod photo;
pub mod project;
pub mod purchase_order;
pub mod rbac;
pub mod rfi;
pub mod task;
pub mod time_log;
pub mod user;
