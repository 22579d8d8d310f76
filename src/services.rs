pub mod auth;
pub mod chat_service;
pub mod company_service;
pub mod daily_log_service;
pub mod dashboard_service;
pub mod invoice_service;
pub mod job_service;
pub mod payroll_calculator;
pub mod payroll_service;
pub mod photo_service;
pub mod project_service;
pub mod purchase_order_service;
pub mod rbac_service;
pub mod rfi_service;
pub mod super_admin_service;
pub mod task_service;
pub mod time_log_service;
pub mod user_service;
