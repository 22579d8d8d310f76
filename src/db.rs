pub mod chat_repo;
pub mod company_repo;
pub mod daily_log_repo;
pub mod dashboard_repo;
pub mod invoice_repo;
pub mod job_repo;
pub mod payroll_repo;
pub mod photo_repo;
pub mod project_repo;
pub mod purchase_order_repo;
pub mod rbac_repo;
pub mod rfi_repo;
pub mod task_repo;
pub mod time_log_repo;
pub mod user_repo;

pub use chat_repo::ChatRepository;
pub use company_repo::CompanyRepository;
pub use daily_log_repo::DailyLogRepository;
pub use dashboard_repo::DashboardRepository;
pub use invoice_repo::InvoiceRepository;
pub use job_repo::JobRepository;
pub use payroll_repo::PayrollRepository;
pub use photo_repo::PhotoRepository;
pub use project_repo::ProjectRepository;
pub use purchase_order_repo::PurchaseOrderRepository;
pub use rbac_repo::RbacRepository;
pub use rfi_repo::RfiRepository;
pub use task_repo::TaskRepository;
pub use time_log_repo::TimeLogRepository;
pub use user_repo::UserRepository;
