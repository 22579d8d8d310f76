// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register_company,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::update_password,

        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::get_company,
        handlers::companies::update_company,
        handlers::companies::delete_company,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Roles ---
        handlers::rbac::list_roles,
        handlers::rbac::my_permissions,
        handlers::rbac::update_role,
        handlers::rbac::delete_role,

        // --- Projects ---
        handlers::projects::list_projects,
        handlers::projects::get_project,
        handlers::projects::create_project,
        handlers::projects::update_project,
        handlers::projects::assign_pm,
        handlers::projects::delete_project,
        handlers::projects::project_members,

        // --- Jobs ---
        handlers::jobs::list_jobs,
        handlers::jobs::get_job,
        handlers::jobs::create_job,
        handlers::jobs::update_job,
        handlers::jobs::assign_foreman,
        handlers::jobs::assign_workers,
        handlers::jobs::delete_job,

        // --- Tasks ---
        handlers::tasks::list_tasks,
        handlers::tasks::my_tasks,
        handlers::tasks::create_task,
        handlers::tasks::update_task,
        handlers::tasks::delete_task,

        // --- Time logs ---
        handlers::time_logs::clock_in,
        handlers::time_logs::clock_out,
        handlers::time_logs::list_time_logs,
        handlers::time_logs::update_time_log,

        // --- Photos ---
        handlers::photos::list_photos,
        handlers::photos::create_photo,
        handlers::photos::delete_photo,

        // --- Chat ---
        handlers::chat::list_rooms,
        handlers::chat::general_history,
        handlers::chat::project_history,
        handlers::chat::private_history,
        handlers::chat::send_message,

        // --- Purchase orders ---
        handlers::purchase_orders::create_purchase_order,
        handlers::purchase_orders::list_purchase_orders,
        handlers::purchase_orders::get_purchase_order,
        handlers::purchase_orders::update_purchase_order,
        handlers::purchase_orders::transition_purchase_order,
        handlers::purchase_orders::delete_purchase_order,

        // --- Payroll ---
        handlers::payroll::preview_payroll,
        handlers::payroll::run_payroll,
        handlers::payroll::payroll_history,

        // --- Invoices ---
        handlers::invoices::list_invoices,
        handlers::invoices::get_invoice,
        handlers::invoices::create_invoice,
        handlers::invoices::update_invoice,

        // --- Daily logs ---
        handlers::daily_logs::list_daily_logs,
        handlers::daily_logs::create_daily_log,
        handlers::daily_logs::verify_daily_log,
        handlers::daily_logs::delete_daily_log,

        // --- RFIs ---
        handlers::rfis::rfi_stats,
        handlers::rfis::list_rfis,
        handlers::rfis::get_rfi,
        handlers::rfis::create_rfi,
        handlers::rfis::update_rfi,
        handlers::rfis::add_rfi_comment,
        handlers::rfis::delete_rfi,

        // --- Dashboard ---
        handlers::dashboard::get_stats,

        // --- Super admin ---
        handlers::super_admin::platform_stats,
        handlers::super_admin::all_users,
        handlers::super_admin::approve_company,
        handlers::super_admin::reject_company,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterCompanyPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdatePasswordPayload,
            models::auth::RegistrationResponse,
            models::auth::AuthResponse,

            // --- Companies & users ---
            models::company::SubscriptionStatus,
            models::company::Company,
            models::company::UpdateCompanyPayload,
            models::user::CreateUserPayload,
            models::user::UpdateUserPayload,
            models::user::UserSummary,

            // --- Roles ---
            models::rbac::RolePermission,
            models::rbac::UpdateRolePermissionsPayload,
            models::rbac::MyPermissions,

            // --- Projects & jobs ---
            models::project::ProjectStatus,
            models::project::Project,
            models::project::CreateProjectPayload,
            models::project::UpdateProjectPayload,
            models::project::AssignPmPayload,
            models::job::JobStatus,
            models::job::Job,
            models::job::CreateJobPayload,
            models::job::UpdateJobPayload,
            models::job::AssignForemanPayload,
            models::job::AssignWorkersPayload,

            // --- Tasks ---
            models::task::TaskStatus,
            models::task::TaskPriority,
            models::task::Task,
            models::task::CreateTaskPayload,
            models::task::UpdateTaskPayload,

            // --- Time logs ---
            crate::common::geo::GeofenceStatus,
            models::time_log::TimeLogStatus,
            models::time_log::TimeLog,
            models::time_log::ClockInPayload,
            models::time_log::ClockOutPayload,
            models::time_log::UpdateTimeLogPayload,

            // --- Photos & chat ---
            models::photo::Photo,
            models::photo::CreatePhotoPayload,
            models::chat::ChatMessage,
            models::chat::ChatRoomKind,
            models::chat::ChatRoom,
            models::chat::SendMessagePayload,

            // --- Purchase orders ---
            models::purchase_order::PurchaseOrderStatus,
            models::purchase_order::PurchaseOrderAction,
            models::purchase_order::PurchaseOrderItem,
            models::purchase_order::PurchaseOrder,
            models::purchase_order::CreatePurchaseOrderPayload,
            models::purchase_order::UpdatePurchaseOrderPayload,

            // --- Payroll ---
            models::payroll::PayrollStatus,
            models::payroll::Deductions,
            models::payroll::Payroll,
            models::payroll::PayrollHistoryEntry,
            models::payroll::PayrollPreviewEntry,
            models::payroll::PayrollPeriodQuery,

            // --- Invoices ---
            models::invoice::InvoiceStatus,
            models::invoice::InvoiceItem,
            models::invoice::Invoice,
            models::invoice::CreateInvoicePayload,
            models::invoice::UpdateInvoicePayload,

            // --- Daily logs ---
            models::daily_log::Weather,
            models::daily_log::ManpowerEntry,
            models::daily_log::DailyLog,
            models::daily_log::CreateDailyLogPayload,

            // --- RFIs ---
            models::rfi::RfiCategory,
            models::rfi::RfiPriority,
            models::rfi::RfiStatus,
            models::rfi::RfiComment,
            models::rfi::Rfi,
            models::rfi::CreateRfiPayload,
            models::rfi::UpdateRfiPayload,
            models::rfi::RfiCommentPayload,
            models::rfi::RfiCounts,
            models::rfi::RfiStats,

            // --- Dashboard ---
            models::dashboard::TaskStatusCount,
            models::dashboard::DashboardStats,
            models::dashboard::PlatformStats,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro de empresa, login e perfil"),
        (name = "Companies", description = "Empresas (tenants)"),
        (name = "Users", description = "Equipe da empresa"),
        (name = "Roles", description = "Permissões por papel"),
        (name = "Projects", description = "Obras"),
        (name = "Jobs", description = "Frentes de serviço e progresso da obra"),
        (name = "Tasks", description = "Tarefas"),
        (name = "Time Logs", description = "Ponto com cerca virtual"),
        (name = "Photos", description = "Fotos da obra"),
        (name = "Chat", description = "Salas geral, da obra e privadas"),
        (name = "Purchase Orders", description = "Pedidos de compra"),
        (name = "Payroll", description = "Folha de pagamento"),
        (name = "Invoices", description = "Faturas para o cliente da obra"),
        (name = "Daily Logs", description = "Diário de obra"),
        (name = "RFIs", description = "Pedidos de informação técnica"),
        (name = "Dashboard", description = "Indicadores da empresa"),
        (name = "Super Admin", description = "Console da plataforma")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_core_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/projects",
            "/api/timelogs/clock-in",
            "/api/payroll/preview",
            "/api/chat",
            "/api/invoices",
            "/api/dailylogs/{id}/verify",
            "/api/rfis/stats",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
