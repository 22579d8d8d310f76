//src/main.rs

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod realtime;
mod services;
mod visibility;

use crate::config::{AppState, Settings};
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let seeded = app_state.rbac_service.seed_defaults().await?;
    tracing::info!(seeded, "permissões padrão conferidas");

    let app = router(app_state);

    let listener = TcpListener::bind(("0.0.0.0", settings.port)).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(app_state: AppState) -> Router {
    let guard = || axum_middleware::from_fn_with_state(app_state.clone(), auth_guard);

    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register-company", post(handlers::auth::register_company))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/password", put(handlers::auth::update_password))
        .route("/", get(handlers::users::list_users).post(handlers::users::create_user))
        .route(
            "/{id}",
            patch(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .layer(guard());

    let company_routes = Router::new()
        .route("/", get(handlers::companies::list_companies))
        .route(
            "/{id}",
            get(handlers::companies::get_company)
                .patch(handlers::companies::update_company)
                .delete(handlers::companies::delete_company),
        )
        .layer(guard());

    let role_routes = Router::new()
        .route("/", get(handlers::rbac::list_roles))
        .route("/my-permissions", get(handlers::rbac::my_permissions))
        .route(
            "/{role}",
            put(handlers::rbac::update_role).delete(handlers::rbac::delete_role),
        )
        .layer(guard());

    let project_routes = Router::new()
        .route(
            "/",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/{id}",
            get(handlers::projects::get_project)
                .patch(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route("/{id}/assign-pm", patch(handlers::projects::assign_pm))
        .route("/{id}/members", get(handlers::projects::project_members))
        .layer(guard());

    let job_routes = Router::new()
        .route("/", get(handlers::jobs::list_jobs).post(handlers::jobs::create_job))
        .route(
            "/{id}",
            get(handlers::jobs::get_job)
                .patch(handlers::jobs::update_job)
                .delete(handlers::jobs::delete_job),
        )
        .route("/{id}/assign-foreman", patch(handlers::jobs::assign_foreman))
        .route("/{id}/assign-workers", patch(handlers::jobs::assign_workers))
        .layer(guard());

    let task_routes = Router::new()
        .route("/", get(handlers::tasks::list_tasks).post(handlers::tasks::create_task))
        .route("/my-tasks", get(handlers::tasks::my_tasks))
        .route(
            "/{id}",
            patch(handlers::tasks::update_task).delete(handlers::tasks::delete_task),
        )
        .layer(guard());

    let time_log_routes = Router::new()
        .route("/", get(handlers::time_logs::list_time_logs))
        .route("/clock-in", post(handlers::time_logs::clock_in))
        .route("/clock-out", post(handlers::time_logs::clock_out))
        .route("/{id}", patch(handlers::time_logs::update_time_log))
        .layer(guard());

    let photo_routes = Router::new()
        .route("/", get(handlers::photos::list_photos).post(handlers::photos::create_photo))
        .route("/{id}", delete(handlers::photos::delete_photo))
        .layer(guard());

    let chat_routes = Router::new()
        .route("/", post(handlers::chat::send_message))
        .route("/rooms", get(handlers::chat::list_rooms))
        .route("/general", get(handlers::chat::general_history))
        .route("/project/{project_id}", get(handlers::chat::project_history))
        .route("/private/{user_id}", get(handlers::chat::private_history))
        .layer(guard());

    let purchase_order_routes = Router::new()
        .route(
            "/",
            get(handlers::purchase_orders::list_purchase_orders)
                .post(handlers::purchase_orders::create_purchase_order),
        )
        .route(
            "/{id}",
            get(handlers::purchase_orders::get_purchase_order)
                .put(handlers::purchase_orders::update_purchase_order)
                .delete(handlers::purchase_orders::delete_purchase_order),
        )
        .route(
            "/{id}/{action}",
            patch(handlers::purchase_orders::transition_purchase_order),
        )
        .layer(guard());

    let payroll_routes = Router::new()
        .route("/preview", get(handlers::payroll::preview_payroll))
        .route("/run", post(handlers::payroll::run_payroll))
        .route("/history", get(handlers::payroll::payroll_history))
        .layer(guard());

    let invoice_routes = Router::new()
        .route(
            "/",
            get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
        )
        .route(
            "/{id}",
            get(handlers::invoices::get_invoice).patch(handlers::invoices::update_invoice),
        )
        .layer(guard());

    let daily_log_routes = Router::new()
        .route(
            "/",
            get(handlers::daily_logs::list_daily_logs).post(handlers::daily_logs::create_daily_log),
        )
        .route("/{id}", delete(handlers::daily_logs::delete_daily_log))
        .route("/{id}/verify", post(handlers::daily_logs::verify_daily_log))
        .layer(guard());

    let rfi_routes = Router::new()
        .route("/", get(handlers::rfis::list_rfis).post(handlers::rfis::create_rfi))
        .route("/stats", get(handlers::rfis::rfi_stats))
        .route(
            "/{id}",
            get(handlers::rfis::get_rfi)
                .patch(handlers::rfis::update_rfi)
                .delete(handlers::rfis::delete_rfi),
        )
        .route("/{id}/comments", post(handlers::rfis::add_rfi_comment))
        .layer(guard());

    let dashboard_routes = Router::new()
        .route("/stats", get(handlers::dashboard::get_stats))
        .layer(guard());

    let super_admin_routes = Router::new()
        .route("/stats", get(handlers::super_admin::platform_stats))
        .route("/users", get(handlers::super_admin::all_users))
        .route("/companies/{id}/approve", patch(handlers::super_admin::approve_company))
        .route("/companies/{id}/reject", patch(handlers::super_admin::reject_company))
        .layer(guard());

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/ws", get(realtime::socket::ws_handler))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/companies", company_routes)
        .nest("/api/roles", role_routes)
        .nest("/api/projects", project_routes)
        .nest("/api/jobs", job_routes)
        .nest("/api/tasks", task_routes)
        .nest("/api/timelogs", time_log_routes)
        .nest("/api/photos", photo_routes)
        .nest("/api/chat", chat_routes)
        .nest("/api/purchase-orders", purchase_order_routes)
        .nest("/api/payroll", payroll_routes)
        .nest("/api/invoices", invoice_routes)
        .nest("/api/dailylogs", daily_log_routes)
        .nest("/api/rfis", rfi_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/super-admin", super_admin_routes)
        .with_state(app_state)
}
