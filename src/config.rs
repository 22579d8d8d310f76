// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        ChatRepository, CompanyRepository, DailyLogRepository, DashboardRepository, InvoiceRepository, JobRepository,
        PayrollRepository, PhotoRepository, ProjectRepository, PurchaseOrderRepository, RbacRepository,
        RfiRepository, TaskRepository, TimeLogRepository, UserRepository,
    },
    realtime::{Notifier, RealtimeHub},
    services::{
        auth::AuthService, chat_service::ChatService, company_service::CompanyService,
        daily_log_service::DailyLogService, dashboard_service::DashboardService, invoice_service::InvoiceService,
        job_service::JobService, payroll_service::PayrollService, photo_service::PhotoService,
        project_service::ProjectService, purchase_order_service::PurchaseOrderService, rbac_service::RbacService,
        rfi_service::RfiService, super_admin_service::SuperAdminService, task_service::TaskService, time_log_service::TimeLogService,
        user_service::UserService,
    },
    visibility::VisibilityResolver,
};

const REALTIME_CHANNEL_CAPACITY: usize = 256;

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub database_max_connections: u32,
    pub jwt_ttl_days: i64,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            port: parse_or("PORT", 8080)?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_ttl_days: parse_or("JWT_TTL_DAYS", 7)?,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("{key} inválido: {raw}")),
        Err(_) => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub hub: RealtimeHub,
    pub resolver: VisibilityResolver,
    pub auth_service: AuthService,
    pub rbac_service: RbacService,
    pub company_service: CompanyService,
    pub user_service: UserService,
    pub project_service: ProjectService,
    pub job_service: JobService,
    pub task_service: TaskService,
    pub time_log_service: TimeLogService,
    pub photo_service: PhotoService,
    pub chat_service: ChatService,
    pub purchase_order_service: PurchaseOrderService,
    pub payroll_service: PayrollService,
    pub invoice_service: InvoiceService,
    pub daily_log_service: DailyLogService,
    pub rfi_service: RfiService,
    pub dashboard_service: DashboardService,
    pub super_admin_service: SuperAdminService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("falha ao conectar no banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::build(db_pool, settings))
    }

    // --- Monta o gráfico de dependências ---
    fn build(db_pool: PgPool, settings: &Settings) -> Self {
        let hub = RealtimeHub::new(REALTIME_CHANNEL_CAPACITY);
        let notifier: Arc<dyn Notifier> = Arc::new(hub.clone());

        let user_repo = UserRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());
        let project_repo = ProjectRepository::new(db_pool.clone());
        let job_repo = JobRepository::new(db_pool.clone());
        let task_repo = TaskRepository::new(db_pool.clone());
        let time_log_repo = TimeLogRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let resolver = VisibilityResolver::new(project_repo.clone(), job_repo.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            company_repo.clone(),
            settings.jwt_secret.clone(),
            settings.jwt_ttl_days,
            db_pool.clone(),
        );
        let rbac_service = RbacService::new(RbacRepository::new(db_pool.clone()), notifier.clone());
        let company_service = CompanyService::new(company_repo, user_repo.clone(), db_pool.clone());
        let user_service = UserService::new(user_repo.clone(), db_pool.clone());
        let project_service = ProjectService::new(project_repo.clone(), user_repo.clone(), resolver.clone());
        let job_service = JobService::new(
            job_repo,
            project_repo.clone(),
            project_service.clone(),
            resolver.clone(),
            db_pool.clone(),
        );
        let task_service = TaskService::new(task_repo.clone(), project_service.clone(), resolver.clone());
        let time_log_service =
            TimeLogService::new(time_log_repo.clone(), project_repo, user_repo.clone(), rbac_service.clone());
        let photo_service = PhotoService::new(
            PhotoRepository::new(db_pool.clone()),
            task_repo,
            project_service.clone(),
            resolver.clone(),
        );
        let chat_service = ChatService::new(
            ChatRepository::new(db_pool.clone()),
            user_repo,
            project_service.clone(),
            notifier,
        );
        let purchase_order_service =
            PurchaseOrderService::new(PurchaseOrderRepository::new(db_pool.clone()), project_service.clone());
        let payroll_service =
            PayrollService::new(PayrollRepository::new(db_pool.clone()), time_log_repo, db_pool.clone());
        let invoice_service = InvoiceService::new(
            InvoiceRepository::new(db_pool.clone()),
            project_service.clone(),
            resolver.clone(),
        );
        let daily_log_service = DailyLogService::new(
            DailyLogRepository::new(db_pool.clone()),
            project_service.clone(),
            resolver.clone(),
        );
        let rfi_service =
            RfiService::new(RfiRepository::new(db_pool.clone()), project_service.clone(), resolver.clone());
        let dashboard_service = DashboardService::new(dashboard_repo.clone(), resolver.clone());
        let super_admin_service = SuperAdminService::new(dashboard_repo, company_service.clone());

        Self {
            db_pool,
            hub,
            resolver,
            auth_service,
            rbac_service,
            company_service,
            user_service,
            project_service,
            job_service,
            task_service,
            time_log_service,
            photo_service,
            chat_service,
            purchase_order_service,
            payroll_service,
            invoice_service,
            daily_log_service,
            rfi_service,
            dashboard_service,
            super_admin_service,
        }
    }
}
