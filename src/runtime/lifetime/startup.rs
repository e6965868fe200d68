use actix_web::web;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{ObjectCache, create_cache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::meeting::{MeetingProvider, create_meeting_provider};
use crate::services::users::seed_admin;
use crate::services::{
    AppointmentService, AuthService, ClassService, NotificationService, SubjectService,
    UserService,
};
use crate::storage::Storage;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub services: AppServices,
}

/// 各业务服务，以 `web::Data` 的形式注入到每个 worker
#[derive(Clone)]
pub struct AppServices {
    pub auth: web::Data<AuthService>,
    pub users: web::Data<UserService>,
    pub subjects: web::Data<SubjectService>,
    pub classes: web::Data<ClassService>,
    pub appointments: web::Data<AppointmentService>,
    pub notifications: web::Data<NotificationService>,
}

impl AppServices {
    pub fn new(storage: Arc<dyn Storage>, meetings: Arc<dyn MeetingProvider>) -> Self {
        Self {
            auth: web::Data::new(AuthService::new(storage.clone())),
            users: web::Data::new(UserService::new(storage.clone())),
            subjects: web::Data::new(SubjectService::new(storage.clone())),
            classes: web::Data::new(ClassService::new(storage.clone(), meetings.clone())),
            appointments: web::Data::new(AppointmentService::new(storage.clone(), meetings)),
            notifications: web::Data::new(NotificationService::new(storage)),
        }
    }

    /// 注册到 App 的共享数据
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.users.clone())
            .app_data(self.subjects.clone())
            .app_data(self.classes.clone())
            .app_data(self.appointments.clone())
            .app_data(self.notifications.clone());
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存、会议服务和业务服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 其他 crate 可能已经安装过，忽略重复安装
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认管理员账号（如果需要）
    if seed_admin(&storage).await?.is_none() {
        debug!("Users already exist, skipping admin seed");
    }

    // 创建缓存实例
    let cache = create_cache(&config.cache)?;
    warn!("{} cache backend initialized", config.cache.cache_type);

    let meetings = create_meeting_provider(&config.meeting)?;
    warn!(
        "Meeting provider '{}' initialized with base URL {}",
        config.meeting.provider, config.meeting.base_url
    );

    let services = AppServices::new(storage.clone(), meetings);

    Ok(StartupContext {
        storage,
        cache,
        services,
    })
}
