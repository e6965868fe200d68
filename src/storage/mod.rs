use std::sync::Arc;

use crate::models::{
    appointments::entities::{Appointment, AppointmentUpdate, NewAppointment},
    appointments::responses::CreatedAppointment,
    classes::entities::{Class, NewClass},
    notifications::entities::{NewNotification, Notification},
    subjects::entities::{Subject, SubjectFields},
    users::entities::{NewUser, PaymentRecord, User, UserChanges, UserRole},
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 根据刚写入的课时生成需要一并写入的通知
pub type NotificationFanOut<'a> = &'a (dyn Fn(&Appointment) -> Vec<NewNotification> + Send + Sync);

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 批量获取用户
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 按角色列出用户，按姓名排序
    async fn list_users_by_roles(&self, roles: &[UserRole]) -> Result<Vec<User>>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 更新用户信息
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>>;
    // 追加缴费记录并调整余额
    async fn record_payment(&self, id: i64, payment: PaymentRecord) -> Result<Option<User>>;

    /// 科目管理方法
    async fn create_subject(&self, fields: SubjectFields) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects(&self) -> Result<Vec<Subject>>;
    // 整体替换科目字段
    async fn update_subject(&self, id: i64, fields: SubjectFields) -> Result<Option<Subject>>;

    /// 班级管理方法
    // 创建班级并写入花名册（同一事务）
    async fn create_class(&self, class: NewClass) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn list_classes(&self) -> Result<Vec<Class>>;
    async fn list_classes_by_teacher(&self, teacher_id: i64) -> Result<Vec<Class>>;
    async fn list_classes_by_student(&self, student_id: i64) -> Result<Vec<Class>>;
    // 班级花名册中的学生 ID
    async fn list_class_student_ids(&self, class_id: i64) -> Result<Vec<i64>>;
    async fn is_student_enrolled(&self, class_id: i64, student_id: i64) -> Result<bool>;

    /// 课时管理方法
    // 创建课时并写入通知（同一事务）
    async fn create_appointment(
        &self,
        appointment: NewAppointment,
        fan_out: NotificationFanOut<'_>,
    ) -> Result<CreatedAppointment>;
    async fn get_appointment_by_id(&self, id: i64) -> Result<Option<Appointment>>;
    async fn list_appointments(&self) -> Result<Vec<Appointment>>;
    async fn list_appointments_by_class_ids(&self, class_ids: &[i64]) -> Result<Vec<Appointment>>;
    async fn update_appointment(
        &self,
        id: i64,
        update: AppointmentUpdate,
    ) -> Result<Option<Appointment>>;

    /// 通知方法
    async fn list_notifications(&self, user_id: i64) -> Result<Vec<Notification>>;
    // 仅当通知属于该用户时标记已读
    async fn mark_notification_read(&self, id: i64, user_id: i64)
    -> Result<Option<Notification>>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
