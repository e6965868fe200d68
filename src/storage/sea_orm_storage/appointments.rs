//! 课时存储操作

use super::SeaOrmStorage;
use crate::entity::appointments::{ActiveModel, Column, Entity as Appointments};
use crate::entity::format_date;
use crate::entity::notifications::ActiveModel as NotificationActiveModel;
use crate::errors::{Result, TutorHubError};
use crate::models::appointments::{
    entities::{Appointment, AppointmentStatus, AppointmentUpdate, NewAppointment},
    responses::CreatedAppointment,
};
use crate::storage::NotificationFanOut;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建课时，课时与通知在同一事务中写入
    pub async fn create_appointment_impl(
        &self,
        req: NewAppointment,
        fan_out: NotificationFanOut<'_>,
    ) -> Result<CreatedAppointment> {
        let now = chrono::Utc::now().timestamp();

        let txn = self.db.begin().await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to begin transaction: {e}"))
        })?;

        let model = ActiveModel {
            appointment_code: Set(format!("APT-{}", uuid::Uuid::new_v4())),
            class_id: Set(req.class_id),
            date: Set(format_date(req.date)),
            time: Set(req.time.clone()),
            duration: Set(req.duration),
            meet_link: Set(Some(req.meet_link)),
            status: Set(AppointmentStatus::Scheduled.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let appointment = model
            .insert(&txn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => TutorHubError::conflict(format!(
                    "Class {} already has an appointment on {} at {}",
                    req.class_id, req.date, req.time
                )),
                _ => {
                    TutorHubError::database_operation(format!("Failed to create appointment: {e}"))
                }
            })?
            .into_appointment();

        let mut notifications = Vec::new();
        for notification in fan_out(&appointment) {
            let created = NotificationActiveModel {
                user_id: Set(notification.user_id),
                notification_type: Set(notification.notification_type.to_string()),
                title: Set(notification.title),
                message: Set(notification.message),
                is_read: Set(false),
                created_at: Set(now),
                scheduled_for: Set(notification.scheduled_for.map(|t| t.timestamp())),
                related_appointment_id: Set(notification.related_appointment_id),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to create notification: {e}"))
            })?;

            notifications.push(created.into_notification());
        }

        txn.commit().await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to commit appointment: {e}"))
        })?;

        Ok(CreatedAppointment {
            appointment,
            notifications_sent: notifications.len(),
            notifications,
        })
    }

    /// 通过 ID 获取课时
    pub async fn get_appointment_by_id_impl(&self, id: i64) -> Result<Option<Appointment>> {
        let result = Appointments::find_by_id(id).one(&self.db).await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to query appointment: {e}"))
        })?;

        Ok(result.map(|m| m.into_appointment()))
    }

    /// 列出全部课时，按日期和时间排序
    pub async fn list_appointments_impl(&self) -> Result<Vec<Appointment>> {
        let result = Appointments::find()
            .order_by_asc(Column::Date)
            .order_by_asc(Column::Time)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to list appointments: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_appointment()).collect())
    }

    /// 列出指定班级的课时
    pub async fn list_appointments_by_class_ids_impl(
        &self,
        class_ids: &[i64],
    ) -> Result<Vec<Appointment>> {
        // 空集合直接返回，不生成 IN () 查询
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Appointments::find()
            .filter(Column::ClassId.is_in(class_ids.iter().copied()))
            .order_by_asc(Column::Date)
            .order_by_asc(Column::Time)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to list appointments: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_appointment()).collect())
    }

    /// 部分更新课时
    pub async fn update_appointment_impl(
        &self,
        id: i64,
        update: AppointmentUpdate,
    ) -> Result<Option<Appointment>> {
        let Some(existing) = self.get_appointment_by_id_impl(id).await? else {
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(existing));
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(note) = update.teacher_note {
            model.teacher_note = Set(Some(note));
        }
        if let Some(note) = update.student_note {
            model.student_note = Set(Some(note));
        }
        if let Some(attendance) = update.teacher_attendance {
            model.teacher_attendance = Set(Some(attendance));
        }
        if let Some(attendance) = update.student_attendance {
            model.student_attendance = Set(Some(attendance));
        }
        if let Some(rating) = update.teacher_rating {
            model.teacher_rating = Set(Some(rating));
        }
        if let Some(rating) = update.student_rating {
            model.student_rating = Set(Some(rating));
        }
        if let Some(assignment) = update.assignment {
            model.assignment = Set(Some(assignment));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let result = model.update(&self.db).await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to update appointment: {e}"))
        })?;

        Ok(Some(result.into_appointment()))
    }
}
