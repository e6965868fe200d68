//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{Result, TutorHubError};
use crate::models::notifications::entities::Notification;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 列出用户通知，最新的在前
    pub async fn list_notifications_impl(&self, user_id: i64) -> Result<Vec<Notification>> {
        let result = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to list notifications: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_notification()).collect())
    }

    /// 标记通知为已读，ID 与用户必须同时匹配
    pub async fn mark_notification_read_impl(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Notification>> {
        let Some(existing) = Notifications::find()
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to query notification: {e}"))
            })?
        else {
            return Ok(None);
        };

        // 已读时不再写库
        if existing.is_read {
            return Ok(Some(existing.into_notification()));
        }

        let mut model: ActiveModel = existing.into();
        model.is_read = Set(true);

        let result = model.update(&self.db).await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to mark notification as read: {e}"))
        })?;

        Ok(Some(result.into_notification()))
    }

    /// 获取用户未读通知数量
    pub async fn count_unread_notifications_impl(&self, user_id: i64) -> Result<u64> {
        Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to count notifications: {e}"))
            })
    }

    /// 标记用户所有通知为已读
    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<u64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to mark notifications: {e}"))
            })?;

        Ok(result.rows_affected)
    }
}
