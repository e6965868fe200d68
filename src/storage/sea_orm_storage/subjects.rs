//! 科目存储操作

use super::SeaOrmStorage;
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{Result, TutorHubError};
use crate::models::subjects::entities::{Subject, SubjectFields};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建科目
    pub async fn create_subject_impl(&self, fields: SubjectFields) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(fields.name),
            sessions_per_week: Set(fields.sessions_per_week),
            durations: Set(serde_json::to_string(&fields.durations)?),
            price_per_duration: Set(serde_json::to_string(&fields.price_per_duration)?),
            is_active: Set(fields.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to create subject: {e}"))
        })?;

        Ok(result.into_subject())
    }

    /// 通过 ID 获取科目
    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id).one(&self.db).await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to query subject: {e}"))
        })?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 列出全部科目
    pub async fn list_subjects_impl(&self) -> Result<Vec<Subject>> {
        let result = Subjects::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to list subjects: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_subject()).collect())
    }

    /// 整体替换科目字段
    pub async fn update_subject_impl(
        &self,
        id: i64,
        fields: SubjectFields,
    ) -> Result<Option<Subject>> {
        if self.get_subject_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            name: Set(fields.name),
            sessions_per_week: Set(fields.sessions_per_week),
            durations: Set(serde_json::to_string(&fields.durations)?),
            price_per_duration: Set(serde_json::to_string(&fields.price_per_duration)?),
            is_active: Set(fields.is_active),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.update(&self.db).await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to update subject: {e}"))
        })?;

        Ok(Some(result.into_subject()))
    }
}
