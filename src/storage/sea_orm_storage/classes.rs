//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::class_students::{
    ActiveModel as ClassStudentActiveModel, Column as ClassStudentColumn,
    Entity as ClassStudents,
};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::format_date;
use crate::errors::{Result, TutorHubError};
use crate::models::classes::entities::{Class, NewClass};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建班级，班级与花名册在同一事务中写入
    pub async fn create_class_impl(&self, req: NewClass) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let txn = self.db.begin().await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to begin transaction: {e}"))
        })?;

        let model = ActiveModel {
            class_code: Set(req.class_code),
            subject_id: Set(req.subject_id),
            teacher_id: Set(req.teacher_id),
            start_date: Set(format_date(req.start_date)),
            end_date: Set(format_date(req.end_date)),
            week_days: Set(serde_json::to_string(&req.recurrence.week_days)?),
            time_per_day: Set(serde_json::to_string(&req.recurrence.time_per_day)?),
            duration_per_day: Set(serde_json::to_string(&req.recurrence.duration_per_day)?),
            custom_hour_price: Set(req.custom_hour_price),
            custom_teacher_salary: Set(req.custom_teacher_salary),
            admin_notes: Set(req.admin_notes),
            teacher_notes: Set(req.teacher_notes),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let class = model.insert(&txn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                TutorHubError::conflict("Class code already exists")
            }
            _ => TutorHubError::database_operation(format!("Failed to create class: {e}")),
        })?;

        for student_id in req.student_ids {
            ClassStudentActiveModel {
                class_id: Set(class.id),
                student_id: Set(student_id),
                joined_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to add student to class: {e}"))
            })?;
        }

        txn.commit().await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to commit class: {e}"))
        })?;

        Ok(class.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Failed to query class: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 列出全部班级
    pub async fn list_classes_impl(&self) -> Result<Vec<Class>> {
        let result = Classes::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to list classes: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_class()).collect())
    }

    /// 列出教师负责的班级
    pub async fn list_classes_by_teacher_impl(&self, teacher_id: i64) -> Result<Vec<Class>> {
        let result = Classes::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to list classes: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_class()).collect())
    }

    /// 列出学生所在的班级
    pub async fn list_classes_by_student_impl(&self, student_id: i64) -> Result<Vec<Class>> {
        let class_ids: Vec<i64> = ClassStudents::find()
            .select_only()
            .column(ClassStudentColumn::ClassId)
            .filter(ClassStudentColumn::StudentId.eq(student_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to query class roster: {e}"))
            })?;

        // 没有花名册记录时不再查询
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Classes::find()
            .filter(Column::Id.is_in(class_ids))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to list classes: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_class()).collect())
    }

    /// 班级花名册中的学生 ID
    pub async fn list_class_student_ids_impl(&self, class_id: i64) -> Result<Vec<i64>> {
        ClassStudents::find()
            .select_only()
            .column(ClassStudentColumn::StudentId)
            .filter(ClassStudentColumn::ClassId.eq(class_id))
            .order_by_asc(ClassStudentColumn::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to query class roster: {e}"))
            })
    }

    pub async fn is_student_enrolled_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let count = ClassStudents::find()
            .filter(ClassStudentColumn::ClassId.eq(class_id))
            .filter(ClassStudentColumn::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to query class roster: {e}"))
            })?;

        Ok(count > 0)
    }
}
