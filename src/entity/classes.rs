//! 班级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub class_code: String,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub start_date: String,
    pub end_date: String,
    #[sea_orm(column_type = "Text")]
    pub week_days: String,
    #[sea_orm(column_type = "Text")]
    pub time_per_day: String,
    #[sea_orm(column_type = "Text")]
    pub duration_per_day: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub custom_hour_price: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub custom_teacher_salary: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_notes: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(has_many = "super::class_students::Entity")]
    ClassStudents,
    #[sea_orm(has_many = "super::appointments::Entity")]
    Appointments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::class_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassStudents.def()
    }
}

impl Related<super::appointments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_class(self) -> crate::models::classes::entities::Class {
        use crate::models::classes::entities::{Class, Recurrence};

        Class {
            id: self.id,
            class_code: self.class_code,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            start_date: super::parse_date(&self.start_date),
            end_date: super::parse_date(&self.end_date),
            recurrence: Recurrence {
                week_days: serde_json::from_str(&self.week_days).unwrap_or_default(),
                time_per_day: serde_json::from_str(&self.time_per_day).unwrap_or_default(),
                duration_per_day: serde_json::from_str(&self.duration_per_day)
                    .unwrap_or_default(),
            },
            custom_hour_price: self.custom_hour_price,
            custom_teacher_salary: self.custom_teacher_salary,
            admin_notes: self.admin_notes,
            teacher_notes: self.teacher_notes,
            is_active: self.is_active,
            created_at: super::timestamp_to_datetime(self.created_at),
            updated_at: super::timestamp_to_datetime(self.updated_at),
        }
    }
}
