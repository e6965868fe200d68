//! 课时实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub appointment_code: String,
    pub class_id: i64,
    pub date: String,
    pub time: String,
    pub duration: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_note: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub student_note: Option<String>,
    pub teacher_attendance: Option<bool>,
    pub student_attendance: Option<bool>,
    pub teacher_rating: Option<i32>,
    pub student_rating: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub assignment: Option<String>,
    pub meet_link: Option<String>,
    pub status: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notifications,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_appointment(self) -> crate::models::appointments::entities::Appointment {
        use crate::models::appointments::entities::{Appointment, AppointmentStatus};

        Appointment {
            id: self.id,
            appointment_code: self.appointment_code,
            class_id: self.class_id,
            date: super::parse_date(&self.date),
            time: self.time,
            duration: self.duration,
            teacher_note: self.teacher_note,
            student_note: self.student_note,
            teacher_attendance: self.teacher_attendance,
            student_attendance: self.student_attendance,
            teacher_rating: self.teacher_rating,
            student_rating: self.student_rating,
            assignment: self.assignment,
            meet_link: self.meet_link.unwrap_or_default(),
            status: self
                .status
                .parse::<AppointmentStatus>()
                .unwrap_or(AppointmentStatus::Scheduled),
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
