//! 课时的出勤、反馈与状态更新

use tracing::info;

use super::AppointmentService;
use crate::errors::{Result, TutorHubError};
use crate::models::appointments::{
    entities::{Appointment, AppointmentStatus, AppointmentUpdate},
    requests::{AttendanceRequest, FeedbackRequest},
};
use crate::models::auth::Caller;
use crate::models::classes::entities::Class;
use crate::models::users::entities::UserRole;
use crate::services::guard::{Access, authorize};

impl AppointmentService {
    /// 读取课时及其所属班级
    async fn load(&self, id: i64) -> Result<(Appointment, Class)> {
        let appointment = self
            .storage
            .get_appointment_by_id(id)
            .await?
            .ok_or_else(|| TutorHubError::not_found(format!("Appointment {id} not found")))?;
        let class = self
            .storage
            .get_class_by_id(appointment.class_id)
            .await?
            .ok_or_else(|| {
                TutorHubError::not_found(format!("Class {} not found", appointment.class_id))
            })?;
        Ok((appointment, class))
    }

    async fn ensure_class_member(&self, caller: &Caller, class: &Class) -> Result<()> {
        let is_member = match caller.role {
            UserRole::Admin => true,
            UserRole::Teacher => class.teacher_id == caller.id,
            UserRole::Student => self.storage.is_student_enrolled(class.id, caller.id).await?,
        };
        if is_member {
            Ok(())
        } else {
            Err(TutorHubError::authorization(
                "You are not a member of this class",
            ))
        }
    }

    async fn apply(&self, id: i64, update: AppointmentUpdate) -> Result<Appointment> {
        self.storage
            .update_appointment(id, update)
            .await?
            .ok_or_else(|| TutorHubError::not_found(format!("Appointment {id} not found")))
    }
}

pub async fn record_attendance(
    service: &AppointmentService,
    caller: Option<&Caller>,
    id: i64,
    req: AttendanceRequest,
) -> Result<Appointment> {
    let caller = authorize(caller, Access::Authenticated)?;
    let (_, class) = service.load(id).await?;
    service.ensure_class_member(caller, &class).await?;

    let update = match caller.role {
        UserRole::Admin | UserRole::Teacher => AppointmentUpdate {
            student_attendance: req.student_attendance,
            teacher_attendance: req.teacher_attendance,
            ..Default::default()
        },
        UserRole::Student => {
            if req.teacher_attendance.is_some() {
                return Err(TutorHubError::authorization(
                    "Students can only record their own attendance",
                ));
            }
            AppointmentUpdate {
                student_attendance: req.student_attendance,
                ..Default::default()
            }
        }
    };

    let appointment = service.apply(id, update).await?;
    info!("Attendance recorded for appointment {} by user {}", id, caller.id);
    Ok(appointment)
}

pub async fn submit_feedback(
    service: &AppointmentService,
    caller: Option<&Caller>,
    id: i64,
    req: FeedbackRequest,
) -> Result<Appointment> {
    let caller = authorize(caller, Access::Authenticated)?;

    if let Some(rating) = req.rating
        && !(1..=5).contains(&rating)
    {
        return Err(TutorHubError::validation("Rating must be between 1 and 5"));
    }

    let (_, class) = service.load(id).await?;

    let update = match caller.role {
        UserRole::Admin => {
            return Err(TutorHubError::authorization(
                "Feedback is written by the class teacher or its students",
            ));
        }
        UserRole::Teacher => {
            service.ensure_class_member(caller, &class).await?;
            AppointmentUpdate {
                teacher_note: req.note,
                teacher_rating: req.rating,
                assignment: req.assignment,
                ..Default::default()
            }
        }
        UserRole::Student => {
            service.ensure_class_member(caller, &class).await?;
            if req.assignment.is_some() {
                return Err(TutorHubError::authorization(
                    "Only the teacher can set an assignment",
                ));
            }
            AppointmentUpdate {
                student_note: req.note,
                student_rating: req.rating,
                ..Default::default()
            }
        }
    };

    let appointment = service.apply(id, update).await?;
    info!("Feedback submitted for appointment {} by user {}", id, caller.id);
    Ok(appointment)
}

pub async fn update_status(
    service: &AppointmentService,
    caller: Option<&Caller>,
    id: i64,
    status: AppointmentStatus,
) -> Result<Appointment> {
    let caller = authorize(caller, Access::Admin)?;
    let appointment = service
        .apply(
            id,
            AppointmentUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await?;
    info!(
        "Appointment {} marked {} by user {}",
        id, status, caller.id
    );
    Ok(appointment)
}
