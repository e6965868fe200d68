use chrono::NaiveTime;
use tracing::{error, info};

use super::AppointmentService;
use crate::errors::{Result, TutorHubError};
use crate::models::appointments::{
    entities::{Appointment, NewAppointment},
    requests::CreateAppointmentRequest,
    responses::CreatedAppointment,
};
use crate::models::auth::Caller;
use crate::models::notifications::entities::NewNotification;
use crate::services::guard::{Access, authorize};
use crate::services::notifications::notify_appointment_created;
use crate::utils::validate::{parse_date, validate_time};

pub async fn create_appointment(
    service: &AppointmentService,
    caller: Option<&Caller>,
    req: CreateAppointmentRequest,
) -> Result<CreatedAppointment> {
    let caller = authorize(caller, Access::Admin)?;

    let class_id = req
        .class_id
        .ok_or_else(|| TutorHubError::validation("classId is required"))?;
    let date = parse_date(
        req.date
            .as_deref()
            .ok_or_else(|| TutorHubError::validation("date is required"))?,
    )
    .map_err(TutorHubError::validation)?;
    let time = req
        .time
        .ok_or_else(|| TutorHubError::validation("time is required"))?;
    validate_time(&time).map_err(TutorHubError::validation)?;
    let duration = req
        .duration
        .filter(|d| *d > 0)
        .ok_or_else(|| TutorHubError::validation("duration must be a positive number of minutes"))?;

    let storage = &service.storage;
    let class = storage
        .get_class_by_id(class_id)
        .await?
        .ok_or_else(|| TutorHubError::not_found(format!("Class {class_id} not found")))?;
    let subject = storage
        .get_subject_by_id(class.subject_id)
        .await?
        .ok_or_else(|| {
            TutorHubError::not_found(format!("Subject {} not found", class.subject_id))
        })?;

    let start_time = NaiveTime::parse_from_str(&time, "%H:%M")?;
    let start = date.and_time(start_time).and_utc();

    // 先申请会议链接，失败时不写入任何记录
    let meet_link = service
        .meetings
        .create_meeting(&format!("{} class", subject.name), start, duration)
        .await
        .map_err(|e| {
            error!("Meeting creation failed for class {}: {}", class_id, e);
            match e {
                TutorHubError::MeetingProvider(_) => e,
                other => TutorHubError::meeting_provider(other.message().to_string()),
            }
        })?;

    let mut recipients = vec![class.teacher_id];
    recipients.extend(storage.list_class_student_ids(class_id).await?);

    let fan_out = |appointment: &Appointment| -> Vec<NewNotification> {
        notify_appointment_created(appointment, &recipients)
    };

    let created = storage
        .create_appointment(
            NewAppointment {
                class_id,
                date,
                time,
                duration,
                meet_link,
            },
            &fan_out,
        )
        .await?;

    info!(
        "Appointment {} created for class {} by user {}, {} notifications sent",
        created.appointment.appointment_code,
        class_id,
        caller.id,
        created.notifications.len()
    );
    Ok(created)
}
