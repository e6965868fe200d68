pub mod create;
pub mod update;

use std::sync::Arc;

use crate::errors::Result;
use crate::meeting::MeetingProvider;
use crate::models::appointments::{
    entities::{Appointment, AppointmentStatus},
    requests::{AttendanceRequest, CreateAppointmentRequest, FeedbackRequest},
    responses::CreatedAppointment,
};
use crate::models::auth::Caller;
use crate::models::users::entities::UserRole;
use crate::services::classes::visibility::visible_classes;
use crate::services::guard::{Access, authorize};
use crate::storage::Storage;

pub struct AppointmentService {
    storage: Arc<dyn Storage>,
    meetings: Arc<dyn MeetingProvider>,
}

impl AppointmentService {
    pub fn new(storage: Arc<dyn Storage>, meetings: Arc<dyn MeetingProvider>) -> Self {
        Self { storage, meetings }
    }

    // 按角色列出课时
    pub async fn list_appointments(&self, caller: Option<&Caller>) -> Result<Vec<Appointment>> {
        let caller = authorize(caller, Access::Authenticated)?;
        match caller.role {
            UserRole::Admin => self.storage.list_appointments().await,
            UserRole::Teacher | UserRole::Student => {
                let class_ids: Vec<i64> = visible_classes(&self.storage, caller)
                    .await?
                    .into_iter()
                    .map(|c| c.id)
                    .collect();
                // 没有可见班级时不查询
                if class_ids.is_empty() {
                    return Ok(Vec::new());
                }
                self.storage.list_appointments_by_class_ids(&class_ids).await
            }
        }
    }

    // 创建课时（申请会议链接并通知教师与学生）
    pub async fn create_appointment(
        &self,
        caller: Option<&Caller>,
        req: CreateAppointmentRequest,
    ) -> Result<CreatedAppointment> {
        create::create_appointment(self, caller, req).await
    }

    // 记录出勤
    pub async fn record_attendance(
        &self,
        caller: Option<&Caller>,
        id: i64,
        req: AttendanceRequest,
    ) -> Result<Appointment> {
        update::record_attendance(self, caller, id, req).await
    }

    // 提交课后反馈
    pub async fn submit_feedback(
        &self,
        caller: Option<&Caller>,
        id: i64,
        req: FeedbackRequest,
    ) -> Result<Appointment> {
        update::submit_feedback(self, caller, id, req).await
    }

    // 管理员修改课时状态
    pub async fn update_status(
        &self,
        caller: Option<&Caller>,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment> {
        update::update_status(self, caller, id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classes::entities::{NewClass, Recurrence};
    use crate::models::notifications::entities::NotificationType;
    use crate::models::subjects::entities::SubjectFields;
    use crate::services::test_support;
    use actix_web::http::StatusCode;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    struct Fixture {
        storage: Arc<dyn Storage>,
        service: AppointmentService,
        admin: Caller,
        teacher: Caller,
        other_teacher: Caller,
        student: Caller,
        outsider: Caller,
        class_id: i64,
        other_class_id: i64,
    }

    async fn class(
        storage: &Arc<dyn Storage>,
        subject_id: i64,
        teacher: i64,
        students: Vec<i64>,
    ) -> i64 {
        storage
            .create_class(NewClass {
                class_code: format!("CLS-T{teacher}"),
                subject_id,
                teacher_id: teacher,
                student_ids: students,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                recurrence: Recurrence::default(),
                custom_hour_price: None,
                custom_teacher_salary: None,
                admin_notes: None,
                teacher_notes: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn fixture() -> Fixture {
        let storage = test_support::storage().await;
        let admin = test_support::user(&storage, "admin", UserRole::Admin).await;
        let teacher = test_support::user(&storage, "teacher", UserRole::Teacher).await;
        let other_teacher = test_support::user(&storage, "teacher2", UserRole::Teacher).await;
        let student = test_support::user(&storage, "alice", UserRole::Student).await;
        let outsider = test_support::user(&storage, "bob", UserRole::Student).await;
        let subject = storage
            .create_subject(SubjectFields {
                name: "Algebra".to_string(),
                sessions_per_week: 1,
                durations: vec![60],
                price_per_duration: BTreeMap::new(),
                is_active: true,
            })
            .await
            .unwrap();

        let class_id = class(&storage, subject.id, teacher.id, vec![student.id]).await;
        let other_class_id = class(&storage, subject.id, other_teacher.id, vec![outsider.id]).await;

        Fixture {
            service: AppointmentService::new(storage.clone(), test_support::meetings()),
            storage,
            admin,
            teacher,
            other_teacher,
            student,
            outsider,
            class_id,
            other_class_id,
        }
    }

    fn request(class_id: i64, date: &str, time: &str) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            class_id: Some(class_id),
            date: Some(date.to_string()),
            time: Some(time.to_string()),
            duration: Some(60),
        }
    }

    #[tokio::test]
    async fn test_create_appointment_notifies_teacher_and_students() {
        let f = fixture().await;
        let created = f
            .service
            .create_appointment(Some(&f.admin), request(f.class_id, "2024-01-08", "10:00"))
            .await
            .unwrap();

        let appointment = &created.appointment;
        assert!(appointment.appointment_code.starts_with("APT-"));
        assert!(appointment.meet_link.starts_with("https://meet.example/algebra-class-"));
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);

        assert_eq!(created.notifications_sent, 2);
        assert_eq!(created.notifications.len(), 2);
        let mut recipients: Vec<i64> = created.notifications.iter().map(|n| n.user_id).collect();
        recipients.sort_unstable();
        assert_eq!(recipients, vec![f.teacher.id, f.student.id]);
        for notification in &created.notifications {
            assert_eq!(notification.notification_type, NotificationType::UpcomingClass);
            assert_eq!(notification.related_appointment_id, Some(appointment.id));
            assert!(!notification.read);
        }

        let stored = f.storage.list_notifications(f.student.id).await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_meeting_failure_persists_nothing() {
        let f = fixture().await;
        let service = AppointmentService::new(
            f.storage.clone(),
            Arc::new(test_support::FailingMeetings),
        );

        let err = service
            .create_appointment(Some(&f.admin), request(f.class_id, "2024-01-08", "10:00"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        assert!(f.storage.list_appointments().await.unwrap().is_empty());
        assert!(f.storage.list_notifications(f.teacher.id).await.unwrap().is_empty());
        assert!(f.storage.list_notifications(f.student.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_same_slot_twice_is_conflict() {
        let f = fixture().await;
        f.service
            .create_appointment(Some(&f.admin), request(f.class_id, "2024-01-08", "10:00"))
            .await
            .unwrap();

        let err = f
            .service
            .create_appointment(Some(&f.admin), request(f.class_id, "2024-01-08", "10:00"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        assert_eq!(f.storage.list_appointments().await.unwrap().len(), 1);
        assert_eq!(f.storage.list_notifications(f.student.id).await.unwrap().len(), 1);

        // 其他班级同一时段不受影响
        f.service
            .create_appointment(Some(&f.admin), request(f.other_class_id, "2024-01-08", "10:00"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_appointment_errors() {
        let f = fixture().await;

        let err = f
            .service
            .create_appointment(Some(&f.admin), request(9999, "2024-01-08", "10:00"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = f
            .service
            .create_appointment(Some(&f.admin), request(f.class_id, "2024-01-08", "7pm"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = f
            .service
            .create_appointment(Some(&f.teacher), request(f.class_id, "2024-01-08", "10:00"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_appointments_by_role() {
        let f = fixture().await;
        for (class_id, date) in [
            (f.class_id, "2024-01-10"),
            (f.class_id, "2024-01-08"),
            (f.other_class_id, "2024-01-09"),
        ] {
            f.service
                .create_appointment(Some(&f.admin), request(class_id, date, "10:00"))
                .await
                .unwrap();
        }

        let all = f.service.list_appointments(Some(&f.admin)).await.unwrap();
        assert_eq!(all.len(), 3);

        let mine = f.service.list_appointments(Some(&f.teacher)).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|a| a.class_id == f.class_id));
        // 按日期排序
        assert!(mine[0].date < mine[1].date);

        let theirs = f
            .service
            .list_appointments(Some(&f.other_teacher))
            .await
            .unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].class_id, f.other_class_id);

        let student = f.service.list_appointments(Some(&f.student)).await.unwrap();
        assert_eq!(student.len(), 2);
    }

    #[tokio::test]
    async fn test_list_appointments_without_classes() {
        let f = fixture().await;
        let lonely = test_support::user(&f.storage, "carol", UserRole::Student).await;
        assert!(
            f.service
                .list_appointments(Some(&lonely))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_record_attendance() {
        let f = fixture().await;
        let id = f
            .service
            .create_appointment(Some(&f.admin), request(f.class_id, "2024-01-08", "10:00"))
            .await
            .unwrap()
            .appointment
            .id;

        let updated = f
            .service
            .record_attendance(
                Some(&f.teacher),
                id,
                AttendanceRequest {
                    student_attendance: Some(true),
                    teacher_attendance: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.student_attendance, Some(true));
        assert_eq!(updated.teacher_attendance, Some(true));

        // 部分更新只改动传入的字段
        let updated = f
            .service
            .record_attendance(
                Some(&f.student),
                id,
                AttendanceRequest {
                    student_attendance: Some(false),
                    teacher_attendance: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.student_attendance, Some(false));
        assert_eq!(updated.teacher_attendance, Some(true));

        let err = f
            .service
            .record_attendance(
                Some(&f.student),
                id,
                AttendanceRequest {
                    student_attendance: None,
                    teacher_attendance: Some(false),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        for outsider in [f.outsider, f.other_teacher] {
            let err = f
                .service
                .record_attendance(Some(&outsider), id, AttendanceRequest::default())
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        }

        let err = f
            .service
            .record_attendance(Some(&f.admin), 9999, AttendanceRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_feedback_per_side() {
        let f = fixture().await;
        let id = f
            .service
            .create_appointment(Some(&f.admin), request(f.class_id, "2024-01-08", "10:00"))
            .await
            .unwrap()
            .appointment
            .id;

        let updated = f
            .service
            .submit_feedback(
                Some(&f.teacher),
                id,
                FeedbackRequest {
                    note: Some("Covered factoring".to_string()),
                    rating: Some(4),
                    assignment: Some("Exercises 1-10".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.teacher_note.as_deref(), Some("Covered factoring"));
        assert_eq!(updated.teacher_rating, Some(4));
        assert_eq!(updated.assignment.as_deref(), Some("Exercises 1-10"));

        let updated = f
            .service
            .submit_feedback(
                Some(&f.student),
                id,
                FeedbackRequest {
                    note: Some("Great".to_string()),
                    rating: Some(5),
                    assignment: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.student_note.as_deref(), Some("Great"));
        assert_eq!(updated.student_rating, Some(5));
        assert_eq!(updated.teacher_rating, Some(4));

        let err = f
            .service
            .submit_feedback(
                Some(&f.student),
                id,
                FeedbackRequest {
                    rating: Some(6),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = f
            .service
            .submit_feedback(Some(&f.admin), id, FeedbackRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_status_admin_only() {
        let f = fixture().await;
        let id = f
            .service
            .create_appointment(Some(&f.admin), request(f.class_id, "2024-01-08", "10:00"))
            .await
            .unwrap()
            .appointment
            .id;

        let updated = f
            .service
            .update_status(Some(&f.admin), id, AppointmentStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, AppointmentStatus::Completed);

        let err = f
            .service
            .update_status(Some(&f.teacher), id, AppointmentStatus::Cancelled)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
