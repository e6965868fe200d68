pub mod create;
pub mod schedule;
pub mod view;
pub mod visibility;

use std::sync::Arc;

use crate::errors::Result;
use crate::meeting::MeetingProvider;
use crate::models::appointments::entities::Appointment;
use crate::models::auth::Caller;
use crate::models::classes::{
    entities::Class, requests::CreateClassRequest, responses::ClassView,
};
use crate::services::AppointmentService;
use crate::storage::Storage;

pub struct ClassService {
    storage: Arc<dyn Storage>,
    meetings: Arc<dyn MeetingProvider>,
}

impl ClassService {
    pub fn new(storage: Arc<dyn Storage>, meetings: Arc<dyn MeetingProvider>) -> Self {
        Self { storage, meetings }
    }

    pub(crate) fn appointments(&self) -> AppointmentService {
        AppointmentService::new(self.storage.clone(), self.meetings.clone())
    }

    // 按角色列出班级
    pub async fn list_classes(&self, caller: Option<&Caller>) -> Result<Vec<ClassView>> {
        view::list_classes(self, caller).await
    }

    // 创建班级
    pub async fn create_class(
        &self,
        caller: Option<&Caller>,
        req: CreateClassRequest,
    ) -> Result<Class> {
        create::create_class(self, caller, req).await
    }

    // 班级详情
    pub async fn get_class(&self, caller: Option<&Caller>, class_id: i64) -> Result<ClassView> {
        view::get_class(self, caller, class_id).await
    }

    // 按每周规律生成课时
    pub async fn schedule_class(
        &self,
        caller: Option<&Caller>,
        class_id: i64,
    ) -> Result<Vec<Appointment>> {
        schedule::schedule_class(self, caller, class_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classes::entities::{NewClass, Weekday};
    use crate::models::subjects::entities::SubjectFields;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;
    use actix_web::http::StatusCode;
    use std::collections::BTreeMap;

    struct Fixture {
        storage: Arc<dyn Storage>,
        service: ClassService,
        admin: Caller,
        teacher: Caller,
        other_teacher: Caller,
        students: [Caller; 2],
        subject_id: i64,
    }

    async fn fixture() -> Fixture {
        let storage = test_support::storage().await;
        let admin = test_support::user(&storage, "admin", UserRole::Admin).await;
        let teacher = test_support::user(&storage, "teacher", UserRole::Teacher).await;
        let other_teacher = test_support::user(&storage, "teacher2", UserRole::Teacher).await;
        let s1 = test_support::user(&storage, "alice", UserRole::Student).await;
        let s2 = test_support::user(&storage, "bob", UserRole::Student).await;
        let subject = storage
            .create_subject(SubjectFields {
                name: "Algebra".to_string(),
                sessions_per_week: 2,
                durations: vec![60, 90],
                price_per_duration: BTreeMap::new(),
                is_active: true,
            })
            .await
            .unwrap();

        Fixture {
            service: ClassService::new(storage.clone(), test_support::meetings()),
            storage,
            admin,
            teacher,
            other_teacher,
            students: [s1, s2],
            subject_id: subject.id,
        }
    }

    fn request(f: &Fixture) -> CreateClassRequest {
        CreateClassRequest {
            subject_id: Some(f.subject_id),
            teacher_id: Some(f.teacher.id),
            student_ids: vec![f.students[0].id, f.students[1].id],
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-03-01".to_string()),
            week_days: vec![Weekday::Mon, Weekday::Wed],
            time_per_day: BTreeMap::from([
                (Weekday::Mon, "10:00".to_string()),
                (Weekday::Wed, "14:00".to_string()),
            ]),
            duration_per_day: BTreeMap::from([(Weekday::Mon, 60), (Weekday::Wed, 90)]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_class_with_roster() {
        let f = fixture().await;
        let class = f
            .service
            .create_class(Some(&f.admin), request(&f))
            .await
            .unwrap();

        assert!(class.class_code.starts_with("CLS-"));
        assert_eq!(class.class_code.len(), 12);
        let roster = f.storage.list_class_student_ids(class.id).await.unwrap();
        assert_eq!(roster, vec![f.students[0].id, f.students[1].id]);
    }

    #[tokio::test]
    async fn test_recurrence_round_trip() {
        let f = fixture().await;
        let created = f
            .service
            .create_class(Some(&f.admin), request(&f))
            .await
            .unwrap();

        let view = f
            .service
            .get_class(Some(&f.admin), created.id)
            .await
            .unwrap();
        let recurrence = &view.class.recurrence;
        assert_eq!(recurrence.week_days, vec![Weekday::Mon, Weekday::Wed]);
        assert_eq!(recurrence.time_per_day[&Weekday::Mon], "10:00");
        assert_eq!(recurrence.time_per_day[&Weekday::Wed], "14:00");
        assert_eq!(recurrence.duration_per_day[&Weekday::Mon], 60);
        assert_eq!(recurrence.duration_per_day[&Weekday::Wed], 90);
        assert_eq!(view.subject_name.as_deref(), Some("Algebra"));
        assert_eq!(view.teacher_name.as_deref(), Some("TEACHER"));
        assert_eq!(view.students.as_ref().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_duplicate_students_are_collapsed() {
        let f = fixture().await;
        let mut req = request(&f);
        req.student_ids = vec![f.students[0].id, f.students[0].id];
        let class = f.service.create_class(Some(&f.admin), req).await.unwrap();

        let roster = f.storage.list_class_student_ids(class.id).await.unwrap();
        assert_eq!(roster, vec![f.students[0].id]);
    }

    #[tokio::test]
    async fn test_create_class_validation() {
        let f = fixture().await;

        let mut missing = request(&f);
        missing.teacher_id = None;
        let err = f.service.create_class(Some(&f.admin), missing).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let mut reversed = request(&f);
        reversed.end_date = Some("2023-12-01".to_string());
        let err = f.service.create_class(Some(&f.admin), reversed).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let mut undeclared = request(&f);
        undeclared
            .time_per_day
            .insert(Weekday::Fri, "09:00".to_string());
        let err = f
            .service
            .create_class(Some(&f.admin), undeclared)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let mut bad_time = request(&f);
        bad_time
            .time_per_day
            .insert(Weekday::Mon, "25:00".to_string());
        let err = f.service.create_class(Some(&f.admin), bad_time).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let mut student_as_teacher = request(&f);
        student_as_teacher.teacher_id = Some(f.students[0].id);
        let err = f
            .service
            .create_class(Some(&f.admin), student_as_teacher)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let mut unknown_student = request(&f);
        unknown_student.student_ids.push(9999);
        let err = f
            .service
            .create_class(Some(&f.admin), unknown_student)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let mut unknown_subject = request(&f);
        unknown_subject.subject_id = Some(9999);
        let err = f
            .service
            .create_class(Some(&f.admin), unknown_subject)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let mut too_long = request(&f);
        too_long.end_date = Some("2030-01-01".to_string());
        let err = f.service.create_class(Some(&f.admin), too_long).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        // 失败的请求不应留下任何班级
        assert!(f.storage.list_classes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_admin_creates_classes() {
        let f = fixture().await;
        let err = f
            .service
            .create_class(Some(&f.teacher), request(&f))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_classes_by_role() {
        let f = fixture().await;
        let class = f
            .service
            .create_class(Some(&f.admin), request(&f))
            .await
            .unwrap();

        let admin_view = f.service.list_classes(Some(&f.admin)).await.unwrap();
        assert_eq!(admin_view.len(), 1);
        assert!(admin_view[0].students.is_some());
        assert!(admin_view[0].appointments.is_some());

        let teacher_view = f.service.list_classes(Some(&f.teacher)).await.unwrap();
        assert_eq!(teacher_view.len(), 1);
        assert_eq!(teacher_view[0].class.id, class.id);
        assert_eq!(teacher_view[0].subject_name.as_deref(), Some("Algebra"));
        assert!(teacher_view[0].students.is_none());

        assert!(
            f.service
                .list_classes(Some(&f.other_teacher))
                .await
                .unwrap()
                .is_empty()
        );

        let student_view = f.service.list_classes(Some(&f.students[1])).await.unwrap();
        assert_eq!(student_view.len(), 1);
    }

    #[tokio::test]
    async fn test_student_without_roster_gets_empty_list() {
        let f = fixture().await;
        let classes = f.service.list_classes(Some(&f.students[0])).await.unwrap();
        assert!(classes.is_empty());
    }

    #[tokio::test]
    async fn test_get_class_hidden_from_outsiders() {
        let f = fixture().await;
        let mut req = request(&f);
        req.student_ids = vec![f.students[0].id];
        let class = f.service.create_class(Some(&f.admin), req).await.unwrap();

        assert!(f.service.get_class(Some(&f.teacher), class.id).await.is_ok());
        assert!(f.service.get_class(Some(&f.students[0]), class.id).await.is_ok());

        for outsider in [f.other_teacher, f.students[1]] {
            let err = f
                .service
                .get_class(Some(&outsider), class.id)
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_schedule_class_is_idempotent() {
        let f = fixture().await;
        let mut req = request(&f);
        req.end_date = Some("2024-01-14".to_string());
        let class = f.service.create_class(Some(&f.admin), req).await.unwrap();

        let first = f
            .service
            .schedule_class(Some(&f.admin), class.id)
            .await
            .unwrap();
        assert_eq!(first.len(), 4);
        assert!(first.iter().all(|a| !a.meet_link.is_empty()));

        let second = f
            .service
            .schedule_class(Some(&f.admin), class.id)
            .await
            .unwrap();
        assert!(second.is_empty());

        let view = f.service.get_class(Some(&f.admin), class.id).await.unwrap();
        assert_eq!(view.appointments.map(|a| a.len()), Some(4));

        let err = f
            .service
            .schedule_class(Some(&f.teacher), class.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_concurrent_scheduling_creates_each_slot_once() {
        let f = fixture().await;
        let mut req = request(&f);
        req.end_date = Some("2024-01-14".to_string());
        req.week_days = vec![Weekday::Mon];
        req.time_per_day.remove(&Weekday::Wed);
        req.duration_per_day.remove(&Weekday::Wed);
        let class = f.service.create_class(Some(&f.admin), req).await.unwrap();

        let (first, second) = tokio::join!(
            f.service.schedule_class(Some(&f.admin), class.id),
            f.service.schedule_class(Some(&f.admin), class.id),
        );
        let created = first.unwrap().len() + second.unwrap().len();
        assert_eq!(created, 2);

        let stored = f
            .storage
            .list_appointments_by_class_ids(&[class.id])
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);

        // 每节课只通知一次
        let notifications = f.storage.list_notifications(f.students[0].id).await.unwrap();
        assert_eq!(notifications.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_class_code_is_conflict() {
        let f = fixture().await;
        let new_class = NewClass {
            class_code: "CLS-FIXED001".to_string(),
            subject_id: f.subject_id,
            teacher_id: f.teacher.id,
            student_ids: vec![],
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            recurrence: Default::default(),
            custom_hour_price: None,
            custom_teacher_salary: None,
            admin_notes: None,
            teacher_notes: None,
        };
        f.storage.create_class(new_class.clone()).await.unwrap();

        let err = f.storage.create_class(new_class).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(f.storage.list_classes().await.unwrap().len(), 1);
    }
}
