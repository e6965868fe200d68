//! 班级展示视图：关联科目名、教师名、花名册与课时

use std::collections::HashMap;

use super::ClassService;
use super::visibility::{can_view_class, visible_classes};
use crate::errors::{Result, TutorHubError};
use crate::models::appointments::entities::Appointment;
use crate::models::auth::Caller;
use crate::models::classes::{
    entities::{Class, RosterEntry},
    responses::ClassView,
};
use crate::models::users::entities::UserRole;
use crate::services::guard::{Access, authorize};

impl ClassService {
    async fn subject_names(&self) -> Result<HashMap<i64, String>> {
        Ok(self
            .storage
            .list_subjects()
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect())
    }

    async fn user_names(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        Ok(self
            .storage
            .get_users_by_ids(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect())
    }

    async fn roster(&self, class_id: i64) -> Result<Vec<RosterEntry>> {
        let ids = self.storage.list_class_student_ids(class_id).await?;
        let names = self.user_names(&ids).await?;
        Ok(ids
            .into_iter()
            .filter_map(|id| names.get(&id).map(|name| RosterEntry {
                id,
                name: name.clone(),
            }))
            .collect())
    }

    /// 组装视图；`detailed` 时附带花名册与课时
    async fn build_views(&self, classes: Vec<Class>, detailed: bool) -> Result<Vec<ClassView>> {
        if classes.is_empty() {
            return Ok(Vec::new());
        }

        let subjects = self.subject_names().await?;
        let mut teacher_ids: Vec<i64> = classes.iter().map(|c| c.teacher_id).collect();
        teacher_ids.sort_unstable();
        teacher_ids.dedup();
        let teachers = self.user_names(&teacher_ids).await?;

        let mut appointments: HashMap<i64, Vec<Appointment>> = HashMap::new();
        if detailed {
            let class_ids: Vec<i64> = classes.iter().map(|c| c.id).collect();
            for appointment in self
                .storage
                .list_appointments_by_class_ids(&class_ids)
                .await?
            {
                appointments
                    .entry(appointment.class_id)
                    .or_default()
                    .push(appointment);
            }
        }

        let mut views = Vec::with_capacity(classes.len());
        for class in classes {
            let (students, class_appointments) = if detailed {
                (
                    Some(self.roster(class.id).await?),
                    Some(appointments.remove(&class.id).unwrap_or_default()),
                )
            } else {
                (None, None)
            };

            views.push(ClassView {
                subject_name: subjects.get(&class.subject_id).cloned(),
                teacher_name: teachers.get(&class.teacher_id).cloned(),
                students,
                appointments: class_appointments,
                class,
            });
        }
        Ok(views)
    }
}

pub async fn list_classes(
    service: &ClassService,
    caller: Option<&Caller>,
) -> Result<Vec<ClassView>> {
    let caller = authorize(caller, Access::Authenticated)?;
    let classes = visible_classes(&service.storage, caller).await?;

    let detailed = match caller.role {
        UserRole::Admin => true,
        UserRole::Teacher | UserRole::Student => false,
    };
    service.build_views(classes, detailed).await
}

pub async fn get_class(
    service: &ClassService,
    caller: Option<&Caller>,
    class_id: i64,
) -> Result<ClassView> {
    let caller = authorize(caller, Access::Authenticated)?;
    let not_found = || TutorHubError::not_found(format!("Class {class_id} not found"));

    let class = service
        .storage
        .get_class_by_id(class_id)
        .await?
        .ok_or_else(not_found)?;

    // 无权查看的班级按不存在处理
    if !can_view_class(&service.storage, caller, &class).await? {
        return Err(not_found());
    }

    service
        .build_views(vec![class], true)
        .await?
        .pop()
        .ok_or_else(not_found)
}
