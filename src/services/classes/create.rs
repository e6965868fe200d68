use std::collections::HashSet;
use tracing::{info, warn};

use super::ClassService;
use crate::errors::{Result, TutorHubError};
use crate::models::auth::Caller;
use crate::models::classes::{
    entities::{Class, NewClass, Recurrence, Weekday},
    requests::CreateClassRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::guard::{Access, authorize};
use crate::utils::random_code::generate_random_code;
use crate::utils::validate::{parse_date, validate_time};

/// 班级起止日期的最大跨度（两年）
pub const MAX_CLASS_SPAN_DAYS: i64 = 731;

const CLASS_CODE_ATTEMPTS: u32 = 3;

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| TutorHubError::validation(format!("{field} is required")))
}

fn dedup_preserving_order<T: Copy + Eq + std::hash::Hash>(values: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}

/// 校验每周规律：时间与时长只能出现在声明的星期上
pub(super) fn validate_recurrence(req: &CreateClassRequest) -> Result<Recurrence> {
    let week_days: Vec<Weekday> = dedup_preserving_order(req.week_days.clone());

    for (day, time) in &req.time_per_day {
        if !week_days.contains(day) {
            return Err(TutorHubError::validation(format!(
                "timePerDay references {day}, which is not one of the week days"
            )));
        }
        validate_time(time).map_err(TutorHubError::validation)?;
    }

    for (day, minutes) in &req.duration_per_day {
        if !week_days.contains(day) {
            return Err(TutorHubError::validation(format!(
                "durationPerDay references {day}, which is not one of the week days"
            )));
        }
        if *minutes <= 0 {
            return Err(TutorHubError::validation(format!(
                "Duration for {day} must be positive"
            )));
        }
    }

    Ok(Recurrence {
        week_days,
        time_per_day: req.time_per_day.clone(),
        duration_per_day: req.duration_per_day.clone(),
    })
}

fn non_negative(value: Option<f64>, field: &str) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(TutorHubError::validation(format!(
            "{field} must be a non-negative number"
        ))),
        other => Ok(other),
    }
}

pub async fn create_class(
    service: &ClassService,
    caller: Option<&Caller>,
    req: CreateClassRequest,
) -> Result<Class> {
    let caller = authorize(caller, Access::Admin)?;

    let subject_id = required(req.subject_id, "subjectId")?;
    let teacher_id = required(req.teacher_id, "teacherId")?;
    let start_date = parse_date(required(req.start_date.as_deref(), "startDate")?)
        .map_err(TutorHubError::validation)?;
    let end_date = parse_date(required(req.end_date.as_deref(), "endDate")?)
        .map_err(TutorHubError::validation)?;

    if start_date >= end_date {
        return Err(TutorHubError::validation("startDate must be before endDate"));
    }
    if (end_date - start_date).num_days() > MAX_CLASS_SPAN_DAYS {
        return Err(TutorHubError::validation(format!(
            "A class may span at most {MAX_CLASS_SPAN_DAYS} days"
        )));
    }

    let recurrence = validate_recurrence(&req)?;
    let custom_hour_price = non_negative(req.custom_hour_price, "customHourPrice")?;
    let custom_teacher_salary = non_negative(req.custom_teacher_salary, "customTeacherSalary")?;

    let storage = &service.storage;

    storage
        .get_subject_by_id(subject_id)
        .await?
        .ok_or_else(|| TutorHubError::not_found(format!("Subject {subject_id} not found")))?;

    let teacher = storage
        .get_user_by_id(teacher_id)
        .await?
        .ok_or_else(|| TutorHubError::not_found(format!("Teacher {teacher_id} not found")))?;
    if teacher.role != UserRole::Teacher {
        return Err(TutorHubError::validation(format!(
            "User {teacher_id} is not a teacher"
        )));
    }

    let student_ids = dedup_preserving_order(req.student_ids);
    let students = storage.get_users_by_ids(&student_ids).await?;
    for id in &student_ids {
        match students.iter().find(|s| s.id == *id) {
            None => {
                return Err(TutorHubError::not_found(format!("Student {id} not found")));
            }
            Some(student) if student.role != UserRole::Student => {
                return Err(TutorHubError::validation(format!(
                    "User {id} is not a student"
                )));
            }
            Some(_) => {}
        }
    }

    let new_class = NewClass {
        class_code: String::new(),
        subject_id,
        teacher_id,
        student_ids,
        start_date,
        end_date,
        recurrence,
        custom_hour_price,
        custom_teacher_salary,
        admin_notes: req.admin_notes,
        teacher_notes: req.teacher_notes,
    };

    // 班级编号冲突时重新生成
    let mut attempt = 1;
    let class = loop {
        let result = storage
            .create_class(NewClass {
                class_code: format!("CLS-{}", generate_random_code(8)),
                ..new_class.clone()
            })
            .await;
        match result {
            Err(TutorHubError::Conflict(_)) if attempt < CLASS_CODE_ATTEMPTS => {
                warn!("Class code collision, retrying (attempt {})", attempt);
                attempt += 1;
            }
            other => break other?,
        }
    };

    info!(
        "Class {} ({}) created by user {}",
        class.id, class.class_code, caller.id
    );
    Ok(class)
}
