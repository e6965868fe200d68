//! 按每周规律展开课时

use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use tracing::{debug, info};

use super::ClassService;
use crate::errors::{Result, TutorHubError};
use crate::models::appointments::{entities::Appointment, requests::CreateAppointmentRequest};
use crate::models::auth::Caller;
use crate::models::classes::entities::{Recurrence, Weekday};
use crate::services::guard::{Access, authorize};

/// 一个待创建的课时
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: String,
    pub duration: i32,
}

/// 在 `[start, end]`（含两端）内展开每周规律。
///
/// 只有声明在 `week_days` 中且同时配置了时间和时长的星期会产生课时。
pub fn expand_recurrence(start: NaiveDate, end: NaiveDate, recurrence: &Recurrence) -> Vec<Slot> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter_map(|date| {
            let day = Weekday::from(date.weekday());
            if !recurrence.week_days.contains(&day) {
                return None;
            }
            let time = recurrence.time_per_day.get(&day)?;
            let duration = *recurrence.duration_per_day.get(&day)?;
            Some(Slot {
                date,
                time: time.clone(),
                duration,
            })
        })
        .collect()
}

pub async fn schedule_class(
    service: &ClassService,
    caller: Option<&Caller>,
    class_id: i64,
) -> Result<Vec<Appointment>> {
    let caller = authorize(caller, Access::Admin)?;

    let class = service
        .storage
        .get_class_by_id(class_id)
        .await?
        .ok_or_else(|| TutorHubError::not_found(format!("Class {class_id} not found")))?;

    // 已有同日同时段的课时不再重复创建
    let existing: HashSet<(NaiveDate, String)> = service
        .storage
        .list_appointments_by_class_ids(&[class_id])
        .await?
        .into_iter()
        .map(|a| (a.date, a.time))
        .collect();

    let appointments = service.appointments();
    let mut created = Vec::new();
    for slot in expand_recurrence(class.start_date, class.end_date, &class.recurrence) {
        if existing.contains(&(slot.date, slot.time.clone())) {
            continue;
        }
        let result = appointments
            .create_appointment(
                Some(caller),
                CreateAppointmentRequest {
                    class_id: Some(class_id),
                    date: Some(slot.date.format("%Y-%m-%d").to_string()),
                    time: Some(slot.time),
                    duration: Some(slot.duration),
                },
            )
            .await;
        match result {
            Ok(result) => created.push(result.appointment),
            // 并发的排课请求已写入该时段
            Err(TutorHubError::Conflict(msg)) => debug!("Skipping slot: {}", msg),
            Err(e) => return Err(e),
        }
    }

    info!(
        "Scheduled {} appointments for class {} by user {}",
        created.len(),
        class_id,
        caller.id
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn mon_wed() -> Recurrence {
        Recurrence {
            week_days: vec![Weekday::Mon, Weekday::Wed],
            time_per_day: BTreeMap::from([
                (Weekday::Mon, "10:00".to_string()),
                (Weekday::Wed, "14:00".to_string()),
            ]),
            duration_per_day: BTreeMap::from([(Weekday::Mon, 60), (Weekday::Wed, 90)]),
        }
    }

    #[test]
    fn test_expand_two_weeks() {
        // 2024-01-01 是星期一
        let slots = expand_recurrence(date(2024, 1, 1), date(2024, 1, 14), &mon_wed());
        assert_eq!(
            slots,
            vec![
                Slot {
                    date: date(2024, 1, 1),
                    time: "10:00".into(),
                    duration: 60,
                },
                Slot {
                    date: date(2024, 1, 3),
                    time: "14:00".into(),
                    duration: 90,
                },
                Slot {
                    date: date(2024, 1, 8),
                    time: "10:00".into(),
                    duration: 60,
                },
                Slot {
                    date: date(2024, 1, 10),
                    time: "14:00".into(),
                    duration: 90,
                },
            ]
        );
    }

    #[test]
    fn test_range_is_inclusive() {
        let slots = expand_recurrence(date(2024, 1, 3), date(2024, 1, 8), &mon_wed());
        let dates: Vec<NaiveDate> = slots.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 3), date(2024, 1, 8)]);
    }

    #[test]
    fn test_day_without_time_or_duration_is_skipped() {
        let mut recurrence = mon_wed();
        recurrence.week_days.push(Weekday::Fri);
        recurrence.time_per_day.insert(Weekday::Fri, "09:00".into());
        recurrence.duration_per_day.remove(&Weekday::Wed);

        let slots = expand_recurrence(date(2024, 1, 1), date(2024, 1, 7), &recurrence);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].date, date(2024, 1, 1));
    }

    #[test]
    fn test_empty_when_end_before_start() {
        assert!(expand_recurrence(date(2024, 2, 1), date(2024, 1, 1), &mon_wed()).is_empty());
    }
}
