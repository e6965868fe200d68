pub mod parse;

use std::sync::Arc;
use tracing::info;

use crate::errors::{Result, TutorHubError};
use crate::models::auth::Caller;
use crate::models::subjects::{
    entities::{Subject, SubjectFields},
    requests::SubjectRequest,
};
use crate::services::guard::{Access, authorize};
use crate::storage::Storage;

pub struct SubjectService {
    storage: Arc<dyn Storage>,
}

impl SubjectService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // 列出科目
    pub async fn list_subjects(&self, caller: Option<&Caller>) -> Result<Vec<Subject>> {
        authorize(caller, Access::Authenticated)?;
        self.storage.list_subjects().await
    }

    // 创建科目
    pub async fn create_subject(
        &self,
        caller: Option<&Caller>,
        input: SubjectRequest,
    ) -> Result<Subject> {
        let caller = authorize(caller, Access::Admin)?;
        let fields = validate_subject(input, true)?;
        let subject = self.storage.create_subject(fields).await?;
        info!("Subject {} created by user {}", subject.id, caller.id);
        Ok(subject)
    }

    // 整体更新科目
    pub async fn update_subject(
        &self,
        caller: Option<&Caller>,
        id: i64,
        input: SubjectRequest,
    ) -> Result<Subject> {
        let caller = authorize(caller, Access::Admin)?;
        let existing = self
            .storage
            .get_subject_by_id(id)
            .await?
            .ok_or_else(|| TutorHubError::not_found(format!("Subject {id} not found")))?;
        // 未传 isActive 时保留原状态
        let fields = validate_subject(input, existing.is_active)?;
        let subject = self
            .storage
            .update_subject(id, fields)
            .await?
            .ok_or_else(|| TutorHubError::not_found(format!("Subject {id} not found")))?;
        info!("Subject {} updated by user {}", id, caller.id);
        Ok(subject)
    }
}

fn validate_subject(input: SubjectRequest, default_active: bool) -> Result<SubjectFields> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(TutorHubError::validation("Name is required"));
    }
    if input.sessions_per_week < 1 {
        return Err(TutorHubError::validation(
            "Must have at least 1 session per week",
        ));
    }
    let sessions_per_week = i32::try_from(input.sessions_per_week)
        .map_err(|_| TutorHubError::validation("Sessions per week is too large"))?;

    Ok(SubjectFields {
        name: name.to_string(),
        sessions_per_week,
        durations: parse::parse_durations(input.durations)?,
        price_per_duration: parse::parse_prices(input.price_per_duration)?,
        is_active: input.is_active.unwrap_or(default_active),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::subjects::requests::{DurationsInput, PricesInput};
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;
    use actix_web::http::StatusCode;

    fn algebra() -> SubjectRequest {
        SubjectRequest {
            name: "Algebra".to_string(),
            sessions_per_week: 2,
            durations: Some(DurationsInput::Text("60,90".to_string())),
            price_per_duration: Some(PricesInput::Text(r#""60": 40, "90": 55"#.to_string())),
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_create_subject_parses_text_fields() {
        let storage = test_support::storage().await;
        let admin = test_support::user(&storage, "admin", UserRole::Admin).await;
        let service = SubjectService::new(storage.clone());

        let subject = service.create_subject(Some(&admin), algebra()).await.unwrap();
        assert_eq!(subject.name, "Algebra");
        assert_eq!(subject.durations, vec![60, 90]);
        assert_eq!(subject.price_per_duration["60"], 40.0);
        assert_eq!(subject.price_per_duration["90"], 55.0);
        assert!(subject.is_active);

        let stored = storage.get_subject_by_id(subject.id).await.unwrap().unwrap();
        assert_eq!(stored.durations, vec![60, 90]);
        assert_eq!(stored.price_per_duration, subject.price_per_duration);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_create_subject() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student", UserRole::Student).await;
        let service = SubjectService::new(storage.clone());

        for caller in [teacher, student] {
            let err = service
                .create_subject(Some(&caller), algebra())
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        }
        let err = service.create_subject(None, algebra()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        assert!(storage.list_subjects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_subject_validation() {
        let storage = test_support::storage().await;
        let admin = test_support::user(&storage, "admin", UserRole::Admin).await;
        let service = SubjectService::new(storage);

        let mut blank = algebra();
        blank.name = "   ".to_string();
        let err = service.create_subject(Some(&admin), blank).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let mut no_sessions = algebra();
        no_sessions.sessions_per_week = 0;
        let err = service
            .create_subject(Some(&admin), no_sessions)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_subject() {
        let storage = test_support::storage().await;
        let admin = test_support::user(&storage, "admin", UserRole::Admin).await;
        let student = test_support::user(&storage, "student", UserRole::Student).await;
        let service = SubjectService::new(storage);

        let subject = service.create_subject(Some(&admin), algebra()).await.unwrap();

        let mut update = algebra();
        update.name = "Geometry".to_string();
        update.durations = Some(DurationsInput::List(vec![45]));
        update.is_active = Some(false);
        let updated = service
            .update_subject(Some(&admin), subject.id, update)
            .await
            .unwrap();
        assert_eq!(updated.name, "Geometry");
        assert_eq!(updated.durations, vec![45]);
        assert!(!updated.is_active);

        let err = service
            .update_subject(Some(&admin), 999, algebra())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let listed = service.list_subjects(Some(&student)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Geometry");
    }
}
