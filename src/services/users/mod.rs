pub mod list;
pub mod payments;
pub mod seed;
pub mod update;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::auth::Caller;
use crate::models::users::{
    entities::User,
    requests::{RecordPaymentRequest, UpdateUserRequest, UserListParams},
};
use crate::storage::Storage;

pub use seed::seed_admin;

pub struct UserService {
    storage: Arc<dyn Storage>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // 获取教师 / 学生列表
    pub async fn list_users(
        &self,
        caller: Option<&Caller>,
        query: UserListParams,
    ) -> Result<Vec<User>> {
        list::list_users(self, caller, query).await
    }

    // 管理员更新用户信息
    pub async fn update_user(
        &self,
        caller: Option<&Caller>,
        user_id: i64,
        update_data: UpdateUserRequest,
    ) -> Result<User> {
        update::update_user(self, caller, user_id, update_data).await
    }

    // 记录缴费 / 结算
    pub async fn record_payment(
        &self,
        caller: Option<&Caller>,
        user_id: i64,
        payment: RecordPaymentRequest,
    ) -> Result<User> {
        payments::record_payment(self, caller, user_id, payment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;
    use crate::utils::password::verify_password;
    use actix_web::http::StatusCode;

    async fn setup() -> (Arc<dyn Storage>, UserService, Caller) {
        let storage = test_support::storage().await;
        let admin = test_support::user(&storage, "admin", UserRole::Admin).await;
        (storage.clone(), UserService::new(storage), admin)
    }

    #[tokio::test]
    async fn test_list_users_excludes_admins() {
        let (storage, service, admin) = setup().await;
        test_support::user(&storage, "zoe", UserRole::Student).await;
        test_support::user(&storage, "mark", UserRole::Teacher).await;
        test_support::user(&storage, "amy", UserRole::Student).await;

        let users = service
            .list_users(Some(&admin), UserListParams::default())
            .await
            .unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["AMY", "MARK", "ZOE"]);

        let students = service
            .list_users(
                Some(&admin),
                UserListParams {
                    role: Some(UserRole::Student),
                },
            )
            .await
            .unwrap();
        assert_eq!(students.len(), 2);
        assert!(students.iter().all(|u| u.role == UserRole::Student));
    }

    #[tokio::test]
    async fn test_list_users_requires_admin() {
        let (storage, service, _) = setup().await;
        let teacher = test_support::user(&storage, "mark", UserRole::Teacher).await;
        let err = service
            .list_users(Some(&teacher), UserListParams::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_user() {
        let (storage, service, admin) = setup().await;
        let teacher = test_support::user(&storage, "mark", UserRole::Teacher).await;

        let updated = service
            .update_user(
                Some(&admin),
                teacher.id,
                UpdateUserRequest {
                    name: Some("  Mark Li ".to_string()),
                    base_salary_per_hour: Some(25.0),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Mark Li");
        assert_eq!(updated.base_salary_per_hour, Some(25.0));
        assert!(!updated.is_active);

        let err = service
            .update_user(
                Some(&admin),
                teacher.id,
                UpdateUserRequest {
                    base_payment_per_hour: Some(-1.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = service
            .update_user(Some(&admin), 9999, UpdateUserRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_record_payment() {
        let (storage, service, admin) = setup().await;
        let student = test_support::user(&storage, "amy", UserRole::Student).await;

        service
            .record_payment(
                Some(&admin),
                student.id,
                RecordPaymentRequest {
                    amount: 120.0,
                    note: Some("May tuition".to_string()),
                },
            )
            .await
            .unwrap();
        let user = service
            .record_payment(
                Some(&admin),
                student.id,
                RecordPaymentRequest {
                    amount: -20.0,
                    note: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(user.balance, 100.0);
        assert_eq!(user.payment_history.len(), 2);
        assert_eq!(user.payment_history[0].note.as_deref(), Some("May tuition"));

        let err = service
            .record_payment(
                Some(&admin),
                student.id,
                RecordPaymentRequest {
                    amount: 0.0,
                    note: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = service
            .record_payment(
                Some(&admin),
                9999,
                RecordPaymentRequest {
                    amount: 5.0,
                    note: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_seed_admin_only_on_empty_table() {
        let storage = test_support::storage().await;
        let admin = seed::seed_admin_with(&storage, Some("changeme123".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.role, UserRole::Admin);
        assert!(verify_password("changeme123", &admin.password_hash));

        let again = seed::seed_admin_with(&storage, None).await.unwrap();
        assert!(again.is_none());
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }
}
