use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::entity::format_date;
use crate::errors::{Result, TutorHubError};
use crate::models::users::entities::{NewUser, PaymentRecord, User, UserChanges, UserRole};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            password_hash: Set(req.password_hash),
            role: Set(req.role.to_string()),
            name: Set(req.name),
            date_of_birth: Set(req.date_of_birth.map(format_date)),
            nationality: Set(req.nationality),
            location: Set(req.location),
            balance: Set(0.0),
            base_salary_per_hour: Set(req.base_salary_per_hour),
            base_payment_per_hour: Set(req.base_payment_per_hour),
            payment_history: Set("[]".to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                TutorHubError::conflict("Username already exists")
            }
            _ => TutorHubError::database_operation(format!("Failed to create user: {e}")),
        })?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 批量获取用户
    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Users::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to query users: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }

    /// 按角色列出用户
    pub async fn list_users_by_roles_impl(&self, roles: &[UserRole]) -> Result<Vec<User>> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let result = Users::find()
            .filter(Column::Role.is_in(roles.iter().map(|r| r.to_string())))
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Failed to list users: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Failed to count users: {e}")))
    }

    /// 更新用户信息
    pub async fn update_user_impl(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Failed to query user: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            model.date_of_birth = Set(Some(format_date(date_of_birth)));
        }
        if let Some(nationality) = changes.nationality {
            model.nationality = Set(Some(nationality));
        }
        if let Some(location) = changes.location {
            model.location = Set(Some(location));
        }
        if let Some(password_hash) = changes.password_hash {
            model.password_hash = Set(password_hash);
        }
        if let Some(salary) = changes.base_salary_per_hour {
            model.base_salary_per_hour = Set(Some(salary));
        }
        if let Some(payment) = changes.base_payment_per_hour {
            model.base_payment_per_hour = Set(Some(payment));
        }
        if let Some(is_active) = changes.is_active {
            model.is_active = Set(is_active);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Failed to update user: {e}")))?;

        Ok(Some(result.into_user()))
    }

    /// 追加缴费记录，余额与记录在同一事务中更新
    pub async fn record_payment_impl(
        &self,
        id: i64,
        payment: PaymentRecord,
    ) -> Result<Option<User>> {
        let txn = self.db.begin().await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to begin transaction: {e}"))
        })?;

        let Some(existing) = Users::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Failed to query user: {e}")))?
        else {
            return Ok(None);
        };

        let mut history: Vec<PaymentRecord> =
            serde_json::from_str(&existing.payment_history).unwrap_or_default();
        let balance = existing.balance + payment.amount;
        history.push(payment);

        let model = ActiveModel {
            id: Set(id),
            balance: Set(balance),
            payment_history: Set(serde_json::to_string(&history)?),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.update(&txn).await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to record payment: {e}"))
        })?;

        txn.commit().await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to commit payment: {e}"))
        })?;

        Ok(Some(result.into_user()))
    }
}
