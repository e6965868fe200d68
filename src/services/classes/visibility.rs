//! 按角色判定班级可见范围，班级与课时列表共用

use std::sync::Arc;

use crate::errors::Result;
use crate::models::auth::Caller;
use crate::models::classes::entities::Class;
use crate::models::users::entities::UserRole;
use crate::storage::Storage;

/// 调用者可见的班级
pub async fn visible_classes(storage: &Arc<dyn Storage>, caller: &Caller) -> Result<Vec<Class>> {
    match caller.role {
        UserRole::Admin => storage.list_classes().await,
        UserRole::Teacher => storage.list_classes_by_teacher(caller.id).await,
        UserRole::Student => storage.list_classes_by_student(caller.id).await,
    }
}

/// 调用者能否查看指定班级
pub async fn can_view_class(
    storage: &Arc<dyn Storage>,
    caller: &Caller,
    class: &Class,
) -> Result<bool> {
    match caller.role {
        UserRole::Admin => Ok(true),
        UserRole::Teacher => Ok(class.teacher_id == caller.id),
        UserRole::Student => storage.is_student_enrolled(class.id, caller.id).await,
    }
}
