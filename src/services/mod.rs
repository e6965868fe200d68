pub mod appointments;
pub mod auth;
pub mod classes;
pub mod guard;
pub mod notifications;
pub mod subjects;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use appointments::AppointmentService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use notifications::NotificationService;
pub use subjects::SubjectService;
pub use users::UserService;
