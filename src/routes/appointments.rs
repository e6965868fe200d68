use actix_web::{HttpResponse, Result as ActixResult, web};

use super::respond;
use crate::middlewares;
use crate::models::appointments::requests::{
    AttendanceRequest, CreateAppointmentRequest, FeedbackRequest, UpdateStatusRequest,
};
use crate::models::auth::Caller;
use crate::models::users::entities::UserRole;
use crate::services::AppointmentService;
use crate::utils::SafeIDI64;

pub async fn list_appointments(
    service: web::Data<AppointmentService>,
    caller: Option<Caller>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service.list_appointments(caller.as_ref()).await,
        "Appointments retrieved successfully",
    ))
}

pub async fn create_appointment(
    service: web::Data<AppointmentService>,
    caller: Option<Caller>,
    appointment_data: web::Json<CreateAppointmentRequest>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service
            .create_appointment(caller.as_ref(), appointment_data.into_inner())
            .await,
        "Appointment created successfully",
    ))
}

pub async fn record_attendance(
    service: web::Data<AppointmentService>,
    caller: Option<Caller>,
    appointment_id: SafeIDI64,
    attendance: web::Json<AttendanceRequest>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service
            .record_attendance(caller.as_ref(), appointment_id.0, attendance.into_inner())
            .await,
        "Attendance recorded successfully",
    ))
}

pub async fn submit_feedback(
    service: web::Data<AppointmentService>,
    caller: Option<Caller>,
    appointment_id: SafeIDI64,
    feedback: web::Json<FeedbackRequest>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service
            .submit_feedback(caller.as_ref(), appointment_id.0, feedback.into_inner())
            .await,
        "Feedback submitted successfully",
    ))
}

pub async fn update_status(
    service: web::Data<AppointmentService>,
    caller: Option<Caller>,
    appointment_id: SafeIDI64,
    status_data: web::Json<UpdateStatusRequest>,
) -> ActixResult<HttpResponse> {
    Ok(respond(
        service
            .update_status(caller.as_ref(), appointment_id.0, status_data.into_inner().status)
            .await,
        "Appointment status updated successfully",
    ))
}

// 配置路由
pub fn configure_appointments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/appointments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_appointments))
                    .route(
                        web::post()
                            .to(create_appointment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .route("/{id}/attendance", web::post().to(record_attendance))
            .route("/{id}/feedback", web::post().to(submit_feedback))
            .service(
                web::resource("/{id}/status").route(
                    web::put()
                        .to(update_status)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
