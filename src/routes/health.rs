use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Name of the service answering `GET /health`.
#[derive(Debug, Clone, Copy)]
pub struct ServiceName(pub &'static str);

async fn health(service: web::Data<ServiceName>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": service.0,
        "timestamp": Utc::now()
    }))
}

/// Ungated liveness probe. Never touches the store.
pub fn mount(cfg: &mut web::ServiceConfig, service: &'static str) {
    cfg.app_data(web::Data::new(ServiceName(service)))
        .route("/health", web::get().to(health));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_reports_service_name() {
        let app = test::init_service(App::new().configure(|cfg| mount(cfg, "task-service"))).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "task-service");
        assert!(json["timestamp"].is_string());
    }
}
