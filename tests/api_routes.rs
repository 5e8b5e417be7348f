//! HTTP surface tests: routing, auth gates and request validation.
//!
//! Everything here is answered before the first database query, so the
//! suite runs without a Postgres instance behind it.

mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(app.url("/api/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn root_returns_banner() {
    let app = TestApp::new().await;

    let response = app.client.get(app.url("/")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "online");
}

#[tokio::test]
async fn unknown_route_returns_envelope_404() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(app.url("/api/no-existe"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Ruta no encontrada");
}

#[tokio::test]
async fn disponibles_requires_dates() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(app.url("/api/cabanas/disponibles"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "fail");
    assert!(body["errors"]["fechaInicio"].is_string());
    assert!(body["errors"]["fechaFin"].is_string());
}

#[tokio::test]
async fn disponibles_rejects_past_start_date() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(app.url(
            "/api/cabanas/disponibles?fechaInicio=2020-01-01&fechaFin=2020-01-05",
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"]["fechaInicio"],
        "La fecha de inicio no puede ser en el pasado"
    );
}

#[tokio::test]
async fn disponibles_rejects_inverted_range() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(app.url(
            "/api/cabanas/disponibles?fechaInicio=2099-01-10&fechaFin=2099-01-10",
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"]["fechaFin"],
        "La fecha de fin debe ser posterior a la fecha de inicio"
    );
}

#[tokio::test]
async fn disponibles_rejects_huge_party() {
    let app = TestApp::new().await;

    // i32::MAX adults plus one child: the occupant sum must be rejected at
    // validation instead of wrapping and matching every cabin.
    let response = app
        .client
        .get(app.url(
            "/api/cabanas/disponibles?fechaInicio=2099-01-10&fechaFin=2099-01-15&adultos=2147483647&ninos=1",
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["errors"]["adultos"],
        "El número de adultos no puede superar 20"
    );
}

#[tokio::test]
async fn crear_cabana_requires_token() {
    let app = TestApp::new().await;

    let response = app
        .client
        .post(app.url("/api/cabanas"))
        .json(&serde_json::json!({
            "nombre": "Nueva",
            "descripcion": "Cabaña de prueba",
            "precio": 100.0,
            "capacidad": 4,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Token no proporcionado");
}

#[tokio::test]
async fn crear_cabana_requires_admin() {
    let app = TestApp::new().await;
    let token = app.token(5, "cliente@example.com", false);

    let response = app
        .client
        .post(app.url("/api/cabanas"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "nombre": "Nueva",
            "descripcion": "Cabaña de prueba",
            "precio": 100.0,
            "capacidad": 4,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "No tienes permiso para realizar esta acción");
}

#[tokio::test]
async fn eliminar_servicio_requires_admin() {
    let app = TestApp::new().await;
    let token = app.token(5, "cliente@example.com", false);

    let response = app
        .client
        .delete(app.url("/api/servicios/1"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn admin_mutation_rejects_invalid_payload() {
    let app = TestApp::new().await;
    let token = app.token(1, "admin@example.com", true);

    // Admin token passes both gates; the payload fails field validation
    // before any database work.
    let response = app
        .client
        .post(app.url("/api/cabanas"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "nombre": "",
            "descripcion": "",
            "precio": 0.0,
            "capacidad": 0,
            "imagen": "no-es-url",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "fail");
    assert_eq!(body["errors"]["precio"], "El precio debe ser mayor a 0");
    assert_eq!(body["errors"]["imagen"], "La imagen debe ser una URL válida");
}

#[tokio::test]
async fn reservas_require_token() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(app.url("/api/reservas"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn confirmar_reserva_requires_admin() {
    let app = TestApp::new().await;
    let token = app.token(5, "cliente@example.com", false);

    let response = app
        .client
        .patch(app.url("/api/reservas/1/confirmar"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn crear_reserva_rejects_invalid_payload() {
    let app = TestApp::new().await;
    let token = app.token(5, "cliente@example.com", false);

    let response = app
        .client
        .post(app.url("/api/reservas"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "fecha_inicio": "2099-01-10",
            "fecha_fin": "2099-01-05",
            "adultos": 0,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["errors"]["cabana_id"], "El ID de la cabaña es requerido");
    assert_eq!(body["errors"]["adultos"], "Debe haber al menos 1 adulto");
    assert_eq!(
        body["errors"]["fecha_fin"],
        "La fecha de fin debe ser posterior a la fecha de inicio"
    );
}
