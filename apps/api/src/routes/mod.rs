pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::screening::handlers;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/screenings",
            post(handlers::handle_create_screening).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/screenings/analyze", post(handlers::handle_analyze))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::models::screening::{ContactInfo, SkillStatus};
    use crate::screening::assistant::{AssistantError, ResumeAssistant};
    use crate::screening::extraction::DocumentTextExtractor;

    struct EchoAssistant;

    #[async_trait]
    impl ResumeAssistant for EchoAssistant {
        async fn reorganize_sections(&self, text: &str) -> Result<String, AssistantError> {
            Ok(text.to_string())
        }

        async fn extract_contact_info(&self, text: &str) -> Result<ContactInfo, AssistantError> {
            Ok(ContactInfo {
                name: text.lines().next().map(str::to_string),
                email: Some("ana@example.com".to_string()),
                phone: None,
            })
        }

        async fn evaluate_mandatory_skill_years(
            &self,
            _text: &str,
            requirements: &BTreeMap<String, u32>,
        ) -> Result<BTreeMap<String, SkillStatus>, AssistantError> {
            Ok(requirements
                .keys()
                .map(|skill| (skill.clone(), SkillStatus::Meets))
                .collect())
        }
    }

    fn app() -> Router {
        let config = Config {
            anthropic_api_key: "test".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            llm_max_attempts: 1,
            llm_backoff_base_ms: 1,
            llm_backoff_max_ms: 1,
            shortlist_size: 3,
            batch_concurrency: 2,
            reorganize_sections: true,
            max_upload_mb: 1,
        };
        build_router(AppState {
            config,
            assistant: Arc::new(EchoAssistant),
            extractor: Arc::new(DocumentTextExtractor),
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const RESUME: &str = "Ana Lim\nWork Experience\nData Engineer, Jan 2018 - Dec 2020\nSenior Data Engineer, 2021 - 2023\nEducation\nMaster of Science\nSkills\nPython, SQL\n";

    fn profile_json() -> Value {
        json!({
            "min_experience_years": 3,
            "min_education": "bachelor",
            "required_skills": ["python", "sql"],
            "mandatory_skill_years": {"python": 2}
        })
    }

    fn multipart_body(boundary: &str, profile: &Value, resumes: &[(&str, &str)]) -> String {
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"profile\"\r\n\r\n{profile}\r\n"
        );
        for (filename, text) in resumes {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"resumes\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n{text}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        body
    }

    fn multipart_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/screenings")
            .header(
                header::CONTENT_TYPE,
                "multipart/form-data; boundary=XBOUNDARY",
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "screener-api");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found_envelope() {
        let response = app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_analyze_runs_deterministic_core() {
        let request = json!({
            "text": RESUME,
            "profile": profile_json(),
            "mandatory_skill_status": {"python": "meets"},
            "current_year": 2025
        });
        let response = app()
            .oneshot(
                Request::post("/api/v1/screenings/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(request.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["signals"]["experience_years"], 5);
        assert_eq!(body["signals"]["education"], "Master");
        assert_eq!(body["verdict"]["mandatory_skill_fraction"], 1.0);
        assert_eq!(body["eligible"], true);
        assert_eq!(body["sections"][0]["name"], "work_experience");
    }

    #[tokio::test]
    async fn test_analyze_rejects_profile_without_skills() {
        let request = json!({
            "text": RESUME,
            "profile": {"min_experience_years": 1, "min_education": "diploma", "required_skills": []}
        });
        let response = app()
            .oneshot(
                Request::post("/api/v1/screenings/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(request.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_screening_upload_returns_report() {
        let body = multipart_body(
            "XBOUNDARY",
            &profile_json(),
            &[("ana.txt", RESUME), ("notes.md", "just notes")],
        );
        let response = app().oneshot(multipart_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["candidates"].as_array().unwrap().len(), 2);
        assert_eq!(report["candidates"][0]["status"], "screened");
        assert_eq!(report["candidates"][1]["status"], "failed");
        assert_eq!(report["shortlist"][0]["filename"], "ana.txt");
        assert_eq!(report["shortlist"][0]["name"], "Ana Lim");
        assert_eq!(report["shortlist"][0]["email"], "ana@example.com");
        assert_eq!(report["criteria"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_screening_without_resumes_is_rejected() {
        let body = multipart_body("XBOUNDARY", &profile_json(), &[]);
        let response = app().oneshot(multipart_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }
}
