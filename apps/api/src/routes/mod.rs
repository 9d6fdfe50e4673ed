pub mod health;
pub mod jobs;
pub mod stats;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/stats", get(stats::handle_get_stats))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create_resume).get(resumes::handle_list_resumes),
        )
        .route("/api/v1/resumes/master", get(resumes::handle_get_master))
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        .route("/api/v1/resumes/:id/master", post(resumes::handle_set_master))
        .route(
            "/api/v1/resumes/:id/status",
            patch(resumes::handle_update_status),
        )
        .route(
            "/api/v1/resumes/:id/cover-letter",
            post(tailoring::handle_cover_letter),
        )
        .route("/api/v1/resumes/:id/outreach", post(tailoring::handle_outreach))
        // Job API
        .route("/api/v1/jobs", post(jobs::handle_create_job))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        // Tailoring API
        .route("/api/v1/tailor/preview", post(tailoring::handle_preview))
        .route("/api/v1/tailor/confirm", post(tailoring::handle_confirm))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::fake::{FakeCompletionClient, Scripted};
    use crate::store::MemoryStore;

    fn app(responses: Vec<Scripted>) -> Router {
        let config = Config {
            database_url: None,
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            default_language: "en".to_string(),
        };
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FakeCompletionClient::new(responses)),
            config,
        );
        build_router(state)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn resume_body() -> Value {
        json!({
            "content": "# Ada Lovelace",
            "processed_data": {
                "personalInfo": {"name": "Ada Lovelace", "title": "Software Engineer"},
                "summary": "",
                "workExperience": [{
                    "id": 1,
                    "title": "Engineer",
                    "company": "Analytical Engines",
                    "years": "2019 - Present",
                    "description": ["Built pipelines in Python"]
                }],
                "additional": {"technicalSkills": ["Python"]}
            }
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(vec![]), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "tailor");
    }

    #[tokio::test]
    async fn test_first_resume_becomes_master() {
        let app = app(vec![]);
        let (status, first) = send(&app, Method::POST, "/api/v1/resumes", Some(resume_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["is_master"], true);

        let (_, second) = send(&app, Method::POST, "/api/v1/resumes", Some(resume_body())).await;
        assert_eq!(second["is_master"], false);

        let (status, master) = send(&app, Method::GET, "/api/v1/resumes/master", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(master["id"], first["id"]);

        let (_, all) = send(&app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_stats_reflect_resumes_and_jobs() {
        let app = app(vec![]);
        let (status, stats) = send(&app, Method::GET, "/api/v1/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_resumes"], 0);
        assert_eq!(stats["has_master_resume"], false);

        send(&app, Method::POST, "/api/v1/resumes", Some(resume_body())).await;
        send(&app, Method::POST, "/api/v1/jobs", Some(json!({"content": "Rust role"}))).await;

        let (_, stats) = send(&app, Method::GET, "/api/v1/stats", None).await;
        assert_eq!(stats["total_resumes"], 1);
        assert_eq!(stats["total_jobs"], 1);
        assert_eq!(stats["total_improvements"], 0);
        assert_eq!(stats["has_master_resume"], true);
    }

    #[tokio::test]
    async fn test_job_labels_are_trimmed_and_bounded() {
        let app = app(vec![]);
        let (status, job) = send(
            &app,
            Method::POST,
            "/api/v1/jobs",
            Some(json!({
                "content": "Platform role",
                "company_name": "  Acme  ",
                "role": "R".repeat(400)
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(job["company_name"], "Acme");
        assert_eq!(job["role"].as_str().unwrap().len(), 255);
    }

    #[tokio::test]
    async fn test_empty_resume_is_rejected() {
        let (status, body) = send(
            &app(vec![]),
            Method::POST,
            "/api/v1/resumes",
            Some(json!({"content": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_set_master_unknown_id_is_not_found() {
        let app = app(vec![]);
        let (_, first) = send(&app, Method::POST, "/api/v1/resumes", Some(resume_body())).await;

        let uri = format!("/api/v1/resumes/{}/master", uuid::Uuid::new_v4());
        let (status, body) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (_, master) = send(&app, Method::GET, "/api/v1/resumes/master", None).await;
        assert_eq!(master["id"], first["id"]);
    }

    #[tokio::test]
    async fn test_invalid_status_transition_is_conflict() {
        let app = app(vec![]);
        let (_, resume) = send(&app, Method::POST, "/api/v1/resumes", Some(resume_body())).await;
        let uri = format!("/api/v1/resumes/{}/status", resume["id"].as_str().unwrap());

        let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"status": "ready"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) =
            send(&app, Method::PATCH, &uri, Some(json!({"status": "processing"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["processing_status"], "processing");
    }

    #[tokio::test]
    async fn test_preview_then_confirm() {
        let app = app(vec![
            Scripted::Json(json!({
                "required_skills": ["Python", "Kubernetes"],
                "experience_level": "Senior",
                "years_experience": 5
            })),
            Scripted::Json(json!({
                "personalInfo": {"name": "Ada Lovelace", "title": "Software Engineer"},
                "summary": "Python engineer moving into platform work.",
                "workExperience": [{
                    "id": 1,
                    "title": "Engineer",
                    "company": "Analytical Engines",
                    "years": "2019 - Present",
                    "description": ["Built pipelines in Python"]
                }],
                "additional": {"technicalSkills": ["Python", "Kubernetes"]}
            })),
        ]);

        let (_, resume) = send(&app, Method::POST, "/api/v1/resumes", Some(resume_body())).await;
        let (status, job) = send(
            &app,
            Method::POST,
            "/api/v1/jobs",
            Some(json!({
                "content": "Senior Platform Engineer at Acme. Python and Kubernetes required.",
                "company_name": "Acme",
                "role": "Senior Platform Engineer"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, preview) = send(
            &app,
            Method::POST,
            "/api/v1/tailor/preview",
            Some(json!({"resume_id": resume["id"], "job_id": job["id"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(preview["stage"], "awaiting_confirmation");
        assert_eq!(preview["diff"]["summary"]["total_changes"], 2);
        assert_eq!(preview["diff"]["summary"]["skills_added"], 1);
        assert_eq!(preview["diff"]["summary"]["high_risk_changes"], 1);
        assert_eq!(preview["diff"]["changes"][0]["field_type"], "summary");
        assert_eq!(preview["diff"]["changes"][0]["change_type"], "added");

        let (status, confirmed) = send(
            &app,
            Method::POST,
            "/api/v1/tailor/confirm",
            Some(json!({
                "resume_id": resume["id"],
                "job_id": job["id"],
                "improved_data": preview["improved"],
                "improvements": preview["suggestions"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(confirmed["stage"], "confirmed");
        assert_eq!(confirmed["tailored"]["title"], "Senior Platform Engineer @ Acme");
        assert_eq!(confirmed["tailored"]["is_master"], false);

        let uri = format!(
            "/api/v1/resumes/{}",
            confirmed["tailored"]["id"].as_str().unwrap()
        );
        let (status, detail) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["resume"]["parent_id"], resume["id"]);
        assert_eq!(detail["improvement"]["improvements"][0]["lineNumber"], 1);

        let (_, job) = send(
            &app,
            Method::GET,
            &format!("/api/v1/jobs/{}", job["id"].as_str().unwrap()),
            None,
        )
        .await;
        assert_eq!(job["job_keywords"]["required_skills"][1], "Kubernetes");
    }

    #[tokio::test]
    async fn test_truncated_improvement_is_unprocessable() {
        let app = app(vec![
            Scripted::Json(json!({"required_skills": ["Go"]})),
            Scripted::Json(json!({"summary": "cut off mid"})),
        ]);
        let (_, resume) = send(&app, Method::POST, "/api/v1/resumes", Some(resume_body())).await;
        let (_, job) = send(
            &app,
            Method::POST,
            "/api/v1/jobs",
            Some(json!({"content": "Go developer"})),
        )
        .await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/tailor/preview",
            Some(json!({"resume_id": resume["id"], "job_id": job["id"]})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("personalInfo"));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_tailored_children() {
        let app = app(vec![]);
        let (_, resume) = send(&app, Method::POST, "/api/v1/resumes", Some(resume_body())).await;
        let uri = format!("/api/v1/resumes/{}", resume["id"].as_str().unwrap());

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::GET, "/api/v1/resumes/master", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cover_letter_is_stored_on_resume() {
        let app = app(vec![Scripted::Text("Dear Acme team,".to_string())]);
        let (_, resume) = send(&app, Method::POST, "/api/v1/resumes", Some(resume_body())).await;
        let (_, job) = send(
            &app,
            Method::POST,
            "/api/v1/jobs",
            Some(json!({"content": "Acme is hiring"})),
        )
        .await;
        let id = resume["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/resumes/{id}/cover-letter"),
            Some(json!({"job_id": job["id"], "language": "es"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "Dear Acme team,");

        let (_, detail) = send(&app, Method::GET, &format!("/api/v1/resumes/{id}"), None).await;
        assert_eq!(detail["resume"]["cover_letter"], "Dear Acme team,");
    }
}
