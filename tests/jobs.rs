mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use common::{context, create_job, delete, get, post, put, register, send};

#[actix_rt::test]
async fn test_job_crud() {
    let ctx = context();
    let app = test::init_service(common::app(ctx.state.clone())).await;
    let admin = register(&app, "Admin", "admin@example.com", "Admin", &[], "HQ").await;

    // Skills default to none.
    let (status, job) = send(
        &app,
        post(
            "/api/jobs",
            Some(&admin.token),
            json!({ "title": "Writer", "description": "Docs", "location": "Remote" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", job);
    assert_eq!(job["requiredSkills"], json!([]));
    assert_eq!(job["createdBy"]["id"], admin.id.as_str());
    let id = job["id"].as_str().unwrap().to_string();

    // Reads are public.
    let (status, jobs) = send(&app, get("/api/jobs", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(jobs.as_array().unwrap().len(), 1);
    let (status, fetched) = send(&app, get(&format!("/api/jobs/{}", id), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Writer");

    let (status, updated) = send(
        &app,
        put(
            &format!("/api/jobs/{}", id),
            Some(&admin.token),
            json!({
                "title": "Senior Writer",
                "description": "Docs",
                "requiredSkills": ["Markdown"],
                "location": "Remote"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["title"], "Senior Writer");
    assert_eq!(updated["requiredSkills"], json!(["Markdown"]));

    let (status, _) = send(&app, delete(&format!("/api/jobs/{}", id), Some(&admin.token))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, get(&format!("/api/jobs/{}", id), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Job not found");
    let (status, _) = send(&app, delete(&format!("/api/jobs/{}", id), Some(&admin.token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_job_input_rules() {
    let ctx = context();
    let app = test::init_service(common::app(ctx.state.clone())).await;
    let admin = register(&app, "Admin", "admin@example.com", "Admin", &[], "HQ").await;
    let talent = register(&app, "Tal", "tal@example.com", "Talent", &[], "Austin").await;

    let (status, _) = send(
        &app,
        post(
            "/api/jobs",
            Some(&admin.token),
            json!({ "title": "", "description": "Docs", "location": "Remote" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        post(
            "/api/jobs",
            Some(&talent.token),
            json!({ "title": "T", "description": "D", "location": "L" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, get("/api/jobs/not-a-uuid", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_matches_survive_job_deletion() {
    let ctx = context();
    let app = test::init_service(common::app(ctx.state.clone())).await;
    let admin = register(&app, "Admin", "admin@example.com", "Admin", &[], "HQ").await;
    let talent = register(&app, "Tal", "tal@example.com", "Talent", &[], "Austin").await;
    let job = create_job(&app, &admin, "Temp", &[], "Austin").await;

    let (status, created) = send(
        &app,
        post("/api/matching", Some(&admin.token), json!({ "jobId": job, "userId": talent.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/matching/{}/complete", created["id"].as_str().unwrap());
    let (status, _) = send(&app, put(&uri, Some(&admin.token), json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, before) = send(&app, get("/api/talent/stats", Some(&talent.token))).await;
    assert_eq!(before["completedMatches"], 1);
    assert_eq!(before["matchSuccessRate"], 100);

    let (status, _) = send(&app, delete(&format!("/api/jobs/{}", job), Some(&admin.token))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = send(&app, get("/api/talent/stats", Some(&talent.token))).await;
    assert_eq!(after["totalMatches"], 1);
    assert_eq!(after["completedMatches"], 1);
    assert_eq!(after["matchSuccessRate"], 100);
    assert_eq!(after["totalJobs"], 0);

    let (_, stats) = send(&app, get("/api/admin/stats", Some(&admin.token))).await;
    assert_eq!(stats["totalMatches"], 1);
    assert_eq!(stats["completedMatches"], 1);

    let (_, matches) = send(&app, get("/api/talent/matches", Some(&talent.token))).await;
    assert_eq!(matches.as_array().unwrap().len(), 1);
    assert_eq!(matches[0]["job"], json!(null));

    // The deleted job cannot be matched again.
    let (status, body) = send(
        &app,
        post("/api/matching", Some(&admin.token), json!({ "jobId": job, "userId": talent.id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Job not found");
}
