mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{code_in, context, create_job, get, post, put, register, send};

#[actix_rt::test]
async fn test_admin_stats() {
    let ctx = context();
    let app = test::init_service(common::app(ctx.state.clone())).await;
    let admin = register(&app, "Admin", "admin@example.com", "Admin", &[], "HQ").await;
    let t1 = register(&app, "One", "one@example.com", "Talent", &["React"], "Austin").await;
    let t2 = register(&app, "Two", "two@example.com", "Talent", &["Go"], "Denver").await;
    let job = create_job(&app, &admin, "Frontend", &["React"], "Austin, TX").await;

    let code = code_in(&ctx.outbox.last_to(&t1.email));
    let (status, _) = send(
        &app,
        post("/api/auth/verify-email", Some(&t1.token), json!({ "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut ids = Vec::new();
    for talent in [&t1, &t2] {
        let (_, created) = send(
            &app,
            post("/api/matching", Some(&admin.token), json!({ "jobId": job, "userId": talent.id })),
        )
        .await;
        ids.push(created["id"].as_str().unwrap().to_string());
    }
    let uri = format!("/api/matching/{}/complete", ids[0]);
    send(&app, put(&uri, Some(&admin.token), json!({}))).await;

    let (status, stats) = send(&app, get("/api/admin/stats", Some(&admin.token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({
            "totalJobs": 1,
            "totalUsers": 3,
            "totalTalents": 2,
            "totalAdmins": 1,
            "totalMatches": 2,
            "activeMatches": 1,
            "completedMatches": 1,
            "verifiedUsers": 1,
            "unverifiedUsers": 2
        })
    );
}

#[actix_rt::test]
async fn test_talent_stats() {
    let ctx = context();
    let app = test::init_service(common::app(ctx.state.clone())).await;
    let admin = register(&app, "Admin", "admin@example.com", "Admin", &[], "HQ").await;
    let talent = register(&app, "Tal", "tal@example.com", "Talent", &["React"], "Austin").await;
    let first = create_job(&app, &admin, "Frontend", &["React", "Node"], "Austin, TX").await;
    let second = create_job(&app, &admin, "Backend", &["Go"], "Remote").await;

    let (status, stats) = send(&app, get("/api/talent/stats", Some(&talent.token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalMatches"], 0);
    assert_eq!(stats["matchSuccessRate"], 0);
    assert_eq!(stats["totalJobs"], 2);
    assert_eq!(stats["matchingJobs"], 1);
    assert_eq!(stats["jobsInLocation"], 1);
    // Name, email, location and skills, but not verified.
    assert_eq!(stats["profileCompleteness"], 80);

    let mut ids = Vec::new();
    for job in [&first, &second] {
        let (_, created) = send(
            &app,
            post("/api/matching", Some(&admin.token), json!({ "jobId": job, "userId": talent.id })),
        )
        .await;
        ids.push(created["id"].as_str().unwrap().to_string());
    }
    let uri = format!("/api/matching/{}/complete", ids[1]);
    send(&app, put(&uri, Some(&admin.token), json!({}))).await;

    let (_, stats) = send(&app, get("/api/talent/stats", Some(&talent.token))).await;
    assert_eq!(stats["totalMatches"], 2);
    assert_eq!(stats["activeMatches"], 1);
    assert_eq!(stats["completedMatches"], 1);
    assert_eq!(stats["recentMatches"], 2);
    assert_eq!(stats["matchSuccessRate"], 50);
}

#[actix_rt::test]
async fn test_talent_stats_without_skills() {
    let ctx = context();
    let app = test::init_service(common::app(ctx.state.clone())).await;
    let admin = register(&app, "Admin", "admin@example.com", "Admin", &[], "HQ").await;
    let talent = register(&app, "Tal", "tal@example.com", "Talent", &[], "austin").await;
    create_job(&app, &admin, "Frontend", &["React"], "Austin, TX").await;

    let (_, stats) = send(&app, get("/api/talent/stats", Some(&talent.token))).await;
    assert_eq!(stats["matchingJobs"], 0);
    assert_eq!(stats["jobsInLocation"], 1);
    assert_eq!(stats["profileCompleteness"], 60);
}
