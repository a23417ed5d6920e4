mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{id_at, As, TestApp};
use eventhub_api::config::AppConfig;
use eventhub_api::types::Role;

struct Crew {
    owner: As,
    contractor: As,
    event_id: uuid::Uuid,
    team_member_id: uuid::Uuid,
}

/// Private event owned by a manager plus a team member row for a contractor
async fn crew(app: &TestApp) -> Result<Crew> {
    let manager = app.user("manager@example.com", Role::EventManager).await;
    let contractor = app.user("crew@example.com", Role::Contractor).await;
    let owner = As::Header(manager.id);

    let (status, body) = app
        .post("/api/events", &owner, json!({ "title": "Gala", "is_public": false }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = id_at(&body, "/event/id")?;

    let (status, body) = app
        .post(
            "/api/team-members",
            &owner,
            json!({ "name": "Crew", "email": "crew@example.com", "member_user_id": contractor.id }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let team_member_id = id_at(&body, "/team_member/id")?;

    Ok(Crew {
        owner,
        contractor: As::Header(contractor.id),
        event_id,
        team_member_id,
    })
}

#[tokio::test]
async fn delegation_grants_read_and_task_write_only() -> Result<()> {
    let app = TestApp::new()?;
    let crew = crew(&app).await?;
    let event_uri = format!("/api/events/{}", crew.event_id);

    let (status, _) = app.get(&event_uri, &crew.contractor).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            &format!("{}/team-members", event_uri),
            &crew.owner,
            json!({ "team_member_ids": [crew.team_member_id], "status": "active" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.get(&event_uri, &crew.contractor).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["title"], json!("Gala"));

    let (status, body) = app.get("/api/events", &crew.contractor).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"].as_array().map(Vec::len), Some(1));

    let (status, _) = app.put(&event_uri, &crew.contractor, json!({ "title": "Mine now" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&event_uri, &crew.contractor).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(&format!("{}/tasks", event_uri), &crew.contractor, json!({ "title": "Set up stage" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn owner_keeps_access_after_delegation_is_removed() -> Result<()> {
    let app = TestApp::new()?;
    let crew = crew(&app).await?;
    let event_uri = format!("/api/events/{}", crew.event_id);
    let members_uri = format!("{}/team-members", event_uri);

    app.post(&members_uri, &crew.owner, json!({ "team_member_ids": [crew.team_member_id] }))
        .await?;
    let (status, _) = app.get(&event_uri, &crew.contractor).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .delete(&format!("{}/{}", members_uri, crew.team_member_id), &crew.owner)
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&event_uri, &crew.contractor).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.put(&event_uri, &crew.owner, json!({ "title": "Gala 2" })).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn removed_status_does_not_delegate() -> Result<()> {
    let app = TestApp::new()?;
    let crew = crew(&app).await?;
    let event_uri = format!("/api/events/{}", crew.event_id);

    app.post(
        &format!("{}/team-members", event_uri),
        &crew.owner,
        json!({ "team_member_ids": [crew.team_member_id], "status": "removed" }),
    )
    .await?;

    let (status, _) = app.get(&event_uri, &crew.contractor).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn attaching_foreign_team_members_is_rejected() -> Result<()> {
    let app = TestApp::new()?;
    let crew = crew(&app).await?;
    let rival = app.user("rival@example.com", Role::EventManager).await;
    let (_, body) = app
        .post(
            "/api/team-members",
            &As::Header(rival.id),
            json!({ "name": "Poached", "email": "poached@example.com" }),
        )
        .await?;
    let foreign_id = id_at(&body, "/team_member/id")?;

    let (status, body) = app
        .post(
            &format!("/api/events/{}/team-members", crew.event_id),
            &crew.owner,
            json!({ "team_member_ids": [crew.team_member_id, foreign_id] }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    let reason = body["field_errors"]["team_member_ids"].as_str().unwrap_or_default();
    assert!(reason.contains(&foreign_id.to_string()));
    Ok(())
}

#[tokio::test]
async fn contractors_cannot_create_events_or_jobs() -> Result<()> {
    let app = TestApp::new()?;
    let contractor = app.user("crew@example.com", Role::Contractor).await;
    let who = As::Header(contractor.id);

    let (status, _) = app.post("/api/events", &who, json!({ "title": "Mine" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.post("/api/jobs", &who, json!({ "title": "Mine" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn public_events_are_readable_anonymously() -> Result<()> {
    let app = TestApp::new()?;
    let manager = app.user("manager@example.com", Role::EventManager).await;
    let owner = As::Header(manager.id);

    let (_, body) = app
        .post("/api/events", &owner, json!({ "title": "Open day", "is_public": true }))
        .await?;
    let public_id = id_at(&body, "/event/id")?;
    let (_, body) = app.post("/api/events", &owner, json!({ "title": "Board meeting" })).await?;
    let private_id = id_at(&body, "/event/id")?;

    let (status, _) = app.get(&format!("/api/events/{}", public_id), &As::Anonymous).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/events/{}", private_id), &As::Anonymous).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(&format!("/api/events/{}", public_id), &As::Anonymous, json!({ "title": "x" }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn concealed_mode_answers_not_found_for_forbidden_reads() -> Result<()> {
    let mut config = AppConfig::development();
    config.security.conceal_forbidden = true;
    let app = TestApp::with_config(config)?;
    let manager = app.user("manager@example.com", Role::EventManager).await;
    let stranger = app.user("stranger@example.com", Role::EventManager).await;

    let (_, body) = app
        .post("/api/events", &As::Header(manager.id), json!({ "title": "Secret" }))
        .await?;
    let event_id = id_at(&body, "/event/id")?;

    let (status, _) = app
        .get(&format!("/api/events/{}", event_id), &As::Header(stranger.id))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn assigned_contractor_reads_private_job_but_cannot_edit() -> Result<()> {
    let app = TestApp::new()?;
    let manager = app.user("manager@example.com", Role::EventManager).await;
    let contractor = app.user("crew@example.com", Role::Contractor).await;
    let owner = As::Header(manager.id);
    let crew = As::Header(contractor.id);

    let (_, body) = app
        .post("/api/jobs", &owner, json!({ "title": "Lighting", "is_public": false }))
        .await?;
    let job_id = id_at(&body, "/job/id")?;
    let job_uri = format!("/api/jobs/{}", job_id);

    let (status, _) = app.get(&job_uri, &crew).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(&job_uri, &owner, json!({ "assigned_contractor_id": contractor.id, "status": "assigned" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["status"], json!("assigned"));

    let (status, _) = app.get(&job_uri, &crew).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.put(&job_uri, &crew, json!({ "title": "Mine" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.get("/api/jobs", &crew).await?;
    assert_eq!(body["jobs"].as_array().map(Vec::len), Some(1));
    let (_, body) = app.get("/api/jobs", &As::Anonymous).await?;
    assert_eq!(body["jobs"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn admin_overrides_ownership() -> Result<()> {
    let app = TestApp::new()?;
    let manager = app.user("manager@example.com", Role::EventManager).await;
    let admin = app.user("admin@example.com", Role::Admin).await;

    let (_, body) = app
        .post("/api/events", &As::Header(manager.id), json!({ "title": "Private" }))
        .await?;
    let event_id = id_at(&body, "/event/id")?;

    let (status, _) = app
        .delete(&format!("/api/events/{}", event_id), &As::Header(admin.id))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .get(&format!("/api/events/{}", event_id), &As::Header(manager.id))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
