mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{
    applicant, create_job, create_skill, db_app, employer, json_request, multipart_request,
    register_and_login, send, PDF_BYTES,
};

async fn audit_rows(pool: &sqlx::PgPool, application_id: i64) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT status FROM job_application_audits WHERE job_application_id = $1 ORDER BY id",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn applying_records_exactly_one_applied_audit_row() {
    let Some((app, pool)) = db_app().await else {
        return;
    };
    let boss = employer(&app).await;
    let job_id = create_job(&app, &boss.access, &[]).await;
    let seeker = applicant(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/job-application/",
            Some(&seeker.access),
            Some(json!({"job_listing": job_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["status"], "applied");
    assert_eq!(body["data"]["job_listing"], job_id);
    let application_id = body["data"]["id"].as_i64().unwrap();

    assert_eq!(audit_rows(&pool, application_id).await, vec!["applied".to_string()]);

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/job-application/", Some(&seeker.access), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // A second live application to the same job is refused.
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/job-application/",
            Some(&seeker.access),
            Some(json!({"job_listing": job_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(audit_rows(&pool, application_id).await.len(), 1);
}

#[tokio::test]
async fn status_change_audits_and_notifies_the_applicant() {
    let Some((app, pool)) = db_app().await else {
        return;
    };
    let boss = employer(&app).await;
    let job_id = create_job(&app, &boss.access, &[]).await;
    let seeker = applicant(&app).await;

    let (_, body) = send(
        &app,
        json_request(
            Method::POST,
            "/job-application/",
            Some(&seeker.access),
            Some(json!({"job_listing": job_id})),
        ),
    )
    .await;
    let application_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            Method::GET,
            &format!("/job/{}/applications/", job_id),
            Some(&boss.access),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], application_id);

    let status_uri = format!("/job-application/{}/status/", application_id);
    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &status_uri,
            Some(&boss.access),
            Some(json!({"status": "shortlisted", "notes": "Strong resume."})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "shortlisted");
    assert_eq!(
        audit_rows(&pool, application_id).await,
        vec!["applied".to_string(), "shortlisted".to_string()]
    );

    // Repeating the current status changes nothing.
    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            &status_uri,
            Some(&boss.access),
            Some(json!({"status": "shortlisted"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(audit_rows(&pool, application_id).await.len(), 2);

    // The applicant cannot move their own application.
    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            &status_uri,
            Some(&seeker.access),
            Some(json!({"status": "hired"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/notification/", Some(&seeker.access), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let notifications = body["data"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["is_read"], false);
    let notification_id = notifications[0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/notification/{}/read/", notification_id),
            Some(&seeker.access),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_read"], true);

    // Both parties can read the trail; nobody else can.
    for token in [&seeker.access, &boss.access] {
        let (status, body) = send(
            &app,
            json_request(
                Method::GET,
                &format!("/job-application/{}/audit/", application_id),
                Some(token),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][1]["notes"], "Strong resume.");
    }
    let stranger = employer(&app).await;
    let (status, _) = send(
        &app,
        json_request(
            Method::GET,
            &format!("/job-application/{}/audit/", application_id),
            Some(&stranger.access),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn withdrawn_applications_disappear() {
    let Some((app, _pool)) = db_app().await else {
        return;
    };
    let boss = employer(&app).await;
    let job_id = create_job(&app, &boss.access, &[]).await;
    let seeker = applicant(&app).await;

    let (_, body) = send(
        &app,
        json_request(
            Method::POST,
            "/job-application/",
            Some(&seeker.access),
            Some(json!({"job_listing": job_id})),
        ),
    )
    .await;
    let application_id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/job-application/{}/", application_id);

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, &uri, Some(&seeker.access), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, &uri, Some(&seeker.access), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        json_request(Method::GET, "/job-application/", Some(&seeker.access), None),
    )
    .await;
    assert_eq!(body["data"], json!([]));

    // Withdrawing frees the slot for a fresh application.
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/job-application/",
            Some(&seeker.access),
            Some(json!({"job_listing": job_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn applications_need_a_profile_and_a_real_job() {
    let Some((app, _pool)) = db_app().await else {
        return;
    };

    let pending = register_and_login(&app, "Applicant").await;
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/job-application/",
            Some(&pending.access),
            Some(json!({"job_listing": 1})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "An applicant profile does not exist for this user."
    );

    let seeker = applicant(&app).await;
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/job-application/",
            Some(&seeker.access),
            Some(json!({"job_listing": i64::MAX})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].get("job_listing").is_some());
}

#[tokio::test]
async fn second_applicant_profile_is_refused_without_a_new_row() {
    let Some((app, pool)) = db_app().await else {
        return;
    };
    let seeker = applicant(&app).await;

    let (status, body) = send(
        &app,
        multipart_request(
            Method::POST,
            "/profile/applicant/",
            &seeker.access,
            &[("phone_number", "5551234567"), ("address", "10 Downing Street")],
            Some(("application/pdf", PDF_BYTES)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "An applicant profile already exists for this user."
    );

    let profiles: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM applicant_profiles WHERE user_id = $1")
            .bind(seeker.user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(profiles, 1);

    let (_, body) = send(
        &app,
        json_request(Method::GET, "/profile/applicant/", Some(&seeker.access), None),
    )
    .await;
    assert_eq!(body["data"]["address"], "221B Baker Street");
}

#[tokio::test]
async fn resume_must_be_a_pdf() {
    let Some((app, _pool)) = db_app().await else {
        return;
    };
    let seeker = register_and_login(&app, "Applicant").await;

    let (status, body) = send(
        &app,
        multipart_request(
            Method::POST,
            "/profile/applicant/",
            &seeker.access,
            &[("phone_number", "1245125412"), ("address", "1 Main St")],
            Some(("image/png", &b"\x89PNG\r\n\x1a\n"[..])),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["resume_file"],
        "Only PDF files are allowed for the resume."
    );

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/profile/applicant/", Some(&seeker.access), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn applicant_profile_update_replaces_skills_and_resume() {
    let Some((app, _pool)) = db_app().await else {
        return;
    };
    let seeker = applicant(&app).await;
    let first = create_skill(&app, &seeker.access).await;
    let second = create_skill(&app, &seeker.access).await;

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/profile/applicant/", Some(&seeker.access), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let original_resume = body["data"]["resume_file"].as_str().unwrap().to_string();
    assert!(original_resume.starts_with("/uploads/resumes/"));

    let skills = format!("{},{}", first, second);
    let (status, body) = send(
        &app,
        multipart_request(
            Method::PUT,
            "/profile/applicant/",
            &seeker.access,
            &[("skills", skills.as_str())],
            Some(("application/pdf", PDF_BYTES)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["skills"], json!([first, second]));
    assert_ne!(body["data"]["resume_file"], original_resume.as_str());
    assert_eq!(body["data"]["address"], "221B Baker Street");

    let (status, body) = send(
        &app,
        multipart_request(
            Method::PUT,
            "/profile/applicant/",
            &seeker.access,
            &[("skills", "")],
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["skills"], json!([]));

    let (status, body) = send(
        &app,
        multipart_request(
            Method::PUT,
            "/profile/applicant/",
            &seeker.access,
            &[("phone_number", "12345")],
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["phone_number"],
        "Phone number must be exactly 10 digits."
    );
}
