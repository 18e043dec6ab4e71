use serde_json::json;

use catalog_server::config::AdminConfig;
use catalog_server::domain::SortDir;
use catalog_server::services::{ServiceError, UserService};

use crate::common::{PASSWORD, TestApp, routes};

#[tokio::test]
async fn register_grants_default_role() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::USERS,
            &json!({ "name": "Ana", "email": "Ana@Example.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(res.status, 201, "Body: {}", res.text);
    assert_eq!(res.body["name"], "Ana");
    assert_eq!(res.body["email"], "ana@example.com");
    assert_eq!(res.body["roles"], json!(["USER"]));
    assert!(res.body.get("password").is_none());
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = TestApp::spawn().await;
    app.register_user("First", "dup@example.com").await;

    let res = app
        .post_without_token(
            routes::USERS,
            &json!({ "name": "Second", "email": "DUP@example.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "CONFLICT");
}

#[tokio::test]
async fn register_rejects_weak_input() {
    let app = TestApp::spawn().await;

    let bad_email = app
        .post_without_token(
            routes::USERS,
            &json!({ "name": "X", "email": "not-an-email", "password": PASSWORD }),
        )
        .await;
    assert_eq!(bad_email.status, 400);

    let short_password = app
        .post_without_token(
            routes::USERS,
            &json!({ "name": "X", "email": "x@example.com", "password": "123" }),
        )
        .await;
    assert_eq!(short_password.status, 400);
}

#[tokio::test]
async fn login_returns_token_and_profile() {
    let app = TestApp::spawn().await;
    let id = app.register_user("Bruno", "bruno@example.com").await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({ "email": "bruno@example.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(res.status, 200, "Body: {}", res.text);
    assert!(!res.body["token"].as_str().unwrap().is_empty());
    assert_eq!(res.body["user"]["id"], id);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    app.register_user("Bruno", "bruno@example.com").await;

    let wrong = app
        .post_without_token(
            routes::LOGIN,
            &json!({ "email": "bruno@example.com", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(wrong.status, 401);
    assert_eq!(wrong.body["code"], "INVALID_CREDENTIALS");

    let unknown = app
        .post_without_token(
            routes::LOGIN,
            &json!({ "email": "ghost@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(unknown.status, 401);
    assert_eq!(unknown.body["message"], wrong.body["message"]);
}

#[tokio::test]
async fn me_requires_valid_token() {
    let app = TestApp::spawn().await;

    let missing = app.get_without_token(routes::ME).await;
    assert_eq!(missing.status, 401);
    assert_eq!(missing.body["code"], "TOKEN_MISSING");

    let invalid = app.get_with_token(routes::ME, "garbage").await;
    assert_eq!(invalid.status, 401);
    assert_eq!(invalid.body["code"], "TOKEN_INVALID");

    let token = app.create_authenticated_user("me@example.com").await;
    let ok = app.get_with_token(routes::ME, &token).await;
    assert_eq!(ok.status, 200);
    assert_eq!(ok.body["email"], "me@example.com");
}

#[tokio::test]
async fn list_users_is_admin_only() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("plain@example.com").await;

    let forbidden = app.get_with_token(routes::USERS, &token).await;
    assert_eq!(forbidden.status, 403);
    assert_eq!(forbidden.body["code"], "PERMISSION_DENIED");

    let anonymous = app.get_without_token(routes::USERS).await;
    assert_eq!(anonymous.status, 401);
}

#[tokio::test]
async fn admin_lists_and_filters_users() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "ADMIN").await;
    let plain = app.register_user("Plain", "plain@example.com").await;

    let all = app.get_with_token(routes::USERS, &admin).await;
    assert_eq!(all.status, 200, "Body: {}", all.text);
    assert_eq!(all.ids().len(), 2);

    let desc = app
        .get_with_token(&format!("{}?sortDir=DESC", routes::USERS), &admin)
        .await;
    assert_eq!(desc.ids()[0], plain);

    let admins = app
        .get_with_token(&format!("{}?role=admin", routes::USERS), &admin)
        .await;
    let admin_rows = admins.body.as_array().unwrap();
    assert_eq!(admin_rows.len(), 1);
    assert_eq!(admin_rows[0]["email"], "admin@example.com");
    assert_eq!(admin_rows[0]["roles"], json!(["ADMIN", "USER"]));
}

#[tokio::test]
async fn get_user_requires_token() {
    let app = TestApp::spawn().await;
    let id = app.register_user("Target", "target@example.com").await;
    let token = app.create_authenticated_user("viewer@example.com").await;

    assert_eq!(app.get_without_token(&routes::user(id)).await.status, 401);

    let res = app.get_with_token(&routes::user(id), &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["name"], "Target");

    let missing = app.get_with_token(&routes::user(9999), &token).await;
    assert_eq!(missing.status, 404);
    assert_eq!(missing.body["message"], "no user found with id 9999");
}

#[tokio::test]
async fn users_may_rename_themselves_only() {
    let app = TestApp::spawn().await;
    let owner_id = app.register_user("Owner", "owner@example.com").await;
    let owner = app.login("owner@example.com").await;
    let other = app.create_authenticated_user("other@example.com").await;

    let renamed = app
        .patch_with_token(&routes::user(owner_id), &json!({ "name": "Renamed" }), &owner)
        .await;
    assert_eq!(renamed.status, 200, "Body: {}", renamed.text);
    assert_eq!(renamed.body["name"], "Renamed");

    let forbidden = app
        .patch_with_token(&routes::user(owner_id), &json!({ "name": "Hijack" }), &other)
        .await;
    assert_eq!(forbidden.status, 403);

    let admin = app.create_user_with_role("admin@example.com", "ADMIN").await;
    let by_admin = app
        .patch_with_token(&routes::user(owner_id), &json!({ "name": "Moderated" }), &admin)
        .await;
    assert_eq!(by_admin.status, 200);
    assert_eq!(by_admin.body["name"], "Moderated");
}

#[tokio::test]
async fn admin_grants_roles() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "ADMIN").await;
    let id = app.register_user("Promoted", "promoted@example.com").await;

    let res = app.put_with_token(&routes::user_role(id, "admin"), &admin).await;
    assert_eq!(res.status, 200, "Body: {}", res.text);
    assert_eq!(res.body["roles"], json!(["ADMIN", "USER"]));

    let again = app.put_with_token(&routes::user_role(id, "ADMIN"), &admin).await;
    assert_eq!(again.status, 200);
    assert_eq!(again.body["roles"], json!(["ADMIN", "USER"]));

    let unknown = app.put_with_token(&routes::user_role(id, "OWNER"), &admin).await;
    assert_eq!(unknown.status, 404);
    assert_eq!(unknown.body["message"], "no role named OWNER");

    let user = app.create_authenticated_user("user@example.com").await;
    let forbidden = app.put_with_token(&routes::user_role(id, "ADMIN"), &user).await;
    assert_eq!(forbidden.status, 403);
}

#[tokio::test]
async fn admin_deletes_users() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "ADMIN").await;
    let id = app.register_user("Leaving", "leaving@example.com").await;

    let user = app.create_authenticated_user("user@example.com").await;
    assert_eq!(app.delete_with_token(&routes::user(id), &user).await.status, 403);

    let res = app.delete_with_token(&routes::user(id), &admin).await;
    assert_eq!(res.status, 200, "Body: {}", res.text);

    assert_eq!(app.get_with_token(&routes::user(id), &admin).await.status, 404);
    let login = app
        .post_without_token(
            routes::LOGIN,
            &json!({ "email": "leaving@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(login.status, 401);
}

#[tokio::test]
async fn bootstrap_admin_is_created_once() {
    let app = TestApp::spawn().await;
    let admin = AdminConfig {
        name: "Root".into(),
        email: "root@example.com".into(),
        password: PASSWORD.into(),
    };

    catalog_server::seed::ensure_admin(&app.db, &admin).await.unwrap();
    catalog_server::seed::ensure_admin(&app.db, &admin).await.unwrap();

    let service = UserService::new(&app.db);
    let users = service.list(SortDir::Asc, Some("ADMIN")).await.unwrap();
    assert_eq!(users.len(), 1);
    assert!(users[0].has_role("ADMIN"));

    let token = app.login("root@example.com").await;
    assert_eq!(app.get_with_token(routes::USERS, &token).await.status, 200);
}

#[tokio::test]
async fn service_authenticate_rejects_bad_password() {
    let app = TestApp::spawn().await;
    app.register_user("Svc", "svc@example.com").await;

    let err = UserService::new(&app.db)
        .authenticate("svc@example.com", "nope-nope")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidCredentials));
}
