use chrono::{NaiveDate, Utc};
use serde_json::json;

use catalog_server::domain::{Game, SortDir};
use catalog_server::services::{GameService, ServiceError};

use crate::common::{TestApp, routes};

#[tokio::test]
async fn create_game_inside_studio() {
    let app = TestApp::spawn().await;
    let studio = app.create_studio("Pixel Forge").await;

    let res = app
        .post_without_token(
            routes::GAMES,
            &json!({
                "studioId": studio,
                "name": "Nebula Drift",
                "overview": "A space racer",
                "launchDate": "2023-11-20",
            }),
        )
        .await;

    assert_eq!(res.status, 201, "Body: {}", res.text);
    assert!(res.body["id"].is_i64());
    assert_eq!(res.body["name"], "Nebula Drift");
    assert_eq!(res.body["overview"], "A space racer");
    assert_eq!(res.body["launchDate"], "2023-11-20");
    assert_eq!(res.body["studio"], "Pixel Forge");

    let owner = app.get_without_token(&routes::studio(studio)).await;
    assert_eq!(owner.body["games"][0]["id"], res.body["id"]);
}

#[tokio::test]
async fn create_game_accepts_legacy_studio_key() {
    let app = TestApp::spawn().await;
    let studio = app.create_studio("Legacy").await;

    let res = app
        .post_without_token(
            routes::GAMES,
            &json!({ "fkStudioId": studio, "name": "Old Client", "overview": "o" }),
        )
        .await;

    assert_eq!(res.status, 201, "Body: {}", res.text);
    assert_eq!(res.body["studio"], "Legacy");
}

#[tokio::test]
async fn missing_launch_date_defaults_to_today() {
    let app = TestApp::spawn().await;
    let studio = app.create_studio("Today").await;
    let before = Utc::now().date_naive();

    let res = app
        .post_without_token(
            routes::GAMES,
            &json!({ "studioId": studio, "name": "Undated", "overview": "o" }),
        )
        .await;

    let after = Utc::now().date_naive();
    assert_eq!(res.status, 201);
    let launch: NaiveDate = res.body["launchDate"].as_str().unwrap().parse().unwrap();
    assert!(launch == before || launch == after);
}

#[tokio::test]
async fn create_game_for_missing_studio_persists_nothing() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::GAMES,
            &json!({ "studioId": 404, "name": "Orphan", "overview": "o" }),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "INVALID_ARGUMENT");
    assert_eq!(res.body["message"], "no studio registered with id 404");

    let games = app.get_without_token(routes::GAMES).await;
    assert!(games.ids().is_empty());
}

#[tokio::test]
async fn create_game_with_id_is_rejected() {
    let app = TestApp::spawn().await;
    let studio = app.create_studio("Strict").await;

    let res = app
        .post_without_token(
            routes::GAMES,
            &json!({ "id": 3, "studioId": studio, "name": "Dup", "overview": "o" }),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["message"], "record with id 3 already inserted");
}

#[tokio::test]
async fn create_game_rejects_blank_name() {
    let app = TestApp::spawn().await;
    let studio = app.create_studio("Strict").await;

    let res = app
        .post_without_token(
            routes::GAMES,
            &json!({ "studioId": studio, "name": "", "overview": "o" }),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn list_games_honours_sort_direction() {
    let app = TestApp::spawn().await;
    let s1 = app.create_studio("One").await;
    let s2 = app.create_studio("Two").await;
    let a = app.create_game(s1, "A").await;
    let b = app.create_game(s2, "B").await;
    let c = app.create_game(s1, "C").await;

    let asc = app.get_without_token(routes::GAMES).await;
    assert_eq!(asc.ids(), vec![a, b, c]);

    let desc = app
        .get_without_token(&format!("{}?sortDir=Desc", routes::GAMES))
        .await;
    assert_eq!(desc.ids(), vec![c, b, a]);

    let bad = app
        .get_without_token(&format!("{}?sortDir=sideways", routes::GAMES))
        .await;
    assert_eq!(bad.status, 400);
    assert_eq!(
        bad.body["message"],
        "invalid SORT parameter (must be ASC or DESC)"
    );
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let app = TestApp::spawn().await;
    let studio = app.create_studio("Search").await;
    let heist = app.create_game(studio, "Academy Heist").await;
    app.create_game(studio, "Nebula Drift").await;
    let hacker = app.create_game(studio, "HACKMAN").await;

    let res = app.get_without_token(&routes::game_search("ADEM")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.ids(), vec![heist]);

    let res = app.get_without_token(&routes::game_search("acad")).await;
    assert_eq!(res.ids(), vec![heist]);

    // Not a contiguous run of "academy heist".
    let res = app.get_without_token(&routes::game_search("acm")).await;
    assert!(res.ids().is_empty());

    let res = app.get_without_token(&routes::game_search("ac")).await;
    assert_eq!(res.ids(), vec![heist, hacker]);

    let none = app.get_without_token(&routes::game_search("zzz")).await;
    assert_eq!(none.status, 200);
    assert!(none.ids().is_empty());
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let app = TestApp::spawn().await;
    let studio = app.create_studio("Literal").await;
    let percent = app.create_game(studio, "100% Pure").await;
    app.create_game(studio, "Plain").await;

    let res = app.get_without_token(&routes::game_search("%25")).await;
    assert_eq!(res.ids(), vec![percent]);

    let res = app.get_without_token(&routes::game_search("_")).await;
    assert!(res.ids().is_empty());
}

#[tokio::test]
async fn search_folds_both_sides_the_same_way() {
    let app = TestApp::spawn().await;
    let studio = app.create_studio("Accents").await;
    let ecole = app.create_game(studio, "École Dérive").await;

    let exact = GameService::new(&app.db)
        .search_by_name("École")
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].id.value(), Some(ecole));

    let mixed = GameService::new(&app.db)
        .search_by_name("cOLE d")
        .await
        .unwrap();
    assert_eq!(mixed.len(), 1);
}

#[tokio::test]
async fn search_without_name_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token("/games/name").await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn get_unknown_game_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(&routes::game(12345)).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["message"], "no game found with id 12345");
}

#[tokio::test]
async fn update_game_keeps_owning_studio() {
    let app = TestApp::spawn().await;
    let studio = app.create_studio("Owner").await;
    let id = app.create_game(studio, "Draft").await;

    let res = app
        .patch_without_token(
            &routes::game(id),
            &json!({
                "name": "Final",
                "overview": "Polished",
                "launchDate": "2025-06-01",
            }),
        )
        .await;

    assert_eq!(res.status, 200, "Body: {}", res.text);
    assert_eq!(res.id(), id);
    assert_eq!(res.body["name"], "Final");
    assert_eq!(res.body["overview"], "Polished");
    assert_eq!(res.body["launchDate"], "2025-06-01");
    assert_eq!(res.body["studio"], "Owner");

    let games = app.get_without_token(&routes::studio_games(studio)).await;
    assert_eq!(games.ids(), vec![id]);
}

#[tokio::test]
async fn update_unknown_game_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .patch_without_token(
            &routes::game(55),
            &json!({ "name": "X", "overview": "Y", "launchDate": "2025-06-01" }),
        )
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn delete_game_requires_admin() {
    let app = TestApp::spawn().await;
    let studio = app.create_studio("Owner").await;
    let id = app.create_game(studio, "Target").await;

    let anonymous = app.delete_without_token(&routes::game(id)).await;
    assert_eq!(anonymous.status, 401);

    let invalid = app.delete_with_token(&routes::game(id), "not-a-jwt").await;
    assert_eq!(invalid.status, 401);
    assert_eq!(invalid.body["code"], "TOKEN_INVALID");

    let user = app.create_authenticated_user("user@example.com").await;
    let forbidden = app.delete_with_token(&routes::game(id), &user).await;
    assert_eq!(forbidden.status, 403);

    let admin = app.create_user_with_role("admin@example.com", "ADMIN").await;
    let ok = app.delete_with_token(&routes::game(id), &admin).await;
    assert_eq!(ok.status, 200, "Body: {}", ok.text);

    assert_eq!(app.get_without_token(&routes::game(id)).await.status, 404);
    let owner = app.get_without_token(&routes::studio(studio)).await;
    assert_eq!(owner.status, 200);
    assert_eq!(owner.body["games"], json!([]));
}

#[tokio::test]
async fn concurrent_creates_in_one_studio_both_persist() {
    let app = TestApp::spawn().await;
    let studio = app.create_studio("Busy").await;

    let body_a = json!({ "studioId": studio, "name": "Left", "overview": "o" });
    let body_b = json!({ "studioId": studio, "name": "Right", "overview": "o" });
    let (a, b) = tokio::join!(
        app.post_without_token(routes::GAMES, &body_a),
        app.post_without_token(routes::GAMES, &body_b),
    );
    assert_eq!(a.status, 201, "Body: {}", a.text);
    assert_eq!(b.status, 201, "Body: {}", b.text);

    let games = app.get_without_token(&routes::studio_games(studio)).await;
    let mut names: Vec<_> = games
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Left", "Right"]);
}

#[tokio::test]
async fn service_insert_reports_missing_studio() {
    let app = TestApp::spawn().await;
    let game = Game::new(
        "Lost".into(),
        "o".into(),
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
    );

    let err = GameService::new(&app.db).insert(game, 9).await.unwrap_err();

    assert!(matches!(err, ServiceError::InvalidArgument(_)));
    assert!(GameService::new(&app.db).list(SortDir::Asc).await.unwrap().is_empty());
}
