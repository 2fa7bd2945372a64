//! Space scenario tests
//!
//! Space lifecycle, ownership checks and element placement.

use serde_json::{json, Value};

use crate::harness::{Session, TestServer};

/// An admin with two elements and a 100x200 map holding both
struct Fixture {
    server: TestServer,
    admin: Session,
    elements: [String; 2],
    map_id: String,
}

async fn fixture() -> Fixture {
    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin("admin").await.unwrap();
    let first = server.create_element(&admin, 1, 1).await.unwrap();
    let second = server.create_element(&admin, 2, 2).await.unwrap();
    let map_id = server.create_map(&admin, &[&first, &second]).await.unwrap();

    Fixture {
        server,
        admin,
        elements: [first, second],
        map_id,
    }
}

async fn fetch_space(server: &TestServer, id: &str) -> (u16, Value) {
    let resp = server.get(&format!("/api/v1/space/{}", id)).await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn test_create_space_with_only_name_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();

    let resp = server
        .post_auth("/api/v1/space", &json!({ "name": "Test" }), &alice.token)
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_create_space_rejects_bad_input() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();

    for body in [
        json!({ "name": "", "dimensions": "10x10" }),
        json!({ "name": "Test", "dimensions": "10by10" }),
        json!({ "name": "Test", "dimensions": "0x10" }),
        json!({ "name": "Test", "mapId": "no-such-map" }),
    ] {
        let resp = server
            .post_auth("/api/v1/space", &body, &alice.token)
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "body {} should be rejected", body);
    }
}

#[tokio::test]
async fn test_create_empty_space() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();

    let id = server
        .create_space(&alice, json!({ "name": "Test", "dimension": "100x200" }))
        .await
        .unwrap();

    let (status, body) = fetch_space(&server, &id).await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "Test");
    assert_eq!(body["dimensions"], "100x200");
    assert_eq!(body["elements"], json!([]));
}

#[tokio::test]
async fn test_space_from_map_copies_defaults() {
    let f = fixture().await;
    let alice = f.server.user("alice").await.unwrap();

    let id = f
        .server
        .create_space(&alice, json!({ "name": "Test", "mapId": f.map_id }))
        .await
        .unwrap();

    let (status, body) = fetch_space(&f.server, &id).await;
    assert_eq!(status, 200);
    assert_eq!(body["dimensions"], "100x200");
    assert_eq!(body["thumbnail"], "https://img.example/meadow.png");

    let elements = body["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0]["element"]["id"], f.elements[0].as_str());
    assert_eq!(elements[1]["element"]["id"], f.elements[1].as_str());
    assert_eq!(elements[1]["x"], 10);
    assert_eq!(elements[1]["y"], 10);
    // Placement ids are not catalog ids
    assert_ne!(elements[0]["id"], elements[0]["element"]["id"]);
}

#[tokio::test]
async fn test_fetch_unknown_space() {
    let server = TestServer::start().await.expect("Failed to start server");

    let (status, body) = fetch_space(&server, "123kasdk01").await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_delete_own_space() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let id = server
        .create_space(&alice, json!({ "name": "Test", "dimensions": "100x200" }))
        .await
        .unwrap();

    let resp = server
        .delete_auth(&format!("/api/v1/space/{}", id), &alice.token)
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (status, _) = fetch_space(&server, &id).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_delete_other_users_space() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let mallory = server.user("mallory").await.unwrap();
    let id = server
        .create_space(&alice, json!({ "name": "Test", "dimensions": "100x200" }))
        .await
        .unwrap();

    let resp = server
        .delete_auth(&format!("/api/v1/space/{}", id), &mallory.token)
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let (status, _) = fetch_space(&server, &id).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_list_spaces_only_returns_own() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let bob = server.user("bob").await.unwrap();

    let first = server
        .create_space(&alice, json!({ "name": "One", "dimensions": "10x10" }))
        .await
        .unwrap();
    let second = server
        .create_space(&alice, json!({ "name": "Two", "dimensions": "20x20" }))
        .await
        .unwrap();
    server
        .create_space(&bob, json!({ "name": "Bobs", "dimensions": "10x10" }))
        .await
        .unwrap();

    let body: Value = server
        .get_auth("/api/v1/space/all", &alice.token)
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let spaces = body["spaces"].as_array().unwrap();
    assert_eq!(spaces.len(), 2);
    assert_eq!(spaces[0]["id"], first.as_str());
    assert_eq!(spaces[1]["id"], second.as_str());
    assert_eq!(spaces[1]["dimensions"], "20x20");
}

#[tokio::test]
async fn test_remove_then_add_element() {
    let f = fixture().await;
    let alice = f.server.user("alice").await.unwrap();
    let id = f
        .server
        .create_space(&alice, json!({ "name": "Test", "mapId": f.map_id }))
        .await
        .unwrap();

    let (_, body) = fetch_space(&f.server, &id).await;
    let placement = body["elements"][0]["id"].as_str().unwrap().to_string();

    let resp = f
        .server
        .delete_json_auth(
            "/api/v1/space/element",
            &json!({ "spaceId": id, "elementId": placement }),
            &alice.token,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (_, body) = fetch_space(&f.server, &id).await;
    assert_eq!(body["elements"].as_array().unwrap().len(), 1);

    let resp = f
        .server
        .post_auth(
            "/api/v1/space/element",
            &json!({ "spaceId": id, "elementId": f.elements[0], "x": 50, "y": 20 }),
            &alice.token,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let added: Value = resp.json().await.unwrap();
    assert!(added["id"].as_str().is_some());

    let (_, body) = fetch_space(&f.server, &id).await;
    assert_eq!(body["elements"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_add_element_out_of_bounds() {
    let f = fixture().await;
    let alice = f.server.user("alice").await.unwrap();
    let id = f
        .server
        .create_space(&alice, json!({ "name": "Test", "dimensions": "100x200" }))
        .await
        .unwrap();

    let resp = f
        .server
        .post_auth(
            "/api/v1/space/element",
            &json!({ "spaceId": id, "elementId": f.elements[0], "x": 1000, "y": 2 }),
            &alice.token,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_add_unknown_element() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let id = server
        .create_space(&alice, json!({ "name": "Test", "dimensions": "100x200" }))
        .await
        .unwrap();

    let resp = server
        .post_auth(
            "/api/v1/space/element",
            &json!({ "spaceId": id, "elementId": "missing", "x": 1, "y": 1 }),
            &alice.token,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_only_owner_changes_elements() {
    let f = fixture().await;
    let alice = f.server.user("alice").await.unwrap();
    let id = f
        .server
        .create_space(&alice, json!({ "name": "Test", "mapId": f.map_id }))
        .await
        .unwrap();
    let (_, body) = fetch_space(&f.server, &id).await;
    let placement = body["elements"][0]["id"].as_str().unwrap().to_string();

    // Admins get no special rights over other users' spaces
    let resp = f
        .server
        .post_auth(
            "/api/v1/space/element",
            &json!({ "spaceId": id, "elementId": f.elements[0], "x": 1, "y": 1 }),
            &f.admin.token,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = f
        .server
        .delete_json_auth(
            "/api/v1/space/element",
            &json!({ "spaceId": id, "elementId": placement }),
            &f.admin.token,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let (_, body) = fetch_space(&f.server, &id).await;
    assert_eq!(body["elements"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_remove_unknown_placement() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.user("alice").await.unwrap();
    let id = server
        .create_space(&alice, json!({ "name": "Test", "dimensions": "100x200" }))
        .await
        .unwrap();

    let resp = server
        .delete_json_auth(
            "/api/v1/space/element",
            &json!({ "spaceId": id, "elementId": "missing" }),
            &alice.token,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}
