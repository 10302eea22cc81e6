//! Projects v2 GraphQL client behavior against a local stub server.

use pretty_assertions::assert_eq;
use serde_json::json;
use tpgh_github::{BoardField, BoardItem, GitHubError, ProjectsClient};
use tpgh_stub::{RecordedRequest, StubResponse, StubServer};

fn client(server: &StubServer) -> ProjectsClient {
    ProjectsClient::new("ghp_test", &format!("{}/graphql", server.url())).unwrap()
}

fn after(req: &RecordedRequest) -> Option<String> {
    req.json()["variables"]["after"].as_str().map(String::from)
}

fn query_text(req: &RecordedRequest) -> String {
    req.json()["query"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn boards_follow_cursors_across_pages() {
    let server = StubServer::start(|req| {
        let page = match after(req).as_deref() {
            None => json!({
                "pageInfo": {"hasNextPage": true, "endCursor": "c1"},
                "nodes": [{"id": "PVT_1", "title": "Roadmap"}]
            }),
            Some("c1") => json!({
                "pageInfo": {"hasNextPage": false, "endCursor": null},
                "nodes": [{"id": "PVT_2", "title": "Backlog"}, null]
            }),
            Some(_) => return StubResponse::empty(500),
        };
        StubResponse::json(200, json!({"data": {"organization": {"projectsV2": page}}}))
    });

    let boards = client(&server).boards("acme").await.unwrap();

    let titles: Vec<&str> = boards.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Roadmap", "Backlog"]);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/graphql");
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].json()["variables"]["org"], json!("acme"));
    assert_eq!(requests[0].header("Authorization"), Some("Bearer ghp_test"));
}

#[tokio::test]
async fn graphql_errors_surface_their_messages() {
    let server = StubServer::start(|_| {
        StubResponse::json(
            200,
            json!({
                "data": {"organization": null},
                "errors": [{"message": "Could not resolve to an Organization with the login of 'nope'."}]
            }),
        )
    });

    let err = client(&server).boards("nope").await.unwrap_err();

    assert!(matches!(err, GitHubError::GraphQl { ref message, .. } if message.contains("nope")));
}

#[tokio::test]
async fn null_organization_without_errors_is_not_found() {
    let server =
        StubServer::start(|_| StubResponse::json(200, json!({"data": {"organization": null}})));

    let err = client(&server).boards("ghost").await.unwrap_err();

    assert!(matches!(err, GitHubError::NotFound(ref what) if what.contains("ghost")));
}

#[tokio::test]
async fn items_keep_issue_content_ids() {
    let server = StubServer::start(|_| {
        StubResponse::json(
            200,
            json!({"data": {"node": {"items": {
                "pageInfo": {"hasNextPage": false, "endCursor": null},
                "nodes": [
                    {"id": "PVTI_1", "content": {"id": "I_1"}},
                    {"id": "PVTI_2", "content": {}},
                ]
            }}}}),
        )
    });

    let items = client(&server).items("PVT_1").await.unwrap();

    assert_eq!(
        items,
        vec![
            BoardItem {
                id: "PVTI_1".into(),
                content_id: Some("I_1".into()),
            },
            BoardItem {
                id: "PVTI_2".into(),
                content_id: None,
            },
        ]
    );
}

#[tokio::test]
async fn fields_skip_nodes_without_common_fields() {
    let server = StubServer::start(|_| {
        StubResponse::json(
            200,
            json!({"data": {"node": {"fields": {
                "pageInfo": {"hasNextPage": false, "endCursor": null},
                "nodes": [
                    {"id": "F_1", "name": "Estimate", "dataType": "NUMBER"},
                    {},
                    {"id": "F_2", "name": "Status", "dataType": "SINGLE_SELECT"},
                ]
            }}}}),
        )
    });

    let fields = client(&server).fields("PVT_1").await.unwrap();

    assert_eq!(
        fields,
        vec![
            BoardField {
                id: "F_1".into(),
                name: "Estimate".into(),
                data_type: Some("NUMBER".into()),
            },
            BoardField {
                id: "F_2".into(),
                name: "Status".into(),
                data_type: Some("SINGLE_SELECT".into()),
            },
        ]
    );
}

#[tokio::test]
async fn add_item_returns_new_item_id() {
    let server = StubServer::start(|_| {
        StubResponse::json(
            200,
            json!({"data": {"addProjectV2ItemById": {"item": {"id": "PVTI_9"}}}}),
        )
    });

    let id = client(&server).add_item("PVT_1", "I_7").await.unwrap();

    assert_eq!(id, "PVTI_9");
    let variables = server.requests()[0].json()["variables"].clone();
    assert_eq!(variables, json!({"project": "PVT_1", "content": "I_7"}));
}

#[tokio::test]
async fn set_number_field_sends_float_value() {
    let server = StubServer::start(|_| {
        StubResponse::json(
            200,
            json!({"data": {"updateProjectV2ItemFieldValue": {"projectV2Item": {"id": "PVTI_9"}}}}),
        )
    });

    client(&server)
        .set_number_field("PVT_1", "PVTI_9", "F_1", 5.0)
        .await
        .unwrap();

    let req = &server.requests()[0];
    assert!(query_text(req).contains("updateProjectV2ItemFieldValue"));
    assert_eq!(req.json()["variables"]["value"], json!(5.0));
    assert_eq!(req.json()["variables"]["field"], json!("F_1"));
}

#[tokio::test]
async fn issue_node_id_lookup() {
    let server = StubServer::start(|_| {
        StubResponse::json(
            200,
            json!({"data": {"repository": {"issue": {"id": "I_kwDO"}}}}),
        )
    });

    let id = client(&server).issue_node_id("acme", "roadmap", 7).await.unwrap();

    assert_eq!(id, "I_kwDO");
    assert_eq!(
        server.requests()[0].json()["variables"],
        json!({"owner": "acme", "repo": "roadmap", "number": 7})
    );
}

#[tokio::test]
async fn missing_issue_is_not_found() {
    let server = StubServer::start(|_| {
        StubResponse::json(200, json!({"data": {"repository": {"issue": null}}}))
    });

    let err = client(&server)
        .issue_node_id("acme", "roadmap", 999)
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::NotFound(ref what) if what.contains("#999")));
}
