// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bitbucket client tests against a mock API server.

use devstats::error::AppError;
use devstats::models::{AccountKind, Provider};
use devstats::services::BitbucketClient;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> BitbucketClient {
    BitbucketClient::new(server.uri(), None, 4)
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Workspace `acme`: two source repositories and a fork, over two pages.
async fn mount_repositories(server: &MockServer) {
    mount_json(
        server,
        "/repositories/acme",
        json!({
            "values": [
                {"slug": "app", "language": "Rust", "size": 1000, "has_issues": true},
                {"slug": "lib", "language": "python", "size": 200, "has_issues": false}
            ],
            "next": format!("{}/repositories/acme?page=2", server.uri())
        }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/repositories/acme"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [
                {
                    "slug": "fork",
                    "language": "",
                    "size": 300,
                    "has_issues": true,
                    "parent": {"full_name": "upstream/fork"}
                }
            ]
        })))
        .with_priority(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_repositories_follows_next() {
    let server = MockServer::start().await;
    mount_repositories(&server).await;

    let repos = client(&server).list_repositories("acme").await.unwrap();

    let slugs: Vec<&str> = repos.iter().map(|r| r.handle.as_str()).collect();
    assert_eq!(slugs, vec!["app", "lib", "fork"]);
    assert!(!repos[0].is_fork);
    assert!(repos[2].is_fork);
    assert_eq!(repos[0].language.as_deref(), Some("rust"));
    assert_eq!(repos[2].language, None);
}

#[tokio::test]
async fn test_empty_page_with_next_keeps_walking() {
    let server = MockServer::start().await;

    mount_json(
        &server,
        "/repositories/sparse",
        json!({
            "values": [],
            "next": format!("{}/repositories/sparse?page=2", server.uri())
        }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/repositories/sparse"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [{"slug": "late", "size": 5, "has_issues": false}]
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    let repos = client(&server).list_repositories("sparse").await.unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].handle, "late");
}

#[tokio::test]
async fn test_resolve_individual_account() {
    let server = MockServer::start().await;
    mount_json(&server, "/users/jdoe", json!({"username": "jdoe"})).await;

    // Never consulted once the user probe succeeds
    Mock::given(method("GET"))
        .and(path("/teams/jdoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let kind = client(&server).resolve_account_kind("jdoe").await.unwrap();
    assert_eq!(kind, AccountKind::Individual);
}

#[tokio::test]
async fn test_resolve_falls_back_to_team() {
    let server = MockServer::start().await;
    // /users/acme is unmatched and answers 404
    mount_json(&server, "/teams/acme", json!({"username": "acme"})).await;

    let kind = client(&server).resolve_account_kind("acme").await.unwrap();
    assert_eq!(kind, AccountKind::Group);
}

#[tokio::test]
async fn test_unresolvable_account() {
    let server = MockServer::start().await;

    let err = client(&server).resolve_account_kind("nobody").await.unwrap_err();
    match err {
        AppError::UnresolvedAccount { provider, handle } => {
            assert_eq!(provider, Provider::Bitbucket);
            assert_eq!(handle, "nobody");
        }
        other => panic!("expected unresolved account, got {:?}", other),
    }
}

#[tokio::test]
async fn test_team_followers_use_team_endpoint() {
    let server = MockServer::start().await;
    mount_json(&server, "/teams/acme/followers", json!({"size": 11, "values": []})).await;

    let followers = client(&server)
        .follower_count("acme", AccountKind::Group)
        .await
        .unwrap();
    assert_eq!(followers, 11);
}

#[tokio::test]
async fn test_fetch_profile() {
    let server = MockServer::start().await;
    mount_repositories(&server).await;

    mount_json(&server, "/users/acme", json!({"username": "acme"})).await;
    mount_json(&server, "/users/acme/followers", json!({"size": 7})).await;

    // Commits: app spans two pages, lib has one commit
    mount_json(
        &server,
        "/repositories/acme/app/commits",
        json!({
            "values": [{"hash": "a1"}, {"hash": "a2"}],
            "next": format!("{}/repositories/acme/app/commits?page=2", server.uri())
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/repositories/acme/app/commits"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [{"hash": "a3"}]
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_json(
        &server,
        "/repositories/acme/lib/commits",
        json!({"values": [{"hash": "l1"}]}),
    )
    .await;

    // Only source repositories with a tracker have their issues read
    Mock::given(method("GET"))
        .and(path("/repositories/acme/app/issues"))
        .and(query_param("q", "state=\"open\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"size": 4})))
        .expect(1)
        .mount(&server)
        .await;
    for slug in ["lib", "fork"] {
        Mock::given(method("GET"))
            .and(path(format!("/repositories/acme/{}/issues", slug)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"size": 100})))
            .expect(0)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/repositories/acme/fork/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"values": []})))
        .expect(0)
        .mount(&server)
        .await;

    // Watchers count on every repository, forks too
    mount_json(&server, "/repositories/acme/app/watchers", json!({"size": 2})).await;
    mount_json(&server, "/repositories/acme/lib/watchers", json!({"size": 1})).await;
    mount_json(&server, "/repositories/acme/fork/watchers", json!({"size": 1})).await;

    let stats = client(&server).fetch_profile("acme").await.unwrap();

    assert_eq!(stats.public_source_repositories, 2);
    assert_eq!(stats.public_fork_repositories, 1);
    assert_eq!(stats.total_account_size, 1500);
    assert_eq!(stats.follower_count, 7);
    assert_eq!(stats.total_source_commit_count, 4);
    assert_eq!(stats.total_open_issues, 4);
    assert_eq!(stats.watcher_count, 4);
    assert_eq!(stats.stars_received, 0);
    assert_eq!(stats.stars_given, 0);
    assert_eq!(
        stats.languages.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["python", "rust"]
    );
    assert!(stats.repo_topics.is_empty());
}

#[tokio::test]
async fn test_missing_watchers_fails_profile() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/repositories/solo",
        json!({"values": [{"slug": "only", "size": 1, "has_issues": false}]}),
    )
    .await;
    mount_json(&server, "/users/solo", json!({})).await;
    mount_json(&server, "/users/solo/followers", json!({"size": 0})).await;
    mount_json(&server, "/repositories/solo/only/commits", json!({"values": []})).await;
    Mock::given(method("GET"))
        .and(path("/repositories/solo/only/watchers"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server).fetch_profile("solo").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Upstream {
            provider: Provider::Bitbucket,
            status: 500,
            ..
        }
    ));
}

#[tokio::test]
async fn test_repository_without_size_fails_listing() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/repositories/acme",
        json!({"values": [{"slug": "app", "has_issues": true}]}),
    )
    .await;

    let err = client(&server).fetch_profile("acme").await.unwrap_err();
    assert!(err.is_upstream());
    assert!(matches!(err, AppError::UpstreamTransport { .. }));
}

#[tokio::test]
async fn test_commit_page_without_values_fails_profile() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/repositories/solo",
        json!({"values": [{"slug": "only", "size": 1, "has_issues": false}]}),
    )
    .await;
    mount_json(&server, "/users/solo", json!({})).await;
    mount_json(&server, "/users/solo/followers", json!({"size": 0})).await;
    mount_json(&server, "/repositories/solo/only/watchers", json!({"size": 0})).await;
    mount_json(&server, "/repositories/solo/only/commits", json!({})).await;

    let err = client(&server).fetch_profile("solo").await.unwrap_err();
    assert!(err.is_upstream());
    assert!(matches!(err, AppError::UpstreamTransport { .. }));
}
