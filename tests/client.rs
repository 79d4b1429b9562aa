//
//  hubrest
//  tests/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::sync::Arc;

use hubrest::api::ReplayTransport;
use hubrest::auth::{CredentialProvider, CredentialStore};
use hubrest::{Auth, Client, Config, Error, HttpErrorKind, Result};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

/// Store that never has anything and counts invalidations.
#[derive(Default)]
struct EmptyStore {
    forgotten: std::sync::Mutex<Vec<String>>,
}

impl CredentialStore for EmptyStore {
    fn search(&self, _host: &str, _user: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn forget(&self, _host: &str, user: &str) -> Result<()> {
        self.forgotten.lock().unwrap().push(user.to_string());
        Ok(())
    }

    fn save(&self, _host: &str, _user: &str, _secret: &str) -> Result<()> {
        Ok(())
    }
}

struct FreshToken;

impl CredentialProvider for FreshToken {
    fn create_token(&self, _host: &str, _username: &str, _identity: &str) -> Result<String> {
        Ok("fresh".to_string())
    }

    fn password(&self, _host: &str, _username: &str) -> Result<String> {
        Ok("pw".to_string())
    }
}

fn client(replay: &Arc<ReplayTransport>) -> Client {
    let mut config = Config::default();
    config.set_user("api.github.com", "octocat");
    Client::from_config(&config)
        .unwrap()
        .with_transport(replay.clone())
}

#[tokio::test]
async fn created_token_is_used_after_store_miss() {
    let replay = Arc::new(ReplayTransport::new());
    replay.respond(200, &[], r#"{"login": "octocat"}"#);
    let store = Arc::new(EmptyStore::default());

    let response = client(&replay)
        .with_store(store.clone())
        .with_credential_provider(Arc::new(FreshToken))
        .get("/user")
        .send()
        .await;

    let response = assert_ok!(response);
    assert_eq!(response.body, Some(json!({"login": "octocat"})));
    assert_eq!(*store.forgotten.lock().unwrap(), vec!["octocat^hubrest"]);
    assert_eq!(
        replay.requests()[0].header("authorization"),
        Some("token fresh")
    );
}

#[tokio::test]
async fn missing_credential_stops_before_sending() {
    let replay = Arc::new(ReplayTransport::new());

    let result = client(&replay)
        .with_store(Arc::new(EmptyStore::default()))
        .get("/user")
        .send()
        .await;

    let err = assert_err!(result);
    assert!(matches!(err, Error::MissingCredential { .. }));
    assert!(replay.requests().is_empty());
}

#[tokio::test]
async fn every_status_maps_to_its_kind() {
    let cases = [
        (301, HttpErrorKind::Moved),
        (400, HttpErrorKind::BadRequest),
        (401, HttpErrorKind::Unauthorized),
        (403, HttpErrorKind::Forbidden),
        (404, HttpErrorKind::NotFound),
        (422, HttpErrorKind::Unprocessable),
        (500, HttpErrorKind::Other),
        (409, HttpErrorKind::Other),
    ];

    let replay = Arc::new(ReplayTransport::new());
    for (status, _) in cases {
        replay.respond(status, &[], r#"{"message": "nope"}"#);
    }
    let client = client(&replay);

    for (status, kind) in cases {
        let result = client.get("/thing").auth(Auth::None).send().await;
        match assert_err!(result) {
            Error::Http(err) => {
                assert_eq!(err.kind(), kind);
                assert_eq!(err.status(), status);
                assert_eq!(err.message(), Some("nope"));
            }
            other => panic!("unexpected error for {status}: {other:?}"),
        }
    }
}

#[tokio::test]
async fn paginated_listing_with_basic_auth() {
    let replay = Arc::new(ReplayTransport::new());
    replay
        .respond(
            200,
            &[(
                "Link",
                "<https://api.github.com/orgs/o/repos?page=2>; rel=\"next\", \
                 <https://api.github.com/orgs/o/repos?page=2>; rel=\"last\"",
            )],
            r#"[{"name": "a"}]"#,
        )
        .respond(
            200,
            &[(
                "Link",
                "<https://api.github.com/orgs/o/repos?page=1>; rel=\"first\"",
            )],
            r#"[{"name": "b"}]"#,
        );

    let response = client(&replay)
        .with_store(Arc::new(EmptyStore::default()))
        .with_credential_provider(Arc::new(FreshToken))
        .get("/orgs/o/repos")
        .auth(Auth::Basic)
        .paginate()
        .send()
        .await
        .unwrap();

    assert_eq!(response.body, Some(json!([{"name": "a"}, {"name": "b"}])));
    assert_eq!(response.link_relations()[0].0, "first");

    let sent = replay.requests();
    assert_eq!(sent.len(), 2);
    assert!(sent
        .iter()
        .all(|r| r.header("Authorization") == Some("Basic b2N0b2NhdDpwdw==")));
}
