//! REST client tests against a mock backend.

#![allow(clippy::unwrap_used)]

use echange_core::application::ApplicationError;
use echange_core::domain::entities::{Echange, EchangeCreateData, EchangeUpdateData};
use echange_core::domain::services::bulk::BulkEvent;
use echange_core::domain::services::query::EchangeQuery;
use echange_core::domain::services::validation::ValidationPolicy;
use echange_core::domain::value_objects::{CategorieId, EchangeId, UserId};
use echange_core::infrastructure::api::{ApiError, EchangeApiClient, EchangeList};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing(titre: &str) -> EchangeCreateData {
    EchangeCreateData::builder(
        titre,
        "Vélo de route en aluminium, taille 56",
        CategorieId::new_v4(),
        "Vélo de route taille 56",
        "Guitare acoustique",
    )
    .build()
}

fn sample(titre: &str) -> Echange {
    Echange::create(listing(titre), UserId::new_v4(), &ValidationPolicy::default()).unwrap()
}

fn client_for(server: &MockServer) -> EchangeApiClient {
    EchangeApiClient::new(format!("{}/", server.uri()), 2_000).unwrap()
}

async fn list_with_body(body: Value) -> EchangeList {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/echanges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;
    client_for(&server)
        .list(&EchangeQuery::new())
        .await
        .unwrap()
}

mod response_shapes {
    use super::*;

    #[tokio::test]
    async fn every_list_shape_normalizes_identically() {
        let items = json!([sample("Lampe de bureau"), sample("Chaise en chêne")]);
        let meta = json!({"count": 2, "total": 2, "page": 1, "pages": 1});

        let bare = list_with_body(items.clone()).await;

        let mut wrapped = meta.clone();
        wrapped["data"] = items.clone();
        wrapped["status"] = json!("success");
        let wrapped = list_with_body(wrapped).await;

        let mut named = meta.clone();
        named["echanges"] = items.clone();
        let named = list_with_body(named).await;

        let nested = list_with_body(json!({"status": "success", "data": {
            "echanges": items, "count": 2, "total": 2, "page": 1, "pages": 1
        }}))
        .await;

        assert_eq!(bare.echanges.len(), 2);
        assert_eq!(bare.count, 2);
        assert_eq!(bare.total, 2);
        assert_eq!(bare.page, 1);
        assert_eq!(bare.pages, 1);
        assert_eq!(bare, wrapped);
        assert_eq!(bare, named);
        assert_eq!(bare, nested);
    }

    #[tokio::test]
    async fn envelope_meta_is_kept() {
        let list = list_with_body(json!({
            "data": [sample("Lampe de bureau")],
            "count": 1,
            "total": 41,
            "page": 3,
            "pages": 5
        }))
        .await;
        assert_eq!(list.count, 1);
        assert_eq!(list.total, 41);
        assert_eq!(list.page, 3);
        assert_eq!(list.pages, 5);
    }

    #[tokio::test]
    async fn unknown_shape_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/echanges"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;
        let err = client_for(&server)
            .list(&EchangeQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn single_entity_under_named_key() {
        let echange = sample("Lampe de bureau");
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/echanges/{}", echange.uuid())))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"echange": echange}})),
            )
            .mount(&server)
            .await;

        let fetched = client_for(&server).get(echange.uuid()).await.unwrap();
        assert_eq!(fetched, echange);
    }
}

mod requests {
    use super::*;

    #[tokio::test]
    async fn list_sends_paging_and_sort() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/echanges"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "10"))
            .and(query_param("sort_by", "date_creation"))
            .and(query_param("sort_order", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let list = client_for(&server)
            .list(&EchangeQuery::new().with_page(2, 10))
            .await
            .unwrap();
        assert!(list.echanges.is_empty());
        assert_eq!(list.pages, 0);
    }

    #[tokio::test]
    async fn invalid_listing_is_never_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echanges"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create(&listing(""))
            .await
            .unwrap_err();
        assert!(err.is_local());
        let app: ApplicationError = err.into();
        assert!(app.is_validation());
        assert!(app.user_message().contains("Le titre est requis"));
    }

    #[tokio::test]
    async fn empty_update_is_never_sent() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .update(EchangeId::new_v4(), &EchangeUpdateData::default())
            .await
            .unwrap_err();
        assert!(err.is_local());
    }

    #[tokio::test]
    async fn bulk_update_posts_ids_and_event() {
        let ids = vec![EchangeId::new_v4(), EchangeId::new_v4()];
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echanges/bulk-update"))
            .and(body_partial_json(json!({"statut": "bloque", "event": "block"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "succeeded": [ids.first().unwrap()],
                    "failed": [{"uuid": ids.get(1).unwrap(), "message": "déjà bloqué"}]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .bulk_update(
                &ids,
                &BulkEvent::Block {
                    motif: "Signalements répétés".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome.to_string(), "1 succeeded, 1 failed");
        assert!(!outcome.is_complete_success());
    }
}

mod errors {
    use super::*;

    async fn failing(status: u16, body: Value) -> ApiError {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        client_for(&server)
            .get(EchangeId::new_v4())
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn not_found_keeps_server_message() {
        let err = failing(404, json!({"message": "Échange introuvable"})).await;
        assert!(err.is_not_found());
        assert_eq!(err.message(), "Échange introuvable");
    }

    #[tokio::test]
    async fn unprocessable_shows_server_message() {
        let err = failing(422, json!({"error": "Titre trop court"})).await;
        assert_eq!(err.status(), Some(422));
        let app: ApplicationError = err.into();
        assert_eq!(app.user_message(), "Titre trop court");
    }

    #[tokio::test]
    async fn forbidden_is_unauthorized() {
        let err = failing(403, json!({"message": "Accès refusé"})).await;
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn server_errors_keep_status_and_message() {
        let err = failing(503, json!({"message": "Maintenance"})).await;
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.message(), "Maintenance");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_connection_error() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        drop(server);

        let err = client.get(EchangeId::new_v4()).await.unwrap_err();
        assert!(
            matches!(err, ApiError::Connection(_) | ApiError::Timeout(_)),
            "{err:?}"
        );
        let app: ApplicationError = err.into();
        assert_ne!(app.user_message(), "");
    }
}
