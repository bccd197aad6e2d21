use crate::support::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_collection_to_dataset_end_to_end() {
    let server = MockServer::start().await;
    let singular = url(&server, "/data-catalogs/singular.jsonld");
    let site = url(&server, "/dataset-site-template/Openactive");

    mount_json(
        &server,
        "/data-catalogs/example-data-catalog-collection.jsonld",
        json!({
            "@context": "https://schema.org/",
            "@type": "DataCatalog",
            "@id": url(&server, "/data-catalogs/data-catalog-collection.jsonld"),
            "name": "Collection of all data catalogs",
            "hasPart": [singular],
            "license": "https://creativecommons.org/licenses/by/4.0/",
        }),
    )
    .await;
    mount_json(
        &server,
        "/data-catalogs/singular.jsonld",
        json!({
            "@context": "https://schema.org/",
            "@type": "DataCatalog",
            "@id": singular,
            "name": "Singular datasets that are not included in other data catalogs",
            "dataset": [site],
        }),
    )
    .await;
    mount_html(
        &server,
        "/dataset-site-template/Openactive",
        dataset_page(&site),
    )
    .await;

    let aggregate = test_harvester()
        .aggregate(&url(
            &server,
            "/data-catalogs/example-data-catalog-collection.jsonld",
        ))
        .await;

    assert!(aggregate.errors.is_empty(), "{:?}", aggregate.errors);
    assert_eq!(aggregate.jsonld.len(), 1);
    assert_eq!(aggregate.jsonld[0]["@type"], json!("Dataset"));
    assert_eq!(aggregate.jsonld[0]["@id"], json!(site));
    assert_eq!(aggregate.jsonld[0]["name"], json!("Example dataset"));
}

#[tokio::test]
async fn test_all_dataset_fetches_failing_is_not_fatal() {
    let server = MockServer::start().await;
    let sites: Vec<String> = (0..5).map(|i| url(&server, &format!("/site/{}", i))).collect();
    mount_json(&server, "/catalog.jsonld", leaf_catalog(&sites)).await;
    // no site is mounted, every fetch gets a 404

    let aggregate = test_harvester().aggregate(&url(&server, "/catalog.jsonld")).await;

    assert!(aggregate.jsonld.is_empty());
    assert_eq!(aggregate.errors.len(), 5);
    for (error, site) in aggregate.errors.iter().zip(&sites) {
        assert_eq!(&error.url, site);
        assert_eq!(error.status, Some(404));
    }
}

#[tokio::test]
async fn test_unreachable_root_yields_empty_aggregate() {
    let aggregate = test_harvester()
        .aggregate("http://127.0.0.1:1/catalog.jsonld")
        .await;

    assert!(aggregate.jsonld.is_empty());
    assert_eq!(aggregate.errors.len(), 1);
    assert_eq!(aggregate.errors[0].url, "http://127.0.0.1:1/catalog.jsonld");
}

#[tokio::test]
async fn test_mixed_outcomes_are_counted_separately() {
    let server = MockServer::start().await;
    let missing_catalog = url(&server, "/missing.jsonld");
    let leaf = url(&server, "/leaf.jsonld");
    let with_block = url(&server, "/site/with-block");
    let without_block = url(&server, "/site/without-block");
    let failing = url(&server, "/site/failing");

    mount_json(
        &server,
        "/root.jsonld",
        collection(&[missing_catalog.clone(), leaf]),
    )
    .await;
    mount_json(
        &server,
        "/leaf.jsonld",
        leaf_catalog(&[with_block.clone(), without_block, failing.clone()]),
    )
    .await;
    mount_html(&server, "/site/with-block", dataset_page(&with_block)).await;
    mount_html(
        &server,
        "/site/without-block",
        "<html><head><title>No metadata</title></head><body></body></html>".to_string(),
    )
    .await;
    mount_status(&server, "/site/failing", 500).await;

    let aggregate = test_harvester().aggregate(&url(&server, "/root.jsonld")).await;

    // a reachable page without metadata is neither a dataset nor an error
    assert_eq!(aggregate.jsonld.len(), 1);
    assert_eq!(aggregate.jsonld[0]["@id"], json!(with_block));

    // catalog errors come before dataset errors
    assert_eq!(aggregate.errors.len(), 2);
    assert_eq!(aggregate.errors[0].url, missing_catalog);
    assert_eq!(aggregate.errors[0].status, Some(404));
    assert_eq!(aggregate.errors[1].url, failing);
    assert_eq!(aggregate.errors[1].status, Some(500));
}

#[tokio::test]
async fn test_metadata_keeps_dataset_order() {
    let server = MockServer::start().await;
    let slow = url(&server, "/site/slow");
    let fast = url(&server, "/site/fast");

    mount_json(
        &server,
        "/catalog.jsonld",
        leaf_catalog(&[slow.clone(), fast.clone()]),
    )
    .await;
    mount_html_delayed(
        &server,
        "/site/slow",
        dataset_page(&slow),
        Duration::from_millis(300),
    )
    .await;
    mount_html(&server, "/site/fast", dataset_page(&fast)).await;

    let aggregate = test_harvester().aggregate(&url(&server, "/catalog.jsonld")).await;

    assert_eq!(aggregate.jsonld.len(), 2);
    assert_eq!(aggregate.jsonld[0]["@id"], json!(slow));
    assert_eq!(aggregate.jsonld[1]["@id"], json!(fast));
}

#[tokio::test]
async fn test_forbidden_dataset_site_is_retried() {
    let server = MockServer::start().await;
    let site = url(&server, "/site/guarded");
    mount_json(&server, "/catalog.jsonld", leaf_catalog(&[site.clone()])).await;

    Mock::given(method("GET"))
        .and(path("/site/guarded"))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(4)
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/site/guarded"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(dataset_page(&site))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let aggregate = test_harvester().aggregate(&url(&server, "/catalog.jsonld")).await;

    assert!(aggregate.errors.is_empty(), "{:?}", aggregate.errors);
    assert_eq!(aggregate.jsonld.len(), 1);
}

#[tokio::test]
async fn test_forbidden_until_exhausted_is_one_error() {
    let server = MockServer::start().await;
    let site = url(&server, "/site/forbidden");
    mount_json(&server, "/catalog.jsonld", leaf_catalog(&[site.clone()])).await;

    Mock::given(method("GET"))
        .and(path("/site/forbidden"))
        .respond_with(ResponseTemplate::new(403))
        .expect(5)
        .mount(&server)
        .await;

    let aggregate = test_harvester().aggregate(&url(&server, "/catalog.jsonld")).await;

    assert!(aggregate.jsonld.is_empty());
    assert_eq!(aggregate.errors.len(), 1);
    assert_eq!(aggregate.errors[0].url, site);
    assert_eq!(aggregate.errors[0].status, Some(403));
}

#[tokio::test]
async fn test_server_error_on_dataset_site_is_not_retried() {
    let server = MockServer::start().await;
    let site = url(&server, "/site/broken");
    mount_json(&server, "/catalog.jsonld", leaf_catalog(&[site])).await;

    Mock::given(method("GET"))
        .and(path("/site/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let aggregate = test_harvester().aggregate(&url(&server, "/catalog.jsonld")).await;

    assert_eq!(aggregate.errors.len(), 1);
    assert_eq!(aggregate.errors[0].status, Some(500));
}

#[tokio::test]
async fn test_catalog_fetch_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog.jsonld"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let aggregate = test_harvester().aggregate(&url(&server, "/catalog.jsonld")).await;

    assert_eq!(aggregate.errors.len(), 1);
    assert_eq!(aggregate.errors[0].status, Some(403));
}

#[tokio::test]
async fn test_request_limit_gives_same_result() {
    let server = MockServer::start().await;
    let parts: Vec<String> = (0..3).map(|i| url(&server, &format!("/part/{}.jsonld", i))).collect();
    mount_json(&server, "/root.jsonld", collection(&parts)).await;

    for i in 0..3 {
        let sites: Vec<String> = (0..3)
            .map(|j| url(&server, &format!("/site/{}-{}", i, j)))
            .collect();
        mount_json(&server, &format!("/part/{}.jsonld", i), leaf_catalog(&sites)).await;
        for site in &sites {
            let route = site.trim_start_matches(&server.uri()).to_string();
            mount_html(&server, &route, dataset_page(site)).await;
        }
    }

    let root = url(&server, "/root.jsonld");
    let unbounded = test_harvester().aggregate(&root).await;
    let bounded = harvester_with(|config| config.harvest.max_concurrent_requests = 1)
        .aggregate(&root)
        .await;

    assert_eq!(unbounded.jsonld.len(), 9);
    assert!(unbounded.errors.is_empty());
    assert_eq!(bounded, unbounded);
}

#[tokio::test]
async fn test_errors_collected_when_not_suppressed() {
    let server = MockServer::start().await;
    let good = url(&server, "/site/good");
    let missing = url(&server, "/site/missing");
    let broken = url(&server, "/broken.jsonld");
    let leaf = url(&server, "/leaf.jsonld");

    mount_json(&server, "/root.jsonld", collection(&[broken.clone(), leaf])).await;
    mount_status(&server, "/broken.jsonld", 500).await;
    mount_json(&server, "/leaf.jsonld", leaf_catalog(&[good.clone(), missing.clone()])).await;
    mount_html(&server, "/site/good", dataset_page(&good)).await;
    mount_status(&server, "/site/missing", 404).await;

    let harvester = harvester_with(|config| config.harvest.suppress_errors = false);
    assert!(!harvester.settings().suppress_errors);

    let aggregate = harvester.aggregate(&url(&server, "/root.jsonld")).await;

    assert_eq!(aggregate.jsonld.len(), 1);
    assert_eq!(aggregate.errors.len(), 2);
    assert_eq!(aggregate.errors[0].url, broken);
    assert_eq!(aggregate.errors[0].status, Some(500));
    assert_eq!(aggregate.errors[1].url, missing);
    assert_eq!(aggregate.errors[1].status, Some(404));
}

#[tokio::test]
async fn test_relative_identifier_resolved_against_site() {
    let server = MockServer::start().await;
    let site = url(&server, "/sites/pool");

    mount_json(&server, "/leaf.jsonld", leaf_catalog(&[site.clone()])).await;
    mount_html(
        &server,
        "/sites/pool",
        r#"<script type="application/ld+json">{"@type": "Dataset", "@id": "pool"}</script>"#
            .to_string(),
    )
    .await;

    let aggregate = test_harvester().aggregate(&url(&server, "/leaf.jsonld")).await;

    assert_eq!(aggregate.jsonld.len(), 1);
    assert_eq!(aggregate.jsonld[0]["@id"], json!(site));
}
