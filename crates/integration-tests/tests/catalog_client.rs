//! `CatalogClient` against the fake catalog API.

#![allow(clippy::unwrap_used)]

use marketstall_core::{Category, ProductId};
use marketstall_integration_tests::FakeCatalog;
use marketstall_storefront::catalog::{CatalogClient, CatalogError, CatalogSource};

#[tokio::test]
async fn test_fetches_full_catalog_in_order() {
    let fake = FakeCatalog::start().await;
    let client = CatalogClient::new(&fake.catalog_config()).expect("client");

    let products = client.products().await.expect("products");

    let ids: Vec<i32> = products.iter().map(|p| p.id.as_i32()).collect();
    assert_eq!(ids, [1, 2, 5, 9]);
    let first = products.first().expect("first product");
    assert_eq!(first.price.display(), "$109.95");
    assert_eq!(first.rating().count, 120);
    assert_eq!(fake.hits_exact("/products"), 1);
}

#[tokio::test]
async fn test_product_without_rating_defaults() {
    let fake = FakeCatalog::start().await;
    let client = CatalogClient::new(&fake.catalog_config()).expect("client");

    let drive = client.product(ProductId::new(9)).await.expect("product");

    assert!(!drive.has_rating());
    assert_eq!(drive.rating().whole_stars(), 0);
    assert_eq!(drive.price.display(), "$64.00");
}

#[tokio::test]
async fn test_category_names_are_path_encoded() {
    let fake = FakeCatalog::start().await;
    let client = CatalogClient::new(&fake.catalog_config()).expect("client");

    let products = client
        .products_in_category(&Category::from("men's clothing"))
        .await
        .expect("category products");

    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p.category.as_str() == "men's clothing"));
    assert_eq!(fake.hits("/products/category/"), 1);
}

#[tokio::test]
async fn test_categories() {
    let fake = FakeCatalog::start().await;
    let client = CatalogClient::new(&fake.catalog_config()).expect("client");

    let categories = client.categories().await.expect("categories");

    let names: Vec<&str> = categories.iter().map(Category::as_str).collect();
    assert_eq!(names, ["electronics", "jewelery", "men's clothing"]);
}

#[tokio::test]
async fn test_missing_product_is_status_error() {
    let fake = FakeCatalog::start().await;
    let client = CatalogClient::new(&fake.catalog_config()).expect("client");

    let err = client.product(ProductId::new(404)).await.unwrap_err();

    assert!(matches!(
        err,
        CatalogError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND
    ));
}

#[tokio::test]
async fn test_unavailable_catalog_is_status_error() {
    let fake = FakeCatalog::start().await;
    fake.set_failing(true);
    let client = CatalogClient::new(&fake.catalog_config()).expect("client");

    let err = client.products().await.unwrap_err();

    assert!(matches!(
        err,
        CatalogError::Status { status, .. } if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
    ));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let fake = FakeCatalog::with_products(vec![serde_json::json!({ "id": "not-a-number" })]).await;
    let client = CatalogClient::new(&fake.catalog_config()).expect("client");

    let err = client.products().await.unwrap_err();

    assert!(matches!(err, CatalogError::Parse(_)));
}
