//! Storefront router end to end: sessions, pages and cart forms.

use marketstall_integration_tests::{FakeCatalog, browser, start_storefront};
use reqwest::StatusCode;

async fn page(client: &reqwest::Client, url: &str) -> (StatusCode, String) {
    let response = client.get(url).send().await.expect("request");
    let status = response.status();
    (status, response.text().await.expect("body"))
}

/// The product grid, without the trending strip above it.
fn listing(body: &str) -> &str {
    body.split_once("<section class=\"listing\">")
        .map_or(body, |(_, grid)| grid)
}

async fn post_cart(client: &reqwest::Client, base: &str, action: &str, id: i32) -> reqwest::Response {
    client
        .post(format!("{base}/cart/{action}"))
        .form(&[("id", id.to_string())])
        .send()
        .await
        .expect("cart request")
}

#[tokio::test]
async fn test_health_and_request_id() {
    let fake = FakeCatalog::start().await;
    let base = start_storefront(&fake).await;

    let response = browser().get(format!("{base}/health")).send().await.expect("health");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.expect("body"), "ok");
}

#[tokio::test]
async fn test_home_lists_catalog_and_trending() {
    let fake = FakeCatalog::start().await;
    let base = start_storefront(&fake).await;

    let (status, body) = page(&browser(), &format!("{base}/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Trending"));
    assert!(body.contains("Foldsack No. 1 Backpack"));
    assert!(listing(&body).contains("Portable External Hard Drive"));
    assert!(body.contains("$109.95"));
    assert!(body.contains("★★★★☆"));
    // Startup load seeded "all"; the page did not fetch again
    assert_eq!(fake.hits_exact("/products"), 1);
}

#[tokio::test]
async fn test_category_and_search_compose_across_requests() {
    let fake = FakeCatalog::start().await;
    let base = start_storefront(&fake).await;
    let client = browser();

    let (_, body) = page(&client, &format!("{base}/category/men%27s%20clothing")).await;
    assert!(listing(&body).contains("Mens Casual Premium"));
    assert!(!listing(&body).contains("Chain Bracelet"));

    let (_, body) = page(&client, &format!("{base}/search?q=SLIM")).await;
    assert!(listing(&body).contains("Mens Casual Premium"));
    assert!(!listing(&body).contains("Foldsack"));

    let (_, body) = page(&client, &format!("{base}/category/electronics")).await;
    assert!(listing(&body).contains("No products match your search."));

    let (_, body) = page(&client, &format!("{base}/search?q=")).await;
    assert!(listing(&body).contains("Portable External Hard Drive"));
    assert_eq!(fake.hits("/products/category/"), 2);
}

#[tokio::test]
async fn test_unknown_category_shows_fallback() {
    let fake = FakeCatalog::start().await;
    let base = start_storefront(&fake).await;

    let (status, body) = page(&browser(), &format!("{base}/category/toys")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Failed to load products."));
    assert_eq!(fake.hits("/products/category/"), 0);
}

#[tokio::test]
async fn test_product_detail() {
    let fake = FakeCatalog::start().await;
    let base = start_storefront(&fake).await;

    let (status, body) = page(&browser(), &format!("{base}/products/5")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Dragon Station Chain Bracelet"));
    assert!(body.contains("$695.00"));
    assert!(body.contains("400 reviews"));
}

#[tokio::test]
async fn test_product_detail_failure() {
    let fake = FakeCatalog::start().await;
    let base = start_storefront(&fake).await;

    let (status, body) = page(&browser(), &format!("{base}/products/404")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, "Error loading details.");
}

#[tokio::test]
async fn test_cart_form_flow() {
    let fake = FakeCatalog::start().await;
    let base = start_storefront(&fake).await;
    let client = browser();

    let response = post_cart(&client, &base, "add", 1).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/cart");

    post_cart(&client, &base, "add", 1).await;
    post_cart(&client, &base, "add", 2).await;
    let (_, body) = page(&client, &format!("{base}/cart")).await;
    assert!(body.contains("$219.90"));
    assert!(body.contains("3 items, total <strong>$242.20</strong>"));

    post_cart(&client, &base, "decrement", 1).await;
    post_cart(&client, &base, "increment", 2).await;
    let (_, body) = page(&client, &format!("{base}/cart")).await;
    assert!(body.contains("3 items, total <strong>$154.55</strong>"));

    post_cart(&client, &base, "remove", 1).await;
    post_cart(&client, &base, "decrement", 2).await;
    let (_, body) = page(&client, &format!("{base}/cart")).await;
    assert!(body.contains("1 item, total <strong>$22.30</strong>"));

    post_cart(&client, &base, "decrement", 2).await;
    let (_, body) = page(&client, &format!("{base}/cart")).await;
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_htmx_add_returns_badge() {
    let fake = FakeCatalog::start().await;
    let base = start_storefront(&fake).await;
    let client = browser();

    let response = client
        .post(format!("{base}/cart/add"))
        .header("HX-Request", "true")
        .form(&[("id", "9")])
        .send()
        .await
        .expect("add");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["hx-trigger"], "cart-updated");
    assert!(response.text().await.expect("body").contains(">1</span>"));

    let (_, badge) = page(&client, &format!("{base}/cart/count")).await;
    assert!(badge.contains(">1</span>"));
}

#[tokio::test]
async fn test_sessions_keep_separate_carts() {
    let fake = FakeCatalog::start().await;
    let base = start_storefront(&fake).await;
    let shopper = browser();
    let other = browser();

    post_cart(&shopper, &base, "add", 5).await;

    let (_, mine) = page(&shopper, &format!("{base}/cart")).await;
    let (_, theirs) = page(&other, &format!("{base}/cart")).await;
    assert!(mine.contains("$695.00"));
    assert!(theirs.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_invalid_cart_form_rejected() {
    let fake = FakeCatalog::start().await;
    let base = start_storefront(&fake).await;

    let response = browser()
        .post(format!("{base}/cart/add"))
        .form(&[("id", "abc")])
        .send()
        .await
        .expect("add");

    assert!(response.status().is_client_error());
}
