use anyhow::Result;
use contractor_site::core::content::default_services;
use contractor_site::domain::model::{ContactInfo, ContactSubmission};
use contractor_site::{SiteConfig, SiteContext};
use httpmock::prelude::*;
use serde_json::json;

async fn context_for(server: &MockServer) -> Result<SiteContext> {
    let config = SiteConfig::from_toml_str(&format!(
        r#"
[site]
name = "Summit Builders"

[backend]
url = "{}"
anon_key = "anon-key"
"#,
        server.base_url()
    ))?;
    Ok(SiteContext::from_config(config).await?)
}

#[tokio::test]
async fn test_home_page_combines_hero_featured_and_fallback_services() -> Result<()> {
    let server = MockServer::start_async().await;
    let hero = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/home_content")
                .query_param("limit", "1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{
                    "id": "h1",
                    "hero_title": "Built to Last",
                    "hero_subtitle": "",
                    "intro": null
                }]));
        })
        .await;
    let featured = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/projects")
                .query_param("featured", "eq.true")
                .query_param("order", "display_order.asc")
                .query_param("limit", "3");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([
                    {"id": "p4", "title": "Warehouse", "featured": true, "display_order": 0},
                    {"id": "p9", "title": "Library", "featured": true, "display_order": 5}
                ]));
        })
        .await;
    let services = server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/services");
            then.status(503)
                .header("Content-Type", "application/json")
                .json_body(json!({"message": "upstream unavailable"}));
        })
        .await;

    let page = context_for(&server).await?.content().home_page().await;

    hero.assert_async().await;
    featured.assert_async().await;
    services.assert_async().await;

    assert_eq!(page.hero.hero_title, "Built to Last");
    assert!(!page.hero.hero_subtitle.is_empty());
    assert!(!page.hero.intro.is_empty());
    let ids: Vec<&str> = page.featured_projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p4", "p9"]);
    assert_eq!(page.services, default_services());
    Ok(())
}

#[tokio::test]
async fn test_contact_page_falls_back_when_table_is_empty() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/contact_info");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([]));
        })
        .await;

    let page = context_for(&server).await?.content().contact_page().await;
    assert_eq!(page.contact, ContactInfo::default());
    Ok(())
}

#[tokio::test]
async fn test_inquiry_is_posted_to_contact_submissions() -> Result<()> {
    let server = MockServer::start_async().await;
    let insert = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/contact_submissions")
                .header("Prefer", "return=representation")
                .json_body(json!({
                    "name": "Dana Reyes",
                    "email": "dana@example.com",
                    "phone": null,
                    "message": "Quote for a 4,000 sq ft slab"
                }));
            then.status(201)
                .header("Content-Type", "application/json")
                .json_body(json!([{"id": "c1"}]));
        })
        .await;

    let context = context_for(&server).await?;
    let submission = ContactSubmission {
        name: "Dana Reyes".to_string(),
        email: "dana@example.com".to_string(),
        phone: None,
        message: "Quote for a 4,000 sq ft slab".to_string(),
    };
    context.content().submit_inquiry(&submission).await?;
    insert.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_rejected_inquiry_reaches_the_caller() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/rest/v1/contact_submissions");
            then.status(401)
                .header("Content-Type", "application/json")
                .json_body(json!({"message": "new row violates row-level security policy"}));
        })
        .await;

    let context = context_for(&server).await?;
    let submission = ContactSubmission {
        name: "Dana Reyes".to_string(),
        email: "dana@example.com".to_string(),
        phone: Some("555-0100".to_string()),
        message: "Hello".to_string(),
    };
    let err = context
        .content()
        .submit_inquiry(&submission)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("row-level security"));
    Ok(())
}
