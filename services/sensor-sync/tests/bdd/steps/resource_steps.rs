//! BDD step definitions for resource fetching

use std::num::NonZeroU32;

use cucumber::{given, then, when};
use serde_json::Value;

use sensor_sync::io::HttpResponse;
use sensor_sync::ResourceFetcher;

use crate::world::{Scripted, SyncWorld};

fn parse_json(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|e| panic!("invalid JSON in step '{raw}': {e}"))
}

#[given(expr = "the dashboard API answers {string} with status {int} and body {string}")]
async fn api_answers(world: &mut SyncWorld, resource: String, status: u16, body: String) {
    world
        .http
        .script(
            &format!("/api/{}?", resource),
            Scripted::Respond(HttpResponse { status, body }),
        )
        .await;
}

#[given("the dashboard API is unreachable")]
async fn api_unreachable(world: &mut SyncWorld) {
    world.http.script("/api/", Scripted::Refuse).await;
}

#[given(expr = "the default limit is {int}")]
fn default_limit_is(world: &mut SyncWorld, limit: u32) {
    world.config.default_limit = NonZeroU32::new(limit).expect("limit must be positive");
}

#[given(expr = "the view already shows {string} as {string}")]
async fn view_already_shows(world: &mut SyncWorld, name: String, raw: String) {
    world.view.publish(&name, parse_json(&raw)).await;
}

#[when(expr = "the view fetches {string}")]
async fn view_fetches(world: &mut SyncWorld, name: String) {
    let fetcher = ResourceFetcher::new(&world.config, world.http_client());
    fetcher.fetch(&world.view, &name, None).await;
}

#[when(expr = "the view fetches {string} with limit {int}")]
async fn view_fetches_with_limit(world: &mut SyncWorld, name: String, limit: u32) {
    let fetcher = ResourceFetcher::new(&world.config, world.http_client());
    fetcher.fetch(&world.view, &name, NonZeroU32::new(limit)).await;
}

#[then(expr = "the view field {string} should be {string}")]
async fn field_should_be(world: &mut SyncWorld, name: String, raw: String) {
    assert_eq!(world.view.field(&name).await, Some(parse_json(&raw)));
}

#[then(expr = "the view field {string} should be unset")]
async fn field_should_be_unset(world: &mut SyncWorld, name: String) {
    assert_eq!(world.view.field(&name).await, None);
}

#[then(expr = "the last request should be to {string}")]
async fn last_request_to(world: &mut SyncWorld, url: String) {
    let requests = world.http.requests.read().await;
    assert_eq!(requests.last(), Some(&url));
}
