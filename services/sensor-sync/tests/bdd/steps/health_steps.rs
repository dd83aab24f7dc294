//! BDD step definitions for device health probing

use cucumber::{given, then, when};

use sensor_sync::io::HttpResponse;
use sensor_sync::{HealthPolicy, HealthProbe};

use crate::world::{Scripted, SyncWorld};

#[given(expr = "device {string} answers with status {int} and body {string}")]
async fn device_answers(world: &mut SyncWorld, hostname: String, status: u16, body: String) {
    world
        .http
        .script(
            &format!("http://{}/health", hostname),
            Scripted::Respond(HttpResponse { status, body }),
        )
        .await;
}

#[given(expr = "device {string} refuses connections")]
async fn device_refuses(world: &mut SyncWorld, hostname: String) {
    world
        .http
        .script(&format!("http://{}/health", hostname), Scripted::Refuse)
        .await;
}

#[given(expr = "the health policy is {string}")]
fn health_policy_is(world: &mut SyncWorld, policy: String) {
    world.config.health_policy = match policy.as_str() {
        "strict" => HealthPolicy::Strict,
        "permissive" => HealthPolicy::Permissive,
        other => panic!("Unknown health policy: {}", other),
    };
}

#[when(expr = "the view checks the health of {string}")]
async fn view_checks_health(world: &mut SyncWorld, hostname: String) {
    let probe = HealthProbe::new(&world.config, world.http_client());
    probe.check_health(&world.view, &hostname).await;
}

#[then(expr = "the view health should be {word}")]
async fn health_should_be(world: &mut SyncWorld, expected: String) {
    let expected = match expected.as_str() {
        "true" => Some(true),
        "false" => Some(false),
        "unset" => None,
        other => panic!("Unknown health value: {}", other),
    };
    assert_eq!(world.view.health().await, expected);
}
