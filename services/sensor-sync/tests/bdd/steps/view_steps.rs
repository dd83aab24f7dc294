//! BDD step definitions for view teardown

use cucumber::{given, then, when};

use crate::world::SyncWorld;

#[given("the view has been torn down")]
async fn view_was_torn_down(world: &mut SyncWorld) {
    world.view.teardown().await;
}

#[when("the view is torn down")]
async fn view_is_torn_down(world: &mut SyncWorld) {
    world.view.teardown().await;
}

#[then("the view should be torn down")]
fn view_should_be_torn_down(world: &mut SyncWorld) {
    assert!(world.view.is_torn_down());
}
