mod common;

use common::{config, guild_context, MemoryConfigStore, PlatformCall, RecordingPlatform};
use std::sync::Arc;
use ticketserver::commands::configure::{ConfigureAction, ConfigureCommand, ConfigureOutcome};
use ticketserver::platform::ChatPlatform;
use ticketserver::tickets::store::ConfigStore;
use ticketserver::tickets::CreationMethod;

fn system_action() -> ConfigureAction {
    ConfigureAction::System {
        create_channel_id: "create-channel".to_string(),
        parent_channel_id: "parent-1".to_string(),
        transcripts_channel_id: "transcripts-channel".to_string(),
        creation_method: CreationMethod::ButtonModal,
        embed_title: Some("Need help?".to_string()),
        embed_description: None,
    }
}

#[tokio::test]
async fn system_subcommand_writes_config_enabled_by_default() {
    let platform = Arc::new(RecordingPlatform::new());
    let configs = Arc::new(MemoryConfigStore::new());
    let command = ConfigureCommand::new(platform.clone() as Arc<dyn ChatPlatform>, configs.clone() as Arc<dyn ConfigStore>);

    let ctx = guild_context("guild-1", "staff-1", "mod");
    let outcome = command.handle(&ctx, system_action()).await;
    assert_eq!(outcome, ConfigureOutcome::Updated);

    let stored = configs.get_raw("guild-1").await.unwrap();
    assert_eq!(stored.parent_channel_id, "parent-1");
    assert_eq!(stored.creation_method, "ButtonModal");
    assert_eq!(stored.embed_title.as_deref(), Some("Need help?"));
    assert!(stored.enabled);
}

#[tokio::test]
async fn rewriting_system_config_preserves_disabled_state() {
    let platform = Arc::new(RecordingPlatform::new());
    let mut existing = config("guild-1", "old-parent", "Button");
    existing.enabled = false;
    let configs = Arc::new(MemoryConfigStore::with(existing).await);
    let command = ConfigureCommand::new(platform.clone() as Arc<dyn ChatPlatform>, configs.clone() as Arc<dyn ConfigStore>);

    let ctx = guild_context("guild-1", "staff-1", "mod");
    let outcome = command.handle(&ctx, system_action()).await;
    assert_eq!(outcome, ConfigureOutcome::Updated);

    let stored = configs.get_raw("guild-1").await.unwrap();
    assert_eq!(stored.parent_channel_id, "parent-1");
    assert!(!stored.enabled, "rewriting settings must not re-enable");
}

#[tokio::test]
async fn toggling_without_config_reports_missing_configuration() {
    let platform = Arc::new(RecordingPlatform::new());
    let configs = Arc::new(MemoryConfigStore::new());
    let command = ConfigureCommand::new(platform.clone() as Arc<dyn ChatPlatform>, configs as Arc<dyn ConfigStore>);

    let ctx = guild_context("guild-1", "staff-1", "mod");
    let outcome = command.handle(&ctx, ConfigureAction::EnableSystem).await;
    assert_eq!(outcome, ConfigureOutcome::NoConfiguration);

    let rejection = platform.last_edit_description().await.unwrap();
    assert!(rejection.contains("/configure system"));
}

#[tokio::test]
async fn disabling_an_enabled_system_toggles_it() {
    let platform = Arc::new(RecordingPlatform::new());
    let configs = Arc::new(MemoryConfigStore::with(config("guild-1", "parent-1", "Button")).await);
    let command = ConfigureCommand::new(platform.clone() as Arc<dyn ChatPlatform>, configs.clone() as Arc<dyn ConfigStore>);

    let ctx = guild_context("guild-1", "staff-1", "mod");
    let outcome = command.handle(&ctx, ConfigureAction::DisableSystem).await;
    assert_eq!(outcome, ConfigureOutcome::Toggled { enabled: false });
    assert!(!configs.get_raw("guild-1").await.unwrap().enabled);
}

#[tokio::test]
async fn enabling_an_already_enabled_system_is_reported_as_such() {
    let platform = Arc::new(RecordingPlatform::new());
    let configs = Arc::new(MemoryConfigStore::with(config("guild-1", "parent-1", "Button")).await);
    let command = ConfigureCommand::new(platform.clone() as Arc<dyn ChatPlatform>, configs.clone() as Arc<dyn ConfigStore>);

    let ctx = guild_context("guild-1", "staff-1", "mod");
    let outcome = command.handle(&ctx, ConfigureAction::EnableSystem).await;
    assert_eq!(outcome, ConfigureOutcome::AlreadyInState { enabled: true });
    assert!(configs.get_raw("guild-1").await.unwrap().enabled);
}

#[tokio::test]
async fn uncached_guild_is_refused_before_deferring() {
    let platform = Arc::new(RecordingPlatform::new());
    let configs = Arc::new(MemoryConfigStore::new());
    let command = ConfigureCommand::new(platform.clone() as Arc<dyn ChatPlatform>, configs as Arc<dyn ConfigStore>);

    let mut ctx = guild_context("guild-1", "staff-1", "mod");
    ctx.is_cached_guild = false;

    let outcome = command.handle(&ctx, system_action()).await;
    assert_eq!(outcome, ConfigureOutcome::ContextUnavailable);

    let calls = platform.calls().await;
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], PlatformCall::ReplyEphemeral(_)));
}
