//! Full persistence lifecycle integration tests.
//!
//! These walk the real startup/shutdown sequence across a restart: save
//! secrets and a document with one coordinator, then bring everything back
//! with a fresh one, the way the host runtime would.

use std::sync::Arc;

use tempfile::TempDir;
use url::Url;
use uuid::Uuid;

use teamlink_core::{AuthenticationInfo, ContextType, ProjectReference, ServerContext};
use teamlink_secrets::{FileVault, MemoryVault, SecretVault};
use teamlink_settings::{
    DocumentStore, FileDocumentStore, PersistEngine, SettingsCoordinator,
};

fn auth(user: &str) -> AuthenticationInfo {
    AuthenticationInfo::new(user, format!("token-for-{user}"), "https://dev.example.com", user)
}

fn file_vault(tmp: &TempDir) -> Arc<FileVault> {
    // Fixed master key stands in for the keychain across the simulated restart.
    Arc::new(FileVault::new(tmp.path().join("secrets"), vec![7u8; 32]))
}

#[test]
fn test_full_lifecycle_across_restart() {
    let tmp = TempDir::new().unwrap();
    let document = FileDocumentStore::new(tmp.path().join("servers.json"));

    // --- first process lifetime: build contexts, save secrets, shut down ---
    let vault = file_vault(&tmp);
    let coordinator = SettingsCoordinator::new(vault.clone());

    let mut on_prem = ServerContext::on_premises(
        Url::parse("https://tfs.example.com/DefaultCollection").unwrap(),
        auth("alice"),
    );
    on_prem.set_project(Some(ProjectReference {
        name: Some("Platform".to_string()),
        ..Default::default()
    }));

    let account = Uuid::new_v4();
    let hosted = ServerContext::remote_hosted(
        Url::parse("https://dev.example.com/org").unwrap(),
        account,
        auth("bob"),
    );

    assert!(coordinator.save_secret(&on_prem));
    assert!(coordinator.save_secret(&hosted));

    // Shutdown: bootstrap was claimed (empty) at startup of a fresh install,
    // so the document comes from the live set.
    coordinator.claim();
    let live = vec![on_prem, hosted];
    document.save(&coordinator.document_to_persist(&live)).unwrap();

    // --- second process lifetime: load, deliver, restore ---
    let vault = file_vault(&tmp);
    let coordinator = SettingsCoordinator::new(vault);
    coordinator.deliver_document(document.load().unwrap());

    let restored = coordinator.restore_contexts();
    assert_eq!(restored.len(), 2);

    assert_eq!(restored[0].kind(), ContextType::OnPremises);
    assert_eq!(restored[0].auth().user_name, "alice");
    assert_eq!(
        restored[0].project().and_then(|p| p.name.as_deref()),
        Some("Platform")
    );

    assert_eq!(restored[1].kind(), ContextType::RemoteHosted);
    assert_eq!(restored[1].account_id(), Some(account));
    assert_eq!(restored[1].auth().password.expose(), "token-for-bob");
}

#[test]
fn test_snapshot_restore_round_trip() {
    let vault = Arc::new(MemoryVault::new());
    let coordinator = SettingsCoordinator::new(vault.clone());

    let contexts = vec![
        ServerContext::on_premises(
            Url::parse("https://tfs.example.com/CollA").unwrap(),
            auth("alice"),
        ),
        ServerContext::remote_hosted(
            Url::parse("https://dev.example.com/org").unwrap(),
            Uuid::new_v4(),
            auth("bob"),
        ),
    ];
    for context in &contexts {
        assert!(coordinator.save_secret(context));
    }

    let records = PersistEngine::snapshot(&contexts);
    let fresh = SettingsCoordinator::new(vault);
    fresh.deliver_document(records.clone());
    let restored = fresh.restore_contexts();

    // Snapshotting the restored set reproduces the records.
    assert_eq!(PersistEngine::snapshot(&restored), records);
}

#[test]
fn test_unclaimed_document_survives_shutdown_untouched() {
    let tmp = TempDir::new().unwrap();
    let document = FileDocumentStore::new(tmp.path().join("servers.json"));

    // A document with a record this build cannot restore (unknown type).
    let raw = serde_json::json!({
        "servers": [{ "type": "FutureKind", "uri": "https://next.example.com" }]
    });
    std::fs::write(document.path(), serde_json::to_string(&raw).unwrap()).unwrap();

    let coordinator = SettingsCoordinator::detached();
    coordinator.deliver_document(document.load().unwrap());

    // The manager never ran; shutdown must write back what was loaded.
    let live: Vec<ServerContext> = Vec::new();
    let to_persist = coordinator.document_to_persist(&live);
    document.save(&to_persist).unwrap();

    let reloaded = document.load().unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].kind.as_deref(), Some("FutureKind"));
}

#[test]
fn test_restore_cleans_up_secret_for_dropped_record() {
    let tmp = TempDir::new().unwrap();
    let vault = file_vault(&tmp);

    // Seed a secret, then present a record the restore pass must drop.
    let uri = Url::parse("https://gone.example.com/coll").unwrap();
    let key = teamlink_core::SecretKey::for_server(&uri);
    vault.set(&key, "not a decodable auth bundle").unwrap();

    let coordinator = SettingsCoordinator::new(vault.clone());
    coordinator.deliver_document(vec![teamlink_settings::ContextRecord {
        kind: Some("OnPremises".to_string()),
        uri: Some(uri.to_string()),
        ..Default::default()
    }]);

    assert!(coordinator.restore_contexts().is_empty());
    // No orphaned vault entry is left behind.
    assert!(vault.get(&key).unwrap().is_none());
}
