use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use models::{Document, GameMode, ItemStack, Location, Player, PlayerProfile, ProfileKey};
use serde_json::Value;
use service::{
    errors::StoreError,
    profile::file_store::LOCATIONS_KEY,
    serializer::{DocumentSerializer, SerdeDocumentSerializer, SerializerError},
    storage::profile_cache::ProfileCache,
    FileProfileStore, ProfileRepository,
};
use uuid::Uuid;

/// Unique data root under the temp dir, removed on drop.
struct Scratch {
    root: PathBuf,
}

impl Scratch {
    fn new() -> Self {
        Self {
            root: std::env::temp_dir().join(format!("profile_store_{}", Uuid::new_v4())),
        }
    }

    fn store(&self) -> FileProfileStore {
        self.store_with_cache(ProfileCache::new(100, Duration::from_secs(600)))
    }

    fn store_with_cache(&self, cache: ProfileCache) -> FileProfileStore {
        FileProfileStore::with_default_serializers(&self.root, cache)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn steve() -> Player {
    Player::new(Uuid::new_v4(), "Steve")
}

fn profile_for(player: &Player, mode: GameMode) -> PlayerProfile {
    let spawn = Location::new("world", 12.5, 64.0, -40.0).with_rotation(180.0, 15.0);
    let mut profile = PlayerProfile::new(player, mode, spawn);
    profile.inventory.contents = vec![
        Some(ItemStack::new("minecraft:diamond_sword", 1)),
        None,
        Some(ItemStack::new("minecraft:torch", 48)),
    ];
    profile.inventory.offhand = Some(ItemStack::new("minecraft:shield", 1));
    profile.ender_chest = vec![None, Some(ItemStack::new("minecraft:elytra", 1))];
    profile.stats.level = 30;
    profile.stats.food_level = 17;
    profile
}

fn read_json(path: &Path) -> Result<Value, anyhow::Error> {
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

#[test]
fn profile_files_follow_game_mode_suffixes() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let player = steve();

    for mode in GameMode::ALL {
        let key = ProfileKey::new(player.uuid, mode, "survival_islands")?;
        store.save_player(&key, &profile_for(&player, mode))?;
    }

    let dir = scratch.root.join(player.uuid.to_string());
    let mut names: Vec<String> = fs::read_dir(&dir)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    names.sort();
    assert_eq!(
        names,
        [
            "survival_islands.json",
            "survival_islands_adventure.json",
            "survival_islands_creative.json",
            "survival_islands_spectator.json"
        ]
    );
    Ok(())
}

#[test]
fn unsaved_key_reads_as_absent_without_creating_files() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let key = ProfileKey::new(Uuid::new_v4(), GameMode::Creative, "lobby")?;

    assert!(store.get_player(&key)?.is_none());
    assert!(store.load_player(&key)?.is_none());
    assert!(!scratch.root.exists(), "a read must not create anything on disk");
    Ok(())
}

#[test]
fn saved_profile_round_trips_through_fresh_store() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let player = steve();
    let key = ProfileKey::new(player.uuid, GameMode::Survival, "default")?;
    let profile = profile_for(&player, GameMode::Survival);

    scratch.store().save_player(&key, &profile)?;

    let fresh = scratch.store();
    let doc = fresh.get_player(&key)?.ok_or_else(|| anyhow::anyhow!("profile missing"))?;
    assert_eq!(doc.get("name"), Some(&Value::from("Steve")));
    assert_eq!(fresh.load_player(&key)?, Some(profile));
    Ok(())
}

#[test]
fn locations_are_merged_per_world() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let player = steve();
    let path = store.paths().locations(player.uuid);

    let nether = Location::new("world_nether", 8.0, 40.0, 8.0).with_rotation(45.0, 0.0);
    store.save_location(&player, &nether)?;
    store.save_location(&player, &Location::new("world", 100.0, 70.0, -3.0))?;

    let root = read_json(&path)?;
    let worlds = root[LOCATIONS_KEY]
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("no locations object"))?;
    assert_eq!(worlds.len(), 2);
    let nether_before = serde_json::to_string(&worlds["world_nether"])?;

    let moved = Location::new("world", -250.0, 80.0, 12.0).with_rotation(-90.0, 30.0);
    store.save_location(&player, &moved)?;

    let root = read_json(&path)?;
    assert_eq!(serde_json::to_string(&root[LOCATIONS_KEY]["world_nether"])?, nether_before);
    assert_eq!(store.get_location(player.uuid, "world"), Some(moved));
    assert_eq!(store.get_location(player.uuid, "world_nether").map(|l| l.yaw), Some(45.0));
    Ok(())
}

#[test]
fn unvisited_world_reads_as_absent() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let player = steve();

    assert!(store.get_location(player.uuid, "world").is_none());
    store.save_location(&player, &Location::new("world", 0.0, 64.0, 0.0))?;
    store.save_location(&player, &Location::new("world_nether", 0.0, 64.0, 0.0))?;
    assert!(store.get_location(player.uuid, "world_the_end").is_none());
    Ok(())
}

#[test]
fn locations_file_without_locations_key_reads_as_absent() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let player = steve();
    let path = store.paths().locations(player.uuid);
    fs::create_dir_all(path.parent().ok_or_else(|| anyhow::anyhow!("no parent"))?)?;
    fs::write(&path, br#"{"version":1}"#)?;

    assert!(store.get_location(player.uuid, "world").is_none());

    // other top-level keys survive a merge
    store.save_location(&player, &Location::new("world", 1.0, 2.0, 3.0))?;
    let root = read_json(&path)?;
    assert_eq!(root["version"], Value::from(1));
    assert!(store.get_location(player.uuid, "world").is_some());
    Ok(())
}

#[test]
fn blank_locations_file_is_treated_as_empty() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let player = steve();
    let path = store.paths().locations(player.uuid);
    fs::create_dir_all(path.parent().ok_or_else(|| anyhow::anyhow!("no parent"))?)?;
    fs::write(&path, b"")?;

    store.save_location(&player, &Location::new("world", 1.0, 2.0, 3.0))?;
    assert_eq!(
        store.get_location(player.uuid, "world"),
        Some(Location::new("world", 1.0, 2.0, 3.0))
    );
    Ok(())
}

#[test]
fn corrupt_locations_file_is_not_overwritten() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let player = steve();
    let path = store.paths().locations(player.uuid);
    fs::create_dir_all(path.parent().ok_or_else(|| anyhow::anyhow!("no parent"))?)?;
    fs::write(&path, b"{\"locations\": {\"world\": ")?;

    let err = store.save_location(&player, &Location::new("world", 1.0, 2.0, 3.0));
    assert!(matches!(err, Err(StoreError::Parse { .. })));
    assert_eq!(fs::read(&path)?, b"{\"locations\": {\"world\": ");
    assert!(store.get_location(player.uuid, "world").is_none());
    Ok(())
}

#[test]
fn non_object_locations_entry_is_not_overwritten() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let player = steve();
    let path = store.paths().locations(player.uuid);
    fs::create_dir_all(path.parent().ok_or_else(|| anyhow::anyhow!("no parent"))?)?;
    fs::write(&path, br#"{"locations":["world",1,2,3]}"#)?;

    let err = store.save_location(&player, &Location::new("world", 1.0, 2.0, 3.0));
    assert!(matches!(err, Err(StoreError::Parse { .. })));
    assert_eq!(fs::read(&path)?, br#"{"locations":["world",1,2,3]}"#);
    assert!(store.get_location(player.uuid, "world").is_none());
    Ok(())
}

#[test]
fn reads_racing_saves_never_leave_a_stale_cache_entry() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let player = steve();
    let key = ProfileKey::new(player.uuid, GameMode::Survival, "default")?;

    for _ in 0..5 {
        let store = scratch.store();
        let mut profile = profile_for(&player, GameMode::Survival);
        profile.stats.level = 0;
        store.save_player(&key, &profile)?;
        let done = AtomicBool::new(false);

        std::thread::scope(|s| {
            s.spawn(|| {
                while !done.load(Ordering::Relaxed) {
                    let _ = store.get_player(&key);
                }
            });
            let saved = (1..=200).try_for_each(|level| {
                profile.stats.level = level;
                store.save_player(&key, &profile)
            });
            // stop the reader even when a save failed, or the scope never joins
            done.store(true, Ordering::Relaxed);
            saved
        })?;

        let on_disk = scratch.store_with_cache(ProfileCache::disabled()).load_player(&key)?;
        assert_eq!(on_disk.as_ref().map(|p| p.stats.level), Some(200));
        assert_eq!(store.load_player(&key)?, on_disk, "cache served an outdated profile");
    }
    Ok(())
}

#[test]
fn cached_profile_hides_external_edits_until_idle_expiry() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store_with_cache(ProfileCache::new(100, Duration::from_millis(300)));
    let player = steve();
    let key = ProfileKey::new(player.uuid, GameMode::Survival, "default")?;
    store.save_player(&key, &profile_for(&player, GameMode::Survival))?;

    let first = store.get_player(&key)?.ok_or_else(|| anyhow::anyhow!("profile missing"))?;
    assert_eq!(store.cache().entry_count(), 1);

    fs::write(store.paths().profile(&key), br#"{"name":"edited on disk"}"#)?;
    assert_eq!(
        store.get_player(&key)?,
        Some(first),
        "within the idle window the cached copy is served"
    );

    std::thread::sleep(Duration::from_millis(700));
    let reread = store.get_player(&key)?.ok_or_else(|| anyhow::anyhow!("profile missing"))?;
    assert_eq!(reread.get("name"), Some(&Value::from("edited on disk")));
    Ok(())
}

#[test]
fn disabled_cache_always_reads_disk() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store_with_cache(ProfileCache::disabled());
    let player = steve();
    let key = ProfileKey::new(player.uuid, GameMode::Adventure, "hub")?;
    store.save_player(&key, &profile_for(&player, GameMode::Adventure))?;
    assert!(store.get_player(&key)?.is_some());

    fs::write(store.paths().profile(&key), br#"{"name":"edited on disk"}"#)?;
    let doc = store.get_player(&key)?.ok_or_else(|| anyhow::anyhow!("profile missing"))?;
    assert_eq!(doc.get("name"), Some(&Value::from("edited on disk")));
    Ok(())
}

#[test]
fn saving_a_profile_invalidates_its_cache_entry() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let player = steve();
    let key = ProfileKey::new(player.uuid, GameMode::Survival, "default")?;
    let other = ProfileKey::new(player.uuid, GameMode::Creative, "default")?;

    let mut profile = profile_for(&player, GameMode::Survival);
    store.save_player(&key, &profile)?;
    store.save_player(&other, &profile_for(&player, GameMode::Creative))?;
    assert_eq!(store.cache().entry_count(), 0, "writes never fill the cache");

    store.get_player(&key)?;
    store.get_player(&other)?;
    assert_eq!(store.cache().entry_count(), 2);

    profile.stats.level = 31;
    store.save_player(&key, &profile)?;
    assert_eq!(store.cache().entry_count(), 1);
    assert_eq!(store.load_player(&key)?.map(|p| p.stats.level), Some(31));
    Ok(())
}

#[test]
fn logout_location_is_absent_until_saved() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let player = steve();
    assert!(store.get_logout(player.uuid).is_none());

    let mut profile = profile_for(&player, GameMode::Survival);
    profile.location = Location::new("world_the_end", 0.5, 55.0, 0.5).with_rotation(270.0, -10.0);
    store.save_logout(&profile)?;
    assert_eq!(store.get_logout(player.uuid), Some(profile.location.clone()));

    profile.location = Location::new("world", 3.0, 4.0, 5.0);
    store.save_logout(&profile)?;
    assert_eq!(store.get_logout(player.uuid), Some(profile.location));
    Ok(())
}

#[test]
fn malformed_profile_is_an_error_but_malformed_logout_is_absent() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let player = steve();
    let key = ProfileKey::new(player.uuid, GameMode::Survival, "default")?;
    let dir = store.paths().player_dir(player.uuid);
    fs::create_dir_all(&dir)?;
    fs::write(store.paths().profile(&key), b"{\"name\": ")?;
    fs::write(store.paths().logout(player.uuid), b"not json")?;

    assert!(matches!(store.get_player(&key), Err(StoreError::Parse { .. })));
    assert_eq!(store.cache().entry_count(), 0);
    assert!(store.get_logout(player.uuid).is_none());

    // well-formed JSON that is not a location
    fs::write(store.paths().logout(player.uuid), br#"{"world": 3}"#)?;
    assert!(store.get_logout(player.uuid).is_none());
    Ok(())
}

#[test]
fn io_failure_is_reported_not_raised() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let player = steve();
    fs::create_dir_all(&scratch.root)?;
    // a plain file where the player's directory should be
    fs::write(store.paths().player_dir(player.uuid), b"in the way")?;

    let key = ProfileKey::new(player.uuid, GameMode::Survival, "default")?;
    let profile = profile_for(&player, GameMode::Survival);
    assert!(matches!(store.save_player(&key, &profile), Err(StoreError::Io { .. })));
    assert!(matches!(store.save_logout(&profile), Err(StoreError::Io { .. })));
    assert!(matches!(store.save_location(&player, &profile.location), Err(StoreError::Io { .. })));

    assert!(store.get_logout(player.uuid).is_none());
    assert!(store.get_location(player.uuid, "world").is_none());
    Ok(())
}

struct BrokenSerializer;

impl DocumentSerializer<PlayerProfile> for BrokenSerializer {
    fn to_document(&self, _: &PlayerProfile) -> Result<Document, SerializerError> {
        Err(SerializerError::NotAnObject("a string"))
    }

    fn from_document(&self, _: &Document) -> Result<PlayerProfile, SerializerError> {
        Err(SerializerError::NotAnObject("a string"))
    }
}

#[test]
fn serializer_failures_surface_as_errors() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = FileProfileStore::new(
        &scratch.root,
        ProfileCache::disabled(),
        Arc::new(BrokenSerializer),
        Arc::new(SerdeDocumentSerializer::<Location>::new()),
    );
    let player = steve();
    let key = ProfileKey::new(player.uuid, GameMode::Survival, "default")?;

    let err = store.save_player(&key, &profile_for(&player, GameMode::Survival));
    assert!(matches!(err, Err(StoreError::Serializer(_))));

    fs::write(store.paths().profile(&key), br#"{"name":"Steve"}"#)?;
    assert!(store.get_player(&key)?.is_some());
    assert!(matches!(store.load_player(&key), Err(StoreError::Serializer(_))));
    Ok(())
}

#[test]
fn concurrent_world_updates_for_one_player_all_survive() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let repo: Arc<dyn ProfileRepository> = Arc::new(scratch.store());
    let player = steve();
    let worlds: Vec<String> = (0..16).map(|i| format!("world_{i}")).collect();

    std::thread::scope(|s| {
        for (i, world) in worlds.iter().enumerate() {
            let repo = Arc::clone(&repo);
            let player = player.clone();
            let location = Location::new(world.as_str(), i as f64, 64.0, 0.0);
            s.spawn(move || repo.save_location(&player, &location));
        }
    });

    // Writes for one player are serialized by the store, so none of the
    // interleaved read-modify-write cycles loses another world's entry.
    for (i, world) in worlds.iter().enumerate() {
        assert_eq!(
            repo.get_location(player.uuid, world).map(|l| l.x),
            Some(i as f64),
            "lost {world}"
        );
    }
    Ok(())
}

#[test]
fn different_players_do_not_share_files() -> Result<(), anyhow::Error> {
    let scratch = Scratch::new();
    let store = scratch.store();
    let alex = Player::new(Uuid::new_v4(), "Alex");
    let steve = steve();

    store.save_location(&alex, &Location::new("world", 1.0, 1.0, 1.0))?;
    assert!(store.get_location(steve.uuid, "world").is_none());
    assert!(store.get_location(alex.uuid, "world").is_some());
    Ok(())
}
