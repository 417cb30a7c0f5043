//! Integration tests for the bonus-member registry.
//!
//! These tests drive the public API end to end:
//! - Enrollment, point registration and login-style lookups
//! - Promotion sweeps across a populated registry
//! - Configuration-driven registries
//! - Concurrent point registration racing a promotion sweep

use chrono::NaiveDate;
use loyalty_members::{
    check_and_upgrade_all, Config, IdIssuer, MemberId, MemberRegistry, MembershipLevel,
    Personals, PromotionEngine, RegistryError, TierCatalog,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

/// Helper to create a seeded registry with default tiers.
fn create_test_registry(seed: u64) -> MemberRegistry<Personals> {
    loyalty_core::logging::try_init();
    MemberRegistry::new(
        TierCatalog::default(),
        IdIssuer::seeded(seed, 1_000_000, 64).expect("Failed to build issuer"),
    )
}

fn personals(first_name: &str, password: &str) -> Option<Personals> {
    Some(Personals::new(
        first_name,
        "Testesen",
        format!("{}@example.com", first_name.to_lowercase()),
        password,
    ))
}

fn enrolled() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2023, 9, 1)
}

fn today() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 2, 10)
}

#[test]
fn test_basic_member_promoted_to_silver() {
    let registry = create_test_registry(1);
    let id = registry
        .create(personals("Ole", "ole"), enrolled())
        .expect("Failed to enroll member");

    registry.register_points(id, 30_000).unwrap();
    check_and_upgrade_all(&registry, today()).unwrap();

    let member = registry.find(id).unwrap();
    assert_eq!(member.membership_level(), MembershipLevel::Silver);
    // Accrued at Basic rate before the upgrade
    assert_eq!(member.points(), 30_000);

    // Silver multiplier applies from now on
    assert_eq!(registry.register_points(id, 1000).unwrap(), 1200);
    assert_eq!(registry.find_points(id, "ole").unwrap(), 31_200);
}

#[test]
fn test_unknown_member_registration_leaves_registry_unchanged() {
    let registry = create_test_registry(2);
    let id = registry.create(personals("Ole", "ole"), enrolled()).unwrap();

    let unknown = (0..1_000_000)
        .map(MemberId::new)
        .find(|candidate| *candidate != id)
        .unwrap();
    let result = registry.register_points(unknown, 500);

    assert!(matches!(result, Err(RegistryError::NotFound { .. })));
    assert_eq!(registry.size(), 1);
    assert_eq!(registry.find(id).unwrap().points(), 0);
}

#[test]
fn test_created_ids_are_unique() {
    let registry = create_test_registry(3);
    let mut seen = HashSet::new();

    for n in 0..2_000 {
        let id = registry
            .create(personals(&format!("Member{}", n), "pw"), enrolled())
            .unwrap();
        assert!(seen.insert(id), "duplicate member number {}", id);
    }
    assert_eq!(registry.size(), 2_000);
}

#[test]
fn test_mixed_population_sweep() {
    let registry = create_test_registry(4);
    let balances = [0_i64, 24_999, 25_000, 60_000, 74_999, 75_000, 200_000];
    let ids: Vec<MemberId> = balances
        .iter()
        .map(|points| {
            let id = registry.create(personals("Kari", "kari"), enrolled()).unwrap();
            registry.register_points(id, *points).unwrap();
            id
        })
        .collect();

    let engine = PromotionEngine::new(&registry);
    let promotions = engine.check_and_upgrade_all(today()).unwrap();
    assert_eq!(promotions.len(), 5);
    assert!(promotions.iter().all(|p| p.to > p.from));

    let levels: Vec<MembershipLevel> = ids
        .iter()
        .map(|id| registry.find(*id).unwrap().membership_level())
        .collect();
    assert_eq!(
        levels,
        vec![
            MembershipLevel::Basic,
            MembershipLevel::Basic,
            MembershipLevel::Silver,
            MembershipLevel::Silver,
            MembershipLevel::Silver,
            MembershipLevel::Gold,
            MembershipLevel::Gold,
        ]
    );

    // No member is ever recorded at Silver on its way to Gold
    for promotion in promotions.iter().filter(|p| p.to == MembershipLevel::Gold) {
        assert_eq!(promotion.from, MembershipLevel::Basic);
    }
}

#[test]
fn test_login_lookup() -> anyhow::Result<()> {
    let registry = create_test_registry(5);
    let id = registry.create(personals("Tove", "secret"), enrolled())?;
    registry.register_points(id, 1234)?;

    assert_eq!(registry.find_points(id, "secret")?, 1234);
    assert!(matches!(
        registry.find_points(id, "Secret"),
        Err(RegistryError::InvalidCredentials { member_id }) if member_id == id
    ));
    Ok(())
}

#[test]
fn test_registry_from_config() {
    let mut config = Config::default_config();
    config.tiers.silver_threshold = 100;
    config.tiers.gold_threshold = 1_000;
    config.tiers.gold_multiplier_percent = 200;
    config.issuer.id_space = 50;
    config.issuer.seed = Some(9);

    let registry: MemberRegistry<Personals> =
        MemberRegistry::from_config(&config).expect("Failed to build registry");
    let id = registry.create(personals("Per", "per"), enrolled()).unwrap();
    assert!(id.value() < 50);

    registry.register_points(id, 1_000).unwrap();
    check_and_upgrade_all(&registry, today()).unwrap();
    assert_eq!(
        registry.find(id).unwrap().membership_level(),
        MembershipLevel::Gold
    );
    assert_eq!(registry.register_points(id, 10).unwrap(), 20);
}

#[test]
fn test_small_id_space_exhausts_cleanly() {
    let mut config = Config::default_config();
    config.issuer.id_space = 3;
    config.issuer.max_attempts = 500;
    config.issuer.seed = Some(1);
    let registry: MemberRegistry<Personals> = MemberRegistry::from_config(&config).unwrap();

    for _ in 0..3 {
        registry.create(personals("A", "a"), enrolled()).unwrap();
    }
    let result = registry.create(personals("B", "b"), enrolled());
    assert!(matches!(result, Err(RegistryError::CapacityExhausted { .. })));

    // Still usable after the failure
    assert_eq!(registry.size(), 3);
    let any = registry.iterate_all()[0].id();
    assert!(registry.register_points(any, 10).is_ok());
}

#[test]
fn test_member_snapshot_serializes() -> anyhow::Result<()> {
    let registry = create_test_registry(6);
    let id = registry.create(personals("Ola", "ola"), enrolled())?;
    registry.register_points(id, 500)?;

    let json = serde_json::to_value(registry.find(id)?)?;
    assert_eq!(json["id"], serde_json::json!(id.value()));
    assert_eq!(json["points"], serde_json::json!(500));
    assert_eq!(json["level"], serde_json::json!("Basic"));
    assert_eq!(json["enrolled_date"], serde_json::json!("2023-09-01"));
    Ok(())
}

#[test]
fn test_concurrent_registration_and_sweep() {
    let registry = Arc::new(create_test_registry(7));
    let id = registry.create(personals("Race", "race"), enrolled()).unwrap();
    registry.register_points(id, 24_000).unwrap();

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..250 {
                    registry.register_points(id, 10).unwrap();
                }
            })
        })
        .collect();

    let sweeper = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for _ in 0..50 {
                check_and_upgrade_all(&registry, today()).unwrap();
            }
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    sweeper.join().unwrap();
    check_and_upgrade_all(&registry, today()).unwrap();

    // 1000 registrations of 10 points, each credited at 1.0x or 1.2x
    // depending on whether the promotion had happened yet.
    let member = registry.find(id).unwrap();
    assert_eq!(member.membership_level(), MembershipLevel::Silver);
    assert!(member.points() >= 24_000 + 10_000);
    assert!(member.points() <= 24_000 + 12_000);
    assert_eq!((member.points() - 24_000) % 2, 0);
}

#[test]
fn test_replace_only_accepts_upgrades() -> anyhow::Result<()> {
    let registry = create_test_registry(8);
    let id = registry.create(personals("Ola", "ola"), enrolled())?;
    registry.register_points(id, 40_000)?;

    // A snapshot handed back unchanged is not an upgrade
    let snapshot = registry.find(id)?;
    assert!(matches!(
        registry.replace(id, snapshot.clone()),
        Err(RegistryError::InvariantViolation(_))
    ));

    let silver = snapshot.upgraded_to(MembershipLevel::Silver, registry.catalog())?;
    registry.replace(id, silver)?;

    let member = registry.find(id)?;
    assert_eq!(member.membership_level(), MembershipLevel::Silver);
    assert_eq!(member.points(), 40_000);
    Ok(())
}
