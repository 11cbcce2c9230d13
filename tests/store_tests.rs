//! Tests for fallback-configuration validation and catalog storage.

use anyhow::{Result, ensure};
use rstest::rstest;

use lingua::catalog::{Catalog, LocaleId};
use lingua::store::{CatalogStore, ConfigError, FallbackConfig};

#[rstest]
fn chain_follows_declared_edges_in_order() -> Result<()> {
    let config = FallbackConfig::builder()
        .locale("pt-BR")
        .locale("pt")
        .locale("en")
        .fallback("pt-BR", "pt")
        .fallback("pt", "en")
        .build()?;
    let chain = config.chain(&LocaleId::new("pt-BR"));
    ensure!(
        chain
            == vec![
                LocaleId::new("pt-BR"),
                LocaleId::new("pt"),
                LocaleId::new("en")
            ],
        "expected pt-BR -> pt -> en, got {chain:?}"
    );
    Ok(())
}

#[rstest]
fn chain_for_locale_without_parent_is_itself() -> Result<()> {
    let config = FallbackConfig::builder().locale("en").build()?;
    ensure!(
        config.chain(&LocaleId::new("en")) == vec![LocaleId::new("en")],
        "root locale should chain to itself only"
    );
    Ok(())
}

#[rstest]
fn undeclared_fallback_endpoint_is_rejected() {
    let err = FallbackConfig::builder()
        .locale("it")
        .fallback("it", "en")
        .build()
        .err();
    assert_eq!(
        err,
        Some(ConfigError::UnknownLocale {
            locale: LocaleId::new("en"),
        })
    );
}

#[rstest]
fn second_parent_for_a_locale_is_rejected() {
    let err = FallbackConfig::builder()
        .locale("it")
        .locale("en")
        .locale("fr")
        .fallback("it", "en")
        .fallback("it", "fr")
        .build()
        .err();
    assert_eq!(
        err,
        Some(ConfigError::DuplicateFallback {
            child: LocaleId::new("it"),
            existing: LocaleId::new("en"),
        })
    );
}

#[rstest]
#[case::direct(&[("en", "en")])]
#[case::two_step(&[("it", "en"), ("en", "it")])]
#[case::three_step(&[("it", "en"), ("en", "fr"), ("fr", "it")])]
fn cyclic_fallback_graphs_are_rejected(#[case] edges: &[(&str, &str)]) {
    let mut builder = FallbackConfig::builder()
        .locale("it")
        .locale("en")
        .locale("fr");
    for (child, parent) in edges {
        builder = builder.fallback(*child, *parent);
    }
    assert!(matches!(
        builder.build(),
        Err(ConfigError::FallbackCycle { .. })
    ));
}

#[rstest]
fn diamond_free_tree_of_fallbacks_is_accepted() -> Result<()> {
    // Several children may share one parent; only re-parenting a child
    // or closing a loop is an error.
    let config = FallbackConfig::builder()
        .locale("pt-BR")
        .locale("pt-PT")
        .locale("pt")
        .fallback("pt-BR", "pt")
        .fallback("pt-PT", "pt")
        .build()?;
    ensure!(
        config.parent(&LocaleId::new("pt-BR")) == Some(&LocaleId::new("pt")),
        "pt-BR should fall back to pt"
    );
    ensure!(
        config.parent(&LocaleId::new("pt-PT")) == Some(&LocaleId::new("pt")),
        "pt-PT should fall back to pt"
    );
    Ok(())
}

#[rstest]
fn install_replaces_and_returns_previous_catalog() -> Result<()> {
    let config = FallbackConfig::builder().locale("it").build()?;
    let store = CatalogStore::new(config);
    let locale = LocaleId::new("it");

    ensure!(
        store.install(Catalog::new(locale.clone())).is_none(),
        "first install has nothing to replace"
    );
    ensure!(store.contains(&locale), "catalog should be resident");
    ensure!(
        store.install(Catalog::new(locale.clone())).is_some(),
        "second install should return the replaced catalog"
    );
    Ok(())
}

#[rstest]
fn snapshots_survive_reinstall_and_eviction() -> Result<()> {
    let config = FallbackConfig::builder().locale("it").build()?;
    let store = CatalogStore::new(config);
    let locale = LocaleId::new("it");
    let _installed = store.install(Catalog::new(locale.clone()));

    let snapshot = store.get(&locale);
    ensure!(snapshot.is_some(), "snapshot should exist");
    let _evicted = store.evict(&locale);
    ensure!(store.get(&locale).is_none(), "evicted locale has no catalog");
    // The earlier snapshot remains valid after eviction.
    ensure!(
        snapshot.map(|c| c.locale().clone()) == Some(locale),
        "in-flight snapshot outlives eviction"
    );
    Ok(())
}

#[rstest]
fn list_reports_resident_locales_sorted() -> Result<()> {
    let config = FallbackConfig::builder()
        .locale("it")
        .locale("en")
        .locale("de")
        .build()?;
    let store = CatalogStore::new(config);
    for tag in ["it", "de", "en"] {
        let _installed = store.install(Catalog::new(LocaleId::new(tag)));
    }
    ensure!(
        store.list()
            == vec![
                LocaleId::new("de"),
                LocaleId::new("en"),
                LocaleId::new("it")
            ],
        "locales should list in sorted order"
    );
    Ok(())
}
