//! Unit tests for catalog parsing.

use anyhow::{Result, ensure};
use rstest::rstest;

use super::*;
use crate::catalog::{KeyRef, MessageText, Translation};

fn minimal_catalog(payload: &str) -> String {
    format!(
        r#"
format_version: "1.0.0"
locale: it
contexts:
  - name: CheatDialog
    messages:
      - source: "Add Cheat"
{payload}
"#
    )
}

fn lookup(catalog: &Catalog, source: &str) -> Option<Translation> {
    catalog
        .translation("CheatDialog", &KeyRef::new(source, None))
        .cloned()
}

#[rstest]
fn parses_final_singular_translation() -> Result<()> {
    let yaml = minimal_catalog("        translation: \"Aggiungi Trucco\"");
    let catalog = from_str(&yaml)?;
    ensure!(catalog.locale().as_str() == "it", "wrong locale");
    ensure!(
        lookup(&catalog, "Add Cheat")
            == Some(Translation::Final(MessageText::Singular(
                "Aggiungi Trucco".to_owned()
            ))),
        "expected a final singular payload"
    );
    Ok(())
}

#[rstest]
#[case("        state: unfinished\n        translation: \"Aggiungi\"", Translation::Unfinished("Aggiungi".to_owned()))]
#[case("        state: unfinished", Translation::Missing)]
#[case("        state: obsolete\n        translation: \"Vecchio\"", Translation::Obsolete("Vecchio".to_owned()))]
#[case("        state: obsolete", Translation::Missing)]
#[case("        disambiguation: \"unused here\"", Translation::Missing)]
fn completion_states_map_to_payloads(
    #[case] payload: &str,
    #[case] expected: Translation,
) -> Result<()> {
    let yaml = minimal_catalog(payload);
    let catalog = from_str(&yaml)?;
    let key = catalog
        .context("CheatDialog")
        .and_then(|ctx| ctx.messages().next())
        .map(|(k, m)| (k.clone(), m.translation().clone()));
    let Some((_, translation)) = key else {
        anyhow::bail!("message not parsed");
    };
    ensure!(
        translation == expected,
        "expected {expected:?}, got {translation:?}"
    );
    Ok(())
}

#[rstest]
fn parses_plural_variants() -> Result<()> {
    let yaml = minimal_catalog(
        "        plural:\n          one: \"%n file\"\n          other: \"%n files\"",
    );
    let catalog = from_str(&yaml)?;
    let translation = lookup(&catalog, "Add Cheat");
    let Some(Translation::Final(MessageText::Plural(forms))) = translation else {
        anyhow::bail!("expected plural payload, got {translation:?}");
    };
    ensure!(forms.one.as_deref() == Some("%n file"), "one variant wrong");
    ensure!(forms.other == "%n files", "other variant wrong");
    Ok(())
}

#[rstest]
fn translation_and_plural_are_mutually_exclusive() -> Result<()> {
    let yaml = minimal_catalog(
        "        translation: \"Aggiungi\"\n        plural:\n          other: \"Aggiungi\"",
    );
    let Err(err) = from_str(&yaml) else {
        anyhow::bail!("expected a parse failure");
    };
    let rendered = format!("{:?}", miette::Report::new(err));
    ensure!(
        rendered.contains("both"),
        "diagnostic should mention the conflict: {rendered}"
    );
    Ok(())
}

#[rstest]
#[case("unfinished")]
#[case("obsolete")]
fn plural_variants_must_be_finished(#[case] state: &str) -> Result<()> {
    let yaml = minimal_catalog(&format!(
        "        state: {state}\n        plural:\n          other: \"Aggiungi\""
    ));
    ensure!(
        from_str(&yaml).is_err(),
        "plural with state `{state}` should fail"
    );
    Ok(())
}

#[rstest]
fn explicit_finished_without_text_is_rejected() -> Result<()> {
    let yaml = minimal_catalog("        state: finished");
    ensure!(
        from_str(&yaml).is_err(),
        "explicit finished marker without text should fail"
    );
    Ok(())
}

#[rstest]
fn unsupported_format_version_is_rejected() -> Result<()> {
    let yaml = r#"
format_version: "2.0.0"
locale: it
contexts: []
"#;
    let Err(err) = from_str(yaml) else {
        anyhow::bail!("expected a version failure");
    };
    let rendered = format!("{:?}", miette::Report::new(err));
    ensure!(
        rendered.contains("format version"),
        "diagnostic should mention the version: {rendered}"
    );
    Ok(())
}

#[rstest]
fn malformed_yaml_reports_a_location() -> Result<()> {
    let yaml = "format_version: \"1.0.0\"\nlocale: it\ncontexts:\n  - name: [broken";
    let Err(err) = from_str(yaml) else {
        anyhow::bail!("expected a syntax failure");
    };
    let rendered = format!("{:?}", miette::Report::new(err));
    ensure!(
        rendered.contains("line"),
        "diagnostic should carry a location hint: {rendered}"
    );
    Ok(())
}

#[rstest]
fn unknown_fields_are_rejected() -> Result<()> {
    let yaml = minimal_catalog("        translation: \"x\"\n        comment: \"nope\"");
    ensure!(
        from_str(&yaml).is_err(),
        "unknown message fields should fail"
    );
    Ok(())
}

#[rstest]
fn duplicate_keys_keep_the_last_entry() -> Result<()> {
    let yaml = r#"
format_version: "1.0.0"
locale: it
contexts:
  - name: CheatDialog
    messages:
      - source: "Add Cheat"
        translation: "Primo"
      - source: "Add Cheat"
        translation: "Secondo"
"#;
    let catalog = from_str(yaml)?;
    ensure!(
        lookup(&catalog, "Add Cheat")
            == Some(Translation::Final(MessageText::Singular(
                "Secondo".to_owned()
            ))),
        "last-loaded entry should win"
    );
    ensure!(
        catalog.context("CheatDialog").map(Context::len) == Some(1),
        "duplicate keys should collapse to one entry"
    );
    Ok(())
}

#[rstest]
fn disambiguated_duplicates_are_distinct_entries() -> Result<()> {
    let yaml = r#"
format_version: "1.0.0"
locale: it
contexts:
  - name: CheatDialog
    messages:
      - source: "Add Cheat"
        translation: "Primo"
      - source: "Add Cheat"
        disambiguation: "button"
        translation: "Secondo"
"#;
    let catalog = from_str(yaml)?;
    ensure!(
        catalog.context("CheatDialog").map(Context::len) == Some(2),
        "disambiguation should keep both entries"
    );
    Ok(())
}

#[rstest]
fn loading_identical_source_twice_is_idempotent() -> Result<()> {
    let yaml = minimal_catalog("        translation: \"Aggiungi Trucco\"");
    let first = from_str(&yaml)?;
    let second = from_str(&yaml)?;
    ensure!(
        lookup(&first, "Add Cheat") == lookup(&second, "Add Cheat"),
        "identical sources should produce identical lookups"
    );
    Ok(())
}

#[cfg(feature = "locations")]
#[rstest]
fn location_hints_are_retained_behind_the_feature() -> Result<()> {
    let yaml = minimal_catalog(
        "        translation: \"x\"\n        locations:\n          - { file: \"src/cheat.ui\", line: 42 }",
    );
    let catalog = from_str(&yaml)?;
    let message = catalog
        .context("CheatDialog")
        .and_then(|ctx| ctx.get(&KeyRef::new("Add Cheat", None)));
    let Some(message) = message else {
        anyhow::bail!("message not parsed");
    };
    ensure!(
        message.locations().first().map(|l| l.line) == Some(42),
        "location hint should survive parsing"
    );
    Ok(())
}
