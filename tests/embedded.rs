use patchwork::{ApplyError, FieldTag, Patchable, apply_changes, changes};
use pretty_assertions::assert_eq;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Patchable)]
struct EmbedStruct {
    id: Uuid,
}

#[derive(Clone, Debug, PartialEq, Patchable)]
struct Embedder {
    #[patch(flatten)]
    embed: EmbedStruct,
    name: String,
}

#[derive(Clone, Debug, PartialEq, Patchable)]
#[patch(rename_all = "camelCase")]
struct UltimateEmbedder {
    #[patch(flatten)]
    embedder: Embedder,
    power_level: i64,
}

const NEW_ID: &str = "02a9920e-b015-4de3-8e32-fb965ac4653c";

fn vegeta() -> UltimateEmbedder {
    UltimateEmbedder {
        embedder: Embedder {
            embed: EmbedStruct { id: Uuid::nil() },
            name: "Vegeta".to_string(),
        },
        power_level: 7900,
    }
}

#[test]
fn promoted_fields_apply_at_every_level() -> anyhow::Result<()> {
    let mut champion = vegeta();
    apply_changes(
        &changes! {
            "id" => Uuid::parse_str(NEW_ID)?,
            "powerLevel" => 9001,
            "name" => "Goku",
        },
        &mut champion,
    )?;

    assert_eq!(champion.embedder.embed.id.to_string(), NEW_ID);
    assert_eq!(champion.embedder.name, "Goku");
    assert_eq!(champion.power_level, 9001);
    assert!(champion.power_level > 9000);
    Ok(())
}

#[test]
fn nested_changes_leave_siblings_alone() -> anyhow::Result<()> {
    let mut champion = vegeta();
    apply_changes(&changes! { "id" => NEW_ID }, &mut champion)?;

    let mut expected = vegeta();
    expected.embedder.embed.id = Uuid::parse_str(NEW_ID)?;
    assert_eq!(champion, expected);
    Ok(())
}

#[test]
fn embedded_records_can_be_patched_alone() -> anyhow::Result<()> {
    let mut embedder = vegeta().embedder;
    apply_changes(&changes! { "name" => "Trunks" }, &mut embedder)?;

    assert_eq!(embedder.name, "Trunks");
    assert_eq!(embedder.embed.id, Uuid::nil());
    Ok(())
}

#[derive(Debug, Patchable)]
struct Badge {
    name: String,
    id: String,
}

#[derive(Debug, Patchable)]
struct Member {
    #[patch(flatten)]
    embedder: Embedder,
    #[patch(flatten)]
    badge: Box<Badge>,
    #[patch(tag = "name")]
    display_name: String,
}

fn member() -> Member {
    Member {
        embedder: Embedder {
            embed: EmbedStruct { id: Uuid::nil() },
            name: "inner".to_string(),
        },
        badge: Box::new(Badge {
            name: "badge".to_string(),
            id: "B-1".to_string(),
        }),
        display_name: "outer".to_string(),
    }
}

#[test]
fn direct_fields_shadow_promoted_ones() -> anyhow::Result<()> {
    let mut member = member();
    apply_changes(&changes! { "name" => "renamed" }, &mut member)?;

    assert_eq!(member.display_name, "renamed");
    assert_eq!(member.embedder.name, "inner");
    assert_eq!(member.badge.name, "badge");
    Ok(())
}

#[test]
fn shallower_promotions_shadow_deeper_ones() -> anyhow::Result<()> {
    let mut member = member();
    apply_changes(&changes! { "id" => "B-2" }, &mut member)?;

    assert_eq!(member.badge.id, "B-2");
    assert_eq!(member.embedder.embed.id, Uuid::nil());

    let shadowed = Member::record_schema().shadowed();
    assert_eq!(shadowed, &[FieldTag::from("id"), FieldTag::from("name")]);
    Ok(())
}

#[test]
fn shadowed_field_types_still_govern_coercion() {
    let mut member = member();
    let err = apply_changes(&changes! { "id" => 7 }, &mut member).unwrap_err();

    assert!(matches!(
        err,
        ApplyError::Coercion {
            expected: "String",
            actual: "int",
            ..
        }
    ));
}
