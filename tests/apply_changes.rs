use chrono::{DateTime, TimeZone, Utc};
use patchwork::{ApplyError, ChangeSet, Patchable, Value, apply_changes, changes};
use pretty_assertions::assert_eq;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Patchable)]
struct Person {
    name: String,
    age: i64,
    nicknames: Vec<String>,
}

fn clay() -> Person {
    Person {
        name: "Clay".to_string(),
        age: 27,
        nicknames: vec!["Clayboy".to_string(), "Claysadilla".to_string()],
    }
}

#[test]
fn scalar_changes_touch_only_their_field() -> anyhow::Result<()> {
    let mut person = clay();
    apply_changes(&changes! { "age" => 28 }, &mut person)?;

    assert_eq!(
        person,
        Person {
            age: 28,
            ..clay()
        }
    );
    Ok(())
}

#[test]
fn empty_lists_clear_sequences() -> anyhow::Result<()> {
    let mut person = clay();
    person.age = 28;
    apply_changes(&changes! { "nicknames" => Vec::<String>::new() }, &mut person)?;

    assert_eq!(person.name, "Clay");
    assert_eq!(person.age, 28);
    assert_eq!(person.nicknames, Vec::<String>::new());
    Ok(())
}

#[test]
fn several_changes_apply_together() -> anyhow::Result<()> {
    let mut person = clay();
    apply_changes(
        &changes! {
            "nicknames" => vec!["Clayson the Wise"],
            "age" => 50,
        },
        &mut person,
    )?;

    assert_eq!(person.name, "Clay");
    assert_eq!(person.age, 50);
    assert_eq!(person.nicknames, vec!["Clayson the Wise".to_string()]);
    Ok(())
}

#[test]
fn unknown_tags_leave_the_record_untouched() -> anyhow::Result<()> {
    let mut person = clay();
    apply_changes(
        &changes! { "Name" => "Someone", "height" => 180, "" => Value::Null },
        &mut person,
    )?;
    assert_eq!(person, clay());

    apply_changes(&ChangeSet::new(), &mut person)?;
    assert_eq!(person, clay());
    Ok(())
}

#[test]
fn mismatched_shapes_report_field_and_types() {
    let mut person = clay();
    let err = apply_changes(&changes! { "age" => "twenty-eight" }, &mut person).unwrap_err();

    assert_eq!(
        err,
        ApplyError::Coercion {
            field: "age".to_string(),
            expected: "i64",
            actual: "string",
            reason: "incompatible string value".to_string(),
        }
    );
    assert_eq!(person, clay());
}

#[derive(Debug, Patchable)]
struct PersonWithPointer {
    name: String,
    parent: Option<String>,
}

#[test]
fn empty_strings_clear_optional_text() -> anyhow::Result<()> {
    let mut son = PersonWithPointer {
        name: "Son".to_string(),
        parent: Some("Mom".to_string()),
    };

    apply_changes(&changes! { "parent" => "" }, &mut son)?;
    assert_eq!(son.name, "Son");
    assert_eq!(son.parent, None);

    apply_changes(&changes! { "parent" => "Dad" }, &mut son)?;
    assert_eq!(son.parent, Some("Dad".to_string()));

    apply_changes(&changes! { "parent" => Value::Null }, &mut son)?;
    assert_eq!(son.parent, None);
    Ok(())
}

#[derive(Debug, Patchable)]
#[patch(rename_all = "camelCase")]
struct AwkwardFirstDate {
    when_started: DateTime<Utc>,
    when_ended: DateTime<Utc>,
    did_have_fun: bool,
}

#[test]
fn timestamps_accept_values_and_rfc3339_strings() -> anyhow::Result<()> {
    let mut date = AwkwardFirstDate {
        when_started: Utc::now(),
        when_ended: Utc::now(),
        did_have_fun: false,
    };
    let started = Utc.with_ymd_and_hms(2022, 5, 8, 18, 0, 0).unwrap();
    let ended = Utc.with_ymd_and_hms(2022, 5, 8, 21, 0, 0).unwrap();

    apply_changes(
        &changes! {
            "whenStarted" => started,
            "whenEnded" => "2022-05-08T21:00:00Z",
        },
        &mut date,
    )?;
    assert_eq!(date.when_started, started);
    assert_eq!(date.when_ended, ended);
    assert!(!date.did_have_fun);

    apply_changes(&changes! { "didHaveFun" => true }, &mut date)?;
    assert_eq!(date.when_started, started);
    assert_eq!(date.when_ended, ended);
    assert!(date.did_have_fun);
    Ok(())
}

#[test]
fn equivalent_instants_give_equal_fields() -> anyhow::Result<()> {
    let at = Utc.with_ymd_and_hms(2022, 5, 8, 21, 0, 0).unwrap();
    let mut from_value = AwkwardFirstDate {
        when_started: Utc::now(),
        when_ended: Utc::now(),
        did_have_fun: false,
    };
    let mut from_text = AwkwardFirstDate {
        when_started: Utc::now(),
        when_ended: Utc::now(),
        did_have_fun: false,
    };

    apply_changes(&changes! { "whenEnded" => at }, &mut from_value)?;
    apply_changes(
        &changes! { "whenEnded" => "2022-05-08T23:00:00.000000000+02:00" },
        &mut from_text,
    )?;
    assert_eq!(from_value.when_ended, from_text.when_ended);
    Ok(())
}

#[test]
fn malformed_timestamps_name_field_and_text() {
    let mut date = AwkwardFirstDate {
        when_started: Utc::now(),
        when_ended: Utc::now(),
        did_have_fun: false,
    };
    let err = apply_changes(&changes! { "whenEnded" => "8 May 2022" }, &mut date).unwrap_err();

    let ApplyError::Coercion { field, reason, .. } = &err else {
        panic!("expected a coercion error, got {err:?}");
    };
    assert_eq!(field, "whenEnded");
    assert!(reason.contains("\"8 May 2022\""));
}

#[derive(Debug, Patchable)]
struct PersonWithUuid {
    id: Uuid,
    name: String,
}

const CLAY_ID: &str = "cfe0965f-aa95-4ade-af54-838a85cc6644";
const NEW_ID: &str = "02a9920e-b015-4de3-8e32-fb965ac4653c";

#[test]
fn uuids_accept_every_encoding() -> anyhow::Result<()> {
    let new_id = Uuid::parse_str(NEW_ID)?;
    let encodings = [
        Value::Uuid(new_id),
        Value::bytes(new_id.as_bytes().to_vec()),
        Value::String(NEW_ID.to_string()),
    ];

    for encoding in encodings {
        let mut person = PersonWithUuid {
            id: Uuid::parse_str(CLAY_ID)?,
            name: "Clay".to_string(),
        };
        apply_changes(&changes! { "id" => encoding }, &mut person)?;

        assert_eq!(person.id.to_string(), NEW_ID);
        assert_eq!(person.name, "Clay");
    }
    Ok(())
}

#[test]
fn truncated_uuid_bytes_fail() -> anyhow::Result<()> {
    let mut person = PersonWithUuid {
        id: Uuid::parse_str(CLAY_ID)?,
        name: "Clay".to_string(),
    };
    let err = apply_changes(&changes! { "id" => Value::bytes(vec![1u8, 2, 3]) }, &mut person)
        .unwrap_err();

    assert_eq!(err.field(), Some("id"));
    assert_eq!(person.id.to_string(), CLAY_ID);
    Ok(())
}

#[test]
fn derived_records_expose_their_schema() {
    let schema = Person::record_schema();
    let tags: Vec<_> = schema.tags().into_iter().map(|tag| tag.as_str()).collect();

    assert_eq!(schema.name(), "Person");
    assert_eq!(tags, vec!["name", "age", "nicknames"]);
    assert_eq!(
        schema.resolve("nicknames").map(|field| field.field.type_name),
        Some("Vec<String>")
    );
}

#[test]
fn request_bodies_deserialize_into_change_sets() -> anyhow::Result<()> {
    let changes: ChangeSet = serde_json::from_str(r#"{ "age": 28, "nicknames": [] }"#)?;
    let mut person = clay();
    apply_changes(&changes, &mut person)?;

    assert_eq!(
        person,
        Person {
            age: 28,
            nicknames: Vec::new(),
            ..clay()
        }
    );
    Ok(())
}

#[derive(Debug, Default, PartialEq, Patchable)]
struct Counter {
    hits: u64,
    misses: u32,
}

#[test]
fn unsigned_fields_take_values_beyond_i64() -> anyhow::Result<()> {
    let mut counter = Counter::default();
    apply_changes(&changes! { "hits" => u64::MAX }, &mut counter)?;
    assert_eq!(counter.hits, u64::MAX);

    let body = serde_json::json!({ "hits": i64::MAX as u64 + 1 });
    apply_changes(&ChangeSet::try_from(body)?, &mut counter)?;
    assert_eq!(counter.hits, 1 << 63);

    let changes: ChangeSet = serde_json::from_str(r#"{ "hits": 18446744073709551615 }"#)?;
    apply_changes(&changes, &mut counter)?;
    assert_eq!(counter.hits, u64::MAX);

    let err = apply_changes(&changes! { "misses" => u64::MAX }, &mut counter).unwrap_err();
    assert_eq!(err.field(), Some("misses"));
    assert_eq!(counter.misses, 0);
    Ok(())
}
