use chrono::{NaiveDate, NaiveDateTime};
use gridfilter::config::TextMatch;
use gridfilter::property::EnumType;
use gridfilter::{
    DateInterval, DefaultPolicy, Filter, FilterConfig, FilterSet, FilterValue, InputValue,
    NumberInterval, PropertySet, RecordingBackend, ValueField, ValueType,
};

fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

fn schema() -> PropertySet {
    PropertySet::new()
        .with("name", ValueType::String)
        .with("age", ValueType::I32)
        .with("active", ValueType::Bool)
        .with(
            "status",
            ValueType::Enum(EnumType::new("Status", ["Open", "Closed"])),
        )
        .with("born", ValueType::Date)
        .with("created", ValueType::optional(ValueType::DateTime))
}

fn setup() -> FilterSet<RecordingBackend> {
    FilterSet::new(schema(), RecordingBackend::new())
}

#[test]
fn test_age_range_is_and_of_bounds() {
    let mut set = setup();
    let age = set.bind("age", ValueField::new()).unwrap();
    set.set_value(
        age,
        Some(NumberInterval::new().less_than(30).greater_than(10).into()),
    )
    .unwrap();

    let published = set.backend().last().flatten().cloned().unwrap();
    match &published {
        Filter::And(junction) => {
            assert_eq!(junction.len(), 2);
            assert!(junction.contains(&Filter::lt("age", 30)));
            assert!(junction.contains(&Filter::gt("age", 10)));
        }
        other => panic!("Expected And, got {}", other),
    }
}

#[test]
fn test_name_is_trimmed_prefix_match() {
    let mut set = setup();
    let name = set.bind("name", ValueField::new()).unwrap();
    set.set_value(name, Some(" Alice ".into())).unwrap();
    assert_eq!(set.combined(), Some(Filter::like("name", "Alice%")));
}

#[test]
fn test_boolean_null_then_true() {
    let mut set = setup();
    let active = set.bind("active", ValueField::new()).unwrap();
    assert!(set.active().get("active").is_none());

    set.set_value(active, Some(true.into())).unwrap();
    assert_eq!(set.active().get("active"), Some(&Filter::eq("active", true)));
}

#[test]
fn test_date_range_from_only_at_day_resolution() {
    let mut set = setup();
    let created = set
        .bind_as(
            "created",
            gridfilter::InputKind::DateRange {
                resolution: gridfilter::Resolution::Day,
            },
            ValueField::new(),
        )
        .unwrap();
    set.set_value(
        created,
        Some(DateInterval::new().since(dt(2024, 1, 1, 0, 0)).into()),
    )
    .unwrap();

    assert_eq!(
        set.combined(),
        Some(Filter::ge("created", dt(2024, 1, 1, 0, 0)))
    );
}

#[test]
fn test_date_only_property_compares_dates() {
    let mut set = setup();
    let born = set.bind("born", ValueField::new()).unwrap();
    set.set_value(
        born,
        Some(
            DateInterval::new()
                .since(dt(1990, 5, 1, 14, 0))
                .until(dt(1990, 5, 31, 9, 0))
                .into(),
        ),
    )
    .unwrap();

    let first = NaiveDate::from_ymd_opt(1990, 5, 1).unwrap();
    let last = NaiveDate::from_ymd_opt(1990, 5, 31).unwrap();
    assert_eq!(
        set.combined(),
        Filter::and([Filter::ge("born", first), Filter::le("born", last)])
    );
}

#[test]
fn test_three_columns_then_clear_one() {
    let mut set = setup();
    let name = set.bind("name", ValueField::new()).unwrap();
    let age = set.bind("age", ValueField::new()).unwrap();
    let status = set.bind("status", ValueField::new()).unwrap();

    set.set_value(name, Some("Bo".into())).unwrap();
    set.set_value(age, Some(NumberInterval::new().equals(40).into()))
        .unwrap();
    set.set_value(status, Some(InputValue::Choice("Open".into())))
        .unwrap();

    let open = Filter::eq("status", FilterValue::Enum("Open".into()));
    assert_eq!(
        set.backend().last().flatten(),
        Filter::and([
            Filter::like("name", "Bo%"),
            Filter::eq("age", 40),
            open.clone(),
        ])
        .as_ref()
    );

    set.set_value(age, None).unwrap();
    assert_eq!(
        set.backend().last().flatten(),
        Filter::and([Filter::like("name", "Bo%"), open]).as_ref()
    );
    assert_eq!(set.backend().publish_count(), 4);
}

#[test]
fn test_repeated_value_publishes_once() {
    let mut set = setup();
    let age = set.bind("age", ValueField::new()).unwrap();
    let range: InputValue = NumberInterval::new().greater_than(18).into();

    assert!(set.set_value(age, Some(range.clone())).unwrap());
    assert!(!set.set_value(age, Some(range)).unwrap());
    assert_eq!(set.backend().publish_count(), 1);
}

#[test]
fn test_configured_policy_changes_text_matching() {
    let config = FilterConfig {
        text_match: TextMatch::Contains,
        case_sensitive: true,
        ..Default::default()
    };
    let policy = DefaultPolicy::new(config).unwrap();
    let mut set = FilterSet::with_policy(schema(), policy, RecordingBackend::new());

    set.bind("name", ValueField::with_value("li")).unwrap();
    assert_eq!(
        set.combined(),
        Some(Filter::like_with_case("name", "%li%", true))
    );
}

#[test]
fn test_clear_publishes_once() {
    let mut set = setup();
    set.bind("name", ValueField::with_value("A")).unwrap();
    set.bind("active", ValueField::with_value(true)).unwrap();
    assert_eq!(set.backend().publish_count(), 2);

    set.clear();
    assert_eq!(set.backend().publish_count(), 3);
    assert_eq!(set.combined(), None);
}

#[test]
fn test_published_filter_serializes() {
    let mut set = setup();
    set.bind("active", ValueField::with_value(false)).unwrap();

    let published = set.backend().last().flatten().unwrap();
    let json = serde_json::to_value(published).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "op": "eq",
            "field": "active",
            "value": { "type": "bool", "value": false }
        })
    );
}

#[test]
fn test_tri_state_text_filters_as_bool() {
    let mut set = setup();
    let active = set.bind("active", ValueField::new()).unwrap();

    set.set_value(active, Some("true".into())).unwrap();
    assert_eq!(set.combined(), Some(Filter::eq("active", true)));

    set.set_value(active, Some("maybe".into())).unwrap();
    assert_eq!(set.combined(), None);
}

#[test]
fn test_choice_outside_options_is_not_published() {
    let mut set = FilterSet::new(
        PropertySet::new().with("city", ValueType::String),
        RecordingBackend::new(),
    );
    let city = set
        .bind_as(
            "city",
            gridfilter::InputKind::SingleChoice {
                options: vec!["Oslo".into()],
            },
            ValueField::new(),
        )
        .unwrap();

    assert!(!set
        .set_value(city, Some(InputValue::Choice("Paris".into())))
        .unwrap());
    assert_eq!(set.backend().publish_count(), 0);
}
