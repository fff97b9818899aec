use std::collections::BTreeMap;

use jd_json::JsonData;

#[derive(JsonData, Debug, Clone, PartialEq)]
struct Sample {
    #[json(default = 0)]
    count: i32,
    label: Option<String>,
    #[json(default)]
    tags: Vec<String>,
}

#[derive(JsonData, Debug, PartialEq)]
struct Order {
    id: u64,
    #[json(rename = "customer_name")]
    customer: String,
    note: Option<String>,
}

#[test]
fn missing_fields_take_their_defaults() {
    let sample: Sample = serde_json::from_str(r#"{"count":5}"#).unwrap();
    assert_eq!(
        sample,
        Sample {
            count: 5,
            label: None,
            tags: vec![],
        }
    );

    let sample: Sample = serde_json::from_str("{}").unwrap();
    assert_eq!(sample.count, 0);
    assert!(sample.tags.is_empty());
}

#[test]
fn every_field_present() {
    let json = r#"{"count":5,"label":"x","tags":["a","b"]}"#;
    let sample: Sample = serde_json::from_str(json).unwrap();
    assert_eq!(sample.count, 5);
    assert_eq!(sample.label.as_deref(), Some("x"));
    assert_eq!(sample.tags, ["a", "b"]);
    assert_eq!(serde_json::to_string(&sample).unwrap(), json);
}

#[test]
fn null_is_a_present_value() {
    let sample: Sample = serde_json::from_str(r#"{"label":null}"#).unwrap();
    assert_eq!(sample.label, None);

    // `count` is not nullable, so `null` is a type error rather than absence.
    assert!(serde_json::from_str::<Sample>(r#"{"count":null}"#).is_err());
}

#[derive(JsonData, Debug, PartialEq)]
struct Labelled {
    id: u64,
    #[json(default = Some("d".to_owned()))]
    label: Option<String>,
}

#[test]
fn null_differs_from_missing() {
    let explicit: Labelled = serde_json::from_str(r#"{"id":1,"label":null}"#).unwrap();
    assert_eq!(explicit.label, None);

    let missing: Labelled = serde_json::from_str(r#"{"id":1}"#).unwrap();
    assert_eq!(missing.label.as_deref(), Some("d"));
}

#[test]
fn missing_required_field() {
    let err = serde_json::from_str::<Order>(r#"{"customer_name":"bob"}"#).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("`Order`"), "{message}");
    assert!(message.contains("missing field `id`"), "{message}");

    // A nullable field without default is not required.
    let order: Order = serde_json::from_str(r#"{"id":7,"customer_name":"bob"}"#).unwrap();
    assert_eq!(order.note, None);
}

#[test]
fn unknown_fields_are_skipped() {
    let json = r#"{
        "meta": {"nested": [1, {"deep": [true, null, "x"]}], "more": {}},
        "count": 3,
        "id": 99,
        "list": [[], [[]], {"a": {"b": 1.5e10}}],
        "tags": ["t"]
    }"#;
    let sample: Sample = serde_json::from_str(json).unwrap();
    assert_eq!(sample.count, 3);
    assert_eq!(sample.tags, ["t"]);
    assert_eq!(sample.label, None);
}

#[test]
fn renamed_field_uses_json_name() {
    let order: Order = serde_json::from_str(r#"{"id":1,"customer_name":"ann","customer":"x"}"#).unwrap();
    assert_eq!(order.customer, "ann");

    let json = serde_json::to_string(&order).unwrap();
    assert_eq!(json, r#"{"id":1,"customer_name":"ann","note":null}"#);
}

#[test]
fn last_duplicate_wins() {
    let sample: Sample = serde_json::from_str(r#"{"count":1,"count":2}"#).unwrap();
    assert_eq!(sample.count, 2);
}

#[test]
fn non_object_input_is_an_error() {
    assert!(serde_json::from_str::<Sample>("[1, null, []]").is_err());
    assert!(serde_json::from_str::<Sample>("3").is_err());
    assert!(serde_json::from_str::<Sample>("null").is_err());
}

// -----------------------------------------------------------------------------
// Attributes

#[derive(JsonData, Debug, PartialEq)]
#[json(default)]
struct Settings {
    width: u32,
    height: u32,
    title: String,
    #[json(skip)]
    dirty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "untitled".into(),
            dirty: true,
        }
    }
}

#[test]
fn record_default_fills_missing_fields() {
    let settings: Settings = serde_json::from_str(r#"{"width":800}"#).unwrap();
    assert_eq!(
        settings,
        Settings {
            width: 800,
            ..Settings::default()
        }
    );

    // Skipped fields are neither written nor read.
    let json = serde_json::to_string(&settings).unwrap();
    assert_eq!(json, r#"{"width":800,"height":480,"title":"untitled"}"#);
    let settings: Settings = serde_json::from_str(r#"{"dirty":false}"#).unwrap();
    assert!(settings.dirty);

    let settings: Settings =
        serde_json::from_str(r#"{"width":1,"height":2,"title":"t","dirty":false}"#).unwrap();
    assert_eq!((settings.width, settings.height), (1, 2));
    assert!(settings.dirty);
}

#[derive(JsonData, Debug, PartialEq)]
#[json(default)]
struct Conf {
    #[json(default = 5)]
    retries: u32,
    name: String,
}

impl Default for Conf {
    fn default() -> Self {
        Self {
            retries: 0,
            name: "none".into(),
        }
    }
}

#[test]
fn field_default_wins_over_record_default() {
    let conf: Conf = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
    assert_eq!(
        conf,
        Conf {
            retries: 5,
            name: "x".into(),
        }
    );

    let conf: Conf = serde_json::from_str("{}").unwrap();
    assert_eq!((conf.retries, conf.name.as_str()), (5, "none"));
}

#[derive(JsonData, Debug, PartialEq)]
#[json(default, constructor = Window::new)]
struct Window {
    start: u32,
    end: u32,
}

impl Window {
    fn new(start: u32, end: u32) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self { start: 0, end: 10 }
    }
}

#[test]
fn record_default_goes_through_the_constructor() {
    let full: Window = serde_json::from_str(r#"{"start":50,"end":20}"#).unwrap();
    assert_eq!(full, Window { start: 20, end: 50 });

    // `end` comes from `Window::default()`, then `Window::new` orders the pair.
    let partial: Window = serde_json::from_str(r#"{"start":50}"#).unwrap();
    assert_eq!(partial, Window { start: 10, end: 50 });

    let empty: Window = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, Window::default());
}

#[derive(JsonData, Debug, PartialEq)]
#[json(default, constructor = Counter::new)]
struct Counter {
    value: u32,
    #[json(skip)]
    generation: u32,
}

impl Counter {
    fn new(value: u32, generation: u32) -> Self {
        Self { value, generation }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new(0, 7)
    }
}

#[test]
fn skipped_constructor_argument_uses_record_default() {
    let counter: Counter = serde_json::from_str(r#"{"value":3,"generation":1}"#).unwrap();
    assert_eq!(counter, Counter::new(3, 7));

    let counter: Counter = serde_json::from_str("{}").unwrap();
    assert_eq!(counter, Counter::default());
}

#[derive(JsonData, Debug, PartialEq)]
#[json(constructor = Span::new)]
struct Span {
    start: u32,
    end: u32,
    #[json(default = 1)]
    step: u32,
}

impl Span {
    fn new(start: u32, end: u32, step: u32) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
            step,
        }
    }
}

#[test]
fn constructor_function_builds_the_record() {
    let span: Span = serde_json::from_str(r#"{"start":9,"end":2}"#).unwrap();
    assert_eq!(span, Span::new(2, 9, 1));

    let span: Span = serde_json::from_str(r#"{"start":1,"end":2,"step":3}"#).unwrap();
    assert_eq!(span.step, 3);
}

#[derive(JsonData, Debug, PartialEq)]
struct Keyword {
    r#type: String,
    #[json(default)]
    r#ref: Option<u8>,
}

#[test]
fn raw_identifiers_use_plain_names() {
    let value: Keyword = serde_json::from_str(r#"{"type":"a","ref":1}"#).unwrap();
    assert_eq!(value.r#type, "a");
    assert_eq!(value.r#ref, Some(1));
    assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"type":"a","ref":1}"#);
}

#[derive(JsonData, Debug, PartialEq)]
struct Blob {
    data: Vec<u8>,
    packed: Box<[u8]>,
    extra: Option<Vec<u8>>,
}

#[test]
fn byte_fields() {
    let blob = Blob {
        data: vec![0, 1, 255],
        packed: Box::new([7]),
        extra: None,
    };
    let json = serde_json::to_string(&blob).unwrap();
    assert_eq!(json, r#"{"data":[0,1,255],"packed":[7],"extra":null}"#);
    assert_eq!(serde_json::from_str::<Blob>(&json).unwrap(), blob);

    let blob: Blob = serde_json::from_str(r#"{"data":[],"packed":[],"extra":[3]}"#).unwrap();
    assert_eq!(blob.extra, Some(vec![3]));
}

#[derive(JsonData, Debug, PartialEq)]
struct Marker {
    #[json(skip)]
    hits: u32,
}

#[test]
fn record_with_only_skipped_fields() {
    assert_eq!(serde_json::to_string(&Marker { hits: 3 }).unwrap(), "{}");
    assert_eq!(serde_json::from_str::<Marker>(r#"{"hits":3}"#).unwrap(), Marker { hits: 0 });
}

#[derive(JsonData, Debug, PartialEq)]
struct Scalars {
    flag: bool,
    letter: char,
    small: i8,
    large: u64,
    ratio: f64,
    number: serde_json::Number,
    counts: BTreeMap<String, i64>,
}

#[test]
fn scalar_fields() {
    let json = r#"{"flag":true,"letter":"z","small":-8,"large":18446744073709551615,"ratio":0.5,"number":12,"counts":{"a":1}}"#;
    let value: Scalars = serde_json::from_str(json).unwrap();
    assert!(value.flag);
    assert_eq!(value.letter, 'z');
    assert_eq!(value.small, -8);
    assert_eq!(value.large, u64::MAX);
    assert_eq!(value.number.as_u64(), Some(12));
    assert_eq!(value.counts["a"], 1);
    assert_eq!(serde_json::to_string(&value).unwrap(), json);
}
