//! Derived shapes and inputs against the encoders.

use gqlmap_core::{
    encode_input, encode_selection, EncodeError, EncoderOptions, InputValue, Operation,
    OperationInput, Shape, ToInput,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Shape, ToInput, Default)]
#[allow(non_snake_case)]
struct SimpleStruct {
    StringField: String,
    IntField: i32,
    StringPtrField: Option<String>,
    BoolField: bool,
}

#[derive(Shape, ToInput, Default)]
#[allow(non_snake_case)]
struct SliceStruct {
    StringsSlice: Vec<String>,
    IntsSlice: Vec<i32>,
    StringPtrsSlice: Vec<Option<String>>,
    BoolsSlice: Vec<bool>,
}

#[derive(Shape, ToInput, Default)]
#[allow(non_snake_case)]
struct EmbeddedStruct {
    StringField: String,
    IntField: i32,
    SimpleStructField: SimpleStruct,
    SliceStructField: SliceStruct,
}

#[derive(Shape, Deserialize, Serialize, ToInput)]
struct JsonTagged {
    #[serde(rename = "stringField")]
    string_field: String,
    #[serde(rename = "intField")]
    int_field: i32,
    #[serde(rename = "sliceField")]
    slice_field: Option<Vec<String>>,
}

#[derive(Shape, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncludedPointers {
    name: String,
    simple_struct_ptr: Option<Box<JsonTagged>>,
    #[gql(rename = "tagged")]
    tagged_list: Option<Vec<JsonTagged>>,
    #[serde(skip)]
    #[allow(dead_code)]
    local_only: u8,
}

#[derive(Shape, ToInput, Clone, Copy)]
#[gql(rename_all = "SCREAMING_SNAKE_CASE")]
enum Breed {
    GoldenRetriever,
    #[gql(rename = "MUTT")]
    Mixed,
}

#[derive(Shape, ToInput)]
struct DogFilter {
    breed: Breed,
    r#type: Option<String>,
}

#[derive(Shape, ToInput)]
struct DogId(String);

#[derive(Shape)]
struct EmptyRecord {}

#[derive(Shape, ToInput)]
struct Page<T> {
    items: Vec<T>,
    total: u32,
}

#[derive(ToInput)]
struct MapsStruct {
    simple: BTreeMap<String, String>,
    keyed_by_int: BTreeMap<i32, String>,
}

#[test]
fn test_field_count_and_order() {
    let selection = encode_selection::<EmbeddedStruct>().unwrap();
    assert_eq!(
        selection,
        "{ StringField IntField \
         SimpleStructField { StringField IntField StringPtrField BoolField } \
         SliceStructField { StringsSlice IntsSlice StringPtrsSlice BoolsSlice } }"
    );
    assert_eq!(SimpleStruct::describe().field_names().len(), 4);
}

#[test]
fn test_optional_root_matches_plain_root() {
    assert_eq!(
        encode_selection::<Option<Box<EmbeddedStruct>>>().unwrap(),
        encode_selection::<EmbeddedStruct>().unwrap()
    );
}

#[test]
fn test_serde_and_gql_names() {
    assert_eq!(
        encode_selection::<IncludedPointers>().unwrap(),
        "{ name \
         simpleStructPtr { stringField intField sliceField } \
         tagged { stringField intField sliceField } }"
    );
}

#[test]
fn test_empty_record_and_newtype() {
    assert_eq!(encode_selection::<EmptyRecord>().unwrap(), "{ }");
    assert_eq!(encode_selection::<DogId>().unwrap(), "");
    assert_eq!(
        DogId("d1".into()).to_input(),
        InputValue::String("d1".into())
    );
}

#[test]
fn test_generic_record() {
    assert_eq!(
        encode_selection::<Page<SimpleStruct>>().unwrap(),
        "{ items { StringField IntField StringPtrField BoolField } total }"
    );
}

#[test]
fn test_struct_input() {
    let value = EmbeddedStruct {
        SimpleStructField: SimpleStruct {
            StringField: "inner".into(),
            StringPtrField: Some("ptr".into()),
            ..SimpleStruct::default()
        },
        SliceStructField: SliceStruct {
            StringsSlice: vec!["test".into(), "test2".into()],
            IntsSlice: vec![1, 2],
            StringPtrsSlice: vec![Some("test".into()), None],
            BoolsSlice: vec![true, false],
        },
        ..EmbeddedStruct::default()
    };
    let input = OperationInput::new()
        .with("in", value)
        .with("id", "abcd-efgh")
        .with("limit", 20);

    assert_eq!(
        encode_input(&input, &EncoderOptions::default()).unwrap(),
        "id: \"abcd-efgh\", \
         in: { StringField: \"\", IntField: 0, \
         SimpleStructField: { StringField: \"inner\", IntField: 0, StringPtrField: \"ptr\", BoolField: false }, \
         SliceStructField: { StringsSlice: [\"test\", \"test2\"], IntsSlice: [1, 2], \
         StringPtrsSlice: [\"test\"], BoolsSlice: [true, false] } }, \
         limit: 20"
    );
}

#[test]
fn test_struct_input_with_zero_suppression() {
    let value = EmbeddedStruct {
        StringField: "test".into(),
        ..EmbeddedStruct::default()
    };
    let input = OperationInput::new().with("in", value);
    assert_eq!(
        encode_input(&input, &EncoderOptions::new().suppress_zero_values(true)).unwrap(),
        "in: { StringField: \"test\" }"
    );

    let all_zero = OperationInput::new().with("in", SimpleStruct::default());
    assert!(matches!(
        encode_input(&all_zero, &EncoderOptions::new().suppress_zero_values(true)),
        Err(EncodeError::AbsentParameter { .. })
    ));
}

#[test]
fn test_enum_and_raw_identifier_input() {
    let filter = DogFilter {
        breed: Breed::GoldenRetriever,
        r#type: Some("large".into()),
    };
    let input = OperationInput::new()
        .with("filter", filter)
        .with("exclude", vec![Breed::Mixed]);
    assert_eq!(
        encode_input(&input, &EncoderOptions::default()).unwrap(),
        "exclude: [MUTT], filter: { breed: GOLDEN_RETRIEVER, type: \"large\" }"
    );
}

#[test]
fn test_serde_renamed_input() {
    let tagged = JsonTagged {
        string_field: "s".into(),
        int_field: 1,
        slice_field: None,
    };
    let input = OperationInput::new().with("t", tagged);
    assert_eq!(
        encode_input(&input, &EncoderOptions::default()).unwrap(),
        "t: { stringField: \"s\", intField: 1 }"
    );
}

#[test]
fn test_map_with_non_string_key_fails() {
    let mut keyed_by_int = BTreeMap::new();
    keyed_by_int.insert(1, "one".to_string());
    let value = MapsStruct {
        simple: BTreeMap::from([("k1".to_string(), "v1".to_string())]),
        keyed_by_int,
    };
    let err = encode_input(
        &OperationInput::new().with("in", value),
        &EncoderOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("unsupported map key kind `int`"));
}

#[test]
fn test_operation_with_derived_shape() {
    let op = Operation::<Vec<JsonTagged>>::query("tagged")
        .input(OperationInput::new().with("first", 2));
    assert_eq!(
        op.to_query_string(&EncoderOptions::default()).unwrap(),
        "query { result: tagged(first: 2) { stringField intField sliceField } }"
    );
}
