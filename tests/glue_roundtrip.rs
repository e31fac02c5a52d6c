//! Round-trip identity tests for the glue message codec.
//!
//! Every kind must survive encode/decode exactly, in both present and
//! absent states, along with the catalogue scenarios the boundary actually
//! exercises.

use veles::{messages, FieldDef, InBuf, Message, OutBuf, Schema, TypeTag, Value};

/// One nullable field of every non-null kind.
static KITCHEN_SINK: Schema = Schema::new(
    b"sink_tst",
    &[
        FieldDef::nullable("flag", TypeTag::Bool),
        FieldDef::nullable("count", TypeTag::Int32),
        FieldDef::nullable("ratio", TypeTag::Float32),
        FieldDef::nullable("label", TypeTag::String),
        FieldDef::nullable("blob", TypeTag::Raw),
        FieldDef::nullable("flags", TypeTag::ArrayBool),
        FieldDef::nullable("counts", TypeTag::ArrayInt32),
        FieldDef::nullable("ratios", TypeTag::ArrayFloat32),
        FieldDef::nullable("labels", TypeTag::ArrayString),
        FieldDef::nullable("blobs", TypeTag::ArrayRaw),
    ],
);

fn sample_value(kind: TypeTag) -> Value {
    match kind {
        TypeTag::Bool => Value::Bool(true),
        TypeTag::Int32 => Value::Int32(-123456),
        TypeTag::Float32 => Value::Float32(0.25),
        TypeTag::String => Value::String("héllo wörld".to_string()),
        TypeTag::Raw => Value::Raw(vec![0x00, 0xff, 0x7f, 0x00]),
        TypeTag::ArrayBool => Value::ArrayBool(vec![true, false, true]),
        TypeTag::ArrayInt32 => Value::ArrayInt32(vec![i32::MIN, -1, 0, 1, i32::MAX]),
        TypeTag::ArrayFloat32 => Value::ArrayFloat32(vec![-1.5, 0.0, 3.75]),
        TypeTag::ArrayString => {
            Value::ArrayString(vec!["".to_string(), "a".to_string(), "bc".to_string()])
        }
        TypeTag::ArrayRaw => Value::ArrayRaw(vec![vec![], vec![0u8], vec![1, 2, 3]]),
        TypeTag::Null => unreachable!("null is not a declarable kind here"),
    }
}

fn round_trip(msg: &Message) -> Message {
    let mut out = OutBuf::new();
    msg.serialize(&mut out);
    let mut input = InBuf::new(out.as_slice());
    Message::deserialize(msg.schema(), &mut input).unwrap()
}

#[test]
fn test_all_kinds_present() {
    let mut msg = Message::new(&KITCHEN_SINK);
    for def in KITCHEN_SINK.fields() {
        msg.set(def.name, sample_value(def.kind));
    }
    let back = round_trip(&msg);
    assert_eq!(back, msg);
    assert_eq!(back.get_bool("flag"), Some(true));
    assert_eq!(back.get_i32("count"), Some(-123456));
    assert_eq!(back.get_f32("ratio"), Some(0.25));
    assert_eq!(back.get_str("label"), Some("héllo wörld"));
    assert_eq!(back.get_raw("blob"), Some(&[0x00, 0xff, 0x7f, 0x00][..]));
}

#[test]
fn test_all_kinds_absent() {
    let msg = Message::new(&KITCHEN_SINK);
    let back = round_trip(&msg);
    assert_eq!(back, msg);
    for def in KITCHEN_SINK.fields() {
        assert!(!back.is_present(def.name));
    }
}

#[test]
fn test_each_kind_alone() {
    // one field present, nine absent, for every kind
    for def in KITCHEN_SINK.fields() {
        let mut msg = Message::new(&KITCHEN_SINK);
        msg.set(def.name, sample_value(def.kind));
        let back = round_trip(&msg);
        assert_eq!(back, msg, "kind {:?}", def.kind);
        assert!(back.is_present(def.name));
    }
}

#[test]
fn test_empty_array_is_not_absence() {
    let mut msg = Message::new(&KITCHEN_SINK);
    msg.set_i32_arr("counts", vec![]);
    let back = round_trip(&msg);
    assert!(back.is_present("counts"));
    assert_eq!(back.get_i32_arr("counts"), Some(&[][..]));
}

#[test]
fn test_large_int_array() {
    let tokens: Vec<i32> = (0..10_000).map(|i| i * 7 - 35_000).collect();
    let mut msg = Message::new(&messages::TOKENIZE_RES);
    msg.set_bool("success", true);
    msg.set_i32_arr("tokens", tokens.clone());
    let back = round_trip(&msg);
    assert_eq!(back.get_i32_arr("tokens"), Some(&tokens[..]));
}

#[test]
fn test_empty_string_round_trips_as_empty() {
    let mut msg = Message::new(&KITCHEN_SINK);
    msg.set_str("label", "");
    let back = round_trip(&msg);
    assert!(back.is_present("label"));
    assert_eq!(back.get_str("label"), Some(""));
}

#[test]
fn test_raw_preserves_interior_nuls() {
    let blob = vec![0u8, 0, 1, 0, 255, 0];
    let mut msg = Message::new(&KITCHEN_SINK);
    msg.set_raw("blob", blob.clone());
    let back = round_trip(&msg);
    assert_eq!(back.get_raw("blob"), Some(&blob[..]));
}

#[test]
fn test_unset_after_set() {
    let mut msg = Message::new(&KITCHEN_SINK);
    msg.set_i32("count", 9);
    msg.unset("count");
    let back = round_trip(&msg);
    assert!(!back.is_present("count"));
}

#[test]
fn test_load_request_scenario() {
    let mut req = Message::new(&messages::LOAD_REQ);
    req.set_str_arr("model_paths", vec!["a.gguf".to_string()]);
    req.set_i32("seed", 42);
    req.set_i32("n_ctx", 2048);
    // n_gpu_layers deliberately left unset

    let back = round_trip(&req);
    assert_eq!(back.get_str_arr("model_paths"), Some(&["a.gguf".to_string()][..]));
    assert_eq!(back.get_i32("seed"), Some(42));
    assert_eq!(back.get_i32("n_ctx"), Some(2048));
    assert!(!back.is_present("n_gpu_layers"));
    assert_eq!(back.get_i32("n_gpu_layers"), None);
}

#[test]
fn test_sampling_init_scenario() {
    let mut req = Message::new(&messages::SAMPLING_INIT_REQ);
    req.set_i32("mirostat", 2);
    req.set_f32("temp", 0.8);
    req.set_f32("top_p", 0.95);
    req.set_f32("penalty_repeat", 1.1);
    req.set_str("grammar", "test grammar");
    req.set_i32_arr("tokens", vec![1, 2, 3, 4, 5]);

    let back = round_trip(&req);
    assert_eq!(back.get_i32("mirostat"), Some(2));
    assert_eq!(back.get_f32("temp"), Some(0.8));
    assert_eq!(back.get_f32("top_p"), Some(0.95));
    assert_eq!(back.get_f32("penalty_repeat"), Some(1.1));
    assert_eq!(back.get_str("grammar"), Some("test grammar"));
    assert_eq!(back.get_i32_arr("tokens"), Some(&[1, 2, 3, 4, 5][..]));
    assert!(!back.is_present("mirostat_tau"));
    assert!(!back.is_present("top_k"));
}

#[test]
fn test_encode_decode_encode_is_byte_identical() {
    let mut req = Message::new(&messages::TOKENIZE_REQ);
    req.set_str("text", "hello");
    req.set_bool("special", false);

    let mut first = OutBuf::new();
    req.serialize(&mut first);

    let mut input = InBuf::new(first.as_slice());
    let back = Message::deserialize(&messages::TOKENIZE_REQ, &mut input).unwrap();

    let mut second = OutBuf::new();
    back.serialize(&mut second);
    assert_eq!(first.as_slice(), second.as_slice());
}

#[test]
fn test_tokenize_golden_bytes() {
    let mut req = Message::new(&messages::TOKENIZE_REQ);
    req.set_str("text", "hello");
    req.set_bool("special", false);

    let mut out = OutBuf::new();
    req.serialize(&mut out);

    let mut expected = Vec::new();
    expected.extend_from_slice(b"GLUE"); // magic, little-endian 0x45554c47
    expected.extend_from_slice(&1u32.to_le_bytes()); // version
    expected.extend_from_slice(b"tokn_req");
    expected.extend_from_slice(&4u32.to_le_bytes()); // string tag
    expected.extend_from_slice(&5u32.to_le_bytes()); // byte length
    expected.extend_from_slice(b"hello");
    expected.extend_from_slice(&1u32.to_le_bytes()); // bool tag
    expected.extend_from_slice(&0u32.to_le_bytes()); // false
    assert_eq!(out.as_slice(), &expected[..]);
}

#[test]
fn test_outbuf_reuse_across_messages() {
    let mut out = OutBuf::new();

    let mut big = Message::new(&messages::DETOKENIZE_REQ);
    big.set_i32_arr("tokens", (0..256).collect());
    big.serialize(&mut out);
    let big_len = out.len();

    // serialize clears first, so a smaller message fully replaces the bytes
    let small = Message::new(&messages::STATUS_REQ);
    small.serialize(&mut out);
    assert!(out.len() < big_len);

    let mut input = InBuf::new(out.as_slice());
    assert!(Message::deserialize(&messages::STATUS_REQ, &mut input).is_ok());
}

#[test]
fn test_whole_catalogue_empty_round_trip() {
    // every schema round-trips with all fields absent
    for schema in messages::ALL {
        let msg = Message::new(schema);
        let back = round_trip(&msg);
        assert_eq!(back, msg, "schema {}", schema.proto_str());
    }
}

#[test]
fn test_whole_catalogue_populated_round_trip() {
    // and with every field set to a sample of its declared kind
    for schema in messages::ALL {
        let mut msg = Message::new(schema);
        for def in schema.fields() {
            msg.set(def.name, sample_value(def.kind));
        }
        let back = round_trip(&msg);
        assert_eq!(back, msg, "schema {}", schema.proto_str());
    }
}

#[test]
fn test_load_response_metadata_arrays() {
    let mut res = Message::new(&messages::LOAD_RES);
    res.set_bool("success", true);
    res.set_i32("n_vocab", 32000);
    res.set_str_arr(
        "metadata_key",
        vec!["general.name".to_string(), "general.arch".to_string()],
    );
    res.set_str_arr(
        "metadata_val",
        vec!["test".to_string(), "llama".to_string()],
    );
    res.set_i32_arr("list_tokens_eog", vec![2, 32007]);

    let back = round_trip(&res);
    let keys = back.get_str_arr("metadata_key").unwrap();
    let vals = back.get_str_arr("metadata_val").unwrap();
    assert_eq!(keys.len(), vals.len());
    assert_eq!(keys[1], "general.arch");
    assert_eq!(vals[1], "llama");
    assert_eq!(back.get_i32_arr("list_tokens_eog"), Some(&[2, 32007][..]));
}
