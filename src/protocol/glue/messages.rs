//! The message catalogue: one request/response schema pair per engine
//! operation, plus the error event.
//!
//! These declarations are the whole contract. Field order here is wire
//! order; prototype ids are unique per schema, with distinct ids for the
//! request and response halves of one operation.

use super::schema::Schema;
use super::types::FieldDef;
use super::types::TypeTag::*;

const fn req(name: &'static str, kind: super::types::TypeTag) -> FieldDef {
    FieldDef::required(name, kind)
}

const fn opt(name: &'static str, kind: super::types::TypeTag) -> FieldDef {
    FieldDef::nullable(name, kind)
}

/// Error event raised toward the host when a request fails.
pub static ERROR_EVT: Schema = Schema::new(b"erro_evt", &[req("message", String)]);

/// Load one or more model shards and create the context. The tail of
/// nullable knobs mirrors the engine's tuning surface; unset means "engine
/// default".
pub static LOAD_REQ: Schema = Schema::new(
    b"load_req",
    &[
        req("model_paths", ArrayString),
        req("n_ctx_auto", Bool),
        req("use_mmap", Bool),
        req("use_mlock", Bool),
        req("n_gpu_layers", Int32),
        req("seed", Int32),
        req("n_ctx", Int32),
        req("n_threads", Int32),
        opt("embeddings", Bool),
        opt("offload_kqv", Bool),
        opt("n_batch", Int32),
        opt("n_seq_max", Int32),
        opt("pooling_type", String),
        opt("rope_scaling_type", String),
        opt("rope_freq_base", Float32),
        opt("rope_freq_scale", Float32),
        opt("yarn_ext_factor", Float32),
        opt("yarn_attn_factor", Float32),
        opt("yarn_beta_fast", Float32),
        opt("yarn_beta_slow", Float32),
        opt("yarn_orig_ctx", Int32),
        opt("cache_type_k", String),
        opt("cache_type_v", String),
    ],
);

/// Derived facts about the loaded model. Metadata is flattened into two
/// parallel string arrays because the format has no keyed aggregate type.
pub static LOAD_RES: Schema = Schema::new(
    b"load_res",
    &[
        req("success", Bool),
        req("n_ctx", Int32),
        req("n_batch", Int32),
        req("n_ubatch", Int32),
        req("n_vocab", Int32),
        req("n_ctx_train", Int32),
        req("n_embd", Int32),
        req("n_layer", Int32),
        req("metadata_key", ArrayString),
        req("metadata_val", ArrayString),
        req("token_bos", Int32),
        req("token_eos", Int32),
        req("token_eot", Int32),
        req("list_tokens_eog", ArrayInt32),
        req("add_bos_token", Bool),
        req("add_eos_token", Bool),
        req("has_encoder", Bool),
        req("token_decoder_start", Int32),
    ],
);

pub static SET_OPTIONS_REQ: Schema = Schema::new(b"opti_req", &[req("embeddings", Bool)]);

pub static SET_OPTIONS_RES: Schema = Schema::new(b"opti_res", &[req("success", Bool)]);

/// (Re)build the sampler chain. Every knob is nullable; unset keeps the
/// engine default for that sampler.
pub static SAMPLING_INIT_REQ: Schema = Schema::new(
    b"sint_req",
    &[
        opt("mirostat", Int32),
        opt("mirostat_tau", Float32),
        opt("mirostat_eta", Float32),
        opt("temp", Float32),
        opt("top_p", Float32),
        opt("top_k", Int32),
        opt("penalty_last_n", Int32),
        opt("penalty_repeat", Float32),
        opt("penalty_freq", Float32),
        opt("penalty_present", Float32),
        opt("dynatemp_range", Float32),
        opt("dynatemp_exponent", Float32),
        opt("samplers_sequence", ArrayString),
        opt("grammar", String),
        opt("n_prev", Int32),
        opt("n_probs", Int32),
        opt("min_p", Float32),
        opt("typical_p", Float32),
        opt("typ_p", Float32),
        opt("logit_bias_toks", ArrayInt32),
        opt("logit_bias_vals", ArrayFloat32),
        opt("tokens", ArrayInt32),
    ],
);

pub static SAMPLING_INIT_RES: Schema = Schema::new(b"sint_res", &[req("success", Bool)]);

pub static GET_VOCAB_REQ: Schema = Schema::new(b"gvoc_req", &[]);

pub static GET_VOCAB_RES: Schema = Schema::new(
    b"gvoc_res",
    &[req("success", Bool), req("vocab", ArrayRaw)],
);

pub static LOOKUP_TOKEN_REQ: Schema = Schema::new(b"lkup_req", &[req("piece", String)]);

pub static LOOKUP_TOKEN_RES: Schema = Schema::new(
    b"lkup_res",
    &[req("success", Bool), req("token", Int32)],
);

pub static TOKENIZE_REQ: Schema = Schema::new(
    b"tokn_req",
    &[req("text", String), req("special", Bool)],
);

pub static TOKENIZE_RES: Schema = Schema::new(
    b"tokn_res",
    &[req("success", Bool), req("tokens", ArrayInt32)],
);

pub static DETOKENIZE_REQ: Schema = Schema::new(b"dtkn_req", &[req("tokens", ArrayInt32)]);

/// Detokenized text travels as a raw buffer: a token boundary can split a
/// multi-byte sequence, so the content is not guaranteed valid UTF-8.
pub static DETOKENIZE_RES: Schema = Schema::new(
    b"dtkn_res",
    &[req("success", Bool), req("buffer", Raw)],
);

pub static DECODE_REQ: Schema = Schema::new(
    b"deco_req",
    &[req("tokens", ArrayInt32), req("skip_logits", Bool)],
);

pub static DECODE_RES: Schema = Schema::new(
    b"deco_res",
    &[req("success", Bool), req("message", String), req("n_past", Int32)],
);

pub static ENCODE_REQ: Schema = Schema::new(b"enco_req", &[req("tokens", ArrayInt32)]);

pub static ENCODE_RES: Schema = Schema::new(
    b"enco_res",
    &[req("success", Bool), req("message", String), req("n_past", Int32)],
);

pub static SAMPLING_SAMPLE_REQ: Schema = Schema::new(b"ssam_req", &[]);

pub static SAMPLING_SAMPLE_RES: Schema = Schema::new(
    b"ssam_res",
    &[req("success", Bool), req("piece", Raw), req("token", Int32)],
);

pub static SAMPLING_ACCEPT_REQ: Schema = Schema::new(b"sacc_req", &[req("tokens", ArrayInt32)]);

pub static SAMPLING_ACCEPT_RES: Schema = Schema::new(b"sacc_res", &[req("success", Bool)]);

pub static GET_LOGITS_REQ: Schema = Schema::new(b"glog_req", &[req("top_k", Int32)]);

pub static GET_LOGITS_RES: Schema = Schema::new(
    b"glog_res",
    &[
        req("success", Bool),
        req("tokens", ArrayInt32),
        req("probs", ArrayFloat32),
    ],
);

pub static GET_EMBEDDINGS_REQ: Schema = Schema::new(b"gemb_req", &[req("tokens", ArrayInt32)]);

pub static GET_EMBEDDINGS_RES: Schema = Schema::new(
    b"gemb_res",
    &[
        req("success", Bool),
        req("message", String),
        req("embeddings", ArrayFloat32),
    ],
);

pub static KV_REMOVE_REQ: Schema = Schema::new(
    b"kvcr_req",
    &[req("n_keep", Int32), req("n_discard", Int32)],
);

pub static KV_REMOVE_RES: Schema = Schema::new(
    b"kvcr_res",
    &[req("n_past", Int32), req("success", Bool)],
);

pub static KV_CLEAR_REQ: Schema = Schema::new(b"kvcc_req", &[]);

pub static KV_CLEAR_RES: Schema = Schema::new(
    b"kvcc_res",
    &[req("n_past", Int32), req("success", Bool)],
);

pub static SESSION_SAVE_REQ: Schema = Schema::new(b"sesa_req", &[req("session_path", String)]);

pub static SESSION_SAVE_RES: Schema = Schema::new(
    b"sesa_res",
    &[req("success", Bool), req("tokens", ArrayInt32)],
);

pub static SESSION_LOAD_REQ: Schema = Schema::new(
    b"sesl_req",
    &[req("session_path", String), req("tokens", ArrayInt32)],
);

pub static SESSION_LOAD_RES: Schema = Schema::new(b"sesl_res", &[req("success", Bool)]);

pub static STATUS_REQ: Schema = Schema::new(b"stat_req", &[]);

pub static STATUS_RES: Schema = Schema::new(
    b"stat_res",
    &[req("success", Bool), req("tokens", ArrayInt32)],
);

pub static TEST_BENCHMARK_REQ: Schema = Schema::new(
    b"tben_req",
    &[req("type", String), req("n_samples", Int32)],
);

pub static TEST_BENCHMARK_RES: Schema = Schema::new(
    b"tben_res",
    &[req("success", Bool), req("message", String), req("t_ms", Int32)],
);

pub static TEST_PERPLEXITY_REQ: Schema = Schema::new(b"tper_req", &[req("tokens", ArrayInt32)]);

pub static TEST_PERPLEXITY_RES: Schema = Schema::new(
    b"tper_res",
    &[
        req("success", Bool),
        req("message", String),
        req("ppl", Float32),
        req("nll", Float32),
        req("cross_entropy", Float32),
        req("n_tokens", Int32),
        req("t_ms", Int32),
    ],
);

pub static CHAT_FORMAT_REQ: Schema = Schema::new(
    b"cfmt_req",
    &[
        opt("tmpl", String),
        opt("add_ass", Bool),
        req("roles", ArrayString),
        req("contents", ArrayString),
    ],
);

pub static CHAT_FORMAT_RES: Schema = Schema::new(
    b"cfmt_res",
    &[
        req("success", Bool),
        req("message", String),
        req("formatted_chat", String),
    ],
);

/// Every schema in the catalogue.
pub static ALL: &[&Schema] = &[
    &ERROR_EVT,
    &LOAD_REQ,
    &LOAD_RES,
    &SET_OPTIONS_REQ,
    &SET_OPTIONS_RES,
    &SAMPLING_INIT_REQ,
    &SAMPLING_INIT_RES,
    &GET_VOCAB_REQ,
    &GET_VOCAB_RES,
    &LOOKUP_TOKEN_REQ,
    &LOOKUP_TOKEN_RES,
    &TOKENIZE_REQ,
    &TOKENIZE_RES,
    &DETOKENIZE_REQ,
    &DETOKENIZE_RES,
    &DECODE_REQ,
    &DECODE_RES,
    &ENCODE_REQ,
    &ENCODE_RES,
    &SAMPLING_SAMPLE_REQ,
    &SAMPLING_SAMPLE_RES,
    &SAMPLING_ACCEPT_REQ,
    &SAMPLING_ACCEPT_RES,
    &GET_LOGITS_REQ,
    &GET_LOGITS_RES,
    &GET_EMBEDDINGS_REQ,
    &GET_EMBEDDINGS_RES,
    &KV_REMOVE_REQ,
    &KV_REMOVE_RES,
    &KV_CLEAR_REQ,
    &KV_CLEAR_RES,
    &SESSION_SAVE_REQ,
    &SESSION_SAVE_RES,
    &SESSION_LOAD_REQ,
    &SESSION_LOAD_RES,
    &STATUS_REQ,
    &STATUS_RES,
    &TEST_BENCHMARK_REQ,
    &TEST_BENCHMARK_RES,
    &TEST_PERPLEXITY_REQ,
    &TEST_PERPLEXITY_RES,
    &CHAT_FORMAT_REQ,
    &CHAT_FORMAT_RES,
];

/// Look up a schema by prototype id. The dispatcher binds operation names to
/// schema pairs itself; this lookup exists for diagnostics and tooling.
pub fn find(proto_id: &[u8; super::PROTO_ID_LEN]) -> Option<&'static Schema> {
    ALL.iter().copied().find(|s| s.proto_id() == proto_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proto_ids_unique() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(
                    a.proto_id(),
                    b.proto_id(),
                    "duplicate prototype id {:?}",
                    a.proto_str()
                );
            }
        }
    }

    #[test]
    fn test_proto_ids_ascii() {
        for s in ALL {
            assert!(
                s.proto_id().iter().all(|b| b.is_ascii_graphic()),
                "non-ascii prototype id {:?}",
                s.proto_id()
            );
        }
    }

    #[test]
    fn test_find() {
        assert!(std::ptr::eq(find(b"load_req").unwrap(), &LOAD_REQ));
        assert!(find(b"nope_nop").is_none());
    }
}
