//! Latency benchmarks for the signing and encoding hot paths.
//!
//! Run with: `cargo bench --bench latency`

use alloy_primitives::{address, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use lens_core::events::{EventExtractor, EVENT_SIG_COLLECTED};
use lens_core::modules::{CollectModuleInit, FeeTerms, ModuleKind, PayloadKind};
use lens_core::signing::{
    LocalWallet, SignatureSigner, TypedDataBuilder, TypedDataDomain, TypedDataMessage,
};
use lens_core::types::{LogEntry, PostRequest, Receipt};

// Well-known Anvil/Hardhat test key (DO NOT USE IN PRODUCTION)
const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const HUB: Address = address!("60ae865ee4c725cd04353b5aab364553f56cef82");
const FREE_COLLECT: Address = address!("0be6bd7092ee83d44a6ec1d949626fee48caab30");

fn fee_terms() -> FeeTerms {
    FeeTerms {
        amount: U256::from(1_000_000u64),
        currency: Address::repeat_byte(0x11),
        recipient: Address::repeat_byte(0x22),
        referral_fee: 250,
        follower_only: false,
    }
}

fn post_message(content_len: usize) -> TypedDataMessage {
    let builder = TypedDataBuilder::new(TypedDataDomain::lens_hub(137, HUB));
    let uri = format!("ipfs://{}", "a".repeat(content_len));
    let post = PostRequest::new(U256::from(1u64), uri, FREE_COLLECT)
        .collect_module_init_data(Bytes::from(false.abi_encode()))
        .normalize();
    builder.post_with_sig(&post, U256::from(5u64))
}

/// Receipt with `noise` unrelated logs ahead of the `Collected` log.
fn collect_receipt(noise: usize) -> Receipt {
    let mut logs: Vec<LogEntry> = (0..noise)
        .map(|i| {
            LogEntry::new(
                Address::repeat_byte(0x33),
                vec![B256::repeat_byte(i as u8), B256::ZERO, B256::ZERO],
            )
        })
        .collect();
    logs.push(LogEntry::new(
        HUB,
        vec![
            EVENT_SIG_COLLECTED,
            Address::repeat_byte(0x44).into_word(),
            B256::from(U256::from(1u64)),
            B256::from(U256::from(2u64)),
        ],
    ));
    Receipt::new(B256::repeat_byte(0xab), logs)
}

/// Benchmark EIP-712 hashing.
fn bench_typed_data_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_data");

    let domain = TypedDataDomain::lens_hub(137, HUB);
    group.bench_function("domain_separator", |b| {
        b.iter(|| black_box(black_box(&domain).separator()))
    });

    for len in [16, 256, 4096].iter() {
        let message = post_message(*len);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("post_signing_hash", len),
            &message,
            |b, message| b.iter(|| black_box(message.signing_hash())),
        );
    }

    let message = post_message(46);
    group.bench_function("to_json", |b| b.iter(|| black_box(message.to_json())));

    group.finish();
}

/// Benchmark module payload encode/decode.
fn bench_module_codecs(c: &mut Criterion) {
    let mut group = c.benchmark_group("module_codecs");

    let cases = [
        ("free", CollectModuleInit::Free { follower_only: true }),
        ("fee", CollectModuleInit::Fee(fee_terms())),
        (
            "limited_timed_fee",
            CollectModuleInit::LimitedTimedFee {
                collect_limit: U256::from(100u64),
                terms: fee_terms(),
            },
        ),
    ];

    for (name, init) in cases.iter() {
        let schema = init.kind().schema(PayloadKind::Init);
        let params = init.to_params();
        let encoded = match schema.encode(&params) {
            Ok(encoded) => encoded,
            Err(e) => panic!("failed to encode {name}: {e}"),
        };

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("encode", name), &params, |b, params| {
            b.iter(|| black_box(schema.encode(black_box(params))))
        });
        group.bench_with_input(BenchmarkId::new("decode", name), &encoded, |b, data| {
            b.iter(|| black_box(schema.decode(black_box(data))))
        });
    }

    let validate = ModuleKind::FeeCollect.schema(PayloadKind::Validate);
    let params = [
        alloy_dyn_abi::DynSolValue::Address(Address::repeat_byte(0x11)),
        alloy_dyn_abi::DynSolValue::Uint(U256::from(1000u64), 256),
    ];
    group.bench_function("encode_validate", |b| {
        b.iter(|| black_box(validate.encode(black_box(&params))))
    });

    group.finish();
}

/// Benchmark signing with a local key.
fn bench_signing(c: &mut Criterion) {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => panic!("failed to start runtime: {e}"),
    };
    let wallet = match LocalWallet::from_private_key(TEST_PRIVATE_KEY) {
        Ok(wallet) => wallet,
        Err(e) => panic!("invalid test key: {e}"),
    };
    let message = post_message(46);
    let signer = SignatureSigner::expecting(wallet.address());

    c.bench_function("sign_post_with_sig", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(signer.sign(Some(&wallet), black_box(&message)).await)
            })
        })
    });
}

/// Benchmark receipt scanning.
fn bench_event_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_extraction");

    for noise in [0, 10, 100].iter() {
        let receipt = collect_receipt(*noise);

        group.throughput(Throughput::Elements(receipt.logs.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("collected", noise),
            &receipt,
            |b, receipt| b.iter(|| black_box(EventExtractor::extract(receipt, EVENT_SIG_COLLECTED))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_typed_data_hashing,
    bench_module_codecs,
    bench_signing,
    bench_event_extraction,
);

criterion_main!(benches);
