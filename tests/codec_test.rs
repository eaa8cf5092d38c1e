//! Integration tests for the binary layout engine
//!
//! This test verifies that:
//! 1. Call payloads match the canonical head/tail layout byte for byte
//! 2. Encodings agree with an independent ABI implementation (alloy-dyn-abi)
//! 3. Integer bounds are enforced on both sides for every bit width
//! 4. Arbitrary in-range values survive an encode/decode cycle

use abi_dispatch::{compile, compile_type, AbiError, AbiItem, Contract, Param, Value};
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, I256, U256};
use proptest::prelude::*;

#[test]
fn test_two_argument_call_layout() {
    let abi = vec![AbiItem::function(
        "deposit",
        vec![Param::unnamed("uint256"), Param::unnamed("address")],
        vec![],
    )];
    let contract = Contract::new(&abi).unwrap();
    let deposit = contract.function("deposit").unwrap();

    let amount = U256::from(1_000_000_000_000_000_000u64);
    let to = Address::repeat_byte(0x11);
    let data = deposit
        .encode_input(Some(&Value::Tuple(vec![Value::Uint(amount), Value::Address(to)])))
        .unwrap();

    assert_eq!(data.len(), 4 + 32 + 32);
    assert_eq!(&data[..4], deposit.selector().as_slice());
    assert_eq!(&data[4..36], &amount.to_be_bytes::<32>());
    assert_eq!(&data[36..48], &[0u8; 12]);
    assert_eq!(&data[48..68], to.as_slice());
    println!("✓ deposit calldata: 0x{}", hex::encode(&data));
}

#[test]
fn test_single_string_layout() {
    let abi = vec![AbiItem::function("say", vec![Param::new("text", "string")], vec![])];
    let contract = Contract::new(&abi).unwrap();
    let data = contract
        .function("say")
        .unwrap()
        .encode_input(Some(&Value::from("hi")))
        .unwrap();
    let args = &data[4..];

    assert_eq!(args.len(), 96);
    assert_eq!(U256::from_be_slice(&args[..32]), U256::from(32u64));
    assert_eq!(U256::from_be_slice(&args[32..64]), U256::from(2u64));
    assert_eq!(&args[64..66], b"hi");
    assert!(args[66..].iter().all(|b| *b == 0));
}

#[test]
fn test_matches_alloy_dyn_abi() {
    let params = vec![
        Param::new("id", "uint64"),
        Param::new("names", "string[]"),
        Param::tuple(
            "pair",
            "tuple",
            vec![Param::new("who", "address"), Param::new("blob", "bytes")],
        ),
        Param::new("flags", "bool[2]"),
        Param::new("delta", "int32"),
    ];
    let abi = vec![AbiItem::function("f", params, vec![])];
    let contract = Contract::new(&abi).unwrap();

    let who = Address::repeat_byte(0x42);
    let value = Value::record([
        ("id", Value::from(7u64)),
        ("names", Value::Array(vec![Value::from("alpha"), Value::from("beta")])),
        (
            "pair",
            Value::record([("who", Value::Address(who)), ("blob", Value::Bytes(vec![0xde, 0xad]))]),
        ),
        ("flags", Value::Array(vec![Value::Bool(true), Value::Bool(false)])),
        ("delta", Value::Int(I256::try_from(-5i64).unwrap())),
    ]);
    let ours = contract.function("f").unwrap().encode_input(Some(&value)).unwrap();

    let theirs = DynSolValue::Tuple(vec![
        DynSolValue::Uint(U256::from(7u64), 64),
        DynSolValue::Array(vec![
            DynSolValue::String("alpha".into()),
            DynSolValue::String("beta".into()),
        ]),
        DynSolValue::Tuple(vec![
            DynSolValue::Address(who),
            DynSolValue::Bytes(vec![0xde, 0xad]),
        ]),
        DynSolValue::FixedArray(vec![DynSolValue::Bool(true), DynSolValue::Bool(false)]),
        DynSolValue::Int(I256::try_from(-5i64).unwrap(), 32),
    ])
    .abi_encode_params();
    assert_eq!(&ours[4..], theirs.as_slice());

    let selector = alloy_json_abi::Function::parse(
        "function f(uint64,string[],(address,bytes),bool[2],int32)",
    )
    .unwrap()
    .selector();
    assert_eq!(contract.function("f").unwrap().selector(), selector);
}

#[test]
fn test_decodes_alloy_encoding() {
    let ty = DynSolType::parse("(uint256,string)[2]").unwrap();
    let sol = DynSolValue::FixedArray(vec![
        DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::from(1u64), 256),
            DynSolValue::String("one".into()),
        ]),
        DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::from(2u64), 256),
            DynSolValue::String("two".into()),
        ]),
    ]);
    assert!(ty.is_dynamic());
    let encoded = DynSolValue::Tuple(vec![sol]).abi_encode_params();

    let codec = compile(&Param::tuple(
        "",
        "tuple[2]",
        vec![Param::unnamed("uint256"), Param::unnamed("string")],
    ))
    .unwrap();
    // a dynamic fixed array sits behind a pointer when encoded as a parameter
    assert_eq!(U256::from_be_slice(&encoded[..32]), U256::from(32u64));
    let value = codec.decode(&encoded).unwrap();
    assert_eq!(
        value,
        Value::Array(vec![
            Value::Tuple(vec![Value::from(1u64), Value::from("one")]),
            Value::Tuple(vec![Value::from(2u64), Value::from("two")]),
        ])
    );
}

#[test]
fn test_bounds_every_width() {
    for bits in (8..=256).step_by(8) {
        let uint = compile_type(&format!("uint{}", bits)).unwrap();
        let int = compile_type(&format!("int{}", bits)).unwrap();

        let max = if bits == 256 {
            U256::MAX
        } else {
            (U256::from(1u64) << bits) - U256::from(1u64)
        };
        assert!(uint.encode(&Value::Uint(max)).is_ok(), "uint{} max", bits);
        if bits < 256 {
            let over = Value::Uint(max + U256::from(1u64));
            assert!(
                matches!(uint.encode(&over), Err(AbiError::Bounds { .. })),
                "uint{} overflow",
                bits
            );
            // an out-of-range word is rejected on decode as well
            let word = (max + U256::from(1u64)).to_be_bytes::<32>();
            assert!(matches!(uint.decode(&word), Err(AbiError::Bounds { .. })));
        }

        let (min, top) = if bits == 256 {
            (I256::MIN, I256::MAX)
        } else {
            let half = U256::from(1u64) << (bits - 1);
            (-I256::from_raw(half), I256::from_raw(half - U256::from(1u64)))
        };
        assert!(int.encode(&Value::Int(min)).is_ok(), "int{} min", bits);
        assert!(int.encode(&Value::Int(top)).is_ok(), "int{} max", bits);
        if bits < 256 {
            let over = Value::Int(top + I256::ONE);
            let under = Value::Int(min - I256::ONE);
            assert!(matches!(int.encode(&over), Err(AbiError::Bounds { .. })));
            assert!(matches!(int.encode(&under), Err(AbiError::Bounds { .. })));
        }
    }
}

#[test]
fn test_strict_decoding() {
    let bool_codec = compile_type("bool").unwrap();
    let mut word = [0u8; 32];
    word[31] = 2;
    assert!(bool_codec.decode(&word).is_err());

    let address = compile_type("address").unwrap();
    let mut word = [0u8; 32];
    word[0] = 1;
    assert!(address.decode(&word).is_err());

    // truncated tail
    let string = compile_type("string").unwrap();
    let mut data = U256::from(32u64).to_be_bytes::<32>().to_vec();
    data.extend_from_slice(&U256::from(40u64).to_be_bytes::<32>());
    data.extend_from_slice(&[b'a'; 32]);
    assert!(string.decode(&data).is_err());
}

fn small_value() -> impl Strategy<Value = (Value, Value)> {
    (
        any::<[u8; 32]>(),
        any::<i64>(),
        any::<[u8; 20]>(),
        any::<bool>(),
        proptest::collection::vec(any::<u8>(), 0..80),
        "[a-zA-Z0-9 ]{0,40}",
        proptest::collection::vec(any::<u8>(), 0..6),
    )
        .prop_map(|(word, small, addr, flag, blob, text, list)| {
            let list = Value::Array(list.into_iter().map(|n| Value::from(n as u64)).collect());
            let inner = Value::Tuple(vec![Value::Bytes(blob.clone()), list.clone()]);
            let outer = Value::Tuple(vec![
                Value::Uint(U256::from_be_bytes(word)),
                Value::Int(I256::try_from(small).unwrap()),
                Value::Address(Address::from(addr)),
                Value::Bool(flag),
                Value::Bytes(blob),
                Value::String(text),
                list,
            ]);
            (outer, inner)
        })
}

proptest! {
    #[test]
    fn prop_mixed_tuple_roundtrip((outer, inner) in small_value()) {
        let codec = compile(&Param::tuple(
            "",
            "tuple",
            vec![
                Param::unnamed("uint256"),
                Param::unnamed("int64"),
                Param::unnamed("address"),
                Param::unnamed("bool"),
                Param::unnamed("bytes"),
                Param::unnamed("string"),
                Param::unnamed("uint8[]"),
            ],
        ))
        .unwrap();
        let encoded = codec.encode(&outer).unwrap();
        prop_assert_eq!(encoded.len() % 32, 0);
        prop_assert_eq!(codec.decode(&encoded).unwrap(), outer);

        let nested = compile(&Param::tuple(
            "",
            "tuple[2]",
            vec![Param::unnamed("bytes"), Param::unnamed("uint8[]")],
        ))
        .unwrap();
        let pair = Value::Array(vec![inner.clone(), inner]);
        let encoded = nested.encode(&pair).unwrap();
        prop_assert_eq!(nested.decode(&encoded).unwrap(), pair);
    }

    #[test]
    fn prop_garbage_never_panics(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let codec = compile(&Param::tuple(
            "",
            "tuple[]",
            vec![Param::unnamed("uint256"), Param::unnamed("string[]"), Param::unnamed("bytes")],
        ))
        .unwrap();
        let _ = codec.decode(&data);
    }
}
