//! Property tests over the value model and evaluator

use highscore::interp::ops::{Operator, evaluate};
use highscore::value::{Array, Chord, Duration, Interval, Note};
use highscore::{Value, ValueKind};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<f64>().prop_map(Value::Number),
        "[a-z ]{0,8}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Boolean),
        (0i64..128).prop_map(Value::Pitch),
        (1u64..16, 1u64..64)
            .prop_map(|(n, d)| Value::Duration(Duration::new(n, d).expect("non-zero"))),
        (0i64..128, 0i64..128).prop_map(|(a, b)| Value::Interval(Interval::new(a, b))),
        prop::collection::vec(0i64..128, 1..5).prop_map(|p| Value::Chord(Chord::new(p))),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        scalar(),
        prop::collection::vec(0i64..128, 0..6).prop_map(|pitches| {
            let items = pitches.into_iter().map(Value::Pitch).collect();
            Value::Array(Array::new(ValueKind::Pitch, items).expect("pitches only"))
        }),
        (prop::collection::vec(0i64..128, 1..4), 1u64..8).prop_map(|(p, d)| {
            Value::Note(Note::new(Chord::new(p), Duration::new(1, d).expect("non-zero")))
        }),
    ]
}

proptest! {
    #[test]
    fn equality_is_reflexive(v in value()) {
        prop_assert_eq!(
            evaluate(Operator::Eq, &v, &v).unwrap(),
            Value::Boolean(true)
        );
        prop_assert_eq!(
            evaluate(Operator::Ne, &v, &v).unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn equality_across_kinds_is_false(a in scalar(), b in scalar()) {
        prop_assume!(a.kind() != b.kind());
        prop_assert_eq!(
            evaluate(Operator::Eq, &a, &b).unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn array_to_array_is_identity(pitches in prop::collection::vec(0i64..128, 0..10)) {
        let items = pitches.into_iter().map(Value::Pitch).collect();
        let array = Value::Array(Array::new(ValueKind::Pitch, items).unwrap());
        let converted = array.to_array().unwrap().unwrap();
        prop_assert_eq!(converted.identity(), array.identity());
        prop_assert_eq!(converted.as_array().unwrap().stored_kind(), ValueKind::Pitch);
    }

    #[test]
    fn duration_to_number_is_quotient(n in 1u64..1000, d in 1u64..1000) {
        let duration = Value::Duration(Duration::new(n, d).unwrap());
        prop_assert_eq!(
            duration.to_number().unwrap(),
            Some(Value::Number(n as f64 / d as f64))
        );
    }

    #[test]
    fn transposing_up_then_down_restores(p in prop::collection::vec(0i64..128, 1..5), a in 0i64..128, b in 0i64..128) {
        let chord = Value::Chord(Chord::new(p));
        let interval = Value::Interval(Interval::new(a, b));
        let up = evaluate(Operator::Add, &chord, &interval).unwrap();
        let back = evaluate(Operator::Sub, &up, &interval).unwrap();
        prop_assert_eq!(back, chord);
    }

    #[test]
    fn addition_parses_like_evaluation(a in 0u32..10_000, b in 0u32..10_000) {
        let parsed = highscore::parse_expression(&format!("{a} + {b}")).unwrap();
        prop_assert_eq!(parsed, Value::Number(f64::from(a) + f64::from(b)));
    }

    #[test]
    fn output_of_number_array_joins(values in prop::collection::vec(0u16..1000, 1..6)) {
        let literal = values.iter().map(u16::to_string).collect::<Vec<_>>().join(", ");
        let log = highscore::run(&format!("output [{literal}]")).unwrap();
        let expected = values.iter().map(u16::to_string).collect::<Vec<_>>().join(",");
        prop_assert_eq!(log, vec![expected]);
    }
}
