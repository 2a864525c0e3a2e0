//! Property tests for the combination laws and determinism.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;

use super::{context, values};
use crate::transform;

fn list_source(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn small_list() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..1000, 2..6)
}

proptest! {
    #[test]
    fn concat_length_is_sum(parts in prop::collection::vec(small_list(), 1..5)) {
        let mut source = String::new();
        for (i, part) in parts.iter().enumerate() {
            source.push_str(&format!("p{i} = {};", list_source(part)));
        }
        let names: Vec<String> = (0..parts.len()).map(|i| format!("p{i}")).collect();
        source.push_str(&format!("c = ({})+;", names.join(", ")));

        let m = transform(&context(&source, 0)).unwrap();
        let expected: Vec<u32> = parts.concat();
        prop_assert_eq!(values(&m, "c"), expected.as_slice());
    }

    #[test]
    fn product_rows_are_product_of_rows(
        a in small_list(),
        b in small_list(),
        c in small_list(),
    ) {
        let source = format!(
            "a = {}; b = {}; c = {}; p = (a, b, c)*;",
            list_source(&a),
            list_source(&b),
            list_source(&c)
        );
        let m = transform(&context(&source, 0)).unwrap();
        let p = m.sequence(m.find("p").unwrap()).unwrap();
        prop_assert_eq!(p.rows(), a.len() * b.len() * c.len());
        prop_assert_eq!(p.arity(), 3);

        // Last operand varies fastest.
        let first_rows: Vec<Vec<u32>> = p.iter_rows().take(c.len()).map(<[u32]>::to_vec).collect();
        let expected: Vec<Vec<u32>> = c.iter().map(|&z| vec![a[0], b[0], z]).collect();
        prop_assert_eq!(first_rows, expected);
    }

    #[test]
    fn transform_is_deterministic(seed in any::<u32>(), n in 1u32..200) {
        let source = format!("s = Shuffle(0:{n}); t = Sample((s, 1:3)+, 17);");
        let ctx = context(&source, seed);
        let first = transform(&ctx).unwrap();
        let second = transform(&ctx).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn shuffle_preserves_multiset(seed in any::<u32>(), list in small_list()) {
        let source = format!("s = Shuffle({});", list_source(&list));
        let m = transform(&context(&source, seed)).unwrap();
        let mut got = values(&m, "s").to_vec();
        let mut expected = list;
        got.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn weighted_pass_repeats_each_entry_by_weight(
        entries in prop::collection::vec((1u32..5, small_list()), 1..4),
        seed in any::<u32>(),
    ) {
        let mut source = String::new();
        let mut body = Vec::new();
        for (i, (weight, part)) in entries.iter().enumerate() {
            source.push_str(&format!("e{i} = {};", list_source(part)));
            body.push(format!("{weight}: e{i}"));
        }
        source.push_str(&format!("w = {{{}}};", body.join(", ")));

        let m = transform(&context(&source, seed)).unwrap();
        let mut got = values(&m, "w").to_vec();
        let mut expected: Vec<u32> = entries
            .iter()
            .flat_map(|(weight, part)| part.repeat(*weight as usize))
            .collect();
        got.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(got, expected);
    }
}
