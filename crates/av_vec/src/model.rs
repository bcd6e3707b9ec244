//! Random operation sequences checked against `alloc::vec::Vec`.

use alloc::vec::Vec;

use proptest::collection::vec;
use proptest::prelude::*;

use crate::Vector;

#[derive(Debug, Clone)]
enum Op {
    PushBack(i32),
    PopBack,
    Insert(usize, i32),
    Erase(usize),
    Resize(usize),
    Reserve(usize),
    Assign(Vec<i32>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::PushBack),
        1 => Just(Op::PopBack),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(at, x)| Op::Insert(at, x)),
        2 => any::<usize>().prop_map(Op::Erase),
        1 => (0usize..48).prop_map(Op::Resize),
        1 => (0usize..48).prop_map(Op::Reserve),
        1 => vec(any::<i32>(), 0..16).prop_map(Op::Assign),
    ]
}

proptest! {
    #[test]
    fn behaves_like_vec(ops in vec(op(), 0..96)) {
        let mut model: Vec<i32> = Vec::new();
        let mut v = Vector::new();

        for op in ops {
            match op {
                Op::PushBack(x) => {
                    let full = v.len() == v.capacity();
                    let expected = if v.is_empty() { 1 } else { v.len() * 2 };
                    model.push(x);
                    v.push_back(x);
                    if full {
                        prop_assert_eq!(v.capacity(), expected);
                    }
                }
                Op::PopBack => {
                    prop_assert_eq!(v.pop(), model.pop());
                }
                Op::Insert(at, x) => {
                    let at = at % (model.len() + 1);
                    model.insert(at, x);
                    prop_assert_eq!(v.insert(at, x), at);
                }
                Op::Erase(at) => {
                    if !model.is_empty() {
                        let at = at % model.len();
                        model.remove(at);
                        prop_assert_eq!(v.erase(at), at);
                    }
                }
                Op::Resize(n) => {
                    let before = v.capacity();
                    model.resize(n, 0);
                    v.resize(n);
                    prop_assert_eq!(v.capacity(), before.max(n));
                }
                Op::Reserve(n) => {
                    let before = v.capacity();
                    v.reserve(n);
                    prop_assert_eq!(v.capacity(), before.max(n));
                }
                Op::Assign(source) => {
                    model.clone_from(&source);
                    v.assign_cloned(&source);
                }
            }

            prop_assert!(v.len() <= v.capacity());
            prop_assert_eq!(v.as_slice(), model.as_slice());
        }
    }
}
