/// Asserts that no two elements of a slice are equal.
#[macro_export]
macro_rules! assert_unique {
    ($e:expr) => {{
        let items = &$e[..];
        for (i, lhs) in items.iter().enumerate() {
            for rhs in &items[i + 1..] {
                assert_ne!(lhs, rhs, "expected unique elements; actual={:?}", items);
            }
        }
    }};
}

#[macro_export]
macro_rules! assert_empty {
    ($e:expr) => {{
        let items = &$e[..];
        assert!(items.is_empty(), "expected empty; actual={:?}", items);
    }};
}
