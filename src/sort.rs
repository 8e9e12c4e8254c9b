use crate::registry::Node;
use crate::value::{HzNumber, HzValue};
use std::cmp::Ordering;

/// A field value as seen by [`sort_by`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Key<'a> {
    Str(&'a str),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl<'a> Key<'a> {
    pub fn from_value(value: &'a HzValue) -> Option<Self> {
        match value {
            HzValue::String(s) => Some(Key::Str(s)),
            HzValue::Number(n) => Some(Key::from_number(n)),
            HzValue::Bool(v) => Some(Key::Bool(*v)),
            _ => None,
        }
    }

    pub fn from_node<M>(node: &'a Node<M>) -> Option<Self> {
        match node {
            Node::String(s) => Some(Key::Str(s)),
            Node::Number(n) => Some(Key::from_number(n)),
            Node::Bool(v) => Some(Key::Bool(*v)),
            _ => None,
        }
    }

    fn from_number(n: &HzNumber) -> Self {
        match n.as_i64() {
            Some(v) => Key::Int(v),
            None => Key::Float(n.as_f64()),
        }
    }

    /// Native ordering of two keys of the same kind. Strings compare by code point,
    /// numbers numerically, `false < true`. Mixed kinds and NaN are incomparable.
    pub fn partial_cmp_native(&self, other: &Key<'_>) -> Option<Ordering> {
        match (self, other) {
            (Key::Str(a), Key::Str(b)) => Some(a.cmp(b)),
            (Key::Int(a), Key::Int(b)) => Some(a.cmp(b)),
            (Key::Int(a), Key::Float(b)) => cmp_int_float(*a, *b),
            (Key::Float(a), Key::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            (Key::Float(a), Key::Float(b)) => a.partial_cmp(b),
            (Key::Bool(a), Key::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Exact comparison of an integer with a float. Casting the integer to `f64` would
/// round above 2^53 and let distinct integers tie with the same float.
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    // 2^63: every float at or beyond these bounds is outside i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return None;
    }
    if f >= LIMIT {
        return Some(Ordering::Less);
    }
    if f < -LIMIT {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    // In range, so the truncated value converts to i64 without loss.
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(f - whole)),
        ord => Some(ord),
    }
}

/// Records that expose named fields to [`sort_by`].
pub trait SortKey {
    fn sort_key(&self, field: &str) -> Option<Key<'_>>;
}

impl<T: SortKey + ?Sized> SortKey for &T {
    fn sort_key(&self, field: &str) -> Option<Key<'_>> {
        (**self).sort_key(field)
    }
}

impl SortKey for HzValue {
    fn sort_key(&self, field: &str) -> Option<Key<'_>> {
        self.get(field).and_then(Key::from_value)
    }
}

impl<M: SortKey> SortKey for Node<M> {
    fn sort_key(&self, field: &str) -> Option<Key<'_>> {
        match self {
            Node::Typed(m) => m.sort_key(field),
            _ => self.get(field).and_then(Key::from_node),
        }
    }
}

/// Build an ascending comparator over `fields`, compared in order. The first field that
/// differs decides; a missing or incomparable field counts as equal and falls through to
/// the next one.
pub fn sort_by<R, I, S>(fields: I) -> impl Fn(&R, &R) -> Ordering
where
    R: SortKey + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    move |a: &R, b: &R| {
        for field in &fields {
            let ord = match (a.sort_key(field), b.sort_key(field)) {
                (Some(ka), Some(kb)) => ka.partial_cmp_native(&kb).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Sort `records` in place, ascending by `fields` as [`sort_by`] compares them.
///
/// Stable insertion sort. A record missing a field ties with every other record on
/// that field, so the comparator is not a total order; `slice::sort_by` may panic on
/// such input, this never does. Lists here are things and actions of one home.
pub fn sort_records<R, I, S>(records: &mut [R], fields: I)
where
    R: SortKey,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let cmp = sort_by::<R, _, _>(fields);
    for i in 1..records.len() {
        let mut j = i;
        while j > 0 && cmp(&records[j - 1], &records[j]) == Ordering::Greater {
            records.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Key, sort_by, sort_records};
    use crate::value::HzValue;
    use std::cmp::Ordering;

    fn records(text: &str) -> Vec<HzValue> {
        HzValue::parse(text).unwrap().as_array().unwrap().to_vec()
    }

    fn names(records: &[HzValue]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.get("name").and_then(HzValue::as_str).unwrap_or_default())
            .collect()
    }

    #[test]
    fn first_differing_field_decides() {
        let mut rs = records(
            r#"[{"zone":"b","name":"x"},{"zone":"a","name":"y"},{"zone":"a","name":"x"}]"#,
        );
        sort_records(&mut rs, ["zone", "name"]);
        let pairs: Vec<(&str, &str)> = rs
            .iter()
            .map(|r| {
                (
                    r.get("zone").and_then(HzValue::as_str).unwrap(),
                    r.get("name").and_then(HzValue::as_str).unwrap(),
                )
            })
            .collect();
        assert_eq!(pairs, [("a", "x"), ("a", "y"), ("b", "x")]);
    }

    #[test]
    fn missing_field_compares_equal_and_keeps_input_order() {
        let mut rs = records(r#"[{"name":"c"},{"id":1},{"name":"a"}]"#);
        let cmp = sort_by::<HzValue, _, _>(["name"]);
        assert_eq!(cmp(&rs[0], &rs[1]), Ordering::Equal);
        sort_records(&mut rs, ["name"]);
        // The record without a name ties with both neighbours, so nothing moves.
        assert_eq!(names(&rs), ["c", "", "a"]);
    }

    #[test]
    fn numbers_sort_numerically() {
        let mut rs = records(r#"[{"name":"b","id":10},{"name":"a","id":9},{"name":"c","id":9.5}]"#);
        sort_records(&mut rs, ["id"]);
        assert_eq!(names(&rs), ["a", "c", "b"]);
    }

    #[test]
    fn mixed_kinds_are_incomparable() {
        assert_eq!(Key::Str("1").partial_cmp_native(&Key::Int(1)), None);
        assert_eq!(Key::Float(f64::NAN).partial_cmp_native(&Key::Float(1.0)), None);
        assert_eq!(
            Key::Bool(false).partial_cmp_native(&Key::Bool(true)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn ints_and_floats_compare_exactly() {
        let big = 1_i64 << 53;
        // `big + 1` is not representable as f64 and would round down onto `big`.
        assert_eq!(
            Key::Int(big + 1).partial_cmp_native(&Key::Float(big as f64)),
            Some(Ordering::Greater)
        );
        assert_eq!(Key::Int(2).partial_cmp_native(&Key::Float(2.5)), Some(Ordering::Less));
        assert_eq!(Key::Float(-2.5).partial_cmp_native(&Key::Int(-2)), Some(Ordering::Less));
        assert_eq!(Key::Int(3).partial_cmp_native(&Key::Float(3.0)), Some(Ordering::Equal));
        assert_eq!(
            Key::Int(i64::MAX).partial_cmp_native(&Key::Float(f64::INFINITY)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Key::Int(i64::MIN).partial_cmp_native(&Key::Float(-9.3e18)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn no_fields_means_everything_ties() {
        let rs = records(r#"[{"name":"b"},{"name":"a"}]"#);
        let cmp = sort_by::<HzValue, _, &str>([]);
        assert_eq!(cmp(&rs[0], &rs[1]), Ordering::Equal);
    }
}
