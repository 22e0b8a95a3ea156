use super::*;

impl<T> From<()> for Value<T> {
    fn from(_: ()) -> Self {
        Self::None
    }
}

impl<T> From<bool> for Value<T> {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T> From<i64> for Value<T> {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl<T> From<f64> for Value<T> {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl<T> From<String> for Value<T> {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<'a, T> From<&'a str> for Value<T> {
    fn from(s: &'a str) -> Self {
        Self::String(String::from(s))
    }
}

impl<T, V> From<Vec<V>> for Value<T>
where
    V: Into<Value<T>>,
{
    fn from(list: Vec<V>) -> Self {
        Self::List(list.into_iter().map(Into::into).collect())
    }
}

impl<T, V, const N: usize> From<[V; N]> for Value<T>
where
    V: Into<Value<T>>,
{
    fn from(list: [V; N]) -> Self {
        Self::List(list.into_iter().map(Into::into).collect())
    }
}
