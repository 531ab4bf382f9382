/// Builds a [`Value`](crate::Value) from JSON-like literal syntax.
///
/// Arrays become lists and objects become maps. Any other expression goes
/// through [`to_value`](crate::to_value), falling back to `Null` if it cannot
/// be converted.
///
/// # Examples
///
/// ```rust
/// use context_help::value;
///
/// let user = value!({"name": "Alice", "tags": ["a", "b"]});
/// assert_eq!(user.len(), Some(2));
/// ```
#[macro_export]
macro_rules! value {
    // Handle null
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::list(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::list(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::from($crate::ValueMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ValueMap::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::from(object)
    }};

    // Fallback for any other expression
    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}

/// Builds a [`Context`](crate::Context) from `"label": value` pairs.
///
/// # Examples
///
/// ```rust
/// use context_help::context;
///
/// let context = context!({"name": "Alice", "tags": ["a", "b", "c"]});
/// assert_eq!(context.len(), 2);
/// assert!(context!({}).is_empty());
/// ```
#[macro_export]
macro_rules! context {
    ({}) => {
        $crate::Context::new()
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut context = $crate::Context::new();
        $(
            context.insert($key, $crate::value!($value));
        )*
        context
    }};
}
