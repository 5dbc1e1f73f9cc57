/// A macro that allows lazily parsing a value from the environment variable,
/// with a fallback default value if the variable is not set or parsing fails.
///
/// # Parameters
///
/// - `$key`: An expression representing the name of the environment variable.
/// - `$t`: The type of the value to be parsed.
/// - `$default`: The default value to fall back to if the environment variable is not set or
///   parsing fails.
///
/// # Return Value
///
/// A lazy static variable of type `std::sync::LazyLock`, which holds the parsed
/// value from the environment variable or the default value.
#[macro_export]
macro_rules! lazy_env_parse {
	// With no default specified
	($key:expr_2021, $t:ty) => {
		std::sync::LazyLock::new(|| {
			std::env::var($key).ok().and_then(|s| s.parse::<$t>().ok()).unwrap_or_default()
		})
	};
	// With a static expression for the default value
	($key:expr_2021, $t:ty, $default:expr_2021) => {
		std::sync::LazyLock::new(|| {
			std::env::var($key).ok().and_then(|s| s.parse::<$t>().ok()).unwrap_or($default)
		})
	};
}

/// Builds an [`Object`](crate::val::Object) from a list of key-value pairs.
///
/// Values are converted with `Into<Value>`.
#[macro_export]
macro_rules! object {
	($($k:expr_2021 => $v:expr_2021),* $(,)?) => {{
		#[allow(unused_mut)]
		let mut m = ::std::collections::BTreeMap::new();
		$( m.insert(::std::string::String::from($k), $crate::val::Value::from($v)); )*
		$crate::val::Object::from(m)
	}};
}

#[cfg(test)]
mod test {
	use crate::val::Value;

	#[test]
	fn object_macro_converts_values() {
		let obj = object! {
			"id" => 1,
			"name" => "A",
			"active" => true,
		};
		assert_eq!(obj.get("id"), Some(&Value::from(1)));
		assert_eq!(obj.get("name"), Some(&Value::from("A")));
		assert_eq!(obj.get("active"), Some(&Value::Bool(true)));
		assert_eq!(obj.len(), 3);
	}

	#[test]
	fn lazy_env_parse_falls_back_to_default() {
		let limit: std::sync::LazyLock<usize> =
			lazy_env_parse!("TABLEGQL_TEST_UNSET_VARIABLE_FOR_MACRO", usize, 7);
		assert_eq!(*limit, 7);
	}
}
