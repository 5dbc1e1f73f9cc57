use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::val::Value;

/// A row, or a nested object value, keyed by field name
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object(pub BTreeMap<String, Value>);

impl Deref for Object {
	type Target = BTreeMap<String, Value>;
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Object {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl From<BTreeMap<String, Value>> for Object {
	fn from(v: BTreeMap<String, Value>) -> Self {
		Self(v)
	}
}

impl FromIterator<(String, Value)> for Object {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self(BTreeMap::from_iter(iter))
	}
}

impl IntoIterator for Object {
	type Item = (String, Value);
	type IntoIter = std::collections::btree_map::IntoIter<String, Value>;
	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl Object {
	/// Keeps only the fields named in the given column set
	pub fn project<'a>(&self, columns: impl IntoIterator<Item = &'a String>) -> Object {
		columns
			.into_iter()
			.filter_map(|c| self.0.get(c).map(|v| (c.clone(), v.clone())))
			.collect()
	}

	pub fn into_json(self) -> serde_json::Value {
		serde_json::Value::Object(self.0.into_iter().map(|(k, v)| (k, v.into_json())).collect())
	}
}

impl fmt::Display for Object {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("{ ")?;
		for (i, (k, v)) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{k}: {v}")?;
		}
		f.write_str(" }")
	}
}
