//! Collection decoder accepting both bare arrays and paginated envelopes.

// std
use std::marker::PhantomData;
// crates.io
use serde::{
	Deserializer,
	de::{Error as _, IgnoredAny, MapAccess, SeqAccess, Visitor},
};
// self
use crate::_prelude::*;

/// A decoded collection, regardless of whether the backend paginated it.
///
/// List endpoints answer either with `[...]` or with
/// `{"count": n, "next": url, "previous": url, "results": [...]}` depending on backend
/// configuration; both decode into the same value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing<T> {
	/// Items on this page (or the whole collection when unpaginated).
	pub items: Vec<T>,
	/// Total item count reported by a paginated envelope.
	pub count: Option<u64>,
	/// Next page URL, if any.
	pub next: Option<String>,
	/// Previous page URL, if any.
	pub previous: Option<String>,
}
impl<T> Listing<T> {
	/// Whether more pages are available.
	pub fn has_more(&self) -> bool {
		self.next.is_some()
	}

	/// Number of items on this page.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether this page is empty.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Iterates over the items on this page.
	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.items.iter()
	}

	/// Drops pagination metadata.
	pub fn into_vec(self) -> Vec<T> {
		self.items
	}
}
impl<T> Default for Listing<T> {
	fn default() -> Self {
		Self { items: Vec::new(), count: None, next: None, previous: None }
	}
}
impl<T> IntoIterator for Listing<T> {
	type IntoIter = std::vec::IntoIter<T>;
	type Item = T;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}
impl<'de, T> Deserialize<'de> for Listing<T>
where
	T: Deserialize<'de>,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_any(ListingVisitor(PhantomData))
	}
}

struct ListingVisitor<T>(PhantomData<T>);
impl<'de, T> Visitor<'de> for ListingVisitor<T>
where
	T: Deserialize<'de>,
{
	type Value = Listing<T>;

	fn expecting(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("an array or a paginated object with `results`")
	}

	fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
	where
		A: SeqAccess<'de>,
	{
		let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());

		while let Some(item) = seq.next_element()? {
			items.push(item);
		}

		Ok(Listing { items, ..Default::default() })
	}

	fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
	where
		A: MapAccess<'de>,
	{
		let mut listing = Listing::default();
		let mut results = None;

		while let Some(key) = map.next_key::<String>()? {
			match key.as_str() {
				"results" => results = Some(map.next_value()?),
				"count" => listing.count = map.next_value()?,
				"next" => listing.next = map.next_value()?,
				"previous" => listing.previous = map.next_value()?,
				_ => {
					map.next_value::<IgnoredAny>()?;
				},
			}
		}

		listing.items = results.ok_or_else(|| A::Error::missing_field("results"))?;

		Ok(listing)
	}
}
