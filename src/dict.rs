use std::fmt;
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::build::{add_entry, OutlineSounds};
use crate::keys::{Keys, Strokes};
use crate::lookup::{lookup, reverse_lookup, LookupError};
use crate::sopheme::Sopheme;
use crate::theory::{amphitheory, TheoryService};
use crate::trie::{NondeterministicTrie, ReverseIndex};

#[derive(Debug, Error)]
pub enum LexiconError {
	#[error("reading lexicon")]
	Io(#[from] std::io::Error),
	#[error("malformed lexicon")]
	Malformed(#[from] serde_json::Error),
}

/// A compiled writeout dictionary: the nondeterministic trie over every
/// admitted outline variant, queried one outline at a time.
#[derive(Debug)]
pub struct Dict {
	theory: &'static TheoryService,
	pub(crate) trie: NondeterministicTrie,
	reverse: OnceCell<ReverseIndex>,
}

impl Dict {
	/// The longest outline the host should buffer, in strokes.
	pub const LONGEST_KEY: usize = 12;

	fn new() -> Self {
		Self {
			theory: amphitheory(),
			trie: NondeterministicTrie::new(),
			reverse: OnceCell::new(),
		}
	}

	/// Loads a flat `outline -> translation` JSON dictionary, compiling each
	/// entry from its outline alone.
	pub fn load_flat(path: &Path) -> Result<Self, LexiconError> {
		Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
	}

	/// Loads a compiled hatchery dictionary: a JSON array of sopheme arrays.
	pub fn load_hatchery(path: &Path) -> Result<Self, LexiconError> {
		let entries: Vec<Vec<Sopheme>> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
		Ok(Self::from_sopheme_entries(entries))
	}

	pub fn from_flat_entries<'a>(
		entries: impl IntoIterator<Item = (&'a str, &'a str)>,
	) -> Result<Self, crate::keys::ParseError> {
		let mut dict = Self::new();
		for (outline, translation) in entries {
			let strokes: Strokes = outline.parse()?;
			dict.add_outline(&strokes.0, translation);
		}
		Ok(dict)
	}

	pub fn from_sopheme_entries(entries: impl IntoIterator<Item = Vec<Sopheme>>) -> Self {
		let mut dict = Self::new();
		for sophemes in entries {
			let sounds = OutlineSounds::from_sophemes(dict.theory, &sophemes);
			let translation = Sopheme::translation(&sophemes);
			add_entry(&mut dict.trie, dict.theory, &sounds, &translation);
		}
		dict
	}

	fn add_outline(&mut self, outline: &[Keys], translation: &str) {
		// Unbuildable entries (briefs and other asterisked outlines) are
		// skipped so one does not abort the batch.
		let Ok(sounds) = OutlineSounds::from_outline(self.theory, outline) else {
			return;
		};
		add_entry(&mut self.trie, self.theory, &sounds, translation);
	}

	pub fn lookup(&self, outline: &[Keys]) -> Result<&str, LookupError> {
		lookup(&self.trie, self.theory, outline)
	}

	/// Looks up an outline given as per-stroke steno strings, the host's
	/// native shape.
	pub fn lookup_steno(&self, outline: &[&str]) -> Result<&str, LookupError> {
		let strokes = outline
			.iter()
			.map(|steno| {
				steno
					.parse::<Keys>()
					.map_err(|_| LookupError::InvalidSteno)
			})
			.collect::<Result<Vec<_>, _>>()?;
		self.lookup(&strokes)
	}

	pub fn get<'d>(&'d self, outline: &[Keys], fallback: &'d str) -> &'d str {
		self.lookup(outline).unwrap_or(fallback)
	}

	pub fn reverse_lookup(&self, translation: &str) -> Vec<Strokes> {
		let index = self.reverse.get_or_init(|| self.trie.reverse_index());
		reverse_lookup(&self.trie, index, self.theory, translation)
	}
}

impl<'de> Deserialize<'de> for Dict {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct MapVisitor {}

		impl<'de> Visitor<'de> for MapVisitor {
			type Value = Dict;

			fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
				formatter.write_str("a steno-to-translation map")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
				let mut dict = Dict::new();

				while let Some((outline, translation)) = access.next_entry::<Strokes, String>()? {
					dict.add_outline(&outline.0, &translation);
				}

				Ok(dict)
			}
		}

		let visitor = MapVisitor {};
		deserializer.deserialize_map(visitor)
	}
}
