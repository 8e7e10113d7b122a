use std::fmt::{self, Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::keys::Keys;
use crate::phoneme::Stenophoneme;

/// A single phonetic atom from a lexicon transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keysymbol {
	pub symbol: Box<str>,
	pub match_symbol: Box<str>,
	pub stress: u8,
	pub optional: bool,
}

impl Keysymbol {
	pub fn new(symbol: &str, stress: u8, optional: bool) -> Self {
		Self {
			symbol: symbol.into(),
			match_symbol: Self::match_symbol(symbol).into(),
			stress,
			optional,
		}
	}

	/// The form a keysymbol is matched under: lowercased, with brackets and
	/// variant digits stripped.
	pub fn match_symbol(symbol: &str) -> String {
		static NORMALIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[\]0-9]").unwrap());
		NORMALIZE
			.replace_all(&symbol.to_lowercase(), "")
			.into_owned()
	}
}

impl Display for Keysymbol {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		formatter.write_str(&self.symbol)
	}
}

impl Serialize for Keysymbol {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut out = serializer.serialize_struct("Keysymbol", 3)?;
		out.serialize_field("symbol", &self.symbol)?;
		out.serialize_field("stress", &self.stress)?;
		out.serialize_field("optional", &self.optional)?;
		out.end()
	}
}

impl<'de> Deserialize<'de> for Keysymbol {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		struct Raw {
			symbol: Box<str>,
			stress: u8,
			optional: bool,
		}

		let raw = Raw::deserialize(deserializer)?;
		Ok(Self::new(&raw.symbol, raw.stress, raw.optional))
	}
}

/// A span of orthography paired with the keysymbols it realizes. Either side
/// may be empty: silent letters carry no keysymbols, swallowed sounds no
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orthokeysymbol {
	pub keysymbols: Vec<Keysymbol>,
	pub chars: Box<str>,
}

impl Display for Orthokeysymbol {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		write!(formatter, "{}.", self.chars)?;

		if self.keysymbols.len() > 1 {
			formatter.write_str("(")?;
		}
		let mut first = true;
		for keysymbol in &self.keysymbols {
			if !first {
				formatter.write_str(" ")?;
			}
			first = false;
			keysymbol.fmt(formatter)?;
		}
		if self.keysymbols.len() > 1 {
			formatter.write_str(")")?;
		}

		Ok(())
	}
}

/// An orthokeysymbol run plus the chords and phoneme that realize it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sopheme {
	pub orthokeysymbols: Vec<Orthokeysymbol>,
	pub steno: Vec<Keys>,
	pub phoneme: Option<Stenophoneme>,
}

impl Sopheme {
	/// Concatenating the orthography of a sopheme sequence yields the word it
	/// spells.
	pub fn translation(sophemes: &[Self]) -> String {
		sophemes
			.iter()
			.flat_map(|sopheme| &sopheme.orthokeysymbols)
			.map(|orthokeysymbol| &*orthokeysymbol.chars)
			.collect()
	}

	fn steno_string(&self) -> String {
		let mut out = String::new();
		for (index, stroke) in self.steno.iter().enumerate() {
			if index > 0 {
				out.push('/');
			}
			out.push_str(&stroke.to_string());
		}
		out
	}
}

impl Display for Sopheme {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		let parenthesize =
			self.orthokeysymbols.len() > 1 && (self.phoneme.is_some() || !self.steno.is_empty());

		if parenthesize {
			formatter.write_str("(")?;
		}
		let mut first = true;
		for orthokeysymbol in &self.orthokeysymbols {
			if !first {
				formatter.write_str(" ")?;
			}
			first = false;
			orthokeysymbol.fmt(formatter)?;
		}
		if parenthesize {
			formatter.write_str(")")?;
		}

		if let Some(phoneme) = self.phoneme {
			write!(formatter, "[{phoneme}]")?;
		} else if !self.steno.is_empty() {
			write!(formatter, "[[{}]]", self.steno_string())?;
		}

		Ok(())
	}
}

impl Serialize for Sopheme {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut out = serializer.serialize_struct("Sopheme", 3)?;
		out.serialize_field("orthokeysymbols", &self.orthokeysymbols)?;
		out.serialize_field("steno", &self.steno_string())?;
		out.serialize_field("phono", &self.phoneme.map(Stenophoneme::as_str))?;
		out.end()
	}
}

impl<'de> Deserialize<'de> for Sopheme {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		struct Raw {
			orthokeysymbols: Vec<Orthokeysymbol>,
			steno: Box<str>,
			phono: Option<Box<str>>,
		}

		let raw = Raw::deserialize(deserializer)?;

		let steno = if raw.steno.is_empty() {
			Vec::new()
		} else {
			raw
				.steno
				.split('/')
				.map(|stroke| stroke.parse::<Keys>().map_err(D::Error::custom))
				.collect::<Result<_, _>>()?
		};

		let phoneme = raw
			.phono
			.map(|name| name.parse::<Stenophoneme>().map_err(D::Error::custom))
			.transpose()?;

		Ok(Self {
			orthokeysymbols: raw.orthokeysymbols,
			steno,
			phoneme,
		})
	}
}

/// A phoneme as the entry builder sees it, with the sopheme it came from when
/// one exists (glide consonants and raw-outline sounds have none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
	pub phoneme: Stenophoneme,
	pub sopheme: Option<Sopheme>,
}

impl Sound {
	pub fn new(phoneme: Stenophoneme) -> Self {
		Self {
			phoneme,
			sopheme: None,
		}
	}

	pub fn from_sopheme(phoneme: Stenophoneme, sopheme: &Sopheme) -> Self {
		Self {
			phoneme,
			sopheme: Some(sopheme.clone()),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn match_symbol_normalization() {
		assert_eq!(Keysymbol::match_symbol("[ii]"), "ii");
		assert_eq!(Keysymbol::match_symbol("E5"), "e");
		assert_eq!(Keysymbol::match_symbol("@r"), "@r");
	}

	#[test]
	fn display_forms() {
		let sopheme = Sopheme {
			orthokeysymbols: vec![Orthokeysymbol {
				keysymbols: vec![Keysymbol::new("ae", 1, false)],
				chars: "y".into(),
			}],
			steno: vec!["AOEU".parse().unwrap()],
			phoneme: Some(Stenophoneme::II),
		};
		assert_eq!(sopheme.to_string(), "y.ae[II]");

		let linker = Sopheme {
			orthokeysymbols: Vec::new(),
			steno: vec!["KWR".parse().unwrap()],
			phoneme: None,
		};
		assert_eq!(linker.to_string(), "[[KWR]]");

		let silent = Sopheme {
			orthokeysymbols: vec![Orthokeysymbol {
				keysymbols: Vec::new(),
				chars: "e".into(),
			}],
			steno: Vec::new(),
			phoneme: None,
		};
		assert_eq!(silent.to_string(), "e.");
	}

	#[test]
	fn hatchery_round_trip() {
		let sopheme = Sopheme {
			orthokeysymbols: vec![Orthokeysymbol {
				keysymbols: vec![Keysymbol::new("sh", 0, false)],
				chars: "ti".into(),
			}],
			steno: vec!["-GS".parse().unwrap()],
			phoneme: None,
		};

		let json = serde_json::to_string(&sopheme).unwrap();
		let back: Sopheme = serde_json::from_str(&json).unwrap();
		assert_eq!(back, sopheme);

		let raw = r#"{"orthokeysymbols": [{"chars": "a", "keysymbols": [{"symbol": "a", "stress": 2, "optional": false}]}], "steno": "", "phono": "A"}"#;
		let parsed: Sopheme = serde_json::from_str(raw).unwrap();
		assert_eq!(parsed.phoneme, Some(Stenophoneme::A));
		assert_eq!(parsed.orthokeysymbols[0].keysymbols[0].stress, 2);
		assert!(parsed.steno.is_empty());
	}
}
