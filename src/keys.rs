use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use bitflags::bitflags;
use serde_with::DeserializeFromStr;
use thiserror::Error;

/// A single steno key, in steno order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
	NumberBar,
	At,
	S,
	T,
	K,
	P,
	W,
	H,
	R,
	A,
	O,
	Star,
	E,
	U,
	F,
	R2,
	P2,
	B,
	L,
	G,
	T2,
	S2,
	D,
	Z,
}

impl Key {
	pub const ALL: [Self; 24] = [
		Self::NumberBar,
		Self::At,
		Self::S,
		Self::T,
		Self::K,
		Self::P,
		Self::W,
		Self::H,
		Self::R,
		Self::A,
		Self::O,
		Self::Star,
		Self::E,
		Self::U,
		Self::F,
		Self::R2,
		Self::P2,
		Self::B,
		Self::L,
		Self::G,
		Self::T2,
		Self::S2,
		Self::D,
		Self::Z,
	];

	pub fn mask(self) -> Keys {
		Keys::from_bits_truncate(1 << self as u32)
	}

	/// The canonical name of the key, with right-bank keys spelled with a
	/// leading dash to distinguish them from their left-bank twins.
	pub fn name(self) -> &'static str {
		match self {
			Self::NumberBar => "#",
			Self::At => "@",
			Self::S => "S",
			Self::T => "T",
			Self::K => "K",
			Self::P => "P",
			Self::W => "W",
			Self::H => "H",
			Self::R => "R",
			Self::A => "A",
			Self::O => "O",
			Self::Star => "*",
			Self::E => "E",
			Self::U => "U",
			Self::F => "-F",
			Self::R2 => "-R",
			Self::P2 => "-P",
			Self::B => "-B",
			Self::L => "-L",
			Self::G => "-G",
			Self::T2 => "-T",
			Self::S2 => "-S",
			Self::D => "-D",
			Self::Z => "-Z",
		}
	}

	pub fn letter(self) -> char {
		match self {
			Self::NumberBar => '#',
			Self::At => '@',
			Self::S | Self::S2 => 'S',
			Self::T | Self::T2 => 'T',
			Self::K => 'K',
			Self::P | Self::P2 => 'P',
			Self::W => 'W',
			Self::H => 'H',
			Self::R | Self::R2 => 'R',
			Self::A => 'A',
			Self::O => 'O',
			Self::Star => '*',
			Self::E => 'E',
			Self::U => 'U',
			Self::F => 'F',
			Self::B => 'B',
			Self::L => 'L',
			Self::G => 'G',
			Self::D => 'D',
			Self::Z => 'Z',
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|key| key.name() == name)
	}
}

bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct Keys: u32 {
		const NUMBER_BAR = 1 << 0;
		const AT = 1 << 1;
		const S = 1 << 2;
		const T = 1 << 3;
		const K = 1 << 4;
		const P = 1 << 5;
		const W = 1 << 6;
		const H = 1 << 7;
		const R = 1 << 8;
		const A = 1 << 9;
		const O = 1 << 10;
		const STAR = 1 << 11;
		const E = 1 << 12;
		const U = 1 << 13;
		const F = 1 << 14;
		const R2 = 1 << 15;
		const P2 = 1 << 16;
		const B = 1 << 17;
		const L = 1 << 18;
		const G = 1 << 19;
		const T2 = 1 << 20;
		const S2 = 1 << 21;
		const D = 1 << 22;
		const Z = 1 << 23;
	}
}

impl Keys {
	/// Every key from the middle of the board; their presence makes the
	/// left/right split of a textual stroke unambiguous.
	const MID: Self = Self::A
		.union(Self::O)
		.union(Self::STAR)
		.union(Self::E)
		.union(Self::U);
	const RIGHT: Self = Self::F
		.union(Self::R2)
		.union(Self::P2)
		.union(Self::B)
		.union(Self::L)
		.union(Self::G)
		.union(Self::T2)
		.union(Self::S2)
		.union(Self::D)
		.union(Self::Z);

	pub fn keys(self) -> impl Iterator<Item = Key> {
		Key::ALL
			.into_iter()
			.filter(move |key| self.contains(key.mask()))
	}

	pub fn key_names(self) -> impl Iterator<Item = &'static str> {
		self.keys().map(Key::name)
	}

	pub fn len(self) -> u32 {
		self.bits().count_ones()
	}

	pub fn first_key(self) -> Option<Key> {
		self.keys().next()
	}

	pub fn last_key(self) -> Option<Key> {
		self.keys().last()
	}

	/// Whether `addon` can extend `self` within a single stroke: ignoring the
	/// asterisk, every key of `addon` must come strictly after every key of
	/// `self` in steno order.
	pub fn can_append(self, addon: Self) -> bool {
		let src = self & !Self::STAR;
		let addon = addon & !Self::STAR;

		if src.is_empty() || addon.is_empty() {
			return true;
		}

		let last_src = u32::BITS - 1 - src.bits().leading_zeros();
		let first_addon = addon.bits().trailing_zeros();
		last_src < first_addon
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
	#[error("trailing dash")]
	TrailingDash,
	#[error("duplicate key(s) {0:?}")]
	Duplicate(Keys),
	#[error("unrecognized character {0:?}")]
	Unrecognized(char),
}

impl FromStr for Keys {
	type Err = ParseError;

	fn from_str(part: &str) -> Result<Self, ParseError> {
		let mut ret = Self::empty();

		let mut prev_dash = false;

		macro_rules! do_double {
			($first:ident, $second:ident) => {
				if prev_dash || ret.bits() >= Self::$first.bits() {
					Self::$second
				} else {
					Self::$first
				}
			};
		}

		for ch in part.chars() {
			let new = match ch {
				'#' => Self::NUMBER_BAR,
				'@' => Self::AT,
				'S' => do_double!(S, S2),
				'T' => do_double!(T, T2),
				'K' => Self::K,
				'P' => do_double!(P, P2),
				'W' => Self::W,
				'H' => Self::H,
				'R' => do_double!(R, R2),
				'A' => Self::A,
				'O' => Self::O,
				'*' => Self::STAR,
				'E' => Self::E,
				'U' => Self::U,
				'F' => Self::F,
				'B' => Self::B,
				'L' => Self::L,
				'G' => Self::G,
				'D' => Self::D,
				'Z' => Self::Z,
				'-' => {
					prev_dash = true;
					continue;
				}
				other => return Err(ParseError::Unrecognized(other)),
			};

			let overlap = ret & new;
			if !overlap.is_empty() {
				return Err(ParseError::Duplicate(overlap));
			}

			// Note: `prev_dash` is intentionally ignored for characters without two keys.
			prev_dash = false;
			ret |= new;
		}

		if prev_dash {
			return Err(ParseError::TrailingDash);
		}

		Ok(ret)
	}
}

impl Display for Keys {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		let needs_dash = self.intersects(Self::RIGHT) && !self.intersects(Self::MID);
		let mut dash_emitted = false;

		for key in self.keys() {
			if needs_dash && !dash_emitted && Self::RIGHT.contains(key.mask()) {
				formatter.write_str("-")?;
				dash_emitted = true;
			}
			write!(formatter, "{}", key.letter())?;
		}

		Ok(())
	}
}

/// An outline: one or more strokes, written with `/` separators.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, DeserializeFromStr)]
pub struct Strokes(pub Vec<Keys>);

impl Strokes {
	pub fn num_strokes(&self) -> usize {
		self.0.len()
	}
}

impl From<Vec<Keys>> for Strokes {
	fn from(keys: Vec<Keys>) -> Self {
		Self(keys)
	}
}

impl Borrow<[Keys]> for Strokes {
	fn borrow(&self) -> &[Keys] {
		&self.0
	}
}

impl FromStr for Strokes {
	type Err = ParseError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		let parts = raw.split('/');
		parts
			.map(Keys::from_str)
			.collect::<Result<Vec<_>, _>>()
			.map(Self)
	}
}

impl Display for Strokes {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		let [first, rest @ ..] = self.0.as_slice() else {
			return Ok(());
		};
		first.fmt(formatter)?;
		for keys in rest {
			formatter.write_str("/")?;
			keys.fmt(formatter)?;
		}
		Ok(())
	}
}

#[test]
fn test_parse() {
	assert_eq!("S".parse::<Keys>().unwrap(), Keys::S);
	assert_eq!("-S".parse::<Keys>().unwrap(), Keys::S2);
	assert_eq!("SS".parse::<Keys>().unwrap(), Keys::S | Keys::S2);
	assert_eq!("S-S".parse::<Keys>().unwrap(), Keys::S | Keys::S2);
	// Respect steno order. This should not be `B | T`.
	assert_eq!("BT".parse::<Keys>().unwrap(), Keys::B | Keys::T2);
	assert_eq!(
		"AOEU".parse::<Keys>().unwrap(),
		Keys::A | Keys::O | Keys::E | Keys::U
	);
	assert_eq!(
		"@STKPW".parse::<Keys>().unwrap(),
		Keys::AT | Keys::S | Keys::T | Keys::K | Keys::P | Keys::W
	);
	assert_eq!(
		"KPA*BT".parse::<Keys>().unwrap(),
		Keys::K | Keys::P | Keys::A | Keys::STAR | Keys::B | Keys::T2
	);
	assert!("-".parse::<Keys>().is_err());
	assert!("SX".parse::<Keys>().is_err());
}

#[test]
fn test_display() {
	for steno in ["STKPW", "AOEU", "S-S", "O*ET", "-FL", "@TKPWOE", "SWH"] {
		assert_eq!(steno.parse::<Keys>().unwrap().to_string(), steno);
	}
	assert_eq!(
		"STKPWAOEU/TKPWOET".parse::<Strokes>().unwrap().to_string(),
		"STKPWAOEU/TKPWOET"
	);
}

#[test]
fn test_can_append() {
	let keys = |steno: &str| steno.parse::<Keys>().unwrap();

	assert!(keys("S").can_append(keys("T")));
	assert!(!keys("T").can_append(keys("S")));
	assert!(Keys::empty().can_append(keys("S")));
	assert!(keys("-T").can_append(Keys::empty()));
	// The asterisk is transparent on both sides.
	assert!(keys("S*").can_append(keys("T")));
	assert!(keys("-G").can_append(keys("*S")));
	assert!(!keys("-T").can_append(keys("-F")));
	assert!(keys("W").can_append(keys("AOEU")));
}
