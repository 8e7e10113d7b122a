use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use paste::paste;
use thiserror::Error;

macro_rules! str_enum {
	(#[description = $descr:tt] $(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident = $variant_str:tt),* $(,)? }) => { paste! {
		$(#[$meta])* $vis enum $name {
			$($variant,)*
		}

		#[derive(Debug, Error)]
		#[error("unrecognized {} {0:?}", Self::DESCRIPTION)]
		pub struct [<$name FromStrError>](Box<str>);

		impl [<$name FromStrError>] {
			const DESCRIPTION: &str = $descr;
		}

		impl FromStr for $name {
			type Err = [<$name FromStrError>];

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Ok(match s {
					$($variant_str => Self::$variant,)*
					_ => return Err([<$name FromStrError>](s.into())),
				})
			}
		}

		impl $name {
			pub fn as_str(self) -> &'static str {
				match self {
					$(Self::$variant => $variant_str,)*
				}
			}
		}
	} }
}

str_enum! {
#[description = "stenophoneme"]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stenophoneme {
	S = "S",
	T = "T",
	K = "K",
	P = "P",
	W = "W",
	H = "H",
	R = "R",

	Z = "Z",
	J = "J",
	V = "V",
	D = "D",
	G = "G",
	F = "F",
	N = "N",
	Y = "Y",
	B = "B",
	M = "M",
	L = "L",

	CH = "CH",
	SH = "SH",
	TH = "TH",

	NG = "NG",

	AnyVowel = "ANY_VOWEL",

	AA = "AA",
	A = "A",
	EE = "EE",
	E = "E",
	II = "II",
	I = "I",
	OO = "OO",
	O = "O",
	UU = "UU",
	U = "U",
	AU = "AU",
	OI = "OI",
	OU = "OU",

	AO = "AO",
	AE = "AE",

	Dummy = "DUMMY",
}
}

impl Stenophoneme {
	pub fn is_vowel(self) -> bool {
		matches!(
			self,
			Self::AA
				| Self::A | Self::EE
				| Self::E | Self::II
				| Self::I | Self::OO
				| Self::O | Self::UU
				| Self::U | Self::AU
				| Self::OI | Self::OU
				| Self::AO | Self::AE
		)
	}
}

impl Display for Stenophoneme {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		formatter.write_str(self.as_str())
	}
}

#[test]
fn test_round_trip() {
	for phoneme in [
		Stenophoneme::S,
		Stenophoneme::NG,
		Stenophoneme::AnyVowel,
		Stenophoneme::OI,
		Stenophoneme::Dummy,
	] {
		assert_eq!(phoneme.as_str().parse::<Stenophoneme>().unwrap(), phoneme);
	}
	assert!("QQ".parse::<Stenophoneme>().is_err());
}
