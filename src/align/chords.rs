use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{align, AlignCost, AlignmentService, Cell};
use crate::keys::{Key, Keys, ParseError, Strokes};
use crate::phoneme::Stenophoneme;
use crate::sopheme::{Orthokeysymbol, Sopheme};

/// A steno key, along with whether its stroke included the asterisk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsteriskableKey {
	pub key: Key,
	pub asterisk: bool,
}

/// Flattens an outline into its keys, each annotated with whether its stroke
/// carried an asterisk.
pub fn annotations_from_outline(outline_steno: &str) -> Result<Vec<AsteriskableKey>, ParseError> {
	let strokes: Strokes = outline_steno.parse()?;

	Ok(
		strokes
			.0
			.iter()
			.flat_map(|&stroke| {
				let asterisk = stroke.contains(Keys::STAR);
				(stroke & !Keys::STAR)
					.keys()
					.map(move |key| AsteriskableKey { key, asterisk })
			})
			.collect(),
	)
}

/// Reassembles annotated keys into strokes, starting a new stroke whenever
/// steno order would be violated.
pub fn keys_to_strokes(
	keys: impl IntoIterator<Item = Key>,
	asterisks: impl IntoIterator<Item = bool>,
) -> Vec<Keys> {
	let mut strokes = Vec::new();
	let mut current = Keys::empty();

	for (key, asterisk) in keys.into_iter().zip(asterisks) {
		let mut key_stroke = key.mask();
		if asterisk {
			key_stroke |= Keys::STAR;
		}

		if current.can_append(key_stroke) {
			current |= key_stroke;
		} else {
			strokes.push(current);
			current = key_stroke;
		}
	}

	if !current.is_empty() {
		strokes.push(current);
	}

	strokes
}

/// One way a keysymbol run can be written in steno, with the stenophoneme it
/// realizes when there is a single one.
#[derive(Debug, Clone)]
pub struct ChordMapping {
	pub phoneme: Option<Stenophoneme>,
	pub keys: Vec<AsteriskableKey>,
}

fn steno_options(phoneme: Stenophoneme) -> &'static [&'static str] {
	use Stenophoneme as P;

	match phoneme {
		P::B => &["PW", "-B"],
		P::D => &["TK", "-D"],
		P::F => &["TP", "-F"],
		P::G => &["SKWR", "TKPW", "-PBLG", "-G"],
		P::H => &["H"],
		P::J => &["SKWR", "-PBLG", "-G"],
		P::K => &["K", "-BG", "*G"],
		P::L => &["HR", "-L"],
		P::M => &["PH", "-PL"],
		P::N => &["TPH", "-PB"],
		P::P => &["P", "-P"],
		P::R => &["R", "-R"],
		P::S => &["S", "-S", "-F", "-Z", "KR"],
		P::T => &["T", "-T", "SH", "-RB", "KH", "-FP"],
		P::V => &["SR", "-F"],
		P::W => &["W", "U"],
		P::Y => &["KWH", "KWR"],
		P::Z => &["STKPW", "-Z", "-F", "S", "-S", "KP"],
		P::TH => &["TH", "*T"],
		P::SH => &["SH", "-RB"],
		P::CH => &["KH", "-FP"],
		P::NG => &["-PB", "-PBG"],
		P::AA => &["A", "AEU", "AE"],
		P::A => &["A", "AE"],
		P::EE => &["AOE", "EU", "E"],
		P::E => &["E", "AEU"],
		P::II => &["AOEU"],
		P::I => &["EU"],
		P::OO => &["OE", "AU", "O"],
		P::O => &["AU", "O"],
		P::UU => &["AOU", "U", "AO"],
		P::U => &["U", "AO"],
		P::OI => &["OEU"],
		P::OU => &["OU", "AO"],
		_ => &[],
	}
}

const ANY_VOWEL_OPTIONS: &[(Stenophoneme, &str)] = &[
	(Stenophoneme::A, "A"),
	(Stenophoneme::O, "O"),
	(Stenophoneme::E, "E"),
	(Stenophoneme::U, "U"),
	(Stenophoneme::U, "AO"),
	(Stenophoneme::AA, "AE"),
	(Stenophoneme::AU, "AU"),
	(Stenophoneme::OO, "OE"),
	(Stenophoneme::OU, "OU"),
	(Stenophoneme::I, "EU"),
	(Stenophoneme::EE, "AOE"),
	(Stenophoneme::UU, "AOU"),
	(Stenophoneme::AA, "AEU"),
	(Stenophoneme::OI, "OEU"),
	(Stenophoneme::II, "AOEU"),
];

/// How each keysymbol appears as it does in Lapwing-style outlines.
static KEYSYMBOL_TO_CHORDS: Lazy<HashMap<Vec<String>, Vec<ChordMapping>>> = Lazy::new(|| {
	use Stenophoneme as P;

	enum Options {
		Phonemes(&'static [Stenophoneme]),
		AnyVowel,
		NoPhoneme(&'static [&'static str]),
	}
	use Options::{AnyVowel, NoPhoneme, Phonemes};

	let table: &[(&str, Options)] = &[
		("", NoPhoneme(&["KWR", "W"])),
		("p", Phonemes(&[P::P])),
		("t", Phonemes(&[P::T, P::D])),
		("?", Phonemes(&[])), // glottal stop
		("t^", Phonemes(&[P::T, P::R])), // tapped R
		("k", Phonemes(&[P::K])),
		("x", Phonemes(&[P::K])),
		("b", Phonemes(&[P::B])),
		("d", Phonemes(&[P::D, P::T])),
		("g", Phonemes(&[P::G])),
		("ch", Phonemes(&[P::CH])),
		("jh", Phonemes(&[P::J])),
		("s", Phonemes(&[P::S])),
		("z", Phonemes(&[P::Z])),
		("sh", Phonemes(&[P::SH])),
		("zh", Phonemes(&[P::SH, P::J])),
		("f", Phonemes(&[P::F])),
		("v", Phonemes(&[P::V])),
		("th", Phonemes(&[P::TH])),
		("dh", Phonemes(&[P::TH])),
		("h", Phonemes(&[P::H])),
		("m", Phonemes(&[P::M])),
		("m!", Phonemes(&[P::M])),
		("n", Phonemes(&[P::N])),
		("n!", Phonemes(&[P::N])),
		("ng", Phonemes(&[P::NG])),
		("l", Phonemes(&[P::L])),
		("ll", Phonemes(&[P::L])),
		("lw", Phonemes(&[P::L])),
		("l!", Phonemes(&[P::L])),
		("r", Phonemes(&[P::R])),
		("y", Phonemes(&[P::Y])),
		("w", Phonemes(&[P::W])),
		("hw", Phonemes(&[P::W])),
		("e", Phonemes(&[P::E, P::EE, P::AA])),
		("ao", Phonemes(&[P::A, P::AA, P::O, P::U])),
		("a", Phonemes(&[P::A, P::AA])),
		("ah", Phonemes(&[P::A, P::O])),
		("oa", Phonemes(&[P::A, P::O, P::U])),
		("aa", Phonemes(&[P::O, P::A])),
		("ar", Phonemes(&[P::A])),
		("eh", Phonemes(&[P::A])),
		("ou", Phonemes(&[P::OO])),
		("ouw", Phonemes(&[P::OO])),
		("oou", Phonemes(&[P::OO])),
		("o", Phonemes(&[P::O])),
		("au", Phonemes(&[P::O, P::A])),
		("oo", Phonemes(&[P::O])),
		("or", Phonemes(&[P::O])),
		("our", Phonemes(&[P::O])),
		("ii", Phonemes(&[P::EE])),
		("iy", Phonemes(&[P::EE])),
		("i", Phonemes(&[P::I, P::EE])),
		("@r", AnyVowel),
		("@", AnyVowel),
		("uh", Phonemes(&[P::U])),
		("u", Phonemes(&[P::U, P::O, P::OO])),
		("uu", Phonemes(&[P::UU])),
		("iu", Phonemes(&[P::UU])),
		("ei", Phonemes(&[P::AA, P::E])),
		("ee", Phonemes(&[P::AA, P::E, P::A])),
		("ai", Phonemes(&[P::II])),
		("ae", Phonemes(&[P::II])),
		("aer", Phonemes(&[P::II])),
		("aai", Phonemes(&[P::II])),
		("oi", Phonemes(&[P::OI])),
		("oir", Phonemes(&[P::OI])),
		("ow", Phonemes(&[P::OU])),
		("owr", Phonemes(&[P::OU])),
		("oow", Phonemes(&[P::OU])),
		("ir", Phonemes(&[P::EE])),
		("@@r", AnyVowel),
		("er", Phonemes(&[P::E, P::U])),
		("eir", Phonemes(&[P::E])),
		("ur", Phonemes(&[P::U, P::UU])),
		("i@", AnyVowel),
		("E5", Phonemes(&[P::E, P::EE, P::AA])),
		("k s", NoPhoneme(&["KP"])),
		("g z", NoPhoneme(&["KP"])),
		("sh n", NoPhoneme(&["-GS"])),
		("zh n", NoPhoneme(&["-GS"])),
		("k sh n", NoPhoneme(&["-BGS"])),
		("k zh n", NoPhoneme(&["-BGS"])),
		("m p", NoPhoneme(&["*PL"])),
		("y uu", Phonemes(&[P::UU])),
	];

	let mapping = |phoneme: Option<Stenophoneme>, steno: &str| ChordMapping {
		phoneme,
		keys: annotations_from_outline(steno).unwrap(),
	};

	table
		.iter()
		.map(|(keysymbol, options)| {
			let mappings = match options {
				Phonemes(phonemes) => phonemes
					.iter()
					.flat_map(|&phoneme| {
						steno_options(phoneme)
							.iter()
							.map(move |&steno| (Some(phoneme), steno))
					})
					.map(|(phoneme, steno)| mapping(phoneme, steno))
					.collect(),
				AnyVowel => ANY_VOWEL_OPTIONS
					.iter()
					.map(|&(phoneme, steno)| mapping(Some(phoneme), steno))
					.collect(),
				NoPhoneme(stenos) => stenos
					.iter()
					.map(|&steno| mapping(None, steno))
					.collect::<Vec<_>>(),
			};

			(
				keysymbol.split(' ').map(str::to_owned).collect(),
				mappings,
			)
		})
		.collect()
});

struct ChordsService;

impl AlignmentService for ChordsService {
	type ItemX = Orthokeysymbol;
	type ItemY = AsteriskableKey;
	type Cost = AlignCost;
	type MatchData = (Vec<bool>, Option<Stenophoneme>);
	type Candidate = ChordMapping;
	type Match = Sopheme;

	fn x_key(&self, xs: &[Orthokeysymbol]) -> Vec<String> {
		let mut out = Vec::new();

		if xs.first().is_some_and(|first| first.keysymbols.is_empty()) {
			out.push(String::new());
		}
		for orthokeysymbol in xs {
			for keysymbol in &orthokeysymbol.keysymbols {
				out.push(keysymbol.match_symbol.to_string());
			}
		}
		if xs.last().is_some_and(|last| last.keysymbols.is_empty()) {
			out.push(String::new());
		}

		out
	}

	fn candidates(&self, key: &[String]) -> Option<&[ChordMapping]> {
		KEYSYMBOL_TO_CHORDS.get(key).map(Vec::as_slice)
	}

	fn candidate_y(&self, candidate: &ChordMapping) -> Vec<AsteriskableKey> {
		candidate.keys.clone()
	}

	fn is_match(&self, actual: &[AsteriskableKey], candidate: &[AsteriskableKey]) -> bool {
		actual.len() == candidate.len()
			&& actual
				.iter()
				.zip(candidate)
				.all(|(actual, candidate)| {
					actual.key == candidate.key && (!candidate.asterisk || actual.asterisk)
				})
	}

	fn initial_cost(&self) -> AlignCost {
		AlignCost::INITIAL
	}

	fn mismatch_cost(
		&self,
		parent: &Cell<AlignCost, Self::MatchData>,
		increment_x: bool,
		increment_y: bool,
	) -> AlignCost {
		parent.cost.bump(increment_x, increment_y, parent.has_match)
	}

	fn match_cost(&self, parent: &Cell<AlignCost, Self::MatchData>) -> AlignCost {
		parent.cost.matched()
	}

	fn match_data(
		&self,
		_x_key: &[String],
		y_key: &[AsteriskableKey],
		_xs: &[Orthokeysymbol],
		candidate: &ChordMapping,
	) -> Self::MatchData {
		(
			y_key.iter().map(|key| key.asterisk).collect(),
			candidate.phoneme,
		)
	}

	fn build_match(
		&self,
		seq_x: &[Orthokeysymbol],
		seq_y: &[AsteriskableKey],
		start: &Cell<AlignCost, Self::MatchData>,
		end: &Cell<AlignCost, Self::MatchData>,
		data: Option<&Self::MatchData>,
	) -> Sopheme {
		let keys = seq_y[start.y..end.y].iter().map(|annotated| annotated.key);
		let asterisks = match data {
			Some((asterisks, _)) => asterisks.clone(),
			None => vec![false; end.y - start.y],
		};

		Sopheme {
			orthokeysymbols: seq_x[start.x..end.x].to_vec(),
			steno: keys_to_strokes(keys, asterisks),
			phoneme: data.and_then(|(_, phoneme)| *phoneme),
		}
	}
}

/// Aligns orthokeysymbols with the keys of the outline that writes them.
pub fn match_orthokeysymbols_to_chords(
	orthokeysymbols: &[Orthokeysymbol],
	outline_steno: &str,
) -> Result<Vec<Sopheme>, ParseError> {
	let keys = annotations_from_outline(outline_steno)?;
	Ok(align(&ChordsService, orthokeysymbols, &keys))
}

/// The full stenophonemic alignment: a lexicon row in, a sopheme sequence out.
pub fn match_sophemes(
	translation: &str,
	transcription: &str,
	outline_steno: &str,
) -> Result<Vec<Sopheme>, ParseError> {
	let orthokeysymbols = super::match_keysymbols_to_chars(transcription, translation);
	match_orthokeysymbols_to_chords(&orthokeysymbols, outline_steno)
}

#[cfg(test)]
mod test {
	use super::*;

	fn sopheme_string(translation: &str, transcription: &str, outline: &str) -> String {
		match_sophemes(translation, transcription, outline)
			.unwrap()
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join(" ")
	}

	#[test]
	fn annotations() {
		let keys = annotations_from_outline("A/K*EU").unwrap();
		let rendered: Vec<(Key, bool)> = keys.iter().map(|key| (key.key, key.asterisk)).collect();
		assert_eq!(
			rendered,
			[
				(Key::A, false),
				(Key::K, true),
				(Key::E, true),
				(Key::U, true),
			]
		);
	}

	#[test]
	fn stroke_reassembly() {
		let strokes = keys_to_strokes(
			[Key::T, Key::K, Key::O, Key::E, Key::T],
			[false, false, false, false, false],
		);
		let rendered: Vec<String> = strokes.iter().map(ToString::to_string).collect();
		// The second T violates steno order and starts a new stroke.
		assert_eq!(rendered, ["TKOE", "T"]);
	}

	#[test]
	fn baseline_alignments() {
		assert_eq!(
			sopheme_string("acquiesce", " { ~ a . k w ii . * e s } ", "A/KWEU/KWRES"),
			"a.a[A] cq.k[K] u.w[W] i.ii[EE] [[KWR]] e.e[E] sc.s[S] e."
		);
		assert_eq!(
			sopheme_string("zygote", " { z * ae . g ou t } ", "STKPWAOEU/TKPWOET"),
			"z.z[Z] y.ae[II] g.g[G] o.ou[OO] t.t[T] e."
		);
	}

	#[test]
	fn keysymbol_cluster_with_gap() {
		assert_eq!(
			sopheme_string("ation", " { ee sh n } ", "AEUGS"),
			"a.ee[AA] (ti.sh o. n.n)[[-GS]]"
		);
	}
}
