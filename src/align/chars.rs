use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{align, AlignCost, AlignmentService, Cell};
use crate::sopheme::{Keysymbol, Orthokeysymbol};

/// How each transcription keysymbol can appear in English orthography.
static KEYSYMBOL_TO_GRAPHEMES: Lazy<HashMap<Vec<String>, Vec<&'static str>>> = Lazy::new(|| {
	const TABLE: &[(&str, &[&str])] = &[
		("p", &["p", "pp"]),
		("t", &["t", "tt", "d", "dd"]),
		("?", &[]), // glottal stop
		("t^", &["r", "rr"]), // tapped R
		("k", &["k", "kk", "c", "ck", "cc", "q", "cq"]),
		("x", &["k", "kk", "c", "ck", "cc", "q", "cq"]),
		("b", &["b", "bb"]),
		("d", &["d", "dd", "t", "tt"]),
		("g", &["g", "gg"]),
		("ch", &["ch", "t", "tt"]),
		("jh", &["j", "g"]),
		("s", &["s", "ss", "c", "sc", "z", "zz"]),
		("z", &["z", "zz", "s", "ss", "x"]),
		("sh", &["sh", "ti", "ci", "si", "ssi"]),
		("zh", &["sh", "zh", "j", "g", "si", "ssi", "ti", "ci"]),
		("f", &["f", "ph", "ff", "v", "vv"]),
		("v", &["v", "vv", "f", "ff", "ph"]),
		("th", &["th"]),
		("dh", &["th"]),
		("h", &["h"]),
		("m", &["m", "mm"]),
		("m!", &["m", "mm"]),
		("n", &["n", "nn"]),
		("n!", &["n", "nn"]),
		("ng", &["n", "ng"]),
		("l", &["l", "ll"]),
		("ll", &["l", "ll"]),
		("lw", &["l", "ll"]),
		("l!", &["l", "ll"]),
		("r", &["r", "rr"]),
		("y", &["y"]),
		("w", &["w"]),
		("hw", &["w"]),
		("e", &["e", "ea"]),
		("ao", &["a"]),
		("a", &["a", "aa"]),
		("ah", &["a"]),
		("oa", &["a"]),
		("aa", &["a", "au", "aw"]),
		("ar", &["a", "aa"]),
		("eh", &["a"]),
		("ou", &["o", "oe", "oa", "ou", "ow"]),
		("ouw", &["o", "oe", "oa", "ou", "ow"]),
		("oou", &["o", "oe", "oa", "ou", "ow"]),
		("o", &["o", "a", "ou", "au", "ow", "aw"]),
		("au", &["o", "a", "ou", "au", "ow", "aw"]),
		("oo", &["o", "a", "ou", "au", "ow", "aw"]),
		("or", &["o", "a", "ou", "au", "ow", "aw"]),
		("our", &["o", "a", "ou", "au", "ow", "aw"]),
		("ii", &["e", "i", "ee", "ea", "ie", "ei"]),
		("iy", &["i", "y", "ey", "ei", "ie"]),
		("i", &["i", "y"]),
		("@r", &["a", "o", "e", "u", "i", "y", "au", "ou"]),
		("@", &["a", "o", "e", "u", "i", "y", "au", "ou"]),
		("uh", &["u"]),
		("u", &["u", "o", "oo"]),
		("uu", &["u", "uu", "oo", "ew", "eu"]),
		("iu", &["u", "uu", "oo", "ew", "eu"]),
		("ei", &["ai", "ei", "a", "e"]),
		("ee", &["ai", "ei", "a", "e"]),
		("ai", &["i", "ie", "y", "ye"]),
		("ae", &["i", "ie", "y", "ye"]),
		("aer", &["i", "ie", "y", "ye"]),
		("aai", &["i", "ie", "y", "ye"]),
		("oi", &["oi", "oy"]),
		("oir", &["oi", "oy"]),
		("ow", &["ou", "ow", "ao"]),
		("owr", &["ou", "ow", "ao"]),
		("oow", &["ou", "ow", "ao"]),
		("ir", &["e", "ee", "ea", "ie", "ei", "i", "y", "ey"]),
		("@@r", &["a", "e", "i", "o", "u", "y", "au", "ou"]),
		("er", &["e"]),
		("eir", &["ai", "ei", "a", "e"]),
		("ur", &["u", "o", "oo"]),
		("i@", &["ia", "ie", "io", "iu"]),
		("t s", &["z"]),
		("d z", &["z"]),
		("k s", &["x"]),
		("g z", &["x"]),
	];

	TABLE
		.iter()
		.map(|&(keysymbol, graphemes)| {
			(
				keysymbol.split(' ').map(str::to_owned).collect(),
				graphemes.to_vec(),
			)
		})
		.collect()
});

const NONPHONETIC: &str = "*~-.<>{}#=$";

fn stress_level(token: &str) -> Option<u8> {
	match token {
		"*" => Some(1),
		"~" => Some(2),
		"-" => Some(3),
		_ => None,
	}
}

/// Extracts the phonetic keysymbols from a raw transcription. Stress markers
/// apply to the following keysymbol; other non-phonetic markers are dropped;
/// square brackets flag an optional keysymbol.
pub fn parse_transcription(transcription: &str) -> Vec<Keysymbol> {
	let mut out = Vec::new();
	let mut next_stress = 0;

	for token in transcription.split(' ') {
		if token.is_empty() {
			continue;
		}

		if let Some(stress) = stress_level(token) {
			next_stress = stress;
		}

		if token.chars().any(|ch| NONPHONETIC.contains(ch)) {
			continue;
		}

		let optional = token.starts_with('[') && token.ends_with(']');
		let symbol: String = token.chars().filter(|&ch| ch != '[' && ch != ']').collect();
		out.push(Keysymbol::new(&symbol, next_stress, optional));

		next_stress = 0;
	}

	out
}

struct CharsService;

impl AlignmentService for CharsService {
	type ItemX = Keysymbol;
	type ItemY = char;
	type Cost = AlignCost;
	type MatchData = ();
	type Candidate = &'static str;
	type Match = Orthokeysymbol;

	fn x_key(&self, xs: &[Keysymbol]) -> Vec<String> {
		xs.iter()
			.map(|keysymbol| keysymbol.match_symbol.to_string())
			.collect()
	}

	fn candidates(&self, key: &[String]) -> Option<&[&'static str]> {
		KEYSYMBOL_TO_GRAPHEMES.get(key).map(Vec::as_slice)
	}

	fn candidate_y(&self, candidate: &&'static str) -> Vec<char> {
		candidate.chars().collect()
	}

	fn is_match(&self, actual: &[char], candidate: &[char]) -> bool {
		actual == candidate
	}

	fn initial_cost(&self) -> AlignCost {
		AlignCost::INITIAL
	}

	fn mismatch_cost(
		&self,
		parent: &Cell<AlignCost, ()>,
		increment_x: bool,
		increment_y: bool,
	) -> AlignCost {
		parent.cost.bump(increment_x, increment_y, parent.has_match)
	}

	fn match_cost(&self, parent: &Cell<AlignCost, ()>) -> AlignCost {
		parent.cost.matched()
	}

	fn match_data(
		&self,
		_x_key: &[String],
		_y_key: &[char],
		_xs: &[Keysymbol],
		_candidate: &&'static str,
	) {
	}

	fn build_match(
		&self,
		seq_x: &[Keysymbol],
		seq_y: &[char],
		start: &Cell<AlignCost, ()>,
		end: &Cell<AlignCost, ()>,
		_data: Option<&()>,
	) -> Orthokeysymbol {
		Orthokeysymbol {
			keysymbols: seq_x[start.x..end.x].to_vec(),
			chars: seq_y[start.y..end.y].iter().collect::<String>().into(),
		}
	}
}

/// Aligns a transcription's keysymbols with the characters that spell them.
pub fn match_keysymbols_to_chars(transcription: &str, translation: &str) -> Vec<Orthokeysymbol> {
	let keysymbols = parse_transcription(transcription);
	let chars: Vec<char> = translation.chars().collect();
	align(&CharsService, &keysymbols, &chars)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn transcription_stress_and_markers() {
		let keysymbols = parse_transcription(" { ~ a . k w ii . * e s } ");
		let rendered: Vec<(String, u8)> = keysymbols
			.iter()
			.map(|keysymbol| (keysymbol.symbol.to_string(), keysymbol.stress))
			.collect();
		assert_eq!(
			rendered,
			[
				("a".to_owned(), 2),
				("k".to_owned(), 0),
				("w".to_owned(), 0),
				("ii".to_owned(), 0),
				("e".to_owned(), 1),
				("s".to_owned(), 0),
			]
		);
	}

	#[test]
	fn optional_keysymbols() {
		let keysymbols = parse_transcription("k [@] t");
		assert_eq!(keysymbols.len(), 3);
		assert!(keysymbols[1].optional);
		assert_eq!(&*keysymbols[1].symbol, "@");
	}

	#[test]
	fn silent_letters_are_carried() {
		let orthokeysymbols = match_keysymbols_to_chars(" { z * ae . g ou t } ", "zygote");
		let rendered: Vec<String> = orthokeysymbols
			.iter()
			.map(ToString::to_string)
			.collect();
		assert_eq!(rendered, ["z.z", "y.ae", "g.g", "o.ou", "t.t", "e."]);
	}
}
