use once_cell::sync::Lazy;

use crate::dict::Dict;
use crate::keys::{Keys, Strokes};
use crate::lookup::LookupError;
use crate::phoneme::Stenophoneme;
use crate::sopheme::{Keysymbol, Orthokeysymbol, Sopheme};

fn strokes(outline: &str) -> Vec<Keys> {
	outline.parse::<Strokes>().unwrap().0
}

const ENTRIES: &[(&str, &str)] = &[
	("STKPWAOEU/TKPWOET", "zygote"),
	// Lands on the node zygote's squished-vowel variant already reaches.
	("STKPWAOEUGT", "zygott"),
	("TKAOEU", "die"),
	("TKAOEU", "dye"),
	("PRA/U", "prau"),
	("A/TKPWOE", "ago"),
];

static DICT: Lazy<Dict> = Lazy::new(|| Dict::from_flat_entries(ENTRIES.iter().copied()).unwrap());

#[test]
fn canonical_lookups() {
	const TESTS: &[(&str, &str)] = &[
		("STKPWAOEU/TKPWOET", "zygote"),
		("STKPWAOEUGT", "zygott"),
		("TKAOEU", "die"),
		("PRA/SWHU", "prau"),
		("A/TKPWOE", "ago"),
	];

	let mut success = true;

	for &(raw_input, expected) in TESTS {
		let actual = DICT.lookup(&strokes(raw_input));
		let correct = actual == Ok(expected);
		success &= correct;
		if !correct {
			println!("failed: input {raw_input:?}, expected {expected:?}, actual {actual:?}");
		}
	}

	assert!(success, "some lookups failed");
}

#[test]
fn cycler_selects_homophones() {
	assert_eq!(DICT.lookup(&strokes("TKAOEU")), Ok("die"));
	assert_eq!(DICT.lookup(&strokes("TKAOEU/@")), Ok("dye"));
	assert_eq!(DICT.lookup(&strokes("TKAOEU/@/@")), Ok("die"));
}

#[test]
fn cycler_without_competitors_wraps() {
	let dict = Dict::from_flat_entries([("STKPWAOEU/TKPWOET", "zygote")]).unwrap();
	assert_eq!(dict.lookup(&strokes("STKPWAOEU/TKPWOET/@")), Ok("zygote"));
}

#[test]
fn cycler_must_trail() {
	assert_eq!(
		DICT.lookup(&strokes("@/TKAOEU")),
		Err(LookupError::NotFound)
	);
}

#[test]
fn elided_vowel_ranks_behind_exact_match() {
	// The single-stroke form is zygott's exact outline and zygote's
	// vowel-elision variant; the elision cost breaks the tie.
	assert_eq!(DICT.lookup(&strokes("STKPWAOEUGT")), Ok("zygott"));
	assert_eq!(DICT.lookup(&strokes("STKPWAOEUGT/@")), Ok("zygote"));
}

#[test]
fn linker_collapses() {
	// A vowel-initial syllable is written through the linker chord, spelled
	// out or collapsed; the bare vowel stroke is not admitted.
	assert_eq!(DICT.lookup(&strokes("PRA/SWHU")), Ok("prau"));
	assert_eq!(DICT.lookup(&strokes("PRA/U")), Err(LookupError::NotFound));
}

#[test]
fn initial_vowel_chord_elides_leading_vowel() {
	assert_eq!(DICT.lookup(&strokes("@TKPWOE")), Ok("ago"));
}

#[test]
fn prohibited_strokes_fail() {
	assert_eq!(DICT.lookup(&strokes("AEU")), Err(LookupError::NotFound));
}

#[test]
fn bad_input() {
	assert_eq!(
		DICT.lookup_steno(&["#TKAOEU"]),
		Err(LookupError::InvalidSteno)
	);
	assert_eq!(DICT.lookup_steno(&[""]), Err(LookupError::EmptyOutline));
	assert_eq!(DICT.lookup_steno(&["XYZZY"]), Err(LookupError::InvalidSteno));
	assert_eq!(
		DICT.lookup(&strokes("SRAOEU")),
		Err(LookupError::NotFound)
	);
}

#[test]
fn get_falls_back() {
	assert_eq!(DICT.get(&strokes("TKAOEU"), "?"), "die");
	assert_eq!(DICT.get(&strokes("SRAOEU"), "?"), "?");
}

fn consonant_sopheme(chars: &str, symbol: &str, phoneme: Stenophoneme) -> Sopheme {
	Sopheme {
		orthokeysymbols: vec![Orthokeysymbol {
			keysymbols: vec![Keysymbol::new(symbol, 0, false)],
			chars: chars.into(),
		}],
		steno: Vec::new(),
		phoneme: Some(phoneme),
	}
}

static OATH_DICT: Lazy<Dict> = Lazy::new(|| {
	Dict::from_sopheme_entries([vec![
		consonant_sopheme("oa", "ou", Stenophoneme::OO),
		consonant_sopheme("th", "th", Stenophoneme::TH),
	]])
});

#[test]
fn asterisk_chord_is_explained_by_its_path() {
	assert_eq!(OATH_DICT.lookup(&strokes("O*ET")), Ok("oath"));
	// Without the asterisk the TH chord does not exist.
	assert_eq!(OATH_DICT.lookup(&strokes("OET")), Err(LookupError::NotFound));
}

#[test]
fn unexplained_asterisk_shifts_selection() {
	assert_eq!(DICT.lookup(&strokes("TKAO*EU")), Ok("dye"));

	let lone = Dict::from_flat_entries([("TKAOEU", "die")]).unwrap();
	assert_eq!(
		lone.lookup(&strokes("TKAO*EU")),
		Err(LookupError::NotFound)
	);
}

#[test]
fn reverse_lookup_round_trips() {
	let zygote = DICT.reverse_lookup("zygote");
	assert!(zygote
		.iter()
		.any(|outline| outline.to_string() == "STKPWAOEU/TKPWOET"));

	// Every reassembled outline is strokable and admitted; the cheapest
	// translation may still be a homophone sharing the node.
	for outline in &zygote {
		assert!(DICT.lookup(&outline.0).is_ok(), "outline {outline}");
	}

	let prau: Vec<String> = DICT
		.reverse_lookup("prau")
		.iter()
		.map(ToString::to_string)
		.collect();
	assert_eq!(prau, ["PRA/SWHU"]);

	assert!(DICT.reverse_lookup("missing").is_empty());
}

#[test]
fn rebuilding_is_idempotent() {
	let first = Dict::from_flat_entries(ENTRIES.iter().copied()).unwrap();
	let second = Dict::from_flat_entries(ENTRIES.iter().copied()).unwrap();
	assert_eq!(first.trie, second.trie);
}

#[test]
fn flat_json_dictionary() {
	let dict: Dict = serde_json::from_str(
		r#"{"STKPWAOEU/TKPWOET": "zygote", "TP*EUBG": "fix", "PRA/U": "prau"}"#,
	)
	.unwrap();

	// The asterisked brief is skipped, not fatal.
	assert_eq!(dict.lookup(&strokes("STKPWAOEU/TKPWOET")), Ok("zygote"));
	assert_eq!(dict.lookup(&strokes("TP*EUBG")), Err(LookupError::NotFound));
	assert_eq!(dict.lookup(&strokes("PRA/SWHU")), Ok("prau"));
}
