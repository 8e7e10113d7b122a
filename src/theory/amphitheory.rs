use std::collections::HashSet;

use crate::keys::Keys;
use crate::phoneme::Stenophoneme;

use super::{ClusterKey, TheorySpec, TransitionCosts};

fn keys(steno: &str) -> Keys {
	steno.parse().unwrap()
}

fn chords(table: &[(Stenophoneme, &str)]) -> Vec<(Stenophoneme, Keys)> {
	table
		.iter()
		.map(|&(phoneme, steno)| (phoneme, keys(steno)))
		.collect()
}

/// The default writeout theory's data tables.
pub fn spec() -> TheorySpec {
	use Stenophoneme as P;

	TheorySpec {
		all_keys: keys("@STKPWHRAO*EUFRPBLGTSDZ"),

		left_bank: keys("@STKPWHR"),
		vowels_bank: keys("AOEU"),
		right_bank: keys("-FRPBLGTSDZ"),
		asterisk: keys("*"),

		left_chords: chords(&[
			(P::S, "S"),
			(P::T, "T"),
			(P::K, "K"),
			(P::P, "P"),
			(P::W, "W"),
			(P::H, "H"),
			(P::R, "R"),
			(P::Z, "STKPW"),
			(P::J, "SKWR"),
			(P::V, "SR"),
			(P::D, "TK"),
			(P::G, "TKPW"),
			(P::F, "TP"),
			(P::N, "TPH"),
			(P::Y, "KWR"),
			(P::B, "PW"),
			(P::M, "PH"),
			(P::L, "HR"),
			(P::SH, "SH"),
			(P::TH, "TH"),
			(P::CH, "KH"),
			(P::NG, "TPH"),
		]),

		vowel_chords: chords(&[
			(P::AA, "AEU"),
			(P::A, "A"),
			(P::EE, "AOE"),
			(P::E, "E"),
			(P::II, "AOEU"),
			(P::I, "EU"),
			(P::OO, "OE"),
			(P::O, "O"),
			(P::UU, "AOU"),
			(P::U, "U"),
			(P::AU, "AU"),
			(P::OI, "OEU"),
			(P::OU, "OU"),
			(P::AE, "AE"),
			(P::AO, "AO"),
		]),

		right_chords: chords(&[
			(P::Dummy, ""),
			(P::F, "-F"),
			(P::R, "-R"),
			(P::P, "-P"),
			(P::B, "-B"),
			(P::L, "-L"),
			(P::G, "-G"),
			(P::T, "-T"),
			(P::S, "-S"),
			(P::D, "-D"),
			(P::Z, "-Z"),
			(P::V, "-FB"),
			(P::N, "-PB"),
			(P::M, "-PL"),
			(P::K, "-BG"),
			(P::J, "-PBLG"),
			(P::CH, "-FP"),
			(P::SH, "-RB"),
			(P::TH, "*T"),
		]),

		left_alt_chords: chords(&[(P::F, "W"), (P::V, "W"), (P::Z, "S*")]),

		right_alt_chords: chords(&[
			(P::S, "-F"),
			(P::Z, "-F"),
			(P::V, "-F"),
			(P::TH, "-F"),
			(P::M, "-FR"),
			(P::J, "-FR"),
			(P::K, "*G"),
		]),

		linker_chord: keys("SWH"),
		initial_vowel_chord: Some(keys("@")),

		cycler_stroke: keys("@"),

		prohibited_strokes: HashSet::from([keys("AEU")]),

		clusters: cluster_table(&[
			(&[P::D, P::S], "STK"),
			(&[P::D, P::S, P::T], "STK"),
			(&[P::D, P::S, P::K], "STK"),
			(&[P::K, P::N], "K"),
			(&[P::K, P::M, P::P], "KP"),
			(&[P::K, P::M, P::B], "KPW"),
			(&[P::L, P::F], "-FL"),
			(&[P::L, P::V], "-FL"),
			(&[P::G, P::L], "-LG"),
			(&[P::L, P::J], "-LG"),
			(&[P::K, P::L], "*LG"),
			(&[P::N, P::J], "-PBG"),
			(&[P::M, P::J], "-PLG"),
			(&[P::R, P::F], "*FR"),
			(&[P::R, P::S], "*FR"),
			(&[P::R, P::M], "*FR"),
			(&[P::R, P::V], "-FRB"),
			(&[P::L, P::CH], "-LG"),
			(&[P::R, P::CH], "-FRPB"),
			(&[P::N, P::CH], "-FRPBLG"),
			(&[P::L, P::SH], "*RB"),
			(&[P::R, P::SH], "*RB"),
			(&[P::N, P::SH], "*RB"),
			(&[P::M, P::P], "*PL"),
			(&[P::T, P::L], "-LT"),
		]),

		vowel_conscious_clusters: vowel_cluster_table(&[
			(&[P::AnyVowel, P::N, P::T], "SPW"),
			(&[P::AnyVowel, P::N, P::D], "SPW"),
			(&[P::AnyVowel, P::M, P::P], "KPW"),
			(&[P::AnyVowel, P::M, P::B], "KPW"),
			(&[P::AnyVowel, P::N, P::K], "SKPW"),
			(&[P::AnyVowel, P::N, P::G], "SKPW"),
			(&[P::AnyVowel, P::N, P::J], "SKPW"),
			(&[P::E, P::K, P::S], "SKW"),
			(&[P::E, P::K, P::S, P::T], "STKW"),
			(&[P::E, P::K, P::S, P::K], "SKW"),
			(&[P::E, P::K, P::S, P::P], "SKPW"),
			(&[P::AnyVowel, P::N], "TPH"),
			(&[P::AnyVowel, P::N, P::S], "STPH"),
			(&[P::AnyVowel, P::N, P::F], "TPW"),
			(&[P::AnyVowel, P::N, P::V], "TPW"),
			(&[P::AnyVowel, P::M], "PH"),
		]),

		diphthong_glides: [
			(P::E, P::Y),
			(P::OO, P::W),
			(P::OU, P::W),
			(P::I, P::Y),
			(P::EE, P::Y),
			(P::UU, P::W),
			(P::AA, P::Y),
			(P::OI, P::Y),
			(P::II, P::Y),
		]
		.into_iter()
		.collect(),

		costs: TransitionCosts {
			vowel_elision: 5,
			cluster: 2,
			alt_consonant: 3,
		},
	}
}

fn cluster_table(table: &[(&[Stenophoneme], &str)]) -> Vec<(Vec<Stenophoneme>, Keys)> {
	table
		.iter()
		.map(|&(phonemes, steno)| (phonemes.to_vec(), keys(steno)))
		.collect()
}

fn vowel_cluster_table(table: &[(&[Stenophoneme], &str)]) -> Vec<(Vec<ClusterKey>, Keys)> {
	table
		.iter()
		.map(|&(phonemes, steno)| {
			(
				phonemes.iter().map(|&phoneme| ClusterKey::Phoneme(phoneme)).collect(),
				keys(steno),
			)
		})
		.collect()
}
