use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::keys::{Key, Keys};
use crate::phoneme::Stenophoneme;
use crate::trie::{ReadonlyTrie, Trie, ROOT};

mod amphitheory;

/// The trie key that separates strokes within one outline path.
pub const STROKE_BOUNDARY: &str = "";
/// The trie key standing in for the theory's linker chord.
pub const LINKER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionCosts {
	pub vowel_elision: u32,
	pub cluster: u32,
	pub alt_consonant: u32,
}

/// A key in a vowel-conscious cluster: either a phoneme (`AnyVowel` wildcards
/// vowels) or a literal vowel chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterKey {
	Phoneme(Stenophoneme),
	Chord(Keys),
}

/// The declarative data of a writeout theory. Chord tables are ordered;
/// where two phonemes share a chord, the later one wins derived reverse
/// lookups.
#[derive(Debug, Clone)]
pub struct TheorySpec {
	pub all_keys: Keys,

	pub left_bank: Keys,
	pub vowels_bank: Keys,
	pub right_bank: Keys,
	pub asterisk: Keys,

	pub left_chords: Vec<(Stenophoneme, Keys)>,
	pub vowel_chords: Vec<(Stenophoneme, Keys)>,
	pub right_chords: Vec<(Stenophoneme, Keys)>,
	pub left_alt_chords: Vec<(Stenophoneme, Keys)>,
	pub right_alt_chords: Vec<(Stenophoneme, Keys)>,

	pub linker_chord: Keys,
	pub initial_vowel_chord: Option<Keys>,

	pub cycler_stroke: Keys,

	pub prohibited_strokes: HashSet<Keys>,

	pub clusters: Vec<(Vec<Stenophoneme>, Keys)>,
	pub vowel_conscious_clusters: Vec<(Vec<ClusterKey>, Keys)>,

	pub diphthong_glides: HashMap<Stenophoneme, Stenophoneme>,

	pub costs: TransitionCosts,
}

/// A theory spec plus everything derived from it once at startup: lookup
/// maps, the frozen cluster tries, and the consonant-chord splitter.
#[derive(Debug)]
pub struct TheoryService {
	pub spec: TheorySpec,

	left: HashMap<Stenophoneme, Keys>,
	vowels: HashMap<Stenophoneme, Keys>,
	right: HashMap<Stenophoneme, Keys>,
	left_alt: HashMap<Stenophoneme, Keys>,
	right_alt: HashMap<Stenophoneme, Keys>,
	vowels_by_chord: HashMap<Keys, Stenophoneme>,

	clusters_trie: ReadonlyTrie<Stenophoneme, Keys>,
	vowel_clusters_trie: ReadonlyTrie<ClusterKey, Keys>,
	consonants_trie: ReadonlyTrie<Key, Vec<Stenophoneme>>,
}

impl TheoryService {
	pub fn new(spec: TheorySpec) -> Self {
		assert!(
			(spec.linker_chord & !spec.left_bank).is_empty(),
			"linker chord must only consist of starter keys"
		);

		let left: HashMap<_, _> = spec.left_chords.iter().copied().collect();
		let vowels: HashMap<_, _> = spec.vowel_chords.iter().copied().collect();
		let right: HashMap<_, _> = spec.right_chords.iter().copied().collect();
		let left_alt: HashMap<_, _> = spec.left_alt_chords.iter().copied().collect();
		let right_alt: HashMap<_, _> = spec.right_alt_chords.iter().copied().collect();

		let vowels_by_chord = spec
			.vowel_chords
			.iter()
			.map(|&(phoneme, chord)| (chord, phoneme))
			.collect();

		let mut clusters: Trie<Stenophoneme, Keys> = Trie::new();
		for (phonemes, chord) in &spec.clusters {
			let node = clusters.get_or_create_chain(ROOT, phonemes.iter().copied());
			clusters.set_value(node, *chord);
		}

		let mut vowel_clusters: Trie<ClusterKey, Keys> = Trie::new();
		for (cluster_keys, chord) in &spec.vowel_conscious_clusters {
			let node = vowel_clusters.get_or_create_chain(ROOT, cluster_keys.iter().copied());
			vowel_clusters.set_value(node, *chord);
		}

		let mut consonants: Trie<Key, Vec<Stenophoneme>> = Trie::new();
		for &(phoneme, chord) in spec.left_chords.iter().chain(&spec.right_chords) {
			let node = consonants.get_or_create_chain(ROOT, chord.keys());
			consonants.set_value(node, vec![phoneme]);
		}
		for (steno, phonemes) in [
			("PHR", vec![Stenophoneme::P, Stenophoneme::L]),
			("TPHR", vec![Stenophoneme::F, Stenophoneme::L]),
		] {
			let chord: Keys = steno.parse().unwrap();
			let node = consonants.get_or_create_chain(ROOT, chord.keys());
			consonants.set_value(node, phonemes);
		}

		Self {
			spec,
			left,
			vowels,
			right,
			left_alt,
			right_alt,
			vowels_by_chord,
			clusters_trie: clusters.frozen(),
			vowel_clusters_trie: vowel_clusters.frozen(),
			consonants_trie: consonants.frozen(),
		}
	}

	pub fn costs(&self) -> TransitionCosts {
		self.spec.costs
	}

	/// The left-bank chord for a consonant; empty when the theory has none,
	/// which degrades every attachment through it to a no-op.
	pub fn left_chord(&self, phoneme: Stenophoneme) -> Keys {
		self.left.get(&phoneme).copied().unwrap_or(Keys::empty())
	}

	pub fn right_chord(&self, phoneme: Stenophoneme) -> Option<Keys> {
		self.right.get(&phoneme).copied()
	}

	pub fn left_alt_chord(&self, phoneme: Stenophoneme) -> Option<Keys> {
		self.left_alt.get(&phoneme).copied()
	}

	pub fn right_alt_chord(&self, phoneme: Stenophoneme) -> Option<Keys> {
		self.right_alt.get(&phoneme).copied()
	}

	pub fn vowel_chord(&self, phoneme: Stenophoneme) -> Option<Keys> {
		self.vowels.get(&phoneme).copied()
	}

	pub fn vowel_phoneme(&self, chord: Keys) -> Option<Stenophoneme> {
		self.vowels_by_chord.get(&chord).copied()
	}

	/// Splits a stroke into its left-bank, vowel, right-bank, and asterisk
	/// sub-chords.
	pub fn split(&self, stroke: Keys) -> (Keys, Keys, Keys, Keys) {
		(
			stroke & self.spec.left_bank,
			stroke & self.spec.vowels_bank,
			stroke & self.spec.right_bank,
			stroke & self.spec.asterisk,
		)
	}

	pub fn clusters_trie(&self) -> &ReadonlyTrie<Stenophoneme, Keys> {
		&self.clusters_trie
	}

	pub fn vowel_clusters_trie(&self) -> &ReadonlyTrie<ClusterKey, Keys> {
		&self.vowel_clusters_trie
	}

	/// Decomposes a bank sub-chord into consonant phonemes by repeated
	/// longest-match over the theory's chord tables. Keys that match nothing
	/// are skipped.
	pub fn split_consonant_phonemes(&self, chord: Keys) -> Vec<Stenophoneme> {
		let keys: Vec<Key> = chord.keys().collect();
		let mut out = Vec::new();

		let mut start = 0;
		while start < keys.len() {
			let mut node = ROOT;
			let mut longest_end = start;
			let mut entry: &[Stenophoneme] = &[];

			for (seek, &key) in keys.iter().enumerate().skip(start) {
				match self.consonants_trie.child(node, key) {
					Some(next) => node = next,
					None => break,
				}

				if let Some(found) = self.consonants_trie.value(node) {
					entry = found;
					longest_end = seek;
				}
			}

			out.extend_from_slice(entry);
			start = longest_end + 1;
		}

		out
	}
}

/// The process-wide default theory.
pub fn amphitheory() -> &'static TheoryService {
	static SERVICE: Lazy<TheoryService> = Lazy::new(|| TheoryService::new(amphitheory::spec()));
	&SERVICE
}

#[cfg(test)]
mod test {
	use super::*;

	fn keys(steno: &str) -> Keys {
		steno.parse().unwrap()
	}

	#[test]
	fn split_partitions_stroke() {
		let theory = amphitheory();
		for steno in ["STKPWAOEU", "SWHU", "O*ET", "@TKPWOE"] {
			let stroke = keys(steno);
			let (left, vowels, right, asterisk) = theory.split(stroke);
			assert_eq!(left | vowels | right | asterisk, stroke);
			assert!((left & vowels).is_empty());
			assert!((left & right).is_empty());
			assert!((vowels & right).is_empty());
			assert!((asterisk & (left | vowels | right)).is_empty());
		}
	}

	#[test]
	fn consonant_chord_splitting() {
		let theory = amphitheory();

		assert_eq!(
			theory.split_consonant_phonemes(keys("STKPW")),
			[Stenophoneme::Z]
		);
		assert_eq!(
			theory.split_consonant_phonemes(keys("PHR")),
			[Stenophoneme::P, Stenophoneme::L]
		);
		assert_eq!(theory.split_consonant_phonemes(keys("SR")), [Stenophoneme::V]);
		assert_eq!(
			theory.split_consonant_phonemes(keys("SWH")),
			[Stenophoneme::S, Stenophoneme::W, Stenophoneme::H]
		);
		assert_eq!(
			theory.split_consonant_phonemes(keys("-PBLG")),
			[Stenophoneme::J]
		);
	}

	#[test]
	fn vowel_chord_round_trip() {
		let theory = amphitheory();
		for (phoneme, chord) in &theory.spec.vowel_chords {
			assert_eq!(theory.vowel_phoneme(*chord), Some(*phoneme));
		}
	}

	#[test]
	fn cluster_tries() {
		let theory = amphitheory();

		let node = theory
			.clusters_trie()
			.chain(ROOT, [Stenophoneme::D, Stenophoneme::S])
			.unwrap();
		assert_eq!(theory.clusters_trie().value(node), Some(&keys("STK")));

		let node = theory
			.vowel_clusters_trie()
			.chain(
				ROOT,
				[
					ClusterKey::Phoneme(Stenophoneme::AnyVowel),
					ClusterKey::Phoneme(Stenophoneme::N),
					ClusterKey::Phoneme(Stenophoneme::T),
				],
			)
			.unwrap();
		assert_eq!(theory.vowel_clusters_trie().value(node), Some(&keys("SPW")));
	}
}
