use thiserror::Error;

use crate::theory::{TheoryService, LINKER, STROKE_BOUNDARY};
use crate::trie::{NondeterministicTrie, TransitionCostInfo, ROOT};

pub use self::sounds::{ConsonantVowelGroup, OutlineSounds};

use self::clusters::{handle_clusters, PendingClusters};
use self::left::add_left_consonant;
use self::right::add_right_consonant;
use self::state::EntryBuilderState;

mod clusters;
mod elision;
mod left;
mod right;
pub mod sounds;
mod state;

/// The entry cannot be modeled by the theory; such entries are skipped so one
/// bad record does not abort a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entry cannot be modeled by the theory")]
pub struct Unbuildable;

/// Adds every admissible outline-variant path for one entry to the trie,
/// terminating in its translation.
pub fn add_entry(
	trie: &mut NondeterministicTrie,
	theory: &TheoryService,
	sounds: &OutlineSounds,
	translation: &str,
) {
	let mut state = EntryBuilderState::new(trie, sounds, translation);
	state.left_consonant_src = Some(ROOT);

	let mut pending = PendingClusters::new();

	for group_index in 0..sounds.nonfinals.len() {
		state.group_index = group_index;
		let n_consonants = sounds.nonfinals[group_index].consonants.len();

		let free = TransitionCostInfo {
			cost: 0,
			value: translation,
		};

		// A non-initial syllable with no onset consonants is reached through
		// an explicit linker chord.
		let mut vowels_src = None;
		if n_consonants == 0 && !state.is_first_group() {
			if let Some(src) = state.left_consonant_src {
				vowels_src = Some(state.trie.first_or_create_child(src, LINKER, Some(free)));
			}
		}

		for sound_index in 0..n_consonants {
			state.sound_index = sound_index;

			let (left_node, left_alt) = add_left_consonant(&mut state, theory);

			let mut right_node = state.right_consonant_src;
			let mut right_alt = state.last_right_alt;
			if !state.is_first_group() {
				let (node, alt, boundary_nodes) = add_right_consonant(&mut state, theory, left_node);
				right_node = node;
				right_alt = alt;
				if let Some((pre_boundary, boundary)) = boundary_nodes {
					state.right_squish_src = Some(pre_boundary);
					state.left_boundary_src = Some(boundary);
				}
			}

			handle_clusters(theory, &mut pending, left_node, right_node, &mut state, false);

			state.left_consonant_src = left_node;
			state.prev_left_consonant = left_node;
			state.last_left_alt = left_alt;
			state.right_consonant_src = right_node;
			state.last_right_alt = right_alt;
		}

		state.sound_index = n_consonants;
		state.left_squish_src = state.left_consonant_src;

		// Vowels admit no variants; only a verbatim vowel chord proceeds.
		let vowel = &sounds.nonfinals[group_index].vowel;
		let Some(vowel_chord) = theory.vowel_chord(vowel.phoneme) else {
			return;
		};
		let vowels_src = vowels_src.or(state.left_consonant_src).unwrap_or(ROOT);
		let postvowels = state
			.trie
			.first_or_create_child(vowels_src, &vowel_chord.to_string(), Some(free));

		handle_clusters(
			theory,
			&mut pending,
			state.left_consonant_src,
			state.right_consonant_src,
			&mut state,
			true,
		);

		state.right_consonant_src = Some(postvowels);
		let after_boundary = state
			.trie
			.first_or_create_child(postvowels, STROKE_BOUNDARY, Some(free));
		state.left_consonant_src = Some(after_boundary);

		if state.is_first_group() && n_consonants == 0 {
			if let Some(initial) = theory.spec.initial_vowel_chord {
				state
					.trie
					.link_chain(ROOT, after_boundary, initial.key_names(), Some(free));
			}
		}

		state.prev_left_consonant = None;
	}

	state.group_index = sounds.nonfinals.len();
	for sound_index in 0..sounds.final_consonants.len() {
		state.sound_index = sound_index;

		let (right_node, right_alt, _) = add_right_consonant(&mut state, theory, None);

		handle_clusters(theory, &mut pending, None, right_node, &mut state, false);

		state.right_consonant_src = right_node;
		state.last_right_alt = right_alt;
		state.left_consonant_src = None;
	}

	// No right consonant source means the outline had no vowels and is
	// likely a brief; leave it out.
	if let Some(terminal) = state.right_consonant_src {
		state.trie.set_translation(terminal, translation);
	}
}
