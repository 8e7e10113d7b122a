use crate::theory::TheoryService;
use crate::trie::{NodeId, TransitionCostInfo};

use super::elision::elide_previous_vowel_left;
use super::state::EntryBuilderState;

/// Attaches the left-bank chord for the current consonant, with every
/// admissible way of reaching it, and its alternate form when the main form
/// would be unstrokable next to a neighbor.
pub fn add_left_consonant(
	state: &mut EntryBuilderState<'_, '_>,
	theory: &TheoryService,
) -> (Option<NodeId>, Option<NodeId>) {
	let Some(src) = state.left_consonant_src else {
		return (None, None);
	};

	let left = theory.left_chord(state.consonant());
	let costs = theory.costs();
	let free = TransitionCostInfo {
		cost: 0,
		value: state.translation,
	};

	let node = state
		.trie
		.first_or_create_chain(src, left.key_names(), Some(free));

	if let Some(boundary) = state.left_boundary_src {
		state
			.trie
			.link_chain(boundary, node, left.key_names(), Some(free));
	}

	if let Some(prev_alt) = state.last_left_alt {
		let elision = if state.is_first_consonant() {
			costs.vowel_elision
		} else {
			0
		};
		state.trie.link_chain(
			prev_alt,
			node,
			left.key_names(),
			Some(TransitionCostInfo {
				cost: costs.alt_consonant + elision,
				value: state.translation,
			}),
		);
	}

	if state.can_elide_prev_vowel_left() {
		elide_previous_vowel_left(
			state.trie,
			costs,
			state.translation,
			state.left_squish_src,
			state.left_boundary_src,
			left,
			node,
			0,
			true,
		);
	}

	let alt_node = add_left_alt_consonant(state, theory, node);

	(Some(node), alt_node)
}

fn add_left_alt_consonant(
	state: &mut EntryBuilderState<'_, '_>,
	theory: &TheoryService,
	left_consonant_node: NodeId,
) -> Option<NodeId> {
	let src = state.left_consonant_src?;
	let alt = theory.left_alt_chord(state.consonant())?;
	let left = theory.left_chord(state.consonant());
	let costs = theory.costs();

	let main_usable_after_prev = match state.last_consonant() {
		None => true,
		Some(prev) => match theory.right_chord(prev) {
			Some(prev_right) => prev_right.can_append(left) || !prev_right.can_append(alt),
			None => false,
		},
	};
	let main_usable_before_next = match state.next_consonant() {
		None => true,
		Some(next) => match theory.right_chord(next) {
			Some(next_right) => left.can_append(next_right) || !alt.can_append(next_right),
			None => false,
		},
	};
	if main_usable_after_prev && main_usable_before_next {
		return None;
	}

	let free = TransitionCostInfo {
		cost: 0,
		value: state.translation,
	};

	let alt_node = state.trie.first_or_create_chain(
		src,
		alt.key_names(),
		Some(TransitionCostInfo {
			cost: costs.alt_consonant,
			value: state.translation,
		}),
	);

	if let Some(boundary) = state.left_boundary_src {
		state
			.trie
			.link_chain(boundary, alt_node, alt.key_names(), Some(free));
	}

	if let Some(prev_alt) = state.last_left_alt {
		let elision = if state.is_first_consonant() {
			costs.vowel_elision
		} else {
			0
		};
		state.trie.link_chain(
			prev_alt,
			alt_node,
			alt.key_names(),
			Some(TransitionCostInfo {
				cost: costs.alt_consonant + elision,
				value: state.translation,
			}),
		);
	}

	if state.can_elide_prev_vowel_left() {
		// The main consonant node stays valid: continuing onto the vowel is
		// fine when the previous consonant is present.
		elide_previous_vowel_left(
			state.trie,
			costs,
			state.translation,
			state.left_squish_src,
			state.left_boundary_src,
			alt,
			left_consonant_node,
			costs.alt_consonant,
			false,
		);
		elide_previous_vowel_left(
			state.trie,
			costs,
			state.translation,
			state.left_squish_src,
			state.left_boundary_src,
			alt,
			alt_node,
			costs.alt_consonant,
			true,
		);
	}

	Some(alt_node)
}
