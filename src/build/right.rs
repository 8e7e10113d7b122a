use crate::phoneme::Stenophoneme;
use crate::theory::{TheoryService, LINKER, STROKE_BOUNDARY};
use crate::trie::{NodeId, TransitionCostInfo};

use super::elision::elide_previous_vowel_right;
use super::state::EntryBuilderState;

/// Attaches the right-bank chord for the current consonant. Also opens the
/// right-to-left stroke boundary toward the syllable's left consonant, and
/// returns the pair of nodes adjacent to that boundary when it was created.
pub fn add_right_consonant(
	state: &mut EntryBuilderState<'_, '_>,
	theory: &TheoryService,
	left_consonant_node: Option<NodeId>,
) -> (Option<NodeId>, Option<NodeId>, Option<(NodeId, NodeId)>) {
	let Some(src) = state.right_consonant_src else {
		return (None, None, None);
	};
	let Some(right) = theory.right_chord(state.consonant()) else {
		return (None, None, None);
	};
	let costs = theory.costs();
	let free = TransitionCostInfo {
		cost: 0,
		value: state.translation,
	};

	let node = state
		.trie
		.first_or_create_chain(src, right.key_names(), Some(free));

	if let Some(prev_alt) = state.last_right_alt {
		let elision = if state.is_first_consonant() {
			costs.vowel_elision
		} else {
			0
		};
		state.trie.link_chain(
			prev_alt,
			node,
			right.key_names(),
			Some(TransitionCostInfo {
				cost: elision,
				value: state.translation,
			}),
		);
	}

	// Skeletals: reach this right chord straight from the previous left
	// consonant when the previous right chord cannot precede it.
	let main_usable_after_prev = match state.last_consonant() {
		None => true,
		Some(prev) => theory
			.right_chord(prev)
			.is_some_and(|prev_right| prev_right.can_append(right)),
	};
	if !main_usable_after_prev {
		if let Some(prev_left) = state.prev_left_consonant {
			state
				.trie
				.link_chain(prev_left, node, right.key_names(), Some(free));
		}
	}

	let mut boundary_nodes = None;
	if let Some(left_node) = left_consonant_node {
		if state.consonant() != Stenophoneme::Dummy {
			let boundary = state
				.trie
				.first_or_create_child(node, STROKE_BOUNDARY, Some(free));
			state.trie.link(boundary, left_node, LINKER, Some(free));
			boundary_nodes = Some((node, boundary));
		}
	}

	if state.is_first_consonant() {
		elide_previous_vowel_right(
			state.trie,
			costs,
			state.translation,
			state.right_squish_src,
			right,
			node,
			0,
		);
	}

	let alt_node = add_right_alt_consonant(state, theory, node);

	(Some(node), alt_node, boundary_nodes)
}

fn add_right_alt_consonant(
	state: &mut EntryBuilderState<'_, '_>,
	theory: &TheoryService,
	right_consonant_node: NodeId,
) -> Option<NodeId> {
	let src = state.right_consonant_src?;
	let alt = theory.right_alt_chord(state.consonant())?;
	let right = theory.right_chord(state.consonant())?;
	let costs = theory.costs();

	let main_usable_after_prev = match state.last_consonant() {
		None => true,
		Some(prev) => match theory.right_chord(prev) {
			Some(prev_right) => prev_right.can_append(right) || !prev_right.can_append(alt),
			None => false,
		},
	};
	let main_usable_before_next = match state.next_consonant() {
		None => true,
		Some(next) => match theory.right_chord(next) {
			Some(next_right) => right.can_append(next_right) || !alt.can_append(next_right),
			None => false,
		},
	};
	if main_usable_after_prev && main_usable_before_next {
		return None;
	}

	let alt_node = state.trie.first_or_create_chain(
		src,
		alt.key_names(),
		Some(TransitionCostInfo {
			cost: costs.alt_consonant,
			value: state.translation,
		}),
	);

	if let Some(prev_alt) = state.last_right_alt {
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

	if !main_usable_after_prev {
		if let Some(prev_left) = state.prev_left_consonant {
			state.trie.link_chain(
				prev_left,
				alt_node,
				alt.key_names(),
				Some(TransitionCostInfo {
					cost: 0,
					value: state.translation,
				}),
			);
		}
	}

	if state.is_first_consonant() {
		elide_previous_vowel_right(
			state.trie,
			costs,
			state.translation,
			state.right_squish_src,
			alt,
			right_consonant_node,
			costs.alt_consonant,
		);
	}

	Some(alt_node)
}
