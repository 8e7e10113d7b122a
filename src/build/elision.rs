use crate::keys::Keys;
use crate::theory::TransitionCosts;
use crate::trie::{NodeId, NondeterministicTrie, TransitionCostInfo};

/// Admits eliding the previous vowel by reaching a left consonant directly:
/// squished against the previous left consonant, or placed just after the
/// right-to-left stroke break.
#[allow(clippy::too_many_arguments)]
pub fn elide_previous_vowel_left(
	trie: &mut NondeterministicTrie,
	costs: TransitionCosts,
	translation: &str,
	squish_src: Option<NodeId>,
	boundary_src: Option<NodeId>,
	chord: Keys,
	target: NodeId,
	additional_cost: u32,
	allow_boundary_elision: bool,
) {
	let info = TransitionCostInfo {
		cost: costs.vowel_elision + additional_cost,
		value: translation,
	};

	if let Some(squish) = squish_src {
		trie.link_chain(squish, target, chord.key_names(), Some(info));
	}

	if allow_boundary_elision {
		if let Some(boundary) = boundary_src {
			trie.link_chain(boundary, target, chord.key_names(), Some(info));
		}
	}
}

/// Admits eliding the previous vowel by squishing a right consonant against
/// the previous right consonant.
pub fn elide_previous_vowel_right(
	trie: &mut NondeterministicTrie,
	costs: TransitionCosts,
	translation: &str,
	squish_src: Option<NodeId>,
	chord: Keys,
	target: NodeId,
	additional_cost: u32,
) {
	if let Some(squish) = squish_src {
		trie.link_chain(
			squish,
			target,
			chord.key_names(),
			Some(TransitionCostInfo {
				cost: costs.vowel_elision + additional_cost,
				value: translation,
			}),
		);
	}
}
