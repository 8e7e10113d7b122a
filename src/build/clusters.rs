use std::collections::HashMap;

use crate::keys::Keys;
use crate::phoneme::Stenophoneme;
use crate::theory::{ClusterKey, TheoryService};
use crate::trie::{NodeId, NondeterministicTrie, TransitionCostInfo, ROOT};

use super::elision::{elide_previous_vowel_left, elide_previous_vowel_right};
use super::state::{EntryBuilderState, Snapshot};

/// Clusters found at some position, waiting to be applied once the builder
/// reaches the position of their final consonant. Deferring keeps discovery
/// from mutating state the builder has not computed yet.
pub type PendingClusters = HashMap<(usize, usize), Vec<Cluster>>;

#[derive(Debug, Clone, Copy)]
enum Bank {
	Left,
	Right,
}

/// A compressed multi-phoneme chord, remembered together with the cursors at
/// the position where its first phoneme lives.
#[derive(Debug, Clone, Copy)]
pub struct Cluster {
	chord: Keys,
	bank: Bank,
	origin: Snapshot,
}

impl Cluster {
	fn new(theory: &TheoryService, chord: Keys, origin: Snapshot) -> Self {
		let bank = if (chord & theory.spec.left_bank).is_empty() {
			Bank::Right
		} else {
			Bank::Left
		};

		Self {
			chord,
			bank,
			origin,
		}
	}

	fn apply(
		self,
		trie: &mut NondeterministicTrie,
		theory: &TheoryService,
		translation: &str,
		current_left: Option<NodeId>,
		current_right: Option<NodeId>,
	) {
		let costs = theory.costs();
		let cluster_cost = TransitionCostInfo {
			cost: costs.cluster,
			value: translation,
		};

		match self.bank {
			Bank::Left => {
				let Some(left) = current_left else {
					return;
				};

				if let Some(src) = self.origin.left_consonant_src {
					trie.link_chain(src, left, self.chord.key_names(), Some(cluster_cost));
				}

				if self.origin.can_elide_prev_vowel_left {
					elide_previous_vowel_left(
						trie,
						costs,
						translation,
						self.origin.left_squish_src,
						self.origin.left_boundary_src,
						self.chord,
						left,
						costs.cluster,
						true,
					);
				}
			}
			Bank::Right => {
				let Some(right) = current_right else {
					return;
				};

				if let Some(src) = self.origin.right_consonant_src {
					trie.link_chain(src, right, self.chord.key_names(), Some(cluster_cost));
				}

				if self.origin.is_first_consonant {
					elide_previous_vowel_right(
						trie,
						costs,
						translation,
						self.origin.right_squish_src,
						self.chord,
						right,
						costs.cluster,
					);
				}
			}
		}
	}
}

/// Sweeps for clusters starting at the current position, then applies every
/// pending cluster whose final consonant is the current position.
pub fn handle_clusters(
	theory: &TheoryService,
	pending: &mut PendingClusters,
	left_node: Option<NodeId>,
	right_node: Option<NodeId>,
	state: &mut EntryBuilderState<'_, '_>,
	consider_vowels: bool,
) {
	let found = if consider_vowels {
		find_vowel_clusters(theory, state)
	} else {
		find_clusters(theory, state)
	};
	for (index, cluster) in found {
		pending.entry(index).or_default().push(cluster);
	}

	if let Some(clusters) = pending.get(&(state.group_index, state.sound_index)) {
		for &cluster in clusters {
			cluster.apply(state.trie, theory, state.translation, left_node, right_node);
		}
	}
}

fn find_clusters(
	theory: &TheoryService,
	state: &EntryBuilderState<'_, '_>,
) -> Vec<((usize, usize), Cluster)> {
	let trie = theory.clusters_trie();
	let mut found = Vec::new();

	let mut node = ROOT;
	let mut index = (state.group_index, state.sound_index);
	loop {
		let phoneme = state.sounds.get_consonant(index.0, index.1).phoneme;
		let Some(next) = trie.child(node, phoneme) else {
			break;
		};
		node = next;

		if let Some(&chord) = trie.value(node) {
			found.push((index, Cluster::new(theory, chord, state.snapshot())));
		}

		match state.sounds.increment_consonant_index(index.0, index.1) {
			Some(next_index) => index = next_index,
			None => break,
		}
	}

	found
}

fn find_vowel_clusters(
	theory: &TheoryService,
	state: &EntryBuilderState<'_, '_>,
) -> Vec<((usize, usize), Cluster)> {
	let trie = theory.vowel_clusters_trie();
	let mut found = Vec::new();

	let mut nodes = vec![ROOT];
	let mut index = (state.group_index, state.sound_index);
	loop {
		let sound = state.sounds.sound_at(index);

		let mut next_nodes = Vec::new();
		for &node in &nodes {
			let mut candidates = vec![trie.child(node, ClusterKey::Phoneme(sound.phoneme))];
			if sound.phoneme.is_vowel() {
				candidates.push(trie.child(node, ClusterKey::Phoneme(Stenophoneme::AnyVowel)));
				if let Some(chord) = theory.vowel_chord(sound.phoneme) {
					candidates.push(trie.child(node, ClusterKey::Chord(chord)));
				}
			}

			for next in candidates.into_iter().flatten() {
				if !next_nodes.contains(&next) {
					next_nodes.push(next);
				}
			}
		}

		if next_nodes.is_empty() {
			break;
		}

		for &node in &next_nodes {
			if let Some(&chord) = trie.value(node) {
				found.push((index, Cluster::new(theory, chord, state.snapshot())));
			}
		}

		nodes = next_nodes;
		match state.sounds.increment_index(index.0, index.1) {
			Some(next_index) => index = next_index,
			None => break,
		}
	}

	found
}
