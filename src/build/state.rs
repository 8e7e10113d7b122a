use crate::phoneme::Stenophoneme;
use crate::trie::{NodeId, NondeterministicTrie};

use super::sounds::OutlineSounds;

/// The cursors an entry build carries from sound to sound.
#[derive(Debug)]
pub struct EntryBuilderState<'t, 'e> {
	pub trie: &'t mut NondeterministicTrie,
	pub sounds: &'e OutlineSounds,
	pub translation: &'e str,

	/// The node from which the next left consonant chord will grow.
	pub left_consonant_src: Option<NodeId>,
	/// The node from which the next right consonant chord will grow.
	pub right_consonant_src: Option<NodeId>,
	/// The latest node produced by an alternate left consonant chord.
	pub last_left_alt: Option<NodeId>,
	/// The latest node produced by an alternate right consonant chord.
	pub last_right_alt: Option<NodeId>,

	/// The node produced by the previous left consonant this syllable; unset
	/// when the previous sound was a vowel.
	pub prev_left_consonant: Option<NodeId>,

	// Two elision channels: squish places the elided vowel between two
	// same-bank consonant chords, boundary places it across the
	// right-to-left stroke break.
	pub left_squish_src: Option<NodeId>,
	pub right_squish_src: Option<NodeId>,
	pub left_boundary_src: Option<NodeId>,

	pub group_index: usize,
	pub sound_index: usize,
}

impl<'t, 'e> EntryBuilderState<'t, 'e> {
	pub fn new(
		trie: &'t mut NondeterministicTrie,
		sounds: &'e OutlineSounds,
		translation: &'e str,
	) -> Self {
		Self {
			trie,
			sounds,
			translation,
			left_consonant_src: None,
			right_consonant_src: None,
			last_left_alt: None,
			last_right_alt: None,
			prev_left_consonant: None,
			left_squish_src: None,
			right_squish_src: None,
			left_boundary_src: None,
			group_index: 0,
			sound_index: 0,
		}
	}

	pub fn is_first_group(&self) -> bool {
		self.group_index == 0
	}

	pub fn is_first_consonant(&self) -> bool {
		self.sound_index == 0
	}

	pub fn consonant(&self) -> Stenophoneme {
		self
			.sounds
			.get_consonant(self.group_index, self.sound_index)
			.phoneme
	}

	pub fn next_consonant(&self) -> Option<Stenophoneme> {
		self
			.sounds
			.consonant_after(self.group_index, self.sound_index)
			.map(|sound| sound.phoneme)
	}

	pub fn last_consonant(&self) -> Option<Stenophoneme> {
		self
			.sounds
			.consonant_before(self.group_index, self.sound_index)
			.map(|sound| sound.phoneme)
	}

	fn n_previous_group_consonants(&self) -> usize {
		if self.group_index > 0 {
			self.sounds.get_consonants(self.group_index - 1).len()
		} else {
			0
		}
	}

	pub fn can_elide_prev_vowel_left(&self) -> bool {
		!self.is_first_group() && self.is_first_consonant() && self.n_previous_group_consonants() > 0
	}

	/// A copy of the cursors, taken when a cluster is discovered so it can be
	/// applied later from its original surroundings.
	pub fn snapshot(&self) -> Snapshot {
		Snapshot {
			left_consonant_src: self.left_consonant_src,
			right_consonant_src: self.right_consonant_src,
			left_squish_src: self.left_squish_src,
			right_squish_src: self.right_squish_src,
			left_boundary_src: self.left_boundary_src,
			is_first_consonant: self.is_first_consonant(),
			can_elide_prev_vowel_left: self.can_elide_prev_vowel_left(),
		}
	}
}

#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
	pub left_consonant_src: Option<NodeId>,
	pub right_consonant_src: Option<NodeId>,
	pub left_squish_src: Option<NodeId>,
	pub right_squish_src: Option<NodeId>,
	pub left_boundary_src: Option<NodeId>,
	pub is_first_consonant: bool,
	pub can_elide_prev_vowel_left: bool,
}
