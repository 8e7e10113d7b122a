use crate::keys::Keys;
use crate::sopheme::{Sopheme, Sound};
use crate::theory::TheoryService;

use super::Unbuildable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsonantVowelGroup {
	pub consonants: Vec<Sound>,
	pub vowel: Sound,
}

/// A word decomposed into consonant-vowel groups followed by trailing
/// consonants. Positions are addressed as `(group, index)`, where a group's
/// vowel sits at `index == consonants.len()` and the trailing consonants form
/// one final pseudo-group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineSounds {
	pub nonfinals: Vec<ConsonantVowelGroup>,
	pub final_consonants: Vec<Sound>,
}

impl OutlineSounds {
	pub fn get_consonants(&self, group: usize) -> &[Sound] {
		if group == self.nonfinals.len() {
			&self.final_consonants
		} else {
			&self.nonfinals[group].consonants
		}
	}

	pub fn get_consonant(&self, group: usize, index: usize) -> &Sound {
		&self.get_consonants(group)[index]
	}

	pub fn sound_at(&self, (group, index): (usize, usize)) -> &Sound {
		if group == self.nonfinals.len() {
			return &self.final_consonants[index];
		}

		let nonfinal = &self.nonfinals[group];
		if index == nonfinal.consonants.len() {
			&nonfinal.vowel
		} else {
			&nonfinal.consonants[index]
		}
	}

	/// The consonant position just before `(group, index)`, skipping over
	/// vowels and empty groups.
	pub fn decrement_consonant_index(
		&self,
		mut group: usize,
		index: usize,
	) -> Option<(usize, usize)> {
		if index > 0 {
			return Some((group, index - 1));
		}

		loop {
			if group == 0 {
				return None;
			}
			group -= 1;

			let consonants = self.get_consonants(group);
			if !consonants.is_empty() {
				return Some((group, consonants.len() - 1));
			}
		}
	}

	/// The consonant position just after `(group, index)`, skipping over
	/// vowels and empty groups.
	pub fn increment_consonant_index(
		&self,
		mut group: usize,
		index: usize,
	) -> Option<(usize, usize)> {
		let mut index = index + 1;

		loop {
			if index < self.get_consonants(group).len() {
				return Some((group, index));
			}
			if group == self.nonfinals.len() {
				return None;
			}
			group += 1;
			index = 0;
		}
	}

	/// The position just after `(group, index)`, traversing vowels as well.
	pub fn increment_index(&self, mut group: usize, index: usize) -> Option<(usize, usize)> {
		let mut index = index + 1;

		if group == self.nonfinals.len() && index >= self.final_consonants.len() {
			return None;
		}

		if group < self.nonfinals.len() && index > self.get_consonants(group).len() {
			group += 1;
			index = 0;
		}

		if group == self.nonfinals.len() && index >= self.get_consonants(group).len() {
			return None;
		}

		Some((group, index))
	}

	pub fn consonant_after(&self, group: usize, index: usize) -> Option<&Sound> {
		let (group, index) = self.increment_consonant_index(group, index)?;
		Some(self.get_consonant(group, index))
	}

	pub fn consonant_before(&self, group: usize, index: usize) -> Option<&Sound> {
		let (group, index) = self.decrement_consonant_index(group, index)?;
		Some(self.get_consonant(group, index))
	}

	/// Groups a raw outline's strokes. Outlines carrying an asterisk are not
	/// modeled (they are briefs) and cannot be built.
	pub fn from_outline(theory: &TheoryService, outline: &[Keys]) -> Result<Self, Unbuildable> {
		let mut nonfinals = Vec::new();
		let mut current: Vec<Sound> = Vec::new();

		for &stroke in outline {
			let (left, vowels, right, asterisk) = theory.split(stroke);
			if !asterisk.is_empty() {
				return Err(Unbuildable);
			}

			current.extend(
				theory
					.split_consonant_phonemes(left)
					.into_iter()
					.map(Sound::new),
			);

			if !vowels.is_empty() {
				let Some(vowel) = theory.vowel_phoneme(vowels) else {
					return Err(Unbuildable);
				};

				push_glide(theory, &nonfinals, &mut current);
				nonfinals.push(ConsonantVowelGroup {
					consonants: std::mem::take(&mut current),
					vowel: Sound::new(vowel),
				});
			}

			current.extend(
				theory
					.split_consonant_phonemes(right)
					.into_iter()
					.map(Sound::new),
			);
		}

		Ok(Self {
			nonfinals,
			final_consonants: current,
		})
	}

	/// Groups a pre-aligned sopheme sequence.
	pub fn from_sophemes(theory: &TheoryService, sophemes: &[Sopheme]) -> Self {
		let mut nonfinals = Vec::new();
		let mut current: Vec<Sound> = Vec::new();

		for sopheme in sophemes {
			if sopheme.phoneme.is_none() && sopheme.steno.is_empty() {
				continue;
			}

			if let Some(phoneme) = sopheme.phoneme.filter(|phoneme| phoneme.is_vowel()) {
				push_glide(theory, &nonfinals, &mut current);
				nonfinals.push(ConsonantVowelGroup {
					consonants: std::mem::take(&mut current),
					vowel: Sound::from_sopheme(phoneme, sopheme),
				});
				continue;
			}

			let vowel_substroke = sopheme
				.steno
				.iter()
				.map(|&stroke| stroke & theory.spec.vowels_bank)
				.find(|substroke| !substroke.is_empty());
			if let Some(vowel) = vowel_substroke.and_then(|substroke| theory.vowel_phoneme(substroke))
			{
				push_glide(theory, &nonfinals, &mut current);
				nonfinals.push(ConsonantVowelGroup {
					consonants: std::mem::take(&mut current),
					vowel: Sound::from_sopheme(vowel, sopheme),
				});
				continue;
			}

			match sopheme.phoneme {
				Some(phoneme) => current.push(Sound::from_sopheme(phoneme, sopheme)),
				None => {
					for &stroke in &sopheme.steno {
						current.extend(
							theory
								.split_consonant_phonemes(stroke)
								.into_iter()
								.map(|phoneme| Sound::from_sopheme(phoneme, sopheme)),
						);
					}
				}
			}
		}

		Self {
			nonfinals,
			final_consonants: current,
		}
	}
}

/// Two adjacent vowels are separated by the glide consonant the first vowel
/// induces, keeping groups consonant-delimited.
fn push_glide(
	theory: &TheoryService,
	nonfinals: &[ConsonantVowelGroup],
	current: &mut Vec<Sound>,
) {
	let is_diphthong_transition = !nonfinals.is_empty() && current.is_empty();
	if !is_diphthong_transition {
		return;
	}

	let prev_vowel = nonfinals[nonfinals.len() - 1].vowel.phoneme;
	if let Some(&glide) = theory.spec.diphthong_glides.get(&prev_vowel) {
		current.push(Sound::new(glide));
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::phoneme::Stenophoneme;
	use crate::theory::amphitheory;

	fn outline(steno: &str) -> Vec<Keys> {
		steno
			.split('/')
			.map(|stroke| stroke.parse().unwrap())
			.collect()
	}

	fn phonemes(sounds: &[Sound]) -> Vec<Stenophoneme> {
		sounds.iter().map(|sound| sound.phoneme).collect()
	}

	#[test]
	fn grouping_from_outline() {
		let sounds = OutlineSounds::from_outline(amphitheory(), &outline("STKPWAOEU/TKPWOET")).unwrap();

		assert_eq!(sounds.nonfinals.len(), 2);
		assert_eq!(phonemes(&sounds.nonfinals[0].consonants), [Stenophoneme::Z]);
		assert_eq!(sounds.nonfinals[0].vowel.phoneme, Stenophoneme::II);
		assert_eq!(phonemes(&sounds.nonfinals[1].consonants), [Stenophoneme::G]);
		assert_eq!(sounds.nonfinals[1].vowel.phoneme, Stenophoneme::OO);
		assert_eq!(phonemes(&sounds.final_consonants), [Stenophoneme::T]);
	}

	#[test]
	fn glide_insertion() {
		let sounds = OutlineSounds::from_outline(amphitheory(), &outline("PEU/U")).unwrap();

		assert_eq!(sounds.nonfinals.len(), 2);
		assert_eq!(phonemes(&sounds.nonfinals[1].consonants), [Stenophoneme::Y]);
		assert_eq!(sounds.nonfinals[1].vowel.phoneme, Stenophoneme::U);
	}

	#[test]
	fn asterisk_is_unbuildable() {
		assert_eq!(
			OutlineSounds::from_outline(amphitheory(), &outline("T*P")),
			Err(Unbuildable)
		);
	}

	#[test]
	fn index_stepping() {
		let sounds = OutlineSounds::from_outline(amphitheory(), &outline("STRAOEUP")).unwrap();
		// S T R / II vowel / P: consonants (0,0) (0,1) (0,2), vowel (0,3), final (1,0).

		assert_eq!(sounds.increment_consonant_index(0, 2), Some((1, 0)));
		assert_eq!(sounds.increment_consonant_index(1, 0), None);
		assert_eq!(sounds.decrement_consonant_index(1, 0), Some((0, 2)));
		assert_eq!(sounds.decrement_consonant_index(0, 0), None);
		assert_eq!(sounds.increment_index(0, 2), Some((0, 3)));
		assert_eq!(sounds.increment_index(0, 3), Some((1, 0)));
		assert_eq!(sounds.increment_index(1, 0), None);
	}
}
