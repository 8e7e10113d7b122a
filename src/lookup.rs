use thiserror::Error;

use crate::keys::{Key, Keys, Strokes};
use crate::theory::{TheoryService, LINKER, STROKE_BOUNDARY};
use crate::trie::{Choice, Frontier, NondeterministicTrie, ReverseIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
	#[error("outline contains an empty stroke")]
	EmptyOutline,
	#[error("outline contains keys outside the theory")]
	InvalidSteno,
	#[error("no translation admitted for outline")]
	NotFound,
}

/// Walks an outline through the trie and picks a translation among the
/// admitted variants: cheapest first, advanced by trailing cycler strokes,
/// shifted by one when an unexplained asterisk is present.
pub fn lookup<'t>(
	trie: &'t NondeterministicTrie,
	theory: &TheoryService,
	outline: &[Keys],
) -> Result<&'t str, LookupError> {
	let mut frontier = Frontier::root();
	let mut n_variation = 0;
	let mut asterisk = Keys::empty();
	let mut consumed_any = false;

	for &stroke in outline {
		if stroke.is_empty() {
			return Err(LookupError::EmptyOutline);
		}

		if stroke == theory.spec.cycler_stroke {
			n_variation += 1;
			continue;
		}

		if !theory.spec.all_keys.contains(stroke) {
			return Err(LookupError::InvalidSteno);
		}

		if theory.spec.prohibited_strokes.contains(&stroke) {
			return Err(LookupError::NotFound);
		}

		// Cyclers can only trail the outline.
		if n_variation > 0 {
			return Err(LookupError::NotFound);
		}

		if consumed_any {
			frontier = trie.advance(&frontier, STROKE_BOUNDARY);
			if frontier.is_empty() {
				return Err(LookupError::NotFound);
			}
		}
		consumed_any = true;

		let (left, vowels, right, star) = theory.split(stroke);
		asterisk = star;

		if !left.is_empty() {
			if !star.is_empty() {
				// The asterisk is opaque: it may attach after any left key.
				for key in left.key_names() {
					frontier = trie.advance(&frontier, key);
					let with_star = trie.advance(&frontier, Key::Star.name());
					frontier = frontier.merge(with_star);
					if frontier.is_empty() {
						return Err(LookupError::NotFound);
					}
				}
			} else if left == theory.spec.linker_chord {
				// The linker chord also collapses to the single linker key.
				let spelled = trie.advance_chain(&frontier, left.key_names());
				let linked = trie.advance(&frontier, LINKER);
				frontier = spelled.merge(linked);
			} else {
				frontier = trie.advance_chain(&frontier, left.key_names());
			}

			if frontier.is_empty() {
				return Err(LookupError::NotFound);
			}
		}

		if !vowels.is_empty() {
			frontier = trie.advance(&frontier, &vowels.to_string());
			if frontier.is_empty() {
				return Err(LookupError::NotFound);
			}
		}

		if !right.is_empty() {
			if !star.is_empty() {
				// On the right bank the asterisk may attach before any key.
				for key in right.key_names() {
					let with_star = trie.advance(&frontier, Key::Star.name());
					frontier = frontier.merge(with_star);
					frontier = trie.advance(&frontier, key);
					if frontier.is_empty() {
						return Err(LookupError::NotFound);
					}
				}
			} else {
				frontier = trie.advance_chain(&frontier, right.key_names());
			}

			if frontier.is_empty() {
				return Err(LookupError::NotFound);
			}
		}
	}

	let choices = trie.translations_with_costs(&frontier);
	if choices.is_empty() {
		return Err(LookupError::NotFound);
	}

	if asterisk.is_empty() {
		return Ok(nth_variation(&choices, n_variation));
	}

	// The asterisk is explained when the best path crosses an asterisk edge
	// within the last stroke; otherwise the selection shifts by one.
	for &transition in choices[0].path.iter().rev() {
		if trie.transition_has_key(transition, STROKE_BOUNDARY) {
			break;
		}
		if !trie.transition_has_key(transition, Key::Star.name()) {
			continue;
		}

		return Ok(nth_variation(&choices, n_variation));
	}

	if choices.len() > 1 {
		Ok(nth_variation(&choices, n_variation + 1))
	} else {
		Err(LookupError::NotFound)
	}
}

fn nth_variation<'t>(choices: &[Choice<'t>], n_variation: usize) -> &'t str {
	choices[n_variation % choices.len()].translation
}

/// Finds every outline that writes `translation`, reassembling the trie's key
/// sequences into strokes. Sequences that violate steno order are discarded;
/// the linker pseudo-key materializes as the theory's linker chord.
pub fn reverse_lookup(
	trie: &NondeterministicTrie,
	index: &ReverseIndex,
	theory: &TheoryService,
	translation: &str,
) -> Vec<Strokes> {
	let mut outlines = Vec::new();

	'sequences: for sequence in trie.key_sequences(index, translation) {
		let mut outline = Vec::new();
		let mut current = Keys::empty();

		for key_name in sequence {
			if key_name == STROKE_BOUNDARY {
				outline.push(current);
				current = Keys::empty();
				continue;
			}

			let key_stroke = if key_name == LINKER {
				theory.spec.linker_chord
			} else {
				match key_name.parse::<Keys>() {
					Ok(keys) => keys,
					Err(_) => continue 'sequences,
				}
			};

			if current.can_append(key_stroke) {
				current |= key_stroke;
			} else {
				continue 'sequences;
			}
		}

		outline.push(current);
		outlines.push(Strokes(outline));
	}

	outlines
}
