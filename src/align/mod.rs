pub use self::chars::{match_keysymbols_to_chars, parse_transcription};
pub use self::chords::{
	annotations_from_outline, keys_to_strokes, match_orthokeysymbols_to_chords, match_sophemes,
	AsteriskableKey,
};

mod chars;
mod chords;

/// A cell in the Needleman–Wunsch alignment matrix; represents an optimal
/// alignment of the first `x` items of one sequence to the first `y` items of
/// the other.
#[derive(Debug)]
pub struct Cell<C, M> {
	pub cost: C,
	/// Where the run of trailing unmatched x items began. Carried through
	/// mismatch cells so traceback can emit the whole run at once.
	pub unmatched_x_start: usize,
	pub unmatched_y_start: usize,
	pub parent: Option<(usize, usize)>,
	pub x: usize,
	pub y: usize,
	pub has_match: bool,
	pub match_data: Option<M>,
}

/// Lexicographic alignment cost: unmatched x items, then unmatched y items,
/// then the number of chunks the alignment breaks into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AlignCost(pub u32, pub u32, pub u32);

impl AlignCost {
	pub const INITIAL: Self = Self(0, 0, 0);

	pub fn bump(self, increment_x: bool, increment_y: bool, closes_chunk: bool) -> Self {
		Self(
			self.0 + u32::from(increment_x),
			self.1 + u32::from(increment_y),
			self.2 + u32::from(closes_chunk),
		)
	}

	pub fn matched(self) -> Self {
		Self(self.0, self.1, self.2 + 1)
	}
}

/// What a concrete aligner supplies: the mapping tables, the cost model, and
/// how matches are recognized and rebuilt.
pub trait AlignmentService {
	type ItemX;
	type ItemY;
	type Cost: PartialOrd;
	type MatchData;
	type Candidate;
	type Match;

	fn x_key(&self, xs: &[Self::ItemX]) -> Vec<String>;
	fn candidates(&self, key: &[String]) -> Option<&[Self::Candidate]>;
	fn candidate_y(&self, candidate: &Self::Candidate) -> Vec<Self::ItemY>;
	fn is_match(&self, actual: &[Self::ItemY], candidate: &[Self::ItemY]) -> bool;

	fn initial_cost(&self) -> Self::Cost;
	fn mismatch_cost(
		&self,
		parent: &Cell<Self::Cost, Self::MatchData>,
		increment_x: bool,
		increment_y: bool,
	) -> Self::Cost;
	fn match_cost(&self, parent: &Cell<Self::Cost, Self::MatchData>) -> Self::Cost;

	fn match_data(
		&self,
		x_key: &[String],
		y_key: &[Self::ItemY],
		xs: &[Self::ItemX],
		candidate: &Self::Candidate,
	) -> Self::MatchData;

	fn build_match(
		&self,
		seq_x: &[Self::ItemX],
		seq_y: &[Self::ItemY],
		start: &Cell<Self::Cost, Self::MatchData>,
		end: &Cell<Self::Cost, Self::MatchData>,
		data: Option<&Self::MatchData>,
	) -> Self::Match;
}

/// Aligns two sequences with a variation of the Needleman–Wunsch algorithm.
///
/// Parsing is strictly left-to-right; no inversions are modeled. Matches are
/// found by probing every suffix of the unmatched x run against the service's
/// mapping table; unmatched runs are emitted as single matches with no data.
pub fn align<S: AlignmentService>(
	service: &S,
	seq_x: &[S::ItemX],
	seq_y: &[S::ItemY],
) -> Vec<S::Match> {
	let mut matrix: Vec<Vec<Cell<S::Cost, S::MatchData>>> = Vec::with_capacity(seq_x.len() + 1);
	matrix.push(vec![Cell {
		cost: service.initial_cost(),
		unmatched_x_start: 0,
		unmatched_y_start: 0,
		parent: None,
		x: 0,
		y: 0,
		has_match: false,
		match_data: None,
	}]);

	for i in 1..=seq_x.len() {
		let cell = find_cell(service, seq_x, seq_y, &matrix, i, 0, true, false);
		matrix.push(vec![cell]);
	}
	for j in 1..=seq_y.len() {
		let cell = find_cell(service, seq_x, seq_y, &matrix, 0, j, false, true);
		matrix[0].push(cell);
	}

	for i in 1..=seq_x.len() {
		for j in 1..=seq_y.len() {
			// Advance x only, y only, or both; keep the first minimum.
			let mut best = find_cell(service, seq_x, seq_y, &matrix, i, j, true, false);
			let y_only = find_cell(service, seq_x, seq_y, &matrix, i, j, false, true);
			if y_only.cost < best.cost {
				best = y_only;
			}
			let both = find_cell(service, seq_x, seq_y, &matrix, i, j, true, true);
			if both.cost < best.cost {
				best = both;
			}
			matrix[i].push(best);
		}
	}

	traceback(service, seq_x, seq_y, &matrix)
}

#[allow(clippy::too_many_arguments)]
fn find_cell<S: AlignmentService>(
	service: &S,
	seq_x: &[S::ItemX],
	seq_y: &[S::ItemY],
	matrix: &[Vec<Cell<S::Cost, S::MatchData>>],
	i: usize,
	j: usize,
	increment_x: bool,
	increment_y: bool,
) -> Cell<S::Cost, S::MatchData> {
	let parent_pos = (
		if increment_x { i - 1 } else { i },
		if increment_y { j - 1 } else { j },
	);
	let parent = &matrix[parent_pos.0][parent_pos.1];

	let mut best = Cell {
		cost: service.mismatch_cost(parent, increment_x, increment_y),
		unmatched_x_start: parent.unmatched_x_start,
		unmatched_y_start: parent.unmatched_y_start,
		parent: Some(parent_pos),
		x: i,
		y: j,
		has_match: false,
		match_data: None,
	};

	let max_take = if increment_x { i } else { 0 };
	for take in 0..=max_take {
		let xs = &seq_x[i - take..i];
		let key = service.x_key(xs);
		let Some(candidates) = service.candidates(&key) else {
			continue;
		};

		for candidate in candidates {
			let y_key = service.candidate_y(candidate);
			// When not incrementing y, only silent candidates apply.
			if !increment_y && !y_key.is_empty() {
				continue;
			}
			if y_key.len() > j || (take == 0 && y_key.is_empty()) {
				continue;
			}

			let actual = &seq_y[j - y_key.len()..j];
			if !service.is_match(actual, &y_key) {
				continue;
			}

			let match_parent_pos = (i - take, j - y_key.len());
			let match_parent = &matrix[match_parent_pos.0][match_parent_pos.1];
			let cost = service.match_cost(match_parent);
			if cost < best.cost {
				best = Cell {
					cost,
					unmatched_x_start: i,
					unmatched_y_start: j,
					parent: Some(match_parent_pos),
					x: i,
					y: j,
					has_match: true,
					match_data: Some(service.match_data(&key, &y_key, xs, candidate)),
				};
			}
		}
	}

	best
}

fn traceback<S: AlignmentService>(
	service: &S,
	seq_x: &[S::ItemX],
	seq_y: &[S::ItemY],
	matrix: &[Vec<Cell<S::Cost, S::MatchData>>],
) -> Vec<S::Match> {
	let mut out = Vec::new();
	let mut pos = (seq_x.len(), seq_y.len());

	loop {
		let cell = &matrix[pos.0][pos.1];
		let Some(parent_pos) = cell.parent else {
			break;
		};

		let (start_pos, data) = if cell.has_match {
			(parent_pos, cell.match_data.as_ref())
		} else {
			let parent = &matrix[parent_pos.0][parent_pos.1];
			((parent.unmatched_x_start, parent.unmatched_y_start), None)
		};

		let start = &matrix[start_pos.0][start_pos.1];
		out.push(service.build_match(seq_x, seq_y, start, cell, data));
		pos = start_pos;
	}

	out.reverse();
	out
}
