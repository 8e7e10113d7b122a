use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use self::interner::Interner;

mod interner;

pub type NodeId = u32;
pub type KeyId = u32;
pub type ValueId = u32;

pub const ROOT: NodeId = 0;

/// A deterministic trie over an arena of nodes numbered from `ROOT`.
#[derive(Debug)]
pub struct Trie<K, V> {
	nodes: Vec<HashMap<K, NodeId>>,
	values: HashMap<NodeId, V>,
}

impl<K: Eq + Hash, V> Trie<K, V> {
	pub fn new() -> Self {
		Self {
			nodes: vec![HashMap::new()],
			values: HashMap::new(),
		}
	}

	pub fn get_or_create_child(&mut self, src: NodeId, key: K) -> NodeId {
		if let Some(&dst) = self.nodes[src as usize].get(&key) {
			return dst;
		}

		let dst = NodeId::try_from(self.nodes.len()).unwrap();
		self.nodes[src as usize].insert(key, dst);
		self.nodes.push(HashMap::new());
		dst
	}

	pub fn get_or_create_chain(&mut self, src: NodeId, keys: impl IntoIterator<Item = K>) -> NodeId {
		let mut current = src;
		for key in keys {
			current = self.get_or_create_child(current, key);
		}
		current
	}

	pub fn child(&self, src: NodeId, key: &K) -> Option<NodeId> {
		self.nodes[src as usize].get(key).copied()
	}

	pub fn chain(&self, src: NodeId, keys: impl IntoIterator<Item = K>) -> Option<NodeId> {
		let mut current = src;
		for key in keys {
			current = self.child(current, &key)?;
		}
		Some(current)
	}

	pub fn set_value(&mut self, node: NodeId, value: V) {
		self.values.insert(node, value);
	}

	pub fn value(&self, node: NodeId) -> Option<&V> {
		self.values.get(&node)
	}

	/// A read-only view whose transitions are indexed by `(src, key)`.
	pub fn frozen(self) -> ReadonlyTrie<K, V> {
		let transitions = self
			.nodes
			.into_iter()
			.enumerate()
			.flat_map(|(src, transitions)| {
				let src = NodeId::try_from(src).unwrap();
				transitions
					.into_iter()
					.map(move |(key, dst)| ((src, key), dst))
			})
			.collect();

		ReadonlyTrie {
			transitions,
			values: self.values,
		}
	}
}

impl<K: Eq + Hash, V> Default for Trie<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

#[derive(Debug)]
pub struct ReadonlyTrie<K, V> {
	transitions: HashMap<(NodeId, K), NodeId>,
	values: HashMap<NodeId, V>,
}

impl<K: Eq + Hash + Copy, V> ReadonlyTrie<K, V> {
	pub fn child(&self, src: NodeId, key: K) -> Option<NodeId> {
		self.transitions.get(&(src, key)).copied()
	}

	pub fn chain(&self, src: NodeId, keys: impl IntoIterator<Item = K>) -> Option<NodeId> {
		let mut current = src;
		for key in keys {
			current = self.child(current, key)?;
		}
		Some(current)
	}

	pub fn value(&self, node: NodeId) -> Option<&V> {
		self.values.get(&node)
	}
}

/// A transition out of a node, with `ord` distinguishing parallel edges for
/// the same `(src, key)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
	pub src: NodeId,
	pub key: KeyId,
	pub ord: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct TransitionCostInfo<'a> {
	pub cost: u32,
	pub value: &'a str,
}

/// A trie that can be in multiple states at once.
///
/// Keys and translation values are interned to dense ids. Transition costs
/// are attributed per `(transition, value)`, defaulting to zero, so that one
/// shared edge can be cheap for one translation and expensive for another.
#[derive(Debug, PartialEq, Eq)]
pub struct NondeterministicTrie {
	nodes: Vec<HashMap<KeyId, Vec<NodeId>>>,
	translations: HashMap<NodeId, Vec<ValueId>>,
	keys: Interner,
	values: Interner,
	costs: HashMap<Transition, HashMap<ValueId, u32>>,
}

impl NondeterministicTrie {
	pub fn new() -> Self {
		Self {
			nodes: vec![HashMap::new()],
			translations: HashMap::new(),
			keys: Interner::default(),
			values: Interner::default(),
			costs: HashMap::new(),
		}
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	fn create_node(&mut self) -> NodeId {
		let id = NodeId::try_from(self.nodes.len()).unwrap();
		self.nodes.push(HashMap::new());
		id
	}

	fn record_cost(&mut self, transition: Transition, info: TransitionCostInfo<'_>) {
		let value = self.values.intern(info.value);
		let slot = self
			.costs
			.entry(transition)
			.or_default()
			.entry(value)
			.or_insert(info.cost);
		*slot = (*slot).min(info.cost);
	}

	fn min_transition_cost(&self, transition: Transition) -> u32 {
		self
			.costs
			.get(&transition)
			.and_then(|costs| costs.values().copied().min())
			.unwrap_or(0)
	}

	/// Returns the first existing child for `key`, creating one if there is
	/// none yet, and records `cost` against the traversed transition.
	pub fn first_or_create_child(
		&mut self,
		src: NodeId,
		key: &str,
		cost: Option<TransitionCostInfo<'_>>,
	) -> NodeId {
		let key_id = self.keys.intern(key);

		let existing = self.nodes[src as usize].get(&key_id).map(|dsts| dsts[0]);
		let dst = match existing {
			Some(dst) => dst,
			None => {
				let dst = self.create_node();
				self.nodes[src as usize].insert(key_id, vec![dst]);
				dst
			}
		};

		if let Some(cost) = cost {
			self.record_cost(
				Transition {
					src,
					key: key_id,
					ord: 0,
				},
				cost,
			);
		}

		dst
	}

	/// Like [`Self::first_or_create_child`] over a key chain; only the
	/// terminal transition carries the cost.
	pub fn first_or_create_chain<'k>(
		&mut self,
		src: NodeId,
		keys: impl IntoIterator<Item = &'k str>,
		cost: Option<TransitionCostInfo<'_>>,
	) -> NodeId {
		let keys: Vec<&str> = keys.into_iter().collect();
		let Some((&last, init)) = keys.split_last() else {
			return src;
		};

		let mut current = src;
		for &key in init {
			current = self.first_or_create_child(current, key, None);
		}
		self.first_or_create_child(current, last, cost)
	}

	/// Appends a parallel edge from `src` to an existing node `dst`.
	pub fn link(
		&mut self,
		src: NodeId,
		dst: NodeId,
		key: &str,
		cost: Option<TransitionCostInfo<'_>>,
	) {
		let key_id = self.keys.intern(key);
		let dsts = self.nodes[src as usize].entry(key_id).or_default();
		let ord = u32::try_from(dsts.len()).unwrap();
		dsts.push(dst);

		if let Some(cost) = cost {
			self.record_cost(
				Transition {
					src,
					key: key_id,
					ord,
				},
				cost,
			);
		}
	}

	/// Links `src` to `dst` through a key chain; only the terminal transition
	/// is a parallel edge and only it carries the cost.
	pub fn link_chain<'k>(
		&mut self,
		src: NodeId,
		dst: NodeId,
		keys: impl IntoIterator<Item = &'k str>,
		cost: Option<TransitionCostInfo<'_>>,
	) {
		let keys: Vec<&str> = keys.into_iter().collect();
		let Some((&last, init)) = keys.split_last() else {
			return;
		};

		let mut current = src;
		for &key in init {
			current = self.first_or_create_child(current, key, None);
		}
		self.link(current, dst, last, cost);
	}

	pub fn set_translation(&mut self, node: NodeId, translation: &str) {
		let value = self.values.intern(translation);
		let values = self.translations.entry(node).or_default();
		if !values.contains(&value) {
			values.push(value);
		}
	}

	/// Expands every frontier entry along `key`. When several paths converge
	/// on one node, the lower-weighted path is retained; equal weights keep
	/// the path encountered first.
	pub fn advance(&self, frontier: &Frontier, key: &str) -> Frontier {
		let Some(key_id) = self.keys.get(key) else {
			return Frontier::default();
		};

		let mut out = Frontier::default();
		let mut by_node = HashMap::new();

		for entry in &frontier.entries {
			let Some(dsts) = self.nodes[entry.node as usize].get(&key_id) else {
				continue;
			};
			for (ord, &dst) in dsts.iter().enumerate() {
				let transition = Transition {
					src: entry.node,
					key: key_id,
					ord: u32::try_from(ord).unwrap(),
				};
				let weight = entry.weight + self.min_transition_cost(transition);
				admit(&mut out, &mut by_node, entry, transition, dst, weight);
			}
		}

		out
	}

	pub fn advance_chain<'k>(
		&self,
		frontier: &Frontier,
		keys: impl IntoIterator<Item = &'k str>,
	) -> Frontier {
		let mut current = frontier.clone();
		for key in keys {
			current = self.advance(&current, key);
			if current.is_empty() {
				return current;
			}
		}
		current
	}

	/// Every translation reachable at the frontier, with the per-value sum of
	/// transition costs along the retained path, cheapest first. Ties keep
	/// the order in which the translations were discovered.
	pub fn translations_with_costs(&self, frontier: &Frontier) -> Vec<Choice<'_>> {
		let mut order = Vec::new();
		let mut best: HashMap<ValueId, (u32, Vec<Transition>)> = HashMap::new();

		for entry in &frontier.entries {
			let Some(values) = self.translations.get(&entry.node) else {
				continue;
			};
			for &value in values {
				let cost = entry
					.path
					.iter()
					.map(|transition| {
						self
							.costs
							.get(transition)
							.and_then(|costs| costs.get(&value))
							.copied()
							.unwrap_or(0)
					})
					.sum();

				match best.entry(value) {
					Entry::Occupied(mut slot) => {
						if cost < slot.get().0 {
							slot.insert((cost, entry.path.clone()));
						}
					}
					Entry::Vacant(slot) => {
						order.push(value);
						slot.insert((cost, entry.path.clone()));
					}
				}
			}
		}

		let mut choices: Vec<Choice<'_>> = order
			.into_iter()
			.map(|value| {
				let (cost, path) = best.remove(&value).unwrap();
				Choice {
					translation: self.values.resolve(value),
					cost,
					path,
				}
			})
			.collect();
		choices.sort_by_key(|choice| choice.cost);
		choices
	}

	pub fn transition_has_key(&self, transition: Transition, key: &str) -> bool {
		self.keys.get(key) == Some(transition.key)
	}

	/// Builds the reversed adjacency used by reverse lookup. Predecessor
	/// lists are ordered by node and key id so the traversal is
	/// deterministic.
	pub fn reverse_index(&self) -> ReverseIndex {
		let mut predecessors: HashMap<NodeId, Vec<(NodeId, KeyId)>> = HashMap::new();
		for (src, transitions) in self.nodes.iter().enumerate() {
			let src = NodeId::try_from(src).unwrap();
			let mut key_ids: Vec<KeyId> = transitions.keys().copied().collect();
			key_ids.sort_unstable();
			for key_id in key_ids {
				for &dst in &transitions[&key_id] {
					predecessors.entry(dst).or_default().push((src, key_id));
				}
			}
		}

		let mut terminals: HashMap<ValueId, Vec<NodeId>> = HashMap::new();
		let mut translated: Vec<(NodeId, &Vec<ValueId>)> = self
			.translations
			.iter()
			.map(|(&node, values)| (node, values))
			.collect();
		translated.sort_unstable_by_key(|&(node, _)| node);
		for (node, values) in translated {
			for &value in values {
				terminals.entry(value).or_default().push(node);
			}
		}

		ReverseIndex {
			predecessors,
			terminals,
		}
	}

	/// Every key sequence that reaches `translation` from the root.
	pub fn key_sequences(&self, index: &ReverseIndex, translation: &str) -> Vec<Vec<&str>> {
		let Some(value) = self.values.get(translation) else {
			return Vec::new();
		};
		let Some(terminals) = index.terminals.get(&value) else {
			return Vec::new();
		};

		let mut sequences = Vec::new();
		for &terminal in terminals {
			let mut path = Vec::new();
			let mut on_path = HashSet::new();
			self.collect_sequences(index, terminal, &mut path, &mut on_path, &mut sequences);
		}
		sequences
	}

	fn collect_sequences<'s>(
		&'s self,
		index: &ReverseIndex,
		node: NodeId,
		path: &mut Vec<KeyId>,
		on_path: &mut HashSet<NodeId>,
		out: &mut Vec<Vec<&'s str>>,
	) {
		if node == ROOT {
			out.push(path.iter().rev().map(|&key| self.keys.resolve(key)).collect());
			return;
		}
		if !on_path.insert(node) {
			return;
		}

		if let Some(predecessors) = index.predecessors.get(&node) {
			for &(src, key) in predecessors {
				path.push(key);
				self.collect_sequences(index, src, path, on_path, out);
				path.pop();
			}
		}

		on_path.remove(&node);
	}
}

impl Default for NondeterministicTrie {
	fn default() -> Self {
		Self::new()
	}
}

fn admit(
	out: &mut Frontier,
	by_node: &mut HashMap<NodeId, usize>,
	base: &FrontierEntry,
	transition: Transition,
	dst: NodeId,
	weight: u32,
) {
	match by_node.entry(dst) {
		Entry::Occupied(slot) => {
			let existing = &mut out.entries[*slot.get()];
			if weight < existing.weight {
				let mut path = base.path.clone();
				path.push(transition);
				*existing = FrontierEntry {
					node: dst,
					path,
					weight,
				};
			}
		}
		Entry::Vacant(slot) => {
			slot.insert(out.entries.len());
			let mut path = base.path.clone();
			path.push(transition);
			out.entries.push(FrontierEntry {
				node: dst,
				path,
				weight,
			});
		}
	}
}

/// Reversed adjacency over a built trie, derived once and then queried by
/// translation.
#[derive(Debug)]
pub struct ReverseIndex {
	predecessors: HashMap<NodeId, Vec<(NodeId, KeyId)>>,
	terminals: HashMap<ValueId, Vec<NodeId>>,
}

/// A reachable translation, its summed per-value cost, and the path that
/// produced it.
#[derive(Debug, Clone)]
pub struct Choice<'a> {
	pub translation: &'a str,
	pub cost: u32,
	pub path: Vec<Transition>,
}

/// The set of states a lookup is in, with the retained path to each.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
	entries: Vec<FrontierEntry>,
}

#[derive(Debug, Clone)]
pub struct FrontierEntry {
	pub node: NodeId,
	pub path: Vec<Transition>,
	weight: u32,
}

impl Frontier {
	pub fn root() -> Self {
		Self {
			entries: vec![FrontierEntry {
				node: ROOT,
				path: Vec::new(),
				weight: 0,
			}],
		}
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Unions two frontiers under the same retention policy as
	/// [`NondeterministicTrie::advance`].
	pub fn merge(self, other: Self) -> Self {
		let mut out = self;
		let mut by_node: HashMap<NodeId, usize> = out
			.entries
			.iter()
			.enumerate()
			.map(|(index, entry)| (entry.node, index))
			.collect();

		for entry in other.entries {
			match by_node.entry(entry.node) {
				Entry::Occupied(slot) => {
					let existing = &mut out.entries[*slot.get()];
					if entry.weight < existing.weight {
						*existing = entry;
					}
				}
				Entry::Vacant(slot) => {
					slot.insert(out.entries.len());
					out.entries.push(entry);
				}
			}
		}

		out
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn deterministic_trie() {
		let mut trie: Trie<char, u32> = Trie::new();
		let node = trie.get_or_create_chain(ROOT, "ab".chars());
		assert_eq!(trie.get_or_create_chain(ROOT, "ab".chars()), node);
		trie.set_value(node, 7);

		let frozen = trie.frozen();
		let found = frozen.chain(ROOT, "ab".chars()).unwrap();
		assert_eq!(frozen.value(found), Some(&7));
		assert_eq!(frozen.chain(ROOT, "ac".chars()), None);
	}

	#[test]
	fn nondeterministic_advance_and_costs() {
		let mut trie = NondeterministicTrie::new();
		let cost0 = Some(TransitionCostInfo {
			cost: 0,
			value: "cat",
		});
		let end = trie.first_or_create_chain(ROOT, ["K", "A", "-T"], cost0);
		trie.set_translation(end, "cat");

		// A costed shortcut that skips the vowel.
		trie.link_chain(
			ROOT,
			end,
			["K", "-T"],
			Some(TransitionCostInfo {
				cost: 5,
				value: "cat",
			}),
		);

		let frontier = trie.advance_chain(&Frontier::root(), ["K", "A", "-T"]);
		let choices = trie.translations_with_costs(&frontier);
		assert_eq!(choices.len(), 1);
		assert_eq!(choices[0].translation, "cat");
		assert_eq!(choices[0].cost, 0);

		let elided = trie.advance_chain(&Frontier::root(), ["K", "-T"]);
		let choices = trie.translations_with_costs(&elided);
		assert_eq!(choices[0].cost, 5);

		assert!(trie.advance(&Frontier::root(), "Q").is_empty());
	}

	#[test]
	fn parallel_edges_share_source() {
		let mut trie = NondeterministicTrie::new();
		let first = trie.first_or_create_child(ROOT, "S", None);
		let second = trie.create_node();
		trie.link(ROOT, second, "S", None);
		trie.set_translation(first, "a");
		trie.set_translation(second, "b");

		let frontier = trie.advance(&Frontier::root(), "S");
		let choices = trie.translations_with_costs(&frontier);
		let translations: Vec<_> = choices.iter().map(|choice| choice.translation).collect();
		assert_eq!(translations, ["a", "b"]);
	}

	#[test]
	fn reverse_sequences() {
		let mut trie = NondeterministicTrie::new();
		let end = trie.first_or_create_chain(ROOT, ["S", "A"], None);
		trie.set_translation(end, "sa");

		let index = trie.reverse_index();
		let sequences = trie.key_sequences(&index, "sa");
		assert_eq!(sequences, [["S", "A"]]);
		assert!(trie.key_sequences(&index, "missing").is_empty());
	}
}
