#![deny(
	absolute_paths_not_starting_with_crate,
	keyword_idents,
	macro_use_extern_crate,
	meta_variable_misuse,
	missing_abi,
	missing_copy_implementations,
	non_ascii_idents,
	nonstandard_style,
	noop_method_call,
	rust_2018_idioms,
	unused_qualifications
)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod align;
pub mod build;
pub mod dict;
pub mod keys;
pub mod lookup;
pub mod phoneme;
pub mod sopheme;
pub mod theory;
pub mod trie;

#[cfg(test)]
mod test;
