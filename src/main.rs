use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context as _;
use argh::FromArgs;

use writeouts::align::match_sophemes;
use writeouts::sopheme::Sopheme;

/// Compile a flat steno dictionary plus a Unilex lexicon into a hatchery
/// dictionary.
#[derive(FromArgs, Debug)]
struct Args {
	/// path to the input JSON dictionary
	#[argh(option, short = 'j')]
	in_json: PathBuf,
	/// path to the input Unilex lexicon
	#[argh(option, short = 'u')]
	in_unilex: PathBuf,
	/// path to output the hatchery dictionary
	#[argh(option, short = 'o')]
	out: PathBuf,
}

fn main() -> anyhow::Result<()> {
	let args: Args = argh::from_env();

	let raw = std::fs::read_to_string(&args.in_json)
		.with_context(|| format!("reading dictionary from {:?}", args.in_json))?;
	let flat: HashMap<String, String> = serde_json::from_str(&raw).context("parsing dictionary")?;

	// Writeouts favor the fully written-out outlines: for each translation,
	// keep the outlines with the most strokes.
	let mut reverse: HashMap<&str, Vec<&str>> = HashMap::new();
	for (outline, translation) in &flat {
		if translation.is_empty() || !translation.chars().all(char::is_alphanumeric) {
			continue;
		}

		let n_strokes = outline.split('/').count();
		match reverse.get_mut(translation.as_str()) {
			Some(outlines) => {
				let existing = outlines[0].split('/').count();
				if n_strokes == existing {
					outlines.push(outline);
				} else if n_strokes > existing {
					*outlines = vec![outline];
				}
			}
			None => {
				reverse.insert(translation, vec![outline]);
			}
		}
	}

	let unilex = std::fs::read_to_string(&args.in_unilex)
		.with_context(|| format!("reading lexicon from {:?}", args.in_unilex))?;

	println!("Generating entries…");
	let started = Instant::now();

	let mut entries: Vec<Vec<Sopheme>> = Vec::new();
	for (number, line) in unilex.lines().enumerate() {
		let fields: Vec<&str> = line.split(':').collect();
		let [translation, _, _, transcription, _, _] = fields.as_slice() else {
			anyhow::bail!(
				"lexicon line {}: expected 6 fields, got {}",
				number + 1,
				fields.len()
			);
		};

		let Some(outlines) = reverse.get(translation) else {
			continue;
		};
		for outline in outlines {
			let sophemes = match_sophemes(translation, transcription, outline)
				.with_context(|| format!("aligning {translation:?} against {outline:?}"))?;
			entries.push(sophemes);
		}
	}

	if let Some(parent) = args.out.parent() {
		std::fs::create_dir_all(parent).with_context(|| format!("creating {parent:?}"))?;
	}
	let json = serde_json::to_string(&entries).context("serializing hatchery entries")?;
	std::fs::write(&args.out, json).with_context(|| format!("writing {:?}", args.out))?;

	println!(
		"Finished: {} entries (took {:.2?})",
		entries.len(),
		started.elapsed()
	);

	Ok(())
}
