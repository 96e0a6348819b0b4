use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use volrescue_core::fixture::{write_fixture, FixtureBuilder, FixtureConfig};
use volrescue_core::{scan_volume, RecoveryConfig, RecoveryEngine};

#[derive(Parser, Debug)]
#[command(name = "volrescue", version, about = "Recover JPEG and PNG images from damaged volume images")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Carve images out of a volume and write them to a directory
	Recover {
		/// Path to the volume image
		volume: PathBuf,
		/// Output directory (cleared before the run unless --keep-output)
		#[arg(long, default_value = "recovered_images")]
		out: PathBuf,
		/// JSON config file; flags below override it
		#[arg(long)]
		config: Option<PathBuf>,
		/// Bytes searched before each image for deleted directory entries
		#[arg(long)]
		window: Option<usize>,
		/// Keep existing files in the output directory
		#[arg(long)]
		keep_output: bool,
		/// Read the volume into memory instead of mapping it
		#[arg(long)]
		no_mmap: bool,
		/// Write a JSON report of the run
		#[arg(long)]
		report: Option<PathBuf>,
	},
	/// List carvable images and their resolved names without writing anything
	Scan {
		/// Path to the volume image
		volume: PathBuf,
		/// Bytes searched before each image for deleted directory entries
		#[arg(long)]
		window: Option<usize>,
	},
	/// Build a synthetic damaged volume from image files
	Fixture {
		/// Output volume path
		output: PathBuf,
		/// Files to store in the volume, in order
		files: Vec<PathBuf>,
		/// Total volume size in bytes
		#[arg(long, default_value_t = 10 * 1024 * 1024)]
		size: usize,
		/// Plant a deleted directory entry, e.g. PHOTO.png (repeatable)
		#[arg(long = "remnant")]
		remnants: Vec<String>,
		/// Leave the metadata region intact instead of zeroing it
		#[arg(long)]
		intact: bool,
	},
}

fn main() -> Result<()> {
	// Initialize tracing
	tracing_subscriber::fmt::init();

	let cli = Cli::parse();
	match cli.command {
		Commands::Recover { volume, out, config, window, keep_output, no_mmap, report } => {
			let mut recovery_config = match config {
				Some(path) => RecoveryConfig::from_json_file(&path)?,
				None => RecoveryConfig::default(),
			};
			if let Some(window) = window {
				recovery_config.search_window = window;
			}
			if keep_output {
				recovery_config.clear_output = false;
			}
			if no_mmap {
				recovery_config.use_mmap = false;
			}

			let mut engine = RecoveryEngine::new(&volume, &out, recovery_config)
				.with_context(|| format!("Cannot start recovery from {}", volume.display()))?;

			let pb = ProgressBar::hidden();
			pb.set_style(
				ProgressStyle::default_bar()
					.template("[{bar:40.cyan/blue}] {pos}/{len} images {msg}")?
					.progress_chars("=>-"),
			);
			let progress = pb.clone();
			engine.set_progress_callback(move |p| {
				if progress.is_hidden() && p.total > 0 {
					progress.set_draw_target(indicatif::ProgressDrawTarget::stderr());
				}
				progress.set_length(p.total as u64);
				progress.set_position(p.processed as u64);
			});

			let run = engine.run();
			pb.finish_and_clear();

			if let Some(err) = &run.fatal_error {
				eprintln!("❌ {}", err);
			}
			for file in &run.recovered {
				println!("Recovered: {}", file.file_name());
			}
			println!();
			println!("Recovery complete. Recovered {} images.", run.recovered_count());
			if run.failed_count() > 0 {
				eprintln!("⚠️  {} images could not be written", run.failed_count());
			}

			if let Some(path) = report {
				run.write_json(&path)?;
				println!("📄 Report written to {}", path.display());
			}
		}
		Commands::Scan { volume, window } => {
			let mut recovery_config = RecoveryConfig::default();
			if let Some(window) = window {
				recovery_config.search_window = window;
			}

			let resolved = scan_volume(&volume, &recovery_config)?;

			println!("🔍 {} candidate images in {}", resolved.len(), volume.display());
			for item in &resolved {
				println!(
					"{:>10}..{:<10} {:<10} {:>9} bytes  {}",
					item.range.start,
					item.range.end,
					item.range.signature.description,
					item.range.len(),
					item.name
				);
			}
		}
		Commands::Fixture { output, files, size, remnants, intact } => {
			let config = FixtureConfig {
				volume_size: size,
				corrupt_metadata: !intact,
				..Default::default()
			};

			let mut builder = FixtureBuilder::new(config);
			for remnant in &remnants {
				let (name, ext) = remnant
					.rsplit_once('.')
					.with_context(|| format!("Remnant '{}' must look like NAME.EXT", remnant))?;
				builder = builder.add_remnant(name, ext);
			}

			let volume = write_fixture(&output, builder, &files)?;
			println!("✅ Created {} with {} files", output.display(), volume.file_offsets.len());
			if !intact {
				println!("💥 Metadata region zeroed");
			}
		}
	}
	Ok(())
}
