//! igwd-frame CLI tool

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use igwd_frame::framefile::{self, FrameFile, VerifyLevel, WriterOptions};
use igwd_frame::toc::Toc;
use igwd_frame::version;
use igwd_frame::Frame;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "frame-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect, verify, and convert IGWD Frame files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more verification passes over a Frame file
    Verify {
        /// Path to the Frame file
        file: PathBuf,
        /// Verification pass to run (structure-checksums, file-checksum,
        /// expandability, cross-toc, all)
        #[arg(short, long, default_value = "all")]
        level: String,
    },

    /// Print the table of contents: frame count, channel names, offsets
    DumpToc {
        /// Path to the Frame file
        file: PathBuf,
    },

    /// Print the registered field layout of a structure kind
    Describe {
        /// Structure name, e.g. "FrameH" or "FrVect"
        name: String,
    },

    /// Read every frame from `input`, promote/demote it to `--to-version`,
    /// and write the result to `output`
    Convert {
        /// Target object-model version (6 or 8)
        #[arg(long = "to-version")]
        to_version: u8,
        /// Input Frame file
        input: PathBuf,
        /// Output Frame file
        output: PathBuf,
    },
}

fn parse_level(s: &str) -> Result<Vec<VerifyLevel>> {
    Ok(match s {
        "structure-checksums" => vec![VerifyLevel::StructureChecksums],
        "file-checksum" => vec![VerifyLevel::FileChecksum],
        "expandability" => vec![VerifyLevel::ExpandabilityOfVectors],
        "cross-toc" => vec![VerifyLevel::CrossTocConsistency],
        "all" => vec![
            VerifyLevel::StructureChecksums,
            VerifyLevel::ExpandabilityOfVectors,
            VerifyLevel::FileChecksum,
            VerifyLevel::CrossTocConsistency,
        ],
        other => bail!("unknown verification level `{other}` (expected structure-checksums, file-checksum, expandability, cross-toc, or all)"),
    })
}

fn level_name(level: VerifyLevel) -> &'static str {
    match level {
        VerifyLevel::StructureChecksums => "structure-checksums",
        VerifyLevel::FileChecksum => "file-checksum",
        VerifyLevel::ExpandabilityOfVectors => "expandability",
        VerifyLevel::CrossTocConsistency => "cross-toc",
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Verify { file, level } => {
            let levels = parse_level(&level)?;
            let stream = File::open(&file).with_context(|| format!("opening {}", file.display()))?;
            let mut frame_file = FrameFile::open_read(stream).context("reading frame header")?;
            while frame_file.next_frame().context("scanning frames")?.is_some() {}

            let mut ok = true;
            for level in levels {
                let report = frame_file.verify(level)?;
                if report.is_ok() {
                    println!("{}: ok", level_name(level));
                } else {
                    ok = false;
                    println!("{}: {} failure(s)", level_name(level), report.failures.len());
                    for failure in &report.failures {
                        println!("  offset {}: {}", failure.offset, failure.detail);
                    }
                }
            }
            if !ok {
                bail!("verification failed");
            }
        }

        Commands::DumpToc { file } => {
            let mut stream = File::open(&file).with_context(|| format!("opening {}", file.display()))?;
            let toc = read_toc(&mut stream)?;
            println!("frames: {}", toc.frame_count());
            println!("detectors: {}", toc.detectors.len());
            for name in toc.detectors.keys() {
                println!("  {name} @ {}", toc.detectors[name]);
            }
            for kind in [
                igwd_frame::toc::ChannelKind::Adc,
                igwd_frame::toc::ChannelKind::Proc,
                igwd_frame::toc::ChannelKind::Sim,
                igwd_frame::toc::ChannelKind::Ser,
                igwd_frame::toc::ChannelKind::Event,
                igwd_frame::toc::ChannelKind::SimEvent,
            ] {
                let names = toc.channel_names(kind);
                if names.is_empty() {
                    continue;
                }
                println!("{kind:?}:");
                for name in names {
                    let present = (0..toc.frame_count()).filter(|&i| toc.position(kind, i, name).is_some()).count();
                    println!("  {name}: present in {present}/{} frames", toc.frame_count());
                }
            }
        }

        Commands::Describe { name } => {
            let fields = framefile::describe_structure(&name)?;
            println!("{name}:");
            for field in fields {
                match field.comment {
                    Some(comment) => println!("  {} {}  // {comment}", field.type_string, field.name),
                    None => println!("  {} {}", field.type_string, field.name),
                }
            }
        }

        Commands::Convert { to_version, input, output } => {
            if !version::is_supported(to_version) {
                bail!("unsupported target version {to_version} (supported: {:?})", version::SUPPORTED_VERSIONS);
            }
            let in_stream = File::open(&input).with_context(|| format!("opening {}", input.display()))?;
            let out_stream = File::create(&output).with_context(|| format!("creating {}", output.display()))?;

            let mut reader = FrameFile::open_read(in_stream).context("reading frame header")?;
            let mut writer = FrameFile::open_write(out_stream, WriterOptions::default()).context("writing frame header")?;

            let mut converted = 0u64;
            while let Some(mut frame) = reader.next_frame().context("reading frame")? {
                convert_frame(&mut frame, to_version)?;
                writer.write_frame(&mut frame).context("writing converted frame")?;
                converted += 1;
            }
            reader.close().context("closing input")?;
            writer.close().context("closing output")?;
            println!("converted {converted} frame(s) to version {to_version}");
        }
    }

    Ok(())
}

fn convert_frame(frame: &mut Frame, to_version: u8) -> Result<()> {
    if to_version < version::CURRENT_VERSION {
        version::demote_frame(frame, to_version).context("demoting frame")?;
    } else {
        version::promote_frame(frame, to_version);
    }
    Ok(())
}

/// Locates and parses the TOC structure without going through
/// `FrameFile`, since `dump-toc` wants the structure even for a file the
/// caller never iterates with `next_frame`.
fn read_toc(stream: &mut File) -> Result<Toc> {
    use igwd_frame::header::FrHeader;
    use igwd_frame::stream::{read_structure, PayloadReader};
    use igwd_frame::structures::CLASS_ID_TOC;

    let total_len = stream.seek(SeekFrom::End(0))?;
    stream.seek(SeekFrom::Start(0))?;
    let mut buf = vec![0u8; total_len as usize];
    stream.read_exact(&mut buf)?;

    let mut pos = FrHeader::LEN as u64;
    let mut cursor = &buf[FrHeader::LEN..];
    loop {
        let raw = read_structure(&mut cursor, &mut pos)?;
        if raw.class_id == CLASS_ID_TOC {
            let mut r = PayloadReader::new(&raw.payload, raw.offset);
            return Ok(Toc::from_payload(&mut r)?);
        }
        if raw.class_id == igwd_frame::structures::CLASS_ID_EOF {
            bail!("file has no table of contents");
        }
    }
}
