use big4::{Archive, BigError};
use clap::{Parser, Subcommand};
use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "big4", version, about = "Inspect BIG4 archives and RefPack data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List an archive's entries in table order
    List { archive: PathBuf },
    /// Extract one entry, to stdout or to a file
    Extract {
        archive: PathBuf,
        entry: String,
        output: Option<PathBuf>,
        /// Write the stored bytes even when they are RefPack-compressed
        #[arg(long)]
        no_decompress: bool,
    },
    /// Compress or decompress a raw RefPack stream
    #[command(subcommand)]
    Codec(CodecCommand),
}

#[derive(Subcommand)]
enum CodecCommand {
    Compress { input: PathBuf, output: PathBuf },
    Decompress { input: PathBuf, output: PathBuf },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("big4: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), BigError> {
    match cli.command {
        Command::List { archive } => {
            let archive = Archive::from_file(archive)?;
            for (name, length) in archive.list() {
                println!("{length:>10}  {name}");
            }
        }
        Command::Extract {
            archive,
            entry,
            output,
            no_decompress,
        } => {
            let archive = Archive::from_file(archive)?;
            let data = if no_decompress {
                Cow::Borrowed(archive.get_raw(&entry)?)
            } else {
                archive.get(&entry)?
            };
            match output {
                Some(path) => fs::write(path, &data)?,
                None => io::stdout().write_all(&data)?,
            }
        }
        Command::Codec(CodecCommand::Compress { input, output }) => {
            let data = fs::read(input)?;
            fs::write(output, big4::encode(&data))?;
        }
        Command::Codec(CodecCommand::Decompress { input, output }) => {
            let data = fs::read(input)?;
            fs::write(output, big4::decode(&data)?)?;
        }
    }
    Ok(())
}
