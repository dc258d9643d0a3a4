use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crossterm::style::Stylize;
use phonemizer_core::{Phonemizer, StopType};

const USAGE: &str = "Usage: phonemize <database.json> <reference> [options]

  <reference>     \"2\", \"2:255\", \"1:1:1\" or a range like \"1:1:1-1:1:4\"

Options:
  --stop <names>  comma-separated pause selection: verse, preferred_continue,
                  preferred_stop, compulsory_stop, prohibited_stop,
                  optional_stop, embracing_stop (default: verse)
  --out <path>    also write the result as JSON
";

struct Args {
    db_path: PathBuf,
    reference: String,
    stops: Vec<StopType>,
    out: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut stops = Vec::new();
    let mut out = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--stop" => {
                let value = iter.next().ok_or("--stop needs a value")?;
                for name in value.split(',') {
                    stops.push(StopType::parse(name.trim()).map_err(|e| e.to_string())?);
                }
            }
            "--out" => {
                let value = iter.next().ok_or("--out needs a value")?;
                out = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(String::new()),
            _ => positional.push(arg),
        }
    }

    let [db_path, reference]: [String; 2] = positional.try_into().map_err(|_| {
        "expected exactly two arguments: <database.json> <reference>".to_string()
    })?;
    if stops.is_empty() {
        stops.push(StopType::Verse);
    }
    Ok(Args {
        db_path: PathBuf::from(db_path),
        reference,
        stops,
        out,
    })
}

fn run(args: &Args) -> phonemizer_core::Result<()> {
    let phonemizer = Phonemizer::with_bundled_tables(&args.db_path)?;
    let result = phonemizer.phonemize(&args.reference, &args.stops)?;

    println!("{}", format!("Reference: {}", result.reference).bold());
    for ((location, text), word) in result
        .locations
        .iter()
        .zip(&result.text)
        .zip(result.phonemes_nested())
    {
        println!(
            "  {}  {}  {}",
            location.key().dark_grey(),
            text.as_str().cyan(),
            word.join(" ").green()
        );
    }
    println!(
        "\n{} {}",
        "Joined:".bold(),
        result.joined("", " ", " | ")
    );

    if let Some(out) = &args.out {
        result.save(out)?;
        println!("Saved to {}", out.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("{}", format!("[ERROR] {message}").red());
            }
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    if !Path::new(&args.db_path).exists() {
        eprintln!(
            "{}",
            format!("[ERROR] database not found: {}", args.db_path.display()).red()
        );
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("[ERROR] {e}").red());
            ExitCode::FAILURE
        }
    }
}
