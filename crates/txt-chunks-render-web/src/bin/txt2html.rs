use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use txt_chunks::{convert_file, ConvertError, ConvertRequest, RunEvent, TextEncoding};
use txt_chunks_render_web::{reader_template, ViewerConfig};

const DEFAULT_ENCODING: &str = "utf-8";

#[derive(Clone, Debug, PartialEq, Eq)]
struct Args {
    input: PathBuf,
    encoding_name: String,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();

    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(ConvertError::Usage) => {
            println!("{}", help_text());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), ConvertError> {
    let cli = parse_args(args)?;
    let encoding = TextEncoding::from_name(&cli.encoding_name)
        .ok_or_else(|| ConvertError::UnsupportedEncoding(cli.encoding_name.clone()))?;
    let template = reader_template(&ViewerConfig::default())?;
    let request = ConvertRequest::new(cli.input, encoding);

    let summary = convert_file(&request, &template, print_event)?;

    if summary.had_replacements {
        eprintln!(
            "warning: input contained bytes that are not valid {}; check the encoding argument",
            summary.encoding.label()
        );
    }
    println!(
        "done: {} files written to {}",
        summary.total_chunks(),
        summary.output_dir.display()
    );
    Ok(())
}

fn print_event(event: &RunEvent) {
    match event {
        RunEvent::Started {
            input, input_bytes, ..
        } => println!(
            "processing file: {} ({:.2} MB)",
            input.display(),
            *input_bytes as f64 / 1024.0 / 1024.0
        ),
        RunEvent::LinesCounted { .. } => {}
        RunEvent::ChunkWritten { path, bytes, .. } => println!(
            "generated: {} (~{:.2} KB)",
            path.display(),
            *bytes as f64 / 1024.0
        ),
    }
}

fn parse_args(args: Vec<String>) -> Result<Args, ConvertError> {
    let mut positional = args.into_iter().skip(1);
    let input = match positional.next() {
        Some(arg) if arg == "--help" || arg == "-h" => return Err(ConvertError::Usage),
        Some(arg) if !arg.is_empty() => PathBuf::from(arg),
        _ => return Err(ConvertError::Usage),
    };
    let encoding_name = positional
        .next()
        .unwrap_or_else(|| DEFAULT_ENCODING.to_string());
    Ok(Args {
        input,
        encoding_name,
    })
}

fn help_text() -> &'static str {
    r#"txt2html - split a large text file into size-bounded HTML reader pages

USAGE:
  txt2html <file> [encoding]

ARGUMENTS:
  <file>        text file to convert
  [encoding]    utf-8 (default), utf8, utf-16, utf16, utf-16le, utf-16be, gbk, ansi

OUTPUT:
  <file name>_html_chunks/<stem>_chunk_<N>.html in the current directory,
  each page at most ~1 MiB. The directory is recreated on every run.

EXAMPLE:
  txt2html document.txt gbk

Set RUST_LOG=debug to trace chunk decisions.
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn encoding_defaults_to_utf8() {
        let args = parse_args(argv(&["txt2html", "book.txt"])).expect("args parse");
        assert_eq!(args.input, PathBuf::from("book.txt"));
        assert_eq!(args.encoding_name, "utf-8");
    }

    #[test]
    fn second_positional_is_the_encoding() {
        let args = parse_args(argv(&["txt2html", "book.txt", "gbk"])).expect("args parse");
        assert_eq!(args.encoding_name, "gbk");
    }

    #[test]
    fn missing_path_or_help_is_a_usage_request() {
        assert!(matches!(
            parse_args(argv(&["txt2html"])),
            Err(ConvertError::Usage)
        ));
        assert!(matches!(
            parse_args(argv(&["txt2html", "--help"])),
            Err(ConvertError::Usage)
        ));
    }

    #[test]
    fn unknown_encoding_fails_before_any_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("a.txt");
        std::fs::write(&input, "hello\n").expect("write input");
        let err = run(argv(&[
            "txt2html",
            input.to_str().expect("utf-8 path"),
            "latin-1",
        ]))
        .expect_err("unsupported encoding");
        assert!(matches!(err, ConvertError::UnsupportedEncoding(ref name) if name == "latin-1"));
        assert!(!PathBuf::from("a.txt_html_chunks").exists());
    }
}
