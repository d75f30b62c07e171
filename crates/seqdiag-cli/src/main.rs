use seqdiag::render::{LayoutConfig, LayoutOptions, SvgRenderOptions};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Seqdiag(seqdiag::Error),
    Render(seqdiag_render::Error),
    Json(serde_json::Error),
    Config { path: String, err: serde_json::Error },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Seqdiag(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Config { path, err } => write!(f, "invalid config {path}: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<seqdiag::Error> for CliError {
    fn from(value: seqdiag::Error) -> Self {
        Self::Seqdiag(value)
    }
}

impl From<seqdiag_render::Error> for CliError {
    fn from(value: seqdiag_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    Parse,
    Layout,
    #[default]
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "seqdiag-cli\n\
\n\
USAGE:\n\
  seqdiag-cli parse [--pretty] [<path>|-]\n\
  seqdiag-cli layout [--pretty] [--config <file.json>] [<path>|-]\n\
  seqdiag-cli [render] [--config <file.json>] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - parse prints the diagram model as JSON; layout prints the layout snapshot.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - --config reads a JSON object of layout sizes (cellsize, node_width, ...).\n\
  - Set RUST_LOG (e.g. RUST_LOG=debug) to see diagnostics beyond warnings.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn read_config(path: Option<&str>) -> Result<LayoutConfig, CliError> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|err| CliError::Config {
        path: path.to_string(),
        err,
    })
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let diagram = seqdiag::parse_and_build(&text)?;
    tracing::debug!(
        participants = diagram.participants.len(),
        messages = diagram.messages.len(),
        warnings = diagram.warnings.len(),
        "built diagram"
    );

    if let Command::Parse = args.command {
        return write_json(&diagram, args.pretty);
    }

    let layout_options = LayoutOptions {
        config: read_config(args.config.as_deref())?,
        ..LayoutOptions::default()
    };
    let layout = seqdiag::render::layout_diagram(&diagram, &layout_options)?;

    match args.command {
        Command::Parse => Ok(()),
        Command::Layout => write_json(&layout, args.pretty),
        Command::Render => {
            let svg = seqdiag::render::render_layout_svg(&layout, &SvgRenderOptions::default());
            write_text(&svg, args.out.as_deref())
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("seqdiag-cli")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn render_is_the_default_command() {
        let args = parse_args(&argv(&["input.diag"])).unwrap();
        assert!(matches!(args.command, Command::Render));
        assert_eq!(args.input.as_deref(), Some("input.diag"));
    }

    #[test]
    fn flags_and_command_are_collected() {
        let args = parse_args(&argv(&["layout", "--pretty", "--config", "c.json", "-"])).unwrap();
        assert!(matches!(args.command, Command::Layout));
        assert!(args.pretty);
        assert_eq!(args.config.as_deref(), Some("c.json"));
        assert_eq!(args.input.as_deref(), Some("-"));
    }

    #[test]
    fn unknown_flags_and_extra_inputs_are_usage_errors() {
        assert!(matches!(
            parse_args(&argv(&["--bogus"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["a.diag", "b.diag"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["--out"])),
            Err(CliError::Usage(_))
        ));
    }
}
