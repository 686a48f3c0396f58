use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use konview_core::commands;
use konview_core::prelude::*;
use konview_utils::{info, init_logging, init_logging_with_level, LogFormat, LogLevel, LoggingGuard};

mod error;
mod transcript;

use error::CliResult;
use transcript::TranscriptHost;

/// Decode managed objects of a stopped Kotlin/Native process.
#[derive(Parser, Debug)]
#[command(name = "konview")]
#[command(version)]
#[command(about = "Decode managed objects of a stopped Kotlin/Native process from a debugger transcript", long_about = None)]
struct Cli
{
    /// Transcript recording what the debugger answered at the stop
    #[arg(short, long)]
    transcript: PathBuf,

    /// Log level (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Log format: pretty or json (overrides KONVIEW_LOG_FORMAT)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Symbol of the runtime's string class descriptor
    #[arg(long, default_value = konview_core::config::DEFAULT_STRING_CLASS_SYMBOL)]
    string_class: String,

    /// Byte bound for C strings returned by runtime queries
    #[arg(long, default_value_t = konview_core::config::DEFAULT_CSTRING_READ_LIMIT)]
    read_limit: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Show the collapsed rendering of a variable
    Render
    {
        /// Variable name
        var: String,
    },
    /// Show the full rendering of a variable and one line per child
    Expand
    {
        /// Variable name
        var: String,
    },
    /// Show the runtime type at a dotted field path (e.g. `point.label`)
    FieldType
    {
        /// Variable name followed by field names
        path: String,
    },
    /// List symbols whose name matches a regular expression at its start
    Symbols
    {
        /// Regular expression
        pattern: String,
    },
    /// List symbols starting at an address
    TypeByAddress
    {
        /// Address (hex format: 0x1000 or decimal)
        address: String,
    },
    /// List managed globals and their values
    Globals,
}

fn main()
{
    let cli = Cli::parse();

    let _guard = match start_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn start_logging(cli: &Cli) -> CliResult<LoggingGuard>
{
    let guard = match (cli.log_level, cli.log_format) {
        (None, None) => init_logging()?,
        (level, format) => init_logging_with_level(level.unwrap_or(LogLevel::Info), format.unwrap_or_default())?,
    };
    Ok(guard)
}

fn run(cli: Cli) -> CliResult<()>
{
    info!("Loading transcript {}", cli.transcript.display());
    let host = TranscriptHost::load(&cli.transcript)?;
    let config = EngineConfig::default()
        .with_string_class_symbol(cli.string_class)
        .with_cstring_read_limit(cli.read_limit);
    let mut session = Session::with_config(&host, config);

    for line in execute(&host, &mut session, &cli.command)? {
        println!("{line}");
    }
    Ok(())
}

/// Run one subcommand, returning the lines to print.
fn execute(host: &TranscriptHost, session: &mut Session<'_, TranscriptHost>, command: &Commands) -> CliResult<Vec<String>>
{
    let lines = match command {
        Commands::Render { var } => {
            let value = host.variable(var)?;
            vec![format!("({}) {} = {}", value.type_name, value.name, session.render(&value)?)]
        }
        Commands::Expand { var } => {
            let value = host.variable(var)?;
            let mut lines = vec![format!("({}) {} = {}", value.type_name, value.name, session.render_full(&value)?)];
            let mut provider = session.provide(&value)?;
            let count = provider.child_count(session)?;
            let shown = count.min(host.max_children()?);
            for index in 0..shown {
                let child = provider.child_at(session, index)?;
                let text = child.load(session)?.render(session)?;
                lines.push(format!("  [{index}] ({}) {} = {text}", child.kind, child.name));
            }
            if shown < count {
                lines.push(format!("  ... {} more", count - shown));
            }
            lines
        }
        Commands::FieldType { path } => vec![commands::field_type(session, path)?],
        Commands::Symbols { pattern } => commands::symbol_by_name(host, pattern)?
            .iter()
            .map(ToString::to_string)
            .collect(),
        Commands::TypeByAddress { address } => {
            let address = Address::parse(address)
                .ok_or_else(|| KonviewError::InvalidArgument(format!("`{address}` is not an address")))?;
            commands::type_by_address(host, address)
                .iter()
                .map(ToString::to_string)
                .collect()
        }
        Commands::Globals => commands::globals(session)?
            .iter()
            .map(ToString::to_string)
            .collect(),
    };
    Ok(lines)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::error::CliError;

    const DEMO: &str = include_str!("../demos/point.transcript");

    fn run_demo(command: Commands) -> CliResult<Vec<String>>
    {
        let host: TranscriptHost = DEMO.parse()?;
        let mut session = Session::new(&host);
        execute(&host, &mut session, &command)
    }

    #[test]
    fn test_cli_parses_flags()
    {
        let cli = Cli::try_parse_from([
            "konview",
            "--transcript",
            "stop.transcript",
            "--log-level",
            "trace",
            "--read-limit",
            "64",
            "render",
            "point",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Trace));
        assert_eq!(cli.read_limit, 64);
        assert_eq!(cli.string_class, "kclass:kotlin.String");
        assert!(matches!(cli.command, Commands::Render { ref var } if var == "point"));
    }

    #[test]
    fn test_render_object()
    {
        let lines = run_demo(Commands::Render { var: "point".to_string() }).unwrap();
        assert_eq!(lines, ["(ObjHeader *) point = x: ..., y: ..., label: ..."]);
    }

    #[test]
    fn test_expand_object()
    {
        let lines = run_demo(Commands::Expand { var: "point".to_string() }).unwrap();
        assert_eq!(
            lines,
            [
                "(ObjHeader *) point = [x: 3, y: -4, label: origin]",
                "  [0] (int32) x = 3",
                "  [1] (int32) y = -4",
                "  [2] (object) label = origin",
            ]
        );
    }

    #[test]
    fn test_expand_array()
    {
        let lines = run_demo(Commands::Expand { var: "items".to_string() }).unwrap();
        assert_eq!(lines[0], "(ObjHeader *) items = [10, 20]");
        assert_eq!(lines[2], "  [1] (int32) 1 = 20");
    }

    #[test]
    fn test_render_scalar_variable()
    {
        let lines = run_demo(Commands::Render { var: "count".to_string() }).unwrap();
        assert_eq!(lines, ["(int) count = 3"]);
    }

    #[test]
    fn test_field_type()
    {
        let lines = run_demo(Commands::FieldType { path: "point.label".to_string() }).unwrap();
        assert_eq!(lines, ["kotlin.String"]);
        let lines = run_demo(Commands::FieldType { path: "point.z".to_string() }).unwrap();
        assert_eq!(lines, [commands::NO_FIELD_FOUND]);
    }

    #[test]
    fn test_symbols_and_addresses()
    {
        let lines = run_demo(Commands::Symbols { pattern: "kvar:".to_string() }).unwrap();
        assert_eq!(lines, ["kvar:counter#internal: 0x5000", "kvar:unused#internal: 0x5200"]);
        let lines = run_demo(Commands::TypeByAddress { address: "0x7700".to_string() }).unwrap();
        assert_eq!(lines, ["kclass:kotlin.String: 0x7700"]);
        assert!(run_demo(Commands::TypeByAddress { address: "nowhere".to_string() }).is_err());
    }

    #[test]
    fn test_globals()
    {
        let lines = run_demo(Commands::Globals).unwrap();
        assert_eq!(lines, ["kotlin.Int counter: 42", "storage not found for name:unused"]);
    }

    #[test]
    fn test_unknown_variable()
    {
        let err = run_demo(Commands::Render { var: "missing".to_string() }).unwrap_err();
        assert!(matches!(err, CliError::UnknownVariable(_)));
    }
}
