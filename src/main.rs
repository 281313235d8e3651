//! lumo-sign - Command-line front end for Lumo request signing.

use std::collections::HashMap;
use std::env;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use tracing::{debug, error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lumo_signing::config::Settings;
use lumo_signing::error::SigningResult;
use lumo_signing::signature::{derive_key, sign, HeaderBuilder, SignatureHeaders};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

/// Exit code for a signature that did not verify.
const EXIT_INVALID: u8 = 1;
/// Exit code for usage, configuration or signing errors.
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let invocation = match parse_args(&args) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run '{} --help' for usage.", NAME);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let command = match invocation.command {
        Command::Help => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("{} {}", NAME, VERSION);
            return ExitCode::SUCCESS;
        }
        command => command,
    };

    let settings = match &invocation.config_path {
        Some(path) => match Settings::load(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading configuration: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        },
        None => Settings::default(),
    };

    if let Err(e) = init_logging(&settings) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    if let Some(path) = &invocation.config_path {
        info!("Configuration loaded from: {}", path);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run(command, &settings, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_INVALID),
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// A parsed command line.
#[derive(Debug, PartialEq)]
struct Invocation {
    config_path: Option<String>,
    command: Command,
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Version,
    Headers {
        text: String,
    },
    Sign {
        key: String,
        text: String,
    },
    DeriveKey {
        timestamp: String,
        nonce: String,
        text: String,
    },
    Verify {
        timestamp: String,
        nonce: String,
        signature: String,
        text: String,
    },
}

/// Execute a command. Returns `false` only for a failed verification.
///
/// `input` supplies the text when it is given as `-`; results go to `output`.
fn run(
    command: Command,
    settings: &Settings,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> SigningResult<bool> {
    match command {
        Command::Headers { text } => {
            let text = resolve_text(text, input)?;
            let headers = HeaderBuilder::from_settings(&settings.signing).build(&text)?;
            writeln!(output, "{}", serde_json::to_string_pretty(&headers)?)?;
            Ok(true)
        }
        Command::Sign { key, text } => {
            let text = resolve_text(text, input)?;
            writeln!(output, "{}", sign(&text, &key)?)?;
            Ok(true)
        }
        Command::DeriveKey {
            timestamp,
            nonce,
            text,
        } => {
            let text = resolve_text(text, input)?;
            writeln!(output, "{}", derive_key(&text, &timestamp, &nonce))?;
            Ok(true)
        }
        Command::Verify {
            timestamp,
            nonce,
            signature,
            text,
        } => {
            let text = resolve_text(text, input)?;
            let headers = SignatureHeaders {
                timestamp: timestamp.into(),
                nonce,
                signature,
            };
            let valid = headers.verify(&text)?;
            debug!(valid, "Verification finished");
            writeln!(output, "{}", if valid { "valid" } else { "invalid" })?;
            Ok(valid)
        }
        Command::Help | Command::Version => Ok(true),
    }
}

/// `-` means read the text from `input`, unmodified.
fn resolve_text(text: String, input: &mut dyn Read) -> SigningResult<String> {
    if text != "-" {
        return Ok(text);
    }
    let mut buf = String::new();
    input.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Parse command line arguments (simple std::env approach).
fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut config_path = None;
    let mut options: HashMap<&'static str, String> = HashMap::new();
    let mut positionals: Vec<String> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        // Everything after `--` is text, even if it starts with a dash.
        if arg == "--" {
            positionals.extend(iter.by_ref().cloned());
            break;
        }
        if arg == "--help" || arg == "-h" {
            return Ok(Invocation {
                config_path,
                command: Command::Help,
            });
        }
        if arg == "--version" || arg == "-V" {
            return Ok(Invocation {
                config_path,
                command: Command::Version,
            });
        }

        let (flag, inline_value) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg.as_str(), None),
        };

        let name = match flag {
            "-c" | "--config" => "config",
            "--key" => "key",
            "--timestamp" => "timestamp",
            "--nonce" => "nonce",
            "--signature" => "signature",
            _ if flag.starts_with('-') && flag != "-" => {
                return Err(format!("unknown option '{}'", flag));
            }
            _ => {
                positionals.push(arg.clone());
                continue;
            }
        };

        let value = match inline_value {
            Some(v) => v,
            None => iter
                .next()
                .cloned()
                .ok_or_else(|| format!("option '{}' requires a value", flag))?,
        };

        if name == "config" {
            config_path = Some(value);
        } else {
            options.insert(name, value);
        }
    }

    let mut positionals = positionals.into_iter();
    let subcommand = positionals
        .next()
        .ok_or_else(|| "missing command".to_string())?;
    let text = positionals
        .next()
        .ok_or_else(|| format!("command '{}' requires TEXT", subcommand))?;
    if let Some(extra) = positionals.next() {
        return Err(format!("unexpected argument '{}'", extra));
    }

    let mut take = |name: &'static str| {
        options
            .remove(name)
            .ok_or_else(|| format!("command '{}' requires --{}", subcommand, name))
    };

    let command = match subcommand.as_str() {
        "headers" => Command::Headers { text },
        "sign" => Command::Sign {
            key: take("key")?,
            text,
        },
        "derive-key" => Command::DeriveKey {
            timestamp: take("timestamp")?,
            nonce: take("nonce")?,
            text,
        },
        "verify" => Command::Verify {
            timestamp: take("timestamp")?,
            nonce: take("nonce")?,
            signature: take("signature")?,
            text,
        },
        other => return Err(format!("unknown command '{}'", other)),
    };

    if let Some(name) = options.keys().next() {
        return Err(format!(
            "option '--{}' is not used by '{}'",
            name, subcommand
        ));
    }

    Ok(Invocation {
        config_path,
        command,
    })
}

/// Print help message.
fn print_help() {
    println!(
        r#"{} {}
Sign and verify request text with Timestamp/Nonce/Signature headers.

USAGE:
    {} [OPTIONS] <COMMAND> <TEXT>

COMMANDS:
    headers <TEXT>                         Print Timestamp, Nonce and Signature as JSON
    sign --key <KEY> <TEXT>                Print base64 HMAC-SHA256 of TEXT under KEY
    derive-key --timestamp <T> --nonce <N> <TEXT>
                                           Print the per-request key
    verify --timestamp <T> --nonce <N> --signature <S> <TEXT>
                                           Check a received signature (exit 1 if invalid)

    TEXT of '-' is read from stdin. Arguments after '--' are always TEXT.

OPTIONS:
    -c, --config <PATH>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information
"#,
        NAME, VERSION, NAME
    );
}

/// Initialize logging based on settings.
///
/// Logs go to stderr so stdout only carries command output.
fn init_logging(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
