use clap::Parser;
use marktoggle::buffer::char_len;
use marktoggle::config::load_registry;
use marktoggle::{CommandKey, EditorBuffer, FormatError, LineBuffer, Toggler, Token};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "marktoggle")]
#[command(about = "Toggle markdown formatting on a line of text", long_about = None)]
struct Args {
    /// Format command: h1, h2, h3, bold, italic, quote, oList, uList, link or image
    command: String,

    /// The line of text to edit
    line: String,

    /// Selection start (character offset)
    #[arg(long, default_value = "0")]
    start: usize,

    /// Selection end (character offset), defaults to the start
    #[arg(long)]
    end: Option<usize>,

    /// Token from the host tokenizer as START:END:CATEGORY, may be repeated
    #[arg(long = "token", value_name = "START:END:CATEGORY")]
    tokens: Vec<TokenArg>,

    /// Format config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the formats active at the cursor and whether COMMAND is one of them, without editing
    #[arg(long)]
    state: bool,
}

#[derive(Debug, Clone)]
struct TokenArg {
    start: usize,
    end: usize,
    category: String,
}

impl FromStr for TokenArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(start), Some(end), Some(category)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected START:END:CATEGORY, got '{}'", s));
        };

        let start = start
            .parse::<usize>()
            .map_err(|e| format!("invalid token start '{}': {}", start, e))?;
        let end = end
            .parse::<usize>()
            .map_err(|e| format!("invalid token end '{}': {}", end, e))?;
        if end < start {
            return Err(format!("token end {} is before its start {}", end, start));
        }

        Ok(TokenArg {
            start,
            end,
            category: category.to_string(),
        })
    }
}

fn run(args: Args) -> Result<(), String> {
    let registry = load_registry(args.config.as_deref()).map_err(|e| e.to_string())?;
    let toggler = Toggler::new(&registry);

    let len = char_len(&args.line);
    if args.start > len || args.end.is_some_and(|end| end > len) {
        return Err(format!("selection is outside the line (length {})", len));
    }

    let mut buffer = LineBuffer::new(&args.line);
    let tokens = args
        .tokens
        .iter()
        .map(|t| Token::from_line(&args.line, t.start, t.end, t.category.as_str()))
        .collect();
    buffer.set_line_tokens(0, tokens);
    buffer.select(0, args.start, args.end.unwrap_or(args.start));

    if args.state {
        let key: CommandKey = args.command.parse().map_err(|e: FormatError| e.to_string())?;
        let state = toggler.cursor_state(&buffer);
        if state.active.is_empty() {
            println!("(none)");
        } else {
            let names: Vec<&str> = state.active.iter().map(|key| key.name()).collect();
            println!("{}", names.join(" "));
        }
        let status = if state.is_active(key) { "active" } else { "inactive" };
        println!("{}: {}", key, status);
        return Ok(());
    }

    toggler
        .execute_str(&mut buffer, &args.command)
        .map_err(|e| e.to_string())?;

    let selection = buffer.selection();
    println!("{}", buffer.line(selection.start().line));
    println!("{}..{}", selection.start().ch, selection.end().ch);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
