use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use monkey_lang::{
    syntax::ast::Stmt,
    syntax::lexer::Lexer,
    syntax::parser::Parser,
    EvalConfig, Session,
};
use tracing::debug;

const PROMPT: &str = ">> ";

fn main() -> ExitCode {
    init_tracing();

    let config = match parse_args(std::env::args().skip(1)) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("monkey: {msg}");
            eprintln!("usage: monkey [--max-depth <n>]");
            return ExitCode::from(2);
        }
    };
    debug!(max_call_depth = config.max_call_depth, "starting repl");

    match repl(Session::with_config(config), io::stdin().lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("monkey: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logging stays off unless `MONKEY_LOG` is set, e.g. `MONKEY_LOG=monkey_lang=trace`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("MONKEY_LOG").is_ok() {
        let filter = EnvFilter::from_env("MONKEY_LOG");
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true).with_level(true))
            .with(filter)
            .init();
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<EvalConfig, String> {
    let mut config = EvalConfig::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--max-depth" => {
                let raw = args.next().ok_or("`--max-depth` needs a value")?;
                let depth = raw.parse::<usize>()
                    .map_err(|_| format!("invalid `--max-depth` value: {raw}"))?;
                config = config.with_max_call_depth(depth);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(config)
}

// ─── Loop ─────────────────────────────────────────────────────────────────────

fn repl(mut session: Session, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next() else { break };
        for printed in run_line(&mut session, &line?) {
            writeln!(out, "{printed}")?;
        }
    }
    writeln!(out)?;
    Ok(())
}

/// Everything one input line prints, in order.
fn run_line(session: &mut Session, source: &str) -> Vec<String> {
    // ── Lex ───────────────────────────────────────────────────────────────────
    let tokens = match Lexer::new(source).tokenize() {
        Ok(t) => t,
        Err(errs) => return errs.iter().map(|e| format!("[lex] {e}")).collect(),
    };

    // ── Parse ─────────────────────────────────────────────────────────────────
    let program = match Parser::new(tokens).parse() {
        Ok(p) => p,
        Err(errs) => return errs.iter().map(|e| format!("[parse] {e}")).collect(),
    };

    // ── Eval ──────────────────────────────────────────────────────────────────
    let value = session.eval_program(&program);
    let mut printed = session.take_output();
    let ends_with_let = matches!(program.statements.last(), Some(Stmt::Let(_)));
    if !(ends_with_let && !value.is_error()) && !program.statements.is_empty() {
        printed.push(value.to_string());
    }
    printed
}
