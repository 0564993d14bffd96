//! Terminal stand-in for an editor host.
//!
//! Prompts are numbered lists on stderr answered from stdin; documents are
//! shown by printing their path and, when configured, handing it to an
//! external editor.

use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use notepad_core::{Editor, ShowOptions};
use tracing::{debug, warn};

pub struct TerminalEditor {
    /// Launched detached when focus stays in the terminal.
    background: Option<String>,
    /// Run in the foreground, and waited on, when the note takes focus.
    foreground: Option<String>,
}

impl TerminalEditor {
    pub fn new(background: Option<String>, foreground: Option<String>) -> Self {
        let non_blank = |cmd: Option<String>| cmd.filter(|c| !c.trim().is_empty());
        Self {
            background: non_blank(background),
            foreground: non_blank(foreground),
        }
    }
}

#[async_trait]
impl Editor for TerminalEditor {
    async fn prompt_select(&self, options: &[String], placeholder: &str) -> Option<String> {
        let options = options.to_vec();
        let placeholder = placeholder.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut prompt = io::stderr();
            choose_option(&options, &placeholder, &mut input, &mut prompt)
        })
        .await;

        match answer {
            Ok(Ok(choice)) => choice,
            Ok(Err(err)) => {
                warn!(%err, "cannot read selection");
                None
            }
            Err(err) => {
                warn!(%err, "selection prompt aborted");
                None
            }
        }
    }

    async fn show_document(&self, path: &Path, options: ShowOptions) -> Result<()> {
        if options.preserve_focus {
            println!("{}", path.display());
            if let Some(command) = &self.background {
                spawn_detached(command, path)?;
            }
            return Ok(());
        }

        match &self.foreground {
            Some(command) => run_foreground(command, path).await,
            None => {
                println!("{}", path.display());
                Ok(())
            }
        }
    }

    fn show_info(&self, message: &str) {
        eprintln!("{message}");
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// Print `options` as a numbered list and read one answer.
///
/// A number picks by position; an exact option text is accepted too.  An
/// empty line, `q`, end of input or anything unrecognised dismisses the
/// prompt.
pub fn choose_option(
    options: &[String],
    placeholder: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<Option<String>> {
    writeln!(output, "{placeholder}:")?;
    for (i, option) in options.iter().enumerate() {
        writeln!(output, "  {}) {option}", i + 1)?;
    }
    write!(output, "> ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
        return Ok(None);
    }

    if let Ok(n) = answer.parse::<usize>() {
        return Ok(n.checked_sub(1).and_then(|i| options.get(i)).cloned());
    }
    Ok(options.iter().find(|o| o.as_str() == answer).cloned())
}

/// Split an editor command line and append `path` as the last argument.
fn editor_argv(command: &str, path: &Path) -> Result<(String, Vec<OsString>)> {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("editor command is empty");
    };
    let mut args: Vec<OsString> = parts.map(OsString::from).collect();
    args.push(path.as_os_str().to_owned());
    Ok((program.to_string(), args))
}

fn spawn_detached(command: &str, path: &Path) -> Result<()> {
    let (program, args) = editor_argv(command, path)?;
    debug!(%program, path = %path.display(), "launching editor in background");
    tokio::process::Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("launch editor '{program}'"))?;
    Ok(())
}

async fn run_foreground(command: &str, path: &Path) -> Result<()> {
    let (program, args) = editor_argv(command, path)?;
    debug!(%program, path = %path.display(), "running editor");
    let status = tokio::process::Command::new(&program)
        .args(&args)
        .status()
        .await
        .with_context(|| format!("run editor '{program}'"))?;
    if !status.success() {
        bail!("editor '{program}' exited with {status}");
    }
    Ok(())
}
