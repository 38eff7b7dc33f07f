//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! The REPL is a workbench of three independent flows, one per feature.
//! `use` switches which one the other commands act on; each keeps its own
//! document and last result.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lendlens_analyzer::{
    AnalysisKind, Analyzer, AppraisalFlow, CreditFlow, FlowState, NormalizedResult, Outcome,
    SubmitOutcome, TitleFlow,
};
use lendlens_domain::{AnalysisProvider, DocumentClass};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::path::PathBuf;

/// Run the interactive REPL.
pub async fn run_repl<P>(analyzer: Analyzer<P>, config: &Config, formatter: &Formatter) -> Result<()>
where
    P: AnalysisProvider + Send + Sync + 'static,
    P::Error: Display,
{
    println!("{}", formatter.info("LendLens REPL - Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map(|builder| builder.build())
        .map_err(editor_error)?;
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut workbench = Workbench::new(analyzer);

    loop {
        let prompt = format!("lendlens [{}]> ", workbench.active());

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => match workbench.execute(cmd, formatter).await {
                        Ok(output) => println!("{}", output),
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    /// Leave the REPL
    Exit,
    /// Print the command list
    Help,
    /// Switch the active feature
    Use(DocumentClass),
    /// Select a document for the active feature
    Open {
        /// File to load
        path: PathBuf,
        /// MIME type override
        mime: Option<String>,
    },
    /// Submit the active feature's document
    Submit,
    /// Reset the active feature
    Clear,
    /// Show every feature's state
    Status,
    /// Re-render the active feature's last outcome
    Show,
}

/// Parse a REPL command line.
pub fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "use" => {
            let name = parts.get(1).ok_or_else(|| {
                CliError::InvalidInput("Usage: use <credit|appraisal|title>".to_string())
            })?;
            DocumentClass::parse(name)
                .map(ReplCommand::Use)
                .ok_or_else(|| CliError::InvalidInput(format!("Unknown feature: {}", name)))
        }
        "open" => {
            let rest = line.trim_start()[parts[0].len()..].trim();
            parse_open_args(rest)
        }
        "submit" => Ok(ReplCommand::Submit),
        "clear" => Ok(ReplCommand::Clear),
        "status" => Ok(ReplCommand::Status),
        "show" => Ok(ReplCommand::Show),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

/// Parse `<path> [mime]`, where a path with spaces is wrapped in quotes.
fn parse_open_args(args: &str) -> Result<ReplCommand> {
    let usage = || CliError::InvalidInput("Usage: open <path> [mime]".to_string());

    let (path, rest) = match args.chars().next() {
        None => return Err(usage()),
        Some(quote @ ('"' | '\'')) => {
            let body = &args[1..];
            let end = body.find(quote).ok_or_else(|| {
                CliError::InvalidInput(format!("Unterminated {} in path", quote))
            })?;
            (&body[..end], &body[end + 1..])
        }
        Some(_) => args.split_once(char::is_whitespace).unwrap_or((args, "")),
    };

    if path.is_empty() {
        return Err(usage());
    }

    let mut extra = rest.split_whitespace();
    let mime = extra.next().map(str::to_string);
    if extra.next().is_some() {
        return Err(usage());
    }

    Ok(ReplCommand::Open {
        path: PathBuf::from(path),
        mime,
    })
}

/// The three feature flows plus which one is active.
pub struct Workbench<P> {
    credit: CreditFlow<P>,
    appraisal: AppraisalFlow<P>,
    title: TitleFlow<P>,
    active: DocumentClass,
}

impl<P> Workbench<P>
where
    P: AnalysisProvider + Send + Sync + 'static,
    P::Error: Display,
{
    /// Create a workbench with all flows idle and Credit active.
    pub fn new(analyzer: Analyzer<P>) -> Self {
        Self {
            credit: CreditFlow::new(analyzer.clone()),
            appraisal: AppraisalFlow::new(analyzer.clone()),
            title: TitleFlow::new(analyzer),
            active: DocumentClass::Credit,
        }
    }

    /// Feature the commands act on.
    pub fn active(&self) -> DocumentClass {
        self.active
    }

    /// State of one feature's flow.
    pub fn state(&self, class: DocumentClass) -> FlowState {
        match class {
            DocumentClass::Credit => self.credit.state(),
            DocumentClass::Appraisal => self.appraisal.state(),
            DocumentClass::Title => self.title.state(),
        }
    }

    /// Run a command and return what to print.
    pub async fn execute(&mut self, cmd: ReplCommand, formatter: &Formatter) -> Result<String> {
        match cmd {
            ReplCommand::Use(class) => {
                self.active = class;
                Ok(formatter.info(&format!("Using {}", class.feature_title())))
            }
            ReplCommand::Open { path, mime } => self.open(path, mime, formatter).await,
            ReplCommand::Submit => self.submit(formatter).await,
            ReplCommand::Clear => {
                self.clear();
                Ok(formatter.success(&format!("Cleared {}", self.active.feature_title())))
            }
            ReplCommand::Status => Ok(self.status(formatter)),
            ReplCommand::Show => self.show(formatter),
            ReplCommand::Exit | ReplCommand::Help => Ok(String::new()),
        }
    }

    async fn open(&self, path: PathBuf, mime: Option<String>, formatter: &Formatter) -> Result<String> {
        let mime = mime.as_deref();
        let document = match self.active {
            DocumentClass::Credit => {
                self.credit.select_path(&path, mime).await?;
                self.credit.document()
            }
            DocumentClass::Appraisal => {
                self.appraisal.select_path(&path, mime).await?;
                self.appraisal.document()
            }
            DocumentClass::Title => {
                self.title.select_path(&path, mime).await?;
                self.title.document()
            }
        };

        let message = match document {
            Some(doc) => format!("Selected {} ({}, {} bytes)", doc.file_name, doc.mime_type, doc.size),
            None => format!("Selected {}", path.display()),
        };
        Ok(formatter.success(&message))
    }

    async fn submit(&self, formatter: &Formatter) -> Result<String> {
        let outcome = match self.active {
            DocumentClass::Credit => self.credit.submit().await.map(AnalysisKind::into_result),
            DocumentClass::Appraisal => self.appraisal.submit().await.map(AnalysisKind::into_result),
            DocumentClass::Title => self.title.submit().await.map(AnalysisKind::into_result),
        };
        let noun = self.active.noun();

        match outcome {
            SubmitOutcome::NoDocument => Ok(formatter.warning(&format!(
                "No {} selected. Use 'open <path>' first.",
                noun
            ))),
            SubmitOutcome::Rejected => Ok(formatter.warning(&format!(
                "A {} is already being analyzed.",
                noun
            ))),
            SubmitOutcome::Superseded => {
                Ok(formatter.info("Result discarded because the feature was cleared"))
            }
            SubmitOutcome::Completed(outcome) => render_outcome(&outcome, formatter),
        }
    }

    fn clear(&self) {
        match self.active {
            DocumentClass::Credit => self.credit.clear(),
            DocumentClass::Appraisal => self.appraisal.clear(),
            DocumentClass::Title => self.title.clear(),
        }
    }

    fn status(&self, formatter: &Formatter) -> String {
        let lines = [
            formatter.flow_status(&self.credit.snapshot(), self.active == DocumentClass::Credit),
            formatter.flow_status(
                &self.appraisal.snapshot(),
                self.active == DocumentClass::Appraisal,
            ),
            formatter.flow_status(&self.title.snapshot(), self.active == DocumentClass::Title),
        ];
        lines.join("\n")
    }

    fn show(&self, formatter: &Formatter) -> Result<String> {
        let outcome = match self.active {
            DocumentClass::Credit => self.credit.outcome().map(|o| o.map(AnalysisKind::into_result)),
            DocumentClass::Appraisal => {
                self.appraisal.outcome().map(|o| o.map(AnalysisKind::into_result))
            }
            DocumentClass::Title => self.title.outcome().map(|o| o.map(AnalysisKind::into_result)),
        };

        match outcome {
            Some(outcome) => render_outcome(&outcome, formatter),
            None => Ok(formatter.info(&format!(
                "No result yet for {}",
                self.active.feature_title()
            ))),
        }
    }
}

fn render_outcome(outcome: &Outcome<NormalizedResult>, formatter: &Formatter) -> Result<String> {
    match outcome {
        Outcome::Succeeded(result) => formatter.format_result(result),
        Outcome::Failed(err) => Ok(formatter.error(&err.to_string())),
    }
}

fn editor_error(err: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        err
    )))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  use <credit|appraisal|title>  - Switch the active feature");
    println!("  open <path> [mime]            - Select a PDF or XML document (quote paths with spaces)");
    println!("  submit                        - Analyze the selected document");
    println!("  show                          - Show the last result again");
    println!("  clear                         - Discard document and result");
    println!("  status                        - Show every feature's state");
    println!("  help, ?                       - Show this help");
    println!("  exit, quit, q                 - Exit REPL");
    println!();
}
