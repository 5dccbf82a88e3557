// Interactive queue session
//
// One command per line on the input stream. Errors are printed and the loop
// carries on; only end of input or `quit` stops it.

use crate::render;
use anyhow::Result;
use colored::Colorize;
use exam_labels_core::application::LabelDeskService;
use exam_labels_core::domain::{PaperLabel, PaperToggles, QueueItemId};
use exam_labels_core::port::confirmation::FixedAnswer;
use exam_labels_core::port::{Confirmation, LabelRenderer};
use exam_labels_core::AppError;
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

const HELP: &str = "\
Commands:
  school                 list schools
  school find <text>     search schools by name
  school <id> | none     select / clear the school
  exam                   list exams
  exam <id> | none       select / clear the exam (loads its subjects)
  subject                list subjects of the selected exam
  subject <id>           select a subject
  papers <1 2 3> | none  choose papers for the next add
  count <n>              registered students for the next add
  add                    queue the selection (one item per paper)
  batch <paper>          queue every subject of the exam for one paper
  set <item-id> <n>      change a queued item's count
  rm <item-id>           remove a queued item
  list                   show the queue
  clear [--yes]          empty the queue
  print                  generate labels for the whole queue
  help                   this text
  quit                   leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListSchools,
    FindSchools(String),
    SelectSchool(i64),
    ClearSchool,
    ListExams,
    SelectExam(i64),
    DeselectExam,
    ListSubjects,
    SelectSubject(i64),
    Papers(PaperToggles),
    Count(String),
    Add,
    Batch(PaperLabel),
    Set { id: String, raw: String },
    Remove(String),
    List,
    Clear { yes: bool },
    Print,
    Help,
    Quit,
}

fn parse_id(raw: &str) -> std::result::Result<i64, String> {
    raw.parse()
        .map_err(|_| format!("expected a numeric id, got '{}'", raw))
}

fn parse_papers(raw: &str) -> std::result::Result<PaperToggles, String> {
    let mut toggles = PaperToggles::none();
    if raw.eq_ignore_ascii_case("none") {
        return Ok(toggles);
    }
    let tokens: Vec<&str> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err("usage: papers <1 2 3> | none".to_string());
    }
    for token in tokens {
        let paper = PaperLabel::from_str(token).map_err(|e| e.to_string())?;
        toggles.set(paper, true);
    }
    Ok(toggles)
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "school" | "schools" => match rest {
                "" => Ok(Command::ListSchools),
                "none" => Ok(Command::ClearSchool),
                _ => match rest.split_once(char::is_whitespace) {
                    Some(("find", query)) => Ok(Command::FindSchools(query.trim().to_string())),
                    _ if rest == "find" => Ok(Command::FindSchools(String::new())),
                    _ => parse_id(rest).map(Command::SelectSchool),
                },
            },
            "exam" | "exams" => match rest {
                "" => Ok(Command::ListExams),
                "none" => Ok(Command::DeselectExam),
                _ => parse_id(rest).map(Command::SelectExam),
            },
            "subject" | "subjects" => match rest {
                "" => Ok(Command::ListSubjects),
                _ => parse_id(rest).map(Command::SelectSubject),
            },
            "papers" | "paper" => parse_papers(rest).map(Command::Papers),
            "count" => Ok(Command::Count(rest.to_string())),
            "add" => Ok(Command::Add),
            "batch" => PaperLabel::from_str(rest)
                .map(Command::Batch)
                .map_err(|e| e.to_string()),
            "set" => match rest.split_once(char::is_whitespace) {
                Some((id, raw)) => Ok(Command::Set {
                    id: id.to_string(),
                    raw: raw.trim().to_string(),
                }),
                None => Err("usage: set <item-id> <count>".to_string()),
            },
            "rm" | "remove" => match rest {
                "" => Err("usage: rm <item-id>".to_string()),
                id => Ok(Command::Remove(id.to_string())),
            },
            "list" | "ls" => Ok(Command::List),
            "clear" => Ok(Command::Clear {
                yes: matches!(rest, "--yes" | "-y"),
            }),
            "print" | "generate" => Ok(Command::Print),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command '{}' (try `help`)", other)),
        }
    }
}

/// Yes/no prompt answered on the session's own input
struct PromptConfirmation<'a, R, W> {
    input: RefCell<&'a mut R>,
    output: RefCell<&'a mut W>,
}

impl<'a, R: BufRead, W: Write> PromptConfirmation<'a, R, W> {
    fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }
}

impl<R: BufRead, W: Write> Confirmation for PromptConfirmation<'_, R, W> {
    fn confirm(&self, prompt: &str) -> bool {
        let mut output = self.output.borrow_mut();
        if write!(output, "{} [y/N] ", prompt).and_then(|_| output.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        match self.input.borrow_mut().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

pub struct Session<R, W> {
    desk: LabelDeskService,
    renderer: Box<dyn LabelRenderer>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        desk: LabelDeskService,
        renderer: Box<dyn LabelRenderer>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            desk,
            renderer,
            input,
            output,
        }
    }

    #[cfg(test)]
    pub fn desk(&self) -> &LabelDeskService {
        &self.desk
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Read and execute commands until `quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "{}",
            "Exam envelope labels. Type `help` for commands.".cyan().bold()
        )?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(message) => {
                    writeln!(self.output, "{}", message.red())?;
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }

            debug!(command = ?command, "Session command");
            if let Err(e) = self.execute(command).await {
                writeln!(self.output, "{} {}", "error:".red().bold(), e)?;
            }
        }

        writeln!(self.output, "Bye.")?;
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::ListSchools => {
                let table = render::school_table(self.desk.catalog().schools());
                writeln!(self.output, "{}", table)?;
            }
            Command::FindSchools(query) => {
                let hits = self.desk.search_schools(&query);
                if hits.is_empty() {
                    writeln!(self.output, "{}", "No matching schools".yellow())?;
                } else {
                    writeln!(self.output, "{}", render::school_table(hits))?;
                }
            }
            Command::SelectSchool(id) => {
                let school = self.desk.select_school(id).await?;
                writeln!(
                    self.output,
                    "{} {} ({}, {})",
                    "School:".green().bold(),
                    school.name,
                    school.region,
                    school.division
                )?;
            }
            Command::ClearSchool => {
                self.desk.clear_school();
                writeln!(self.output, "School cleared")?;
            }
            Command::ListExams => {
                writeln!(self.output, "{}", render::exam_table(self.desk.catalog().exams()))?;
            }
            Command::SelectExam(id) => {
                let exam = self.desk.select_exam(id).await?;
                writeln!(
                    self.output,
                    "{} {} ({} papers, {} subjects)",
                    "Exam:".green().bold(),
                    exam.name,
                    exam.max_papers,
                    self.desk.catalog().subjects().len()
                )?;
            }
            Command::DeselectExam => {
                self.desk.deselect_exam();
                writeln!(self.output, "Exam cleared")?;
            }
            Command::ListSubjects => {
                if self.desk.selection().exam.is_none() {
                    return Err(AppError::MissingSelection(vec!["exam"]).into());
                }
                let table = render::subject_table(self.desk.catalog().subjects());
                writeln!(self.output, "{}", table)?;
            }
            Command::SelectSubject(id) => {
                let subject = self.desk.select_subject(id)?;
                writeln!(self.output, "{} {}", "Subject:".green().bold(), subject.name)?;
            }
            Command::Papers(toggles) => {
                self.desk.set_papers(toggles);
                let max_papers = self.desk.selection().exam.as_ref().map_or(3, |e| e.max_papers);
                let papers: Vec<String> = toggles
                    .selected(max_papers)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                writeln!(self.output, "Papers: {}", papers.join(", "))?;
            }
            Command::Count(raw) => {
                self.desk.set_student_count(raw);
            }
            Command::Add => {
                let ids = self.desk.add_to_queue()?;
                self.report_queued(&ids)?;
            }
            Command::Batch(paper) => {
                let ids = self.desk.batch_add(paper)?;
                self.report_queued(&ids)?;
            }
            Command::Set { id, raw } => match self.desk.update_count(&id, &raw) {
                Some(input) if input.was_coerced() => writeln!(
                    self.output,
                    "{}",
                    format!("'{}' is not a valid count; {} set to {}", raw, id, input.value())
                        .yellow()
                )?,
                Some(input) => writeln!(self.output, "{} count set to {}", id, input.value())?,
                None => return Err(AppError::NotFound(format!("queue item {}", id)).into()),
            },
            Command::Remove(id) => match self.desk.remove(&id) {
                Some(item) => writeln!(
                    self.output,
                    "Removed {} {} {}",
                    item.subject_name, item.paper, item.school_name
                )?,
                None => return Err(AppError::NotFound(format!("queue item {}", id)).into()),
            },
            Command::List => self.show_queue()?,
            Command::Clear { yes } => {
                let outcome = if yes {
                    self.desk.clear_queue(&FixedAnswer(true))
                } else {
                    let prompt = PromptConfirmation::new(&mut self.input, &mut self.output);
                    self.desk.clear_queue(&prompt)
                };
                match outcome {
                    Ok(removed) => writeln!(self.output, "Cleared {} item(s)", removed)?,
                    Err(AppError::ConfirmationDeclined) => {
                        writeln!(self.output, "{}", "Queue kept".yellow())?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Command::Print => {
                let labels = self.desk.generate(self.renderer.as_ref())?;
                writeln!(
                    self.output,
                    "{}",
                    format!("✓ {} label(s) generated", labels).green().bold()
                )?;
            }
            Command::Help => writeln!(self.output, "{}", HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn report_queued(&mut self, ids: &[QueueItemId]) -> Result<()> {
        writeln!(
            self.output,
            "{}",
            format!("✓ Queued {} item(s)", ids.len()).green().bold()
        )?;
        self.show_queue()
    }

    fn show_queue(&mut self) -> Result<()> {
        let queue = self.desk.queue();
        if queue.is_empty() {
            writeln!(self.output, "{}", "Queue is empty".yellow())?;
            return Ok(());
        }
        let summary = queue.summary();
        writeln!(self.output, "{}", render::queue_table(queue))?;
        writeln!(
            self.output,
            "{} item(s), {} label(s), {} registered",
            summary.items, summary.labels, summary.registered
        )?;
        Ok(())
    }
}
