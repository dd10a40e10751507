use std::future::Future;
use std::io::{self, Write};
use std::pin::Pin;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::search::{SearchController, SearchMode, SortOrder, Ticket};
use crate::service::{SearchBackend, SearchOutcome, ServiceClient, ServiceError};
use crate::view::format::render;
use crate::view::{LinkAction, pubmed_link};

const HELP: &str = "\
Type a query to search. Commands:
  :mode semantic|broad|exactTitle   change search mode
  :mesh on|off                      toggle MeSH query expansion
  :year YEAR | :year -              set or clear the year filter
  :journal NAME | :journal -        set or clear the journal filter
  :sort relevance|date              set the sort preference
  :expand ID                        show or hide a full abstract
  :open ID                          print the PubMed link of a result
  :show                             print the current results again
  :help                             this text
  :quit                             leave
";

#[derive(Debug, PartialEq)]
pub(super) enum Command {
    Search(String),
    Mode(SearchMode),
    Mesh(bool),
    Year(Option<i32>),
    Journal(Option<String>),
    Sort(SortOrder),
    Expand(usize),
    Open(usize),
    Show,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub(super) fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(':') else {
            return Command::Search(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "mode" => SearchMode::parse(arg)
                .map(Command::Mode)
                .unwrap_or_else(|| invalid("mode must be semantic, broad or exactTitle")),
            "mesh" => match arg {
                "on" | "true" | "yes" => Command::Mesh(true),
                "off" | "false" | "no" => Command::Mesh(false),
                _ => invalid("usage: :mesh on|off"),
            },
            "year" => match arg {
                "-" | "" => Command::Year(None),
                y => y
                    .parse()
                    .map(|y| Command::Year(Some(y)))
                    .unwrap_or_else(|_| invalid("year must be a number")),
            },
            "journal" => match arg {
                "-" | "" => Command::Journal(None),
                j => Command::Journal(Some(j.to_string())),
            },
            "sort" => SortOrder::parse(arg)
                .map(Command::Sort)
                .unwrap_or_else(|| invalid("sort must be relevance or date")),
            "expand" | "x" => parse_id(arg)
                .map(Command::Expand)
                .unwrap_or_else(|| invalid("usage: :expand ID")),
            "open" | "o" => parse_id(arg)
                .map(Command::Open)
                .unwrap_or_else(|| invalid("usage: :open ID")),
            "show" => Command::Show,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => Command::Invalid(format!("unknown command ':{other}' (try :help)")),
        }
    }
}

fn invalid(message: &str) -> Command {
    Command::Invalid(message.to_string())
}

fn parse_id(arg: &str) -> Option<usize> {
    arg.parse().ok().filter(|id| *id > 0)
}

type Completion = (Ticket, Result<SearchOutcome, ServiceError>);
type PendingSearch<'a> = Pin<Box<dyn Future<Output = Completion> + 'a>>;

/// Drive the controller from stdin until `:quit` or end of input.
pub(super) async fn run(client: ServiceClient, controller: SearchController) -> io::Result<()> {
    let mut out = io::stdout();
    write!(out, "{HELP}")?;
    session(BufReader::new(tokio::io::stdin()), &client, controller, &mut out).await
}

/// Read commands from `input` while at most one search is pending. A new
/// search drops the pending one, and so does `:quit`. At end of input the
/// pending search is awaited so its results are still shown.
async fn session<R, B, W>(
    input: R,
    backend: &B,
    mut controller: SearchController,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    B: SearchBackend,
    W: Write,
{
    let mut lines = input.split(b'\n');
    let mut in_flight: Option<PendingSearch<'_>> = None;

    loop {
        tokio::select! {
            segment = lines.next_segment() => {
                let Some(bytes) = segment? else {
                    if let Some(search) = in_flight.take() {
                        debug!("input closed, waiting for pending search");
                        let (ticket, result) = search.await;
                        if controller.complete(ticket, result) {
                            write!(out, "{}", render(&controller.render_context()))?;
                        }
                    }
                    break;
                };
                let line = match String::from_utf8(bytes) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "ignoring input line that is not valid UTF-8");
                        continue;
                    }
                };
                match Command::parse(&line) {
                    Command::Quit => break,
                    Command::Search(query) => {
                        let Some((ticket, request)) = controller.begin(&query) else {
                            continue;
                        };
                        if in_flight.take().is_some() {
                            debug!("dropping superseded search");
                        }
                        in_flight = Some(Box::pin(async move {
                            (ticket, backend.search(&request).await)
                        }));
                        write!(out, "{}", render(&controller.render_context()))?;
                    }
                    command => writeln!(out, "{}", apply(&mut controller, command))?,
                }
            }
            (ticket, result) = pending(in_flight.as_mut()) => {
                in_flight = None;
                if controller.complete(ticket, result) {
                    write!(out, "{}", render(&controller.render_context()))?;
                }
            }
        }
        out.flush()?;
    }

    out.flush()
}

/// Resolves with the pending search, or never when there is none.
async fn pending(search: Option<&mut PendingSearch<'_>>) -> Completion {
    match search {
        Some(search) => search.await,
        None => std::future::pending().await,
    }
}

/// Apply a non-search command and return the text to show.
fn apply(controller: &mut SearchController, command: Command) -> String {
    match command {
        Command::Mode(mode) => {
            controller.set_mode(mode);
            format!("mode: {}", mode.as_str())
        }
        Command::Mesh(on) => {
            controller.set_use_mesh(on);
            format!("MeSH expansion: {}", if on { "on" } else { "off" })
        }
        Command::Year(year) => {
            controller.filters_mut().year = year;
            describe_filters(controller)
        }
        Command::Journal(journal) => {
            controller.filters_mut().journal = journal;
            describe_filters(controller)
        }
        Command::Sort(sort) => {
            controller.filters_mut().sort = sort;
            describe_filters(controller)
        }
        Command::Expand(id) => {
            if !has_result(controller, id) {
                return format!("no result {id}");
            }
            controller.toggle_expanded(id);
            render(&controller.render_context())
        }
        Command::Open(id) => {
            let Some(result) = controller.outcome().results.iter().find(|r| r.id == id) else {
                return format!("no result {id}");
            };
            match pubmed_link(result) {
                LinkAction::Open(url) => url.to_string(),
                LinkAction::Disabled => format!("result {id} has no PubMed link"),
            }
        }
        Command::Show => format!(
            "{}\n{}",
            status_line(controller),
            render(&controller.render_context())
        ),
        Command::Help => HELP.to_string(),
        Command::Invalid(message) => message,
        Command::Search(_) | Command::Quit => String::new(),
    }
}

fn status_line(controller: &SearchController) -> String {
    let mut line = format!(
        "mode: {}, MeSH: {}",
        controller.mode().as_str(),
        if controller.use_mesh() { "on" } else { "off" }
    );
    if let Some(query) = controller.last_query() {
        line.push_str(&format!(", last query: \"{query}\""));
    }
    if controller.is_loading() {
        line.push_str(" (searching)");
    }
    line
}

fn has_result(controller: &SearchController, id: usize) -> bool {
    controller.outcome().results.iter().any(|r| r.id == id)
}

fn describe_filters(controller: &SearchController) -> String {
    match controller.filters().describe() {
        Some(desc) => format!("filters: {desc}"),
        None => "filters: none".to_string(),
    }
}
