//! Line-oriented interactive front-end.
//!
//! Plain input sets the query text and submits it. Lines starting with `:`
//! are commands (see [`help_text`]).

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::session::{SessionHandle, Submission};
use crate::ui::render::{SEARCHING, format_facets, format_history, format_session};
use crate::ui::shortcuts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Search(String),
    Facet(String),
    Facets,
    Clear,
    History,
    /// 1-based history position.
    Recall(usize),
    Forget,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return ShellCommand::Empty;
    }
    if !line.starts_with(':') {
        return ShellCommand::Search(line.to_string());
    }
    let trimmed = line.trim();
    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (trimmed, ""),
    };
    match cmd {
        shortcuts::FACET if !arg.is_empty() => ShellCommand::Facet(arg.to_string()),
        shortcuts::FACET | shortcuts::FACETS => ShellCommand::Facets,
        shortcuts::CLEAR => ShellCommand::Clear,
        shortcuts::HISTORY => ShellCommand::History,
        shortcuts::RECALL => match arg.parse::<usize>() {
            Ok(n) if n > 0 => ShellCommand::Recall(n),
            _ => ShellCommand::Unknown(trimmed.to_string()),
        },
        shortcuts::FORGET => ShellCommand::Forget,
        shortcuts::HELP => ShellCommand::Help,
        shortcuts::QUIT | shortcuts::QUIT_SHORT => ShellCommand::Quit,
        _ => ShellCommand::Unknown(trimmed.to_string()),
    }
}

pub fn help_text() -> String {
    [
        ("<text>", "search for <text>"),
        (shortcuts::FACET, "<name> switch facet (`all` for every category)"),
        (shortcuts::FACETS, "list facets"),
        (shortcuts::CLEAR, "reset query, facet and results"),
        (shortcuts::HISTORY, "show recent searches"),
        (shortcuts::RECALL, "<n> re-run recent search #n"),
        (shortcuts::FORGET, "erase recent searches"),
        (shortcuts::HELP, "this help"),
        (shortcuts::QUIT, "exit"),
    ]
    .iter()
    .map(|(cmd, desc)| format!("  {cmd:<10} {desc}\n"))
    .collect()
}

/// Drive `handle` from `input` until EOF or `:quit`.
pub async fn run_shell<R, W>(handle: &SessionHandle, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let banner = handle.read(|s| {
        format!(
            "{} records, {} categories. {} for commands.\n",
            s.corpus().len(),
            s.corpus().categories().len(),
            shortcuts::HELP
        )
    });
    out.write_all(banner.as_bytes()).await?;
    out.flush().await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = parse_line(&line);
        tracing::debug!(?command, "shell command");
        let reply = match command {
            ShellCommand::Quit => break,
            ShellCommand::Empty => continue,
            ShellCommand::Search(text) => {
                handle.on_text_change(text);
                settle(handle, handle.on_submit(), out).await?
            }
            ShellCommand::Facet(name) => {
                match handle.read(|s| s.corpus().parse_facet(&name)) {
                    Ok(facet) => settle(handle, handle.on_facet_change(facet), out).await?,
                    Err(err) => format!("{err}\n"),
                }
            }
            ShellCommand::Facets => {
                handle.read(|s| format_facets(s.corpus(), &s.query().facet))
            }
            ShellCommand::Clear => {
                handle.on_clear();
                handle.read(format_session)
            }
            ShellCommand::History => handle.read(|s| format_history(s.history().entries())),
            ShellCommand::Recall(n) => {
                let entry = handle.read(|s| s.history().get(n - 1).map(str::to_string));
                match entry {
                    Some(text) => settle(handle, handle.on_history_item_click(&text), out).await?,
                    None => format!("no recent search #{n}\n"),
                }
            }
            ShellCommand::Forget => {
                handle.update(|s| s.history_mut().clear());
                "recent searches cleared\n".to_string()
            }
            ShellCommand::Help => help_text(),
            ShellCommand::Unknown(raw) => {
                format!("unknown command `{raw}` ({} for commands)\n", shortcuts::HELP)
            }
        };
        out.write_all(reply.as_bytes()).await?;
        out.flush().await?;
    }
    Ok(())
}

/// Wait for a submission, showing the pending line meanwhile, then render.
async fn settle<W>(handle: &SessionHandle, submission: Submission, out: &mut W) -> Result<String>
where
    W: AsyncWrite + Unpin,
{
    if submission.is_scheduled() {
        out.write_all(format!("{SEARCHING}\n").as_bytes()).await?;
        out.flush().await?;
    }
    submission.settled().await;
    Ok(handle.read(format_session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::SearchHistory;
    use crate::model::types::Corpus;
    use crate::session::{Latency, SearchSession};
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn handle(latency: Latency) -> SessionHandle {
        let session = SearchSession::new(
            Arc::new(Corpus::sample().unwrap()),
            SearchHistory::load(Arc::new(MemoryStore::new())),
        );
        SessionHandle::new(session, latency)
    }

    #[test]
    fn parses_commands_and_plain_queries() {
        assert_eq!(parse_line("React"), ShellCommand::Search("React".into()));
        assert_eq!(
            parse_line("  spaced query "),
            ShellCommand::Search("  spaced query ".into())
        );
        assert_eq!(parse_line("   "), ShellCommand::Empty);
        assert_eq!(
            parse_line(":facet デザイン"),
            ShellCommand::Facet("デザイン".into())
        );
        assert_eq!(parse_line(":facet"), ShellCommand::Facets);
        assert_eq!(parse_line(":recall 2"), ShellCommand::Recall(2));
        assert!(matches!(parse_line(":recall 0"), ShellCommand::Unknown(_)));
        assert_eq!(parse_line(":q"), ShellCommand::Quit);
        assert!(matches!(parse_line(":nope"), ShellCommand::Unknown(_)));
    }

    #[test]
    fn help_mentions_every_command() {
        let help = help_text();
        for cmd in [
            shortcuts::FACET,
            shortcuts::CLEAR,
            shortcuts::HISTORY,
            shortcuts::RECALL,
            shortcuts::QUIT,
        ] {
            assert!(help.contains(cmd), "help missing {cmd}");
        }
    }

    #[tokio::test]
    async fn scripted_session_searches_filters_and_recalls() {
        let handle = handle(Latency::Immediate);
        let script = "React\n:facet デザイン\n:clear\nTypeScript\n:history\n:recall 2\n:quit\nignored\n";
        let mut out: Vec<u8> = Vec::new();
        run_shell(&handle, script.as_bytes(), &mut out).await.unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with("8 records, 4 categories."));
        assert!(out.contains("1 result for 「React」"));
        assert!(out.contains("0 results for 「React」"));
        assert!(out.contains("  1. TypeScript\n  2. React\n"));
        assert!(!out.contains("ignored"));
        handle.read(|s| {
            assert_eq!(s.query().text, "React");
            assert_eq!(s.results().ids(s.corpus()), vec![1]);
            assert_eq!(s.history().entries(), ["React", "TypeScript"]);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_search_prints_pending_line_first() {
        let handle = handle(Latency::from_millis(500));
        let mut out: Vec<u8> = Vec::new();
        run_shell(&handle, "rdbms\n".as_bytes(), &mut out).await.unwrap();
        let out = String::from_utf8(out).unwrap();
        let pending = out.find(SEARCHING).expect("pending line");
        let summary = out.find("1 result for 「rdbms」").expect("summary");
        assert!(pending < summary);
    }

    #[tokio::test]
    async fn unknown_facet_and_missing_recall_are_reported() {
        let handle = handle(Latency::Immediate);
        let mut out: Vec<u8> = Vec::new();
        run_shell(&handle, ":facet music\n:recall 3\n".as_bytes(), &mut out)
            .await
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("unknown facet `music`"));
        assert!(out.contains("no recent search #3"));
    }
}
