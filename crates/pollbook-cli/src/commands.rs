use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use pollbook_sdk::{FileStore, Poll, PollId, Pollbook, PollbookConfig, TallyRow};
use tracing::debug;

use crate::cli::*;

type Book = Pollbook<FileStore>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    debug!(store = %config.store_path.display(), "opening poll store");
    let mut book = Pollbook::open_file(config).context("failed to open poll store")?;
    let json = matches!(cli.format, OutputFormat::Json);

    match cli.command {
        Command::Create(args) => cmd_create(&mut book, args, json),
        Command::List(_) => cmd_list(&book, json),
        Command::Show(args) => cmd_show(&mut book, args, json),
        Command::Vote(args) => cmd_vote(&book, args, json),
        Command::Reset(args) => cmd_reset(&book, args, json),
        Command::Delete(args) => cmd_delete(&mut book, args),
        Command::Theme(args) => cmd_theme(&book, args, json),
    }
}

/// Config file first, then `--store` / `POLLBOOK_STORE` on top.
fn resolve_config(cli: &Cli) -> anyhow::Result<PollbookConfig> {
    let config = match &cli.config {
        Some(path) => PollbookConfig::load(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => PollbookConfig::default(),
    };
    Ok(match &cli.store {
        Some(path) => config.with_store_path(path),
        None => config,
    })
}

fn cmd_create(book: &mut Book, args: CreateArgs, json: bool) -> anyhow::Result<()> {
    let poll = book.create_poll(&args.question, &args.options, args.multiple, args.max)?;
    if json {
        return print_json(&poll);
    }
    println!("{} Created poll {}", "✓".green().bold(), poll.id().to_string().yellow());
    print_poll(book, &poll)
}

fn cmd_list(book: &Book, json: bool) -> anyhow::Result<()> {
    let polls = book.polls();
    if json {
        return print_json(&polls);
    }
    if polls.is_empty() {
        println!("No polls yet.");
        return Ok(());
    }
    for poll in polls.iter() {
        let marker = if book.has_voted(poll.id())? { "✓".green() } else { " ".normal() };
        println!(
            "{} {}  {}  {}",
            marker,
            poll.id().to_string().yellow(),
            format_local(poll.created_at()).dimmed(),
            poll.question().bold(),
        );
    }
    Ok(())
}

fn cmd_show(book: &mut Book, args: ShowArgs, json: bool) -> anyhow::Result<()> {
    let poll = book.select_poll(&parse_id(&args.id)?)?;
    if json {
        return print_json(&poll);
    }
    print_poll(book, &poll)
}

fn cmd_vote(book: &Book, args: VoteArgs, json: bool) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let indices = to_zero_based(&args.choices)?;
    let poll = book.vote(&id, &indices)?;
    if json {
        return print_json(&book.tally(&id)?);
    }
    println!("{} Vote recorded", "✓".green().bold());
    print_poll(book, &poll)
}

fn cmd_reset(book: &Book, args: ResetArgs, json: bool) -> anyhow::Result<()> {
    let poll = book.reset_vote(&parse_id(&args.id)?)?;
    if json {
        return print_json(&poll);
    }
    println!("{} Votes reset for {}", "✓".green().bold(), poll.id().to_string().yellow());
    Ok(())
}

fn cmd_delete(book: &mut Book, args: DeleteArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let poll = book.poll(&id)?;
    if !args.yes {
        let prompt = format!("Delete poll \"{}\"? [y/N] ", poll.question());
        let stdin = io::stdin();
        if !confirm(&prompt, &mut stdin.lock())? {
            println!("Aborted.");
            return Ok(());
        }
    }
    book.delete_poll(&id)?;
    println!("Deleted poll {}", id.to_string().yellow());
    Ok(())
}

fn cmd_theme(book: &Book, args: ThemeArgs, json: bool) -> anyhow::Result<()> {
    let dark = match args.action {
        None => book.dark_mode()?,
        Some(ThemeAction::Toggle) => book.toggle_dark_mode()?,
        Some(ThemeAction::Dark) => {
            book.set_dark_mode(true)?;
            true
        }
        Some(ThemeAction::Light) => {
            book.set_dark_mode(false)?;
            false
        }
    };
    if json {
        return print_json(&serde_json::json!({ "darkMode": dark }));
    }
    println!("Theme: {}", if dark { "dark".bold() } else { "light".bold() });
    Ok(())
}

// ---- Rendering ----

fn print_poll(book: &Book, poll: &Poll) -> anyhow::Result<()> {
    println!("{}", poll.question().bold());
    println!("  Created: {}", format_local(poll.created_at()).dimmed());
    let mode = if poll.is_multiple_choice() {
        format!("multiple choice, up to {}", poll.max_choices())
    } else {
        "single choice".to_string()
    };
    println!("  Mode: {}", mode.cyan());

    let rows = book.tally(poll.id())?;
    for (n, row) in rows.iter().enumerate() {
        println!("  {}", tally_line(n + 1, row));
    }
    println!("  Total: {} votes", poll.total_votes().to_string().bold());
    if book.has_voted(poll.id())? {
        println!("  {}", "You have voted on this poll.".green());
    }
    Ok(())
}

fn tally_line(number: usize, row: &TallyRow) -> String {
    format!("{number}. {}  {} votes ({:.1}%)", row.text, row.votes, row.percent)
}

fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string()
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---- Input ----

fn parse_id(raw: &str) -> anyhow::Result<PollId> {
    PollId::parse(raw).with_context(|| format!("invalid poll id {raw:?}"))
}

/// Command-line choices count from 1.
fn to_zero_based(choices: &[usize]) -> anyhow::Result<Vec<usize>> {
    choices
        .iter()
        .map(|&n| match n.checked_sub(1) {
            Some(index) => Ok(index),
            None => bail!("option numbers start at 1"),
        })
        .collect()
}

fn confirm(prompt: &str, input: &mut impl BufRead) -> anyhow::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
