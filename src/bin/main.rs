// src/bin/main.rs
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

use huddle_backend::identity::FileIdentity;
use huddle_backend::{
    AppEvent, CommandMsg, DeletePolicy, GUIDE_QUESTIONS, Phase, Rating, ScoreAxis, SqliteStore,
    WorkshopConfig, WorkshopSystem, export, phases,
};

#[derive(Parser, Debug)]
#[command(name = "huddle-cli")]
#[command(about = "Huddle workshop backend CLI")]
struct Cli {
    /// Data dir (identity + durable store), defaults to ./huddle-data
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Who may delete idea cards
    #[arg(long, value_enum, default_value_t = DeletePolicy::Anyone)]
    delete_policy: DeletePolicy,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive prompt (default)
    Interactive,
    /// Print the current group's report and save it next to the data dir
    Export,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = WorkshopConfig {
        data_dir: cli.data_dir.unwrap_or_else(|| PathBuf::from("./huddle-data")),
        delete_policy: cli.delete_policy,
    };

    std::fs::create_dir_all(&config.data_dir)?;
    let store = Arc::new(SqliteStore::open(&config.data_dir.join("huddle.db"))?);
    let identity = FileIdentity::new(&config.data_dir);

    let data_dir = config.data_dir.clone();
    let (system, mut event_rx) = WorkshopSystem::start(store, &identity, config)?;

    println!(
        "{}",
        format!(
            "🙋 Huddle ready - you are {}…",
            &system.participant_id[..16.min(system.participant_id.len())]
        )
        .cyan()
    );

    // Rejections and store failures surface here; view refreshes and
    // countdown ticks are pulled on demand by `status`.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                AppEvent::CommandRejected { reason } => {
                    println!("{}", format!("🚫 {reason}").yellow());
                }
                AppEvent::Error { message } => {
                    println!("{}", format!("🔴 {message}").red());
                }
                _ => {}
            }
        }
    });

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => interactive_mode(&system, &data_dir).await,
        Commands::Export => export_report(&system, &data_dir),
    }
}

async fn interactive_mode(system: &WorkshopSystem, data_dir: &std::path::Path) -> Result<()> {
    println!("🗒️ Huddle Interactive Mode");
    println!("Type 'help' for commands, 'quit' to exit");
    println!();

    let mut line = String::new();
    loop {
        print!("{} ", "huddle>".bold());
        io::stdout().flush().ok();

        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let cmd = line.trim();
        let (verb, rest) = cmd.split_once(' ').unwrap_or((cmd, ""));
        match verb {
            "quit" | "exit" => break,
            "" => {}
            "help" => print_help(),
            "profile" => send(system, CommandMsg::SaveProfile { name: rest.into() }),
            "groups" => list_groups(system),
            "create-group" => send(system, CommandMsg::CreateGroup { name: rest.into() }),
            "join" => send(
                system,
                CommandMsg::JoinGroup {
                    group_id: rest.into(),
                },
            ),
            "leave" => send(system, CommandMsg::LeaveGroup),
            "idea" => send(system, CommandMsg::AddIdea { text: rest.into() }),
            "ideas" => list_ideas(system),
            "remove" => send(
                system,
                CommandMsg::RemoveIdea {
                    idea_id: rest.into(),
                },
            ),
            "select" => send(
                system,
                CommandMsg::ToggleSelect {
                    idea_id: rest.into(),
                },
            ),
            "score" => score(system, rest),
            "advance" => advance(system),
            "questions" => {
                for q in GUIDE_QUESTIONS {
                    println!("  • {q}");
                }
            }
            "status" => status(system),
            "export" => {
                export_report(system, data_dir)?;
            }
            other => println!("{}", format!("unknown command: {other}").yellow()),
        }

        // give the actor a beat to validate and replicate before the
        // next prompt reads the view
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    Ok(())
}

fn print_help() {
    println!("  profile <name>          create or rename your profile");
    println!("  groups                  list groups and member counts");
    println!("  create-group <name>     create a group and join it");
    println!("  join <group-id>         join an existing group");
    println!("  leave                   leave your group");
    println!("  idea <text>             add an idea card");
    println!("  ideas                   list your group's cards");
    println!("  remove <idea-id>        remove a card");
    println!("  select <idea-id>        toggle a card on the shortlist");
    println!("  score <idea-id> <benefit|effort> <alto|medio|bajo>");
    println!("  advance                 move your group to the next phase");
    println!("  questions               show the ideation prompts");
    println!("  status                  phase stepper and countdown");
    println!("  export                  print and save the report");
    println!("  quit");
}

fn send(system: &WorkshopSystem, cmd: CommandMsg) {
    if !system.send(cmd) {
        println!("{}", "🔴 backend is gone".red());
    }
}

fn list_groups(system: &WorkshopSystem) {
    let listings = system.view().listings();
    if listings.is_empty() {
        println!("  (no groups yet)");
        return;
    }
    for listing in listings {
        println!(
            "  {}  {} - {} miembros, fase {}",
            listing.group.id.dimmed(),
            listing.group.name.bold(),
            listing.member_count,
            listing.group.current_phase.title()
        );
    }
}

fn list_ideas(system: &WorkshopSystem) {
    let Some(group) = system.my_group() else {
        println!("{}", "join a group first".yellow());
        return;
    };
    let view = system.view();
    for idea in view.group_ideas(&group.id) {
        let marker = if idea.selected { "★" } else { " " };
        println!(
            "  {} {}  {} ({}) B:{} E:{}",
            marker.yellow(),
            idea.id.dimmed(),
            idea.text,
            idea.author_name,
            idea.benefit,
            idea.effort
        );
    }
}

fn score(system: &WorkshopSystem, rest: &str) {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let [idea_id, axis, value] = parts.as_slice() else {
        println!("{}", "usage: score <idea-id> <benefit|effort> <alto|medio|bajo>".yellow());
        return;
    };
    let axis = match *axis {
        "benefit" | "beneficio" => ScoreAxis::Benefit,
        "effort" | "esfuerzo" => ScoreAxis::Effort,
        other => {
            println!("{}", format!("unknown axis: {other}").yellow());
            return;
        }
    };
    let value: Rating = match value.parse() {
        Ok(v) => v,
        Err(e) => {
            println!("{}", e.yellow());
            return;
        }
    };
    send(
        system,
        CommandMsg::SetScore {
            idea_id: idea_id.to_string(),
            axis,
            value,
        },
    );
}

fn advance(system: &WorkshopSystem) {
    let Some(group) = system.my_group() else {
        println!("{}", "join a group first".yellow());
        return;
    };
    send(system, CommandMsg::AdvancePhase { group_id: group.id });
}

fn status(system: &WorkshopSystem) {
    let Some(group) = system.my_group() else {
        println!("{}", "join a group first".yellow());
        return;
    };

    for phase in Phase::ALL {
        let marker = if phase == group.current_phase {
            "●".green()
        } else if phase < group.current_phase {
            "✓".dimmed()
        } else {
            "○".dimmed()
        };
        println!("  {} {} ({})", marker, phase.title(), phase.brief());
    }

    let now = chrono::Utc::now().timestamp_millis();
    let remaining = phases::remaining_secs(group.current_phase, group.phase_start_time, now);
    println!(
        "  ⏱  {} restante en {}",
        phases::format_mmss(remaining).bold(),
        group.current_phase.title()
    );
}

fn export_report(system: &WorkshopSystem, data_dir: &std::path::Path) -> Result<()> {
    let Some(report) = system.summary() else {
        println!("{}", "join a group first".yellow());
        return Ok(());
    };
    println!("{report}");

    if let Some(group) = system.my_group() {
        let path = data_dir.join(export::export_filename(&group.name));
        std::fs::write(&path, &report)?;
        println!("{}", format!("💾 saved {path:?}").green());
    }
    Ok(())
}
