//! # Board CLI
//!
//! Interactive console client for the freight message board. Lines you
//! type are posted to the chat tab; `/help` lists the commands.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

mod config;

use board_client::{
    BoardEvent, BoardSession, PollConfig, PostOutcome, PostingGate, RateLimitConfig, ScrollConfig,
    ScrollEffect,
};
use board_core::domain::{Message, MessageDraft, ProjectDetails, Tab, UserAccount};
use board_core::ports::{AdminDirectory, AuditTrail, StateStore};
use board_infra::export::to_csv;
use board_infra::{AuditLog, InMemoryBoard, InMemoryStateStore, JsonFileStore};
use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = AppConfig::from_env();

    tracing::info!(
        nickname = %config.nickname,
        admin = config.admin,
        "starting board CLI"
    );

    let board = Arc::new(InMemoryBoard::new());
    seed_demo_board(&board).await;

    let store: Arc<dyn StateStore> = match &config.state_file {
        Some(path) => Arc::new(JsonFileStore::open(path.clone()).await?),
        None => Arc::new(InMemoryStateStore::new()),
    };
    let gate = PostingGate::load(RateLimitConfig::from_env(), store).await;

    let account = config
        .admin
        .then(|| UserAccount::administrator(config.nickname.clone()));
    let audit = Arc::new(AuditLog::new());
    let mut session = BoardSession::new(
        Arc::clone(&board),
        gate,
        PollConfig::from_env(),
        ScrollConfig::default(),
        config.nickname.clone(),
        account,
    )
    .with_audit(Arc::clone(&audit) as Arc<dyn AuditTrail>);

    session.load_initial().await?;
    println!(
        "connected as {} ({} messages on the board, /help for commands)",
        session.nickname(),
        session.message_count()
    );

    let mut events = match session.take_events() {
        Some(events) => events,
        None => anyhow::bail!("event stream already taken"),
    };
    session.start_watches();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&mut session, &board, &audit, line.trim()).await {
                    break;
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                render_event(&event);
            }
        }
    }

    session.stop_watches().await;
    tracing::info!("board CLI stopped");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,board_cli=debug,board_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

/// A few listings so the board is not empty on first run.
async fn seed_demo_board(board: &InMemoryBoard) {
    board
        .seed_messages(vec![
            MessageDraft {
                tab: Tab::Project,
                project: Some(ProjectDetails {
                    project_name: "Night route, Tokyo to Nagoya".to_string(),
                    phone_number: "03-1234-5678".to_string(),
                    price: "45000".to_string(),
                    description: "Light van, departure 22:00, single run.".to_string(),
                }),
                ..MessageDraft::chat("yamato-trans", "Driver wanted for a regular night route.")
            },
            MessageDraft::chat("kenji", "Free this weekend, taking same-day runs around Kanagawa."),
        ])
        .await;
}

/// Handle one input line. Returns `false` when the session should end.
async fn handle_line(
    session: &mut BoardSession<InMemoryBoard>,
    board: &InMemoryBoard,
    audit: &AuditLog,
    line: &str,
) -> bool {
    if line.is_empty() {
        return true;
    }
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    match command {
        "/quit" => return false,
        "/help" => print_help(session.is_admin()),
        "/projects" => {
            for message in session.messages_for(Tab::Project) {
                print_message(&message);
            }
        }
        "/chat" => {
            for message in session.messages_for(Tab::Chat) {
                print_message(&message);
            }
        }
        "/comments" => match rest.parse::<Uuid>() {
            Ok(id) => {
                for comment in session.comments_for(id) {
                    println!("  [{}] {}", comment.nickname, comment.content);
                }
            }
            Err(_) => println!("usage: /comments <message-id>"),
        },
        "/comment" => match rest.split_once(' ') {
            Some((id, text)) => match id.parse::<Uuid>() {
                Ok(id) => match session.post_comment(id, text).await {
                    Ok(comment) => println!("comment posted under {}", comment.message_id),
                    Err(err) => println!("comment not posted: {err}"),
                },
                Err(_) => println!("usage: /comment <message-id> <text>"),
            },
            None => println!("usage: /comment <message-id> <text>"),
        },
        "/delete" => match rest.parse::<Uuid>() {
            Ok(id) => match session.delete_message(id).await {
                Ok(()) => println!("message {id} deleted"),
                Err(err) => println!("delete failed: {err}"),
            },
            Err(_) => println!("usage: /delete <message-id>"),
        },
        "/ban" => {
            if rest.is_empty() {
                println!("usage: /ban <nickname> [reason]");
            } else {
                let (nickname, reason) = match rest.split_once(' ') {
                    Some((nickname, reason)) => (nickname, Some(reason.trim().to_string())),
                    None => (rest, None),
                };
                match session.ban_user(nickname, reason).await {
                    Ok(()) => println!("{nickname} banned"),
                    Err(err) => println!("ban failed: {err}"),
                }
            }
        }
        "/accounts" => {
            if !session.is_admin() {
                println!("admin only");
            } else {
                match board.list_accounts().await {
                    Ok(accounts) => {
                        for account in accounts {
                            println!(
                                "{} ({:?}) phone={} email={}",
                                account.nickname,
                                account.account_type,
                                account.phone_number,
                                account.email.as_deref().unwrap_or("-")
                            );
                        }
                    }
                    Err(err) => println!("listing failed: {err}"),
                }
            }
        }
        "/export" => {
            if !session.is_admin() {
                println!("admin only");
            } else {
                let csv = match rest {
                    "accounts" | "" => board
                        .list_accounts()
                        .await
                        .map_err(|err| err.to_string())
                        .and_then(|rows| to_csv(&rows).map_err(|err| err.to_string())),
                    "messages" => board
                        .list_all_messages()
                        .await
                        .map_err(|err| err.to_string())
                        .and_then(|rows| to_csv(&rows).map_err(|err| err.to_string())),
                    _ => Err("usage: /export [accounts|messages]".to_string()),
                };
                match csv {
                    Ok(csv) => println!("{csv}"),
                    Err(err) => println!("export failed: {err}"),
                }
            }
        }
        "/audit" => {
            if !session.is_admin() {
                println!("admin only");
            } else {
                for entry in audit.entries().await {
                    println!(
                        "{} {} by {} {}",
                        entry.at.format("%Y-%m-%d %H:%M:%S"),
                        entry.action,
                        entry.actor,
                        entry.details.as_deref().unwrap_or("")
                    );
                }
            }
        }
        "/cooldown" => match session.countdown_tick(Tab::Chat).await {
            Some(secs) => println!("chat posting blocked for another {secs}s"),
            None => println!("chat posting is open"),
        },
        _ => post_chat(session, line).await,
    }
    true
}

async fn post_chat(session: &mut BoardSession<InMemoryBoard>, content: &str) {
    let draft = MessageDraft::chat(session.nickname().to_string(), content);
    match session.post_message(draft).await {
        Ok(PostOutcome::Posted(message)) => println!("posted {}", message.id),
        Ok(PostOutcome::RateLimited { retry_after_secs }) => {
            println!("slow down - posting blocked for {retry_after_secs}s, your text was not sent")
        }
        // The draft is lost here, so echo it back for a manual retry.
        Err(err) => println!("post failed ({err}), your text was: {content}"),
    }
}

fn render_event(event: &BoardEvent) {
    match event {
        BoardEvent::TabRefreshed { tab, count } => {
            tracing::debug!(%tab, count, "snapshot applied");
        }
        BoardEvent::ThreadRefreshed { message_id, count } => {
            tracing::debug!(%message_id, count, "thread snapshot applied");
        }
        BoardEvent::Scroll(ScrollEffect::ScrollToBottom { .. }) => {
            println!("-- new chat message --");
        }
        BoardEvent::Scroll(ScrollEffect::ShowNewMessageBadge) => {
            println!("-- new chat message below, /chat to view --");
        }
    }
}

fn print_message(message: &Message) {
    let badge = if message.is_admin {
        " [admin]"
    } else if message.is_verified {
        " [verified]"
    } else {
        ""
    };
    println!("[{}] {}{}: {}", message.id, message.nickname, badge, message.content);
    if let Some(project) = &message.project {
        println!(
            "    {} | {} yen | {} | {}",
            project.project_name, project.price, project.phone_number, project.description
        );
    }
}

fn print_help(admin: bool) {
    println!("type a line to post to the chat tab");
    println!("/projects            list project listings");
    println!("/chat                list chat messages");
    println!("/comments <id>       show a message's thread");
    println!("/comment <id> <text> reply in a thread");
    println!("/cooldown            show the posting cooldown");
    if admin {
        println!("/delete <id>         delete a message");
        println!("/ban <nick> [reason] ban a user");
        println!("/accounts            list registered accounts");
        println!("/export [accounts|messages]  dump CSV");
        println!("/audit               show the audit trail");
    }
    println!("/quit                exit");
}
