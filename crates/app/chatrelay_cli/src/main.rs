// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use chatrelay_client::{ChatSession, RelayClient};
use chatrelay_core::conversations::PgChatStore;
use clap::Parser;
use cli::{Cli, Commands};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();

    match &args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Send { text, .. } if text.join(" ").trim().is_empty() => {
            return Err(Error::Custom("message is empty".into()));
        }
        _ => {}
    }

    let user_id = args
        .user_id
        .ok_or_else(|| Error::Custom("--user-id or CHATRELAY_USER_ID is required".into()))?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(execute(&args, user_id))
}

async fn execute(args: &Cli, user_id: Uuid) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&args.database_url)
        .await?;
    chatrelay_core::migrate::migrate(&pool).await?;

    let relay = RelayClient::new(&args.relay_url)?;
    let session = ChatSession::new(PgChatStore::new(pool), relay, user_id);

    match &args.command {
        Commands::New { title } => {
            let conversation = session.new_conversation(title.as_deref()).await?;
            println!("{}\t{}", conversation.id, conversation.title);
        }
        Commands::List => {
            for conversation in session.conversations().await? {
                println!(
                    "{}\t{}\t{}",
                    conversation.id,
                    conversation.updated_at.format("%Y-%m-%d %H:%M"),
                    conversation.title
                );
            }
        }
        Commands::Show { conversation } => {
            for message in session.history(*conversation).await? {
                println!("[{}] {}", message.role, message.content);
            }
        }
        Commands::Send { conversation, text } => {
            let turn = session.send(*conversation, &text.join(" ")).await?;
            log::info!("conversation {}", turn.conversation.id);
            if let Some(reply) = turn.reply() {
                println!("{}", reply.content);
            }
        }
        Commands::Version => {}
    }

    Ok(())
}
