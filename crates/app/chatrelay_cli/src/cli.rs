use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "chatrelay_cli", about = "Terminal chat client for the chat relay")]
pub struct Cli {
    /// PostgreSQL connection URL for conversation storage.
    #[arg(
        long,
        global = true,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/chatrelay"
    )]
    pub database_url: String,

    /// Full URL of the relay endpoint.
    #[arg(
        long,
        global = true,
        env = "CHATRELAY_RELAY_URL",
        default_value = "http://127.0.0.1:3100/relay"
    )]
    pub relay_url: String,

    /// Owner of the conversations.
    #[arg(long, global = true, env = "CHATRELAY_USER_ID")]
    pub user_id: Option<Uuid>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an empty conversation.
    New {
        /// Conversation title.
        #[arg(long)]
        title: Option<String>,
    },
    /// List conversations, most recently active first.
    List,
    /// Print the messages of a conversation.
    Show {
        /// Conversation id.
        conversation: Uuid,
    },
    /// Send a message and print the reply.
    Send {
        /// Continue this conversation instead of starting a new one.
        #[arg(long, short)]
        conversation: Option<Uuid>,

        /// Message text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Print the version.
    Version,
}
