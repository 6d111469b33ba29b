//! Plugin system for command, callback and inline handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding the handler to `command_handler()` or `callback_handler()`

pub mod broadcast;
pub mod dev;
pub mod groups;
pub mod help;
pub mod lang;
pub mod ping;
pub mod start;
pub mod stats;
pub mod weather;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::dispatcher::AppState;

/// All bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Main menu")]
    Start(String),

    #[command(description = "How to use the bot")]
    Help,

    #[command(description = "Change language")]
    Lang,

    #[command(description = "Latency and uptime")]
    Ping,

    #[command(description = "Bot statistics")]
    Stats,

    // Developer commands
    #[command(description = "Developer panel")]
    Dev,

    #[command(description = "Send content to all users")]
    Broadcast(String),

    #[command(description = "Send content to all users (alias)")]
    Bc(String),

    #[command(description = "Send content to all groups")]
    Sendgp(String),

    #[command(description = "List registered groups")]
    Groups,
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    // Anyone else gets no answer at all
    let dev_commands = dptree::filter(is_dev_in_private)
        .branch(case![Command::Broadcast(args)].endpoint(broadcast::broadcast_command))
        .branch(case![Command::Bc(args)].endpoint(broadcast::broadcast_command))
        .branch(case![Command::Sendgp(args)].endpoint(broadcast::sendgp_command))
        .branch(case![Command::Groups].endpoint(groups::groups_command));

    teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start(args)].endpoint(start::start_command))
        .branch(case![Command::Help].endpoint(help::help_command))
        .branch(case![Command::Lang].endpoint(lang::lang_command))
        .branch(case![Command::Ping].endpoint(ping::ping_command))
        .branch(case![Command::Stats].endpoint(stats::stats_command))
        .branch(case![Command::Dev].endpoint(dev::dev_command))
        .branch(dev_commands)
}

/// Build the callback query handler.
pub fn callback_handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_callback_query()
        .branch(dptree::filter(|q: CallbackQuery| has_prefix(&q, "menu:")).endpoint(start::menu_callback))
        .branch(dptree::filter(|q: CallbackQuery| has_prefix(&q, "lang:")).endpoint(lang::lang_callback))
        .branch(dptree::filter(|q: CallbackQuery| has_prefix(&q, "dev:")).endpoint(dev::dev_callback))
        .branch(dptree::filter(|q: CallbackQuery| has_prefix(&q, "groups:")).endpoint(groups::groups_callback))
}

/// Build the inline query handler.
pub fn inline_handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_inline_query().endpoint(weather::inline_query_handler)
}

fn is_dev_in_private(msg: Message, state: AppState) -> bool {
    msg.chat.is_private() && msg.from.as_ref().is_some_and(|u| state.is_dev(u.id))
}

fn has_prefix(q: &CallbackQuery, prefix: &str) -> bool {
    q.data.as_deref().is_some_and(|d| d.starts_with(prefix))
}
