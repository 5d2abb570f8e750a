//! Long-polling Telegram transport.
//!
//! Requires the `telegram` feature to be enabled.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{BotCommand, InputFile, Me};
use teloxide::update_listeners::Polling;
use teloxide::RequestError;
use tracing::{error, info, warn};

use crate::config::{ReconnectionConfig, TelegramSettings};
use crate::error::Result;

use super::auth::ACCESS_DENIED;
use super::backoff::Backoff;
use super::command::bot_commands;
use super::control::{BotControl, Reply};

/// Long-polling request timeout.
const POLL_TIMEOUT: Duration = Duration::from_secs(30);

/// Run the bot until Ctrl-C.
pub async fn run(
    settings: TelegramSettings,
    reconnection: ReconnectionConfig,
    control: BotControl,
) -> Result<()> {
    let bot = Bot::new(&settings.bot_token);

    let me = tokio::select! {
        me = wait_for_api(&bot, Backoff::new(reconnection)) => me,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted before the bot came online");
            return Ok(());
        }
    };
    info!(
        username = %me.username(),
        allowed_users = settings.allowed_user_ids.len(),
        portfolio = control.portfolio_enabled(),
        "Telegram bot online"
    );

    if settings.register_commands {
        if let Err(e) = register_bot_commands(&bot, control.portfolio_enabled()).await {
            warn!(error = %e, "Failed to register bot commands with Telegram");
        }
    }

    let mut polling = Polling::builder(bot.clone()).timeout(POLL_TIMEOUT);
    if settings.drop_pending_updates {
        polling = polling.drop_pending_updates();
    }
    let listener = polling.delete_webhook().await.build();

    let control = Arc::new(control);
    let handler = Update::filter_message().endpoint(handle_message);
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::clone(&control)])
        .default_handler(|_| async {})
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Error while handling a Telegram update",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("Telegram polling error, continuing"),
        )
        .await;

    info!(
        active_sessions = control.sessions().active(),
        "Telegram bot stopped"
    );
    Ok(())
}

/// Retry `get_me` with exponential backoff until the Bot API answers.
async fn wait_for_api(bot: &Bot, mut backoff: Backoff) -> Me {
    loop {
        match bot.get_me().await {
            Ok(me) => {
                if backoff.attempts() > 0 {
                    info!(attempts = backoff.attempts(), "Telegram reachable again");
                }
                return me;
            }
            Err(e) => {
                let delay = backoff.next_delay();
                warn!(
                    error = %e,
                    attempt = backoff.attempts(),
                    delay_ms = delay.as_millis() as u64,
                    "Telegram unreachable, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Register bot commands with Telegram for the "/" menu.
async fn register_bot_commands(
    bot: &Bot,
    portfolio_enabled: bool,
) -> std::result::Result<(), RequestError> {
    let commands: Vec<BotCommand> = bot_commands(portfolio_enabled)
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, control: Arc<BotControl>) -> ResponseResult<()> {
    let (Some(text), Some(user)) = (msg.text(), msg.from.as_ref()) else {
        return Ok(());
    };
    let chat = msg.chat.id;
    let user_id = user.id.0;

    if !control.is_authorized(user_id) {
        if let Err(e) = send_text(&bot, chat, ACCESS_DENIED).await {
            error!(error = %e, "Failed to send access denied reply");
        }
        return Ok(());
    }

    let action = control.resolve(user_id, text);

    let progress = match action.progress_text() {
        Some(notice) => match send_text(&bot, chat, notice).await {
            Ok(sent) => Some(sent),
            Err(e) => {
                warn!(error = %e, "Failed to send progress notice");
                None
            }
        },
        None => None,
    };

    let replies = control.perform(&action).await;
    let count = replies.len();
    for (i, reply) in replies.into_iter().enumerate() {
        if i > 0 && action.is_multi_part() {
            tokio::time::sleep(control.part_pause()).await;
        }
        if let Err(e) = deliver(&bot, chat, reply).await {
            error!(error = %e, part = i + 1, parts = count, "Failed to send Telegram reply");
        }
    }

    if let (Some(notice), true) = (progress, action.dismisses_progress()) {
        if let Err(e) = bot.delete_message(chat, notice.id).await {
            warn!(error = %e, "Failed to delete progress notice");
        }
    }

    Ok(())
}

async fn deliver(bot: &Bot, chat: ChatId, reply: Reply) -> ResponseResult<Message> {
    match reply {
        Reply::Text(text) => send_text(bot, chat, &text).await,
        Reply::Photo { png, caption } => {
            retry_after(|| {
                bot.send_photo(chat, InputFile::memory(png.clone()))
                    .caption(caption.clone())
                    .send()
            })
            .await
        }
    }
}

async fn send_text(bot: &Bot, chat: ChatId, text: &str) -> ResponseResult<Message> {
    retry_after(|| bot.send_message(chat, text).send()).await
}

/// Run `request`, retrying once when Telegram asks to slow down.
async fn retry_after<T, F, Fut>(mut request: F) -> ResponseResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ResponseResult<T>>,
{
    match request().await {
        Err(RequestError::RetryAfter(wait)) => {
            warn!(seconds = wait.seconds(), "Telegram rate limit hit, retrying");
            tokio::time::sleep(wait.duration()).await;
            request().await
        }
        other => other,
    }
}
