//! Chat history collection and batch processing.

use std::path::Path;
use std::time::Duration;

use grammers_client::types::{Chat, Message};
use rand::Rng;
use tokio::time::sleep;

use crate::client::Telegram;
use crate::config::Config;
use crate::download::media::{download_message_media, Outcome};
use crate::download::state::DownloadState;
use crate::error::Result;
use crate::fs::paths::chat_dir;
use crate::output::progress::{create_item_bar, create_spinner};

/// Download all pending media for a chat.
///
/// Processes the persisted retry list first, then history newer than the
/// resume cursor, oldest-first. State is written back to the config file
/// after every batch so an interrupted run resumes cleanly.
pub async fn run_download(
    telegram: &Telegram,
    config: &mut Config,
    config_path: &Path,
    chat: &Chat,
) -> Result<DownloadState> {
    let mut state = DownloadState::new(chat.id(), chat.name().to_string());

    // Pre-count media so progress can be reported against a total
    let spinner = create_spinner("Counting media files in chat...");
    state.total_files = count_media_messages(telegram, chat).await?;
    spinner.finish_and_clear();
    tracing::info!(
        "{} media files available in {}",
        state.total_files,
        state.chat_name
    );

    let progress = if config.options.show_downloads && state.total_files > 0 {
        Some(create_item_bar(state.total_files, "Downloading"))
    } else {
        None
    };

    // Previously failed messages first
    let retry_ids = config.state.ids_to_retry.clone();
    if !retry_ids.is_empty() {
        tracing::info!("Retrying {} previously failed messages", retry_ids.len());
        let messages = telegram.messages_by_id(chat, &retry_ids).await?;
        process_batches(
            telegram,
            config,
            config_path,
            chat,
            messages,
            &mut state,
            progress.as_ref(),
        )
        .await?;
    }

    // History newer than the resume cursor
    let messages =
        collect_new_messages(telegram, chat, config.state.last_read_message_id).await?;
    if !messages.is_empty() {
        tracing::info!("{} new messages to process", messages.len());
    }
    process_batches(
        telegram,
        config,
        config_path,
        chat,
        messages,
        &mut state,
        progress.as_ref(),
    )
    .await?;

    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    // Final persistence pass picks up the last partial batch
    persist_state(config, config_path, &state)?;

    Ok(state)
}

/// Count messages carrying media across the entire chat history.
pub async fn count_media_messages(telegram: &Telegram, chat: &Chat) -> Result<u64> {
    let mut total = 0u64;
    let mut messages = telegram.inner().iter_messages(chat);
    while let Some(message) = messages.next().await? {
        if message.media().is_some() {
            total += 1;
        }
    }
    Ok(total)
}

/// Collect messages newer than the cursor, oldest-first.
///
/// History arrives newest-first, so iteration stops at the first already
/// processed ID and the buffer is reversed; batches then run oldest-first
/// and the cursor never skips unprocessed messages.
async fn collect_new_messages(
    telegram: &Telegram,
    chat: &Chat,
    last_read_message_id: i32,
) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    let mut iter = telegram.inner().iter_messages(chat);

    while let Some(message) = iter.next().await? {
        if message.id() <= last_read_message_id {
            break;
        }
        messages.push(message);
    }

    messages.reverse();
    Ok(messages)
}

/// Process messages in concurrent batches, persisting state after each.
async fn process_batches(
    telegram: &Telegram,
    config: &mut Config,
    config_path: &Path,
    chat: &Chat,
    messages: Vec<Message>,
    state: &mut DownloadState,
    progress: Option<&indicatif::ProgressBar>,
) -> Result<()> {
    let batch_size = config.options.batch_size.max(1);
    let mut iter = messages.into_iter();

    loop {
        let batch: Vec<Message> = iter.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }

        let total_files = state.total_files;
        let outcomes = futures::future::join_all(
            batch
                .into_iter()
                .map(|message| download_message_media(telegram, config, chat, message, total_files)),
        )
        .await;

        for outcome in &outcomes {
            state.apply(outcome);
            if let (Outcome::Downloaded { .. }, Some(progress)) = (outcome, progress) {
                progress.inc(1);
            }
        }

        persist_state(config, config_path, state)?;

        // Jitter between batches to stay clear of flood limits
        let delay_ms = rand::thread_rng().gen_range(400..750);
        sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}

/// Write the resume cursor and retry list back to the config file,
/// with a snapshot copy in the chat's download directory.
fn persist_state(config: &mut Config, config_path: &Path, state: &DownloadState) -> Result<()> {
    config.state.last_read_message_id = config
        .state
        .last_read_message_id
        .max(state.last_processed_id);
    config.update_retry_ids(&state.downloaded_ids, &state.failed_ids);

    let chat_dir = chat_dir(config, state.chat_id);
    config.save_with_snapshot(config_path, &chat_dir)
}
